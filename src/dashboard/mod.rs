//! Client side of the watchlist: loads items from the Items API, renders the
//! dashboard markup, and runs the add/edit/delete flows.

pub mod client;
pub mod controller;
pub mod form;
pub mod notify;
pub mod view;

pub use client::{ApiError, HttpItemsApi, ItemsApi, GENERIC_ERROR};
pub use controller::{DashboardController, DeleteOutcome, LoadTicket, SubmitOutcome};
pub use form::{CloseTrigger, Field, FormFields, ItemForm, ModalState};
pub use notify::{Notification, NotificationKind, Notifier};
pub use view::ListView;
