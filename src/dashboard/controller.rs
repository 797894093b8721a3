use tracing::{debug, info, warn};

use crate::dashboard::client::{ApiError, ItemsApi};
use crate::dashboard::form::{CloseTrigger, Field, ItemForm};
use crate::dashboard::notify::{Notification, Notifier};
use crate::dashboard::view::{self, ListView};
use crate::models::Item;

/// Identifies one list fetch. Only the most recently issued ticket may
/// update the list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Validation failed; nothing was sent.
    Invalid,
    Created,
    Updated,
    /// The request failed; the modal is still open with the input intact.
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Cancelled,
    Deleted,
    Failed,
}

/// Drives the watchlist dashboard: the item list, the add/edit modal and the
/// message region.
///
/// Every successful mutation is followed by a full reload; the controller
/// never patches the list locally.
pub struct DashboardController<A> {
    api: A,
    list: ListView,
    form: ItemForm,
    notifier: Notifier,
    load_seq: u64,
}

impl<A: ItemsApi> DashboardController<A> {
    pub fn new(api: A) -> Self {
        Self::with_notifier(api, Notifier::new())
    }

    pub fn with_notifier(api: A, notifier: Notifier) -> Self {
        Self {
            api,
            list: ListView::default(),
            form: ItemForm::new(),
            notifier,
            load_seq: 0,
        }
    }

    /// Initial page load.
    pub async fn init(&mut self) {
        self.load_items().await;
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn list(&self) -> &ListView {
        &self.list
    }

    pub fn form(&self) -> &ItemForm {
        &self.form
    }

    pub fn notification(&self) -> Option<Notification> {
        self.notifier.current()
    }

    pub fn render_list(&self) -> String {
        self.list.render()
    }

    pub fn render_page(&self, base_path: &str) -> String {
        view::render_page(
            &self.list,
            &self.form,
            self.notifier.current().as_ref(),
            base_path,
        )
    }

    pub async fn load_items(&mut self) {
        let ticket = self.begin_load();
        let result = self.api.list_items().await;
        self.finish_load(ticket, result);
    }

    /// Clears the list and shows the loading indicator.
    pub fn begin_load(&mut self) -> LoadTicket {
        self.load_seq += 1;
        self.list = ListView::Loading;
        LoadTicket(self.load_seq)
    }

    /// Applies a list response. Returns `false` and changes nothing when a
    /// newer load has been started since `ticket` was issued.
    pub fn finish_load(&mut self, ticket: LoadTicket, result: Result<Vec<Item>, ApiError>) -> bool {
        if ticket.0 != self.load_seq {
            debug!(ticket = ticket.0, latest = self.load_seq, "discarding stale item list");
            return false;
        }

        match result {
            Ok(items) => {
                debug!(count = items.len(), "loaded items");
                self.list = ListView::Loaded(items);
            }
            Err(err) => {
                warn!(error = %err, "failed to load items");
                self.notifier.error(err.user_message());
                self.list = ListView::Loaded(Vec::new());
            }
        }
        true
    }

    pub fn open_add(&mut self) {
        self.form.open_for_add();
    }

    /// Opens the modal for the card with `id`. Returns `false` if no such card
    /// is on screen.
    pub fn open_edit(&mut self, id: &str) -> bool {
        match self.list.find(id) {
            Some(item) => {
                self.form.open_for_edit(item);
                true
            }
            None => false,
        }
    }

    pub fn close_form(&mut self, trigger: CloseTrigger) -> bool {
        let closed = self.form.close();
        if closed {
            debug!(?trigger, "closed item form");
        }
        closed
    }

    /// Mirrors a user edit of one input.
    pub fn set_field(&mut self, field: Field, value: impl Into<String>) {
        self.form.set(field, value);
    }

    pub async fn submit(&mut self) -> SubmitOutcome {
        if !self.form.validate() {
            debug!(errors = self.form.errors().len(), "item form invalid");
            return SubmitOutcome::Invalid;
        }

        let payload = self.form.payload();
        let edit_id = self.form.edit_id().map(str::to_owned);

        let result = match &edit_id {
            Some(id) => self.api.update_item(id, &payload).await,
            None => self.api.create_item(&payload).await,
        };

        match result {
            Ok(()) => {
                self.form.close();
                let outcome = match edit_id {
                    Some(id) => {
                        info!(%id, "updated item");
                        self.notifier.success("Item updated.");
                        SubmitOutcome::Updated
                    }
                    None => {
                        info!(title = %payload.title, "added item");
                        self.notifier.success("Item added.");
                        SubmitOutcome::Created
                    }
                };
                self.load_items().await;
                outcome
            }
            Err(err) => {
                warn!(error = %err, "failed to save item");
                self.notifier.error(err.user_message());
                SubmitOutcome::Failed
            }
        }
    }

    /// Asks `confirm` first; a `false` answer sends nothing.
    pub async fn delete_item(
        &mut self,
        id: &str,
        confirm: impl FnOnce(&str) -> bool,
    ) -> DeleteOutcome {
        let prompt = match self.list.find(id) {
            Some(item) => format!("Delete \"{}\"? This cannot be undone.", item.title),
            None => "Delete this item? This cannot be undone.".to_string(),
        };
        if !confirm(&prompt) {
            return DeleteOutcome::Cancelled;
        }

        match self.api.delete_item(id).await {
            Ok(()) => {
                info!(%id, "deleted item");
                self.notifier.success("Item deleted.");
                self.load_items().await;
                DeleteOutcome::Deleted
            }
            Err(err) => {
                warn!(%id, error = %err, "failed to delete item");
                self.notifier.error(err.user_message());
                DeleteOutcome::Failed
            }
        }
    }
}
