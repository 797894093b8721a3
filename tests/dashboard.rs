use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use watchlist::dashboard::{
    ApiError, CloseTrigger, DashboardController, DeleteOutcome, Field, ItemsApi, ModalState,
    NotificationKind, SubmitOutcome, GENERIC_ERROR,
};
use watchlist::models::{Item, ItemPayload};

#[derive(Debug, Clone, PartialEq)]
enum Call {
    List,
    Create(ItemPayload),
    Update(String, ItemPayload),
    Delete(String),
}

#[derive(Default)]
struct FakeState {
    items: Vec<Item>,
    calls: Vec<Call>,
    /// Errors handed out to the next requests, oldest first.
    failures: VecDeque<ApiError>,
}

#[derive(Clone, Default)]
struct FakeApi {
    state: Arc<Mutex<FakeState>>,
}

impl FakeApi {
    fn with_items(items: Vec<Item>) -> Self {
        let api = FakeApi::default();
        api.state.lock().unwrap().items = items;
        api
    }

    fn fail_next(&self, err: ApiError) {
        self.state.lock().unwrap().failures.push_back(err);
    }

    fn calls(&self) -> Vec<Call> {
        self.state.lock().unwrap().calls.clone()
    }

    fn record(&self, call: Call) -> Result<(), ApiError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(call);
        match state.failures.pop_front() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl ItemsApi for FakeApi {
    async fn list_items(&self) -> Result<Vec<Item>, ApiError> {
        self.record(Call::List)?;
        Ok(self.state.lock().unwrap().items.clone())
    }

    async fn create_item(&self, payload: &ItemPayload) -> Result<(), ApiError> {
        self.record(Call::Create(payload.clone()))
    }

    async fn update_item(&self, id: &str, payload: &ItemPayload) -> Result<(), ApiError> {
        self.record(Call::Update(id.to_string(), payload.clone()))
    }

    async fn delete_item(&self, id: &str) -> Result<(), ApiError> {
        self.record(Call::Delete(id.to_string()))
    }
}

fn item(id: &str, title: &str) -> Item {
    Item {
        id: id.to_string(),
        title: title.to_string(),
        kind: "Movie".to_string(),
        status: "Planned".to_string(),
        rating: None,
        current_episode: None,
        total_episodes: None,
        notes: None,
        date_added: None,
    }
}

fn status_error(message: &str) -> ApiError {
    ApiError::Status {
        status: 400,
        message: Some(message.to_string()),
    }
}

#[tokio::test]
async fn empty_collection_shows_placeholder() {
    let api = FakeApi::default();
    let mut dashboard = DashboardController::new(api.clone());
    dashboard.init().await;

    assert_eq!(api.calls(), vec![Call::List]);
    assert!(dashboard.list().shows_empty_state());
    let html = dashboard.render_list();
    assert!(html.contains("empty-state"));
    assert!(!html.contains("item-card"));
}

#[tokio::test]
async fn list_renders_cards_in_server_order() {
    let api = FakeApi::with_items(vec![item("2", "Second"), item("1", "First")]);
    let mut dashboard = DashboardController::new(api);
    dashboard.load_items().await;

    let html = dashboard.render_list();
    let second = html.find("Second").unwrap();
    let first = html.find("First").unwrap();
    assert!(second < first);
    assert_eq!(html.matches("item-card").count(), 2);
}

#[tokio::test]
async fn create_flow() {
    let api = FakeApi::default();
    let mut dashboard = DashboardController::new(api.clone());
    dashboard.init().await;

    dashboard.open_add();
    dashboard.set_field(Field::Title, "  Inception  ");
    dashboard.set_field(Field::Rating, "9");
    assert_eq!(dashboard.submit().await, SubmitOutcome::Created);

    let calls = api.calls();
    assert_eq!(calls.len(), 3);
    assert_eq!(
        calls[1],
        Call::Create(ItemPayload {
            title: "Inception".to_string(),
            kind: "Movie".to_string(),
            status: "Planned".to_string(),
            rating: Some(9),
            current_episode: None,
            total_episodes: None,
            notes: None,
        })
    );
    assert_eq!(calls[2], Call::List);

    let Call::Create(payload) = &calls[1] else {
        unreachable!()
    };
    let json = serde_json::to_value(payload).unwrap();
    assert!(json.get("id").is_none());

    assert!(!dashboard.form().is_open());
    let shown = dashboard.notification().unwrap();
    assert_eq!(shown.kind, NotificationKind::Success);
    assert_eq!(shown.message, "Item added.");
}

#[tokio::test]
async fn edit_flow_sends_every_field() {
    let mut show = item("42", "Breaking Bad");
    show.kind = "TV Show".to_string();
    show.status = "Watching".to_string();
    show.rating = Some(10);
    show.current_episode = Some(3);
    show.total_episodes = Some(62);
    show.notes = Some("Season 1.".to_string());

    let api = FakeApi::with_items(vec![show]);
    let mut dashboard = DashboardController::new(api.clone());
    dashboard.init().await;

    assert!(dashboard.open_edit("42"));
    assert_eq!(
        dashboard.form().state(),
        &ModalState::OpenForEdit("42".to_string())
    );
    dashboard.set_field(Field::Rating, "8");
    assert_eq!(dashboard.submit().await, SubmitOutcome::Updated);

    assert_eq!(
        api.calls()[1],
        Call::Update(
            "42".to_string(),
            ItemPayload {
                title: "Breaking Bad".to_string(),
                kind: "TV Show".to_string(),
                status: "Watching".to_string(),
                rating: Some(8),
                current_episode: Some(3),
                total_episodes: Some(62),
                notes: Some("Season 1.".to_string()),
            }
        )
    );
    assert_eq!(dashboard.notification().unwrap().message, "Item updated.");
}

#[tokio::test]
async fn open_edit_unknown_card() {
    let mut dashboard = DashboardController::new(FakeApi::default());
    dashboard.init().await;
    assert!(!dashboard.open_edit("missing"));
    assert!(!dashboard.form().is_open());
}

#[tokio::test]
async fn invalid_form_sends_nothing() {
    let api = FakeApi::default();
    let mut dashboard = DashboardController::new(api.clone());
    dashboard.init().await;

    dashboard.open_add();
    dashboard.set_field(Field::Title, "   ");
    dashboard.set_field(Field::Rating, "0");
    assert_eq!(dashboard.submit().await, SubmitOutcome::Invalid);

    assert_eq!(api.calls(), vec![Call::List]);
    assert!(dashboard.form().is_open());
    assert_eq!(dashboard.form().error(Field::Title), Some("Title is required."));
    assert_eq!(
        dashboard.form().error(Field::Rating),
        Some("Rating must be between 1 and 10.")
    );
    assert!(dashboard.notification().is_none());
}

#[tokio::test]
async fn failed_save_keeps_modal_open() {
    let api = FakeApi::default();
    let mut dashboard = DashboardController::new(api.clone());
    dashboard.init().await;

    dashboard.open_add();
    dashboard.set_field(Field::Title, "Dune");
    api.fail_next(status_error("Database error"));
    assert_eq!(dashboard.submit().await, SubmitOutcome::Failed);

    assert!(dashboard.form().is_open());
    assert_eq!(dashboard.form().fields().title, "Dune");
    let shown = dashboard.notification().unwrap();
    assert_eq!(shown.kind, NotificationKind::Error);
    assert_eq!(shown.message, "Database error");
    // No reload after a failure.
    assert_eq!(api.calls().len(), 2);

    // Retry succeeds with the same input.
    assert_eq!(dashboard.submit().await, SubmitOutcome::Created);
}

#[tokio::test]
async fn delete_requires_confirmation() {
    let api = FakeApi::with_items(vec![item("7", "Alien")]);
    let mut dashboard = DashboardController::new(api.clone());
    dashboard.init().await;

    let mut prompt = String::new();
    let outcome = dashboard
        .delete_item("7", |text| {
            prompt = text.to_string();
            false
        })
        .await;
    assert_eq!(outcome, DeleteOutcome::Cancelled);
    assert!(prompt.contains("Alien"));
    assert_eq!(api.calls(), vec![Call::List]);

    let outcome = dashboard.delete_item("7", |_| true).await;
    assert_eq!(outcome, DeleteOutcome::Deleted);
    assert_eq!(
        api.calls(),
        vec![Call::List, Call::Delete("7".to_string()), Call::List]
    );
    assert_eq!(dashboard.notification().unwrap().message, "Item deleted.");
}

#[tokio::test]
async fn failed_delete_reports_error() {
    let api = FakeApi::with_items(vec![item("7", "Alien")]);
    let mut dashboard = DashboardController::new(api.clone());
    dashboard.init().await;

    api.fail_next(ApiError::Status {
        status: 500,
        message: None,
    });
    let outcome = dashboard.delete_item("7", |_| true).await;
    assert_eq!(outcome, DeleteOutcome::Failed);
    assert_eq!(dashboard.notification().unwrap().message, GENERIC_ERROR);
    assert_eq!(dashboard.list().cards().len(), 1);
}

#[tokio::test]
async fn failed_load_renders_empty_list() {
    let api = FakeApi::with_items(vec![item("1", "Alien")]);
    api.fail_next(status_error("Database error"));
    let mut dashboard = DashboardController::new(api);
    dashboard.load_items().await;

    assert!(dashboard.list().shows_empty_state());
    let shown = dashboard.notification().unwrap();
    assert_eq!(shown.kind, NotificationKind::Error);
    assert_eq!(shown.message, "Database error");
}

#[tokio::test]
async fn stale_list_response_is_discarded() {
    let mut dashboard = DashboardController::new(FakeApi::default());

    let older = dashboard.begin_load();
    let newer = dashboard.begin_load();
    assert!(dashboard.list().is_loading());

    assert!(dashboard.finish_load(newer, Ok(vec![item("2", "Fresh")])));
    assert!(!dashboard.finish_load(older, Ok(vec![item("1", "Stale")])));

    let cards = dashboard.list().cards();
    assert_eq!(cards.len(), 1);
    assert_eq!(cards[0].title, "Fresh");
}

#[tokio::test]
async fn close_triggers_discard_edits() {
    let mut dashboard = DashboardController::new(FakeApi::default());
    dashboard.init().await;

    for trigger in [
        CloseTrigger::CloseButton,
        CloseTrigger::CancelButton,
        CloseTrigger::Backdrop,
        CloseTrigger::EscapeKey,
    ] {
        dashboard.open_add();
        dashboard.set_field(Field::Title, "Draft");
        assert!(dashboard.close_form(trigger));
        assert!(!dashboard.form().is_open());
    }

    // Escape with nothing open does nothing.
    assert!(!dashboard.close_form(CloseTrigger::EscapeKey));

    dashboard.open_add();
    assert_eq!(dashboard.form().fields().title, "");
}

#[tokio::test]
async fn rendered_page_reflects_controller_state() {
    let api = FakeApi::with_items(vec![item("1", "Alien")]);
    let mut dashboard = DashboardController::new(api);
    dashboard.init().await;
    dashboard.open_edit("1");

    let page = dashboard.render_page("");
    assert!(page.contains(r#"<div id="item-modal" class="modal">"#));
    assert!(page.contains(r#"value="Alien""#));
    assert!(page.contains("Edit item"));
}
