use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse, Response};

use crate::assets::{APP_JS, STYLE_CSS};
use crate::dashboard::view::render_page;
use crate::dashboard::{ItemForm, ListView, Notification, NotificationKind};
use crate::db::list_items;
use crate::error::AppError;
use crate::AppState;

/// The dashboard. A storage failure still renders the page, with an empty
/// list and an error message, so the add form stays usable.
pub async fn index(State(state): State<AppState>) -> Html<String> {
    let (list, notification) = match list_items(&state.db) {
        Ok(items) => (ListView::Loaded(items), None),
        Err(err) => {
            tracing::error!(error = ?err, "Failed to load items for dashboard");
            let notification = Notification {
                kind: NotificationKind::Error,
                message: err.message(),
            };
            (ListView::Loaded(Vec::new()), Some(notification))
        }
    };

    Html(render_page(
        &list,
        &ItemForm::new(),
        notification.as_ref(),
        &state.base_path,
    ))
}

/// List region markup, fetched by the page script after every change.
pub async fn items_partial(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    let list = ListView::Loaded(list_items(&state.db)?);
    Ok(Html(list.render()))
}

pub async fn static_file(Path(path): Path<String>) -> Response {
    match path.as_str() {
        "app.js" => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "application/javascript")],
            APP_JS,
        )
            .into_response(),
        "style.css" => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/css")],
            STYLE_CSS,
        )
            .into_response(),
        _ => StatusCode::NOT_FOUND.into_response(),
    }
}
