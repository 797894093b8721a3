use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::{http::StatusCode, Json};
use serde_json::{json, Value};
use tracing::info;

use crate::db::{create_item, delete_item, get_item, list_items, update_item};
use crate::error::AppError;
use crate::models::Item;
use crate::validation::parse_item_body;
use crate::AppState;

fn parse_id(raw: &str) -> Result<i64, AppError> {
    raw.parse()
        .map_err(|_| AppError::BadRequest("Invalid item id".to_string()))
}

/// Unparseable bodies fall through to validation, which reports them as
/// "Request body must be JSON object".
fn parse_body(body: &Bytes) -> Value {
    serde_json::from_slice(body).unwrap_or(Value::Null)
}

pub async fn list_all_items(State(state): State<AppState>) -> Result<Json<Vec<Item>>, AppError> {
    let items = list_items(&state.db)?;
    info!(count = items.len(), "Listed items");
    Ok(Json(items))
}

pub async fn create_new_item(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<(StatusCode, Json<Item>), AppError> {
    let changes = parse_item_body(&parse_body(&body), false)?;
    let item = create_item(&state.db, &changes)?;
    info!(id = %item.id, title = %item.title, "Created item");
    Ok((StatusCode::CREATED, Json(item)))
}

pub async fn get_single_item(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Item>, AppError> {
    match get_item(&state.db, parse_id(&id)?)? {
        Some(item) => Ok(Json(item)),
        None => Err(AppError::NotFound("Item")),
    }
}

pub async fn update_existing_item(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<Json<Item>, AppError> {
    let id = parse_id(&id)?;
    let changes = parse_item_body(&parse_body(&body), true)?;
    if changes.is_empty() {
        return Err(AppError::BadRequest("No valid fields to update".to_string()));
    }

    match update_item(&state.db, id, &changes)? {
        Some(item) => {
            info!(id, title = %item.title, status = %item.status, "Updated item");
            Ok(Json(item))
        }
        None => Err(AppError::NotFound("Item")),
    }
}

pub async fn delete_existing_item(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let id = parse_id(&id)?;
    if delete_item(&state.db, id)? {
        info!(id, "Deleted item");
        Ok(Json(json!({ "message": "Item deleted" })))
    } else {
        Err(AppError::NotFound("Item"))
    }
}
