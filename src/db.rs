use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

use rusqlite::{Connection, OptionalExtension, Row};
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

use crate::error::AppError;
use crate::models::{Item, ItemChanges, DEFAULT_STATUS, DEFAULT_TYPE};

pub type DbPool = Arc<Mutex<Connection>>;

const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS items (
        id INTEGER PRIMARY KEY,
        title TEXT NOT NULL,
        type TEXT NOT NULL DEFAULT 'Movie',
        status TEXT NOT NULL DEFAULT 'Planned',
        rating INTEGER,
        current_episode INTEGER,
        total_episodes INTEGER,
        notes TEXT,
        date_added TEXT NOT NULL
    );
";

const ITEM_COLUMNS: &str =
    "id, title, type, status, rating, current_episode, total_episodes, notes, date_added";

pub fn init_db(path: impl AsRef<Path>) -> rusqlite::Result<DbPool> {
    let conn = Connection::open(path)?;
    init_schema(&conn)?;
    Ok(Arc::new(Mutex::new(conn)))
}

pub fn init_memory_db() -> rusqlite::Result<DbPool> {
    let conn = Connection::open_in_memory()?;
    init_schema(&conn)?;
    Ok(Arc::new(Mutex::new(conn)))
}

fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(SCHEMA)
}

fn lock(pool: &DbPool) -> Result<MutexGuard<'_, Connection>, AppError> {
    pool.lock()
        .map_err(|_| AppError::Database("connection mutex poisoned".to_string()))
}

fn row_to_item(row: &Row<'_>) -> rusqlite::Result<Item> {
    Ok(Item {
        id: row.get::<_, i64>(0)?.to_string(),
        title: row.get(1)?,
        kind: row.get(2)?,
        status: row.get(3)?,
        rating: row.get(4)?,
        current_episode: row.get(5)?,
        total_episodes: row.get(6)?,
        notes: row.get(7)?,
        date_added: row.get(8)?,
    })
}

fn now_rfc3339() -> Result<String, AppError> {
    // Whole seconds keep the text column sortable.
    OffsetDateTime::now_utc()
        .replace_nanosecond(0)
        .map_err(|e| AppError::Database(e.to_string()))?
        .format(&Rfc3339)
        .map_err(|e| AppError::Database(e.to_string()))
}

/// Newest first; rows added within the same second fall back to insertion order.
pub fn list_items(pool: &DbPool) -> Result<Vec<Item>, AppError> {
    let conn = lock(pool)?;
    let mut stmt = conn.prepare(&format!(
        "SELECT {ITEM_COLUMNS} FROM items ORDER BY date_added DESC, id DESC"
    ))?;
    let items = stmt
        .query_map([], row_to_item)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(items)
}

pub fn get_item(pool: &DbPool, id: i64) -> Result<Option<Item>, AppError> {
    let conn = lock(pool)?;
    get_item_internal(&conn, id)
}

fn get_item_internal(conn: &Connection, id: i64) -> Result<Option<Item>, AppError> {
    let item = conn
        .query_row(
            &format!("SELECT {ITEM_COLUMNS} FROM items WHERE id = ?1"),
            [id],
            row_to_item,
        )
        .optional()?;
    Ok(item)
}

/// Inserts a new item, filling in the default type and status.
///
/// Explicit nulls in `changes` are stored as NULL, same as leaving them out.
pub fn create_item(pool: &DbPool, changes: &ItemChanges) -> Result<Item, AppError> {
    let title = changes
        .title
        .as_deref()
        .ok_or_else(|| AppError::BadRequest("Missing required field: title".to_string()))?;
    let date_added = now_rfc3339()?;

    let conn = lock(pool)?;
    conn.execute(
        "INSERT INTO items (title, type, status, rating, current_episode, total_episodes, notes, date_added)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        (
            title,
            changes.kind.as_deref().unwrap_or(DEFAULT_TYPE),
            changes.status.as_deref().unwrap_or(DEFAULT_STATUS),
            changes.rating.flatten(),
            changes.current_episode.flatten(),
            changes.total_episodes.flatten(),
            changes.notes.clone().flatten(),
            date_added,
        ),
    )?;
    let id = conn.last_insert_rowid();

    get_item_internal(&conn, id)?.ok_or(AppError::NotFound("Item"))
}

/// Writes only the columns present in `changes`; returns `None` if no row has `id`.
///
/// Keys omitted from the request are left untouched, so an edit cannot clear a
/// rating or episode count by leaving it out. Clearing needs an explicit `null`
/// (`Some(None)` here).
pub fn update_item(
    pool: &DbPool,
    id: i64,
    changes: &ItemChanges,
) -> Result<Option<Item>, AppError> {
    let conn = lock(pool)?;

    let mut updates = Vec::new();
    let mut params: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

    if let Some(title) = &changes.title {
        updates.push("title = ?");
        params.push(Box::new(title.clone()));
    }
    if let Some(kind) = &changes.kind {
        updates.push("type = ?");
        params.push(Box::new(kind.clone()));
    }
    if let Some(status) = &changes.status {
        updates.push("status = ?");
        params.push(Box::new(status.clone()));
    }
    if let Some(rating) = changes.rating {
        updates.push("rating = ?");
        params.push(Box::new(rating));
    }
    if let Some(current) = changes.current_episode {
        updates.push("current_episode = ?");
        params.push(Box::new(current));
    }
    if let Some(total) = changes.total_episodes {
        updates.push("total_episodes = ?");
        params.push(Box::new(total));
    }
    if let Some(notes) = &changes.notes {
        updates.push("notes = ?");
        params.push(Box::new(notes.clone()));
    }

    if updates.is_empty() {
        return get_item_internal(&conn, id);
    }

    params.push(Box::new(id));
    let query = format!("UPDATE items SET {} WHERE id = ?", updates.join(", "));

    let params_refs: Vec<&dyn rusqlite::ToSql> = params.iter().map(|p| p.as_ref()).collect();
    if conn.execute(&query, params_refs.as_slice())? == 0 {
        return Ok(None);
    }

    get_item_internal(&conn, id)
}

pub fn delete_item(pool: &DbPool, id: i64) -> Result<bool, AppError> {
    let conn = lock(pool)?;
    let rows = conn.execute("DELETE FROM items WHERE id = ?1", [id])?;
    Ok(rows > 0)
}
