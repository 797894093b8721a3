use serde_json::{Map, Value};

use crate::error::AppError;
use crate::models::{ItemChanges, MEDIA_TYPES, RATING_MAX, RATING_MIN, STATUSES};

const ITEM_FIELDS: [&str; 8] = [
    "title",
    "type",
    "status",
    "rating",
    "current_episode",
    "total_episodes",
    "notes",
    "date_added",
];

const EPISODE_FIELDS: [&str; 2] = ["current_episode", "total_episodes"];

/// Checks a create/update body and extracts the fields to write.
///
/// `date_added` is accepted for compatibility but never written; the server
/// owns that column.
pub fn parse_item_body(body: &Value, for_update: bool) -> Result<ItemChanges, AppError> {
    let Some(map) = body.as_object() else {
        return Err(bad("Request body must be JSON object"));
    };

    if !for_update && matches!(map.get("title"), None | Some(Value::Null)) {
        return Err(bad("Missing required field: title"));
    }

    let title = match map.get("title") {
        None => None,
        Some(Value::String(s)) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Some(_) => return Err(bad("title is required and cannot be empty")),
    };

    if let Some(key) = map.keys().find(|k| !ITEM_FIELDS.contains(&k.as_str())) {
        return Err(AppError::BadRequest(format!("Unknown field: {key}")));
    }

    let kind = one_of(map, "type", &MEDIA_TYPES)?;
    let status = one_of(map, "status", &STATUSES)?;

    let rating = match map.get("rating") {
        None => None,
        Some(Value::Null) => Some(None),
        Some(value) => {
            let rating = as_integer(value).ok_or_else(|| bad("rating must be an integer"))?;
            if !(RATING_MIN..=RATING_MAX).contains(&rating) {
                return Err(AppError::BadRequest(format!(
                    "rating must be between {RATING_MIN} and {RATING_MAX}"
                )));
            }
            Some(Some(rating))
        }
    };

    let mut episodes = [None, None];
    for (slot, field) in episodes.iter_mut().zip(EPISODE_FIELDS) {
        *slot = match map.get(field) {
            None => None,
            Some(Value::Null) => Some(None),
            Some(value) => {
                let count = as_integer(value)
                    .ok_or_else(|| AppError::BadRequest(format!("{field} must be a number")))?;
                if count < 0 {
                    return Err(AppError::BadRequest(format!("{field} must be non-negative")));
                }
                Some(Some(count))
            }
        };
    }
    let [current_episode, total_episodes] = episodes;

    let notes = match map.get("notes") {
        None => None,
        Some(Value::Null) => Some(None),
        Some(Value::String(s)) => Some(Some(s.clone())),
        Some(_) => return Err(bad("notes must be a string")),
    };

    Ok(ItemChanges {
        title,
        kind,
        status,
        rating,
        current_episode,
        total_episodes,
        notes,
    })
}

fn one_of(
    map: &Map<String, Value>,
    field: &str,
    allowed: &[&str],
) -> Result<Option<String>, AppError> {
    match map.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) if allowed.contains(&s.as_str()) => Ok(Some(s.clone())),
        Some(_) => Err(AppError::BadRequest(format!(
            "{field} must be one of: {}",
            allowed.join(", ")
        ))),
    }
}

/// Integers may arrive as JSON numbers or as numeric strings from form inputs.
/// Whole floats are accepted only inside the `i64` range; `as` would saturate.
fn as_integer(value: &Value) -> Option<i64> {
    // 2^63, the first float past i64::MAX.
    const LIMIT: f64 = 9_223_372_036_854_775_808.0;
    match value {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.fract() == 0.0 && *f >= -LIMIT && *f < LIMIT)
                .map(|f| f as i64)
        }),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn bad(msg: &str) -> AppError {
    AppError::BadRequest(msg.to_string())
}
