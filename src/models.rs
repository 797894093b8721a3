use serde::{Deserialize, Serialize};

pub const MEDIA_TYPES: [&str; 2] = ["Movie", "TV Show"];
pub const STATUSES: [&str; 4] = ["Planned", "Watching", "Completed", "Dropped"];

pub const DEFAULT_TYPE: &str = "Movie";
pub const DEFAULT_STATUS: &str = "Planned";
pub const TV_SHOW: &str = "TV Show";

pub const RATING_MIN: i64 = 1;
pub const RATING_MAX: i64 = 10;

/// A tracked movie or TV show as it travels over the Items API.
///
/// `kind` and `status` stay plain strings so values the backend adds later
/// render instead of failing to parse.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: String,
    pub title: String,
    #[serde(rename = "type", default = "default_type")]
    pub kind: String,
    #[serde(default = "default_status")]
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_episode: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_episodes: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_added: Option<String>,
}

impl Item {
    pub fn is_tv_show(&self) -> bool {
        self.kind == TV_SHOW
    }
}

/// Body the dashboard sends on create and update.
///
/// `notes` is always present (null when blank); rating and episode fields
/// are left out entirely when they have no value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemPayload {
    pub title: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_episode: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_episodes: Option<i64>,
    pub notes: Option<String>,
}

/// Validated fields of a create or update request.
///
/// For the optional columns the outer `Option` says whether the key was
/// sent at all and the inner one whether it was `null`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ItemChanges {
    pub title: Option<String>,
    pub kind: Option<String>,
    pub status: Option<String>,
    pub rating: Option<Option<i64>>,
    pub current_episode: Option<Option<i64>>,
    pub total_episodes: Option<Option<i64>>,
    pub notes: Option<Option<String>>,
}

impl ItemChanges {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.kind.is_none()
            && self.status.is_none()
            && self.rating.is_none()
            && self.current_episode.is_none()
            && self.total_episodes.is_none()
            && self.notes.is_none()
    }
}

fn default_type() -> String {
    DEFAULT_TYPE.to_string()
}

fn default_status() -> String {
    DEFAULT_STATUS.to_string()
}
