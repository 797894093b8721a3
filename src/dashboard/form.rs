use std::collections::BTreeMap;

use crate::models::{
    Item, ItemPayload, DEFAULT_STATUS, DEFAULT_TYPE, RATING_MAX, RATING_MIN, TV_SHOW,
};

pub const TITLE_REQUIRED: &str = "Title is required.";
pub const RATING_OUT_OF_RANGE: &str = "Rating must be between 1 and 10.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    Title,
    Type,
    Status,
    Rating,
    CurrentEpisode,
    TotalEpisodes,
    Notes,
}

impl Field {
    /// Input name used in the rendered form.
    pub fn name(self) -> &'static str {
        match self {
            Field::Title => "title",
            Field::Type => "type",
            Field::Status => "status",
            Field::Rating => "rating",
            Field::CurrentEpisode => "current_episode",
            Field::TotalEpisodes => "total_episodes",
            Field::Notes => "notes",
        }
    }
}

pub type FieldErrors = BTreeMap<Field, &'static str>;

/// Raw text of every form input, exactly as typed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormFields {
    /// Hidden input; non-empty while editing an existing item.
    pub id: String,
    pub title: String,
    pub kind: String,
    pub status: String,
    pub rating: String,
    pub current_episode: String,
    pub total_episodes: String,
    pub notes: String,
}

impl Default for FormFields {
    fn default() -> Self {
        Self {
            id: String::new(),
            title: String::new(),
            kind: DEFAULT_TYPE.to_string(),
            status: DEFAULT_STATUS.to_string(),
            rating: String::new(),
            current_episode: String::new(),
            total_episodes: String::new(),
            notes: String::new(),
        }
    }
}

impl FormFields {
    pub fn from_item(item: &Item) -> Self {
        fn text(value: Option<i64>) -> String {
            value.map(|v| v.to_string()).unwrap_or_default()
        }

        Self {
            id: item.id.clone(),
            title: item.title.clone(),
            kind: item.kind.clone(),
            status: item.status.clone(),
            rating: text(item.rating),
            current_episode: text(item.current_episode),
            total_episodes: text(item.total_episodes),
            notes: item.notes.clone().unwrap_or_default(),
        }
    }

    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::Title => &self.title,
            Field::Type => &self.kind,
            Field::Status => &self.status,
            Field::Rating => &self.rating,
            Field::CurrentEpisode => &self.current_episode,
            Field::TotalEpisodes => &self.total_episodes,
            Field::Notes => &self.notes,
        }
    }

    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        let value = value.into();
        match field {
            Field::Title => self.title = value,
            Field::Type => self.kind = value,
            Field::Status => self.status = value,
            Field::Rating => self.rating = value,
            Field::CurrentEpisode => self.current_episode = value,
            Field::TotalEpisodes => self.total_episodes = value,
            Field::Notes => self.notes = value,
        }
    }

    pub fn is_tv_show(&self) -> bool {
        self.kind == TV_SHOW
    }
}

/// Checks every field at once and reports all failures together.
pub fn validate_form(fields: &FormFields) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::new();

    if fields.title.trim().is_empty() {
        errors.insert(Field::Title, TITLE_REQUIRED);
    }

    let rating = fields.rating.trim();
    if !rating.is_empty() {
        let in_range = rating
            .parse::<i64>()
            .is_ok_and(|r| (RATING_MIN..=RATING_MAX).contains(&r));
        if !in_range {
            errors.insert(Field::Rating, RATING_OUT_OF_RANGE);
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Builds the create/update body from the current inputs.
///
/// Episode counts are only sent for TV shows, so values typed before
/// switching the type to Movie never leave the form.
pub fn get_form_payload(fields: &FormFields) -> ItemPayload {
    fn integer(raw: &str) -> Option<i64> {
        let raw = raw.trim();
        if raw.is_empty() {
            None
        } else {
            raw.parse().ok()
        }
    }

    let notes = fields.notes.trim();
    let (current_episode, total_episodes) = if fields.is_tv_show() {
        (integer(&fields.current_episode), integer(&fields.total_episodes))
    } else {
        (None, None)
    };

    ItemPayload {
        title: fields.title.trim().to_string(),
        kind: fields.kind.clone(),
        status: fields.status.clone(),
        rating: integer(&fields.rating),
        current_episode,
        total_episodes,
        notes: (!notes.is_empty()).then(|| notes.to_string()),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModalState {
    Closed,
    OpenForAdd,
    OpenForEdit(String),
}

/// What dismissed the modal. All of them discard unsaved input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseTrigger {
    CloseButton,
    CancelButton,
    Backdrop,
    EscapeKey,
}

/// The add/edit modal: open state, input values and field-level errors.
#[derive(Debug, Clone)]
pub struct ItemForm {
    state: ModalState,
    fields: FormFields,
    errors: FieldErrors,
}

impl Default for ItemForm {
    fn default() -> Self {
        Self::new()
    }
}

impl ItemForm {
    pub fn new() -> Self {
        Self {
            state: ModalState::Closed,
            fields: FormFields::default(),
            errors: FieldErrors::new(),
        }
    }

    pub fn state(&self) -> &ModalState {
        &self.state
    }

    pub fn is_open(&self) -> bool {
        self.state != ModalState::Closed
    }

    pub fn fields(&self) -> &FormFields {
        &self.fields
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub fn error(&self, field: Field) -> Option<&'static str> {
        self.errors.get(&field).copied()
    }

    /// Episode inputs are shown only for TV shows. Hidden inputs keep their text.
    pub fn episodes_visible(&self) -> bool {
        self.fields.is_tv_show()
    }

    pub fn open_for_add(&mut self) {
        self.fields = FormFields::default();
        self.errors.clear();
        self.state = ModalState::OpenForAdd;
    }

    pub fn open_for_edit(&mut self, item: &Item) {
        self.fields = FormFields::from_item(item);
        self.errors.clear();
        self.state = ModalState::OpenForEdit(item.id.clone());
    }

    /// Returns `false` when the modal was already closed.
    pub fn close(&mut self) -> bool {
        if !self.is_open() {
            return false;
        }
        self.state = ModalState::Closed;
        self.fields = FormFields::default();
        self.errors.clear();
        true
    }

    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        self.fields.set(field, value);
    }

    /// Replaces the stored errors with the result of a fresh check.
    pub fn validate(&mut self) -> bool {
        self.errors.clear();
        match validate_form(&self.fields) {
            Ok(()) => true,
            Err(errors) => {
                self.errors = errors;
                false
            }
        }
    }

    pub fn payload(&self) -> ItemPayload {
        get_form_payload(&self.fields)
    }

    /// Id from the hidden input; `None` means the submit is a create.
    pub fn edit_id(&self) -> Option<&str> {
        let id = self.fields.id.trim();
        (!id.is_empty()).then_some(id)
    }
}
