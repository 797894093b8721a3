use std::fmt::Write;

use crate::dashboard::form::{Field, ItemForm, ModalState};
use crate::dashboard::notify::Notification;
use crate::models::{Item, MEDIA_TYPES, STATUSES};

/// What the list region currently shows.
#[derive(Debug, Clone, PartialEq)]
pub enum ListView {
    Loading,
    Loaded(Vec<Item>),
}

impl Default for ListView {
    fn default() -> Self {
        ListView::Loaded(Vec::new())
    }
}

impl ListView {
    pub fn is_loading(&self) -> bool {
        matches!(self, ListView::Loading)
    }

    /// Items that currently have a card on screen.
    pub fn cards(&self) -> &[Item] {
        match self {
            ListView::Loading => &[],
            ListView::Loaded(items) => items,
        }
    }

    pub fn shows_empty_state(&self) -> bool {
        matches!(self, ListView::Loaded(items) if items.is_empty())
    }

    pub fn find(&self, id: &str) -> Option<&Item> {
        self.cards().iter().find(|item| item.id == id)
    }

    pub fn render(&self) -> String {
        match self {
            ListView::Loading => r#"<div class="loading">Loading…</div>"#.to_string(),
            ListView::Loaded(items) if items.is_empty() => render_empty_state(),
            ListView::Loaded(items) => {
                let mut html = String::from(r#"<div class="item-list">"#);
                for item in items {
                    html.push_str(&render_item_card(item));
                }
                html.push_str("</div>");
                html
            }
        }
    }
}

pub fn escape_html(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Lowercases and turns each whitespace run into a single `-`.
fn slug(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut in_space = false;
    for ch in value.chars() {
        if ch.is_whitespace() {
            if !in_space {
                out.push('-');
            }
            in_space = true;
        } else {
            out.extend(ch.to_lowercase());
            in_space = false;
        }
    }
    out
}

pub fn status_class(status: &str) -> String {
    format!("status-{}", slug(status))
}

pub fn type_class(kind: &str) -> String {
    format!("type-{}", slug(kind))
}

/// `Episode 3 / 62`, with `?` for whichever count is unknown. Only for TV shows
/// that have at least one count.
pub fn progress_text(item: &Item) -> Option<String> {
    if !item.is_tv_show() || (item.current_episode.is_none() && item.total_episodes.is_none()) {
        return None;
    }
    let show = |n: Option<i64>| n.map_or_else(|| "?".to_string(), |n| n.to_string());
    Some(format!(
        "Episode {} / {}",
        show(item.current_episode),
        show(item.total_episodes)
    ))
}

pub fn render_item_card(item: &Item) -> String {
    let id = escape_html(&item.id);
    let mut html = String::new();

    let _ = write!(
        html,
        r#"<article class="item-card" data-id="{id}"><div class="item-header"><h3 class="item-title">{title}</h3><div class="item-badges"><span class="badge {type_class}">{kind}</span><span class="badge {status_class}">{status}</span></div></div>"#,
        title = escape_html(&item.title),
        type_class = escape_html(&type_class(&item.kind)),
        kind = escape_html(&item.kind),
        status_class = escape_html(&status_class(&item.status)),
        status = escape_html(&item.status),
    );

    if let Some(rating) = item.rating {
        let _ = write!(html, r#"<p class="item-rating">★ {rating}/10</p>"#);
    }
    if let Some(progress) = progress_text(item) {
        let _ = write!(html, r#"<p class="item-progress">{progress}</p>"#);
    }
    if let Some(notes) = item.notes.as_deref().filter(|n| !n.is_empty()) {
        let notes = escape_html(notes);
        let _ = write!(html, r#"<p class="item-notes" title="{notes}">{notes}</p>"#);
    }

    let _ = write!(
        html,
        r#"<div class="item-actions"><button type="button" class="btn btn-edit" data-action="edit" data-id="{id}">Edit</button><button type="button" class="btn btn-delete" data-action="delete" data-id="{id}">Delete</button></div></article>"#
    );
    html
}

fn render_empty_state() -> String {
    r#"<div class="empty-state"><p>Your watchlist is empty.</p><button type="button" class="btn btn-primary" data-action="add">Add your first item</button></div>"#.to_string()
}

pub fn render_notification(notification: Option<&Notification>) -> String {
    match notification {
        Some(n) => format!(
            r#"<div id="message" class="message {}" role="status">{}</div>"#,
            n.kind.css_class(),
            escape_html(&n.message)
        ),
        None => r#"<div id="message" class="message" role="status" hidden></div>"#.to_string(),
    }
}

fn render_text_input(html: &mut String, form: &ItemForm, field: Field, label: &str, kind: &str) {
    let invalid = form.error(field).is_some();
    let _ = write!(
        html,
        r#"<div class="form-group"><label for="{name}">{label}</label><input type="{kind}" id="{name}" name="{name}" value="{value}"{class}>"#,
        name = field.name(),
        value = escape_html(form.fields().get(field)),
        class = if invalid { r#" class="is-invalid""# } else { "" },
    );
    if let Some(error) = form.error(field) {
        let _ = write!(html, r#"<p class="field-error">{}</p>"#, escape_html(error));
    }
    html.push_str("</div>");
}

fn render_select(html: &mut String, form: &ItemForm, field: Field, label: &str, options: &[&str]) {
    let current = form.fields().get(field);
    let _ = write!(
        html,
        r#"<div class="form-group"><label for="{name}">{label}</label><select id="{name}" name="{name}">"#,
        name = field.name(),
    );
    // Values the backend knows about but this build doesn't are kept selectable.
    let unknown = (!options.contains(&current)).then_some(current);
    for option in options.iter().copied().chain(unknown) {
        let _ = write!(
            html,
            r#"<option value="{value}"{selected}>{value}</option>"#,
            value = escape_html(option),
            selected = if option == current { " selected" } else { "" },
        );
    }
    html.push_str("</select></div>");
}

pub fn render_form(form: &ItemForm) -> String {
    let heading = match form.state() {
        ModalState::OpenForEdit(_) => "Edit item",
        _ => "Add item",
    };
    let mut html = String::new();

    let _ = write!(
        html,
        r#"<div id="item-modal" class="modal"{hidden}><div class="modal-backdrop" data-action="close"></div><div class="modal-content"><div class="modal-header"><h2>{heading}</h2><button type="button" class="modal-close" data-action="close" aria-label="Close">&times;</button></div><form id="item-form" novalidate><input type="hidden" id="item-id" name="id" value="{id}">"#,
        hidden = if form.is_open() { "" } else { " hidden" },
        id = escape_html(&form.fields().id),
    );

    render_text_input(&mut html, form, Field::Title, "Title", "text");
    render_select(&mut html, form, Field::Type, "Type", &MEDIA_TYPES);
    render_select(&mut html, form, Field::Status, "Status", &STATUSES);
    render_text_input(&mut html, form, Field::Rating, "Rating (1-10)", "number");

    let _ = write!(
        html,
        r#"<div id="episode-fields" class="form-row"{}>"#,
        if form.episodes_visible() { "" } else { " hidden" }
    );
    render_text_input(&mut html, form, Field::CurrentEpisode, "Current episode", "number");
    render_text_input(&mut html, form, Field::TotalEpisodes, "Total episodes", "number");
    html.push_str("</div>");

    let _ = write!(
        html,
        r#"<div class="form-group"><label for="notes">Notes</label><textarea id="notes" name="notes" rows="3">{}</textarea></div>"#,
        escape_html(form.fields().get(Field::Notes))
    );

    html.push_str(r#"<div class="form-actions"><button type="button" class="btn" data-action="cancel">Cancel</button><button type="submit" class="btn btn-primary">Save</button></div></form></div></div>"#);
    html
}

/// Full dashboard document with the list, modal and message region.
pub fn render_page(
    list: &ListView,
    form: &ItemForm,
    notification: Option<&Notification>,
    base_path: &str,
) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <title>Watchlist</title>
    <link rel="stylesheet" href="{base}/static/style.css">
    <script src="{base}/static/app.js" defer></script>
</head>
<body data-base-path="{base}">
    <header class="page-header">
        <h1>Watchlist</h1>
        <button type="button" class="btn btn-primary" data-action="add">Add item</button>
    </header>
    {message}
    <main id="items">{list}</main>
    <template id="empty-state-template">{empty}</template>
    {form}
</body>
</html>
"#,
        base = escape_html(base_path),
        message = render_notification(notification),
        list = list.render(),
        empty = render_empty_state(),
        form = render_form(form),
    )
}
