//! Keyboard composer: builds the three-band button layout attached to
//! distributed posts and recomposes just the reaction band when counts
//! change.
//!
//! Band order is always [reaction, custom..., fixed]. Recomposition never
//! needs to know which rows are custom or fixed; it recognizes the reaction
//! band by its `react_` action tags and leaves every other row untouched.

use postbot_core::{CallbackAction, LinkButton, ReactionCounts, ReactionKind};
use teloxide::types::{InlineKeyboardButton, InlineKeyboardButtonKind, InlineKeyboardMarkup};
use tracing::warn;

/// Label for one reaction button: bare icon at zero, `icon count` otherwise.
fn reaction_label(kind: ReactionKind, count: i64) -> String {
    if count == 0 {
        kind.icon().to_string()
    } else {
        format!("{} {}", kind.icon(), count)
    }
}

/// The reaction band: one row, two buttons, tagged `react_<postID>_<kind>`.
fn reaction_band(post_id: i32, counts: ReactionCounts) -> Vec<InlineKeyboardButton> {
    [ReactionKind::Like, ReactionKind::Love]
        .into_iter()
        .map(|kind| {
            InlineKeyboardButton::callback(
                reaction_label(kind, counts.get(kind)),
                CallbackAction::React { post_id, kind }.encode(),
            )
        })
        .collect()
}

/// Turns a stored link button into a URL button, skipping entries whose URL
/// no longer parses (they are validated on entry, so this is a guard, not a
/// code path users should hit).
fn url_button(button: &LinkButton) -> Option<InlineKeyboardButton> {
    match button.url.parse::<reqwest::Url>() {
        Ok(url) => Some(InlineKeyboardButton::url(button.text.clone(), url)),
        Err(e) => {
            warn!(url = %button.url, error = %e, "Skipping button with unparsable URL");
            None
        }
    }
}

/// Builds the full layout: reaction band, one row per custom button in
/// profile order, then the configured fixed row if any. Never fails.
pub fn compose(
    post_id: i32,
    counts: ReactionCounts,
    custom_buttons: &[LinkButton],
    fixed_row: Option<&LinkButton>,
) -> InlineKeyboardMarkup {
    let mut rows = vec![reaction_band(post_id, counts)];
    for button in custom_buttons {
        if let Some(b) = url_button(button) {
            rows.push(vec![b]);
        }
    }
    if let Some(b) = fixed_row.and_then(url_button) {
        rows.push(vec![b]);
    }
    InlineKeyboardMarkup::new(rows)
}

fn is_reaction_button(button: &InlineKeyboardButton) -> bool {
    matches!(
        &button.kind,
        InlineKeyboardButtonKind::CallbackData(data) if CallbackAction::is_reaction_tag(data)
    )
}

/// Replaces the reaction band inside a live layout with a fresh one built
/// from `counts`, leaving all other rows byte-for-byte unchanged, in order.
/// If no row carries reaction tags the new band is prepended; an empty
/// layout therefore degenerates to `compose(post_id, counts, &[], None)`.
pub fn recompose_reaction_band(
    existing: &InlineKeyboardMarkup,
    post_id: i32,
    counts: ReactionCounts,
) -> InlineKeyboardMarkup {
    let band = reaction_band(post_id, counts);
    let mut rows = existing.inline_keyboard.clone();

    match rows.iter().position(|row| row.iter().any(is_reaction_button)) {
        Some(i) => rows[i] = band,
        None => rows.insert(0, band),
    }
    InlineKeyboardMarkup::new(rows)
}
