//! `/api/quest/*` routes: screen rendering, step transitions, and section
//! capture.
//!
//! Every write goes through the thread-local [`Quest`](crate::quest::state::Quest),
//! which persists the snapshot before the handler renders its response.

use crate::album;
use crate::config;
use crate::error::QuestError;
use crate::quest::screens;
use crate::quest::state::{with_quest, with_quest_mut};
use crate::quest::steps;
use crate::routes::Response;
use crate::routes::util::{get_param, parse_form_body, parse_query, section_param};

/// Re-render the current step's screen.
fn current_screen() -> Response {
    let config = config::current();
    Response::html(with_quest(|q| screens::render_screen(q.state(), &config)))
}

fn quest_error(e: QuestError) -> Response {
    log::debug!("Rejected quest request: {}", e);
    Response::error(e.status(), &e.to_string())
}

// ── GET /api/quest/screen ──────────────────────────────────────────

/// Handle GET /api/quest/screen
/// Initial page load; also used after a reload to resume where we left off.
pub fn handle_screen_get(_query: &str) -> Response {
    current_screen()
}

// ── GET /api/quest/section ─────────────────────────────────────────

/// Handle GET /api/quest/section?section={key}
/// Returns the section body for whichever phase the stored flags imply.
pub fn handle_section_get(query: &str) -> Response {
    let params = parse_query(query);
    match section_param(&params) {
        Ok(key) => Response::html(with_quest(|q| {
            screens::render_section_body(key, q.state().section(key))
        })),
        Err(e) => quest_error(e),
    }
}

// ── GET /api/quest/state ───────────────────────────────────────────

/// Handle GET /api/quest/state
/// Returns the full snapshot as JSON for backup.
pub fn handle_state_get(_query: &str) -> Response {
    Response::json(200, with_quest(|q| q.export_json()))
}

// ── POST /api/quest/import ─────────────────────────────────────────

/// Handle POST /api/quest/import
/// Accepts a JSON snapshot (raw body or `state=` form field) and replaces the
/// current state with it.
pub fn handle_import_post(body: &str) -> Response {
    let trimmed = body.trim();
    let params;
    let json = if trimmed.starts_with('{') {
        trimmed
    } else {
        params = parse_form_body(body);
        get_param(&params, "state").unwrap_or(trimmed)
    };

    match with_quest_mut(|q| q.import_json(json)) {
        Ok(()) => Response::html(
            r#"<span class="text-emerald-600">Quest restored successfully</span>"#.to_string(),
        ),
        Err(e) => quest_error(e),
    }
}

// ── POST /api/quest/advance | retreat | reset ──────────────────────

pub fn handle_advance_post(_body: &str) -> Response {
    with_quest_mut(|q| q.advance());
    current_screen()
}

pub fn handle_retreat_post(_body: &str) -> Response {
    with_quest_mut(|q| q.retreat());
    current_screen()
}

pub fn handle_reset_post(_body: &str) -> Response {
    with_quest_mut(|q| q.reset());
    log::info!("Quest reset");
    current_screen()
}

// ── POST /api/quest/mood | mood-after ──────────────────────────────

fn mood_value(body: &str) -> u8 {
    let params = parse_form_body(body);
    let raw: i64 = get_param(&params, "value")
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(50);
    steps::clamp_mood(raw)
}

/// Handle POST /api/quest/mood
/// Body: `value={1..100}`. Stores the check-in mood and moves on.
pub fn handle_mood_post(body: &str) -> Response {
    let value = mood_value(body);
    with_quest_mut(|q| {
        q.set_mood(value);
        q.advance();
    });
    current_screen()
}

/// Handle POST /api/quest/mood-after
pub fn handle_mood_after_post(body: &str) -> Response {
    let value = mood_value(body);
    with_quest_mut(|q| {
        q.set_mood_after(value);
        q.advance();
    });
    current_screen()
}

// ── POST /api/quest/place ──────────────────────────────────────────

/// Handle POST /api/quest/place
/// Body: `section={key}&place={name}`. Only allowed while the section is
/// still in its selection phase.
pub fn handle_place_post(body: &str) -> Response {
    let params = parse_form_body(body);
    let key = match section_param(&params) {
        Ok(k) => k,
        Err(e) => return quest_error(e),
    };
    let place = get_param(&params, "place").unwrap_or("").trim();
    if place.is_empty() {
        return quest_error(QuestError::NoPlaceSelected(key));
    }
    if !key.info().has_option(place) {
        return quest_error(QuestError::UnknownPlace {
            section: key,
            place: place.to_string(),
        });
    }

    Response::html(with_quest_mut(|q| {
        // Venue is locked once arrival is confirmed.
        if !q.state().section(key).confirmed {
            q.set_place(key, place);
        }
        screens::render_section_body(key, q.state().section(key))
    }))
}

// ── POST /api/quest/confirm ────────────────────────────────────────

/// Handle POST /api/quest/confirm
/// Body: `section={key}`. Marks arrival and returns the transient feedback
/// fragment, which loads the documentation form after a short delay.
pub fn handle_confirm_post(body: &str) -> Response {
    let params = parse_form_body(body);
    let key = match section_param(&params) {
        Ok(k) => k,
        Err(e) => return quest_error(e),
    };

    let result = with_quest_mut(|q| {
        if q.state().section(key).place_name.trim().is_empty() {
            return Err(QuestError::NoPlaceSelected(key));
        }
        q.confirm_arrival(key);
        Ok(())
    });

    match result {
        Ok(()) => {
            log::debug!("Arrived at {}", key);
            Response::html(screens::render_feedback(key, &config::current()))
        }
        Err(e) => quest_error(e),
    }
}

// ── POST /api/quest/document ───────────────────────────────────────

/// Handle POST /api/quest/document
/// Body: `section={key}&description={text}`. Requires a captured photo and a
/// non-blank description; on success the step advances.
pub fn handle_document_post(body: &str) -> Response {
    let params = parse_form_body(body);
    let key = match section_param(&params) {
        Ok(k) => k,
        Err(e) => return quest_error(e),
    };
    let description = get_param(&params, "description").unwrap_or("");

    with_quest_mut(|q| match q.save_documentation(key, description) {
        Ok(()) => {
            log::info!("Documented {}", key);
            let config = config::current();
            Response::html(screens::render_screen(q.state(), &config))
        }
        Err(e) => {
            log::debug!("Rejected documentation for {}: {}", key, e);
            Response::html_with_status(
                e.status(),
                screens::render_section_screen(key, q.state().section(key), Some(&e.to_string())),
            )
        }
    })
}

// ── POST /api/quest/album/save ─────────────────────────────────────

/// Handle POST /api/quest/album/save
/// Appends the four sections of this quest to the album store.
pub fn handle_album_save_post(_body: &str) -> Response {
    let entries = with_quest(|q| album::entries_from_quest(q.state()));
    match album::with_album(|a| a.append(entries)) {
        Ok(receipt) => Response::html(format!(
            r#"<div class="w-full py-3.5 text-center text-sm font-medium text-quest-maroon border-[1.5px] border-quest-maroon rounded" data-album-id="{}">&#10003; Album Saved!</div>"#,
            receipt.album_id
        )),
        Err(e) => {
            log::warn!("Failed to save album: {}", e);
            Response::error(e.status(), "Album belum tersimpan, coba lagi ya")
        }
    }
}
