//! Valentine quest in-browser WASM server.
//!
//! Exports `handle_request(method, path, query, body)` for the page's HTMX
//! bridge to call, plus `init` for one-time setup and `upload_photo` for raw
//! file bytes. Uses `matchit` for URL routing, the same router engine that
//! powers Axum.
//!
//! State is a single quest snapshot held in WASM memory and written through
//! to localStorage after every mutation, so a reload resumes at the same
//! screen. Finished quests can be appended to a local album.

use wasm_bindgen::prelude::*;

pub mod album;
pub mod config;
pub mod error;
pub mod photo;
pub mod quest;
pub mod routes;

pub use routes::Response;

/// One-time setup. `config_json` may be empty; unknown or invalid fields fall
/// back to defaults.
#[wasm_bindgen]
pub fn init(config_json: &str) {
    let config = match config::QuestConfig::from_json(config_json) {
        Ok(c) => c,
        Err(e) => {
            log::warn!("Ignoring invalid quest config: {}", e);
            config::QuestConfig::default()
        }
    };

    #[cfg(target_arch = "wasm32")]
    {
        console_error_panic_hook::set_once();
        // Already initialised on a second call; keep the first logger.
        let _ = console_log::init_with_level(config.log_level());
    }

    let store = quest::storage::default_store();
    if !store.is_durable() {
        log::error!(
            "No localStorage on this thread; quest progress will be lost on reload. Load the module on the page's main thread."
        );
    }
    quest::state::install(quest::state::Quest::load(store.clone(), &config));
    album::install(album::AlbumStore::new(store, &config));
    config::install(config);

    log::info!("Quest server ready");
}

/// Process an HTTP-like request.
///
/// # Arguments
/// * `method`: HTTP method (e.g., "GET", "POST")
/// * `path`: URL path (e.g., "/api/quest/screen")
/// * `query`: Query string (e.g., "?section=dinner")
/// * `body`: Request body (form data or JSON). Empty string for GET requests.
///
/// # Returns
/// A [`Response`]: HTML fragments for `/api/quest/*`, JSON for `/api/album`
/// and `/api/quest/state`.
#[wasm_bindgen]
pub fn handle_request(method: &str, path: &str, query: &str, body: &str) -> Response {
    let mut router = matchit::Router::new();

    router.insert("/api/quest/screen", "screen").ok();
    router.insert("/api/quest/section", "section").ok();
    router.insert("/api/quest/state", "state").ok();
    router.insert("/api/quest/import", "import").ok();
    router.insert("/api/quest/advance", "advance").ok();
    router.insert("/api/quest/retreat", "retreat").ok();
    router.insert("/api/quest/reset", "reset").ok();
    router.insert("/api/quest/mood", "mood").ok();
    router.insert("/api/quest/mood-after", "mood_after").ok();
    router.insert("/api/quest/place", "place").ok();
    router.insert("/api/quest/confirm", "confirm").ok();
    router.insert("/api/quest/document", "document").ok();
    router.insert("/api/quest/album/save", "album_save").ok();

    router.insert("/api/album", "album").ok();

    log::trace!("{} {}{}", method, path, query);

    match router.at(path) {
        Ok(matched) => match (*matched.value, method) {
            ("screen", "GET") => routes::quest::handle_screen_get(query),
            ("section", "GET") => routes::quest::handle_section_get(query),
            ("state", "GET") => routes::quest::handle_state_get(query),

            ("import", "POST") => routes::quest::handle_import_post(body),
            ("advance", "POST") => routes::quest::handle_advance_post(body),
            ("retreat", "POST") => routes::quest::handle_retreat_post(body),
            ("reset", "POST") => routes::quest::handle_reset_post(body),
            ("mood", "POST") => routes::quest::handle_mood_post(body),
            ("mood_after", "POST") => routes::quest::handle_mood_after_post(body),
            ("place", "POST") => routes::quest::handle_place_post(body),
            ("confirm", "POST") => routes::quest::handle_confirm_post(body),
            ("document", "POST") => routes::quest::handle_document_post(body),
            ("album_save", "POST") => routes::quest::handle_album_save_post(body),

            ("album", "GET") => routes::album::handle_album_get(query),
            ("album", "POST") => routes::album::handle_album_post(body),

            _ => method_not_allowed(),
        },
        Err(_) => not_found(),
    }
}

/// Normalize a chosen photo and attach it to `section`.
///
/// Returns the preview fragment for `#photo-{section}`, or an error fragment
/// with the section's previous photo left in place.
#[wasm_bindgen]
pub fn upload_photo(section: &str, bytes: &[u8]) -> Response {
    routes::photo::handle_upload(section, bytes)
}

fn not_found() -> Response {
    Response::error(404, "404 route not found")
}

fn method_not_allowed() -> Response {
    Response::error(405, "405 method not allowed")
}
