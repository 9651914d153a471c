//! Photo upload entry point. Raw file bytes come from the page's file input
//! via the `upload_photo` export rather than a form body.

use crate::config;
use crate::photo;
use crate::quest::screens;
use crate::quest::sections::SectionKey;
use crate::quest::state::with_quest_mut;
use crate::routes::Response;

/// Normalize `bytes` and attach the result to `section`. On any failure the
/// section keeps whatever photo it had.
pub fn handle_upload(section: &str, bytes: &[u8]) -> Response {
    let key: SectionKey = match section.parse() {
        Ok(k) => k,
        Err(e) => return Response::error(400, &format!("{}", e)),
    };

    let pipeline = config::current().pipeline;
    match photo::normalize(bytes, &pipeline) {
        Ok(normalized) => {
            let html = screens::render_photo_preview(key, Some(&normalized.data_url));
            with_quest_mut(|q| q.set_photo(key, normalized.data_url));
            Response::html(html)
        }
        Err(e) => {
            log::warn!("Photo for {} rejected: {}", key, e);
            Response::error(e.status(), "Gagal upload foto, coba lagi ya")
        }
    }
}
