//! Route handlers. Each handler takes the raw query or body string and
//! returns a [`Response`] for the bridge to hand back to the page.

use wasm_bindgen::prelude::*;

pub mod album;
pub mod photo;
pub mod quest;
pub mod util;

/// HTTP-like response passed back across the WASM boundary.
#[wasm_bindgen(getter_with_clone)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub status: u16,
    pub content_type: String,
    pub body: String,
}

impl Response {
    pub fn html(body: String) -> Self {
        Self::html_with_status(200, body)
    }

    pub fn html_with_status(status: u16, body: String) -> Self {
        Self {
            status,
            content_type: "text/html; charset=utf-8".to_string(),
            body,
        }
    }

    pub fn json(status: u16, body: String) -> Self {
        Self {
            status,
            content_type: "application/json".to_string(),
            body,
        }
    }

    /// Red inline error fragment with the given status.
    pub fn error(status: u16, msg: &str) -> Self {
        Self::html_with_status(status, util::error_html(msg))
    }
}
