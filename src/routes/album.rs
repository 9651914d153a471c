//! `/api/album` JSON endpoint.

use serde::Deserialize;
use serde_json::json;

use crate::album::{self, NewEntry};
use crate::error::AlbumError;
use crate::routes::Response;

#[derive(Debug, Deserialize)]
struct AlbumPayload {
    #[serde(default)]
    entries: Option<Vec<NewEntry>>,
}

fn json_error(status: u16, msg: &str) -> Response {
    Response::json(status, json!({ "error": msg }).to_string())
}

fn parse_entries(body: &str) -> Result<Vec<NewEntry>, AlbumError> {
    let payload: AlbumPayload = serde_json::from_str(body)?;
    Ok(payload.entries.unwrap_or_default())
}

/// Handle POST /api/album
/// Body: `{"entries": [{section, placeName, photoUrl, description}, ...]}`
pub fn handle_album_post(body: &str) -> Response {
    let result = parse_entries(body).and_then(|entries| album::with_album(|a| a.append(entries)));
    match result {
        Ok(receipt) => Response::json(
            200,
            json!({
                "success": true,
                "albumId": receipt.album_id,
                "entriesCreated": receipt.entries_created,
            })
            .to_string(),
        ),
        Err(e @ (AlbumError::NoEntries | AlbumError::MalformedPayload(_))) => {
            log::debug!("Rejected album payload: {}", e);
            json_error(e.status(), "No entries provided")
        }
        Err(e) => {
            log::error!("Album save error: {}", e);
            json_error(e.status(), "Failed to save album")
        }
    }
}

/// Handle GET /api/album
pub fn handle_album_get(_query: &str) -> Response {
    match album::with_album(|a| a.list()) {
        Ok(albums) => Response::json(200, json!({ "albums": albums }).to_string()),
        Err(e) => {
            log::error!("Album fetch error: {}", e);
            json_error(500, "Failed to fetch albums")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::album::AlbumStore;
    use crate::config::QuestConfig;
    use crate::error::StorageError;
    use crate::quest::storage::{MemoryStorage, SnapshotStore};
    use serde_json::Value;
    use std::rc::Rc;

    fn install_memory() -> MemoryStorage {
        let mem = MemoryStorage::new();
        album::install(AlbumStore::new(Rc::new(mem.clone()), &QuestConfig::default()));
        mem
    }

    struct Broken;

    impl SnapshotStore for Broken {
        fn load(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Err(StorageError::Unavailable("offline".into()))
        }
        fn save(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::Write("offline".into()))
        }
        fn remove(&self, _key: &str) -> Result<(), StorageError> {
            Ok(())
        }
    }

    fn body(res: &Response) -> Value {
        serde_json::from_str(&res.body).unwrap()
    }

    #[test]
    fn post_creates_entries() {
        install_memory();
        let res = handle_album_post(
            r#"{"entries":[
                {"section":"photobox","placeName":"Snapbooth","photoUrl":null,"description":"cute"},
                {"section":"dinner","placeName":"Flevor","photoUrl":"data:image/jpeg;base64,AA==","description":"pasta"}
            ]}"#,
        );
        assert_eq!(res.status, 200);
        assert_eq!(res.content_type, "application/json");
        let v = body(&res);
        assert_eq!(v["success"], true);
        assert_eq!(v["entriesCreated"], 2);
        assert!(v["albumId"].as_str().unwrap().starts_with("album_"));
    }

    #[test]
    fn post_without_entries_is_400() {
        install_memory();
        for payload in [r#"{}"#, r#"{"entries":[]}"#, r#"{"entries":null}"#] {
            let res = handle_album_post(payload);
            assert_eq!(res.status, 400);
            assert_eq!(body(&res)["error"], "No entries provided");
        }
        let listed = handle_album_get("");
        assert_eq!(body(&listed)["albums"].as_array().unwrap().len(), 0);
    }

    #[test]
    fn post_malformed_is_400() {
        install_memory();
        let res = handle_album_post("not json");
        assert_eq!(res.status, 400);
        assert_eq!(body(&res)["error"], "No entries provided");
    }

    #[test]
    fn get_lists_newest_first() {
        install_memory();
        handle_album_post(r#"{"entries":[{"section":"secret","placeName":"Nomu Space"}]}"#);
        handle_album_post(r#"{"entries":[{"section":"dessert","placeName":"Tamu Kopi"}]}"#);

        let v = body(&handle_album_get(""));
        let albums = v["albums"].as_array().unwrap();
        assert_eq!(albums.len(), 2);
        assert_eq!(albums[0]["placeName"], "Tamu Kopi");
        assert_eq!(albums[1]["placeName"], "Nomu Space");
    }

    #[test]
    fn backend_failures_are_500() {
        album::install(AlbumStore::new(Rc::new(Broken), &QuestConfig::default()));

        let res = handle_album_post(r#"{"entries":[{"section":"dinner","placeName":"Flevor"}]}"#);
        assert_eq!(res.status, 500);
        assert_eq!(body(&res)["error"], "Failed to save album");

        let res = handle_album_get("");
        assert_eq!(res.status, 500);
        assert_eq!(body(&res)["error"], "Failed to fetch albums");
    }
}
