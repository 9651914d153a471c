//! Album store: the record-append backend behind `/api/album`.
//!
//! Each save appends one batch of entries tagged with a fresh album id.
//! Batches are persisted as one JSON document under the album storage key and
//! listed newest first.

use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::rc::Rc;

use crate::config::{self, QuestConfig};
use crate::error::{AlbumError, StorageError};
use crate::quest::sections::SectionKey;
use crate::quest::state::QuestState;
use crate::quest::storage::{self, SnapshotStore};

/// One entry as submitted by the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewEntry {
    pub section: String,
    #[serde(default)]
    pub place_name: String,
    #[serde(default)]
    pub photo_url: Option<String>,
    #[serde(default)]
    pub description: String,
}

/// A stored entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlbumEntry {
    pub album_id: String,
    /// Insertion order across all batches; larger is newer.
    pub seq: u64,
    pub section: String,
    pub place_name: String,
    pub photo_url: Option<String>,
    pub description: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct AlbumData {
    next_seq: u64,
    entries: Vec<AlbumEntry>,
}

/// Result of a successful append.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppendReceipt {
    pub album_id: String,
    pub entries_created: usize,
}

pub struct AlbumStore {
    store: Rc<dyn SnapshotStore>,
    key: String,
}

impl AlbumStore {
    pub fn new(store: Rc<dyn SnapshotStore>, config: &QuestConfig) -> Self {
        Self {
            store,
            key: config.album_key.clone(),
        }
    }

    fn read(&self) -> Result<AlbumData, StorageError> {
        match self.store.load(&self.key)? {
            Some(json) => Ok(serde_json::from_str(&json)?),
            None => Ok(AlbumData::default()),
        }
    }

    /// Append `entries` as one new batch. Nothing is written when the list is
    /// empty or the write fails.
    ///
    /// Inline `data:` photos are not kept: the quest snapshot already holds
    /// them and a second copy would not fit the storage quota. Linked photos
    /// are kept as-is.
    pub fn append(&self, entries: Vec<NewEntry>) -> Result<AppendReceipt, AlbumError> {
        if entries.is_empty() {
            return Err(AlbumError::NoEntries);
        }

        let mut data = self.read()?;
        let album_id = new_album_id();
        let count = entries.len();

        for entry in entries {
            data.entries.push(AlbumEntry {
                album_id: album_id.clone(),
                seq: data.next_seq,
                section: entry.section,
                place_name: entry.place_name,
                photo_url: entry.photo_url.filter(|url| !url.starts_with("data:")),
                description: entry.description,
            });
            data.next_seq += 1;
        }

        let json = serde_json::to_string(&data).map_err(StorageError::from)?;
        self.store.save(&self.key, &json)?;
        log::info!("Saved album {} with {} entries", album_id, count);

        Ok(AppendReceipt {
            album_id,
            entries_created: count,
        })
    }

    /// All stored entries, newest first.
    pub fn list(&self) -> Result<Vec<AlbumEntry>, AlbumError> {
        let mut entries = self.read()?.entries;
        entries.sort_by(|a, b| b.seq.cmp(&a.seq));
        Ok(entries)
    }
}

fn new_album_id() -> String {
    format!("album_{}", uuid::Uuid::new_v4().simple())
}

/// Album entries for the four sections of a finished quest, in itinerary
/// order.
pub fn entries_from_quest(state: &QuestState) -> Vec<NewEntry> {
    SectionKey::ALL
        .iter()
        .map(|&key| {
            let record = state.section(key);
            NewEntry {
                section: key.as_str().to_string(),
                place_name: record.place_name.clone(),
                photo_url: record.photo.clone(),
                description: record.description.clone(),
            }
        })
        .collect()
}

thread_local! {
    static ALBUM: RefCell<AlbumStore> =
        RefCell::new(AlbumStore::new(storage::default_store(), &config::current()));
}

/// Execute a closure with the active album store.
pub fn with_album<F, R>(f: F) -> R
where
    F: FnOnce(&AlbumStore) -> R,
{
    ALBUM.with(|a| f(&a.borrow()))
}

/// Replace the active album store (used by `init` and tests).
pub fn install(album: AlbumStore) {
    ALBUM.with(|a| *a.borrow_mut() = album);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quest::storage::MemoryStorage;

    fn store() -> (AlbumStore, MemoryStorage) {
        let mem = MemoryStorage::new();
        (AlbumStore::new(Rc::new(mem.clone()), &QuestConfig::default()), mem)
    }

    fn entry(section: &str, place: &str) -> NewEntry {
        NewEntry {
            section: section.to_string(),
            place_name: place.to_string(),
            photo_url: None,
            description: format!("at {}", place),
        }
    }

    #[test]
    fn append_empty_is_rejected_without_write() {
        let (album, mem) = store();
        let err = album.append(Vec::new()).unwrap_err();
        assert!(matches!(err, AlbumError::NoEntries));
        assert!(mem.load("valentine-quest-album").unwrap().is_none());
    }

    #[test]
    fn append_three_entries() {
        let (album, _) = store();
        let receipt = album
            .append(vec![
                entry("photobox", "Photoplace (Tentrem)"),
                entry("dinner", "Flevor"),
                entry("dessert", "Desserts Here!"),
            ])
            .unwrap();
        assert_eq!(receipt.entries_created, 3);
        assert!(receipt.album_id.starts_with("album_"));
        assert_eq!(album.list().unwrap().len(), 3);
    }

    #[test]
    fn album_ids_are_distinct() {
        let (album, _) = store();
        let a = album.append(vec![entry("dinner", "Flevor")]).unwrap();
        let b = album.append(vec![entry("dinner", "Flevor")]).unwrap();
        assert_ne!(a.album_id, b.album_id);
    }

    #[test]
    fn list_is_newest_first() {
        let (album, _) = store();
        let first = album.append(vec![entry("dinner", "Flevor")]).unwrap();
        let second = album.append(vec![entry("dessert", "Desserts Here!")]).unwrap();
        let listed = album.list().unwrap();
        assert_eq!(listed[0].album_id, second.album_id);
        assert_eq!(listed[1].album_id, first.album_id);
    }

    #[test]
    fn batches_survive_a_new_store_instance() {
        let (album, mem) = store();
        album.append(vec![entry("secret", "Nomu Space")]).unwrap();
        let reopened = AlbumStore::new(Rc::new(mem), &QuestConfig::default());
        let listed = reopened.list().unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].place_name, "Nomu Space");
    }

    #[test]
    fn corrupt_album_document_is_backend_error() {
        let (album, mem) = store();
        mem.save("valentine-quest-album", "{{{").unwrap();
        let err = album.list().unwrap_err();
        assert_eq!(err.status(), 500);
    }

    #[test]
    fn inline_photos_are_not_duplicated() {
        let (album, mem) = store();
        let mut inline = entry("dinner", "Flevor");
        inline.photo_url = Some(format!("data:image/jpeg;base64,{}", "A".repeat(10_000)));
        let mut linked = entry("dessert", "Desserts Here!");
        linked.photo_url = Some("https://example.com/dessert.jpg".to_string());
        album.append(vec![inline, linked]).unwrap();

        let listed = album.list().unwrap();
        assert_eq!(listed[1].photo_url, None);
        assert_eq!(listed[0].photo_url.as_deref(), Some("https://example.com/dessert.jpg"));
        assert!(mem.load("valentine-quest-album").unwrap().unwrap().len() < 1_000);
    }

    #[test]
    fn entries_from_quest_cover_all_sections() {
        let state = QuestState::initial("Nomu Space");
        let entries = entries_from_quest(&state);
        let sections: Vec<&str> = entries.iter().map(|e| e.section.as_str()).collect();
        assert_eq!(sections, vec!["photobox", "secret", "dinner", "dessert"]);
        assert_eq!(entries[1].place_name, "Nomu Space");
    }
}
