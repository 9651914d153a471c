//! Quest state machine: the single source of truth for session progress.
//!
//! Uses `thread_local!` + `RefCell` for safe mutable access in single-threaded
//! WASM. Every mutation goes through [`Quest`], which writes the whole
//! snapshot back to its [`SnapshotStore`] before returning, so what the next
//! page load rehydrates is always what the last request left in memory.
//!
//! ## Persisted shape
//!
//! ```text
//! "valentine-quest" → {
//!   "state": {
//!     "currentStep": 3,
//!     "mood": 75, "moodAfter": null,
//!     "sections": { "photobox": { "placeName", "photo", "description",
//!                                 "confirmed", "documented" }, ... }
//!   },
//!   "version": 0
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use crate::config::{self, QuestConfig};
use crate::error::{QuestError, StorageError};
use crate::photo;
use crate::quest::sections::SectionKey;
use crate::quest::storage::{self, SnapshotStore};

/// Envelope version written alongside the state. Never checked on load.
const SNAPSHOT_VERSION: u32 = 0;

/// Captured content for one section.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionRecord {
    pub place_name: String,
    /// `data:image/jpeg;base64,...` produced by the photo pipeline.
    pub photo: Option<String>,
    pub description: String,
    /// Set when the couple arrives at the venue. Only `reset` clears it.
    pub confirmed: bool,
    /// Set when photo and description are saved. Implies `confirmed`.
    pub documented: bool,
}

impl SectionRecord {
    fn seeded(place_name: &str) -> Self {
        Self {
            place_name: place_name.to_string(),
            ..Self::default()
        }
    }

    pub fn has_photo(&self) -> bool {
        self.photo.as_deref().is_some_and(|p| !p.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestState {
    pub current_step: u32,
    pub mood: Option<u8>,
    pub mood_after: Option<u8>,
    pub sections: BTreeMap<SectionKey, SectionRecord>,
}

impl QuestState {
    /// Step 0, no moods, every section empty except the secret venue.
    pub fn initial(secret_place: &str) -> Self {
        let sections = SectionKey::ALL
            .into_iter()
            .map(|key| (key, initial_record(key, secret_place)))
            .collect();
        Self {
            current_step: 0,
            mood: None,
            mood_after: None,
            sections,
        }
    }

    pub fn section(&self, key: SectionKey) -> &SectionRecord {
        // Every key is seeded by `initial` and re-seeded by `fill_missing`.
        &self.sections[&key]
    }

    fn section_mut(&mut self, key: SectionKey) -> &mut SectionRecord {
        self.sections.entry(key).or_default()
    }

    /// Re-seed sections absent from an older or hand-edited snapshot.
    fn fill_missing(&mut self, secret_place: &str) {
        for key in SectionKey::ALL {
            self.sections
                .entry(key)
                .or_insert_with(|| initial_record(key, secret_place));
        }
    }

    /// Repair a snapshot that did not come from our own mutations. A
    /// documented section is treated as arrived at, and photos that are not
    /// pipeline output within `max_photo_bytes` are dropped. Returns the
    /// number of records changed.
    pub fn sanitize(&mut self, max_photo_bytes: usize) -> usize {
        let mut repaired = 0;
        for (key, record) in self.sections.iter_mut() {
            let mut changed = false;
            if record.documented && !record.confirmed {
                record.confirmed = true;
                changed = true;
            }
            let bad_photo = record
                .photo
                .as_deref()
                .is_some_and(|p| !photo::is_photo_data_url(p) || p.len() > max_photo_bytes);
            if bad_photo {
                record.photo = None;
                changed = true;
            }
            if changed {
                log::warn!("Repaired {} record from snapshot", key);
                repaired += 1;
            }
        }
        repaired
    }
}

fn initial_record(key: SectionKey, secret_place: &str) -> SectionRecord {
    match key {
        SectionKey::Secret => SectionRecord::seeded(secret_place),
        _ => SectionRecord::default(),
    }
}

#[derive(Serialize)]
struct SnapshotRef<'a> {
    state: &'a QuestState,
    version: u32,
}

#[derive(Deserialize)]
struct Snapshot {
    state: QuestState,
}

/// Parse either the `{state, version}` envelope or a bare state object.
fn parse_snapshot(json: &str) -> Result<QuestState, serde_json::Error> {
    serde_json::from_str::<Snapshot>(json)
        .map(|s| s.state)
        .or_else(|_| serde_json::from_str::<QuestState>(json))
}

/// The state machine: in-memory state plus the store it writes through to.
pub struct Quest {
    state: QuestState,
    store: Rc<dyn SnapshotStore>,
    storage_key: String,
    secret_place: String,
    max_photo_bytes: usize,
}

impl Quest {
    /// Rehydrate from `store`, falling back to the initial state when the
    /// snapshot is missing or unreadable.
    pub fn load(store: Rc<dyn SnapshotStore>, config: &QuestConfig) -> Self {
        let state = match store.load(&config.storage_key) {
            Ok(Some(json)) => match parse_snapshot(&json) {
                Ok(mut state) => {
                    state.fill_missing(&config.secret_place);
                    state.sanitize(config.pipeline.max_photo_bytes);
                    log::debug!("Rehydrated quest at step {}", state.current_step);
                    state
                }
                Err(e) => {
                    log::warn!("Discarding unreadable quest snapshot: {}", e);
                    QuestState::initial(&config.secret_place)
                }
            },
            Ok(None) => QuestState::initial(&config.secret_place),
            Err(e) => {
                log::warn!("Could not read quest snapshot: {}", e);
                QuestState::initial(&config.secret_place)
            }
        };

        Self {
            state,
            store,
            storage_key: config.storage_key.clone(),
            secret_place: config.secret_place.clone(),
            max_photo_bytes: config.pipeline.max_photo_bytes,
        }
    }

    pub fn state(&self) -> &QuestState {
        &self.state
    }

    /// Serialize the full snapshot and overwrite the stored copy.
    pub fn persist(&self) -> Result<(), StorageError> {
        let json = serde_json::to_string(&SnapshotRef {
            state: &self.state,
            version: SNAPSHOT_VERSION,
        })?;
        self.store.save(&self.storage_key, &json)
    }

    /// Apply a mutation and write through. A failed write is logged and
    /// otherwise dropped; the in-memory state keeps the change.
    fn mutate<R>(&mut self, f: impl FnOnce(&mut QuestState) -> R) -> R {
        let out = f(&mut self.state);
        if let Err(e) = self.persist() {
            log::warn!("Quest progress not saved: {}", e);
        }
        out
    }

    // ── Step transitions ───────────────────────────────────────────

    pub fn advance(&mut self) {
        self.mutate(|s| s.current_step += 1);
    }

    /// Step back one screen, never below 0.
    pub fn retreat(&mut self) {
        self.mutate(|s| s.current_step = s.current_step.saturating_sub(1));
    }

    pub fn reset(&mut self) {
        let initial = QuestState::initial(&self.secret_place);
        self.mutate(|s| *s = initial);
    }

    // ── Moods ──────────────────────────────────────────────────────

    pub fn set_mood(&mut self, value: u8) {
        self.mutate(|s| s.mood = Some(value));
    }

    pub fn set_mood_after(&mut self, value: u8) {
        self.mutate(|s| s.mood_after = Some(value));
    }

    // ── Section capture ────────────────────────────────────────────

    pub fn set_place(&mut self, key: SectionKey, name: &str) {
        self.mutate(|s| s.section_mut(key).place_name = name.to_string());
    }

    pub fn set_photo(&mut self, key: SectionKey, photo: String) {
        self.mutate(|s| s.section_mut(key).photo = Some(photo));
    }

    pub fn set_description(&mut self, key: SectionKey, text: &str) {
        self.mutate(|s| s.section_mut(key).description = text.to_string());
    }

    pub fn confirm_arrival(&mut self, key: SectionKey) {
        self.mutate(|s| s.section_mut(key).confirmed = true);
    }

    /// Mark a section documented. Refused until arrival is confirmed.
    pub fn mark_documented(&mut self, key: SectionKey) -> Result<(), QuestError> {
        if !self.state.section(key).confirmed {
            return Err(QuestError::NotConfirmed(key));
        }
        self.mutate(|s| s.section_mut(key).documented = true);
        Ok(())
    }

    /// Save button contract: needs a captured photo and a non-blank
    /// description. Stores the description, marks the section documented
    /// and moves to the next step as one write.
    pub fn save_documentation(&mut self, key: SectionKey, description: &str) -> Result<(), QuestError> {
        let record = self.state.section(key);
        if !record.confirmed {
            return Err(QuestError::NotConfirmed(key));
        }
        if !record.has_photo() {
            return Err(QuestError::MissingPhoto(key));
        }
        if description.trim().is_empty() {
            return Err(QuestError::EmptyDescription(key));
        }
        self.mutate(|s| {
            let section = s.section_mut(key);
            section.description = description.to_string();
            section.documented = true;
            s.current_step += 1;
        });
        Ok(())
    }

    // ── Backup ─────────────────────────────────────────────────────

    pub fn export_json(&self) -> String {
        serde_json::to_string(&SnapshotRef {
            state: &self.state,
            version: SNAPSHOT_VERSION,
        })
        .unwrap_or_else(|_| "{}".to_string())
    }

    /// Replace the whole state from an exported snapshot and persist it.
    pub fn import_json(&mut self, json: &str) -> Result<(), QuestError> {
        let mut state = parse_snapshot(json)?;
        state.fill_missing(&self.secret_place);
        state.sanitize(self.max_photo_bytes);
        self.mutate(|s| *s = state);
        Ok(())
    }
}

thread_local! {
    static QUEST: RefCell<Quest> =
        RefCell::new(Quest::load(storage::default_store(), &config::current()));
}

/// Execute a closure with read access to the quest.
pub fn with_quest<F, R>(f: F) -> R
where
    F: FnOnce(&Quest) -> R,
{
    QUEST.with(|q| f(&q.borrow()))
}

/// Execute a closure with mutable access to the quest.
pub fn with_quest_mut<F, R>(f: F) -> R
where
    F: FnOnce(&mut Quest) -> R,
{
    QUEST.with(|q| f(&mut q.borrow_mut()))
}

/// Replace the active quest (used by `init` and tests).
pub fn install(quest: Quest) {
    QUEST.with(|q| *q.borrow_mut() = quest);
}
