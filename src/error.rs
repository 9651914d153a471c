//! Error types shared by the quest, photo and album modules.
//!
//! Every variant maps to an HTTP-like status so route handlers can convert at
//! the boundary. Nothing is retried.

use thiserror::Error;

use crate::quest::sections::SectionKey;

#[derive(Error, Debug)]
pub enum QuestError {
    #[error("Unknown section: {0}")]
    UnknownSection(String),

    #[error("{place} is not an option for {section}")]
    UnknownPlace { section: SectionKey, place: String },

    #[error("Pick a place for {0} first")]
    NoPlaceSelected(SectionKey),

    #[error("Arrival at {0} has not been confirmed")]
    NotConfirmed(SectionKey),

    #[error("Add a photo before saving")]
    MissingPhoto(SectionKey),

    #[error("Write a few words before saving")]
    EmptyDescription(SectionKey),

    #[error("Invalid quest state JSON: {0}")]
    InvalidSnapshot(#[from] serde_json::Error),
}

impl QuestError {
    pub fn status(&self) -> u16 {
        match self {
            QuestError::UnknownSection(_)
            | QuestError::UnknownPlace { .. }
            | QuestError::InvalidSnapshot(_) => 400,
            QuestError::NoPlaceSelected(_)
            | QuestError::NotConfirmed(_)
            | QuestError::MissingPhoto(_)
            | QuestError::EmptyDescription(_) => 422,
        }
    }
}

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    #[error("Storage write failed: {0}")]
    Write(String),

    #[error("Serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
}

#[derive(Error, Debug)]
pub enum PhotoError {
    #[error("No image data received")]
    Empty,

    #[error("Could not read image: {0}")]
    Decode(image::ImageError),

    #[error("Could not encode image: {0}")]
    Encode(image::ImageError),

    #[error("Photo is too large ({len} bytes, limit {max})")]
    TooLarge { len: usize, max: usize },
}

impl PhotoError {
    pub fn status(&self) -> u16 {
        match self {
            PhotoError::Empty | PhotoError::Decode(_) => 400,
            PhotoError::TooLarge { .. } => 413,
            PhotoError::Encode(_) => 500,
        }
    }
}

#[derive(Error, Debug)]
pub enum AlbumError {
    #[error("No entries provided")]
    NoEntries,

    #[error("Malformed payload: {0}")]
    MalformedPayload(#[from] serde_json::Error),

    #[error("Album storage failed: {0}")]
    Backend(#[from] StorageError),
}

impl AlbumError {
    pub fn status(&self) -> u16 {
        match self {
            AlbumError::NoEntries | AlbumError::MalformedPayload(_) => 400,
            AlbumError::Backend(_) => 500,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quest_errors_split_input_and_validation() {
        assert_eq!(QuestError::UnknownSection("brunch".into()).status(), 400);
        assert_eq!(QuestError::MissingPhoto(SectionKey::Dinner).status(), 422);
        assert_eq!(QuestError::NotConfirmed(SectionKey::Secret).status(), 422);
    }

    #[test]
    fn album_backend_failure_is_server_error() {
        let err = AlbumError::from(StorageError::Write("quota".into()));
        assert_eq!(err.status(), 500);
        assert_eq!(AlbumError::NoEntries.status(), 400);
    }

    #[test]
    fn photo_error_messages_are_user_facing() {
        let err = PhotoError::TooLarge { len: 10, max: 5 };
        assert_eq!(err.to_string(), "Photo is too large (10 bytes, limit 5)");
        assert_eq!(err.status(), 413);
    }
}
