//! Where finished drawings go.
//!
//! The editor only produces a title and an encoded bitmap; ids and timestamps
//! belong to the store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{StoreError, ValidationError};
use crate::surface;

mod json_file;
mod memory;

pub use json_file::JsonFileStore;
pub use memory::MemoryStore;

pub type DrawingId = Uuid;

/// A saved drawing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrawingRecord {
    #[serde(alias = "_id")]
    pub id: DrawingId,
    pub title: String,
    /// `data:image/png;base64,` url of the flattened bitmap
    pub data: String,
    #[serde(alias = "createdAt")]
    pub created_at: DateTime<Utc>,
}

/// Payload for creating or replacing a drawing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewDrawing {
    pub title: String,
    pub data: String,
}

impl NewDrawing {
    /// Wrap encoded PNG bytes as a data url
    pub fn from_png(title: impl Into<String>, png: &[u8]) -> Self {
        Self {
            title: title.into(),
            data: surface::encode_data_url(png),
        }
    }

    /// Title is required
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_title(&self.title)
    }
}

pub fn validate_title(title: &str) -> Result<(), ValidationError> {
    if title.trim().is_empty() {
        Err(ValidationError::EmptyTitle)
    } else {
        Ok(())
    }
}

/// CRUD over saved drawings
pub trait DrawingStore {
    /// All drawings, newest first
    fn list(&self) -> Result<Vec<DrawingRecord>, StoreError>;

    fn get(&self, id: DrawingId) -> Result<DrawingRecord, StoreError>;

    /// Store a drawing, assigning its id and creation time
    fn create(&mut self, drawing: NewDrawing) -> Result<DrawingRecord, StoreError>;

    /// Replace title and bitmap of an existing drawing
    fn update(&mut self, id: DrawingId, drawing: NewDrawing) -> Result<DrawingRecord, StoreError>;

    fn delete(&mut self, id: DrawingId) -> Result<(), StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_title() {
        assert_eq!(validate_title(""), Err(ValidationError::EmptyTitle));
        assert_eq!(validate_title(" \t\n"), Err(ValidationError::EmptyTitle));
        assert_eq!(validate_title("Sunset"), Ok(()));
    }

    #[test]
    fn test_record_accepts_api_field_names() {
        let json = r#"{
            "_id": "67e55044-10b1-426f-9247-bb680e5fe0c8",
            "title": "Cat",
            "data": "data:image/png;base64,AAAA",
            "createdAt": "2025-03-01T12:30:00Z"
        }"#;
        let record: DrawingRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.title, "Cat");
        assert_eq!(record.created_at.to_rfc3339(), "2025-03-01T12:30:00+00:00");
    }
}
