use std::fs;
use std::path::{Path, PathBuf};

use super::{DrawingId, DrawingRecord, DrawingStore, MemoryStore, NewDrawing};
use crate::error::StoreError;

/// Drawings persisted as one JSON array, rewritten after every change
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    inner: MemoryStore,
}

impl JsonFileStore {
    /// Open the store at `path`; a missing file is an empty store
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let records: Vec<DrawingRecord> = if path.exists() {
            serde_json::from_slice(&fs::read(&path)?)?
        } else {
            Vec::new()
        };
        log::info!("Opened {} drawings from {}", records.len(), path.display());
        Ok(Self {
            path,
            inner: MemoryStore::from_records(records),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        // written beside the store, then renamed over it
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, serde_json::to_vec_pretty(self.inner.records())?)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl DrawingStore for JsonFileStore {
    fn list(&self) -> Result<Vec<DrawingRecord>, StoreError> {
        self.inner.list()
    }

    fn get(&self, id: DrawingId) -> Result<DrawingRecord, StoreError> {
        self.inner.get(id)
    }

    fn create(&mut self, drawing: NewDrawing) -> Result<DrawingRecord, StoreError> {
        let record = self.inner.create(drawing)?;
        self.persist()?;
        Ok(record)
    }

    fn update(&mut self, id: DrawingId, drawing: NewDrawing) -> Result<DrawingRecord, StoreError> {
        let record = self.inner.update(id, drawing)?;
        self.persist()?;
        Ok(record)
    }

    fn delete(&mut self, id: DrawingId) -> Result<(), StoreError> {
        self.inner.delete(id)?;
        self.persist()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path() -> PathBuf {
        std::env::temp_dir().join(format!("sketch-store-{}.json", uuid::Uuid::new_v4()))
    }

    #[test]
    fn test_records_survive_reopen() {
        let path = temp_path();
        let mut store = JsonFileStore::open(&path).unwrap();
        let kept = store
            .create(NewDrawing {
                title: "kept".to_owned(),
                data: "data:image/png;base64,AAAA".to_owned(),
            })
            .unwrap();
        let dropped = store
            .create(NewDrawing {
                title: "dropped".to_owned(),
                data: "data:image/png;base64,AAAA".to_owned(),
            })
            .unwrap();
        store.delete(dropped.id).unwrap();

        let reopened = JsonFileStore::open(&path).unwrap();
        assert_eq!(reopened.list().unwrap(), vec![kept]);
        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let path = temp_path();
        fs::write(&path, b"{ not json").unwrap();
        assert!(matches!(JsonFileStore::open(&path), Err(StoreError::Serialization(_))));
        fs::remove_file(&path).unwrap();
    }
}
