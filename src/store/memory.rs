use chrono::Utc;
use uuid::Uuid;

use super::{DrawingId, DrawingRecord, DrawingStore, NewDrawing};
use crate::error::StoreError;

/// Drawings kept in memory for the lifetime of the process
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    /// Insertion order, oldest first
    records: Vec<DrawingRecord>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn from_records(records: Vec<DrawingRecord>) -> Self {
        Self { records }
    }

    pub(crate) fn records(&self) -> &[DrawingRecord] {
        &self.records
    }

    fn position(&self, id: DrawingId) -> Result<usize, StoreError> {
        self.records
            .iter()
            .position(|record| record.id == id)
            .ok_or(StoreError::NotFound(id))
    }
}

impl DrawingStore for MemoryStore {
    fn list(&self) -> Result<Vec<DrawingRecord>, StoreError> {
        let mut records: Vec<_> = self.records.iter().rev().cloned().collect();
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(records)
    }

    fn get(&self, id: DrawingId) -> Result<DrawingRecord, StoreError> {
        Ok(self.records[self.position(id)?].clone())
    }

    fn create(&mut self, drawing: NewDrawing) -> Result<DrawingRecord, StoreError> {
        drawing.validate()?;
        let record = DrawingRecord {
            id: Uuid::new_v4(),
            title: drawing.title,
            data: drawing.data,
            created_at: Utc::now(),
        };
        log::info!("Created drawing {} ({:?})", record.id, record.title);
        self.records.push(record.clone());
        Ok(record)
    }

    fn update(&mut self, id: DrawingId, drawing: NewDrawing) -> Result<DrawingRecord, StoreError> {
        drawing.validate()?;
        let index = self.position(id)?;
        let record = &mut self.records[index];
        record.title = drawing.title;
        record.data = drawing.data;
        log::info!("Updated drawing {}", id);
        Ok(record.clone())
    }

    fn delete(&mut self, id: DrawingId) -> Result<(), StoreError> {
        let index = self.position(id)?;
        self.records.remove(index);
        log::info!("Deleted drawing {}", id);
        Ok(())
    }
}
