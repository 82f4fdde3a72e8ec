use std::collections::HashMap;
use std::sync::Mutex;

use thiserror::Error;

use crate::intake::form::ApplicationRecord;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("record '{0}' already exists")]
    AlreadyExists(String),

    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// Persistence for submissions.
///
/// `insert_if_absent` must never replace an existing record with the same id.
pub trait ApplicationStore {
    fn insert_if_absent(&self, record: ApplicationRecord) -> Result<(), StoreError>;

    fn get(&self, id: &str) -> Option<ApplicationRecord>;
}

#[derive(Debug, Default)]
pub struct InMemoryStore {
    records: Mutex<HashMap<String, ApplicationRecord>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.lock().map(|r| r.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ApplicationStore for InMemoryStore {
    fn insert_if_absent(&self, record: ApplicationRecord) -> Result<(), StoreError> {
        let mut records = self
            .records
            .lock()
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;
        if records.contains_key(&record.id) {
            return Err(StoreError::AlreadyExists(record.id));
        }
        records.insert(record.id.clone(), record);
        Ok(())
    }

    fn get(&self, id: &str) -> Option<ApplicationRecord> {
        self.records.lock().ok()?.get(id).cloned()
    }
}
