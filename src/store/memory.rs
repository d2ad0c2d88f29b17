use super::{signup_key, CreateError, RecordStore};
use crate::domain::SignupRecord;
use std::{
    collections::HashMap,
    sync::{Mutex, MutexGuard, PoisonError},
};

/// A [`RecordStore`] keeping signups in process memory.
///
/// Nothing survives a restart, so this is only meant for local development
/// and tests.
#[derive(Debug)]
pub struct MemoryRecordStore {
    key_attribute: String,
    records: Mutex<HashMap<String, SignupRecord>>,
}

impl MemoryRecordStore {
    pub fn new(key_attribute: impl Into<String>) -> Self {
        Self {
            key_attribute: key_attribute.into(),
            records: Mutex::new(HashMap::new()),
        }
    }

    /// Get the record stored under `key`.
    pub fn get(&self, key: &str) -> Option<SignupRecord> {
        self.records().get(key).cloned()
    }

    /// Number of records stored.
    pub fn len(&self) -> usize {
        self.records().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Lock the records. The map is only changed by single inserts, so it
    /// stays consistent even if a holder of the lock panicked.
    fn records(&self) -> MutexGuard<'_, HashMap<String, SignupRecord>> {
        self.records.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait::async_trait]
impl RecordStore for MemoryRecordStore {
    #[tracing::instrument(name = "Saving signup in memory", skip(self, record))]
    async fn create(&self, record: &SignupRecord) -> Result<(), CreateError> {
        let key = signup_key(record, &self.key_attribute)?;
        let mut records = self.records();

        if records.contains_key(key) {
            return Err(CreateError::DuplicateKey(key.to_owned()));
        }
        records.insert(key.to_owned(), record.clone());
        tracing::info!("New signup has been saved");

        Ok(())
    }
}
