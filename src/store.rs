//! Durable storage of signups.
//!
//! A store accepts each key at most once. Writing a record whose key is
//! already taken leaves the stored record untouched and reports
//! [`CreateError::DuplicateKey`].

mod memory;
mod postgres;

pub use memory::MemoryRecordStore;
pub use postgres::PostgresRecordStore;

use crate::domain::SignupRecord;

/// Conditional create of signup records.
#[async_trait::async_trait]
pub trait RecordStore: Send + Sync + std::fmt::Debug {
    /// Persist `record` if no record with the same key exists yet.
    ///
    /// Exactly one write is attempted. No retries are made.
    async fn create(&self, record: &SignupRecord) -> Result<(), CreateError>;
}

#[derive(thiserror::Error)]
pub enum CreateError {
    #[error("A signup with key `{0}` already exists")]
    DuplicateKey(String),
    #[error(transparent)]
    Backend(#[from] anyhow::Error),
}

/// Read the value of the key attribute from a record.
fn signup_key<'a>(record: &'a SignupRecord, key_attribute: &str) -> Result<&'a str, CreateError> {
    record.get(key_attribute).ok_or_else(|| {
        CreateError::Backend(anyhow::anyhow!(
            "Signup is missing the key attribute `{key_attribute}`"
        ))
    })
}
