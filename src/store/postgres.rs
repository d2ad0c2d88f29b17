use super::{signup_key, CreateError, RecordStore};
use crate::domain::SignupRecord;
use anyhow::Context;
use chrono::Utc;
use sqlx::{types::Json, PgPool, Row};

/// A [`RecordStore`] writing signups into the `signups` table.
#[derive(Debug, Clone)]
pub struct PostgresRecordStore {
    pool: PgPool,
    key_attribute: String,
}

impl PostgresRecordStore {
    pub fn new(pool: PgPool, key_attribute: impl Into<String>) -> Self {
        Self {
            pool,
            key_attribute: key_attribute.into(),
        }
    }

    /// Get the signup stored under `key`.
    #[tracing::instrument(name = "Get signup from database", skip(self))]
    pub async fn find(&self, key: &str) -> Result<Option<SignupRecord>, sqlx::Error> {
        let row = sqlx::query(r#"SELECT attributes FROM signups WHERE signup_key = $1"#)
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;

        row.map(|r| r.try_get::<Json<SignupRecord>, _>("attributes"))
            .transpose()
            .map(|record| record.map(|Json(record)| record))
    }
}

#[async_trait::async_trait]
impl RecordStore for PostgresRecordStore {
    #[tracing::instrument(name = "Saving signup in database", skip(self, record))]
    async fn create(&self, record: &SignupRecord) -> Result<(), CreateError> {
        let key = signup_key(record, &self.key_attribute)?;
        let inserted_rows = sqlx::query(
            r#"INSERT INTO signups (signup_key, attributes, created_at)
               VALUES ($1, $2, $3)
               ON CONFLICT (signup_key) DO NOTHING"#,
        )
        .bind(key)
        .bind(Json(record))
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to execute query: {e:?}");
            e
        })
        .context("Failed to insert a new signup")?
        .rows_affected();

        if inserted_rows == 0 {
            return Err(CreateError::DuplicateKey(key.to_owned()));
        }
        tracing::info!("New signup has been saved");

        Ok(())
    }
}
