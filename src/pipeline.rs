//! Processing of a single signup: store it once, then announce it.

use crate::{
    domain::{SignupRecord, TopicId},
    notifier::Notifier,
    store::{CreateError, RecordStore},
};
use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use std::sync::Arc;

/// Final state of a signup that did not fault.
#[derive(Debug, PartialEq, Eq)]
pub enum SignupOutcome {
    /// Stored and handed to the notifier. Carries the submitted fields.
    Created(SignupRecord),
    /// A signup with the same key was already stored.
    Rejected,
}

#[derive(thiserror::Error)]
pub enum SignupError {
    #[error("Failed to store the signup")]
    Unexpected(#[source] anyhow::Error),
}

/// Stores signups and announces the ones that were new.
#[derive(Debug)]
pub struct SignupPipeline {
    store: Arc<dyn RecordStore>,
    notifier: Arc<dyn Notifier>,
    topic: TopicId,
}

impl SignupPipeline {
    pub fn new(store: Arc<dyn RecordStore>, notifier: Arc<dyn Notifier>, topic: TopicId) -> Self {
        Self {
            store,
            notifier,
            topic,
        }
    }

    /// Handle the fields of one submitted signup.
    ///
    /// The notifier is only called after the store accepted the record. A
    /// fault in the store is returned as is, and the notifier is not called.
    #[tracing::instrument(name = "Handle signup", skip(self, fields))]
    pub async fn handle(&self, fields: SignupRecord) -> Result<SignupOutcome, SignupError> {
        match self.store.create(&fields).await {
            Ok(()) => {}
            Err(CreateError::DuplicateKey(key)) => {
                tracing::info!(signup_key = %key, "Signup already exists");
                return Ok(SignupOutcome::Rejected);
            }
            Err(CreateError::Backend(e)) => return Err(SignupError::Unexpected(e)),
        }

        self.notifier.publish(&self.topic, &fields).await;

        Ok(SignupOutcome::Created(fields))
    }
}

impl IntoResponse for SignupOutcome {
    fn into_response(self) -> Response {
        let json = [(header::CONTENT_TYPE, "application/json")];
        match self {
            SignupOutcome::Created(fields) => match fields.to_json() {
                Ok(body) => (StatusCode::CREATED, json, body).into_response(),
                Err(e) => SignupError::Unexpected(e.into()).into_response(),
            },
            SignupOutcome::Rejected => (StatusCode::CONFLICT, json).into_response(),
        }
    }
}

impl IntoResponse for SignupError {
    fn into_response(self) -> Response {
        tracing::error!(error.cause_chain = ?self, error.message = %self, "Signup failed");
        StatusCode::INTERNAL_SERVER_ERROR.into_response()
    }
}
