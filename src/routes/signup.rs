use crate::{
    domain::SignupRecord,
    metrics::SignupMetrics,
    pipeline::{SignupError, SignupOutcome, SignupPipeline},
    state::AppState,
};
use axum::{extract::State, routing::post, Form, Router};
use std::sync::Arc;

/// Create a router to serve endpoints.
pub fn create_router() -> Router<AppState> {
    Router::new().route("/signup", post(signup))
}

/// Sign up with any set of form fields.
///
/// Responds with the submitted fields when the signup was new, and with a
/// conflict when a signup with the same key was already stored.
#[tracing::instrument(
    name = "Adding a new signup",
    skip(form, pipeline, metrics),
    fields(signup_email = %form.email().unwrap_or_default())
)]
#[utoipa::path(
    post,
    path = "/signup",
    request_body(content = SignupRecord, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 201, description = "Signup was stored", body = SignupRecord),
        (status = 409, description = "A signup with the same key already exists"),
        (status = 500, description = "Signup could not be stored"),
    )
)]
pub async fn signup(
    State(pipeline): State<Arc<SignupPipeline>>,
    State(metrics): State<Arc<SignupMetrics>>,
    Form(form): Form<SignupRecord>,
) -> Result<SignupOutcome, SignupError> {
    let outcome = pipeline.handle(form).await;
    match &outcome {
        Ok(SignupOutcome::Created(_)) => metrics.record_created(),
        Ok(SignupOutcome::Rejected) => metrics.record_conflict(),
        Err(_) => metrics.record_failure(),
    }

    outcome
}
