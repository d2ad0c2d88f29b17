use anyhow::Context;
use axum::{
    extract::State,
    response::{IntoResponse, Response},
};
use http::StatusCode;
use prometheus::{Encoder, IntCounter, Registry, TextEncoder};
use std::sync::Arc;

/// Counters for the outcomes of submitted signups.
#[derive(Clone)]
pub struct SignupMetrics {
    registry: Arc<Registry>,
    created: IntCounter,
    conflicted: IntCounter,
    failed: IntCounter,
}

impl SignupMetrics {
    /// Create the signup counters and register them in a fresh `Registry`.
    pub fn new() -> anyhow::Result<Self> {
        let registry = Registry::new();
        let created = register_counter(
            &registry,
            "signups_created_total",
            "Signups stored for the first time",
        )?;
        let conflicted = register_counter(
            &registry,
            "signups_conflicted_total",
            "Signups rejected because their key already existed",
        )?;
        let failed = register_counter(
            &registry,
            "signups_failed_total",
            "Signups that could not be stored",
        )?;

        Ok(Self {
            registry: Arc::new(registry),
            created,
            conflicted,
            failed,
        })
    }

    pub fn record_created(&self) {
        self.created.inc();
    }

    pub fn record_conflict(&self) {
        self.conflicted.inc();
    }

    pub fn record_failure(&self) {
        self.failed.inc();
    }

    /// Encode all registered metrics in the Prometheus text format.
    pub fn encode(&self) -> Result<String, MetricsError> {
        let mut buffer = vec![];
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        encoder
            .encode(&metric_families, &mut buffer)
            .context("Failed to encode metrics")
            .map_err(MetricsError::UnexpectedError)?;

        String::from_utf8(buffer)
            .context("Failed to convert metrics to a valid string")
            .map_err(MetricsError::UnexpectedError)
    }
}

impl std::fmt::Debug for SignupMetrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignupMetrics")
            .field("created", &self.created.get())
            .field("conflicted", &self.conflicted.get())
            .field("failed", &self.failed.get())
            .finish()
    }
}

fn register_counter(registry: &Registry, name: &str, help: &str) -> anyhow::Result<IntCounter> {
    let counter =
        IntCounter::new(name, help).with_context(|| format!("Failed to create `{name}` counter"))?;
    registry
        .register(Box::new(counter.clone()))
        .with_context(|| format!("Failed to register `{name}` metric"))?;
    Ok(counter)
}

/// Endpoint exposing the signup metrics.
#[tracing::instrument(skip(metrics))]
#[utoipa::path(
    get,
    path = "/metrics",
    responses((status = OK, description = "Signup metrics in the Prometheus text format", body = String))
)]
pub async fn metrics_endpoint(
    State(metrics): State<Arc<SignupMetrics>>,
) -> Result<String, MetricsError> {
    metrics.encode()
}

#[derive(thiserror::Error)]
pub enum MetricsError {
    #[error("Unexpected error when generating metrics")]
    UnexpectedError(#[source] anyhow::Error),
}

impl IntoResponse for MetricsError {
    fn into_response(self) -> Response {
        (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()).into_response()
    }
}
