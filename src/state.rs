use crate::{metrics::SignupMetrics, pipeline::SignupPipeline};
use axum::extract::FromRef;
use duplicate::duplicate_item;
use std::sync::Arc;

/// Theme the landing page is rendered with.
#[derive(Debug, Clone)]
pub struct Theme(pub String);

#[derive(Debug, Clone)]
pub struct AppState {
    pipeline: Arc<SignupPipeline>,
    metrics: Arc<SignupMetrics>,
    theme: Arc<Theme>,
}

impl AppState {
    pub fn new(pipeline: SignupPipeline, metrics: SignupMetrics, theme: String) -> Self {
        Self {
            pipeline: Arc::new(pipeline),
            metrics: Arc::new(metrics),
            theme: Arc::new(Theme(theme)),
        }
    }
}

#[duplicate_item(
    service_type       field;
    [ SignupPipeline ] [ pipeline ];
    [ SignupMetrics ]  [ metrics ];
    [ Theme ]          [ theme ];
)]
impl FromRef<AppState> for Arc<service_type> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.field.clone()
    }
}
