use crate::state::AppState;
use axum::{routing::get, Router};

pub mod docs;
pub mod health;
pub mod home;
pub mod signup;

pub fn build_router(app_state: &AppState) -> Router {
    Router::new()
        .merge(health::create_router())
        .merge(home::create_router())
        .merge(signup::create_router())
        .route("/metrics", get(crate::metrics::metrics_endpoint))
        .nest("/docs", docs::create_router())
        .with_state(app_state.clone())
}
