use crate::state::{AppState, Theme};
use askama::Template;
use axum::{extract::State, response::IntoResponse, routing::get, Router};
use std::sync::Arc;

pub fn create_router() -> Router<AppState> {
    Router::new().route("/", get(home))
}

/// Landing page with the signup form.
#[tracing::instrument(skip(theme))]
#[utoipa::path(
    get,
    path = "/",
    responses((status = 200, description = "Landing page", body = String, content_type = "text/html"))
)]
pub async fn home(State(theme): State<Arc<Theme>>) -> impl IntoResponse {
    HomeTemplate { theme: &theme.0 }.into_response()
}

#[derive(Template)]
#[template(path = "index.html")]
struct HomeTemplate<'a> {
    theme: &'a str,
}
