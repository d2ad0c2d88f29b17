pub mod configuration;
pub mod domain;
mod error;
pub mod metrics;
pub mod notifier;
pub mod pipeline;
mod routes;
mod state;
pub mod store;
pub mod telemetry;

use axum::{Router, Server};
use configuration::{DatabaseSettings, Settings};
use metrics::SignupMetrics;
use notifier::TopicClient;
use pipeline::SignupPipeline;
use sqlx::{postgres::PgPoolOptions, PgPool};
use state::AppState;
use std::{net::TcpListener, sync::Arc, time::Duration};
use store::{MemoryRecordStore, PostgresRecordStore, RecordStore};

#[derive(Debug)]
pub struct App {
    port: u16,
    listener: TcpListener,
    router: Router,
}

impl App {
    /// Build the app from the configuration and bind it to the configured
    /// address. Backend clients are created here and live as long as the app.
    pub fn build(config: Settings) -> anyhow::Result<Self> {
        let listener = TcpListener::bind(config.application().address())?;
        let port = listener.local_addr()?.port();

        let topic_client = TopicClient::try_from(config.notifier())?;
        let pipeline = SignupPipeline::new(
            build_store(&config),
            Arc::new(topic_client),
            config.notifier().topic().clone(),
        );
        let app_state = AppState::new(
            pipeline,
            SignupMetrics::new()?,
            config.application().theme().clone(),
        );

        Ok(Self {
            port,
            listener,
            router: Self::build_router(&app_state),
        })
    }

    /// Port the app is bound to.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Serve the app until the server fails.
    pub async fn run_until_stopped(self) -> anyhow::Result<()> {
        tracing::info!("Server running at {}", self.listener.local_addr()?);
        Server::from_tcp(self.listener)?
            .serve(self.router.into_make_service())
            .await?;
        Ok(())
    }

    /// Builder the router for the application.
    fn build_router(app_state: &AppState) -> Router {
        use tower_http::{
            request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
            trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
        };
        use tracing::Level;

        routes::build_router(app_state)
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(
                TraceLayer::new_for_http()
                    .make_span_with(
                        DefaultMakeSpan::new()
                            .level(Level::INFO)
                            .include_headers(true),
                    )
                    .on_request(DefaultOnRequest::new().level(Level::INFO))
                    .on_response(DefaultOnResponse::new().level(Level::INFO)),
            )
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
    }
}

/// Create the store signups are written to. Falls back to keeping signups in
/// memory when no database is configured.
fn build_store(config: &Settings) -> Arc<dyn RecordStore> {
    let key_attribute = config.store().key_attribute();
    match config.database() {
        Some(database) => Arc::new(PostgresRecordStore::new(
            get_connection_pool(database),
            key_attribute,
        )),
        None => {
            tracing::warn!("No database configured, signups are only kept in memory");
            Arc::new(MemoryRecordStore::new(key_attribute))
        }
    }
}

/// Create a lazy connection pool to the database.
pub fn get_connection_pool(config: &DatabaseSettings) -> PgPool {
    PgPoolOptions::new()
        .acquire_timeout(Duration::from_secs(2))
        .connect_lazy_with(config.with_db())
}
