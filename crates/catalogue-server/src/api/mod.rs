pub mod response;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{http::StatusCode, response::IntoResponse, routing::get, Json, Router};
use serde_json::json;
use tokio_util::sync::CancellationToken;
use tower_http::compression::CompressionLayer;

use crate::analytics::{MatomoClient, VisitsCache};
use crate::audit::{self, AuditLayer, AuditStore};
use crate::config::Config;
use crate::features;
use crate::mail::{MailTransport, RegistrationMailer};
use crate::middleware;
use crate::security::SecurityService;
use crate::store::{Repositories, ResourceStore};

/// Everything a handler can reach
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub repos: Repositories,
    pub security: SecurityService,
    pub mailer: Arc<RegistrationMailer>,
    pub visits: Arc<VisitsCache>,
    pub matomo: Option<Arc<MatomoClient>>,
    pub audit: Arc<dyn AuditStore>,
}

impl AppState {
    pub fn new(
        config: Config,
        store: Arc<dyn ResourceStore>,
        transport: Arc<dyn MailTransport>,
        audit: Arc<dyn AuditStore>,
    ) -> anyhow::Result<Self> {
        let repos = Repositories::new(store);
        let security = SecurityService::new(&config.catalogue, repos.clone());
        let mailer = Arc::new(RegistrationMailer::new(
            transport,
            config.catalogue.clone(),
            config.mail.clone(),
        ));
        let matomo = if config.matomo.enabled() {
            Some(Arc::new(MatomoClient::new(&config.matomo)?))
        } else {
            None
        };

        Ok(Self {
            config: Arc::new(config),
            repos,
            security,
            mailer,
            visits: Arc::new(VisitsCache::new()),
            matomo,
            audit,
        })
    }

    /// Id of the catalogue this instance runs
    pub fn catalogue_id(&self) -> &str {
        &self.config.catalogue.id
    }
}

/// Serve `state` until `shutdown` is cancelled
pub async fn serve(state: AppState, shutdown: CancellationToken) -> anyhow::Result<()> {
    let config = state.config.clone();
    let app = create_router(state);

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    tracing::info!(%addr, "Server listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    let grace = Duration::from_secs(config.server.shutdown_timeout_secs.min(5));
    axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>())
        .with_graceful_shutdown(async move {
            shutdown.cancelled().await;
            tracing::info!(grace_secs = grace.as_secs(), "Draining connections");
            tokio::time::sleep(grace).await;
        })
        .await?;

    Ok(())
}

pub fn create_router(state: AppState) -> Router {
    let api_v1 = features::router(&state.config).nest("/audit", audit::routes());

    Router::new()
        .route("/health", get(health))
        .nest("/api/v1", api_v1)
        .layer(CompressionLayer::new())
        .layer(middleware::tracing_layer())
        .layer(middleware::cors_layer(&state.config.cors))
        .layer(AuditLayer::new(state.audit.clone()))
        .with_state(state)
}

async fn health() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(json!({
            "status": "healthy",
            "version": env!("CARGO_PKG_VERSION"),
        })),
    )
}
