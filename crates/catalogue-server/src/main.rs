//! Resource catalogue server - main entry point

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use catalogue_common::logging::{init_logging, LogConfig};
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing::info;

use catalogue_server::{
    analytics::AnalyticsPoller,
    api::{self, AppState},
    audit::{AuditStore, MemoryAuditStore, PgAuditStore},
    config::{Config, StoreBackend},
    features::vocabularies,
    mail::{transport_for, MailScheduler},
    store::{postgres::create_pool, MemoryResourceStore, PgResourceStore, ResourceStore},
};

#[tokio::main]
async fn main() -> Result<()> {
    let log_config = LogConfig::builder()
        .log_file_prefix("catalogue-server".to_string())
        .filter_directives("catalogue_server=debug,tower_http=debug,axum=info,sqlx=info".to_string())
        .build();
    let log_config = log_config.clone().merge_env().unwrap_or(log_config);
    let _guard = init_logging(&log_config)?;

    info!("Starting resource catalogue");

    let config = Config::load()?;
    info!(
        catalogue = %config.catalogue.id,
        store = ?config.store,
        "Configuration loaded - server will bind to {}:{}",
        config.server.host,
        config.server.port
    );

    let (store, audit): (Arc<dyn ResourceStore>, Arc<dyn AuditStore>) = match config.store {
        StoreBackend::Postgres => {
            let pool = create_pool(&config.database).await?;
            sqlx::migrate!("../../migrations")
                .run(&pool)
                .await
                .map_err(|e| anyhow::anyhow!("Failed to run migrations: {}", e))?;
            info!("Database migrations completed");
            (
                Arc::new(PgResourceStore::new(pool.clone())),
                Arc::new(PgAuditStore::new(pool)),
            )
        },
        StoreBackend::Memory => {
            tracing::warn!("Using the in-memory store, nothing survives a restart");
            (Arc::new(MemoryResourceStore::new()), Arc::new(MemoryAuditStore::new()))
        },
    };

    let transport = transport_for(config.mail.transport);
    let state = AppState::new(config, store, transport, audit)?;

    let seeded = vocabularies::commands::seed::handle(&state).await?;
    info!(seeded, "State vocabularies in place");

    let shutdown = CancellationToken::new();

    let scheduler = MailScheduler::new(state.mailer.clone(), state.repos.clone(), &state.config.mail);
    let scheduler_handle = scheduler.spawn(shutdown.child_token());

    let poller = AnalyticsPoller::new(
        state.matomo.clone(),
        state.visits.clone(),
        Duration::from_secs(state.config.matomo.refresh_secs),
    );
    let poller_handle = poller.spawn(shutdown.child_token());

    let signal_token = shutdown.clone();
    tokio::spawn(async move {
        shutdown_signal().await;
        signal_token.cancel();
    });

    api::serve(state, shutdown).await?;

    let _ = tokio::join!(scheduler_handle, poller_handle);
    info!("Server shut down gracefully");

    Ok(())
}

/// Resolves on Ctrl+C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            },
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
            },
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, starting graceful shutdown");
        },
        _ = terminate => {
            info!("Received terminate signal, starting graceful shutdown");
        },
    }
}
