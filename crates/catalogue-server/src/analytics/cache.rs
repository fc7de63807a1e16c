use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use super::client::MatomoClient;

/// Latest visits per service id
#[derive(Debug, Default)]
pub struct VisitsCache {
    visits: RwLock<HashMap<String, i64>>,
    refreshed_at: RwLock<Option<DateTime<Utc>>>,
}

impl VisitsCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn all(&self) -> HashMap<String, i64> {
        self.visits.read().await.clone()
    }

    /// Visits of one service, 0 when unknown
    pub async fn get(&self, service_id: &str) -> i64 {
        self.visits.read().await.get(service_id).copied().unwrap_or(0)
    }

    pub async fn replace(&self, visits: HashMap<String, i64>) {
        *self.visits.write().await = visits;
        *self.refreshed_at.write().await = Some(Utc::now());
    }

    pub async fn refreshed_at(&self) -> Option<DateTime<Utc>> {
        *self.refreshed_at.read().await
    }
}

/// Periodically refreshes a [`VisitsCache`]
pub struct AnalyticsPoller {
    client: Option<Arc<MatomoClient>>,
    cache: Arc<VisitsCache>,
    every: Duration,
}

impl AnalyticsPoller {
    pub fn new(client: Option<Arc<MatomoClient>>, cache: Arc<VisitsCache>, every: Duration) -> Self {
        Self { client, cache, every }
    }

    /// One refresh; failures keep the previous values
    pub async fn refresh(&self) {
        let Some(client) = &self.client else {
            tracing::debug!("Matomo host not configured, skipping visits refresh");
            return;
        };
        match client.service_visits().await {
            Ok(visits) => {
                tracing::debug!(services = visits.len(), "Refreshed service visits");
                self.cache.replace(visits).await;
            },
            Err(e) => tracing::warn!(error = %e, "Could not refresh service visits"),
        }
    }

    pub fn spawn(self, shutdown: CancellationToken) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = interval(self.every);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                tokio::select! {
                    _ = shutdown.cancelled() => {
                        tracing::info!("Analytics poller stopped");
                        break;
                    },
                    _ = ticker.tick() => self.refresh().await,
                }
            }
        })
    }
}
