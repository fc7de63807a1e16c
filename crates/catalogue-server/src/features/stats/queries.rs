//! Visit statistics
//!
//! Service visits come from the cache the analytics poller keeps fresh. Label
//! statistics go to Matomo on every call.

use std::collections::{BTreeMap, HashMap};

use mediator::Request;
use serde::{Deserialize, Serialize};

use crate::analytics::Interval;
use crate::api::AppState;
use crate::error::{CatalogueError, CatalogueResult};

#[derive(Debug, Clone, Default)]
pub struct AllVisitsQuery;

impl Request<CatalogueResult<HashMap<String, i64>>> for AllVisitsQuery {}

pub async fn all_visits(state: &AppState, _query: AllVisitsQuery) -> CatalogueResult<HashMap<String, i64>> {
    Ok(state.visits.all().await)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceVisitsQuery {
    pub service_id: String,
}

impl Request<CatalogueResult<i64>> for ServiceVisitsQuery {}

pub async fn service_visits(state: &AppState, query: ServiceVisitsQuery) -> CatalogueResult<i64> {
    Ok(state.visits.get(&query.service_id).await)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabelVisitsQuery {
    pub label: String,
    #[serde(default)]
    pub by: Interval,
}

impl Request<CatalogueResult<BTreeMap<String, i64>>> for LabelVisitsQuery {}

#[tracing::instrument(skip(state))]
pub async fn label_visits(state: &AppState, query: LabelVisitsQuery) -> CatalogueResult<BTreeMap<String, i64>> {
    let client = state
        .matomo
        .as_ref()
        .ok_or_else(|| CatalogueError::Unavailable("Matomo is not configured".into()))?;
    Ok(client.visits_for_label(&query.label, query.by).await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::shared::test_helpers::TestContext;

    #[tokio::test]
    async fn test_cached_visits() {
        let ctx = TestContext::new().await;
        ctx.state
            .visits
            .replace(HashMap::from([("athena.textminer".to_string(), 42)]))
            .await;

        assert_eq!(all_visits(&ctx.state, AllVisitsQuery).await.unwrap().len(), 1);
        let visits = service_visits(&ctx.state, ServiceVisitsQuery { service_id: "athena.textminer".into() })
            .await
            .unwrap();
        assert_eq!(visits, 42);
        let visits = service_visits(&ctx.state, ServiceVisitsQuery { service_id: "hermes.mail".into() })
            .await
            .unwrap();
        assert_eq!(visits, 0);
    }

    #[tokio::test]
    async fn test_label_visits_without_matomo() {
        let ctx = TestContext::new().await;
        let err = label_visits(
            &ctx.state,
            LabelVisitsQuery {
                label: "/service/athena.textminer".into(),
                by: Interval::Month,
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, CatalogueError::Unavailable(_)));
    }
}
