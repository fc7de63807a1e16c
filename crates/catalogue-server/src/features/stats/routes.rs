//! Visit statistics routes, mounted under `/api/v1/stats`

use std::collections::{BTreeMap, HashMap};

use axum::{
    extract::{Path, Query, State},
    routing::get,
    Router,
};
use serde::Deserialize;

use super::queries::{self, AllVisitsQuery, LabelVisitsQuery, ServiceVisitsQuery};
use crate::analytics::Interval;
use crate::api::response::ApiResponse;
use crate::api::AppState;
use crate::error::CatalogueResult;

pub fn stats_routes() -> Router<AppState> {
    Router::new()
        .route("/visits", get(all_visits))
        .route("/visits/label/:label", get(label_visits))
        .route("/visits/:service_id", get(service_visits))
}

#[derive(Debug, Deserialize)]
struct ByParams {
    #[serde(default)]
    by: Interval,
}

async fn all_visits(State(state): State<AppState>) -> CatalogueResult<ApiResponse<HashMap<String, i64>>> {
    Ok(ApiResponse::success(queries::all_visits(&state, AllVisitsQuery).await?))
}

async fn service_visits(
    State(state): State<AppState>,
    Path(service_id): Path<String>,
) -> CatalogueResult<ApiResponse<i64>> {
    let visits = queries::service_visits(&state, ServiceVisitsQuery { service_id }).await?;
    Ok(ApiResponse::success(visits))
}

async fn label_visits(
    State(state): State<AppState>,
    Path(label): Path<String>,
    Query(params): Query<ByParams>,
) -> CatalogueResult<ApiResponse<BTreeMap<String, i64>>> {
    let visits = queries::label_visits(&state, LabelVisitsQuery { label, by: params.by }).await?;
    Ok(ApiResponse::success(visits))
}
