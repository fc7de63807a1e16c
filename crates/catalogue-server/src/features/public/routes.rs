//! Read-only routes over the published copies, mounted under `/api/v1/public`
//!
//! - `GET /providers`, `GET /providers/:id`
//! - `GET /services`, `GET /services/:id`
//! - `GET /training-resources`, `GET /training-resources/:id`
//! - `GET /datasources`, `GET /datasources/:id`
//! - `GET /interoperability-records`, `GET /interoperability-records/:id`

use axum::{
    extract::{Path, Query, State},
    routing::get,
    Router,
};

use super::queries::{self, GetPublicQuery, ListPublicQuery};
use crate::api::response::ApiResponse;
use crate::api::AppState;
use crate::domain::{Bundle, Datasource, InteroperabilityRecord, Provider, ResourcePayload, Service, TrainingResource};
use crate::error::CatalogueResult;
use crate::search::FacetFilter;
use crate::security::Authentication;

// ============================================================================
// Router Configuration
// ============================================================================

pub fn public_routes() -> Router<AppState> {
    Router::new()
        .nest("/providers", kind_routes::<Provider>())
        .nest("/services", kind_routes::<Service>())
        .nest("/training-resources", kind_routes::<TrainingResource>())
        .nest("/datasources", kind_routes::<Datasource>())
        .nest("/interoperability-records", kind_routes::<InteroperabilityRecord>())
}

fn kind_routes<T: ResourcePayload>() -> Router<AppState> {
    Router::new()
        .route("/", get(list_public::<T>))
        .route("/:id", get(get_public::<T>))
}

// ============================================================================
// Query Handlers (Read Operations)
// ============================================================================

async fn list_public<T: ResourcePayload>(
    State(state): State<AppState>,
    auth: Authentication,
    Query(params): Query<Vec<(String, String)>>,
) -> CatalogueResult<ApiResponse<Vec<Bundle<T>>>> {
    let query = ListPublicQuery::<T>::new(FacetFilter::from_params(params)?);
    let page = queries::list::handle(&state, &auth, query).await?;
    Ok(ApiResponse::paged(page))
}

async fn get_public<T: ResourcePayload>(
    State(state): State<AppState>,
    auth: Authentication,
    Path(id): Path<String>,
) -> CatalogueResult<ApiResponse<Bundle<T>>> {
    let bundle = queries::get::handle(&state, &auth, GetPublicQuery::<T>::new(&id)).await?;
    Ok(ApiResponse::success(bundle))
}
