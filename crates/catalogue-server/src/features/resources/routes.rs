//! Routes shared by services, training resources and interoperability records
//!
//! [`resource_routes`] is mounted once per kind, e.g. under
//! `/api/v1/services`:
//!
//! - `POST /` - Register
//! - `PUT /?comment=` - Update
//! - `GET /` - Browse
//! - `GET /inactive` - Inactive resources, portal staff only
//! - `GET /random-for-auditing?quantity=&interval=` - Resources due for an audit
//! - `GET /by-provider/:provider_id` - Every resource of a provider
//! - `GET /:id` - Get one
//! - `DELETE /:id` - Delete with its public copy
//! - `PATCH /:id/verify?status=&active=` - Approve or reject
//! - `PATCH /:id/publish?active=` - Activate or deactivate
//! - `PATCH /:id/suspend?suspend=` - Suspend or unsuspend
//! - `PATCH /:id/audit?action=&comment=` - Audit

use axum::{
    extract::{Path, Query, State},
    response::Response,
    routing::{get, patch},
    Json, Router,
};

use super::commands::{
    self, ActivateResourceCommand, AddResourceCommand, AuditResourceCommand, DeleteResourceCommand,
    SuspendResourceCommand, UpdateResourceCommand, VerifyResourceCommand,
};
use super::queries::{
    self, GetResourceQuery, InactiveResourcesQuery, ListResourcesQuery, RandomResourcesQuery,
    ResourcesByProviderQuery,
};
use crate::api::response::ApiResponse;
use crate::api::AppState;
use crate::domain::{Bundle, ProviderResource};
use crate::error::CatalogueResult;
use crate::features::shared::{
    ActiveParams, AuditParams, CommentParams, RandomParams, SuspendParams, VerifyParams,
};
use crate::search::FacetFilter;
use crate::security::Authentication;

// ============================================================================
// Router Configuration
// ============================================================================

pub fn resource_routes<T: ProviderResource>() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(list_resources::<T>)
                .post(add_resource::<T>)
                .put(update_resource::<T>),
        )
        .route("/inactive", get(inactive_resources::<T>))
        .route("/random-for-auditing", get(random_resources::<T>))
        .route("/by-provider/:provider_id", get(resources_by_provider::<T>))
        .route("/:id", get(get_resource::<T>).delete(delete_resource::<T>))
        .route("/:id/verify", patch(verify_resource::<T>))
        .route("/:id/publish", patch(activate_resource::<T>))
        .route("/:id/suspend", patch(suspend_resource::<T>))
        .route("/:id/audit", patch(audit_resource::<T>))
}

// ============================================================================
// Command Handlers (Write Operations)
// ============================================================================

/// Register a resource
///
/// # Response
///
/// - `201 Created` - Registered, pending or approved depending on the
///   provider's template status
/// - `404 Not Found` - Unknown provider
/// - `409 Conflict` - Provider not approved, template under review or id taken
/// - `422 Unprocessable Entity` - Validation error
async fn add_resource<T: ProviderResource>(
    State(state): State<AppState>,
    auth: Authentication,
    Json(resource): Json<T>,
) -> CatalogueResult<Response> {
    let bundle = commands::add::handle(&state, &auth, AddResourceCommand::new(resource)).await?;
    Ok(ApiResponse::created(bundle))
}

async fn update_resource<T: ProviderResource>(
    State(state): State<AppState>,
    auth: Authentication,
    Query(params): Query<CommentParams>,
    Json(resource): Json<T>,
) -> CatalogueResult<ApiResponse<Bundle<T>>> {
    let command = UpdateResourceCommand::new(resource, params.comment);
    let bundle = commands::update::handle(&state, &auth, command).await?;
    Ok(ApiResponse::success(bundle))
}

async fn delete_resource<T: ProviderResource>(
    State(state): State<AppState>,
    auth: Authentication,
    Path(id): Path<String>,
) -> CatalogueResult<ApiResponse<Bundle<T>>> {
    let bundle = commands::delete::handle(&state, &auth, DeleteResourceCommand::<T>::new(&id)).await?;
    Ok(ApiResponse::success(bundle))
}

async fn verify_resource<T: ProviderResource>(
    State(state): State<AppState>,
    auth: Authentication,
    Path(id): Path<String>,
    Query(params): Query<VerifyParams>,
) -> CatalogueResult<ApiResponse<Bundle<T>>> {
    let command = VerifyResourceCommand::<T>::new(&id, &params.status, params.active);
    let bundle = commands::verify::handle(&state, &auth, command).await?;
    Ok(ApiResponse::success(bundle))
}

async fn activate_resource<T: ProviderResource>(
    State(state): State<AppState>,
    auth: Authentication,
    Path(id): Path<String>,
    Query(params): Query<ActiveParams>,
) -> CatalogueResult<ApiResponse<Bundle<T>>> {
    let command = ActivateResourceCommand::<T>::new(&id, params.active);
    let bundle = commands::activate::handle(&state, &auth, command).await?;
    Ok(ApiResponse::success(bundle))
}

async fn suspend_resource<T: ProviderResource>(
    State(state): State<AppState>,
    auth: Authentication,
    Path(id): Path<String>,
    Query(params): Query<SuspendParams>,
) -> CatalogueResult<ApiResponse<Bundle<T>>> {
    let command = SuspendResourceCommand::<T>::new(&id, params.suspend);
    let bundle = commands::suspend::handle(&state, &auth, command).await?;
    Ok(ApiResponse::success(bundle))
}

async fn audit_resource<T: ProviderResource>(
    State(state): State<AppState>,
    auth: Authentication,
    Path(id): Path<String>,
    Query(params): Query<AuditParams>,
) -> CatalogueResult<ApiResponse<Bundle<T>>> {
    let command = AuditResourceCommand::<T>::new(&id, params.action, params.comment);
    let bundle = commands::audit::handle(&state, &auth, command).await?;
    Ok(ApiResponse::success(bundle))
}

// ============================================================================
// Query Handlers (Read Operations)
// ============================================================================

async fn list_resources<T: ProviderResource>(
    State(state): State<AppState>,
    auth: Authentication,
    Query(params): Query<Vec<(String, String)>>,
) -> CatalogueResult<ApiResponse<Vec<Bundle<T>>>> {
    let query = ListResourcesQuery::<T>::new(FacetFilter::from_params(params)?);
    let page = queries::list::handle(&state, &auth, query).await?;
    Ok(ApiResponse::paged(page))
}

async fn inactive_resources<T: ProviderResource>(
    State(state): State<AppState>,
    auth: Authentication,
    Query(params): Query<Vec<(String, String)>>,
) -> CatalogueResult<ApiResponse<Vec<Bundle<T>>>> {
    let query = InactiveResourcesQuery::<T>::new(FacetFilter::from_params(params)?);
    let page = queries::inactive::handle(&state, &auth, query).await?;
    Ok(ApiResponse::paged(page))
}

async fn random_resources<T: ProviderResource>(
    State(state): State<AppState>,
    auth: Authentication,
    Query(params): Query<RandomParams>,
) -> CatalogueResult<ApiResponse<Vec<Bundle<T>>>> {
    let bundles = queries::random::handle(&state, &auth, RandomResourcesQuery::<T>::new(params)).await?;
    Ok(ApiResponse::success(bundles))
}

async fn resources_by_provider<T: ProviderResource>(
    State(state): State<AppState>,
    auth: Authentication,
    Path(provider_id): Path<String>,
    Query(params): Query<Vec<(String, String)>>,
) -> CatalogueResult<ApiResponse<Vec<Bundle<T>>>> {
    let query = ResourcesByProviderQuery::<T>::new(&provider_id, FacetFilter::from_params(params)?);
    let page = queries::by_provider::handle(&state, &auth, query).await?;
    Ok(ApiResponse::paged(page))
}

async fn get_resource<T: ProviderResource>(
    State(state): State<AppState>,
    auth: Authentication,
    Path(id): Path<String>,
) -> CatalogueResult<ApiResponse<Bundle<T>>> {
    let bundle = queries::get::handle(&state, &auth, GetResourceQuery::<T>::new(&id)).await?;
    Ok(ApiResponse::success(bundle))
}
