//! Provider API routes
//!
//! # Route Structure
//!
//! - `POST /api/v1/providers` - Register a provider
//! - `PUT /api/v1/providers?comment=` - Update a provider
//! - `GET /api/v1/providers` - Browse providers
//! - `GET /api/v1/providers/my` - Providers the caller administers
//! - `GET /api/v1/providers/inactive` - Inactive providers
//! - `GET /api/v1/providers/random-for-auditing` - Providers due for an audit
//! - `DELETE /api/v1/providers/my-user-info` - Leave every provider
//! - `GET /api/v1/providers/:id` - Get a provider
//! - `DELETE /api/v1/providers/:id` - Delete a provider and its resources
//! - `PATCH /api/v1/providers/:id/verify?status=&active=` - Approve or reject
//! - `PATCH /api/v1/providers/:id/publish?active=` - Activate or deactivate
//! - `PATCH /api/v1/providers/:id/suspend?suspend=` - Suspend or unsuspend
//! - `PATCH /api/v1/providers/:id/audit?action=&comment=` - Audit
//! - `GET|PATCH /api/v1/providers/:id/terms` - Terms of use acceptance
//! - `POST /api/v1/providers/:id/deletion-request` - Ask for deletion
//! - `GET /api/v1/providers/:id/services` - The provider's services
//!
//! The caller is taken from the `x-user-email` header, see
//! [`crate::security`].

use axum::{
    extract::{Path, Query, State},
    response::Response,
    routing::{delete, get, patch, post},
    Json, Router,
};

use super::commands::{
    self, AcceptTermsCommand, ActivateProviderCommand, AddProviderCommand, AuditProviderCommand,
    DeleteProviderCommand, DeleteUserInfoCommand, RequestDeletionCommand, SuspendProviderCommand,
    UpdateProviderCommand, VerifyProviderCommand,
};
use super::queries::{
    self, GetProviderQuery, HasAcceptedTermsQuery, InactiveProvidersQuery, ListProvidersQuery,
    MyProvidersQuery, ProviderServicesQuery, RandomProvidersQuery,
};
use crate::api::response::ApiResponse;
use crate::api::AppState;
use crate::domain::{Provider, ProviderBundle, ServiceBundle};
use crate::error::CatalogueResult;
use crate::features::shared::{
    ActiveParams, AuditParams, CommentParams, RandomParams, SuspendParams, VerifyParams,
};
use crate::search::FacetFilter;
use crate::security::Authentication;

// ============================================================================
// Router Configuration
// ============================================================================

pub fn providers_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(add_provider).put(update_provider).get(list_providers))
        .route("/my", get(my_providers))
        .route("/inactive", get(inactive_providers))
        .route("/random-for-auditing", get(random_providers))
        .route("/my-user-info", delete(delete_user_info))
        .route("/:id", get(get_provider).delete(delete_provider))
        .route("/:id/verify", patch(verify_provider))
        .route("/:id/publish", patch(activate_provider))
        .route("/:id/suspend", patch(suspend_provider))
        .route("/:id/audit", patch(audit_provider))
        .route("/:id/terms", get(has_accepted_terms).patch(accept_terms))
        .route("/:id/deletion-request", post(request_deletion))
        .route("/:id/services", get(provider_services))
}

// ============================================================================
// Command Handlers (Write Operations)
// ============================================================================

/// Register a provider
///
/// # Response
///
/// - `201 Created` - Provider registered, pending approval
/// - `409 Conflict` - A provider with the same id exists
/// - `422 Unprocessable Entity` - Validation error
async fn add_provider(
    State(state): State<AppState>,
    auth: Authentication,
    Json(provider): Json<Provider>,
) -> CatalogueResult<Response> {
    let bundle = commands::add::handle(&state, &auth, AddProviderCommand { provider }).await?;
    Ok(ApiResponse::created(bundle))
}

async fn update_provider(
    State(state): State<AppState>,
    auth: Authentication,
    Query(params): Query<CommentParams>,
    Json(provider): Json<Provider>,
) -> CatalogueResult<ApiResponse<ProviderBundle>> {
    let command = UpdateProviderCommand {
        provider,
        comment: params.comment,
    };
    let bundle = commands::update::handle(&state, &auth, command).await?;
    Ok(ApiResponse::success(bundle))
}

async fn delete_provider(
    State(state): State<AppState>,
    auth: Authentication,
    Path(id): Path<String>,
) -> CatalogueResult<ApiResponse<ProviderBundle>> {
    let bundle = commands::delete::handle(&state, &auth, DeleteProviderCommand { id }).await?;
    Ok(ApiResponse::success(bundle))
}

async fn verify_provider(
    State(state): State<AppState>,
    auth: Authentication,
    Path(id): Path<String>,
    Query(params): Query<VerifyParams>,
) -> CatalogueResult<ApiResponse<ProviderBundle>> {
    let command = VerifyProviderCommand {
        id,
        status: params.status,
        active: params.active,
    };
    let bundle = commands::verify::handle(&state, &auth, command).await?;
    Ok(ApiResponse::success(bundle))
}

async fn activate_provider(
    State(state): State<AppState>,
    auth: Authentication,
    Path(id): Path<String>,
    Query(params): Query<ActiveParams>,
) -> CatalogueResult<ApiResponse<ProviderBundle>> {
    let command = ActivateProviderCommand {
        id,
        active: params.active,
    };
    let bundle = commands::activate::handle(&state, &auth, command).await?;
    Ok(ApiResponse::success(bundle))
}

async fn suspend_provider(
    State(state): State<AppState>,
    auth: Authentication,
    Path(id): Path<String>,
    Query(params): Query<SuspendParams>,
) -> CatalogueResult<ApiResponse<ProviderBundle>> {
    let command = SuspendProviderCommand {
        id,
        suspend: params.suspend,
    };
    let bundle = commands::suspend::handle(&state, &auth, command).await?;
    Ok(ApiResponse::success(bundle))
}

async fn audit_provider(
    State(state): State<AppState>,
    auth: Authentication,
    Path(id): Path<String>,
    Query(params): Query<AuditParams>,
) -> CatalogueResult<ApiResponse<ProviderBundle>> {
    let command = AuditProviderCommand {
        id,
        action: params.action,
        comment: params.comment,
    };
    let bundle = commands::audit::handle(&state, &auth, command).await?;
    Ok(ApiResponse::success(bundle))
}

async fn accept_terms(
    State(state): State<AppState>,
    auth: Authentication,
    Path(id): Path<String>,
) -> CatalogueResult<ApiResponse<bool>> {
    let accepted = commands::terms::handle(&state, &auth, AcceptTermsCommand { id }).await?;
    Ok(ApiResponse::success(accepted))
}

async fn request_deletion(
    State(state): State<AppState>,
    auth: Authentication,
    Path(id): Path<String>,
) -> CatalogueResult<ApiResponse<()>> {
    commands::deletion_request::handle(&state, &auth, RequestDeletionCommand { id }).await?;
    Ok(ApiResponse::success(()))
}

async fn delete_user_info(
    State(state): State<AppState>,
    auth: Authentication,
) -> CatalogueResult<ApiResponse<commands::DeleteUserInfoResponse>> {
    let response = commands::delete_user_info::handle(&state, &auth, DeleteUserInfoCommand).await?;
    Ok(ApiResponse::success(response))
}

// ============================================================================
// Query Handlers (Read Operations)
// ============================================================================

/// Browse providers
///
/// Any query parameter other than `query`, `from`, `quantity`, `order`,
/// `orderField` and `browseBy` filters on the indexed field of that name.
async fn list_providers(
    State(state): State<AppState>,
    auth: Authentication,
    Query(params): Query<Vec<(String, String)>>,
) -> CatalogueResult<ApiResponse<Vec<ProviderBundle>>> {
    let query = ListProvidersQuery {
        filter: FacetFilter::from_params(params)?,
    };
    let page = queries::list::handle(&state, &auth, query).await?;
    Ok(ApiResponse::paged(page))
}

async fn my_providers(
    State(state): State<AppState>,
    auth: Authentication,
) -> CatalogueResult<ApiResponse<Vec<ProviderBundle>>> {
    let providers = queries::my::handle(&state, &auth, MyProvidersQuery).await?;
    Ok(ApiResponse::success(providers))
}

async fn inactive_providers(
    State(state): State<AppState>,
    auth: Authentication,
    Query(params): Query<Vec<(String, String)>>,
) -> CatalogueResult<ApiResponse<Vec<ProviderBundle>>> {
    let query = InactiveProvidersQuery {
        filter: FacetFilter::from_params(params)?,
    };
    let page = queries::inactive::handle(&state, &auth, query).await?;
    Ok(ApiResponse::paged(page))
}

async fn random_providers(
    State(state): State<AppState>,
    auth: Authentication,
    Query(params): Query<RandomParams>,
) -> CatalogueResult<ApiResponse<Vec<ProviderBundle>>> {
    let providers = queries::random::handle(&state, &auth, RandomProvidersQuery { params }).await?;
    Ok(ApiResponse::success(providers))
}

async fn get_provider(
    State(state): State<AppState>,
    auth: Authentication,
    Path(id): Path<String>,
) -> CatalogueResult<ApiResponse<ProviderBundle>> {
    let bundle = queries::get::handle(&state, &auth, GetProviderQuery { id }).await?;
    Ok(ApiResponse::success(bundle))
}

async fn has_accepted_terms(
    State(state): State<AppState>,
    auth: Authentication,
    Path(id): Path<String>,
) -> CatalogueResult<ApiResponse<bool>> {
    let accepted = queries::terms::handle(&state, &auth, HasAcceptedTermsQuery { id }).await?;
    Ok(ApiResponse::success(accepted))
}

async fn provider_services(
    State(state): State<AppState>,
    auth: Authentication,
    Path(provider_id): Path<String>,
) -> CatalogueResult<ApiResponse<Vec<ServiceBundle>>> {
    let services = queries::services::handle(&state, &auth, ProviderServicesQuery { provider_id }).await?;
    Ok(ApiResponse::success(services))
}
