//! Datasource API routes
//!
//! - `POST /api/v1/datasources` - Extend a service with a datasource
//! - `PUT /api/v1/datasources?comment=` - Update
//! - `GET /api/v1/datasources` - Browse
//! - `GET /api/v1/datasources/by-service/:service_id` - The datasource of a service
//! - `GET /api/v1/datasources/:id` - Get one
//! - `DELETE /api/v1/datasources/:id` - Delete
//! - `PATCH /api/v1/datasources/:id/verify?status=&active=` - Approve or reject

use axum::{
    extract::{Path, Query, State},
    response::Response,
    routing::{get, patch},
    Json, Router,
};

use super::commands::{
    self, AddDatasourceCommand, DeleteDatasourceCommand, UpdateDatasourceCommand,
    VerifyDatasourceCommand,
};
use super::queries::{self, DatasourceByServiceQuery, GetDatasourceQuery, ListDatasourcesQuery};
use crate::api::response::ApiResponse;
use crate::api::AppState;
use crate::domain::{Datasource, DatasourceBundle};
use crate::error::CatalogueResult;
use crate::features::shared::{CommentParams, VerifyParams};
use crate::search::FacetFilter;
use crate::security::Authentication;

pub fn datasources_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(list_datasources).post(add_datasource).put(update_datasource),
        )
        .route("/by-service/:service_id", get(datasource_by_service))
        .route("/:id", get(get_datasource).delete(delete_datasource))
        .route("/:id/verify", patch(verify_datasource))
}

async fn add_datasource(
    State(state): State<AppState>,
    auth: Authentication,
    Json(datasource): Json<Datasource>,
) -> CatalogueResult<Response> {
    let bundle = commands::add::handle(&state, &auth, AddDatasourceCommand { datasource }).await?;
    Ok(ApiResponse::created(bundle))
}

async fn update_datasource(
    State(state): State<AppState>,
    auth: Authentication,
    Query(params): Query<CommentParams>,
    Json(datasource): Json<Datasource>,
) -> CatalogueResult<ApiResponse<DatasourceBundle>> {
    let command = UpdateDatasourceCommand {
        datasource,
        comment: params.comment,
    };
    let bundle = commands::update::handle(&state, &auth, command).await?;
    Ok(ApiResponse::success(bundle))
}

async fn verify_datasource(
    State(state): State<AppState>,
    auth: Authentication,
    Path(id): Path<String>,
    Query(params): Query<VerifyParams>,
) -> CatalogueResult<ApiResponse<DatasourceBundle>> {
    let command = VerifyDatasourceCommand {
        id,
        status: params.status,
        active: params.active,
    };
    let bundle = commands::verify::handle(&state, &auth, command).await?;
    Ok(ApiResponse::success(bundle))
}

async fn delete_datasource(
    State(state): State<AppState>,
    auth: Authentication,
    Path(id): Path<String>,
) -> CatalogueResult<ApiResponse<DatasourceBundle>> {
    let bundle = commands::delete::handle(&state, &auth, DeleteDatasourceCommand { id }).await?;
    Ok(ApiResponse::success(bundle))
}

async fn list_datasources(
    State(state): State<AppState>,
    auth: Authentication,
    Query(params): Query<Vec<(String, String)>>,
) -> CatalogueResult<ApiResponse<Vec<DatasourceBundle>>> {
    let query = ListDatasourcesQuery {
        filter: FacetFilter::from_params(params)?,
    };
    let page = queries::list::handle(&state, &auth, query).await?;
    Ok(ApiResponse::paged(page))
}

async fn get_datasource(
    State(state): State<AppState>,
    auth: Authentication,
    Path(id): Path<String>,
) -> CatalogueResult<ApiResponse<DatasourceBundle>> {
    let bundle = queries::get::handle(&state, &auth, GetDatasourceQuery { id }).await?;
    Ok(ApiResponse::success(bundle))
}

async fn datasource_by_service(
    State(state): State<AppState>,
    auth: Authentication,
    Path(service_id): Path<String>,
) -> CatalogueResult<ApiResponse<Option<DatasourceBundle>>> {
    let bundle = queries::by_service::handle(&state, &auth, DatasourceByServiceQuery { service_id }).await?;
    Ok(ApiResponse::success(bundle))
}
