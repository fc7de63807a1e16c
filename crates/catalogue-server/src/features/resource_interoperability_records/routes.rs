//! Resource interoperability record API routes
//!
//! - `POST /api/v1/resource-interoperability-records?resourceType=service|training_resource` - Link a resource
//! - `PUT /api/v1/resource-interoperability-records?comment=` - Update
//! - `GET /api/v1/resource-interoperability-records` - Browse
//! - `GET /api/v1/resource-interoperability-records/by-resource/:resource_id` - The link of a resource
//! - `GET /api/v1/resource-interoperability-records/:id` - Get one
//! - `DELETE /api/v1/resource-interoperability-records/:id` - Delete

use axum::{
    extract::{Path, Query, State},
    response::Response,
    routing::get,
    Json, Router,
};
use serde::Deserialize;

use super::commands::{
    self, AddResourceInteroperabilityRecordCommand, DeleteResourceInteroperabilityRecordCommand,
    LinkedResourceType, UpdateResourceInteroperabilityRecordCommand,
};
use super::queries::{
    self, GetResourceInteroperabilityRecordQuery, ListResourceInteroperabilityRecordsQuery,
    ResourceInteroperabilityRecordByResourceQuery,
};
use crate::api::response::ApiResponse;
use crate::api::AppState;
use crate::domain::{ResourceInteroperabilityRecord, ResourceInteroperabilityRecordBundle};
use crate::error::CatalogueResult;
use crate::features::shared::CommentParams;
use crate::search::FacetFilter;
use crate::security::Authentication;

/// `?resourceType=`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LinkParams {
    resource_type: LinkedResourceType,
}

pub fn resource_interoperability_records_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_links).post(add_link).put(update_link))
        .route("/by-resource/:resource_id", get(link_by_resource))
        .route("/:id", get(get_link).delete(delete_link))
}

async fn add_link(
    State(state): State<AppState>,
    auth: Authentication,
    Query(params): Query<LinkParams>,
    Json(link): Json<ResourceInteroperabilityRecord>,
) -> CatalogueResult<Response> {
    let command = AddResourceInteroperabilityRecordCommand {
        link,
        resource_type: params.resource_type,
    };
    let bundle = commands::add::handle(&state, &auth, command).await?;
    Ok(ApiResponse::created(bundle))
}

async fn update_link(
    State(state): State<AppState>,
    auth: Authentication,
    Query(params): Query<CommentParams>,
    Json(link): Json<ResourceInteroperabilityRecord>,
) -> CatalogueResult<ApiResponse<ResourceInteroperabilityRecordBundle>> {
    let command = UpdateResourceInteroperabilityRecordCommand {
        link,
        comment: params.comment,
    };
    let bundle = commands::update::handle(&state, &auth, command).await?;
    Ok(ApiResponse::success(bundle))
}

async fn delete_link(
    State(state): State<AppState>,
    auth: Authentication,
    Path(id): Path<String>,
) -> CatalogueResult<ApiResponse<ResourceInteroperabilityRecordBundle>> {
    let command = DeleteResourceInteroperabilityRecordCommand { id };
    let bundle = commands::delete::handle(&state, &auth, command).await?;
    Ok(ApiResponse::success(bundle))
}

async fn list_links(
    State(state): State<AppState>,
    auth: Authentication,
    Query(params): Query<Vec<(String, String)>>,
) -> CatalogueResult<ApiResponse<Vec<ResourceInteroperabilityRecordBundle>>> {
    let query = ListResourceInteroperabilityRecordsQuery {
        filter: FacetFilter::from_params(params)?,
    };
    let page = queries::list::handle(&state, &auth, query).await?;
    Ok(ApiResponse::paged(page))
}

async fn get_link(
    State(state): State<AppState>,
    auth: Authentication,
    Path(id): Path<String>,
) -> CatalogueResult<ApiResponse<ResourceInteroperabilityRecordBundle>> {
    let bundle = queries::get::handle(&state, &auth, GetResourceInteroperabilityRecordQuery { id }).await?;
    Ok(ApiResponse::success(bundle))
}

async fn link_by_resource(
    State(state): State<AppState>,
    auth: Authentication,
    Path(resource_id): Path<String>,
) -> CatalogueResult<ApiResponse<Option<ResourceInteroperabilityRecordBundle>>> {
    let query = ResourceInteroperabilityRecordByResourceQuery { resource_id };
    let bundle = queries::by_resource::handle(&state, &auth, query).await?;
    Ok(ApiResponse::success(bundle))
}
