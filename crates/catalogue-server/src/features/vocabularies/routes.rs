//! Vocabulary routes, mounted under `/api/v1/vocabularies`
//!
//! Reads are public. Writes need an administrator.

use std::collections::BTreeMap;

use axum::{
    extract::{Path, Query, State},
    response::Response,
    routing::{get, post, put},
    Json, Router,
};

use super::commands::{
    self, AddVocabulariesCommand, AddVocabularyCommand, DeleteAllVocabulariesCommand,
    DeleteVocabulariesByTypeCommand, DeleteVocabularyCommand, UpdateHostingLegalEntitiesCommand,
    UpdateVocabularyCommand,
};
use super::queries::{
    self, AllVocabulariesByTypeQuery, CountriesByRegionQuery, GetVocabularyQuery, ListVocabulariesQuery,
    ParentVocabularyQuery, VocabulariesByTypeQuery, VocabularyMapQuery, VocabularyTree, VocabularyTreeQuery,
};
use crate::api::response::ApiResponse;
use crate::api::AppState;
use crate::domain::Vocabulary;
use crate::error::CatalogueResult;
use crate::search::FacetFilter;
use crate::security::Authentication;

// ============================================================================
// Router Configuration
// ============================================================================

pub fn vocabularies_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(list_vocabularies)
                .post(add_vocabulary)
                .put(update_vocabulary)
                .delete(delete_all_vocabularies),
        )
        .route("/bulk", post(add_vocabularies))
        .route("/by-type", get(all_by_type))
        .route("/by-type/:vocabulary_type", get(by_type).delete(delete_by_type))
        .route("/map", get(vocabulary_map))
        .route("/tree/:vocabulary_type", get(vocabulary_tree))
        .route("/countries/:region", get(countries_by_region))
        .route("/hosting-legal-entities", put(update_hosting_legal_entities))
        .route("/:id", get(get_vocabulary).delete(delete_vocabulary))
        .route("/:id/parent", get(parent_vocabulary))
}

// ============================================================================
// Command Handlers (Write Operations)
// ============================================================================

async fn add_vocabulary(
    State(state): State<AppState>,
    auth: Authentication,
    Json(vocabulary): Json<Vocabulary>,
) -> CatalogueResult<Response> {
    let vocabulary = commands::add::handle(&state, &auth, AddVocabularyCommand { vocabulary }).await?;
    Ok(ApiResponse::created(vocabulary))
}

async fn add_vocabularies(
    State(state): State<AppState>,
    auth: Authentication,
    Json(vocabularies): Json<Vec<Vocabulary>>,
) -> CatalogueResult<Response> {
    let added = commands::add_all::handle(&state, &auth, AddVocabulariesCommand { vocabularies }).await?;
    Ok(ApiResponse::created(added))
}

async fn update_vocabulary(
    State(state): State<AppState>,
    auth: Authentication,
    Json(vocabulary): Json<Vocabulary>,
) -> CatalogueResult<ApiResponse<Vocabulary>> {
    let vocabulary = commands::update::handle(&state, &auth, UpdateVocabularyCommand { vocabulary }).await?;
    Ok(ApiResponse::success(vocabulary))
}

async fn delete_vocabulary(
    State(state): State<AppState>,
    auth: Authentication,
    Path(id): Path<String>,
) -> CatalogueResult<ApiResponse<Vocabulary>> {
    let vocabulary = commands::delete::handle(&state, &auth, DeleteVocabularyCommand { id }).await?;
    Ok(ApiResponse::success(vocabulary))
}

async fn delete_by_type(
    State(state): State<AppState>,
    auth: Authentication,
    Path(vocabulary_type): Path<String>,
) -> CatalogueResult<ApiResponse<usize>> {
    let deleted = commands::delete::by_type(&state, &auth, DeleteVocabulariesByTypeCommand { vocabulary_type }).await?;
    Ok(ApiResponse::success(deleted))
}

async fn delete_all_vocabularies(
    State(state): State<AppState>,
    auth: Authentication,
) -> CatalogueResult<ApiResponse<u64>> {
    let deleted = commands::delete::all(&state, &auth, DeleteAllVocabulariesCommand).await?;
    Ok(ApiResponse::success(deleted))
}

/// Register every approved legal-entity provider as a hosting legal entity
async fn update_hosting_legal_entities(
    State(state): State<AppState>,
    auth: Authentication,
) -> CatalogueResult<ApiResponse<usize>> {
    let added =
        commands::hosting_legal_entities::handle(&state, &auth, UpdateHostingLegalEntitiesCommand).await?;
    Ok(ApiResponse::success(added))
}

// ============================================================================
// Query Handlers (Read Operations)
// ============================================================================

async fn list_vocabularies(
    State(state): State<AppState>,
    Query(params): Query<Vec<(String, String)>>,
) -> CatalogueResult<ApiResponse<Vec<Vocabulary>>> {
    let filter = FacetFilter::from_params(params)?;
    let page = queries::by_type::list(&state, ListVocabulariesQuery { filter }).await?;
    Ok(ApiResponse::paged(page))
}

async fn get_vocabulary(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> CatalogueResult<ApiResponse<Vocabulary>> {
    let vocabulary = queries::get::handle(&state, GetVocabularyQuery { id }).await?;
    Ok(ApiResponse::success(vocabulary))
}

async fn parent_vocabulary(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> CatalogueResult<ApiResponse<Option<Vocabulary>>> {
    let parent = queries::get::parent(&state, ParentVocabularyQuery { id }).await?;
    Ok(ApiResponse::success(parent))
}

async fn by_type(
    State(state): State<AppState>,
    Path(vocabulary_type): Path<String>,
) -> CatalogueResult<ApiResponse<Vec<Vocabulary>>> {
    let found = queries::by_type::handle(&state, VocabulariesByTypeQuery { vocabulary_type }).await?;
    Ok(ApiResponse::success(found))
}

async fn all_by_type(State(state): State<AppState>) -> CatalogueResult<ApiResponse<BTreeMap<String, Vec<Vocabulary>>>> {
    let grouped = queries::by_type::all_by_type(&state, AllVocabulariesByTypeQuery).await?;
    Ok(ApiResponse::success(grouped))
}

async fn vocabulary_map(State(state): State<AppState>) -> CatalogueResult<ApiResponse<BTreeMap<String, Vocabulary>>> {
    let by_id = queries::by_type::map(&state, VocabularyMapQuery).await?;
    Ok(ApiResponse::success(by_id))
}

async fn vocabulary_tree(
    State(state): State<AppState>,
    Path(vocabulary_type): Path<String>,
) -> CatalogueResult<ApiResponse<VocabularyTree>> {
    let tree = queries::tree::handle(&state, VocabularyTreeQuery { vocabulary_type }).await?;
    Ok(ApiResponse::success(tree))
}

async fn countries_by_region(
    State(state): State<AppState>,
    Path(region): Path<String>,
) -> CatalogueResult<ApiResponse<Vec<String>>> {
    let countries = queries::region::handle(&state, CountriesByRegionQuery { region }).await?;
    Ok(ApiResponse::success(countries))
}
