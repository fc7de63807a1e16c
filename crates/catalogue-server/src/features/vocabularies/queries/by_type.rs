//! Vocabularies grouped by their type

use std::collections::BTreeMap;

use mediator::Request;
use serde::{Deserialize, Serialize};

use crate::api::AppState;
use crate::domain::Vocabulary;
use crate::error::CatalogueResult;
use crate::search::{FacetFilter, Paging, SortOrder};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VocabulariesByTypeQuery {
    pub vocabulary_type: String,
}

impl Request<CatalogueResult<Vec<Vocabulary>>> for VocabulariesByTypeQuery {}

/// Every vocabulary of one type, sorted by id
pub async fn handle(state: &AppState, query: VocabulariesByTypeQuery) -> CatalogueResult<Vec<Vocabulary>> {
    let filter = FacetFilter::all()
        .with_filter("type", query.vocabulary_type.as_str())
        .order_by("id", SortOrder::Asc);
    Ok(state.repos.vocabularies().all(&filter).await?)
}

#[derive(Debug, Clone, Default)]
pub struct AllVocabulariesByTypeQuery;

impl Request<CatalogueResult<BTreeMap<String, Vec<Vocabulary>>>> for AllVocabulariesByTypeQuery {}

pub async fn all_by_type(
    state: &AppState,
    _query: AllVocabulariesByTypeQuery,
) -> CatalogueResult<BTreeMap<String, Vec<Vocabulary>>> {
    let filter = FacetFilter::all().order_by("id", SortOrder::Asc);
    let mut grouped: BTreeMap<String, Vec<Vocabulary>> = BTreeMap::new();
    for vocabulary in state.repos.vocabularies().all(&filter).await? {
        grouped
            .entry(vocabulary.vocabulary_type.clone())
            .or_default()
            .push(vocabulary);
    }
    Ok(grouped)
}

#[derive(Debug, Clone, Default)]
pub struct VocabularyMapQuery;

impl Request<CatalogueResult<BTreeMap<String, Vocabulary>>> for VocabularyMapQuery {}

/// Id to vocabulary, for clients resolving labels
pub async fn map(state: &AppState, _query: VocabularyMapQuery) -> CatalogueResult<BTreeMap<String, Vocabulary>> {
    Ok(state
        .repos
        .vocabularies()
        .all(&FacetFilter::all())
        .await?
        .into_iter()
        .map(|v| (v.id.clone(), v))
        .collect())
}

#[derive(Debug, Clone, Default)]
pub struct ListVocabulariesQuery {
    pub filter: FacetFilter,
}

impl Request<CatalogueResult<Paging<Vocabulary>>> for ListVocabulariesQuery {}

pub async fn list(state: &AppState, query: ListVocabulariesQuery) -> CatalogueResult<Paging<Vocabulary>> {
    Ok(state.repos.vocabularies().search(&query.filter).await?)
}
