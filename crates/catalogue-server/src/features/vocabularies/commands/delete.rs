//! Removing vocabularies: one, all of a type, or everything

use mediator::Request;
use serde::{Deserialize, Serialize};

use crate::api::AppState;
use crate::domain::Vocabulary;
use crate::error::CatalogueResult;
use crate::search::FacetFilter;
use crate::security::Authentication;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteVocabularyCommand {
    pub id: String,
}

impl Request<CatalogueResult<Vocabulary>> for DeleteVocabularyCommand {}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteVocabulariesByTypeCommand {
    pub vocabulary_type: String,
}

impl Request<CatalogueResult<usize>> for DeleteVocabulariesByTypeCommand {}

#[derive(Debug, Clone, Default)]
pub struct DeleteAllVocabulariesCommand;

impl Request<CatalogueResult<u64>> for DeleteAllVocabulariesCommand {}

#[tracing::instrument(skip(state, auth), fields(caller = auth.email()))]
pub async fn handle(
    state: &AppState,
    auth: &Authentication,
    command: DeleteVocabularyCommand,
) -> CatalogueResult<Vocabulary> {
    auth.require_admin()?;
    let repo = state.repos.vocabularies();
    let vocabulary = repo.get_required(&command.id).await?;
    repo.delete(&vocabulary.id).await?;
    Ok(vocabulary)
}

#[tracing::instrument(skip(state, auth), fields(caller = auth.email()))]
pub async fn by_type(
    state: &AppState,
    auth: &Authentication,
    command: DeleteVocabulariesByTypeCommand,
) -> CatalogueResult<usize> {
    auth.require_admin()?;
    let repo = state.repos.vocabularies();
    let filter = FacetFilter::all().with_filter("type", command.vocabulary_type.as_str());
    let doomed = repo.all(&filter).await?;
    for vocabulary in &doomed {
        repo.delete(&vocabulary.id).await?;
    }
    tracing::info!(deleted = doomed.len(), "Vocabularies deleted");
    Ok(doomed.len())
}

#[tracing::instrument(skip(state, auth, _command), fields(caller = auth.email()))]
pub async fn all(
    state: &AppState,
    auth: &Authentication,
    _command: DeleteAllVocabulariesCommand,
) -> CatalogueResult<u64> {
    auth.require_admin()?;
    let deleted = state.repos.vocabularies().delete_all().await?;
    tracing::warn!(deleted, "Every vocabulary deleted");
    Ok(deleted)
}
