use mediator::Request;
use serde::{Deserialize, Serialize};

use crate::api::AppState;
use crate::domain::Vocabulary;
use crate::error::{CatalogueError, CatalogueResult};
use crate::ids;
use crate::security::Authentication;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddVocabularyCommand {
    pub vocabulary: Vocabulary,
}

impl Request<CatalogueResult<Vocabulary>> for AddVocabularyCommand {}

/// Give `vocabulary` an id derived from its name when it has none
pub(crate) fn assign_id(vocabulary: &mut Vocabulary) {
    if vocabulary.id.trim().is_empty() {
        vocabulary.id = ids::vocabulary_id(&vocabulary.name, vocabulary.parent_id.as_deref());
    }
}

#[tracing::instrument(skip(state, auth, command), fields(caller = auth.email()))]
pub async fn handle(
    state: &AppState,
    auth: &Authentication,
    command: AddVocabularyCommand,
) -> CatalogueResult<Vocabulary> {
    auth.require_admin()?;
    let mut vocabulary = command.vocabulary;
    if vocabulary.name.trim().is_empty() || vocabulary.vocabulary_type.trim().is_empty() {
        return Err(CatalogueError::validation("A Vocabulary needs a name and a type"));
    }
    assign_id(&mut vocabulary);
    state.repos.vocabularies().add(&vocabulary).await?;
    tracing::info!(id = %vocabulary.id, vocabulary_type = %vocabulary.vocabulary_type, "Vocabulary added");
    Ok(vocabulary)
}
