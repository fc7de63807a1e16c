//! Vocabulary backed checks

use crate::api::AppState;
use crate::domain::ResourcePayload;
use crate::error::{CatalogueError, CatalogueResult};

/// Every vocabulary reference of `payload` must exist and be of the right type
pub async fn check_vocabularies<T: ResourcePayload>(state: &AppState, payload: &T) -> CatalogueResult<()> {
    let vocabularies = state.repos.vocabularies();
    for reference in payload.vocabulary_refs() {
        let Some(vocabulary) = vocabularies.get(&reference.value).await? else {
            return Err(CatalogueError::validation(format!(
                "Field '{}' should contain an existing vocabulary id: '{}'",
                reference.field, reference.value
            )));
        };
        if vocabulary.vocabulary_type != reference.vocabulary_type {
            return Err(CatalogueError::validation(format!(
                "Field '{}' should contain a vocabulary of type '{}', found '{}'",
                reference.field, reference.vocabulary_type, vocabulary.vocabulary_type
            )));
        }
    }
    Ok(())
}

/// `status` must be one of the state vocabularies of `T`
pub async fn check_status<T: ResourcePayload>(state: &AppState, status: &str) -> CatalogueResult<()> {
    let expected = T::STATES.vocabulary_type;
    let found = state.repos.vocabularies().get(status).await?;
    match found {
        Some(vocabulary) if vocabulary.vocabulary_type == expected => Ok(()),
        _ => Err(CatalogueError::validation(format!(
            "Vocabulary '{}' does not consist a {}!",
            status, expected
        ))),
    }
}
