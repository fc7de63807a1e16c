use mediator::Request;
use serde::{Deserialize, Serialize};

use crate::api::AppState;
use crate::domain::Vocabulary;
use crate::error::CatalogueResult;
use crate::security::Authentication;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateVocabularyCommand {
    pub vocabulary: Vocabulary,
}

impl Request<CatalogueResult<Vocabulary>> for UpdateVocabularyCommand {}

#[tracing::instrument(skip(state, auth, command), fields(id = %command.vocabulary.id, caller = auth.email()))]
pub async fn handle(
    state: &AppState,
    auth: &Authentication,
    command: UpdateVocabularyCommand,
) -> CatalogueResult<Vocabulary> {
    auth.require_admin()?;
    let repo = state.repos.vocabularies();
    repo.get_required(&command.vocabulary.id).await?;
    repo.update(&command.vocabulary).await?;
    Ok(command.vocabulary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CatalogueError;
    use crate::features::shared::test_helpers::TestContext;

    #[tokio::test]
    async fn test_missing_vocabulary() {
        let ctx = TestContext::new().await;
        let command = UpdateVocabularyCommand {
            vocabulary: Vocabulary::new("country-xx", "Nowhere", "Country"),
        };
        let err = handle(&ctx.state, &TestContext::admin(), command).await.unwrap_err();
        assert!(matches!(err, CatalogueError::NotFound(_)));
        assert_eq!(err.to_string(), "Vocabulary with id 'country-xx' does not exist!");
    }
}
