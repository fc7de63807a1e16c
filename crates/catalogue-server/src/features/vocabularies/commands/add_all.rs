use mediator::Request;
use serde::{Deserialize, Serialize};

use super::add::assign_id;
use crate::api::AppState;
use crate::domain::Vocabulary;
use crate::error::CatalogueResult;
use crate::security::Authentication;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddVocabulariesCommand {
    pub vocabularies: Vec<Vocabulary>,
}

impl Request<CatalogueResult<Vec<Vocabulary>>> for AddVocabulariesCommand {}

/// Bulk add, skipping entries whose id is taken
#[tracing::instrument(skip(state, auth, command), fields(caller = auth.email(), count = command.vocabularies.len()))]
pub async fn handle(
    state: &AppState,
    auth: &Authentication,
    command: AddVocabulariesCommand,
) -> CatalogueResult<Vec<Vocabulary>> {
    auth.require_admin()?;
    let repo = state.repos.vocabularies();
    let mut added = Vec::with_capacity(command.vocabularies.len());
    for mut vocabulary in command.vocabularies {
        assign_id(&mut vocabulary);
        if repo.exists(&vocabulary.id).await? {
            tracing::warn!(id = %vocabulary.id, "Vocabulary already exists, skipping");
            continue;
        }
        repo.add(&vocabulary).await?;
        added.push(vocabulary);
    }
    tracing::info!(added = added.len(), "Vocabularies added");
    Ok(added)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::shared::test_helpers::TestContext;

    #[tokio::test]
    async fn test_existing_entries_are_skipped() {
        let ctx = TestContext::new().await;
        let command = AddVocabulariesCommand {
            vocabularies: vec![
                Vocabulary::new("country-gr", "Greece", "Country"),
                Vocabulary::new("pending provider", "Pending", "Provider state"),
                Vocabulary::new("", "Italy", "Country"),
            ],
        };
        let added = handle(&ctx.state, &TestContext::admin(), command).await.unwrap();
        let ids: Vec<_> = added.iter().map(|v| v.id.as_str()).collect();
        assert_eq!(ids, vec!["country-gr", "italy"]);
    }
}
