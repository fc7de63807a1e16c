//! State vocabularies every deployment needs
//!
//! Statuses are vocabulary ids, so `verify` can only accept a status once its
//! vocabulary exists. Seeding is idempotent: entries already present are left
//! alone.

use crate::api::AppState;
use crate::domain::states::{
    template, vocabulary_type, StateVocabulary, DATASOURCE_STATES, INTEROPERABILITY_RECORD_STATES,
    PROVIDER_STATES, RESOURCE_STATES,
};
use crate::domain::Vocabulary;
use crate::error::CatalogueResult;

/// "pending provider" -> "Pending Provider"
fn title(id: &str) -> String {
    id.split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

fn state_vocabularies() -> Vec<Vocabulary> {
    let states: [StateVocabulary; 4] = [
        PROVIDER_STATES,
        RESOURCE_STATES,
        DATASOURCE_STATES,
        INTEROPERABILITY_RECORD_STATES,
    ];
    let mut vocabularies: Vec<Vocabulary> = states
        .iter()
        .flat_map(|s| s.all().map(|id| Vocabulary::new(id, &title(id), s.vocabulary_type)))
        .collect();
    vocabularies.extend(
        template::ALL
            .iter()
            .map(|id| Vocabulary::new(id, &title(id), vocabulary_type::TEMPLATE_STATE)),
    );
    vocabularies
}

/// Add the missing state vocabularies, returning how many were added
#[tracing::instrument(skip(state))]
pub async fn handle(state: &AppState) -> CatalogueResult<usize> {
    let repo = state.repos.vocabularies();
    let mut added = 0;
    for vocabulary in state_vocabularies() {
        if !repo.exists(&vocabulary.id).await? {
            repo.add(&vocabulary).await?;
            added += 1;
        }
    }
    if added > 0 {
        tracing::info!(added, "Seeded state vocabularies");
    }
    Ok(added)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::shared::test_helpers::TestContext;

    #[test]
    fn test_title() {
        assert_eq!(title("approved interoperability record"), "Approved Interoperability Record");
    }

    #[tokio::test]
    async fn test_seed_is_idempotent() {
        let ctx = TestContext::new().await;
        assert_eq!(handle(&ctx.state).await.unwrap(), 0);
        assert_eq!(ctx.state.repos.vocabularies().count().await.unwrap(), 16);

        let pending = ctx.state.repos.vocabularies().get_required(template::PENDING).await.unwrap();
        assert_eq!(pending.vocabulary_type, vocabulary_type::TEMPLATE_STATE);
        assert_eq!(pending.name, "Pending Template");
    }
}
