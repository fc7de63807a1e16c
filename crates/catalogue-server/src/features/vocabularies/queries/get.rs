use mediator::Request;
use serde::{Deserialize, Serialize};

use crate::api::AppState;
use crate::domain::Vocabulary;
use crate::error::CatalogueResult;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetVocabularyQuery {
    pub id: String,
}

impl Request<CatalogueResult<Vocabulary>> for GetVocabularyQuery {}

pub async fn handle(state: &AppState, query: GetVocabularyQuery) -> CatalogueResult<Vocabulary> {
    Ok(state.repos.vocabularies().get_required(&query.id).await?)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParentVocabularyQuery {
    pub id: String,
}

impl Request<CatalogueResult<Option<Vocabulary>>> for ParentVocabularyQuery {}

/// The parent of a vocabulary, `None` for top level entries
pub async fn parent(state: &AppState, query: ParentVocabularyQuery) -> CatalogueResult<Option<Vocabulary>> {
    let repo = state.repos.vocabularies();
    let vocabulary = repo.get_required(&query.id).await?;
    match vocabulary.parent_id.as_deref() {
        Some(parent_id) => Ok(Some(repo.get_required(parent_id).await?)),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::shared::test_helpers::TestContext;

    #[tokio::test]
    async fn test_parent_lookup() {
        let ctx = TestContext::new().await;
        let repo = ctx.state.repos.vocabularies();
        repo.add(&Vocabulary::new("scientific_domain-natural_sciences", "Natural Sciences", "Scientific domain"))
            .await
            .unwrap();
        repo.add(
            &Vocabulary::new("scientific_subdomain-physics", "Physics", "Scientific subdomain")
                .with_parent("scientific_domain-natural_sciences"),
        )
        .await
        .unwrap();

        let found = parent(&ctx.state, ParentVocabularyQuery { id: "scientific_subdomain-physics".into() })
            .await
            .unwrap();
        assert_eq!(found.unwrap().name, "Natural Sciences");
        let found = parent(&ctx.state, ParentVocabularyQuery { id: "scientific_domain-natural_sciences".into() })
            .await
            .unwrap();
        assert!(found.is_none());

        let err = handle(&ctx.state, GetVocabularyQuery { id: "nope".into() }).await.unwrap_err();
        assert_eq!(err.to_string(), "Vocabulary with id 'nope' does not exist!");
    }
}
