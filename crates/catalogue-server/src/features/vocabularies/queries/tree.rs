use std::collections::HashMap;

use mediator::Request;
use serde::{Deserialize, Serialize};

use crate::api::AppState;
use crate::domain::Vocabulary;
use crate::error::CatalogueResult;
use crate::search::{FacetFilter, SortOrder};

/// A vocabulary with its children
///
/// The root has no vocabulary, its children are the entries of the requested
/// type. The tree is three levels deep below the root.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct VocabularyTree {
    pub vocabulary: Option<Vocabulary>,
    pub children: Vec<VocabularyTree>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VocabularyTreeQuery {
    pub vocabulary_type: String,
}

impl Request<CatalogueResult<VocabularyTree>> for VocabularyTreeQuery {}

fn branch(vocabulary: Vocabulary, by_parent: &HashMap<String, Vec<Vocabulary>>, depth: usize) -> VocabularyTree {
    let children = if depth == 0 {
        Vec::new()
    } else {
        by_parent
            .get(&vocabulary.id)
            .map(|kids| {
                kids.iter()
                    .cloned()
                    .map(|kid| branch(kid, by_parent, depth - 1))
                    .collect()
            })
            .unwrap_or_default()
    };
    VocabularyTree {
        vocabulary: Some(vocabulary),
        children,
    }
}

pub async fn handle(state: &AppState, query: VocabularyTreeQuery) -> CatalogueResult<VocabularyTree> {
    let all = state
        .repos
        .vocabularies()
        .all(&FacetFilter::all().order_by("id", SortOrder::Asc))
        .await?;

    let mut by_parent: HashMap<String, Vec<Vocabulary>> = HashMap::new();
    let mut top = Vec::new();
    for vocabulary in all {
        if vocabulary.vocabulary_type == query.vocabulary_type {
            top.push(vocabulary.clone());
        }
        if let Some(parent_id) = vocabulary.parent_id.clone() {
            by_parent.entry(parent_id).or_default().push(vocabulary);
        }
    }

    Ok(VocabularyTree {
        vocabulary: None,
        children: top.into_iter().map(|v| branch(v, &by_parent, 2)).collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::shared::test_helpers::TestContext;

    #[tokio::test]
    async fn test_three_levels() {
        let ctx = TestContext::new().await;
        let repo = ctx.state.repos.vocabularies();
        for vocabulary in [
            Vocabulary::new("category-compute", "Compute", "Category"),
            Vocabulary::new("subcategory-vm", "Virtual machines", "Subcategory").with_parent("category-compute"),
            Vocabulary::new("subcategory-vm-gpu", "GPU", "Other").with_parent("subcategory-vm"),
            Vocabulary::new("subcategory-vm-gpu-a100", "A100", "Other").with_parent("subcategory-vm-gpu"),
        ] {
            repo.add(&vocabulary).await.unwrap();
        }

        let tree = handle(&ctx.state, VocabularyTreeQuery { vocabulary_type: "Category".into() })
            .await
            .unwrap();
        assert!(tree.vocabulary.is_none());
        assert_eq!(tree.children.len(), 1);
        let compute = &tree.children[0];
        let vm = &compute.children[0];
        assert_eq!(vm.vocabulary.as_ref().unwrap().id, "subcategory-vm");
        let gpu = &vm.children[0];
        assert_eq!(gpu.vocabulary.as_ref().unwrap().id, "subcategory-vm-gpu");
        assert!(gpu.children.is_empty());
    }
}
