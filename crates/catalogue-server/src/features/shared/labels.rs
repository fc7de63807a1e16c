use std::collections::HashMap;

use crate::api::AppState;
use crate::error::CatalogueResult;
use crate::search::{FacetFilter, Paging};

/// Replace facet value labels with the names of the vocabularies they point at
///
/// Values that are not vocabulary ids keep their own text as label.
pub async fn label_facets<T>(state: &AppState, mut page: Paging<T>) -> CatalogueResult<Paging<T>> {
    if page.facets.is_empty() {
        return Ok(page);
    }
    let names: HashMap<String, String> = state
        .repos
        .vocabularies()
        .all(&FacetFilter::all())
        .await?
        .into_iter()
        .map(|v| (v.id, v.name))
        .collect();

    for value in page.facets.iter_mut().flat_map(|f| f.values.iter_mut()) {
        if let Some(name) = names.get(&value.value) {
            value.label = name.clone();
        }
    }
    Ok(page)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::states::PROVIDER_STATES;
    use crate::features::shared::test_helpers::TestContext;
    use crate::search::Facet;

    #[tokio::test]
    async fn test_labels_from_vocabularies() {
        let ctx = TestContext::new().await;
        let facet = Facet::new(
            "status",
            [(PROVIDER_STATES.approved.to_string(), 2), ("unknown".to_string(), 1)],
        );
        let page = Paging::new(3, 0, vec![1, 2, 3], vec![facet]);

        let page = label_facets(&ctx.state, page).await.unwrap();
        let values = &page.facets[0].values;
        assert_eq!(values[0].label, "Approved Provider");
        assert_eq!(values[1].label, "unknown");
    }
}
