use mediator::Request;
use serde::{Deserialize, Serialize};

use crate::api::AppState;
use crate::domain::states::vocabulary_type;
use crate::error::CatalogueResult;
use crate::search::{FacetFilter, SortOrder};

/// Worldwide: every country
pub const WORLDWIDE: &str = "WW";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CountriesByRegionQuery {
    pub region: String,
}

impl Request<CatalogueResult<Vec<String>>> for CountriesByRegionQuery {}

/// Ids of the countries whose `region` extra is the requested region
pub async fn handle(state: &AppState, query: CountriesByRegionQuery) -> CatalogueResult<Vec<String>> {
    let filter = FacetFilter::all()
        .with_filter("type", vocabulary_type::COUNTRY)
        .order_by("id", SortOrder::Asc);
    let countries = state.repos.vocabularies().all(&filter).await?;
    Ok(countries
        .into_iter()
        .filter(|c| query.region == WORLDWIDE || c.extras.get("region") == Some(&query.region))
        .map(|c| c.id)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Vocabulary;
    use crate::features::shared::test_helpers::TestContext;

    #[tokio::test]
    async fn test_regions() {
        let ctx = TestContext::new().await;
        let repo = ctx.state.repos.vocabularies();
        repo.add(&Vocabulary::new("country-gr", "Greece", "Country").with_extra("region", "EU"))
            .await
            .unwrap();
        repo.add(&Vocabulary::new("country-jp", "Japan", "Country").with_extra("region", "AS"))
            .await
            .unwrap();
        repo.add(&Vocabulary::new("country-aq", "Antarctica", "Country")).await.unwrap();

        let eu = handle(&ctx.state, CountriesByRegionQuery { region: "EU".into() }).await.unwrap();
        assert_eq!(eu, vec!["country-gr"]);
        let world = handle(&ctx.state, CountriesByRegionQuery { region: WORLDWIDE.into() })
            .await
            .unwrap();
        assert_eq!(world, vec!["country-aq", "country-gr", "country-jp"]);
    }
}
