use mediator::Request;
use serde::{Deserialize, Serialize};

use super::get::visible_to;
use crate::api::AppState;
use crate::domain::ResourceInteroperabilityRecordBundle;
use crate::error::CatalogueResult;
use crate::search::FacetFilter;
use crate::security::Authentication;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceInteroperabilityRecordByResourceQuery {
    pub resource_id: String,
}

impl Request<CatalogueResult<Option<ResourceInteroperabilityRecordBundle>>>
    for ResourceInteroperabilityRecordByResourceQuery
{
}

/// The link of a resource, if it has one
#[tracing::instrument(skip(state, auth), fields(caller = auth.email()))]
pub async fn handle(
    state: &AppState,
    auth: &Authentication,
    query: ResourceInteroperabilityRecordByResourceQuery,
) -> CatalogueResult<Option<ResourceInteroperabilityRecordBundle>> {
    let filter = FacetFilter {
        quantity: 1,
        ..FacetFilter::default()
    }
    .with_filter("resource_id", query.resource_id.as_str());
    let page = state.repos.resource_interoperability_records().search(&filter).await?;
    match page.results.into_iter().next() {
        Some(bundle) => Ok(Some(visible_to(state, auth, bundle).await?)),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::resource_interoperability_record::fixtures::link;
    use crate::features::resource_interoperability_records::commands::add::{
        self, AddResourceInteroperabilityRecordCommand, LinkedResourceType,
    };
    use crate::features::shared::test_helpers::TestContext;

    #[tokio::test]
    async fn test_lookup_by_resource() {
        let ctx = TestContext::new().await;
        let provider = ctx.approved_provider("ATHENA").await;
        let service = ctx.approved_service(&provider.id, "TEXTMINER").await;
        let guideline = ctx.approved_record(&provider.id, "10.1234/abc").await;
        add::handle(
            &ctx.state,
            &TestContext::owner(),
            AddResourceInteroperabilityRecordCommand {
                link: link(&service.id, &[&guideline.id]),
                resource_type: LinkedResourceType::Service,
            },
        )
        .await
        .unwrap();

        let query = ResourceInteroperabilityRecordByResourceQuery {
            resource_id: service.id.clone(),
        };
        let own = handle(&ctx.state, &TestContext::owner(), query.clone()).await.unwrap().unwrap();
        assert_eq!(own.id, "athena.textminer.interoperability");
        assert!(!own.logging_info.is_empty());

        let public = handle(&ctx.state, &Authentication::Anonymous, query).await.unwrap().unwrap();
        assert!(public.logging_info.is_empty());

        let published = handle(
            &ctx.state,
            &Authentication::Anonymous,
            ResourceInteroperabilityRecordByResourceQuery {
                resource_id: "eosc.athena.textminer".into(),
            },
        )
        .await
        .unwrap()
        .unwrap();
        assert!(published.is_published());

        let none = handle(
            &ctx.state,
            &TestContext::admin(),
            ResourceInteroperabilityRecordByResourceQuery {
                resource_id: "athena.nothing".into(),
            },
        )
        .await
        .unwrap();
        assert!(none.is_none());
    }
}
