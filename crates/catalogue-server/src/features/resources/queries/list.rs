use std::marker::PhantomData;

use mediator::Request;

use crate::api::AppState;
use crate::domain::{Bundle, ProviderResource};
use crate::error::CatalogueResult;
use crate::features::shared::{label_facets, restrict_list, reveal_all};
use crate::search::{FacetFilter, Paging};
use crate::security::Authentication;

#[derive(Debug, Clone)]
pub struct ListResourcesQuery<T> {
    pub filter: FacetFilter,
    _kind: PhantomData<fn() -> T>,
}

impl<T> ListResourcesQuery<T> {
    pub fn new(filter: FacetFilter) -> Self {
        Self {
            filter,
            _kind: PhantomData,
        }
    }
}

impl<T: ProviderResource> Request<CatalogueResult<Paging<Bundle<T>>>> for ListResourcesQuery<T> {}

#[tracing::instrument(skip(state, auth, query), fields(kind = T::DISPLAY_NAME, caller = auth.email()))]
pub async fn handle<T: ProviderResource>(
    state: &AppState,
    auth: &Authentication,
    query: ListResourcesQuery<T>,
) -> CatalogueResult<Paging<Bundle<T>>> {
    let mut filter = query.filter;
    restrict_list::<T>(auth, &mut filter);
    tracing::debug!(query = %filter.to_query(), "Listing resources");
    let page = state.repos.of::<Bundle<T>>().search(&filter).await?;
    let page = reveal_all(state, auth, page, |b| b.payload.provider_id().map(str::to_string)).await?;
    label_facets(state, page).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::interoperability_record::fixtures::record;
    use crate::domain::{InteroperabilityRecord, Service};
    use crate::features::resources::commands::add::{self, AddResourceCommand};
    use crate::features::shared::test_helpers::TestContext;

    #[tokio::test]
    async fn test_outsiders_see_approved_only() {
        let ctx = TestContext::new().await;
        let provider = ctx.approved_provider("ATHENA").await;
        ctx.approved_service(&provider.id, "TEXTMINER").await;
        add::handle(&ctx.state, &TestContext::owner(), AddResourceCommand::new(record("athena", "10.1234/abc")))
            .await
            .unwrap();

        let services = handle(&ctx.state, &Authentication::Anonymous, ListResourcesQuery::<Service>::new(FacetFilter::default()))
            .await
            .unwrap();
        assert_eq!(services.total, 1);
        assert_eq!(services.results[0].id, "athena.textminer");

        let records = handle(
            &ctx.state,
            &Authentication::Anonymous,
            ListResourcesQuery::<InteroperabilityRecord>::new(FacetFilter::default()),
        )
        .await
        .unwrap();
        assert_eq!(records.total, 0);

        let records = handle(
            &ctx.state,
            &TestContext::epot(),
            ListResourcesQuery::<InteroperabilityRecord>::new(FacetFilter::default()),
        )
        .await
        .unwrap();
        assert_eq!(records.total, 1);
    }
}
