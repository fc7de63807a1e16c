use std::marker::PhantomData;

use mediator::Request;

use super::reveal::reveal_public;
use crate::api::AppState;
use crate::domain::{Bundle, ResourcePayload};
use crate::error::CatalogueResult;
use crate::features::shared::label_facets;
use crate::search::{FacetFilter, Paging};
use crate::security::Authentication;

#[derive(Debug, Clone)]
pub struct ListPublicQuery<T> {
    pub filter: FacetFilter,
    _kind: PhantomData<fn() -> T>,
}

impl<T> ListPublicQuery<T> {
    pub fn new(filter: FacetFilter) -> Self {
        Self {
            filter,
            _kind: PhantomData,
        }
    }
}

impl<T: ResourcePayload> Request<CatalogueResult<Paging<Bundle<T>>>> for ListPublicQuery<T> {}

/// Browse published copies
///
/// Outsiders only see active, approved copies whatever they filter on.
#[tracing::instrument(skip(state, auth, query), fields(kind = T::DISPLAY_NAME, caller = auth.email()))]
pub async fn handle<T: ResourcePayload>(
    state: &AppState,
    auth: &Authentication,
    query: ListPublicQuery<T>,
) -> CatalogueResult<Paging<Bundle<T>>> {
    let mut filter = query.filter;
    filter.set_filter("published", "true");
    if !auth.is_admin_or_epot() {
        filter
            .set_filter("active", "true")
            .set_filter("status", T::STATES.approved);
    }
    tracing::debug!(query = %filter.to_query(), "Listing public copies");

    let page = state.repos.of::<Bundle<T>>().search(&filter).await?;
    let mut results = Vec::with_capacity(page.results.len());
    for bundle in page.results {
        results.push(reveal_public(state, auth, bundle).await?);
    }
    label_facets(state, Paging { results, ..page }).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Provider, Service};
    use crate::features::resources::commands::activate::{self, ActivateResourceCommand};
    use crate::features::shared::test_helpers::TestContext;

    #[tokio::test]
    async fn test_only_active_approved_copies() {
        let ctx = TestContext::new().await;
        let provider = ctx.approved_provider("ATHENA").await;
        let service = ctx.approved_service(&provider.id, "TEXTMINER").await;
        ctx.approved_service(&provider.id, "GRAPH").await;
        ctx.pending_provider("HERMES").await;

        let page = handle(&ctx.state, &Authentication::Anonymous, ListPublicQuery::<Service>::new(FacetFilter::default()))
            .await
            .unwrap();
        assert_eq!(page.total, 2);
        assert!(page.results.iter().all(|s| s.id.starts_with("eosc.")));
        assert!(page.results.iter().all(|s| s.payload.main_contact.is_none()));

        activate::handle(&ctx.state, &TestContext::owner(), ActivateResourceCommand::<Service>::new(&service.id, false))
            .await
            .unwrap();
        let page = handle(&ctx.state, &Authentication::Anonymous, ListPublicQuery::<Service>::new(FacetFilter::default()))
            .await
            .unwrap();
        assert_eq!(page.total, 1);
        let page = handle(&ctx.state, &TestContext::admin(), ListPublicQuery::<Service>::new(FacetFilter::default()))
            .await
            .unwrap();
        assert_eq!(page.total, 2);

        let providers = handle(&ctx.state, &Authentication::Anonymous, ListPublicQuery::<Provider>::new(FacetFilter::default()))
            .await
            .unwrap();
        assert_eq!(providers.total, 1);
        assert_eq!(providers.results[0].id, "eosc.athena");
    }

    #[tokio::test]
    async fn test_owner_keeps_contacts() {
        let ctx = TestContext::new().await;
        let provider = ctx.approved_provider("ATHENA").await;
        ctx.approved_service(&provider.id, "TEXTMINER").await;

        let page = handle(&ctx.state, &TestContext::owner(), ListPublicQuery::<Provider>::new(FacetFilter::default()))
            .await
            .unwrap();
        assert!(!page.results[0].payload.users.is_empty());

        let page = handle(&ctx.state, &TestContext::owner(), ListPublicQuery::<Service>::new(FacetFilter::default()))
            .await
            .unwrap();
        assert!(page.results[0].payload.main_contact.is_some());
    }
}
