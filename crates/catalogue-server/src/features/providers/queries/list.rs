use mediator::Request;

use crate::api::AppState;
use crate::domain::{Provider, ProviderBundle};
use crate::error::CatalogueResult;
use crate::features::shared::{label_facets, restrict_list, reveal_all};
use crate::search::{FacetFilter, Paging};
use crate::security::Authentication;

#[derive(Debug, Clone, Default)]
pub struct ListProvidersQuery {
    pub filter: FacetFilter,
}

impl Request<CatalogueResult<Paging<ProviderBundle>>> for ListProvidersQuery {}

#[tracing::instrument(skip(state, auth, query), fields(caller = auth.email()))]
pub async fn handle(
    state: &AppState,
    auth: &Authentication,
    query: ListProvidersQuery,
) -> CatalogueResult<Paging<ProviderBundle>> {
    let mut filter = query.filter;
    restrict_list::<Provider>(auth, &mut filter);
    tracing::debug!(query = %filter.to_query(), "Listing providers");
    let page = state.repos.providers().search(&filter).await?;
    let page = reveal_all(state, auth, page, |b| Some(b.id.clone())).await?;
    label_facets(state, page).await
}
