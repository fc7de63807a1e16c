use mediator::Request;

use crate::api::AppState;
use crate::domain::ProviderBundle;
use crate::error::CatalogueResult;
use crate::search::{FacetFilter, Paging};
use crate::security::Authentication;

#[derive(Debug, Clone, Default)]
pub struct InactiveProvidersQuery {
    pub filter: FacetFilter,
}

impl Request<CatalogueResult<Paging<ProviderBundle>>> for InactiveProvidersQuery {}

#[tracing::instrument(skip(state, auth, query), fields(caller = auth.email()))]
pub async fn handle(
    state: &AppState,
    auth: &Authentication,
    query: InactiveProvidersQuery,
) -> CatalogueResult<Paging<ProviderBundle>> {
    auth.require_admin_or_epot()?;
    let mut filter = query.filter;
    filter.set_filter("active", "false").set_filter("published", "false");
    Ok(state.repos.providers().search(&filter).await?)
}
