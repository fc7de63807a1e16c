use mediator::Request;

use crate::api::AppState;
use crate::domain::{Datasource, DatasourceBundle};
use crate::error::CatalogueResult;
use crate::features::shared::{label_facets, restrict_list, reveal_all};
use crate::search::{FacetFilter, Paging};
use crate::security::Authentication;

#[derive(Debug, Clone, Default)]
pub struct ListDatasourcesQuery {
    pub filter: FacetFilter,
}

impl Request<CatalogueResult<Paging<DatasourceBundle>>> for ListDatasourcesQuery {}

#[tracing::instrument(skip(state, auth, query), fields(caller = auth.email()))]
pub async fn handle(
    state: &AppState,
    auth: &Authentication,
    query: ListDatasourcesQuery,
) -> CatalogueResult<Paging<DatasourceBundle>> {
    let mut filter = query.filter;
    restrict_list::<Datasource>(auth, &mut filter);
    let page = state.repos.datasources().search(&filter).await?;
    // Datasources carry no contact details, only their history is hidden.
    let page = reveal_all(state, auth, page, |_| None).await?;
    label_facets(state, page).await
}
