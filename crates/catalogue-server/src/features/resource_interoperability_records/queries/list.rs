use mediator::Request;

use crate::api::AppState;
use crate::domain::ResourceInteroperabilityRecordBundle;
use crate::error::CatalogueResult;
use crate::features::shared::reveal_all;
use crate::search::{FacetFilter, Paging};
use crate::security::Authentication;

#[derive(Debug, Clone, Default)]
pub struct ListResourceInteroperabilityRecordsQuery {
    pub filter: FacetFilter,
}

impl Request<CatalogueResult<Paging<ResourceInteroperabilityRecordBundle>>>
    for ListResourceInteroperabilityRecordsQuery
{
}

#[tracing::instrument(skip(state, auth, query), fields(caller = auth.email()))]
pub async fn handle(
    state: &AppState,
    auth: &Authentication,
    query: ListResourceInteroperabilityRecordsQuery,
) -> CatalogueResult<Paging<ResourceInteroperabilityRecordBundle>> {
    let mut filter = query.filter;
    filter.set_filter("published", "false");
    let page = state.repos.resource_interoperability_records().search(&filter).await?;
    reveal_all(state, auth, page, |_| None).await
}
