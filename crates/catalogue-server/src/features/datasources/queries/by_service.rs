use mediator::Request;
use serde::{Deserialize, Serialize};

use super::get::visible_to;
use crate::api::AppState;
use crate::domain::DatasourceBundle;
use crate::error::CatalogueResult;
use crate::search::FacetFilter;
use crate::security::Authentication;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasourceByServiceQuery {
    pub service_id: String,
}

impl Request<CatalogueResult<Option<DatasourceBundle>>> for DatasourceByServiceQuery {}

/// The datasource extending a service, if it has one
#[tracing::instrument(skip(state, auth), fields(caller = auth.email()))]
pub async fn handle(
    state: &AppState,
    auth: &Authentication,
    query: DatasourceByServiceQuery,
) -> CatalogueResult<Option<DatasourceBundle>> {
    let filter = FacetFilter {
        quantity: 1,
        ..FacetFilter::default()
    }
    .with_filter("service_id", query.service_id.as_str());
    let found = state.repos.datasources().search(&filter).await?.results.into_iter().next();
    match found {
        Some(bundle) => Ok(Some(visible_to(state, auth, bundle).await?)),
        None => Ok(None),
    }
}
