use mediator::Request;

use crate::api::AppState;
use crate::domain::{ProviderResource, Service, ServiceBundle};
use crate::error::CatalogueResult;
use crate::search::FacetFilter;
use crate::security::Authentication;

/// Every service a provider registered, whatever its status
#[derive(Debug, Clone)]
pub struct ProviderServicesQuery {
    pub provider_id: String,
}

impl Request<CatalogueResult<Vec<ServiceBundle>>> for ProviderServicesQuery {}

#[tracing::instrument(skip(state, auth), fields(caller = auth.email()))]
pub async fn handle(
    state: &AppState,
    auth: &Authentication,
    query: ProviderServicesQuery,
) -> CatalogueResult<Vec<ServiceBundle>> {
    state.repos.providers().get_required(&query.provider_id).await?;
    state.security.require_provider_admin(auth, &query.provider_id).await?;
    let filter = FacetFilter::all()
        .with_filter(Service::PROVIDER_FIELD, query.provider_id.as_str())
        .with_filter("published", "false");
    Ok(state.repos.services().all(&filter).await?)
}
