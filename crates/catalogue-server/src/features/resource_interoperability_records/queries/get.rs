use mediator::Request;
use serde::{Deserialize, Serialize};

use crate::api::AppState;
use crate::domain::ResourceInteroperabilityRecordBundle;
use crate::error::CatalogueResult;
use crate::security::Authentication;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetResourceInteroperabilityRecordQuery {
    pub id: String,
}

impl Request<CatalogueResult<ResourceInteroperabilityRecordBundle>> for GetResourceInteroperabilityRecordQuery {}

/// Links are public, their history only for those managing the resource
pub(crate) async fn visible_to(
    state: &AppState,
    auth: &Authentication,
    mut bundle: ResourceInteroperabilityRecordBundle,
) -> CatalogueResult<ResourceInteroperabilityRecordBundle> {
    if !state.security.can_manage_resource(auth, &bundle.payload.resource_id).await? {
        bundle.strip_sensitive();
    }
    Ok(bundle)
}

#[tracing::instrument(skip(state, auth), fields(caller = auth.email()))]
pub async fn handle(
    state: &AppState,
    auth: &Authentication,
    query: GetResourceInteroperabilityRecordQuery,
) -> CatalogueResult<ResourceInteroperabilityRecordBundle> {
    let bundle = state.repos.resource_interoperability_records().get_required(&query.id).await?;
    visible_to(state, auth, bundle).await
}
