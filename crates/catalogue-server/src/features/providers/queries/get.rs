use mediator::Request;
use serde::{Deserialize, Serialize};

use crate::api::AppState;
use crate::domain::ProviderBundle;
use crate::error::{CatalogueError, CatalogueResult};
use crate::features::shared::reveal;
use crate::security::Authentication;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetProviderQuery {
    pub id: String,
}

impl Request<CatalogueResult<ProviderBundle>> for GetProviderQuery {}

/// Approved providers are visible to everyone, the rest only to the portal
/// staff and the provider's own administrators
#[tracing::instrument(skip(state, auth), fields(caller = auth.email()))]
pub async fn handle(
    state: &AppState,
    auth: &Authentication,
    query: GetProviderQuery,
) -> CatalogueResult<ProviderBundle> {
    let bundle = state.repos.providers().get_required(&query.id).await?;
    if !bundle.is_approved() && !state.security.can_manage_provider(auth, &bundle.id).await? {
        return Err(CatalogueError::unauthenticated(format!(
            "You cannot view the specific Provider '{}'",
            bundle.id
        )));
    }
    let owner = bundle.identifiers.original_id.clone().unwrap_or_else(|| bundle.id.clone());
    reveal(state, auth, bundle, Some(&owner)).await
}
