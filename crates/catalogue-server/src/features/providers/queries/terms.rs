use mediator::Request;
use serde::{Deserialize, Serialize};

use crate::api::AppState;
use crate::error::CatalogueResult;
use crate::security::Authentication;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HasAcceptedTermsQuery {
    pub id: String,
}

impl Request<CatalogueResult<bool>> for HasAcceptedTermsQuery {}

#[tracing::instrument(skip(state, auth), fields(caller = auth.email()))]
pub async fn handle(
    state: &AppState,
    auth: &Authentication,
    query: HasAcceptedTermsQuery,
) -> CatalogueResult<bool> {
    let bundle = state.repos.providers().get_required(&query.id).await?;
    state.security.require_provider_admin(auth, &bundle.id).await?;
    let Some(email) = auth.email() else {
        return Ok(false);
    };
    Ok(bundle
        .metadata
        .as_ref()
        .is_some_and(|m| m.has_accepted_terms(email)))
}
