//! Terms of use acceptance by provider administrators

use mediator::Request;
use serde::{Deserialize, Serialize};

use crate::api::AppState;
use crate::domain::Metadata;
use crate::error::{CatalogueError, CatalogueResult};
use crate::features::shared::refresh_public_copy;
use crate::security::Authentication;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AcceptTermsCommand {
    pub id: String,
}

impl Request<CatalogueResult<bool>> for AcceptTermsCommand {}

/// Record the caller's acceptance. Returns false when it was already recorded.
///
/// No history entry is written: accepting the terms does not change the
/// provider.
#[tracing::instrument(skip(state, auth), fields(caller = auth.email()))]
pub async fn handle(
    state: &AppState,
    auth: &Authentication,
    command: AcceptTermsCommand,
) -> CatalogueResult<bool> {
    let email = auth
        .email()
        .ok_or_else(|| CatalogueError::unauthenticated("Only users can accept the terms of use"))?
        .to_string();
    let repo = state.repos.providers();
    let mut bundle = repo.get_required(&command.id).await?;
    state.security.require_provider_admin(auth, &bundle.id).await?;

    let metadata = bundle.metadata.get_or_insert_with(Metadata::default);
    if !metadata.accept_terms(&email) {
        return Ok(false);
    }
    repo.update(&bundle).await?;
    refresh_public_copy(state, &bundle).await?;
    tracing::info!(id = %bundle.id, "Terms of use accepted");
    Ok(true)
}
