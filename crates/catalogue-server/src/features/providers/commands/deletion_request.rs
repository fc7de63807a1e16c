//! Ask the onboarding team to delete a provider

use mediator::Request;
use serde::{Deserialize, Serialize};

use crate::api::AppState;
use crate::error::CatalogueResult;
use crate::features::shared::actor;
use crate::security::Authentication;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestDeletionCommand {
    pub id: String,
}

impl Request<CatalogueResult<()>> for RequestDeletionCommand {}

#[tracing::instrument(skip(state, auth), fields(caller = auth.email()))]
pub async fn handle(
    state: &AppState,
    auth: &Authentication,
    command: RequestDeletionCommand,
) -> CatalogueResult<()> {
    let bundle = state.repos.providers().get_required(&command.id).await?;
    state.security.require_provider_admin(auth, &bundle.id).await?;

    let requested_by = match auth.email() {
        Some(email) => format!("{} <{}>", actor(auth), email),
        None => actor(auth),
    };
    state.mailer.deletion_request(&bundle, &requested_by).await;
    tracing::info!(id = %bundle.id, "Provider deletion requested");
    Ok(())
}
