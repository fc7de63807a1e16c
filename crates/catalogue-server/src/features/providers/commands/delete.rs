//! Delete a provider together with everything it registered

use mediator::Request;
use serde::{Deserialize, Serialize};

use crate::api::AppState;
use crate::domain::{InteroperabilityRecord, ProviderBundle, Service, TrainingResource};
use crate::error::CatalogueResult;
use crate::features::resources::commands::delete::delete_all_of;
use crate::features::shared::{delete_public_copy, ensure_not_published};
use crate::security::Authentication;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteProviderCommand {
    pub id: String,
}

impl Request<CatalogueResult<ProviderBundle>> for DeleteProviderCommand {}

#[tracing::instrument(skip(state, auth), fields(caller = auth.email()))]
pub async fn handle(
    state: &AppState,
    auth: &Authentication,
    command: DeleteProviderCommand,
) -> CatalogueResult<ProviderBundle> {
    let repo = state.repos.providers();
    let bundle = repo.get_required(&command.id).await?;
    state.security.require_provider_admin(auth, &bundle.id).await?;
    ensure_not_published(&bundle, "delete")?;

    let services = delete_all_of::<Service>(state, &bundle.id).await?;
    let trainings = delete_all_of::<TrainingResource>(state, &bundle.id).await?;
    let records = delete_all_of::<InteroperabilityRecord>(state, &bundle.id).await?;

    delete_public_copy(state, &bundle).await?;
    repo.delete(&bundle.id).await?;
    tracing::info!(
        id = %bundle.id,
        services,
        trainings,
        records,
        "Provider deleted"
    );

    state.mailer.provider_deleted(&bundle).await;
    Ok(bundle)
}
