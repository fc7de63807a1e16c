use mediator::Request;
use serde::{Deserialize, Serialize};

use crate::api::AppState;
use crate::domain::{
    ActionType, Datasource, DatasourceBundle, LoggingType, Metadata, ProviderResource, ResourcePayload,
};
use crate::error::{CatalogueError, CatalogueResult};
use crate::features::shared::{
    actor, check_vocabularies, ensure_not_published, entry, refresh_public_copy,
};
use crate::security::Authentication;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateDatasourceCommand {
    pub datasource: Datasource,
    #[serde(default)]
    pub comment: Option<String>,
}

impl Request<CatalogueResult<DatasourceBundle>> for UpdateDatasourceCommand {}

/// Replace the payload, keeping status, activation and suspension
#[tracing::instrument(skip(state, auth, command), fields(id = %command.datasource.id, caller = auth.email()))]
pub async fn handle(
    state: &AppState,
    auth: &Authentication,
    command: UpdateDatasourceCommand,
) -> CatalogueResult<DatasourceBundle> {
    let mut datasource = command.datasource;
    let repo = state.repos.datasources();
    let existing = repo.get_required(&datasource.id).await?;
    state.security.require_resource_admin(auth, &existing.id).await?;
    ensure_not_published(&existing, "update")?;

    if datasource.service_id != existing.payload.service_id {
        return Err(CatalogueError::conflict(
            "You cannot move a Datasource to another Service",
        ));
    }
    if datasource.catalogue_id.is_none() {
        datasource.catalogue_id = existing.payload.catalogue_id.clone();
    }
    if datasource == existing.payload {
        return Ok(existing);
    }
    datasource.check()?;
    check_vocabularies(state, &datasource).await?;

    let mut bundle = existing.clone();
    bundle.set_payload(datasource);
    bundle.metadata = Some(Metadata::update(existing.metadata.as_ref(), &actor(auth), None));
    bundle.log(entry(auth, LoggingType::Update, ActionType::Updated, command.comment));
    repo.update(&bundle).await?;
    tracing::info!("Datasource updated");

    if let Some(service) = state.repos.services().get(&bundle.payload.service_id).await? {
        if let Some(provider_id) = service.payload.provider_id() {
            if let Some(provider) = state.repos.providers().get(provider_id).await? {
                state.mailer.datasource_updated(&bundle, &provider).await;
            }
        }
    }
    refresh_public_copy(state, &bundle).await?;
    Ok(bundle)
}
