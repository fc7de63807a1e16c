//! Register the datasource extension of a service

use mediator::Request;
use serde::{Deserialize, Serialize};

use crate::api::AppState;
use crate::domain::states::DATASOURCE_STATES;
use crate::domain::{
    ActionType, Datasource, DatasourceBundle, LoggingType, Metadata, ProviderResource, ResourcePayload,
    Service,
};
use crate::error::{CatalogueError, CatalogueResult};
use crate::features::shared::{actor, check_vocabularies, entry, get_source};
use crate::ids;
use crate::search::FacetFilter;
use crate::security::Authentication;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddDatasourceCommand {
    pub datasource: Datasource,
}

impl Request<CatalogueResult<DatasourceBundle>> for AddDatasourceCommand {}

#[tracing::instrument(skip(state, auth, command), fields(service_id = %command.datasource.service_id, caller = auth.email()))]
pub async fn handle(
    state: &AppState,
    auth: &Authentication,
    command: AddDatasourceCommand,
) -> CatalogueResult<DatasourceBundle> {
    auth.require_authenticated()?;
    let mut datasource = command.datasource;
    let service_id = datasource.service_id.trim().to_string();
    let id = ids::datasource_id(Some(service_id.as_str()).filter(|s| !s.is_empty()))?;

    let service = get_source::<Service>(state, &service_id).await?;
    state.security.require_resource_admin(auth, &service.id).await?;

    let existing = FacetFilter {
        quantity: 1,
        ..FacetFilter::default()
    }
    .with_filter("service_id", service_id.as_str())
    .with_filter("published", "false");
    let repo = state.repos.datasources();
    if repo.search(&existing).await?.total > 0 {
        return Err(CatalogueError::conflict(format!(
            "Service '{}' already has a Datasource",
            service_id
        )));
    }

    datasource.id = id;
    datasource.service_id = service_id;
    if datasource.catalogue_id.as_deref().map_or(true, |c| c.trim().is_empty()) {
        let catalogue_id = service
            .payload
            .catalogue_id()
            .unwrap_or(state.catalogue_id())
            .to_string();
        datasource.set_catalogue_id(catalogue_id);
    }
    datasource.check()?;
    check_vocabularies(state, &datasource).await?;

    let mut bundle = DatasourceBundle::new(datasource);
    bundle.metadata = Some(Metadata::create(&actor(auth), auth.email()));
    bundle.status = Some(DATASOURCE_STATES.pending.to_string());
    bundle.active = false;
    bundle.log(entry(auth, LoggingType::Onboard, ActionType::Registered, None));
    repo.add(&bundle).await?;
    tracing::info!(id = %bundle.id, "Datasource registered");

    if let Some(provider_id) = service.payload.provider_id() {
        if let Some(provider) = state.repos.providers().get(provider_id).await? {
            state.mailer.datasource_created(&bundle, &provider).await;
        }
    }
    Ok(bundle)
}
