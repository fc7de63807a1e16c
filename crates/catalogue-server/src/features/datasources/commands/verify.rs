use mediator::Request;
use serde::{Deserialize, Serialize};

use crate::api::AppState;
use crate::domain::states::DATASOURCE_STATES;
use crate::domain::{ActionType, Datasource, DatasourceBundle, LoggingType, Metadata};
use crate::error::CatalogueResult;
use crate::features::shared::{actor, check_status, ensure_not_published, entry, refresh_public_copy};
use crate::security::Authentication;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyDatasourceCommand {
    pub id: String,
    pub status: String,
    #[serde(default)]
    pub active: Option<bool>,
}

impl Request<CatalogueResult<DatasourceBundle>> for VerifyDatasourceCommand {}

#[tracing::instrument(skip(state, auth), fields(caller = auth.email()))]
pub async fn handle(
    state: &AppState,
    auth: &Authentication,
    command: VerifyDatasourceCommand,
) -> CatalogueResult<DatasourceBundle> {
    auth.require_admin_or_epot()?;
    check_status::<Datasource>(state, &command.status).await?;

    let repo = state.repos.datasources();
    let mut bundle = repo.get_required(&command.id).await?;
    ensure_not_published(&bundle, "verify")?;

    let status = command.status.as_str();
    bundle.status = Some(status.to_string());
    if DATASOURCE_STATES.is_approved(Some(status)) {
        bundle.active = command.active.unwrap_or(true);
        bundle.log(entry(auth, LoggingType::Onboard, ActionType::Approved, None));
    } else if DATASOURCE_STATES.is_rejected(Some(status)) {
        bundle.active = false;
        bundle.log(entry(auth, LoggingType::Onboard, ActionType::Rejected, None));
    } else {
        bundle.refresh_history();
    }
    bundle.metadata = Some(Metadata::update(bundle.metadata.as_ref(), &actor(auth), None));

    repo.update(&bundle).await?;
    tracing::info!(id = %bundle.id, status, active = bundle.active, "Datasource verified");
    refresh_public_copy(state, &bundle).await?;
    Ok(bundle)
}
