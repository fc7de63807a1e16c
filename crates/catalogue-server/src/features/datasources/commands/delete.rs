use mediator::Request;
use serde::{Deserialize, Serialize};

use crate::api::AppState;
use crate::domain::DatasourceBundle;
use crate::error::CatalogueResult;
use crate::features::shared::{delete_public_copy, ensure_not_published};
use crate::security::Authentication;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteDatasourceCommand {
    pub id: String,
}

impl Request<CatalogueResult<DatasourceBundle>> for DeleteDatasourceCommand {}

#[tracing::instrument(skip(state, auth), fields(caller = auth.email()))]
pub async fn handle(
    state: &AppState,
    auth: &Authentication,
    command: DeleteDatasourceCommand,
) -> CatalogueResult<DatasourceBundle> {
    let repo = state.repos.datasources();
    let bundle = repo.get_required(&command.id).await?;
    state.security.require_resource_admin(auth, &bundle.id).await?;
    ensure_not_published(&bundle, "delete")?;

    delete_public_copy(state, &bundle).await?;
    repo.delete(&bundle.id).await?;
    tracing::info!(id = %bundle.id, "Datasource deleted");
    Ok(bundle)
}
