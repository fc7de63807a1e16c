use mediator::Request;
use serde::{Deserialize, Serialize};

use crate::api::AppState;
use crate::domain::DatasourceBundle;
use crate::error::{CatalogueError, CatalogueResult};
use crate::security::Authentication;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetDatasourceQuery {
    pub id: String,
}

impl Request<CatalogueResult<DatasourceBundle>> for GetDatasourceQuery {}

/// Approved datasources for everyone, the rest for the portal staff and the
/// administrators of the service's provider
pub(crate) async fn visible_to(
    state: &AppState,
    auth: &Authentication,
    mut bundle: DatasourceBundle,
) -> CatalogueResult<DatasourceBundle> {
    let manages = state.security.can_manage_resource(auth, &bundle.id).await?;
    if !bundle.is_approved() && !manages {
        return Err(CatalogueError::unauthenticated(format!(
            "You cannot view the specific Datasource '{}'",
            bundle.id
        )));
    }
    if !manages {
        bundle.strip_sensitive();
    }
    Ok(bundle)
}

#[tracing::instrument(skip(state, auth), fields(caller = auth.email()))]
pub async fn handle(
    state: &AppState,
    auth: &Authentication,
    query: GetDatasourceQuery,
) -> CatalogueResult<DatasourceBundle> {
    let bundle = state.repos.datasources().get_required(&query.id).await?;
    visible_to(state, auth, bundle).await
}
