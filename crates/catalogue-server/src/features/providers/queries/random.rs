use mediator::Request;

use crate::api::AppState;
use crate::domain::{Provider, ProviderBundle};
use crate::error::CatalogueResult;
use crate::features::shared::{random_for_auditing, RandomParams};
use crate::security::Authentication;

#[derive(Debug, Clone, Default)]
pub struct RandomProvidersQuery {
    pub params: RandomParams,
}

impl Request<CatalogueResult<Vec<ProviderBundle>>> for RandomProvidersQuery {}

#[tracing::instrument(skip(state, auth), fields(caller = auth.email()))]
pub async fn handle(
    state: &AppState,
    auth: &Authentication,
    query: RandomProvidersQuery,
) -> CatalogueResult<Vec<ProviderBundle>> {
    auth.require_admin_or_epot()?;
    random_for_auditing::<Provider>(state, query.params.quantity, query.params.interval).await
}
