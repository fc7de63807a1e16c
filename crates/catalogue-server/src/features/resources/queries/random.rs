use std::marker::PhantomData;

use mediator::Request;

use crate::api::AppState;
use crate::domain::{Bundle, ProviderResource};
use crate::error::CatalogueResult;
use crate::features::shared::{random_for_auditing, RandomParams};
use crate::security::Authentication;

#[derive(Debug, Clone)]
pub struct RandomResourcesQuery<T> {
    pub params: RandomParams,
    _kind: PhantomData<fn() -> T>,
}

impl<T> RandomResourcesQuery<T> {
    pub fn new(params: RandomParams) -> Self {
        Self {
            params,
            _kind: PhantomData,
        }
    }
}

impl<T: ProviderResource> Request<CatalogueResult<Vec<Bundle<T>>>> for RandomResourcesQuery<T> {}

#[tracing::instrument(skip(state, auth, query), fields(kind = T::DISPLAY_NAME, caller = auth.email()))]
pub async fn handle<T: ProviderResource>(
    state: &AppState,
    auth: &Authentication,
    query: RandomResourcesQuery<T>,
) -> CatalogueResult<Vec<Bundle<T>>> {
    auth.require_admin_or_epot()?;
    random_for_auditing::<T>(state, query.params.quantity, query.params.interval).await
}
