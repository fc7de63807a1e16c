use std::marker::PhantomData;

use mediator::Request;

use crate::api::AppState;
use crate::domain::{Bundle, ProviderResource};
use crate::error::CatalogueResult;
use crate::search::{FacetFilter, Paging};
use crate::security::Authentication;

#[derive(Debug, Clone)]
pub struct InactiveResourcesQuery<T> {
    pub filter: FacetFilter,
    _kind: PhantomData<fn() -> T>,
}

impl<T> InactiveResourcesQuery<T> {
    pub fn new(filter: FacetFilter) -> Self {
        Self {
            filter,
            _kind: PhantomData,
        }
    }
}

impl<T: ProviderResource> Request<CatalogueResult<Paging<Bundle<T>>>> for InactiveResourcesQuery<T> {}

#[tracing::instrument(skip(state, auth, query), fields(kind = T::DISPLAY_NAME, caller = auth.email()))]
pub async fn handle<T: ProviderResource>(
    state: &AppState,
    auth: &Authentication,
    query: InactiveResourcesQuery<T>,
) -> CatalogueResult<Paging<Bundle<T>>> {
    auth.require_admin_or_epot()?;
    let mut filter = query.filter;
    filter.set_filter("active", "false").set_filter("published", "false");
    Ok(state.repos.of::<Bundle<T>>().search(&filter).await?)
}
