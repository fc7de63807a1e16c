use std::marker::PhantomData;

use mediator::Request;

use crate::api::AppState;
use crate::domain::{Bundle, ProviderResource};
use crate::error::{CatalogueError, CatalogueResult};
use crate::features::shared::reveal;
use crate::security::Authentication;

#[derive(Debug, Clone)]
pub struct GetResourceQuery<T> {
    pub id: String,
    _kind: PhantomData<fn() -> T>,
}

impl<T> GetResourceQuery<T> {
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            _kind: PhantomData,
        }
    }
}

impl<T: ProviderResource> Request<CatalogueResult<Bundle<T>>> for GetResourceQuery<T> {}

/// Active, approved resources are visible to everyone, the rest only to the
/// portal staff and the administrators of the owning provider
#[tracing::instrument(skip(state, auth, query), fields(kind = T::DISPLAY_NAME, id = %query.id, caller = auth.email()))]
pub async fn handle<T: ProviderResource>(
    state: &AppState,
    auth: &Authentication,
    query: GetResourceQuery<T>,
) -> CatalogueResult<Bundle<T>> {
    let bundle = state.repos.of::<Bundle<T>>().get_required(&query.id).await?;
    let visible = bundle.is_approved() && bundle.active;
    if !visible && !state.security.can_manage_resource(auth, &bundle.id).await? {
        return Err(CatalogueError::unauthenticated(format!(
            "You cannot view the specific {} '{}'",
            T::DISPLAY_NAME,
            bundle.id
        )));
    }
    let provider_id = bundle.payload.provider_id().map(str::to_string);
    reveal(state, auth, bundle, provider_id.as_deref()).await
}
