use std::marker::PhantomData;

use mediator::Request;

use super::reveal::reveal_public;
use crate::api::AppState;
use crate::domain::{Bundle, ResourcePayload};
use crate::error::{CatalogueError, CatalogueResult};
use crate::security::Authentication;

#[derive(Debug, Clone)]
pub struct GetPublicQuery<T> {
    pub id: String,
    _kind: PhantomData<fn() -> T>,
}

impl<T> GetPublicQuery<T> {
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            _kind: PhantomData,
        }
    }
}

impl<T: ResourcePayload> Request<CatalogueResult<Bundle<T>>> for GetPublicQuery<T> {}

#[tracing::instrument(skip(state, auth, query), fields(kind = T::DISPLAY_NAME, id = %query.id, caller = auth.email()))]
pub async fn handle<T: ResourcePayload>(
    state: &AppState,
    auth: &Authentication,
    query: GetPublicQuery<T>,
) -> CatalogueResult<Bundle<T>> {
    let bundle = state
        .repos
        .of::<Bundle<T>>()
        .get(&query.id)
        .await?
        .filter(|b| b.is_published())
        .ok_or_else(|| {
            CatalogueError::NotFound(format!("{} with id '{}' does not exist!", T::DISPLAY_NAME, query.id))
        })?;
    if !(bundle.active && bundle.is_approved()) && !auth.is_admin_or_epot() {
        return Err(CatalogueError::unauthenticated(format!(
            "You cannot view the specific {} '{}'",
            T::DISPLAY_NAME,
            bundle.id
        )));
    }
    reveal_public(state, auth, bundle).await
}
