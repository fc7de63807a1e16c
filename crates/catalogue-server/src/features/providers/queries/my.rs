use mediator::Request;

use crate::api::AppState;
use crate::domain::ProviderBundle;
use crate::error::{CatalogueError, CatalogueResult};
use crate::search::{FacetFilter, SortOrder};
use crate::security::Authentication;

/// Providers the caller administers, whatever their status
#[derive(Debug, Clone, Default)]
pub struct MyProvidersQuery;

impl Request<CatalogueResult<Vec<ProviderBundle>>> for MyProvidersQuery {}

#[tracing::instrument(skip(state, auth, _query), fields(caller = auth.email()))]
pub async fn handle(
    state: &AppState,
    auth: &Authentication,
    _query: MyProvidersQuery,
) -> CatalogueResult<Vec<ProviderBundle>> {
    let email = auth
        .email()
        .ok_or_else(|| CatalogueError::unauthenticated("You must be logged in"))?;
    let filter = FacetFilter::all()
        .with_filter("users", email)
        .with_filter("published", "false")
        .order_by("name", SortOrder::Asc);
    Ok(state.repos.providers().all(&filter).await?)
}
