use std::marker::PhantomData;

use mediator::Request;

use crate::api::AppState;
use crate::domain::{Bundle, ProviderResource};
use crate::error::CatalogueResult;
use crate::search::{FacetFilter, Paging};
use crate::security::Authentication;

/// Every resource of one provider, whatever its status
#[derive(Debug, Clone)]
pub struct ResourcesByProviderQuery<T> {
    pub provider_id: String,
    pub filter: FacetFilter,
    _kind: PhantomData<fn() -> T>,
}

impl<T> ResourcesByProviderQuery<T> {
    pub fn new(provider_id: &str, filter: FacetFilter) -> Self {
        Self {
            provider_id: provider_id.to_string(),
            filter,
            _kind: PhantomData,
        }
    }
}

impl<T: ProviderResource> Request<CatalogueResult<Paging<Bundle<T>>>> for ResourcesByProviderQuery<T> {}

#[tracing::instrument(skip(state, auth, query), fields(kind = T::DISPLAY_NAME, provider_id = %query.provider_id))]
pub async fn handle<T: ProviderResource>(
    state: &AppState,
    auth: &Authentication,
    query: ResourcesByProviderQuery<T>,
) -> CatalogueResult<Paging<Bundle<T>>> {
    state.repos.providers().get_required(&query.provider_id).await?;
    state.security.require_provider_admin(auth, &query.provider_id).await?;
    let mut filter = query.filter;
    filter
        .set_filter(T::PROVIDER_FIELD, query.provider_id.as_str())
        .set_filter("published", "false");
    Ok(state.repos.of::<Bundle<T>>().search(&filter).await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TrainingResource;
    use crate::domain::training_resource::fixtures::training;
    use crate::error::CatalogueError;
    use crate::features::resources::commands::add::{self, AddResourceCommand};
    use crate::features::shared::test_helpers::TestContext;

    #[tokio::test]
    async fn test_pending_training_shows_for_owner() {
        let ctx = TestContext::new().await;
        ctx.approved_provider("ATHENA").await;
        add::handle(&ctx.state, &TestContext::owner(), AddResourceCommand::new(training("athena", "Intro")))
            .await
            .unwrap();

        let query = ResourcesByProviderQuery::<TrainingResource>::new("athena", FacetFilter::default());
        let page = handle(&ctx.state, &TestContext::owner(), query.clone()).await.unwrap();
        assert_eq!(page.total, 1);

        let err = handle(&ctx.state, &TestContext::stranger(), query).await.unwrap_err();
        assert!(matches!(err, CatalogueError::Forbidden(_)));
    }
}
