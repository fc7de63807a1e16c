//! Delete a resource together with its public copy, datasource and
//! interoperability record link

use std::marker::PhantomData;

use mediator::Request;

use crate::api::AppState;
use crate::domain::{Bundle, ProviderResource};
use crate::error::{CatalogueError, CatalogueResult};
use crate::features::datasources::commands::cascade as datasources;
use crate::features::resource_interoperability_records::commands::cascade as links;
use crate::features::shared::{delete_public_copy, ensure_not_published};
use crate::search::FacetFilter;
use crate::security::Authentication;

#[derive(Debug, Clone)]
pub struct DeleteResourceCommand<T> {
    pub id: String,
    _kind: PhantomData<fn() -> T>,
}

impl<T> DeleteResourceCommand<T> {
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            _kind: PhantomData,
        }
    }
}

impl<T: ProviderResource> Request<CatalogueResult<Bundle<T>>> for DeleteResourceCommand<T> {}

#[tracing::instrument(skip(state, auth, command), fields(kind = T::DISPLAY_NAME, id = %command.id, caller = auth.email()))]
pub async fn handle<T: ProviderResource>(
    state: &AppState,
    auth: &Authentication,
    command: DeleteResourceCommand<T>,
) -> CatalogueResult<Bundle<T>> {
    let bundle = state.repos.of::<Bundle<T>>().get_required(&command.id).await?;
    state.security.require_resource_admin(auth, &bundle.id).await?;
    ensure_not_published(&bundle, "delete")?;

    if T::USES_TEMPLATE && T::STATES.is_pending(bundle.status()) {
        return Err(CatalogueError::forbidden(
            "You cannot delete a Template that is under review",
        ));
    }

    remove(state, &bundle).await?;
    tracing::info!("Resource deleted");
    Ok(bundle)
}

async fn remove<T: ProviderResource>(state: &AppState, bundle: &Bundle<T>) -> CatalogueResult<()> {
    if T::HAS_DATASOURCE {
        datasources::delete_for_service(state, &bundle.id).await?;
    }
    if T::LINKS_RECORDS {
        links::delete_for_resource(state, &bundle.id).await?;
    }
    delete_public_copy(state, bundle).await?;
    state.repos.of::<Bundle<T>>().delete(&bundle.id).await?;
    Ok(())
}

/// Remove every resource a provider registered, returning how many went
pub async fn delete_all_of<T: ProviderResource>(state: &AppState, provider_id: &str) -> CatalogueResult<usize> {
    let filter = FacetFilter::all()
        .with_filter(T::PROVIDER_FIELD, provider_id)
        .with_filter("published", "false");
    let bundles = state.repos.of::<Bundle<T>>().all(&filter).await?;
    for bundle in &bundles {
        remove(state, bundle).await?;
    }
    Ok(bundles.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::service::fixtures::service;
    use crate::domain::Service;
    use crate::features::resources::commands::add::{self, AddResourceCommand};
    use crate::features::shared::test_helpers::TestContext;

    #[tokio::test]
    async fn test_delete_removes_public_copy() {
        let ctx = TestContext::new().await;
        let provider = ctx.approved_provider("ATHENA").await;
        let service = ctx.approved_service(&provider.id, "TEXTMINER").await;

        handle(&ctx.state, &TestContext::owner(), DeleteResourceCommand::<Service>::new(&service.id))
            .await
            .unwrap();
        assert!(!ctx.state.repos.services().exists("athena.textminer").await.unwrap());
        assert!(!ctx.state.repos.services().exists("eosc.athena.textminer").await.unwrap());
    }

    #[tokio::test]
    async fn test_template_under_review_stays() {
        let ctx = TestContext::new().await;
        let provider = ctx.approved_provider("ATHENA").await;
        let pending = add::handle(&ctx.state, &TestContext::owner(), AddResourceCommand::new(service(&provider.id, "TEXTMINER")))
            .await
            .unwrap();

        let err = handle(&ctx.state, &TestContext::owner(), DeleteResourceCommand::<Service>::new(&pending.id))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "You cannot delete a Template that is under review");

        let err = handle(&ctx.state, &TestContext::stranger(), DeleteResourceCommand::<Service>::new(&pending.id))
            .await
            .unwrap_err();
        assert!(matches!(err, CatalogueError::Forbidden(_)));
    }

    #[tokio::test]
    async fn test_delete_all_of_provider() {
        let ctx = TestContext::new().await;
        let provider = ctx.approved_provider("ATHENA").await;
        ctx.approved_service(&provider.id, "TEXTMINER").await;
        ctx.approved_service(&provider.id, "GRAPH").await;

        assert_eq!(delete_all_of::<Service>(&ctx.state, "athena").await.unwrap(), 2);
        assert_eq!(ctx.state.repos.services().count().await.unwrap(), 0);
    }
}
