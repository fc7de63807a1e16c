//! Suspend or unsuspend a resource

use std::marker::PhantomData;

use mediator::Request;
use serde::{Deserialize, Serialize};

use crate::api::AppState;
use crate::domain::{ActionType, Bundle, LoggingType, Metadata, ProviderResource};
use crate::error::{CatalogueError, CatalogueResult};
use crate::features::datasources::commands::cascade as datasources;
use crate::features::resource_interoperability_records::commands::cascade as links;
use crate::features::shared::{actor, ensure_not_published, entry, refresh_public_copy};
use crate::search::FacetFilter;
use crate::security::Authentication;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuspendResourceCommand<T> {
    pub id: String,
    pub suspend: bool,
    #[serde(skip)]
    _kind: PhantomData<fn() -> T>,
}

impl<T> SuspendResourceCommand<T> {
    pub fn new(id: &str, suspend: bool) -> Self {
        Self {
            id: id.to_string(),
            suspend,
            _kind: PhantomData,
        }
    }
}

impl<T: ProviderResource> Request<CatalogueResult<Bundle<T>>> for SuspendResourceCommand<T> {}

fn apply<T: ProviderResource>(auth: &Authentication, bundle: &mut Bundle<T>, suspend: bool) {
    let action = if suspend {
        ActionType::Suspended
    } else {
        ActionType::Unsuspended
    };
    bundle.suspended = suspend;
    bundle.log(entry(auth, LoggingType::Update, action, None));
    bundle.metadata = Some(Metadata::update(bundle.metadata.as_ref(), &actor(auth), None));
}

#[tracing::instrument(skip(state, auth, command), fields(kind = T::DISPLAY_NAME, id = %command.id, caller = auth.email()))]
pub async fn handle<T: ProviderResource>(
    state: &AppState,
    auth: &Authentication,
    command: SuspendResourceCommand<T>,
) -> CatalogueResult<Bundle<T>> {
    auth.require_admin_or_epot()?;
    let repo = state.repos.of::<Bundle<T>>();
    let mut bundle = repo.get_required(&command.id).await?;
    ensure_not_published(&bundle, "suspend")?;

    if !command.suspend {
        if let Some(provider_id) = bundle.payload.provider_id() {
            let provider = state.repos.providers().get_required(provider_id).await?;
            if provider.suspended {
                return Err(CatalogueError::conflict(format!(
                    "You cannot unsuspend a {} while its Provider '{}' is suspended",
                    T::DISPLAY_NAME,
                    provider.id
                )));
            }
        }
    }

    apply(auth, &mut bundle, command.suspend);
    repo.update(&bundle).await?;
    tracing::info!(suspended = bundle.suspended, "Resource suspension changed");

    if T::HAS_DATASOURCE {
        datasources::suspend_for_service(state, auth, &bundle.id, command.suspend).await?;
    }
    if T::LINKS_RECORDS {
        links::suspend_for_resource(state, auth, &bundle.id, command.suspend).await?;
    }
    refresh_public_copy(state, &bundle).await?;
    Ok(bundle)
}

/// Follow a provider's suspension across all of its resources
pub async fn cascade<T: ProviderResource>(
    state: &AppState,
    auth: &Authentication,
    provider_id: &str,
    suspend: bool,
) -> CatalogueResult<usize> {
    let repo = state.repos.of::<Bundle<T>>();
    let filter = FacetFilter::all()
        .with_filter(T::PROVIDER_FIELD, provider_id)
        .with_filter("published", "false");

    let mut changed = 0;
    for mut bundle in repo.all(&filter).await? {
        if bundle.suspended == suspend {
            continue;
        }
        apply(auth, &mut bundle, suspend);
        repo.update(&bundle).await?;
        if T::HAS_DATASOURCE {
            datasources::suspend_for_service(state, auth, &bundle.id, suspend).await?;
        }
        if T::LINKS_RECORDS {
            links::suspend_for_resource(state, auth, &bundle.id, suspend).await?;
        }
        refresh_public_copy(state, &bundle).await?;
        changed += 1;
    }
    tracing::debug!(kind = T::DISPLAY_NAME, provider_id, changed, suspend, "Cascaded suspension");
    Ok(changed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Service;
    use crate::features::providers::commands::{suspend as provider_suspend, SuspendProviderCommand};
    use crate::features::shared::test_helpers::TestContext;

    #[tokio::test]
    async fn test_suspend_and_unsuspend() {
        let ctx = TestContext::new().await;
        let provider = ctx.approved_provider("ATHENA").await;
        let service = ctx.approved_service(&provider.id, "TEXTMINER").await;

        let suspended = handle(&ctx.state, &TestContext::epot(), SuspendResourceCommand::<Service>::new(&service.id, true))
            .await
            .unwrap();
        assert!(suspended.suspended);
        let public = ctx.state.repos.services().get_required("eosc.athena.textminer").await.unwrap();
        assert!(public.suspended);

        let back = handle(&ctx.state, &TestContext::admin(), SuspendResourceCommand::<Service>::new(&service.id, false))
            .await
            .unwrap();
        assert!(!back.suspended);
        assert_eq!(back.latest_update_info.unwrap().action_type, ActionType::Unsuspended);
    }

    #[tokio::test]
    async fn test_cannot_unsuspend_under_suspended_provider() {
        let ctx = TestContext::new().await;
        let provider = ctx.approved_provider("ATHENA").await;
        let service = ctx.approved_service(&provider.id, "TEXTMINER").await;
        provider_suspend::handle(
            &ctx.state,
            &TestContext::epot(),
            SuspendProviderCommand {
                id: provider.id.clone(),
                suspend: true,
            },
        )
        .await
        .unwrap();

        let err = handle(&ctx.state, &TestContext::epot(), SuspendResourceCommand::<Service>::new(&service.id, false))
            .await
            .unwrap_err();
        assert!(matches!(err, CatalogueError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_owners_cannot_suspend() {
        let ctx = TestContext::new().await;
        let provider = ctx.approved_provider("ATHENA").await;
        let service = ctx.approved_service(&provider.id, "TEXTMINER").await;
        let err = handle(&ctx.state, &TestContext::owner(), SuspendResourceCommand::<Service>::new(&service.id, true))
            .await
            .unwrap_err();
        assert!(matches!(err, CatalogueError::Forbidden(_)));
    }
}
