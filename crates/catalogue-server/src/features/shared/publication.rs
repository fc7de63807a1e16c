//! Public copies of approved bundles

use crate::api::AppState;
use crate::domain::{Bundle, ResourcePayload};
use crate::error::{CatalogueError, CatalogueResult};
use crate::ids;

fn catalogue_of<'a, T: ResourcePayload>(state: &'a AppState, bundle: &'a Bundle<T>) -> &'a str {
    bundle
        .payload
        .catalogue_id()
        .filter(|c| !c.is_empty())
        .unwrap_or(state.catalogue_id())
}

/// Mirror `bundle` into its public copy
///
/// Approved bundles are (re)published, anything else loses its copy.
#[tracing::instrument(skip(state, bundle), fields(id = %bundle.id, kind = T::DISPLAY_NAME))]
pub async fn refresh_public_copy<T: ResourcePayload>(
    state: &AppState,
    bundle: &Bundle<T>,
) -> CatalogueResult<()> {
    if bundle.is_published() {
        return Ok(());
    }
    let repo = state.repos.of::<Bundle<T>>();
    if bundle.is_approved() {
        let copy = bundle.public_copy(catalogue_of(state, bundle));
        repo.upsert(&copy).await?;
        tracing::debug!(public_id = %copy.id, "Public copy refreshed");
    } else {
        delete_public_copy(state, bundle).await?;
    }
    Ok(())
}

/// Load a bundle that other resources may hang off
///
/// Public copies are read-only mirrors, so their ids are reported as unknown.
pub async fn get_source<T: ResourcePayload>(state: &AppState, id: &str) -> CatalogueResult<Bundle<T>> {
    match state.repos.of::<Bundle<T>>().get(id).await? {
        Some(bundle) if !bundle.is_published() => Ok(bundle),
        _ => Err(CatalogueError::not_found(format!(
            "{} with id '{}' does not exist!",
            T::DISPLAY_NAME,
            id
        ))),
    }
}

pub async fn delete_public_copy<T: ResourcePayload>(
    state: &AppState,
    bundle: &Bundle<T>,
) -> CatalogueResult<()> {
    let public_id = ids::public_id(&bundle.id, catalogue_of(state, bundle));
    if state.repos.of::<Bundle<T>>().delete_if_exists(&public_id).await? {
        tracing::debug!(%public_id, "Public copy deleted");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::provider::fixtures::provider;
    use crate::domain::states::PROVIDER_STATES;
    use crate::domain::Provider;
    use crate::features::shared::test_helpers::TestContext;

    #[tokio::test]
    async fn test_copy_follows_approval() {
        let ctx = TestContext::new().await;
        let mut p = provider("ATHENA", "Athena");
        p.id = "athena".into();
        p.catalogue_id = Some("eosc".into());
        let mut bundle = Bundle::new(p);
        bundle.status = Some(PROVIDER_STATES.approved.into());

        refresh_public_copy(&ctx.state, &bundle).await.unwrap();
        let copy = ctx.state.repos.providers().get("eosc.athena").await.unwrap().unwrap();
        assert!(copy.is_published());
        assert_eq!(copy.identifiers.original_id.as_deref(), Some("athena"));

        bundle.status = Some(PROVIDER_STATES.rejected.into());
        refresh_public_copy(&ctx.state, &bundle).await.unwrap();
        assert!(ctx.state.repos.providers().get("eosc.athena").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_public_copies_are_not_sources() {
        let ctx = TestContext::new().await;
        ctx.approved_provider("ATHENA").await;

        assert!(get_source::<Provider>(&ctx.state, "athena").await.is_ok());
        let err = get_source::<Provider>(&ctx.state, "eosc.athena").await.unwrap_err();
        assert_eq!(err.to_string(), "Provider with id 'eosc.athena' does not exist!");
    }
}
