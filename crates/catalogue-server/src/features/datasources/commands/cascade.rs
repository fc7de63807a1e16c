//! Keep a service's datasource in step with the service
//!
//! Each helper is a no-op when the service has no datasource.

use crate::api::AppState;
use crate::domain::{ActionType, DatasourceBundle, LoggingType, Metadata};
use crate::error::CatalogueResult;
use crate::features::shared::{actor, delete_public_copy, entry, refresh_public_copy};
use crate::search::FacetFilter;
use crate::security::Authentication;

async fn of_service(state: &AppState, service_id: &str) -> CatalogueResult<Option<DatasourceBundle>> {
    let filter = FacetFilter {
        quantity: 1,
        ..FacetFilter::default()
    }
    .with_filter("service_id", service_id)
    .with_filter("published", "false");
    Ok(state.repos.datasources().search(&filter).await?.results.into_iter().next())
}

/// Only an approved datasource follows the service's activation
pub async fn activate_for_service(state: &AppState, service_id: &str, active: bool) -> CatalogueResult<bool> {
    let Some(mut bundle) = of_service(state, service_id).await? else {
        return Ok(false);
    };
    if !bundle.is_approved() || bundle.active == active {
        return Ok(false);
    }
    let action = if active {
        ActionType::Activated
    } else {
        ActionType::Deactivated
    };
    bundle.active = active;
    bundle.log(entry(&Authentication::System, LoggingType::Update, action, None));
    bundle.metadata = Some(Metadata::update(bundle.metadata.as_ref(), "system", None));
    state.repos.datasources().update(&bundle).await?;
    refresh_public_copy(state, &bundle).await?;
    tracing::debug!(id = %bundle.id, active, "Datasource activation followed its service");
    Ok(true)
}

pub async fn suspend_for_service(
    state: &AppState,
    auth: &Authentication,
    service_id: &str,
    suspend: bool,
) -> CatalogueResult<bool> {
    let Some(mut bundle) = of_service(state, service_id).await? else {
        return Ok(false);
    };
    if bundle.suspended == suspend {
        return Ok(false);
    }
    let action = if suspend {
        ActionType::Suspended
    } else {
        ActionType::Unsuspended
    };
    bundle.suspended = suspend;
    bundle.log(entry(auth, LoggingType::Update, action, None));
    bundle.metadata = Some(Metadata::update(bundle.metadata.as_ref(), &actor(auth), None));
    state.repos.datasources().update(&bundle).await?;
    refresh_public_copy(state, &bundle).await?;
    Ok(true)
}

pub async fn delete_for_service(state: &AppState, service_id: &str) -> CatalogueResult<bool> {
    let Some(bundle) = of_service(state, service_id).await? else {
        return Ok(false);
    };
    delete_public_copy(state, &bundle).await?;
    state.repos.datasources().delete(&bundle.id).await?;
    tracing::debug!(id = %bundle.id, "Datasource deleted with its service");
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::states::DATASOURCE_STATES;
    use crate::domain::{Datasource, Service};
    use crate::features::datasources::commands::add::{self, AddDatasourceCommand};
    use crate::features::datasources::commands::verify::{self, VerifyDatasourceCommand};
    use crate::features::resources::commands::{activate as service_activate, delete as service_delete};
    use crate::features::resources::commands::{ActivateResourceCommand, DeleteResourceCommand};
    use crate::features::shared::test_helpers::TestContext;

    async fn approved_datasource(ctx: &TestContext, service_id: &str) -> DatasourceBundle {
        let added = add::handle(
            &ctx.state,
            &TestContext::owner(),
            AddDatasourceCommand {
                datasource: Datasource {
                    service_id: service_id.to_string(),
                    ..Default::default()
                },
            },
        )
        .await
        .unwrap();
        verify::handle(
            &ctx.state,
            &TestContext::admin(),
            VerifyDatasourceCommand {
                id: added.id,
                status: DATASOURCE_STATES.approved.into(),
                active: None,
            },
        )
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn test_follows_service_activation_and_deletion() {
        let ctx = TestContext::new().await;
        let provider = ctx.approved_provider("ATHENA").await;
        let service = ctx.approved_service(&provider.id, "TEXTMINER").await;
        let datasource = approved_datasource(&ctx, &service.id).await;
        assert!(datasource.active);

        service_activate::handle(&ctx.state, &TestContext::owner(), ActivateResourceCommand::<Service>::new(&service.id, false))
            .await
            .unwrap();
        let datasource = ctx.state.repos.datasources().get_required(&datasource.id).await.unwrap();
        assert!(!datasource.active);
        assert_eq!(datasource.logging_info.last().unwrap().user_email.as_deref(), Some("system"));

        service_delete::handle(&ctx.state, &TestContext::owner(), DeleteResourceCommand::<Service>::new(&service.id))
            .await
            .unwrap();
        assert_eq!(ctx.state.repos.datasources().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_no_datasource_is_a_noop() {
        let ctx = TestContext::new().await;
        assert!(!activate_for_service(&ctx.state, "athena.none", true).await.unwrap());
        assert!(!suspend_for_service(&ctx.state, &TestContext::epot(), "athena.none", true)
            .await
            .unwrap());
        assert!(!delete_for_service(&ctx.state, "athena.none").await.unwrap());
    }
}
