//! Suspend or unsuspend a provider and everything it offers

use mediator::Request;
use serde::{Deserialize, Serialize};

use crate::api::AppState;
use crate::domain::{
    ActionType, InteroperabilityRecord, LoggingType, Metadata, ProviderBundle, Service, TrainingResource,
};
use crate::error::CatalogueResult;
use crate::features::resources::commands::suspend::cascade;
use crate::features::shared::{actor, ensure_not_published, entry, refresh_public_copy};
use crate::security::Authentication;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuspendProviderCommand {
    pub id: String,
    pub suspend: bool,
}

impl Request<CatalogueResult<ProviderBundle>> for SuspendProviderCommand {}

#[tracing::instrument(skip(state, auth), fields(caller = auth.email()))]
pub async fn handle(
    state: &AppState,
    auth: &Authentication,
    command: SuspendProviderCommand,
) -> CatalogueResult<ProviderBundle> {
    auth.require_admin_or_epot()?;
    let repo = state.repos.providers();
    let mut bundle = repo.get_required(&command.id).await?;
    ensure_not_published(&bundle, "suspend")?;

    let action = if command.suspend {
        ActionType::Suspended
    } else {
        ActionType::Unsuspended
    };
    bundle.suspended = command.suspend;
    bundle.log(entry(auth, LoggingType::Update, action, None));
    bundle.metadata = Some(Metadata::update(bundle.metadata.as_ref(), &actor(auth), None));
    repo.update(&bundle).await?;
    tracing::info!(id = %bundle.id, suspended = bundle.suspended, "Provider suspension changed");

    cascade::<Service>(state, auth, &bundle.id, command.suspend).await?;
    cascade::<TrainingResource>(state, auth, &bundle.id, command.suspend).await?;
    cascade::<InteroperabilityRecord>(state, auth, &bundle.id, command.suspend).await?;

    refresh_public_copy(state, &bundle).await?;
    Ok(bundle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CatalogueError;
    use crate::features::shared::test_helpers::TestContext;

    #[tokio::test]
    async fn test_suspension_reaches_resources_and_copies() {
        let ctx = TestContext::new().await;
        let provider = ctx.approved_provider("ATHENA").await;
        let service = ctx.approved_service(&provider.id, "TEXTMINER").await;

        let command = SuspendProviderCommand {
            id: provider.id.clone(),
            suspend: true,
        };
        let suspended = handle(&ctx.state, &TestContext::epot(), command).await.unwrap();
        assert!(suspended.suspended);

        let service = ctx.state.repos.services().get_required(&service.id).await.unwrap();
        assert!(service.suspended);
        assert_eq!(service.logging_info.last().unwrap().action_type, ActionType::Suspended);

        let public = ctx.state.repos.services().get_required("eosc.athena.textminer").await.unwrap();
        assert!(public.suspended);
    }

    #[tokio::test]
    async fn test_only_portal_staff_suspend() {
        let ctx = TestContext::new().await;
        let provider = ctx.approved_provider("ATHENA").await;
        let command = SuspendProviderCommand {
            id: provider.id,
            suspend: true,
        };
        let err = handle(&ctx.state, &TestContext::owner(), command).await.unwrap_err();
        assert!(matches!(err, CatalogueError::Forbidden(_)));
    }
}
