//! Activate or deactivate a provider and everything it offers

use mediator::Request;
use serde::{Deserialize, Serialize};

use crate::api::AppState;
use crate::domain::states::PROVIDER_STATES;
use crate::domain::{
    ActionType, InteroperabilityRecord, LoggingType, Metadata, ProviderBundle, Service, TrainingResource,
};
use crate::error::{CatalogueError, CatalogueResult};
use crate::features::resources::commands::activate::cascade;
use crate::features::shared::{actor, ensure_not_published, entry, refresh_public_copy};
use crate::security::Authentication;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivateProviderCommand {
    pub id: String,
    pub active: bool,
}

impl Request<CatalogueResult<ProviderBundle>> for ActivateProviderCommand {}

#[tracing::instrument(skip(state, auth), fields(caller = auth.email()))]
pub async fn handle(
    state: &AppState,
    auth: &Authentication,
    command: ActivateProviderCommand,
) -> CatalogueResult<ProviderBundle> {
    let repo = state.repos.providers();
    let mut bundle = repo.get_required(&command.id).await?;
    state.security.require_provider_admin(auth, &bundle.id).await?;
    ensure_not_published(&bundle, "publish")?;

    let status = bundle.status();
    if (PROVIDER_STATES.is_pending(status) || PROVIDER_STATES.is_rejected(status)) && !bundle.active {
        return Err(CatalogueError::validation(format!(
            "You cannot activate this Provider, because it's Inactive with status = [{}]",
            status.unwrap_or_default()
        )));
    }

    let action = if command.active {
        ActionType::Activated
    } else {
        ActionType::Deactivated
    };
    bundle.active = command.active;
    bundle.log(entry(auth, LoggingType::Update, action, None));
    bundle.metadata = Some(Metadata::update(bundle.metadata.as_ref(), &actor(auth), None));
    repo.update(&bundle).await?;
    tracing::info!(id = %bundle.id, active = bundle.active, "Provider activation changed");

    let services = cascade::<Service>(state, &bundle.id, command.active).await?;
    let trainings = cascade::<TrainingResource>(state, &bundle.id, command.active).await?;
    let records = cascade::<InteroperabilityRecord>(state, &bundle.id, command.active).await?;
    tracing::debug!(services, trainings, records, "Cascaded activation");

    refresh_public_copy(state, &bundle).await?;
    Ok(bundle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::shared::test_helpers::TestContext;

    #[tokio::test]
    async fn test_deactivation_cascades_to_services() {
        let ctx = TestContext::new().await;
        let provider = ctx.approved_provider("ATHENA").await;
        let service = ctx.approved_service(&provider.id, "TEXTMINER").await;
        assert!(service.active);

        let command = ActivateProviderCommand {
            id: provider.id.clone(),
            active: false,
        };
        let deactivated = handle(&ctx.state, &TestContext::admin(), command).await.unwrap();
        assert!(!deactivated.active);
        assert_eq!(
            deactivated.logging_info.last().unwrap().action_type,
            ActionType::Deactivated
        );

        let service = ctx.state.repos.services().get_required(&service.id).await.unwrap();
        assert!(!service.active);
        let cascaded = service.logging_info.last().unwrap();
        assert_eq!(cascaded.action_type, ActionType::Deactivated);
        assert_eq!(cascaded.user_email.as_deref(), Some("system"));

        let public = ctx.state.repos.providers().get_required("eosc.athena").await.unwrap();
        assert!(!public.active);
    }

    #[tokio::test]
    async fn test_inactive_pending_provider_cannot_be_activated() {
        let ctx = TestContext::new().await;
        let pending = ctx.pending_provider("ATHENA").await;
        let command = ActivateProviderCommand {
            id: pending.id,
            active: true,
        };
        let err = handle(&ctx.state, &TestContext::admin(), command).await.unwrap_err();
        assert!(matches!(err, CatalogueError::Validation(_)));
    }
}
