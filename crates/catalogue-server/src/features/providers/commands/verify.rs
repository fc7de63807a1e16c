//! Approve or reject a provider

use mediator::Request;
use serde::{Deserialize, Serialize};

use crate::api::AppState;
use crate::domain::states::PROVIDER_STATES;
use crate::domain::{ActionType, LoggingType, Metadata, Provider, ProviderBundle};
use crate::error::CatalogueResult;
use crate::features::shared::{actor, check_status, ensure_not_published, entry, refresh_public_copy};
use crate::features::vocabularies::commands::hosting_legal_entities;
use crate::security::Authentication;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyProviderCommand {
    pub id: String,
    pub status: String,
    #[serde(default)]
    pub active: Option<bool>,
}

impl Request<CatalogueResult<ProviderBundle>> for VerifyProviderCommand {}

#[tracing::instrument(skip(state, auth), fields(caller = auth.email()))]
pub async fn handle(
    state: &AppState,
    auth: &Authentication,
    command: VerifyProviderCommand,
) -> CatalogueResult<ProviderBundle> {
    auth.require_admin_or_epot()?;
    check_status::<Provider>(state, &command.status).await?;

    let repo = state.repos.providers();
    let mut bundle = repo.get_required(&command.id).await?;
    ensure_not_published(&bundle, "verify")?;

    let status = command.status.as_str();
    bundle.status = Some(status.to_string());
    if PROVIDER_STATES.is_approved(Some(status)) {
        bundle.active = command.active.unwrap_or(true);
        bundle.log(entry(auth, LoggingType::Onboard, ActionType::Approved, None));
    } else if PROVIDER_STATES.is_rejected(Some(status)) {
        bundle.active = false;
        bundle.log(entry(auth, LoggingType::Onboard, ActionType::Rejected, None));
    } else {
        bundle.refresh_history();
    }
    bundle.metadata = Some(Metadata::update(bundle.metadata.as_ref(), &actor(auth), None));

    repo.update(&bundle).await?;
    tracing::info!(id = %bundle.id, status, active = bundle.active, "Provider verified");

    state.mailer.provider_onboarding(&bundle).await;
    refresh_public_copy(state, &bundle).await?;
    if bundle.is_approved() {
        hosting_legal_entities::register(state, &bundle).await?;
    }

    Ok(bundle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::states::vocabulary_type;
    use crate::error::CatalogueError;
    use crate::features::shared::test_helpers::TestContext;
    use crate::search::FacetFilter;

    fn verify(id: &str, status: &str, active: Option<bool>) -> VerifyProviderCommand {
        VerifyProviderCommand {
            id: id.to_string(),
            status: status.to_string(),
            active,
        }
    }

    #[tokio::test]
    async fn test_approve_publishes() {
        let ctx = TestContext::new().await;
        let pending = ctx.pending_provider("ATHENA").await;
        ctx.mail.clear().await;

        let approved = handle(&ctx.state, &TestContext::epot(), verify(&pending.id, PROVIDER_STATES.approved, None))
            .await
            .unwrap();

        assert!(approved.active);
        let onboarding = approved.latest_onboarding_info.as_ref().unwrap();
        assert_eq!(onboarding.action_type, ActionType::Approved);
        assert!(ctx.state.repos.providers().exists("eosc.athena").await.unwrap());
        assert!(ctx
            .mail
            .subjects()
            .await
            .iter()
            .any(|s| s.ends_with("has been approved")));
    }

    #[tokio::test]
    async fn test_reject_deactivates() {
        let ctx = TestContext::new().await;
        let approved = ctx.approved_provider("ATHENA").await;
        let rejected = handle(&ctx.state, &TestContext::admin(), verify(&approved.id, PROVIDER_STATES.rejected, Some(true)))
            .await
            .unwrap();
        assert!(!rejected.active);
        assert!(!ctx.state.repos.providers().exists("eosc.athena").await.unwrap());
    }

    #[tokio::test]
    async fn test_status_must_be_provider_state() {
        let ctx = TestContext::new().await;
        let pending = ctx.pending_provider("ATHENA").await;
        let err = handle(&ctx.state, &TestContext::admin(), verify(&pending.id, "approved resource", None))
            .await
            .unwrap_err();
        assert!(matches!(err, CatalogueError::Validation(_)));

        let err = handle(&ctx.state, &TestContext::owner(), verify(&pending.id, PROVIDER_STATES.approved, None))
            .await
            .unwrap_err();
        assert!(matches!(err, CatalogueError::Forbidden(_)));
    }

    #[tokio::test]
    async fn test_legal_entity_joins_hosting_vocabulary() {
        let ctx = TestContext::new().await;
        let mut pending = ctx.pending_provider("ATHENA").await;
        pending.payload.legal_entity = true;
        ctx.state.repos.providers().update(&pending).await.unwrap();

        handle(&ctx.state, &TestContext::admin(), verify(&pending.id, PROVIDER_STATES.approved, None))
            .await
            .unwrap();

        let filter = FacetFilter::all().with_filter("type", vocabulary_type::PROVIDER_HOSTING_LEGAL_ENTITY);
        let entities = ctx.state.repos.vocabularies().all(&filter).await.unwrap();
        assert_eq!(entities.len(), 1);
        assert_eq!(entities[0].name, "ATHENA Institute");
    }
}
