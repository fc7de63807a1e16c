use std::marker::PhantomData;

use mediator::Request;

use crate::api::AppState;
use crate::domain::{Bundle, ProviderResource};
use crate::error::{CatalogueError, CatalogueResult};
use crate::features::shared::{record_audit, AuditVerdict};
use crate::security::Authentication;

#[derive(Debug, Clone)]
pub struct AuditResourceCommand<T> {
    pub id: String,
    pub action: AuditVerdict,
    pub comment: Option<String>,
    _kind: PhantomData<fn() -> T>,
}

impl<T> AuditResourceCommand<T> {
    pub fn new(id: &str, action: AuditVerdict, comment: Option<String>) -> Self {
        Self {
            id: id.to_string(),
            action,
            comment,
            _kind: PhantomData,
        }
    }
}

impl<T: ProviderResource> Request<CatalogueResult<Bundle<T>>> for AuditResourceCommand<T> {}

/// Record the onboarding team's verdict and tell the provider about it
#[tracing::instrument(skip(state, auth, command), fields(kind = T::DISPLAY_NAME, id = %command.id, caller = auth.email()))]
pub async fn handle<T: ProviderResource>(
    state: &AppState,
    auth: &Authentication,
    command: AuditResourceCommand<T>,
) -> CatalogueResult<Bundle<T>> {
    auth.require_admin_or_epot()?;
    let mut bundle = state.repos.of::<Bundle<T>>().get_required(&command.id).await?;
    let provider_id = bundle
        .payload
        .provider_id()
        .ok_or_else(|| CatalogueError::Internal(format!("{} '{}' has no Provider", T::DISPLAY_NAME, bundle.id)))?
        .to_string();
    let provider = state.repos.providers().get_required(&provider_id).await?;

    record_audit(state, auth, &mut bundle, command.action, command.comment).await?;
    state.mailer.audited(&bundle, &provider).await;
    Ok(bundle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{AuditState, Service};
    use crate::features::resources::commands::update::{self, UpdateResourceCommand};
    use crate::features::shared::test_helpers::TestContext;

    #[tokio::test]
    async fn test_invalid_then_updated() {
        let ctx = TestContext::new().await;
        let provider = ctx.approved_provider("ATHENA").await;
        let service = ctx.approved_service(&provider.id, "TEXTMINER").await;
        ctx.mail.clear().await;

        let audited = handle(
            &ctx.state,
            &TestContext::epot(),
            AuditResourceCommand::<Service>::new(&service.id, AuditVerdict::Invalid, Some("Broken link".into())),
        )
        .await
        .unwrap();
        assert_eq!(audited.audit_state, AuditState::InvalidAndNotUpdated);
        assert!(!ctx.mail.sent().await.is_empty());

        let mut payload = audited.payload.clone();
        payload.webpage = Some("https://fixed.example.org".into());
        let updated = update::handle(&ctx.state, &TestContext::owner(), UpdateResourceCommand::new(payload, None))
            .await
            .unwrap();
        assert_eq!(updated.audit_state, AuditState::InvalidAndUpdated);
    }

    #[tokio::test]
    async fn test_public_copies_cannot_be_audited() {
        let ctx = TestContext::new().await;
        let provider = ctx.approved_provider("ATHENA").await;
        ctx.approved_service(&provider.id, "TEXTMINER").await;
        let err = handle(
            &ctx.state,
            &TestContext::epot(),
            AuditResourceCommand::<Service>::new("eosc.athena.textminer", AuditVerdict::Valid, None),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, CatalogueError::Forbidden(_)));
    }
}
