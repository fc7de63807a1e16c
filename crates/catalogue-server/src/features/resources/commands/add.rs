//! Register a service, training resource or interoperability record
//!
//! Services and training resources go through the template flow: the first
//! one a provider submits is its template and stays pending until the
//! portal administrators verify it. Once the template is approved, further
//! resources are approved on registration. Interoperability records always
//! start pending.

use mediator::Request;
use serde::{Deserialize, Serialize};

use catalogue_common::time;

use crate::api::AppState;
use crate::domain::states::template;
use crate::domain::{ActionType, Bundle, LoggingType, Metadata, Provider, ProviderResource};
use crate::error::{CatalogueError, CatalogueResult};
use crate::features::providers::commands::template::set_template_status;
use crate::features::shared::{actor, check_vocabularies, entry, get_source, refresh_public_copy};
use crate::security::Authentication;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddResourceCommand<T> {
    pub resource: T,
}

impl<T> AddResourceCommand<T> {
    pub fn new(resource: T) -> Self {
        Self { resource }
    }
}

impl<T: ProviderResource> Request<CatalogueResult<Bundle<T>>> for AddResourceCommand<T> {}

#[tracing::instrument(skip(state, auth, command), fields(kind = T::DISPLAY_NAME, caller = auth.email()))]
pub async fn handle<T: ProviderResource>(
    state: &AppState,
    auth: &Authentication,
    command: AddResourceCommand<T>,
) -> CatalogueResult<Bundle<T>> {
    auth.require_authenticated()?;
    let mut resource = command.resource;

    let catalogue_id = resource
        .catalogue_id()
        .filter(|c| !c.trim().is_empty())
        .unwrap_or(state.catalogue_id())
        .to_string();
    resource.set_catalogue_id(catalogue_id);

    let provider_id = resource
        .provider_id()
        .ok_or_else(|| {
            CatalogueError::validation(format!("{} must reference its Provider", T::DISPLAY_NAME))
        })?
        .to_string();
    let mut provider = get_source::<Provider>(state, &provider_id).await?;
    if !provider.is_approved() {
        return Err(CatalogueError::conflict(format!(
            "The Provider '{}' you provided as a Resource Organisation is not yet approved",
            provider_id
        )));
    }
    if T::USES_TEMPLATE && provider.template_status.as_deref() == Some(template::PENDING) {
        return Err(CatalogueError::conflict(format!(
            "The Provider ID '{}' has a pending template, you cannot add a new {}",
            provider_id,
            T::DISPLAY_NAME
        )));
    }
    state.security.provider_can_add_resources::<T>(auth, &provider).await?;

    resource.normalize_version();
    let id = resource.generate_id()?;
    resource.set_id(id);
    resource.check()?;
    check_vocabularies(state, &resource).await?;

    let repo = state.repos.of::<Bundle<T>>();
    if repo.exists(resource.id()).await? {
        return Err(CatalogueError::AlreadyExists(format!(
            "{} with id '{}' already exists!",
            T::DISPLAY_NAME,
            resource.id()
        )));
    }

    resource.on_create(&time::now_millis());
    let mut bundle = Bundle::new(resource);
    bundle.metadata = Some(Metadata::create(&actor(auth), auth.email()));
    bundle.log(entry(auth, LoggingType::Onboard, ActionType::Registered, None));

    let template_approved = provider.template_status.as_deref() == Some(template::APPROVED);
    if T::USES_TEMPLATE && template_approved {
        bundle.status = Some(T::STATES.approved.to_string());
        bundle.active = true;
        bundle.log(entry(auth, LoggingType::Onboard, ActionType::Approved, None));
    } else {
        bundle.status = Some(T::STATES.pending.to_string());
        bundle.active = false;
    }

    repo.add(&bundle).await?;
    tracing::info!(id = %bundle.id, status = bundle.status(), "Resource registered");

    if !T::USES_TEMPLATE {
        state.mailer.resource_received(&bundle, &provider).await;
    } else if !template_approved {
        set_template_status(state, &mut provider, template::PENDING).await?;
    }
    refresh_public_copy(state, &bundle).await?;

    Ok(bundle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::interoperability_record::fixtures::record;
    use crate::domain::service::fixtures::service;
    use crate::domain::states::{INTEROPERABILITY_RECORD_STATES, RESOURCE_STATES};
    use crate::domain::training_resource::fixtures::training;
    use crate::domain::{AuditState, Service};
    use crate::features::shared::test_helpers::TestContext;

    #[tokio::test]
    async fn test_first_service_is_a_pending_template() {
        let ctx = TestContext::new().await;
        let provider = ctx.approved_provider("ATHENA").await;
        ctx.mail.clear().await;

        let bundle = handle(&ctx.state, &TestContext::owner(), AddResourceCommand::new(service(&provider.id, "TEXTMINER")))
            .await
            .unwrap();

        assert_eq!(bundle.id, "athena.textminer");
        assert_eq!(bundle.status(), Some(RESOURCE_STATES.pending));
        assert!(!bundle.active);
        assert_eq!(bundle.audit_state, AuditState::NotAudited);
        assert_eq!(bundle.payload.catalogue_id.as_deref(), Some("eosc"));

        let provider = ctx.state.repos.providers().get_required("athena").await.unwrap();
        assert_eq!(provider.template_status.as_deref(), Some(template::PENDING));
        assert_eq!(ctx.mail.sent().await.len(), 2);

        let err = handle(&ctx.state, &TestContext::owner(), AddResourceCommand::new(service("athena", "OTHER")))
            .await
            .unwrap_err();
        assert!(matches!(err, CatalogueError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_resources_after_approved_template_are_approved() {
        let ctx = TestContext::new().await;
        let provider = ctx.approved_provider("ATHENA").await;
        ctx.approved_service(&provider.id, "TEXTMINER").await;

        let bundle = handle(&ctx.state, &TestContext::owner(), AddResourceCommand::new(service("athena", "GRAPH")))
            .await
            .unwrap();
        assert_eq!(bundle.status(), Some(RESOURCE_STATES.approved));
        assert!(bundle.active);
        assert_eq!(bundle.logging_info.len(), 2);
        assert!(ctx.state.repos.services().exists("eosc.athena.graph").await.unwrap());

        let course = handle(&ctx.state, &TestContext::owner(), AddResourceCommand::new(training("athena", "Intro")))
            .await
            .unwrap();
        assert!(course.active);
    }

    #[tokio::test]
    async fn test_provider_must_be_approved() {
        let ctx = TestContext::new().await;
        ctx.pending_provider("ATHENA").await;
        let err = handle(&ctx.state, &TestContext::owner(), AddResourceCommand::new(service("athena", "X")))
            .await
            .unwrap_err();
        assert!(matches!(err, CatalogueError::Conflict(_)));

        let err = handle::<Service>(&ctx.state, &TestContext::owner(), AddResourceCommand::new(service("nobody", "X")))
            .await
            .unwrap_err();
        assert!(matches!(err, CatalogueError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_public_provider_copy_cannot_own_resources() {
        let ctx = TestContext::new().await;
        let provider = ctx.approved_provider("ATHENA").await;
        ctx.approved_service(&provider.id, "TEXTMINER").await;

        let err = handle(&ctx.state, &TestContext::owner(), AddResourceCommand::new(service("eosc.athena", "ROGUE")))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Provider with id 'eosc.athena' does not exist!");
        assert!(!ctx.state.repos.services().exists("eosc.athena.rogue").await.unwrap());
        assert!(!ctx.state.repos.services().exists("eosc.eosc.athena.rogue").await.unwrap());
    }

    #[tokio::test]
    async fn test_records_skip_the_template_flow() {
        let ctx = TestContext::new().await;
        ctx.approved_provider("ATHENA").await;
        ctx.mail.clear().await;

        let bundle = handle(&ctx.state, &TestContext::owner(), AddResourceCommand::new(record("athena", "10.1234/abc")))
            .await
            .unwrap();
        assert_eq!(bundle.status(), Some(INTEROPERABILITY_RECORD_STATES.pending));
        assert!(bundle.payload.created.is_some());
        assert_eq!(bundle.payload.created, bundle.payload.updated);

        let sent = ctx.mail.sent().await;
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[0].to, vec!["monitoring@example.org"]);
        assert_eq!(sent[1].to, vec!["jane@example.org"]);

        let provider = ctx.state.repos.providers().get_required("athena").await.unwrap();
        assert_eq!(provider.template_status.as_deref(), Some(template::NONE));
    }
}
