//! Link a resource to the interoperability records it complies with

use mediator::Request;
use serde::{Deserialize, Serialize};

use super::{check_records, publish};
use crate::api::AppState;
use crate::domain::{
    ActionType, Bundle, LoggingType, Metadata, ProviderResource, ResourceInteroperabilityRecord,
    ResourceInteroperabilityRecordBundle, ResourcePayload, Service, TrainingResource,
};
use crate::error::{CatalogueError, CatalogueResult};
use crate::features::shared::{actor, entry, get_source};
use crate::ids;
use crate::security::Authentication;

/// Kinds of resource that can be linked
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkedResourceType {
    Service,
    TrainingResource,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddResourceInteroperabilityRecordCommand {
    pub link: ResourceInteroperabilityRecord,
    pub resource_type: LinkedResourceType,
}

impl Request<CatalogueResult<ResourceInteroperabilityRecordBundle>> for AddResourceInteroperabilityRecordCommand {}

/// Catalogue of an active, approved original
async fn linkable<T: ProviderResource>(state: &AppState, id: &str) -> CatalogueResult<Option<String>> {
    let bundle: Bundle<T> = get_source(state, id).await?;
    if !bundle.active || !bundle.is_approved() {
        return Err(CatalogueError::validation(format!(
            "{} '{}' must be active and approved before linking Interoperability Records",
            T::DISPLAY_NAME,
            id
        )));
    }
    Ok(bundle.payload.catalogue_id().map(str::to_string))
}

#[tracing::instrument(skip(state, auth, command), fields(resource_id = %command.link.resource_id, caller = auth.email()))]
pub async fn handle(
    state: &AppState,
    auth: &Authentication,
    command: AddResourceInteroperabilityRecordCommand,
) -> CatalogueResult<ResourceInteroperabilityRecordBundle> {
    auth.require_authenticated()?;
    let mut link = command.link;
    let resource_id = link.resource_id.trim().to_string();
    let id = ids::resource_interoperability_record_id(Some(resource_id.as_str()).filter(|s| !s.is_empty()))?;

    let catalogue_id = match command.resource_type {
        LinkedResourceType::Service => linkable::<Service>(state, &resource_id).await?,
        LinkedResourceType::TrainingResource => linkable::<TrainingResource>(state, &resource_id).await?,
    };
    state.security.require_resource_admin(auth, &resource_id).await?;

    let repo = state.repos.resource_interoperability_records();
    if repo.exists(&id).await? {
        return Err(CatalogueError::conflict(format!(
            "Resource '{}' already has a Resource Interoperability Record",
            resource_id
        )));
    }

    link.id = id;
    link.resource_id = resource_id;
    link.set_catalogue_id(catalogue_id.unwrap_or_else(|| state.catalogue_id().to_string()));
    link.check()?;
    check_records(state, &link).await?;

    let mut bundle = ResourceInteroperabilityRecordBundle::new(link);
    bundle.metadata = Some(Metadata::create(&actor(auth), auth.email()));
    bundle.active = true;
    bundle.log(entry(auth, LoggingType::Onboard, ActionType::Registered, None));
    repo.add(&bundle).await?;
    publish(state, &bundle).await?;
    tracing::info!(id = %bundle.id, "Resource Interoperability Record registered");
    Ok(bundle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::interoperability_record::fixtures::record;
    use crate::domain::resource_interoperability_record::fixtures::link;
    use crate::features::resources::commands::add::{self as resource_add, AddResourceCommand};
    use crate::features::shared::test_helpers::TestContext;

    fn command(resource_id: &str, record_ids: &[&str]) -> AddResourceInteroperabilityRecordCommand {
        AddResourceInteroperabilityRecordCommand {
            link: link(resource_id, record_ids),
            resource_type: LinkedResourceType::Service,
        }
    }

    #[tokio::test]
    async fn test_link_is_published_at_once() {
        let ctx = TestContext::new().await;
        let provider = ctx.approved_provider("ATHENA").await;
        let service = ctx.approved_service(&provider.id, "TEXTMINER").await;
        let guideline = ctx.approved_record(&provider.id, "10.1234/abc").await;

        let bundle = handle(&ctx.state, &TestContext::owner(), command(&service.id, &[&guideline.id]))
            .await
            .unwrap();
        assert_eq!(bundle.id, "athena.textminer.interoperability");
        assert_eq!(bundle.payload.catalogue_id.as_deref(), Some("eosc"));
        assert!(bundle.active);
        assert_eq!(bundle.status(), None);

        let copy = ctx
            .state
            .repos
            .resource_interoperability_records()
            .get_required("eosc.athena.textminer.interoperability")
            .await
            .unwrap();
        assert!(copy.is_published());
        assert_eq!(copy.payload.resource_id, "eosc.athena.textminer");
        assert_eq!(copy.payload.interoperability_record_ids, vec![format!("eosc.{}", guideline.id)]);

        let err = handle(&ctx.state, &TestContext::owner(), command(&service.id, &[&guideline.id]))
            .await
            .unwrap_err();
        assert!(matches!(err, CatalogueError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_records_must_be_approved() {
        let ctx = TestContext::new().await;
        let provider = ctx.approved_provider("ATHENA").await;
        let service = ctx.approved_service(&provider.id, "TEXTMINER").await;
        let pending = resource_add::handle(&ctx.state, &TestContext::owner(), AddResourceCommand::new(record(&provider.id, "10.1234/abc")))
            .await
            .unwrap();

        let err = handle(&ctx.state, &TestContext::owner(), command(&service.id, &[&pending.id]))
            .await
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            format!("Interoperability Record '{}' is not yet approved", pending.id)
        );

        let err = handle(&ctx.state, &TestContext::owner(), command(&service.id, &["unknown"]))
            .await
            .unwrap_err();
        assert!(matches!(err, CatalogueError::NotFound(_)));

        let err = handle(&ctx.state, &TestContext::owner(), command(&service.id, &[]))
            .await
            .unwrap_err();
        assert!(matches!(err, CatalogueError::Validation(_)));
        assert_eq!(ctx.state.repos.resource_interoperability_records().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_only_approved_originals_are_linked() {
        let ctx = TestContext::new().await;
        let provider = ctx.approved_provider("ATHENA").await;
        let service = ctx.approved_service(&provider.id, "TEXTMINER").await;
        let guideline = ctx.approved_record(&provider.id, "10.1234/abc").await;

        let err = handle(&ctx.state, &TestContext::admin(), command("eosc.athena.textminer", &[&guideline.id]))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Service with id 'eosc.athena.textminer' does not exist!");

        let err = handle(
            &ctx.state,
            &TestContext::admin(),
            AddResourceInteroperabilityRecordCommand {
                link: link(&service.id, &[&guideline.id]),
                resource_type: LinkedResourceType::TrainingResource,
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, CatalogueError::NotFound(_)));

        let err = handle(&ctx.state, &TestContext::stranger(), command(&service.id, &[&guideline.id]))
            .await
            .unwrap_err();
        assert!(matches!(err, CatalogueError::Forbidden(_)));
    }
}
