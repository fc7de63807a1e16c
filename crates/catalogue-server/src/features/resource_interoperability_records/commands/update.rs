use mediator::Request;
use serde::{Deserialize, Serialize};

use super::{check_records, publish};
use crate::api::AppState;
use crate::domain::{
    ActionType, LoggingType, Metadata, ResourceInteroperabilityRecord,
    ResourceInteroperabilityRecordBundle, ResourcePayload,
};
use crate::error::{CatalogueError, CatalogueResult};
use crate::features::shared::{actor, ensure_not_published, entry};
use crate::security::Authentication;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateResourceInteroperabilityRecordCommand {
    pub link: ResourceInteroperabilityRecord,
    #[serde(default)]
    pub comment: Option<String>,
}

impl Request<CatalogueResult<ResourceInteroperabilityRecordBundle>> for UpdateResourceInteroperabilityRecordCommand {}

/// Replace the linked records of a resource
#[tracing::instrument(skip(state, auth, command), fields(id = %command.link.id, caller = auth.email()))]
pub async fn handle(
    state: &AppState,
    auth: &Authentication,
    command: UpdateResourceInteroperabilityRecordCommand,
) -> CatalogueResult<ResourceInteroperabilityRecordBundle> {
    let mut link = command.link;
    let repo = state.repos.resource_interoperability_records();
    let existing = repo.get_required(&link.id).await?;
    state.security.require_resource_admin(auth, &existing.payload.resource_id).await?;
    ensure_not_published(&existing, "update")?;

    if link.resource_id != existing.payload.resource_id {
        return Err(CatalogueError::conflict(
            "You cannot link a Resource Interoperability Record to another Resource",
        ));
    }
    if link.catalogue_id.is_none() {
        link.catalogue_id = existing.payload.catalogue_id.clone();
    }
    if link == existing.payload {
        return Ok(existing);
    }
    link.check()?;
    check_records(state, &link).await?;

    let mut bundle = existing.clone();
    bundle.set_payload(link);
    bundle.metadata = Some(Metadata::update(existing.metadata.as_ref(), &actor(auth), None));
    bundle.log(entry(auth, LoggingType::Update, ActionType::Updated, command.comment));
    repo.update(&bundle).await?;
    publish(state, &bundle).await?;
    tracing::info!("Resource Interoperability Record updated");
    Ok(bundle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::resource_interoperability_record::fixtures::link;
    use crate::features::resource_interoperability_records::commands::add::{
        self, AddResourceInteroperabilityRecordCommand, LinkedResourceType,
    };
    use crate::features::shared::test_helpers::TestContext;

    #[tokio::test]
    async fn test_update_republishes() {
        let ctx = TestContext::new().await;
        let provider = ctx.approved_provider("ATHENA").await;
        let service = ctx.approved_service(&provider.id, "TEXTMINER").await;
        let first = ctx.approved_record(&provider.id, "10.1234/abc").await;
        let second = ctx.approved_record(&provider.id, "10.1234/def").await;
        let added = add::handle(
            &ctx.state,
            &TestContext::owner(),
            AddResourceInteroperabilityRecordCommand {
                link: link(&service.id, &[&first.id]),
                resource_type: LinkedResourceType::Service,
            },
        )
        .await
        .unwrap();

        let mut changed = added.payload.clone();
        changed.interoperability_record_ids.push(second.id.clone());
        let updated = handle(
            &ctx.state,
            &TestContext::owner(),
            UpdateResourceInteroperabilityRecordCommand {
                link: changed,
                comment: Some("second guideline".into()),
            },
        )
        .await
        .unwrap();
        assert_eq!(updated.payload.interoperability_record_ids.len(), 2);
        assert_eq!(updated.latest_update_info.unwrap().comment.as_deref(), Some("second guideline"));

        let copy = ctx
            .state
            .repos
            .resource_interoperability_records()
            .get_required("eosc.athena.textminer.interoperability")
            .await
            .unwrap();
        assert_eq!(copy.payload.interoperability_record_ids[1], format!("eosc.{}", second.id));

        let mut moved = copy.payload.clone();
        moved.resource_id = "athena.other".into();
        moved.id = added.id.clone();
        let err = handle(
            &ctx.state,
            &TestContext::owner(),
            UpdateResourceInteroperabilityRecordCommand {
                link: moved,
                comment: None,
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, CatalogueError::Conflict(_)));

        let err = handle(
            &ctx.state,
            &TestContext::admin(),
            UpdateResourceInteroperabilityRecordCommand {
                link: copy.payload,
                comment: None,
            },
        )
        .await
        .unwrap_err();
        assert_eq!(err.to_string(), "You cannot directly update a Public Resource Interoperability Record");
    }
}
