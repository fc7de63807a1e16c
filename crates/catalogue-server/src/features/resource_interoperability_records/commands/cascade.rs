//! Keep a resource's interoperability record link in step with the resource

use super::publish;
use crate::api::AppState;
use crate::domain::{ActionType, LoggingType, Metadata, ResourceInteroperabilityRecordBundle};
use crate::error::CatalogueResult;
use crate::features::shared::{actor, delete_public_copy, entry};
use crate::search::FacetFilter;
use crate::security::Authentication;

async fn of_resource(
    state: &AppState,
    resource_id: &str,
) -> CatalogueResult<Option<ResourceInteroperabilityRecordBundle>> {
    let filter = FacetFilter {
        quantity: 1,
        ..FacetFilter::default()
    }
    .with_filter("resource_id", resource_id)
    .with_filter("published", "false");
    let page = state.repos.resource_interoperability_records().search(&filter).await?;
    Ok(page.results.into_iter().next())
}

pub async fn suspend_for_resource(
    state: &AppState,
    auth: &Authentication,
    resource_id: &str,
    suspend: bool,
) -> CatalogueResult<bool> {
    let Some(mut bundle) = of_resource(state, resource_id).await? else {
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
    state.repos.resource_interoperability_records().update(&bundle).await?;
    publish(state, &bundle).await?;
    Ok(true)
}

pub async fn delete_for_resource(state: &AppState, resource_id: &str) -> CatalogueResult<bool> {
    let Some(bundle) = of_resource(state, resource_id).await? else {
        return Ok(false);
    };
    delete_public_copy(state, &bundle).await?;
    state.repos.resource_interoperability_records().delete(&bundle.id).await?;
    tracing::debug!(id = %bundle.id, "Resource Interoperability Record deleted with its resource");
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::resource_interoperability_record::fixtures::link;
    use crate::domain::Service;
    use crate::features::resource_interoperability_records::commands::add::{
        self, AddResourceInteroperabilityRecordCommand, LinkedResourceType,
    };
    use crate::features::resources::commands::{delete as service_delete, suspend as service_suspend};
    use crate::features::resources::commands::{DeleteResourceCommand, SuspendResourceCommand};
    use crate::features::shared::test_helpers::TestContext;

    #[tokio::test]
    async fn test_follows_resource_suspension_and_deletion() {
        let ctx = TestContext::new().await;
        let provider = ctx.approved_provider("ATHENA").await;
        let service = ctx.approved_service(&provider.id, "TEXTMINER").await;
        let guideline = ctx.approved_record(&provider.id, "10.1234/abc").await;
        add::handle(
            &ctx.state,
            &TestContext::owner(),
            AddResourceInteroperabilityRecordCommand {
                link: link(&service.id, &[&guideline.id]),
                resource_type: LinkedResourceType::Service,
            },
        )
        .await
        .unwrap();
        let repo = ctx.state.repos.resource_interoperability_records();

        service_suspend::handle(&ctx.state, &TestContext::epot(), SuspendResourceCommand::<Service>::new(&service.id, true))
            .await
            .unwrap();
        assert!(repo.get_required("athena.textminer.interoperability").await.unwrap().suspended);
        assert!(repo.get_required("eosc.athena.textminer.interoperability").await.unwrap().suspended);

        service_suspend::handle(&ctx.state, &TestContext::epot(), SuspendResourceCommand::<Service>::new(&service.id, false))
            .await
            .unwrap();
        service_delete::handle(&ctx.state, &TestContext::owner(), DeleteResourceCommand::<Service>::new(&service.id))
            .await
            .unwrap();
        assert_eq!(repo.count().await.unwrap(), 0);
        assert!(ctx.state.repos.interoperability_records().exists(&guideline.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_no_link_is_a_noop() {
        let ctx = TestContext::new().await;
        assert!(!suspend_for_resource(&ctx.state, &TestContext::epot(), "athena.none", true)
            .await
            .unwrap());
        assert!(!delete_for_resource(&ctx.state, "athena.none").await.unwrap());
    }
}
