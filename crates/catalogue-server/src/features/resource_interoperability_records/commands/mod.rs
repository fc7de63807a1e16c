pub mod add;
pub mod cascade;
pub mod delete;
pub mod update;

pub use add::{AddResourceInteroperabilityRecordCommand, LinkedResourceType};
pub use delete::DeleteResourceInteroperabilityRecordCommand;
pub use update::UpdateResourceInteroperabilityRecordCommand;

use crate::api::AppState;
use crate::domain::{
    InteroperabilityRecord, ResourceInteroperabilityRecord, ResourceInteroperabilityRecordBundle,
    ResourcePayload,
};
use crate::error::{CatalogueError, CatalogueResult};
use crate::features::shared::get_source;

/// Every linked record must be an approved original
pub(crate) async fn check_records(
    state: &AppState,
    link: &ResourceInteroperabilityRecord,
) -> CatalogueResult<()> {
    for id in &link.interoperability_record_ids {
        let record = get_source::<InteroperabilityRecord>(state, id).await?;
        if !record.is_approved() {
            return Err(CatalogueError::validation(format!(
                "Interoperability Record '{}' is not yet approved",
                id
            )));
        }
    }
    Ok(())
}

/// Links are published without review
pub(crate) async fn publish(state: &AppState, bundle: &ResourceInteroperabilityRecordBundle) -> CatalogueResult<()> {
    let catalogue_id = bundle
        .payload
        .catalogue_id()
        .filter(|c| !c.is_empty())
        .unwrap_or(state.catalogue_id())
        .to_string();
    let copy = bundle.public_copy(&catalogue_id);
    state.repos.resource_interoperability_records().upsert(&copy).await?;
    tracing::debug!(public_id = %copy.id, "Public copy refreshed");
    Ok(())
}
