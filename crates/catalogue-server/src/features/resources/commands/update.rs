//! Update the payload of a service, training resource or interoperability record

use mediator::Request;
use serde::{Deserialize, Serialize};

use catalogue_common::time;

use crate::api::AppState;
use crate::domain::states::template;
use crate::domain::{ActionType, AuditState, Bundle, LoggingType, Metadata, ProviderResource};
use crate::error::{CatalogueError, CatalogueResult};
use crate::features::providers::commands::template::set_template_status;
use crate::features::shared::{
    actor, check_vocabularies, ensure_not_published, entry, refresh_public_copy,
};
use crate::security::Authentication;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateResourceCommand<T> {
    pub resource: T,
    #[serde(default)]
    pub comment: Option<String>,
}

impl<T> UpdateResourceCommand<T> {
    pub fn new(resource: T, comment: Option<String>) -> Self {
        Self { resource, comment }
    }
}

impl<T: ProviderResource> Request<CatalogueResult<Bundle<T>>> for UpdateResourceCommand<T> {}

#[tracing::instrument(skip(state, auth, command), fields(kind = T::DISPLAY_NAME, id = %command.resource.id()))]
pub async fn handle<T: ProviderResource>(
    state: &AppState,
    auth: &Authentication,
    command: UpdateResourceCommand<T>,
) -> CatalogueResult<Bundle<T>> {
    let mut resource = command.resource;
    let repo = state.repos.of::<Bundle<T>>();
    let existing = repo.get_required(resource.id()).await?;
    state.security.require_resource_admin(auth, &existing.id).await?;
    ensure_not_published(&existing, "update")?;

    if resource.catalogue_id().is_none() {
        if let Some(catalogue_id) = existing.payload.catalogue_id() {
            resource.set_catalogue_id(catalogue_id.to_string());
        }
    }
    resource.normalize_version();
    if existing.payload == resource {
        tracing::debug!("Resource unchanged");
        return Ok(existing);
    }
    if resource.catalogue_id() != existing.payload.catalogue_id() && !auth.is_admin_or_epot() {
        return Err(CatalogueError::forbidden(format!(
            "You cannot change the catalogueId of a {}",
            T::DISPLAY_NAME
        )));
    }
    if existing.payload.version().is_some() && resource.version().is_none() {
        return Err(CatalogueError::conflict(format!(
            "You cannot remove the version of a {}",
            T::DISPLAY_NAME
        )));
    }

    resource.check()?;
    check_vocabularies(state, &resource).await?;
    resource.on_update(&existing.payload, &time::now_millis());

    let action = if resource.version() != existing.payload.version() {
        ActionType::UpdatedVersion
    } else {
        ActionType::Updated
    };
    let mut bundle = existing.clone();
    bundle.set_payload(resource);
    bundle.metadata = Some(Metadata::update(existing.metadata.as_ref(), &actor(auth), None));
    bundle.log(entry(auth, LoggingType::Update, action, command.comment));

    // A rejected template goes back for review once it is fixed.
    let mut resubmitted = None;
    if T::USES_TEMPLATE && T::STATES.is_rejected(bundle.status()) {
        if let Some(provider_id) = bundle.payload.provider_id() {
            let provider = state.repos.providers().get_required(provider_id).await?;
            if provider.template_status.as_deref() == Some(template::REJECTED) {
                bundle.status = Some(T::STATES.pending.to_string());
                bundle.active = false;
                resubmitted = Some(provider);
            }
        }
    }

    repo.update(&bundle).await?;
    tracing::info!(id = %bundle.id, action = action.as_str(), "Resource updated");

    if let Some(mut provider) = resubmitted {
        set_template_status(state, &mut provider, template::PENDING).await?;
    }
    if bundle.audit_state == AuditState::InvalidAndUpdated {
        state.mailer.invalid_update(&bundle).await;
    }
    refresh_public_copy(state, &bundle).await?;
    Ok(bundle)
}
