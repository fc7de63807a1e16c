//! Approve or reject a service, training resource or interoperability record
//!
//! For services and training resources the verdict also moves the owning
//! provider's template status.

use std::marker::PhantomData;

use mediator::Request;
use serde::{Deserialize, Serialize};

use crate::api::AppState;
use crate::domain::states::template;
use crate::domain::{ActionType, Bundle, LoggingType, Metadata, ProviderResource};
use crate::error::CatalogueResult;
use crate::features::providers::commands::template::set_template_status;
use crate::features::shared::{actor, check_status, ensure_not_published, entry, refresh_public_copy};
use crate::security::Authentication;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyResourceCommand<T> {
    pub id: String,
    pub status: String,
    #[serde(default)]
    pub active: Option<bool>,
    #[serde(skip)]
    _kind: PhantomData<fn() -> T>,
}

impl<T> VerifyResourceCommand<T> {
    pub fn new(id: &str, status: &str, active: Option<bool>) -> Self {
        Self {
            id: id.to_string(),
            status: status.to_string(),
            active,
            _kind: PhantomData,
        }
    }
}

impl<T: ProviderResource> Request<CatalogueResult<Bundle<T>>> for VerifyResourceCommand<T> {}

#[tracing::instrument(skip(state, auth, command), fields(kind = T::DISPLAY_NAME, id = %command.id, caller = auth.email()))]
pub async fn handle<T: ProviderResource>(
    state: &AppState,
    auth: &Authentication,
    command: VerifyResourceCommand<T>,
) -> CatalogueResult<Bundle<T>> {
    auth.require_admin_or_epot()?;
    check_status::<T>(state, &command.status).await?;

    let repo = state.repos.of::<Bundle<T>>();
    let mut bundle = repo.get_required(&command.id).await?;
    ensure_not_published(&bundle, "verify")?;

    let status = command.status.as_str();
    bundle.status = Some(status.to_string());
    let template_status = if T::STATES.is_approved(Some(status)) {
        bundle.active = command.active.unwrap_or(true);
        bundle.log(entry(auth, LoggingType::Onboard, ActionType::Approved, None));
        template::APPROVED
    } else if T::STATES.is_rejected(Some(status)) {
        bundle.active = false;
        bundle.log(entry(auth, LoggingType::Onboard, ActionType::Rejected, None));
        template::REJECTED
    } else {
        bundle.refresh_history();
        template::PENDING
    };
    bundle.metadata = Some(Metadata::update(bundle.metadata.as_ref(), &actor(auth), None));

    repo.update(&bundle).await?;
    tracing::info!(status, active = bundle.active, "Resource verified");

    if T::USES_TEMPLATE {
        if let Some(provider_id) = bundle.payload.provider_id() {
            let mut provider = state.repos.providers().get_required(provider_id).await?;
            if provider.template_status.as_deref() != Some(template_status) {
                set_template_status(state, &mut provider, template_status).await?;
            }
        }
    }
    refresh_public_copy(state, &bundle).await?;

    Ok(bundle)
}
