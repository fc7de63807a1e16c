//! Update a provider's payload
//!
//! Only the payload changes. Status, template status, activation, suspension
//! and identifiers stay what the portal administrators made them.

use std::collections::BTreeSet;

use mediator::Request;
use serde::{Deserialize, Serialize};

use crate::api::AppState;
use crate::domain::{ActionType, AuditState, LoggingType, Metadata, Provider, ProviderBundle, ResourcePayload};
use crate::error::{CatalogueError, CatalogueResult};
use crate::features::shared::{
    actor, check_vocabularies, ensure_not_published, entry, refresh_public_copy,
};
use crate::security::Authentication;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateProviderCommand {
    pub provider: Provider,
    #[serde(default)]
    pub comment: Option<String>,
}

impl Request<CatalogueResult<ProviderBundle>> for UpdateProviderCommand {}

fn emails(provider: &Provider) -> BTreeSet<String> {
    provider.user_emails().into_iter().collect()
}

#[tracing::instrument(skip(state, auth, command), fields(id = %command.provider.id))]
pub async fn handle(
    state: &AppState,
    auth: &Authentication,
    command: UpdateProviderCommand,
) -> CatalogueResult<ProviderBundle> {
    auth.require_authenticated()?;
    let mut provider = command.provider;
    let repo = state.repos.providers();
    let existing = repo.get_required(&provider.id).await?;
    state.security.require_provider_admin(auth, &existing.id).await?;
    ensure_not_published(&existing, "update")?;

    if provider.catalogue_id.is_none() {
        provider.catalogue_id = existing.payload.catalogue_id.clone();
    }
    if existing.payload == provider {
        tracing::debug!("Provider unchanged");
        return Ok(existing);
    }
    if provider.catalogue_id != existing.payload.catalogue_id && !auth.is_admin_or_epot() {
        return Err(CatalogueError::forbidden(
            "You cannot change the catalogueId of a Provider",
        ));
    }

    provider.check()?;
    check_vocabularies(state, &provider).await?;

    let mut bundle = existing.clone();
    bundle.set_payload(provider);
    bundle.metadata = Some(Metadata::update(existing.metadata.as_ref(), &actor(auth), None));
    bundle.log(entry(auth, LoggingType::Update, ActionType::Updated, command.comment));
    repo.update(&bundle).await?;
    tracing::info!(id = %bundle.id, "Provider updated");

    let before = emails(&existing.payload);
    let after = emails(&bundle.payload);
    let added: Vec<String> = after.difference(&before).cloned().collect();
    let removed: Vec<String> = before.difference(&after).cloned().collect();
    state.mailer.admins_added(&bundle, &added).await;
    state.mailer.admins_removed(&bundle, &removed).await;

    if bundle.audit_state == AuditState::InvalidAndUpdated {
        state.mailer.invalid_update(&bundle).await;
    }

    refresh_public_copy(state, &bundle).await?;
    Ok(bundle)
}
