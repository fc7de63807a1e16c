//! Register a provider
//!
//! Providers of this catalogue start pending and inactive until the portal
//! administrators verify them. Providers imported from another catalogue
//! arrive already approved.

use mediator::Request;
use serde::{Deserialize, Serialize};

use crate::api::AppState;
use crate::domain::common::User;
use crate::domain::states::{template, PROVIDER_STATES};
use crate::domain::{ActionType, Bundle, LoggingType, Metadata, Provider, ProviderBundle, ResourcePayload};
use crate::error::{CatalogueError, CatalogueResult};
use crate::features::shared::{actor, check_vocabularies, entry, refresh_public_copy};
use crate::ids;
use crate::security::Authentication;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddProviderCommand {
    pub provider: Provider,
}

impl Request<CatalogueResult<ProviderBundle>> for AddProviderCommand {}

/// Split "Jane Doe" into ("Jane", "Doe")
fn split_name(full_name: &str) -> (&str, &str) {
    let full_name = full_name.trim();
    match full_name.split_once(char::is_whitespace) {
        Some((name, surname)) => (name, surname.trim()),
        None => (full_name, ""),
    }
}

#[tracing::instrument(skip(state, auth, command), fields(abbreviation = %command.provider.abbreviation))]
pub async fn handle(
    state: &AppState,
    auth: &Authentication,
    command: AddProviderCommand,
) -> CatalogueResult<ProviderBundle> {
    auth.require_authenticated()?;
    let mut provider = command.provider;

    if let Authentication::User(principal) = auth {
        if !provider.has_user(&principal.email) {
            let (name, surname) = split_name(&principal.full_name);
            provider.users.push(User::new(&principal.email, name, surname));
        }
    }

    let catalogue_id = provider
        .catalogue_id
        .clone()
        .filter(|c| !c.trim().is_empty())
        .unwrap_or_else(|| state.catalogue_id().to_string());
    let local = catalogue_id == state.catalogue_id();
    if local {
        provider.id = ids::provider_id(Some(&provider.abbreviation))?;
    } else {
        ids::validate_external_id(&provider.id)?;
    }
    provider.set_catalogue_id(catalogue_id);

    provider.check()?;
    check_vocabularies(state, &provider).await?;

    let repo = state.repos.providers();
    if repo.exists(&provider.id).await? {
        return Err(CatalogueError::AlreadyExists(format!(
            "Provider with id '{}' already exists!",
            provider.id
        )));
    }

    let mut bundle = Bundle::new(provider);
    bundle.metadata = Some(Metadata::create(&actor(auth), auth.email()));
    if local {
        bundle.status = Some(PROVIDER_STATES.pending.to_string());
        bundle.template_status = Some(template::NONE.to_string());
        bundle.active = false;
    } else {
        bundle.status = Some(PROVIDER_STATES.approved.to_string());
        bundle.template_status = Some(template::APPROVED.to_string());
        bundle.active = true;
    }
    bundle.log(entry(auth, LoggingType::Onboard, ActionType::Registered, None));

    repo.add(&bundle).await?;
    if !local {
        refresh_public_copy(state, &bundle).await?;
    }

    tracing::info!(id = %bundle.id, local, "Provider registered");
    state.mailer.provider_onboarding(&bundle).await;

    Ok(bundle)
}
