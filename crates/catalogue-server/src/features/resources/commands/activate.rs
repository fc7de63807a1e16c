//! Activate or deactivate a resource

use std::marker::PhantomData;

use mediator::Request;
use serde::{Deserialize, Serialize};

use crate::api::AppState;
use crate::domain::{ActionType, Bundle, LoggingType, Metadata, ProviderResource};
use crate::error::{CatalogueError, CatalogueResult};
use crate::features::datasources::commands::cascade as datasources;
use crate::features::shared::{actor, ensure_not_published, entry, refresh_public_copy};
use crate::search::FacetFilter;
use crate::security::Authentication;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivateResourceCommand<T> {
    pub id: String,
    pub active: bool,
    #[serde(skip)]
    _kind: PhantomData<fn() -> T>,
}

impl<T> ActivateResourceCommand<T> {
    pub fn new(id: &str, active: bool) -> Self {
        Self {
            id: id.to_string(),
            active,
            _kind: PhantomData,
        }
    }
}

impl<T: ProviderResource> Request<CatalogueResult<Bundle<T>>> for ActivateResourceCommand<T> {}

fn action_for(active: bool) -> ActionType {
    if active {
        ActionType::Activated
    } else {
        ActionType::Deactivated
    }
}

#[tracing::instrument(skip(state, auth, command), fields(kind = T::DISPLAY_NAME, id = %command.id, caller = auth.email()))]
pub async fn handle<T: ProviderResource>(
    state: &AppState,
    auth: &Authentication,
    command: ActivateResourceCommand<T>,
) -> CatalogueResult<Bundle<T>> {
    let repo = state.repos.of::<Bundle<T>>();
    let mut bundle = repo.get_required(&command.id).await?;
    state.security.require_resource_admin(auth, &bundle.id).await?;
    ensure_not_published(&bundle, "publish")?;

    let status = bundle.status();
    if (T::STATES.is_pending(status) || T::STATES.is_rejected(status)) && !bundle.active {
        return Err(CatalogueError::validation(format!(
            "You cannot activate this {}, because it's Inactive with status = [{}]",
            T::DISPLAY_NAME,
            status.unwrap_or_default()
        )));
    }
    if command.active {
        let provider_active = match bundle.payload.provider_id() {
            Some(provider_id) => state
                .repos
                .providers()
                .get(provider_id)
                .await?
                .is_some_and(|p| p.active && p.is_approved()),
            None => false,
        };
        if !provider_active {
            return Err(CatalogueError::conflict(format!(
                "{} '{}' does not have active Providers",
                T::DISPLAY_NAME,
                bundle.id
            )));
        }
    }

    bundle.active = command.active;
    bundle.log(entry(auth, LoggingType::Update, action_for(command.active), None));
    bundle.metadata = Some(Metadata::update(bundle.metadata.as_ref(), &actor(auth), None));
    repo.update(&bundle).await?;
    tracing::info!(active = bundle.active, "Resource activation changed");

    if T::HAS_DATASOURCE {
        datasources::activate_for_service(state, &bundle.id, command.active).await?;
    }
    refresh_public_copy(state, &bundle).await?;
    Ok(bundle)
}

/// Follow a provider's activation: every approved resource of the provider
/// takes the provider's `active` flag, logged on behalf of the system
///
/// Returns the number of resources changed.
#[tracing::instrument(skip(state), fields(kind = T::DISPLAY_NAME))]
pub async fn cascade<T: ProviderResource>(
    state: &AppState,
    provider_id: &str,
    active: bool,
) -> CatalogueResult<usize> {
    let repo = state.repos.of::<Bundle<T>>();
    let filter = FacetFilter::all()
        .with_filter(T::PROVIDER_FIELD, provider_id)
        .with_filter("status", T::STATES.approved)
        .with_filter("published", "false");

    let mut changed = 0;
    for mut bundle in repo.all(&filter).await? {
        if bundle.active == active {
            continue;
        }
        bundle.active = active;
        bundle.log(entry(&Authentication::System, LoggingType::Update, action_for(active), None));
        bundle.metadata = Some(Metadata::update(bundle.metadata.as_ref(), "system", None));
        repo.update(&bundle).await?;
        if T::HAS_DATASOURCE {
            datasources::activate_for_service(state, &bundle.id, active).await?;
        }
        refresh_public_copy(state, &bundle).await?;
        changed += 1;
    }
    Ok(changed)
}
