//! Template status bookkeeping
//!
//! A provider's first service or training resource is its template. Verifying
//! that resource moves the provider's template status along, on behalf of the
//! system and without a history entry.

use crate::api::AppState;
use crate::domain::{Metadata, ProviderBundle};
use crate::error::CatalogueResult;
use crate::features::shared::refresh_public_copy;

/// Store `template_status` on `provider` and notify the onboarding team and
/// the provider administrators
#[tracing::instrument(skip(state, provider), fields(id = %provider.id))]
pub(crate) async fn set_template_status(
    state: &AppState,
    provider: &mut ProviderBundle,
    template_status: &str,
) -> CatalogueResult<()> {
    provider.template_status = Some(template_status.to_string());
    provider.metadata = Some(Metadata::update(provider.metadata.as_ref(), "system", None));
    state.repos.providers().update(provider).await?;
    refresh_public_copy(state, provider).await?;
    tracing::info!(template_status, "Provider template status changed");

    state.mailer.template_onboarding(provider).await;
    Ok(())
}
