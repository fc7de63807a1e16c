use crate::api::AppState;
use crate::domain::{Bundle, ResourcePayload};
use crate::error::CatalogueResult;
use crate::security::Authentication;

/// Strip a public copy unless `auth` administers what it was copied from
///
/// Public copies carry public ids, so ownership is resolved through
/// `identifiers.original_id`. A provider copy has no owning provider and is
/// checked against its own original id.
pub(crate) async fn reveal_public<T: ResourcePayload>(
    state: &AppState,
    auth: &Authentication,
    mut bundle: Bundle<T>,
) -> CatalogueResult<Bundle<T>> {
    if auth.is_admin_or_epot() {
        return Ok(bundle);
    }
    let allowed = match bundle.identifiers.original_id.as_deref() {
        Some(original_id) if auth.is_authenticated() => {
            let provider_id = state
                .security
                .owning_provider(original_id)
                .await?
                .unwrap_or_else(|| original_id.to_string());
            state.security.has_admin_access(auth, &provider_id).await?
        }
        _ => false,
    };
    if !allowed {
        bundle.strip_sensitive();
    }
    Ok(bundle)
}
