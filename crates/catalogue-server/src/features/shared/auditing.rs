//! Audits by the onboarding team

use chrono::{DateTime, Months, Utc};
use uuid::Uuid;

use super::history::{entry, ensure_not_published};
use super::params::AuditVerdict;
use super::publication::refresh_public_copy;
use crate::api::AppState;
use crate::domain::{Bundle, LoggingType, ResourcePayload};
use crate::error::CatalogueResult;
use crate::search::FacetFilter;
use crate::security::Authentication;

/// Append an audit entry to `bundle` and store it
pub async fn record_audit<T: ResourcePayload>(
    state: &AppState,
    auth: &Authentication,
    bundle: &mut Bundle<T>,
    verdict: AuditVerdict,
    comment: Option<String>,
) -> CatalogueResult<()> {
    ensure_not_published(bundle, "audit")?;
    bundle.log(entry(auth, LoggingType::Audit, verdict.action_type(), comment));
    state.repos.of::<Bundle<T>>().update(bundle).await?;
    refresh_public_copy(state, bundle).await?;
    tracing::info!(
        id = %bundle.id,
        kind = T::DISPLAY_NAME,
        audit_state = bundle.audit_state.as_str(),
        "Audited"
    );
    Ok(())
}

/// Whether the last audit of `bundle` is missing or older than `cutoff`
pub fn due_for_audit<T: ResourcePayload>(bundle: &Bundle<T>, cutoff: DateTime<Utc>) -> bool {
    match &bundle.latest_audit_info {
        Some(info) => info.timestamp() < cutoff.timestamp_millis(),
        None => true,
    }
}

/// Up to `quantity` random active, approved bundles not audited within
/// `interval_months`
pub async fn random_for_auditing<T: ResourcePayload>(
    state: &AppState,
    quantity: usize,
    interval_months: u32,
) -> CatalogueResult<Vec<Bundle<T>>> {
    let filter = FacetFilter::all()
        .with_filter("active", "true")
        .with_filter("published", "false")
        .with_filter("status", T::STATES.approved);
    let cutoff = Utc::now()
        .checked_sub_months(Months::new(interval_months))
        .unwrap_or(DateTime::<Utc>::MIN_UTC);

    let mut due: Vec<Bundle<T>> = state
        .repos
        .of::<Bundle<T>>()
        .all(&filter)
        .await?
        .into_iter()
        .filter(|bundle| due_for_audit(bundle, cutoff))
        .collect();
    due.sort_by_cached_key(|_| Uuid::new_v4());
    due.truncate(quantity);
    Ok(due)
}
