//! Payloads owned by a provider
//!
//! Services, training resources and interoperability records share one
//! lifecycle: they hang off an approved provider, get a derived id and are
//! published as a copy. [`ProviderResource`] is the seam the generic
//! `features::resources` handlers are written against.

use super::bundle::ResourcePayload;
use crate::ids::IdError;

pub trait ProviderResource: ResourcePayload {
    /// URL segment under `/api/v1`
    const PATH: &'static str;
    /// The first resource of a provider is its template
    const USES_TEMPLATE: bool;
    /// Deleting or activating cascades to a datasource
    const HAS_DATASOURCE: bool;
    /// Deleting or suspending cascades to its interoperability record link
    const LINKS_RECORDS: bool;
    /// Indexed field holding the owning provider
    const PROVIDER_FIELD: &'static str;

    /// Id of the owning provider
    fn provider_id(&self) -> Option<&str>;

    fn generate_id(&self) -> Result<String, IdError>;

    fn version(&self) -> Option<&str> {
        None
    }

    /// Treat an empty version as no version
    fn normalize_version(&mut self) {}

    /// Stamp creation timestamps, `now` in epoch millis
    fn on_create(&mut self, _now: &str) {}

    /// Carry over what the submitter cannot change
    fn on_update(&mut self, _existing: &Self, _now: &str) {}
}

/// Public id of every entry in `ids`, leaving already public ones alone
pub(crate) fn public_refs(ids: &mut [String], catalogue_id: &str) {
    for id in ids.iter_mut() {
        public_ref(id, catalogue_id);
    }
}

pub(crate) fn public_ref(id: &mut String, catalogue_id: &str) {
    let prefix = format!("{}.", catalogue_id);
    if !id.is_empty() && !id.starts_with(&prefix) {
        *id = crate::ids::public_id(id, catalogue_id);
    }
}
