//! Resource interoperability records: the interoperability records a
//! service or training resource complies with
//!
//! A resource has at most one link, identified as
//! `{resourceId}.interoperability`. Links skip onboarding: they are active
//! and published as soon as they are stored, and they follow their
//! resource's suspension and deletion.

pub mod commands;
pub mod queries;
pub mod routes;

pub use routes::resource_interoperability_records_routes;
