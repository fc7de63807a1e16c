//! Feature slices of the catalogue API
//!
//! Each slice is organised the same way:
//! - `commands/` - state changing operations (add, update, verify, ...)
//! - `queries/` - read operations (get, list, ...)
//! - `routes.rs` - the HTTP handlers
//!
//! Commands and queries are plain structs marked with the `mediator`
//! `Request` trait and executed by a `handle` function taking the
//! [`AppState`](crate::api::AppState) and the caller's
//! [`Authentication`](crate::security::Authentication).
//!
//! # Slices
//!
//! - **providers**: provider onboarding, verification, activation and audits
//! - **resources**: services, training resources and interoperability records,
//!   one generic implementation over [`ProviderResource`](crate::domain::ProviderResource)
//! - **datasources**: the datasource extension of a service
//! - **resource_interoperability_records**: which interoperability records a
//!   service or training resource complies with
//! - **vocabularies**: controlled vocabularies and the state vocabulary seed
//! - **public**: the published copies
//! - **stats**: visit counts from Matomo

pub mod datasources;
pub mod providers;
pub mod public;
pub mod resource_interoperability_records;
pub mod resources;
pub mod shared;
pub mod stats;
pub mod vocabularies;

use axum::Router;

use crate::api::AppState;
use crate::config::Config;
use crate::domain::{InteroperabilityRecord, Service, TrainingResource};
use crate::middleware::rate_limit;

/// Mounts every slice:
/// - `/providers`
/// - `/services`, `/training-resources`, `/interoperability-records`
/// - `/datasources`
/// - `/resource-interoperability-records`
/// - `/vocabularies`
/// - `/public`, rate limited
/// - `/stats`
pub fn router(config: &Config) -> Router<AppState> {
    Router::new()
        .nest("/providers", providers::routes::providers_routes())
        .nest("/services", resources::routes::resource_routes::<Service>())
        .nest(
            "/training-resources",
            resources::routes::resource_routes::<TrainingResource>(),
        )
        .nest(
            "/interoperability-records",
            resources::routes::resource_routes::<InteroperabilityRecord>(),
        )
        .nest("/datasources", datasources::routes::datasources_routes())
        .nest(
            "/resource-interoperability-records",
            resource_interoperability_records::routes::resource_interoperability_records_routes(),
        )
        .nest("/vocabularies", vocabularies::routes::vocabularies_routes())
        .nest(
            "/public",
            rate_limit::apply(public::routes::public_routes(), &config.rate_limit),
        )
        .nest("/stats", stats::routes::stats_routes())
}
