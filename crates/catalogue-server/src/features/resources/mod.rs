//! Services, training resources and interoperability records
//!
//! The three kinds share their lifecycle, so the commands, queries and routes
//! here are written once against [`ProviderResource`](crate::domain::ProviderResource)
//! and mounted per kind.

pub mod commands;
pub mod queries;
pub mod routes;

pub use routes::resource_routes;
