//! Datasources: the datasource extension of a service
//!
//! A service has at most one datasource, identified as
//! `{serviceId}.datasource`. It follows its service's activation,
//! suspension and deletion.

pub mod commands;
pub mod queries;
pub mod routes;

pub use routes::datasources_routes;
