//! Providers: registration, onboarding and lifecycle of the organisations
//! that offer resources in the catalogue

pub mod commands;
pub mod queries;
pub mod routes;

pub use routes::providers_routes;
