//! Controlled vocabularies
//!
//! Every coded field of a provider or resource points at a vocabulary entry.
//! The state vocabularies are seeded on startup, the rest are loaded by
//! administrators.

pub mod commands;
pub mod queries;
pub mod routes;

pub use routes::vocabularies_routes;
