//! Published copies
//!
//! Approving a provider or resource copies it into the catalogue under its
//! public id; these routes serve those copies. Writing to them goes through
//! the source bundle.

pub mod queries;
pub mod routes;

pub use routes::public_routes;
