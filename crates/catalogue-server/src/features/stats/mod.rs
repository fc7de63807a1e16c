//! Visit statistics from Matomo

pub mod queries;
pub mod routes;

pub use routes::stats_routes;
