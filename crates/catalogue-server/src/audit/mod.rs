//! Audit trail of write requests
//!
//! Every successful POST, PUT, PATCH or DELETE against the API is recorded by
//! [`AuditLayer`] in an [`AuditStore`]. Reads are not audited.
//!
//! ```no_run
//! use std::sync::Arc;
//! use axum::Router;
//! use catalogue_server::audit::{AuditLayer, MemoryAuditStore};
//!
//! let app: Router = Router::new().layer(AuditLayer::new(Arc::new(MemoryAuditStore::new())));
//! ```
//!
//! Portal administrators query the trail through `GET /api/v1/audit`.

mod middleware;
mod models;
mod routes;
mod store;

pub use middleware::{AuditLayer, MAX_AUDITED_BODY};
pub use models::{
    AuditAction, AuditEntry, AuditEntryBuilder, AuditQuery, CreateAuditEntry, ResourceType,
    DEFAULT_AUDIT_QUERY_LIMIT, MAX_AUDIT_QUERY_LIMIT,
};
pub use routes::routes;
pub use store::{AuditError, AuditStore, MemoryAuditStore, PgAuditStore};
