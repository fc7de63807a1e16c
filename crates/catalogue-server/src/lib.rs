//! Resource catalogue server library
//!
//! HTTP registry of research infrastructure metadata: providers and the
//! services, training resources, datasources and interoperability records
//! they register.
//!
//! # Overview
//!
//! - **Onboarding**: providers register, the portal administrators verify
//!   them, and a provider's first resource (its template) is reviewed before
//!   further resources are approved on registration
//! - **Public views**: approving a bundle publishes a copy under its public id
//! - **Notifications**: onboarding mails plus a scheduled daily digest
//! - **Analytics**: service visit counts polled from Matomo
//!
//! # Architecture
//!
//! Each feature slice under [`features`] splits its operations in two:
//!
//! - **Commands** (write operations) validate, stamp a history entry on the
//!   bundle, store it and keep the public copy in sync. Every mutating HTTP
//!   call is also written to the audit trail by [`audit::AuditLayer`].
//! - **Queries** (read operations) apply the caller's visibility rules and
//!   strip contact details for outsiders.
//!
//! Bundles live in a [`store::ResourceStore`], PostgreSQL in production and an
//! in-memory map for tests.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use catalogue_server::{api, audit::MemoryAuditStore, config::Config, mail::LogTransport, store::MemoryResourceStore};
//! use tokio_util::sync::CancellationToken;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load()?;
//!     let state = api::AppState::new(
//!         config,
//!         Arc::new(MemoryResourceStore::new()),
//!         Arc::new(LogTransport),
//!         Arc::new(MemoryAuditStore::new()),
//!     )?;
//!     api::serve(state, CancellationToken::new()).await
//! }
//! ```

pub mod analytics;
pub mod api;
pub mod audit;
pub mod config;
pub mod domain;
pub mod error;
pub mod features;
pub mod ids;
pub mod mail;
pub mod middleware;
pub mod search;
pub mod security;
pub mod store;

pub use error::{CatalogueError, CatalogueResult};
