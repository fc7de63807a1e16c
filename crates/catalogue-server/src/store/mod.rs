//! Resource storage
//!
//! Everything the catalogue keeps is a JSON document partitioned by resource
//! type, plus a flat map of indexed fields used for filtering, ordering and
//! facets. [`ResourceStore`] is the dynamic backend, [`Repository`] the typed
//! view handlers work with.

pub mod memory;
pub mod postgres;
pub mod repository;

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::search::{FacetFilter, Paging};

pub use memory::MemoryResourceStore;
pub use postgres::PgResourceStore;
pub use repository::{Repositories, Repository};

/// Indexed field name to its values
pub type IndexFields = BTreeMap<String, Vec<String>>;

/// A document the store can index
pub trait Indexed: Serialize + DeserializeOwned + Send + Sync {
    /// Partition key, e.g. "provider"
    const RESOURCE_TYPE: &'static str;
    /// Used in error messages, e.g. "Provider"
    const DISPLAY_NAME: &'static str;

    fn resource_id(&self) -> &str;
    fn index_fields(&self) -> IndexFields;
    /// Lowercased free text for keyword search
    fn searchable_text(&self) -> String;
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{resource_type} with id '{id}' does not exist!")]
    NotFound { resource_type: String, id: String },

    #[error("{resource_type} with id '{id}' already exists!")]
    AlreadyExists { resource_type: String, id: String },

    #[error("Serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Database query failed: {0}")]
    Database(#[from] sqlx::Error),
}

impl StoreError {
    pub fn not_found(resource_type: &str, id: &str) -> Self {
        Self::NotFound {
            resource_type: resource_type.to_string(),
            id: id.to_string(),
        }
    }

    pub fn already_exists(resource_type: &str, id: &str) -> Self {
        Self::AlreadyExists {
            resource_type: resource_type.to_string(),
            id: id.to_string(),
        }
    }

    /// Replace the store partition name with a display name
    pub fn named(self, display_name: &str) -> Self {
        match self {
            Self::NotFound { id, .. } => Self::not_found(display_name, &id),
            Self::AlreadyExists { id, .. } => Self::already_exists(display_name, &id),
            other => other,
        }
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

/// The row a backend stores
#[derive(Debug, Clone, PartialEq)]
pub struct StoredResource {
    pub resource_type: String,
    pub id: String,
    pub payload: Value,
    pub fields: IndexFields,
    pub searchable: String,
}

impl StoredResource {
    pub fn from_indexed<T: Indexed>(resource: &T) -> StoreResult<Self> {
        Ok(Self {
            resource_type: T::RESOURCE_TYPE.to_string(),
            id: resource.resource_id().to_string(),
            payload: serde_json::to_value(resource)?,
            fields: resource.index_fields(),
            searchable: resource.searchable_text(),
        })
    }
}

#[async_trait]
pub trait ResourceStore: Send + Sync {
    /// Fails with `AlreadyExists` when the id is taken
    async fn insert(&self, resource: StoredResource) -> StoreResult<()>;

    /// Fails with `NotFound` when the id is unknown
    async fn update(&self, resource: StoredResource) -> StoreResult<()>;

    async fn get(&self, resource_type: &str, id: &str) -> StoreResult<Option<Value>>;

    /// Fails with `NotFound` when the id is unknown
    async fn delete(&self, resource_type: &str, id: &str) -> StoreResult<()>;

    /// Filtered, ordered page plus facets for `filter.browse_by`
    async fn search(&self, resource_type: &str, filter: &FacetFilter) -> StoreResult<Paging<Value>>;

    async fn count(&self, resource_type: &str) -> StoreResult<usize>;

    /// Returns the number of removed rows
    async fn delete_all(&self, resource_type: &str) -> StoreResult<u64>;

    async fn health_check(&self) -> StoreResult<()> {
        Ok(())
    }
}
