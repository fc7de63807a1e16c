//! Typed access to one resource type

use std::marker::PhantomData;
use std::sync::Arc;

use serde_json::Value;

use super::{Indexed, ResourceStore, StoreError, StoreResult, StoredResource};
use crate::domain::{
    DatasourceBundle, InteroperabilityRecordBundle, ProviderBundle,
    ResourceInteroperabilityRecordBundle, ServiceBundle, TrainingResourceBundle, Vocabulary,
};
use crate::search::{FacetFilter, Paging, MAX_QUANTITY};

pub struct Repository<T> {
    store: Arc<dyn ResourceStore>,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Clone for Repository<T> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            _marker: PhantomData,
        }
    }
}

impl<T: Indexed> Repository<T> {
    pub fn new(store: Arc<dyn ResourceStore>) -> Self {
        Self {
            store,
            _marker: PhantomData,
        }
    }

    fn decode(value: Value) -> StoreResult<T> {
        Ok(serde_json::from_value(value)?)
    }

    pub async fn get(&self, id: &str) -> StoreResult<Option<T>> {
        self.store
            .get(T::RESOURCE_TYPE, id)
            .await?
            .map(Self::decode)
            .transpose()
    }

    /// Fails with `NotFound` naming the resource kind
    pub async fn get_required(&self, id: &str) -> StoreResult<T> {
        self.get(id)
            .await?
            .ok_or_else(|| StoreError::not_found(T::DISPLAY_NAME, id))
    }

    pub async fn exists(&self, id: &str) -> StoreResult<bool> {
        Ok(self.store.get(T::RESOURCE_TYPE, id).await?.is_some())
    }

    pub async fn add(&self, resource: &T) -> StoreResult<()> {
        self.store
            .insert(StoredResource::from_indexed(resource)?)
            .await
            .map_err(|e| e.named(T::DISPLAY_NAME))
    }

    pub async fn update(&self, resource: &T) -> StoreResult<()> {
        self.store
            .update(StoredResource::from_indexed(resource)?)
            .await
            .map_err(|e| e.named(T::DISPLAY_NAME))
    }

    /// Insert, or replace when the id is taken
    pub async fn upsert(&self, resource: &T) -> StoreResult<()> {
        if self.exists(resource.resource_id()).await? {
            self.update(resource).await
        } else {
            self.add(resource).await
        }
    }

    pub async fn delete(&self, id: &str) -> StoreResult<()> {
        self.store
            .delete(T::RESOURCE_TYPE, id)
            .await
            .map_err(|e| e.named(T::DISPLAY_NAME))
    }

    /// Delete if present, returning whether anything was removed
    pub async fn delete_if_exists(&self, id: &str) -> StoreResult<bool> {
        match self.store.delete(T::RESOURCE_TYPE, id).await {
            Ok(()) => Ok(true),
            Err(StoreError::NotFound { .. }) => Ok(false),
            Err(e) => Err(e),
        }
    }

    pub async fn delete_all(&self) -> StoreResult<u64> {
        self.store.delete_all(T::RESOURCE_TYPE).await
    }

    pub async fn search(&self, filter: &FacetFilter) -> StoreResult<Paging<T>> {
        self.store
            .search(T::RESOURCE_TYPE, filter)
            .await?
            .try_map(Self::decode)
    }

    /// Every match of `filter`, ignoring its paging
    ///
    /// Pages of [`MAX_QUANTITY`] are fetched until the store reports no more.
    pub async fn all(&self, filter: &FacetFilter) -> StoreResult<Vec<T>> {
        let mut page_filter = FacetFilter {
            from: 0,
            quantity: MAX_QUANTITY,
            browse_by: Vec::new(),
            ..filter.clone()
        };
        let mut results = Vec::new();
        loop {
            let page = self.search(&page_filter).await?;
            let fetched = page.results.len();
            results.extend(page.results);
            if fetched == 0 || results.len() >= page.total {
                break;
            }
            page_filter.from += fetched;
        }
        Ok(results)
    }

    pub async fn count(&self) -> StoreResult<usize> {
        self.store.count(T::RESOURCE_TYPE).await
    }
}

/// Typed views over one shared store
#[derive(Clone)]
pub struct Repositories {
    store: Arc<dyn ResourceStore>,
}

impl Repositories {
    pub fn new(store: Arc<dyn ResourceStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<dyn ResourceStore> {
        &self.store
    }

    pub fn of<T: Indexed>(&self) -> Repository<T> {
        Repository::new(Arc::clone(&self.store))
    }

    pub fn providers(&self) -> Repository<ProviderBundle> {
        self.of()
    }

    pub fn services(&self) -> Repository<ServiceBundle> {
        self.of()
    }

    pub fn training_resources(&self) -> Repository<TrainingResourceBundle> {
        self.of()
    }

    pub fn datasources(&self) -> Repository<DatasourceBundle> {
        self.of()
    }

    pub fn interoperability_records(&self) -> Repository<InteroperabilityRecordBundle> {
        self.of()
    }

    pub fn resource_interoperability_records(&self) -> Repository<ResourceInteroperabilityRecordBundle> {
        self.of()
    }

    pub fn vocabularies(&self) -> Repository<Vocabulary> {
        self.of()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryResourceStore;

    fn repository() -> Repository<Vocabulary> {
        Repository::new(Arc::new(MemoryResourceStore::new()))
    }

    #[tokio::test]
    async fn test_typed_round_trip() {
        let repo = repository();
        let vocabulary = Vocabulary::new("country-gr", "Greece", "Country").with_extra("region", "EU");
        repo.add(&vocabulary).await.unwrap();

        assert_eq!(repo.get("country-gr").await.unwrap(), Some(vocabulary.clone()));
        assert!(repo.exists("country-gr").await.unwrap());

        let err = repo.add(&vocabulary).await.unwrap_err();
        assert_eq!(err.to_string(), "Vocabulary with id 'country-gr' already exists!");
    }

    #[tokio::test]
    async fn test_missing_resources_are_named() {
        let repo = repository();
        let err = repo.get_required("nope").await.unwrap_err();
        assert_eq!(err.to_string(), "Vocabulary with id 'nope' does not exist!");

        let err = repo.delete("nope").await.unwrap_err();
        assert_eq!(err.to_string(), "Vocabulary with id 'nope' does not exist!");
        assert!(!repo.delete_if_exists("nope").await.unwrap());
    }

    #[tokio::test]
    async fn test_all_ignores_paging() {
        let repo = repository();
        for i in 0..15 {
            repo.add(&Vocabulary::new(&format!("trl-{}", i), "TRL", "TRL"))
                .await
                .unwrap();
        }
        let filter = FacetFilter::default().with_filter("type", "TRL");
        assert_eq!(repo.search(&filter).await.unwrap().results.len(), 10);
        assert_eq!(repo.all(&filter).await.unwrap().len(), 15);
        assert_eq!(repo.count().await.unwrap(), 15);
    }

    #[tokio::test]
    async fn test_all_reads_past_one_page() {
        let repo = repository();
        let count = MAX_QUANTITY + 5;
        for i in 0..count {
            repo.add(&Vocabulary::new(&format!("bulk-{:05}", i), "Bulk", "Bulk"))
                .await
                .unwrap();
        }
        let filter = FacetFilter::all().with_filter("type", "Bulk");
        let all = repo.all(&filter).await.unwrap();
        assert_eq!(all.len(), count);
        assert_eq!(all.last().unwrap().id, format!("bulk-{:05}", count - 1));
    }

    #[tokio::test]
    async fn test_upsert() {
        let repo = repository();
        let mut vocabulary = Vocabulary::new("trl-1", "TRL 1", "TRL");
        repo.upsert(&vocabulary).await.unwrap();
        vocabulary.name = "TRL one".into();
        repo.upsert(&vocabulary).await.unwrap();
        assert_eq!(repo.get_required("trl-1").await.unwrap().name, "TRL one");
    }
}
