//! In-process store, used by tests and `CATALOGUE_STORE=memory`

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;

use super::{ResourceStore, StoreError, StoreResult, StoredResource};
use crate::search::{Facet, FacetFilter, Paging, SortOrder};

#[derive(Debug, Default)]
pub struct MemoryResourceStore {
    partitions: RwLock<HashMap<String, BTreeMap<String, StoredResource>>>,
}

impl MemoryResourceStore {
    pub fn new() -> Self {
        Self::default()
    }
}

pub(crate) fn matches(resource: &StoredResource, filter: &FacetFilter) -> bool {
    let keywords = filter.keywords();
    if !keywords.is_empty()
        && !keywords
            .iter()
            .any(|k| resource.searchable.contains(&k.to_lowercase()))
    {
        return false;
    }

    filter.filters.iter().all(|(field, wanted)| {
        wanted.is_empty()
            || resource
                .fields
                .get(field)
                .is_some_and(|values| values.iter().any(|v| wanted.contains(v)))
    })
}

fn first_value<'a>(resource: &'a StoredResource, field: &str) -> Option<&'a str> {
    resource
        .fields
        .get(field)
        .and_then(|values| values.first())
        .map(String::as_str)
}

fn compare(a: &StoredResource, b: &StoredResource, filter: &FacetFilter) -> Ordering {
    let by_field = match &filter.order_by {
        Some(order_by) => {
            let (x, y) = (first_value(a, &order_by.field), first_value(b, &order_by.field));
            // Missing values sort last in both directions.
            match (x, y) {
                (Some(x), Some(y)) => {
                    let ord = x.to_lowercase().cmp(&y.to_lowercase());
                    match order_by.order {
                        SortOrder::Asc => ord,
                        SortOrder::Desc => ord.reverse(),
                    }
                },
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            }
        },
        None => Ordering::Equal,
    };
    by_field.then_with(|| a.id.cmp(&b.id))
}

pub(crate) fn facets(matched: &[&StoredResource], browse_by: &[String]) -> Vec<Facet> {
    browse_by
        .iter()
        .map(|field| {
            let mut counts: BTreeMap<String, usize> = BTreeMap::new();
            for resource in matched {
                if let Some(values) = resource.fields.get(field) {
                    for value in values {
                        *counts.entry(value.clone()).or_default() += 1;
                    }
                }
            }
            Facet::new(field, counts)
        })
        .collect()
}

#[async_trait]
impl ResourceStore for MemoryResourceStore {
    async fn insert(&self, resource: StoredResource) -> StoreResult<()> {
        let mut partitions = self.partitions.write().await;
        let partition = partitions.entry(resource.resource_type.clone()).or_default();
        if partition.contains_key(&resource.id) {
            return Err(StoreError::already_exists(&resource.resource_type, &resource.id));
        }
        partition.insert(resource.id.clone(), resource);
        Ok(())
    }

    async fn update(&self, resource: StoredResource) -> StoreResult<()> {
        let mut partitions = self.partitions.write().await;
        match partitions
            .get_mut(&resource.resource_type)
            .and_then(|p| p.get_mut(&resource.id))
        {
            Some(existing) => {
                *existing = resource;
                Ok(())
            },
            None => Err(StoreError::not_found(&resource.resource_type, &resource.id)),
        }
    }

    async fn get(&self, resource_type: &str, id: &str) -> StoreResult<Option<Value>> {
        let partitions = self.partitions.read().await;
        Ok(partitions
            .get(resource_type)
            .and_then(|p| p.get(id))
            .map(|r| r.payload.clone()))
    }

    async fn delete(&self, resource_type: &str, id: &str) -> StoreResult<()> {
        let mut partitions = self.partitions.write().await;
        partitions
            .get_mut(resource_type)
            .and_then(|p| p.remove(id))
            .map(|_| ())
            .ok_or_else(|| StoreError::not_found(resource_type, id))
    }

    async fn search(&self, resource_type: &str, filter: &FacetFilter) -> StoreResult<Paging<Value>> {
        let partitions = self.partitions.read().await;
        let Some(partition) = partitions.get(resource_type) else {
            return Ok(Paging::new(0, filter.from, Vec::new(), facets(&[], &filter.browse_by)));
        };

        let mut matched: Vec<&StoredResource> =
            partition.values().filter(|r| matches(r, filter)).collect();
        matched.sort_by(|a, b| compare(a, b, filter));

        let results = matched
            .iter()
            .skip(filter.from)
            .take(filter.quantity)
            .map(|r| r.payload.clone())
            .collect();

        Ok(Paging::new(
            matched.len(),
            filter.from,
            results,
            facets(&matched, &filter.browse_by),
        ))
    }

    async fn count(&self, resource_type: &str) -> StoreResult<usize> {
        let partitions = self.partitions.read().await;
        Ok(partitions.get(resource_type).map_or(0, BTreeMap::len))
    }

    async fn delete_all(&self, resource_type: &str) -> StoreResult<u64> {
        let mut partitions = self.partitions.write().await;
        Ok(partitions
            .remove(resource_type)
            .map_or(0, |p| p.len() as u64))
    }
}
