//! PostgreSQL backend: one JSONB table for every resource type
//!
//! Indexed fields live in the `fields` column as `{"name": ["value", ...]}`
//! so filters become `fields -> 'name' ?| ARRAY[...]` and facets a
//! `jsonb_array_elements_text` group-by.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use sqlx::postgres::{PgPool, PgPoolOptions};
use sqlx::types::Json;
use sqlx::{Postgres, QueryBuilder, Row};
use tracing::debug;

use super::{ResourceStore, StoreError, StoreResult, StoredResource};
use crate::config::DatabaseConfig;
use crate::search::{Facet, FacetFilter, Paging, SortOrder};

pub async fn create_pool(config: &DatabaseConfig) -> StoreResult<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(Duration::from_secs(config.connect_timeout_secs))
        .idle_timeout(Duration::from_secs(config.idle_timeout_secs))
        .connect(&config.url)
        .await?;

    tracing::info!(
        max_connections = config.max_connections,
        min_connections = config.min_connections,
        "Database connection pool created"
    );

    Ok(pool)
}

#[derive(Debug, Clone)]
pub struct PgResourceStore {
    pool: PgPool,
}

impl PgResourceStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

/// `WHERE` clause shared by the page, count and facet queries
fn push_conditions<'a>(
    builder: &mut QueryBuilder<'a, Postgres>,
    resource_type: &'a str,
    filter: &'a FacetFilter,
) {
    builder.push(" WHERE resource_type = ").push_bind(resource_type);

    let keywords = filter.keywords();
    if !keywords.is_empty() {
        builder.push(" AND (");
        for (i, keyword) in keywords.iter().enumerate() {
            if i > 0 {
                builder.push(" OR ");
            }
            builder
                .push("searchable ILIKE ")
                .push_bind(format!("%{}%", keyword.to_lowercase()));
        }
        builder.push(")");
    }

    for (field, values) in &filter.filters {
        if values.is_empty() {
            continue;
        }
        builder
            .push(" AND fields -> ")
            .push_bind(field.as_str())
            .push(" ?| ")
            .push_bind(values.as_slice());
    }
}

#[async_trait]
impl ResourceStore for PgResourceStore {
    async fn insert(&self, resource: StoredResource) -> StoreResult<()> {
        let result = sqlx::query(
            r#"
            INSERT INTO resources (resource_type, id, payload, fields, searchable)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (resource_type, id) DO NOTHING
            "#,
        )
        .bind(&resource.resource_type)
        .bind(&resource.id)
        .bind(&resource.payload)
        .bind(Json(&resource.fields))
        .bind(&resource.searchable)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::already_exists(&resource.resource_type, &resource.id));
        }
        Ok(())
    }

    async fn update(&self, resource: StoredResource) -> StoreResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE resources
            SET payload = $3, fields = $4, searchable = $5, updated_at = NOW()
            WHERE resource_type = $1 AND id = $2
            "#,
        )
        .bind(&resource.resource_type)
        .bind(&resource.id)
        .bind(&resource.payload)
        .bind(Json(&resource.fields))
        .bind(&resource.searchable)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::not_found(&resource.resource_type, &resource.id));
        }
        Ok(())
    }

    async fn get(&self, resource_type: &str, id: &str) -> StoreResult<Option<Value>> {
        let row = sqlx::query("SELECT payload FROM resources WHERE resource_type = $1 AND id = $2")
            .bind(resource_type)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(|r| r.try_get::<Value, _>("payload")).transpose()?)
    }

    async fn delete(&self, resource_type: &str, id: &str) -> StoreResult<()> {
        let result = sqlx::query("DELETE FROM resources WHERE resource_type = $1 AND id = $2")
            .bind(resource_type)
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::not_found(resource_type, id));
        }
        Ok(())
    }

    async fn search(&self, resource_type: &str, filter: &FacetFilter) -> StoreResult<Paging<Value>> {
        let mut count_query = QueryBuilder::new("SELECT COUNT(*) FROM resources");
        push_conditions(&mut count_query, resource_type, filter);
        let total: i64 = count_query.build_query_scalar().fetch_one(&self.pool).await?;

        let mut page_query = QueryBuilder::new("SELECT payload FROM resources");
        push_conditions(&mut page_query, resource_type, filter);
        page_query.push(" ORDER BY ");
        if let Some(order_by) = &filter.order_by {
            page_query
                .push("LOWER(fields -> ")
                .push_bind(order_by.field.as_str())
                .push(" ->> 0) ")
                .push(match order_by.order {
                    SortOrder::Asc => "ASC",
                    SortOrder::Desc => "DESC",
                })
                .push(" NULLS LAST, ");
        }
        page_query
            .push("id ASC LIMIT ")
            .push_bind(filter.quantity as i64)
            .push(" OFFSET ")
            .push_bind(filter.from as i64);

        let results: Vec<Value> = page_query
            .build_query_scalar()
            .fetch_all(&self.pool)
            .await?;

        let mut facets = Vec::with_capacity(filter.browse_by.len());
        for field in &filter.browse_by {
            let mut facet_query = QueryBuilder::new(
                "SELECT value, COUNT(*) AS count FROM resources, jsonb_array_elements_text(fields -> ",
            );
            facet_query.push_bind(field.as_str()).push(") AS value");
            push_conditions(&mut facet_query, resource_type, filter);
            facet_query.push(" GROUP BY value");

            let rows = facet_query.build().fetch_all(&self.pool).await?;
            let counts = rows
                .iter()
                .map(|row| {
                    let value: String = row.try_get("value")?;
                    let count: i64 = row.try_get("count")?;
                    Ok((value, count as usize))
                })
                .collect::<Result<Vec<_>, sqlx::Error>>()?;
            facets.push(Facet::new(field, counts));
        }

        debug!(resource_type, total, query = %filter.to_query(), "Searched resources");

        Ok(Paging::new(total as usize, filter.from, results, facets))
    }

    async fn count(&self, resource_type: &str) -> StoreResult<usize> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM resources WHERE resource_type = $1")
            .bind(resource_type)
            .fetch_one(&self.pool)
            .await?;
        Ok(total as usize)
    }

    async fn delete_all(&self, resource_type: &str) -> StoreResult<u64> {
        let result = sqlx::query("DELETE FROM resources WHERE resource_type = $1")
            .bind(resource_type)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    async fn health_check(&self) -> StoreResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::IndexFields;
    use serde_json::json;

    fn resource(id: &str, status: &str) -> StoredResource {
        let mut fields = IndexFields::new();
        fields.insert("status".into(), vec![status.to_string()]);
        fields.insert("name".into(), vec![id.to_uppercase()]);
        StoredResource {
            resource_type: "provider".into(),
            id: id.into(),
            payload: json!({ "id": id }),
            fields,
            searchable: id.to_string(),
        }
    }

    #[test]
    fn test_conditions_sql() {
        let mut filter = FacetFilter::default().with_filter("status", "approved provider");
        filter.keyword = Some("graph data".into());
        let mut builder = QueryBuilder::new("SELECT COUNT(*) FROM resources");
        push_conditions(&mut builder, "provider", &filter);
        assert_eq!(
            builder.sql(),
            "SELECT COUNT(*) FROM resources WHERE resource_type = $1 AND (searchable ILIKE $2 OR searchable ILIKE $3) AND fields -> $4 ?| $5"
        );
    }

    #[sqlx::test(migrations = "../../migrations")]
    #[ignore = "requires PostgreSQL"]
    async fn test_round_trip_and_search(pool: PgPool) -> StoreResult<()> {
        let store = PgResourceStore::new(pool);
        store.insert(resource("athena", "approved")).await?;
        store.insert(resource("cnr", "pending")).await?;
        assert!(matches!(
            store.insert(resource("cnr", "pending")).await,
            Err(StoreError::AlreadyExists { .. })
        ));

        let mut filter = FacetFilter::default().with_filter("status", "approved");
        filter.browse_by = vec!["status".into()];
        let page = store.search("provider", &filter).await?;
        assert_eq!(page.total, 1);
        assert_eq!(page.results[0]["id"], "athena");
        assert_eq!(page.facets[0].values[0].count, 1);

        store.delete("provider", "cnr").await?;
        assert_eq!(store.count("provider").await?, 1);
        Ok(())
    }
}
