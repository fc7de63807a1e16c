//! Where audit entries are kept

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::debug;

use super::models::{AuditEntry, AuditQuery, CreateAuditEntry};

#[derive(Error, Debug)]
pub enum AuditError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

#[async_trait]
pub trait AuditStore: Send + Sync {
    async fn record(&self, entry: CreateAuditEntry) -> Result<AuditEntry, AuditError>;

    /// Newest first
    async fn query(&self, query: &AuditQuery) -> Result<Vec<AuditEntry>, AuditError>;
}

/// `audit_logs` table
#[derive(Clone)]
pub struct PgAuditStore {
    pool: PgPool,
}

impl PgAuditStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const AUDIT_COLUMNS: &str = "id, user_email, action, resource_type, resource_id, \
     changes, ip_address, user_agent, timestamp, metadata";

fn select_query(query: &AuditQuery) -> QueryBuilder<'_, Postgres> {
    let mut qb = QueryBuilder::new(format!("SELECT {} FROM audit_logs WHERE 1=1", AUDIT_COLUMNS));

    if let Some(user_email) = &query.user_email {
        qb.push(" AND user_email = ").push_bind(user_email.as_str());
    }
    if let Some(action) = query.action {
        qb.push(" AND action = ").push_bind(action.as_str());
    }
    if let Some(resource_type) = query.resource_type {
        qb.push(" AND resource_type = ").push_bind(resource_type.as_str());
    }
    if let Some(resource_id) = &query.resource_id {
        qb.push(" AND resource_id = ").push_bind(resource_id.as_str());
    }
    if let Some(start_time) = query.start_time {
        qb.push(" AND timestamp >= ").push_bind(start_time);
    }
    if let Some(end_time) = query.end_time {
        qb.push(" AND timestamp <= ").push_bind(end_time);
    }

    qb.push(" ORDER BY timestamp DESC LIMIT ")
        .push_bind(query.effective_limit())
        .push(" OFFSET ")
        .push_bind(query.effective_offset());
    qb
}

#[async_trait]
impl AuditStore for PgAuditStore {
    async fn record(&self, entry: CreateAuditEntry) -> Result<AuditEntry, AuditError> {
        let entry = entry.into_entry();
        let record = sqlx::query_as::<_, AuditEntry>(&format!(
            r#"
            INSERT INTO audit_logs (
                id, user_email, action, resource_type, resource_id,
                changes, ip_address, user_agent, timestamp, metadata
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING {}
            "#,
            AUDIT_COLUMNS
        ))
        .bind(entry.id)
        .bind(&entry.user_email)
        .bind(&entry.action)
        .bind(&entry.resource_type)
        .bind(&entry.resource_id)
        .bind(&entry.changes)
        .bind(&entry.ip_address)
        .bind(&entry.user_agent)
        .bind(entry.timestamp)
        .bind(&entry.metadata)
        .fetch_one(&self.pool)
        .await?;

        debug!(
            audit_id = %record.id,
            action = %record.action,
            resource_type = %record.resource_type,
            "Created audit log entry"
        );

        Ok(record)
    }

    async fn query(&self, query: &AuditQuery) -> Result<Vec<AuditEntry>, AuditError> {
        let records = select_query(query)
            .build_query_as::<AuditEntry>()
            .fetch_all(&self.pool)
            .await?;

        debug!(count = records.len(), "Queried audit logs");

        Ok(records)
    }
}

/// Keeps entries in memory
#[derive(Debug, Default)]
pub struct MemoryAuditStore {
    entries: RwLock<Vec<AuditEntry>>,
}

impl MemoryAuditStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[async_trait]
impl AuditStore for MemoryAuditStore {
    async fn record(&self, entry: CreateAuditEntry) -> Result<AuditEntry, AuditError> {
        let entry = entry.into_entry();
        self.entries.write().await.push(entry.clone());
        Ok(entry)
    }

    async fn query(&self, query: &AuditQuery) -> Result<Vec<AuditEntry>, AuditError> {
        let entries = self.entries.read().await;
        Ok(entries
            .iter()
            .rev()
            .filter(|entry| query.matches(entry))
            .skip(query.effective_offset() as usize)
            .take(query.effective_limit() as usize)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::models::{AuditAction, ResourceType};
    use sqlx::Execute;

    fn entry(action: AuditAction, id: &str) -> CreateAuditEntry {
        CreateAuditEntry::builder()
            .action(action)
            .resource_type(ResourceType::Provider)
            .resource_id(Some(id.to_string()))
            .try_build()
            .unwrap()
    }

    #[tokio::test]
    async fn test_memory_store_newest_first_with_paging() {
        let store = MemoryAuditStore::new();
        store.record(entry(AuditAction::Create, "a")).await.unwrap();
        store.record(entry(AuditAction::Update, "a")).await.unwrap();
        store.record(entry(AuditAction::Delete, "b")).await.unwrap();

        let all = store.query(&AuditQuery::default()).await.unwrap();
        assert_eq!(all.len(), 3);
        assert_eq!(all[0].action, "delete");

        let page = store
            .query(&AuditQuery {
                resource_id: Some("a".into()),
                limit: 1,
                offset: 1,
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(page.len(), 1);
        assert_eq!(page[0].action, "create");
    }

    #[test]
    fn test_select_query_binds_filters_in_order() {
        let query = AuditQuery {
            user_email: Some("jane@example.org".into()),
            action: Some(AuditAction::Verify),
            ..Default::default()
        };
        let mut qb = select_query(&query);
        let sql = qb.build().sql().to_string();
        assert!(sql.contains("user_email = $1"));
        assert!(sql.contains("action = $2"));
        assert!(sql.ends_with("LIMIT $3 OFFSET $4"));
    }
}
