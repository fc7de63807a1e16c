//! Audit data models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use uuid::Uuid;

// ============================================================================
// Audit Query Constants
// ============================================================================

/// Entries returned when no limit is given.
pub const DEFAULT_AUDIT_QUERY_LIMIT: i64 = 100;

/// Upper bound for `limit`.
pub const MAX_AUDIT_QUERY_LIMIT: i64 = 1000;

/// One audited write request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct AuditEntry {
    pub id: Uuid,
    pub user_email: Option<String>,
    pub action: String,
    pub resource_type: String,
    pub resource_id: Option<String>,
    pub changes: Option<JsonValue>,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub timestamp: DateTime<Utc>,
    pub metadata: Option<JsonValue>,
}

/// What a write request did
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuditAction {
    Create,
    Update,
    Delete,
    Verify,
    Publish,
    Suspend,
    Audit,
    Other,
}

impl AuditAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
            Self::Verify => "verify",
            Self::Publish => "publish",
            Self::Suspend => "suspend",
            Self::Audit => "audit",
            Self::Other => "other",
        }
    }
}

impl std::fmt::Display for AuditAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Kind of catalogue entity a request touched
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceType {
    Provider,
    Service,
    TrainingResource,
    Datasource,
    InteroperabilityRecord,
    ResourceInteroperabilityRecord,
    Vocabulary,
    Other,
}

impl ResourceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Provider => "provider",
            Self::Service => "service",
            Self::TrainingResource => "training_resource",
            Self::Datasource => "datasource",
            Self::InteroperabilityRecord => "interoperability_record",
            Self::ResourceInteroperabilityRecord => "resource_interoperability_record",
            Self::Vocabulary => "vocabulary",
            Self::Other => "other",
        }
    }

    /// Collection segment of the API path
    pub fn from_segment(segment: &str) -> Self {
        match segment {
            "providers" => Self::Provider,
            "services" => Self::Service,
            "training-resources" => Self::TrainingResource,
            "datasources" => Self::Datasource,
            "interoperability-records" => Self::InteroperabilityRecord,
            "resource-interoperability-records" => Self::ResourceInteroperabilityRecord,
            "vocabularies" => Self::Vocabulary,
            _ => Self::Other,
        }
    }
}

impl std::fmt::Display for ResourceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Filters of `GET /audit`
#[derive(Debug, Clone, Deserialize)]
pub struct AuditQuery {
    pub user_email: Option<String>,
    pub action: Option<AuditAction>,
    pub resource_type: Option<ResourceType>,
    pub resource_id: Option<String>,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

fn default_limit() -> i64 {
    DEFAULT_AUDIT_QUERY_LIMIT
}

impl Default for AuditQuery {
    fn default() -> Self {
        Self {
            user_email: None,
            action: None,
            resource_type: None,
            resource_id: None,
            start_time: None,
            end_time: None,
            limit: default_limit(),
            offset: 0,
        }
    }
}

impl AuditQuery {
    /// `limit` within `1..=MAX_AUDIT_QUERY_LIMIT`
    pub fn effective_limit(&self) -> i64 {
        self.limit.clamp(1, MAX_AUDIT_QUERY_LIMIT)
    }

    pub fn effective_offset(&self) -> i64 {
        self.offset.max(0)
    }

    pub fn matches(&self, entry: &AuditEntry) -> bool {
        self.user_email
            .as_deref()
            .map_or(true, |e| entry.user_email.as_deref() == Some(e))
            && self.action.map_or(true, |a| entry.action == a.as_str())
            && self.resource_type.map_or(true, |t| entry.resource_type == t.as_str())
            && self
                .resource_id
                .as_deref()
                .map_or(true, |id| entry.resource_id.as_deref() == Some(id))
            && self.start_time.map_or(true, |t| entry.timestamp >= t)
            && self.end_time.map_or(true, |t| entry.timestamp <= t)
    }
}

/// Input for a new audit entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAuditEntry {
    pub user_email: Option<String>,
    pub action: AuditAction,
    pub resource_type: ResourceType,
    pub resource_id: Option<String>,
    pub changes: Option<JsonValue>,
    pub metadata: Option<JsonValue>,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
}

impl CreateAuditEntry {
    pub fn builder() -> AuditEntryBuilder {
        AuditEntryBuilder::default()
    }

    /// The stored form, stamped now
    pub fn into_entry(self) -> AuditEntry {
        AuditEntry {
            id: Uuid::new_v4(),
            user_email: self.user_email,
            action: self.action.as_str().to_string(),
            resource_type: self.resource_type.as_str().to_string(),
            resource_id: self.resource_id,
            changes: self.changes,
            ip_address: self.ip_address,
            user_agent: self.user_agent,
            timestamp: Utc::now(),
            metadata: self.metadata,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct AuditEntryBuilder {
    user_email: Option<String>,
    action: Option<AuditAction>,
    resource_type: Option<ResourceType>,
    resource_id: Option<String>,
    changes: Option<JsonValue>,
    metadata: Option<JsonValue>,
    ip_address: Option<String>,
    user_agent: Option<String>,
}

impl AuditEntryBuilder {
    pub fn user_email(mut self, user_email: Option<String>) -> Self {
        self.user_email = user_email;
        self
    }

    pub fn action(mut self, action: AuditAction) -> Self {
        self.action = Some(action);
        self
    }

    pub fn resource_type(mut self, resource_type: ResourceType) -> Self {
        self.resource_type = Some(resource_type);
        self
    }

    pub fn resource_id(mut self, resource_id: Option<String>) -> Self {
        self.resource_id = resource_id;
        self
    }

    pub fn changes(mut self, changes: Option<JsonValue>) -> Self {
        self.changes = changes;
        self
    }

    pub fn metadata(mut self, metadata: JsonValue) -> Self {
        self.metadata = Some(metadata);
        self
    }

    pub fn ip_address(mut self, ip_address: Option<String>) -> Self {
        self.ip_address = ip_address;
        self
    }

    pub fn user_agent(mut self, user_agent: Option<String>) -> Self {
        self.user_agent = user_agent;
        self
    }

    /// Fails when action or resource type is missing
    pub fn try_build(self) -> Result<CreateAuditEntry, &'static str> {
        let action = self.action.ok_or("action is required")?;
        let resource_type = self.resource_type.ok_or("resource_type is required")?;

        Ok(CreateAuditEntry {
            user_email: self.user_email,
            action,
            resource_type,
            resource_id: self.resource_id,
            changes: self.changes,
            metadata: self.metadata,
            ip_address: self.ip_address,
            user_agent: self.user_agent,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_requires_action_and_type() {
        assert_eq!(
            CreateAuditEntry::builder().try_build().unwrap_err(),
            "action is required"
        );
        let entry = CreateAuditEntry::builder()
            .action(AuditAction::Verify)
            .resource_type(ResourceType::Provider)
            .resource_id(Some("athena".into()))
            .try_build()
            .unwrap();
        let stored = entry.into_entry();
        assert_eq!(stored.action, "verify");
        assert_eq!(stored.resource_type, "provider");
    }

    #[test]
    fn test_query_defaults_and_limits() {
        let query: AuditQuery = serde_json::from_str("{}").unwrap();
        assert_eq!(query.effective_limit(), DEFAULT_AUDIT_QUERY_LIMIT);

        let query = AuditQuery {
            limit: 5000,
            offset: -3,
            ..Default::default()
        };
        assert_eq!(query.effective_limit(), MAX_AUDIT_QUERY_LIMIT);
        assert_eq!(query.effective_offset(), 0);
    }

    #[test]
    fn test_query_matches() {
        let entry = CreateAuditEntry::builder()
            .action(AuditAction::Delete)
            .resource_type(ResourceType::Service)
            .resource_id(Some("athena.graph".into()))
            .user_email(Some("jane@example.org".into()))
            .try_build()
            .unwrap()
            .into_entry();

        let query = AuditQuery {
            action: Some(AuditAction::Delete),
            resource_id: Some("athena.graph".into()),
            ..Default::default()
        };
        assert!(query.matches(&entry));

        let query = AuditQuery {
            user_email: Some("john@example.org".into()),
            ..Default::default()
        };
        assert!(!query.matches(&entry));
    }
}
