//! Per-bundle history of onboarding, update and audit events

use serde::{Deserialize, Serialize};

use catalogue_common::{text::normalize_email, time};

/// Kind of a history entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoggingType {
    Onboard,
    Update,
    Audit,
}

impl LoggingType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Onboard => "onboard",
            Self::Update => "update",
            Self::Audit => "audit",
        }
    }
}

/// What happened in a history entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActionType {
    #[serde(rename = "registered")]
    Registered,
    #[serde(rename = "approved")]
    Approved,
    #[serde(rename = "rejected")]
    Rejected,
    #[serde(rename = "updated")]
    Updated,
    #[serde(rename = "updated version")]
    UpdatedVersion,
    #[serde(rename = "activated")]
    Activated,
    #[serde(rename = "deactivated")]
    Deactivated,
    #[serde(rename = "suspended")]
    Suspended,
    #[serde(rename = "unsuspended")]
    Unsuspended,
    #[serde(rename = "valid")]
    Valid,
    #[serde(rename = "invalid")]
    Invalid,
}

impl ActionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Registered => "registered",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
            Self::Updated => "updated",
            Self::UpdatedVersion => "updated version",
            Self::Activated => "activated",
            Self::Deactivated => "deactivated",
            Self::Suspended => "suspended",
            Self::Unsuspended => "unsuspended",
            Self::Valid => "valid",
            Self::Invalid => "invalid",
        }
    }
}

impl std::fmt::Display for ActionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of the latest audit, taking later updates into account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum AuditState {
    #[default]
    #[serde(rename = "Not audited")]
    NotAudited,
    #[serde(rename = "Valid")]
    Valid,
    #[serde(rename = "Invalid and updated")]
    InvalidAndUpdated,
    #[serde(rename = "Invalid and not updated")]
    InvalidAndNotUpdated,
}

impl AuditState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotAudited => "Not audited",
            Self::Valid => "Valid",
            Self::InvalidAndUpdated => "Invalid and updated",
            Self::InvalidAndNotUpdated => "Invalid and not updated",
        }
    }
}

/// One history entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoggingInfo {
    /// Epoch milliseconds
    pub date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_full_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_role: Option<String>,
    #[serde(rename = "type")]
    pub kind: LoggingType,
    pub action_type: ActionType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

impl LoggingInfo {
    pub fn new(
        email: Option<&str>,
        full_name: Option<&str>,
        role: &str,
        kind: LoggingType,
        action: ActionType,
        comment: Option<String>,
    ) -> Self {
        Self {
            date: time::now_millis(),
            user_email: email.map(normalize_email),
            user_full_name: full_name.map(str::to_string),
            user_role: Some(role.to_string()),
            kind,
            action_type: action,
            comment: comment.filter(|c| !c.trim().is_empty()),
        }
    }

    /// Entry written on behalf of the platform itself
    pub fn system(kind: LoggingType, action: ActionType) -> Self {
        Self::new(Some("system"), Some("system"), "system", kind, action, None)
    }

    pub fn timestamp(&self) -> i64 {
        time::millis_or_zero(&self.date)
    }
}

/// Sort oldest first
pub fn sort_by_date(logs: &mut [LoggingInfo]) {
    logs.sort_by_key(LoggingInfo::timestamp);
}

/// Newest entry of the given kind
pub fn latest_of_type(logs: &[LoggingInfo], kind: LoggingType) -> Option<&LoggingInfo> {
    logs.iter()
        .filter(|entry| entry.kind == kind)
        .max_by_key(|entry| entry.timestamp())
}

/// Derive the audit state from a history
///
/// Looks at the newest audit entry. An invalid audit followed by an update
/// becomes "Invalid and updated".
pub fn determine_audit_state(logs: &[LoggingInfo]) -> AuditState {
    // Entries sharing a millisecond keep their insertion order.
    let Some((position, audit)) = logs
        .iter()
        .enumerate()
        .filter(|(_, entry)| entry.kind == LoggingType::Audit)
        .max_by_key(|(_, entry)| entry.timestamp())
    else {
        return AuditState::NotAudited;
    };

    if audit.action_type != ActionType::Invalid {
        return AuditState::Valid;
    }

    let audited_at = audit.timestamp();
    let updated_after = logs.iter().enumerate().any(|(index, entry)| {
        entry.kind == LoggingType::Update
            && (entry.timestamp() > audited_at
                || (entry.timestamp() == audited_at && index > position))
    });

    if updated_after {
        AuditState::InvalidAndUpdated
    } else {
        AuditState::InvalidAndNotUpdated
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(date: i64, kind: LoggingType, action: ActionType) -> LoggingInfo {
        LoggingInfo {
            date: date.to_string(),
            user_email: None,
            user_full_name: None,
            user_role: None,
            kind,
            action_type: action,
            comment: None,
        }
    }

    #[test]
    fn test_not_audited_without_audit_entries() {
        let logs = vec![entry(1, LoggingType::Onboard, ActionType::Registered)];
        assert_eq!(determine_audit_state(&logs), AuditState::NotAudited);
    }

    #[test]
    fn test_latest_audit_wins() {
        let logs = vec![
            entry(10, LoggingType::Audit, ActionType::Valid),
            entry(20, LoggingType::Audit, ActionType::Invalid),
        ];
        assert_eq!(determine_audit_state(&logs), AuditState::InvalidAndNotUpdated);

        let logs = vec![
            entry(10, LoggingType::Audit, ActionType::Invalid),
            entry(20, LoggingType::Audit, ActionType::Valid),
        ];
        assert_eq!(determine_audit_state(&logs), AuditState::Valid);
    }

    #[test]
    fn test_invalid_then_updated() {
        let logs = vec![
            entry(5, LoggingType::Update, ActionType::Updated),
            entry(10, LoggingType::Audit, ActionType::Invalid),
            entry(30, LoggingType::Update, ActionType::Updated),
        ];
        assert_eq!(determine_audit_state(&logs), AuditState::InvalidAndUpdated);
    }

    #[test]
    fn test_sort_and_latest() {
        let mut logs = vec![
            entry(30, LoggingType::Update, ActionType::Updated),
            entry(10, LoggingType::Onboard, ActionType::Registered),
            entry(20, LoggingType::Onboard, ActionType::Approved),
        ];
        sort_by_date(&mut logs);
        assert_eq!(logs[0].action_type, ActionType::Registered);
        let latest = latest_of_type(&logs, LoggingType::Onboard).unwrap();
        assert_eq!(latest.action_type, ActionType::Approved);
    }

    #[test]
    fn test_serialized_names() {
        let value = serde_json::to_value(entry(1, LoggingType::Update, ActionType::UpdatedVersion))
            .unwrap();
        assert_eq!(value["type"], "update");
        assert_eq!(value["actionType"], "updated version");
        assert_eq!(
            serde_json::to_value(AuditState::InvalidAndUpdated).unwrap(),
            "Invalid and updated"
        );
    }

    #[test]
    fn test_blank_comment_is_dropped() {
        let info = LoggingInfo::new(
            Some("User@Example.org"),
            Some("User"),
            "provider",
            LoggingType::Update,
            ActionType::Updated,
            Some("  ".into()),
        );
        assert_eq!(info.user_email.as_deref(), Some("user@example.org"));
        assert!(info.comment.is_none());
    }
}
