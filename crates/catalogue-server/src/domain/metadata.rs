//! Registration metadata carried by every bundle

use serde::{Deserialize, Serialize};

use catalogue_common::{text::normalize_email, time};

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    #[serde(default)]
    pub registered_by: String,
    /// Epoch milliseconds
    #[serde(default)]
    pub registered_at: String,
    #[serde(default)]
    pub modified_by: String,
    /// Epoch milliseconds
    #[serde(default)]
    pub modified_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_id: Option<String>,
    /// Emails of the users that accepted the terms of use
    #[serde(default)]
    pub terms: Vec<String>,
    #[serde(default)]
    pub published: bool,
}

impl Metadata {
    pub fn create(registered_by: &str, email: Option<&str>) -> Self {
        let now = time::now_millis();
        Self {
            registered_by: registered_by.to_string(),
            registered_at: now.clone(),
            modified_by: registered_by.to_string(),
            modified_at: now,
            source: None,
            original_id: None,
            terms: email.map(normalize_email).into_iter().collect(),
            published: false,
        }
    }

    /// Stamp a modification, keeping the registration fields
    pub fn update(existing: Option<&Metadata>, modified_by: &str, email: Option<&str>) -> Self {
        let mut metadata = match existing {
            Some(existing) => existing.clone(),
            None => Self::create(modified_by, None),
        };
        metadata.modified_by = modified_by.to_string();
        metadata.modified_at = time::now_millis();
        if let Some(email) = email {
            metadata.accept_terms(email);
        }
        metadata
    }

    pub fn has_accepted_terms(&self, email: &str) -> bool {
        let email = normalize_email(email);
        self.terms.iter().any(|t| normalize_email(t) == email)
    }

    /// Returns false when the email was already recorded
    pub fn accept_terms(&mut self, email: &str) -> bool {
        if self.has_accepted_terms(email) {
            return false;
        }
        self.terms.push(normalize_email(email));
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_records_terms() {
        let metadata = Metadata::create("Jane Doe", Some("Jane@Example.org"));
        assert_eq!(metadata.terms, vec!["jane@example.org".to_string()]);
        assert_eq!(metadata.registered_at, metadata.modified_at);
        assert!(!metadata.published);
    }

    #[test]
    fn test_update_keeps_registration() {
        let mut original = Metadata::create("Jane Doe", Some("jane@example.org"));
        original.registered_at = "1000".into();

        let updated = Metadata::update(Some(&original), "John Roe", Some("john@example.org"));
        assert_eq!(updated.registered_by, "Jane Doe");
        assert_eq!(updated.registered_at, "1000");
        assert_eq!(updated.modified_by, "John Roe");
        assert_eq!(updated.terms.len(), 2);

        let again = Metadata::update(Some(&updated), "John Roe", Some("JOHN@example.org"));
        assert_eq!(again.terms.len(), 2);
    }
}
