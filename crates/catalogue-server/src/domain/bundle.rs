//! Bundles: a payload plus its catalogue bookkeeping
//!
//! Every registered entity (provider, service, training resource, datasource,
//! interoperability record) is stored as a [`Bundle`]. The payload is what the
//! provider submitted; the rest is owned by the catalogue: status, activation,
//! metadata and the history in `logging_info`.

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::fmt::Debug;

use super::logging_info::{
    determine_audit_state, latest_of_type, sort_by_date, ActionType, AuditState, LoggingInfo,
    LoggingType,
};
use super::metadata::Metadata;
use super::states::StateVocabulary;
use super::validation::{FieldError, VocabularyRef};
use crate::ids;
use crate::store::{IndexFields, Indexed};

/// Behaviour shared by every bundled payload
pub trait ResourcePayload:
    Serialize + DeserializeOwned + Clone + PartialEq + Debug + Send + Sync + 'static
{
    /// Store partition, e.g. "provider"
    const RESOURCE_TYPE: &'static str;
    /// Human readable kind, e.g. "Provider"
    const DISPLAY_NAME: &'static str;
    const STATES: StateVocabulary;

    fn id(&self) -> &str;
    fn set_id(&mut self, id: String);
    fn catalogue_id(&self) -> Option<&str>;
    fn set_catalogue_id(&mut self, catalogue_id: String);
    fn name(&self) -> &str;

    /// Extra indexed fields beyond the common bundle ones
    fn index(&self, _fields: &mut IndexFields) {}

    /// Text matched by keyword search
    fn searchable(&self) -> Vec<&str>;

    /// Mandatory fields, lengths, URLs and emails
    fn check(&self) -> Result<(), FieldError>;

    fn vocabulary_refs(&self) -> Vec<VocabularyRef> {
        Vec::new()
    }

    /// Remove contact details before showing the payload to outsiders
    fn strip_sensitive(&mut self) {}

    /// Point references to other bundles at their public copies
    fn rewrite_for_public(&mut self, _catalogue_id: &str) {}
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identifiers {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pid: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bundle<T> {
    pub id: String,
    pub payload: T,
    #[serde(default)]
    pub metadata: Option<Metadata>,
    #[serde(default)]
    pub active: bool,
    #[serde(default)]
    pub suspended: bool,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template_status: Option<String>,
    #[serde(default)]
    pub audit_state: AuditState,
    #[serde(default)]
    pub logging_info: Vec<LoggingInfo>,
    #[serde(default)]
    pub latest_audit_info: Option<LoggingInfo>,
    #[serde(default)]
    pub latest_onboarding_info: Option<LoggingInfo>,
    #[serde(default)]
    pub latest_update_info: Option<LoggingInfo>,
    #[serde(default)]
    pub identifiers: Identifiers,
}

impl<T: ResourcePayload> Bundle<T> {
    pub fn new(payload: T) -> Self {
        Self {
            id: payload.id().to_string(),
            payload,
            metadata: None,
            active: false,
            suspended: false,
            status: None,
            template_status: None,
            audit_state: AuditState::NotAudited,
            logging_info: Vec::new(),
            latest_audit_info: None,
            latest_onboarding_info: None,
            latest_update_info: None,
            identifiers: Identifiers::default(),
        }
    }

    pub fn name(&self) -> &str {
        self.payload.name()
    }

    pub fn is_published(&self) -> bool {
        self.metadata.as_ref().is_some_and(|m| m.published)
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    pub fn is_approved(&self) -> bool {
        T::STATES.is_approved(self.status())
    }

    /// Replace the payload, keeping the id in sync
    pub fn set_payload(&mut self, payload: T) {
        self.id = payload.id().to_string();
        self.payload = payload;
    }

    /// Append a history entry and refresh the derived fields
    pub fn log(&mut self, entry: LoggingInfo) {
        self.logging_info.push(entry);
        self.refresh_history();
    }

    /// Sort the history and recompute latest entries and audit state
    pub fn refresh_history(&mut self) {
        sort_by_date(&mut self.logging_info);
        self.latest_onboarding_info = latest_of_type(&self.logging_info, LoggingType::Onboard).cloned();
        self.latest_update_info = latest_of_type(&self.logging_info, LoggingType::Update).cloned();
        self.latest_audit_info = latest_of_type(&self.logging_info, LoggingType::Audit).cloned();
        self.audit_state = determine_audit_state(&self.logging_info);
    }

    /// Bundles migrated without history get a registration entry first
    pub fn ensure_registration_entry(&mut self, registered_by: LoggingInfo) {
        if self.logging_info.is_empty() {
            self.log(LoggingInfo {
                kind: LoggingType::Onboard,
                action_type: ActionType::Registered,
                ..registered_by
            });
        }
    }

    /// The public copy of this bundle inside `catalogue_id`
    pub fn public_copy(&self, catalogue_id: &str) -> Self {
        let public_id = ids::public_id(&self.id, catalogue_id);
        let mut copy = self.clone();
        copy.payload.set_id(public_id.clone());
        copy.payload.rewrite_for_public(catalogue_id);
        copy.id = public_id.clone();
        copy.identifiers = Identifiers {
            original_id: Some(self.id.clone()),
            pid: Some(public_id),
        };
        let metadata = copy.metadata.get_or_insert_with(Metadata::default);
        metadata.published = true;
        copy
    }

    /// Hide history, terms and contact details
    pub fn strip_sensitive(&mut self) {
        self.payload.strip_sensitive();
        self.logging_info.clear();
        self.latest_audit_info = None;
        self.latest_onboarding_info = None;
        self.latest_update_info = None;
        if let Some(metadata) = self.metadata.as_mut() {
            metadata.terms.clear();
        }
    }
}

fn flag(value: bool) -> Vec<String> {
    vec![value.to_string()]
}

impl<T: ResourcePayload> Indexed for Bundle<T> {
    const RESOURCE_TYPE: &'static str = T::RESOURCE_TYPE;
    const DISPLAY_NAME: &'static str = T::DISPLAY_NAME;

    fn resource_id(&self) -> &str {
        &self.id
    }

    fn index_fields(&self) -> IndexFields {
        let mut fields = IndexFields::new();
        fields.insert("id".into(), vec![self.id.clone()]);
        fields.insert("name".into(), vec![self.payload.name().to_string()]);
        if let Some(catalogue_id) = self.payload.catalogue_id() {
            fields.insert("catalogue_id".into(), vec![catalogue_id.to_string()]);
        }
        if let Some(status) = &self.status {
            fields.insert("status".into(), vec![status.clone()]);
        }
        if let Some(template_status) = &self.template_status {
            fields.insert("template_status".into(), vec![template_status.clone()]);
        }
        fields.insert("audit_state".into(), vec![self.audit_state.as_str().to_string()]);
        fields.insert("active".into(), flag(self.active));
        fields.insert("suspended".into(), flag(self.suspended));
        fields.insert("published".into(), flag(self.is_published()));
        if let Some(original_id) = &self.identifiers.original_id {
            fields.insert("original_id".into(), vec![original_id.clone()]);
        }
        self.payload.index(&mut fields);
        fields
    }

    fn searchable_text(&self) -> String {
        let mut parts = vec![self.id.as_str()];
        parts.extend(self.payload.searchable());
        parts.join(" ").to_lowercase()
    }
}
