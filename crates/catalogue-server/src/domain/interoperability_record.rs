//! Interoperability guidelines registered by providers

use serde::{Deserialize, Serialize};

use super::bundle::{Bundle, ResourcePayload};
use super::resource::{public_ref, ProviderResource};
use super::states::{vocabulary_type as vt, StateVocabulary, INTEROPERABILITY_RECORD_STATES};
use super::validation::{Checks, FieldError, VocabularyRef, VocabularyRefs};
use crate::ids::{self, IdError};
use crate::store::IndexFields;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentifierInfo {
    #[serde(default)]
    pub identifier: String,
    #[serde(default)]
    pub identifier_type: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Creator {
    #[serde(default)]
    pub creator_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub given_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub family_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub affiliation: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceTypeInfo {
    #[serde(default)]
    pub resource_type: String,
    #[serde(default)]
    pub resource_type_general: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Right {
    #[serde(default)]
    pub right_title: String,
    #[serde(rename = "rightURI", default)]
    pub right_uri: String,
    #[serde(default)]
    pub right_identifier: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InteroperabilityRecord {
    #[serde(default)]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub catalogue_id: Option<String>,
    #[serde(default)]
    pub provider_id: String,
    #[serde(default)]
    pub identifier_info: IdentifierInfo,
    #[serde(default)]
    pub creators: Vec<Creator>,
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publication_year: Option<i32>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub resource_types_info: Vec<ResourceTypeInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub eosc_guideline_type: Option<String>,
    #[serde(default)]
    pub eosc_integration_options: Vec<String>,
    /// Epoch milliseconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<String>,
    /// Epoch milliseconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated: Option<String>,
    #[serde(default)]
    pub rights: Vec<Right>,
}

pub type InteroperabilityRecordBundle = Bundle<InteroperabilityRecord>;

impl ResourcePayload for InteroperabilityRecord {
    const RESOURCE_TYPE: &'static str = "interoperability_record";
    const DISPLAY_NAME: &'static str = "Interoperability Record";
    const STATES: StateVocabulary = INTEROPERABILITY_RECORD_STATES;

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn catalogue_id(&self) -> Option<&str> {
        self.catalogue_id.as_deref()
    }

    fn set_catalogue_id(&mut self, catalogue_id: String) {
        self.catalogue_id = Some(catalogue_id);
    }

    fn name(&self) -> &str {
        &self.title
    }

    fn index(&self, fields: &mut IndexFields) {
        fields.insert("provider_id".into(), vec![self.provider_id.clone()]);
        if let Some(guideline_type) = &self.eosc_guideline_type {
            fields.insert("eosc_guideline_type".into(), vec![guideline_type.clone()]);
        }
        if let Some(domain) = &self.domain {
            fields.insert("domain".into(), vec![domain.clone()]);
        }
    }

    fn searchable(&self) -> Vec<&str> {
        vec![
            self.title.as_str(),
            self.description.as_str(),
            self.identifier_info.identifier.as_str(),
        ]
    }

    fn check(&self) -> Result<(), FieldError> {
        Checks::default()
            .required("title", &self.title, super::training_resource::TITLE_MAX)
            .required("description", &self.description, super::provider::DESCRIPTION_MAX)
            .required("providerId", &self.provider_id, 255)
            .required("identifierInfo.identifier", &self.identifier_info.identifier, 1000)
            .required("identifierInfo.identifierType", &self.identifier_info.identifier_type, 255)
            .finish()
    }

    fn vocabulary_refs(&self) -> Vec<VocabularyRef> {
        let mut refs = VocabularyRefs::default();
        refs.one("status", vt::GUIDELINE_STATUS, self.status.as_deref());
        refs.one("domain", vt::GUIDELINE_DOMAIN, self.domain.as_deref());
        refs.one("eoscGuidelineType", vt::GUIDELINE_TYPE, self.eosc_guideline_type.as_deref());
        refs.many(
            "eoscIntegrationOptions",
            vt::GUIDELINE_INTEGRATION_OPTION,
            &self.eosc_integration_options,
        );
        refs.into_vec()
    }

    fn rewrite_for_public(&mut self, catalogue_id: &str) {
        public_ref(&mut self.provider_id, catalogue_id);
    }
}

impl ProviderResource for InteroperabilityRecord {
    const PATH: &'static str = "interoperability-records";
    const USES_TEMPLATE: bool = false;
    const HAS_DATASOURCE: bool = false;
    const LINKS_RECORDS: bool = false;
    const PROVIDER_FIELD: &'static str = "provider_id";

    fn provider_id(&self) -> Option<&str> {
        Some(self.provider_id.as_str()).filter(|p| !p.is_empty())
    }

    fn generate_id(&self) -> Result<String, IdError> {
        ids::interoperability_record_id(
            Some(&self.identifier_info.identifier),
            Some(&self.identifier_info.identifier_type),
        )
    }

    fn on_create(&mut self, now: &str) {
        self.created = Some(now.to_string());
        self.updated = Some(now.to_string());
    }

    fn on_update(&mut self, existing: &Self, now: &str) {
        self.created = existing.created.clone();
        self.updated = Some(now.to_string());
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub fn record(provider_id: &str, identifier: &str) -> InteroperabilityRecord {
        InteroperabilityRecord {
            provider_id: provider_id.to_string(),
            identifier_info: IdentifierInfo {
                identifier: identifier.to_string(),
                identifier_type: "ir_identifier_type-doi".into(),
            },
            title: "Metadata guideline".into(),
            description: "How to describe research data".into(),
            ..Default::default()
        }
    }
}
