//! Links between a service or training resource and the interoperability
//! records it complies with

use serde::{Deserialize, Serialize};

use super::bundle::{Bundle, ResourcePayload};
use super::resource::{public_ref, public_refs};
use super::states::{StateVocabulary, INTEROPERABILITY_RECORD_STATES};
use super::validation::{Checks, FieldError};
use crate::store::IndexFields;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceInteroperabilityRecord {
    #[serde(default)]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub catalogue_id: Option<String>,
    #[serde(default)]
    pub resource_id: String,
    #[serde(default)]
    pub interoperability_record_ids: Vec<String>,
}

pub type ResourceInteroperabilityRecordBundle = Bundle<ResourceInteroperabilityRecord>;

impl ResourcePayload for ResourceInteroperabilityRecord {
    const RESOURCE_TYPE: &'static str = "resource_interoperability_record";
    const DISPLAY_NAME: &'static str = "Resource Interoperability Record";
    // Links are never onboarded, so their bundles carry no status.
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
        &self.resource_id
    }

    fn index(&self, fields: &mut IndexFields) {
        fields.insert("resource_id".into(), vec![self.resource_id.clone()]);
        fields.insert(
            "interoperability_record_ids".into(),
            self.interoperability_record_ids.clone(),
        );
    }

    fn searchable(&self) -> Vec<&str> {
        vec![self.resource_id.as_str()]
    }

    fn check(&self) -> Result<(), FieldError> {
        let mut checks = Checks::default();
        checks.required("resourceId", &self.resource_id, 255);
        if self.interoperability_record_ids.is_empty() {
            checks.required("interoperabilityRecordIds", "", 255);
        }
        for id in &self.interoperability_record_ids {
            checks.required("interoperabilityRecordIds", id, 255);
        }
        checks.finish()
    }

    fn rewrite_for_public(&mut self, catalogue_id: &str) {
        public_ref(&mut self.resource_id, catalogue_id);
        public_refs(&mut self.interoperability_record_ids, catalogue_id);
    }
}
