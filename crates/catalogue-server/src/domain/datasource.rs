//! Datasource extension of a service

use serde::{Deserialize, Serialize};

use super::bundle::{Bundle, ResourcePayload};
use super::resource::public_ref;
use super::states::{vocabulary_type as vt, StateVocabulary, DATASOURCE_STATES};
use super::validation::{Checks, FieldError, VocabularyRef, VocabularyRefs};
use crate::store::IndexFields;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Datasource {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub service_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub catalogue_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jurisdiction: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub datasource_classification: Option<String>,
    #[serde(default)]
    pub research_entity_types: Vec<String>,
    #[serde(default)]
    pub thematic: bool,
    #[serde(default)]
    pub harvestable: bool,
    #[serde(rename = "submissionPolicyURL", default, skip_serializing_if = "Option::is_none")]
    pub submission_policy_url: Option<String>,
    #[serde(rename = "preservationPolicyURL", default, skip_serializing_if = "Option::is_none")]
    pub preservation_policy_url: Option<String>,
    #[serde(default)]
    pub version_control: bool,
}

pub type DatasourceBundle = Bundle<Datasource>;

impl ResourcePayload for Datasource {
    const RESOURCE_TYPE: &'static str = "datasource";
    const DISPLAY_NAME: &'static str = "Datasource";
    const STATES: StateVocabulary = DATASOURCE_STATES;

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

    // Datasources have no name of their own.
    fn name(&self) -> &str {
        &self.service_id
    }

    fn index(&self, fields: &mut IndexFields) {
        fields.insert("service_id".into(), vec![self.service_id.clone()]);
        fields.insert("thematic".into(), vec![self.thematic.to_string()]);
        if let Some(classification) = &self.datasource_classification {
            fields.insert("datasource_classification".into(), vec![classification.clone()]);
        }
    }

    fn searchable(&self) -> Vec<&str> {
        vec![self.service_id.as_str()]
    }

    fn check(&self) -> Result<(), FieldError> {
        Checks::default()
            .required("serviceId", &self.service_id, 255)
            .url("submissionPolicyURL", self.submission_policy_url.as_deref())
            .url("preservationPolicyURL", self.preservation_policy_url.as_deref())
            .finish()
    }

    fn vocabulary_refs(&self) -> Vec<VocabularyRef> {
        let mut refs = VocabularyRefs::default();
        refs.one("jurisdiction", vt::DATASOURCE_JURISDICTION, self.jurisdiction.as_deref());
        refs.one(
            "datasourceClassification",
            vt::DATASOURCE_CLASSIFICATION,
            self.datasource_classification.as_deref(),
        );
        refs.many(
            "researchEntityTypes",
            vt::DATASOURCE_RESEARCH_ENTITY_TYPE,
            &self.research_entity_types,
        );
        refs.into_vec()
    }

    fn rewrite_for_public(&mut self, catalogue_id: &str) {
        public_ref(&mut self.service_id, catalogue_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serialized_policy_fields() {
        let ds = Datasource {
            service_id: "athena.graph".into(),
            submission_policy_url: Some("https://example.org/submit".into()),
            ..Default::default()
        };
        let json = serde_json::to_value(&ds).unwrap();
        assert_eq!(json["submissionPolicyURL"], "https://example.org/submit");
        assert_eq!(json["serviceId"], "athena.graph");
    }

    #[test]
    fn test_public_copy_points_at_public_service() {
        let mut ds = Datasource {
            id: "athena.graph.datasource".into(),
            service_id: "athena.graph".into(),
            ..Default::default()
        };
        ds.rewrite_for_public("eosc");
        assert_eq!(ds.service_id, "eosc.athena.graph");
    }
}
