use serde::{Deserialize, Serialize};

use super::bundle::{Bundle, ResourcePayload};
use super::common::{MainContact, ScientificDomain};
use super::resource::{public_ref, public_refs, ProviderResource};
use super::states::{vocabulary_type as vt, StateVocabulary, RESOURCE_STATES};
use super::validation::{Checks, FieldError, VocabularyRef, VocabularyRefs};
use crate::ids::{self, IdError};
use crate::store::IndexFields;

pub const TITLE_MAX: usize = 255;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainingResource {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub resource_organisation: String,
    #[serde(default)]
    pub resource_providers: Vec<String>,
    #[serde(default)]
    pub authors: Vec<String>,
    #[serde(default)]
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_rights: Option<String>,
    #[serde(default)]
    pub target_groups: Vec<String>,
    #[serde(default)]
    pub learning_resource_types: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expertise_level: Option<String>,
    #[serde(default)]
    pub languages: Vec<String>,
    #[serde(default)]
    pub scientific_domains: Vec<ScientificDomain>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact: Option<MainContact>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub catalogue_id: Option<String>,
}

pub type TrainingResourceBundle = Bundle<TrainingResource>;

impl ResourcePayload for TrainingResource {
    const RESOURCE_TYPE: &'static str = "training_resource";
    const DISPLAY_NAME: &'static str = "Training Resource";
    const STATES: StateVocabulary = RESOURCE_STATES;

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
        fields.insert("resource_organisation".into(), vec![self.resource_organisation.clone()]);
        fields.insert("resource_providers".into(), self.resource_providers.clone());
        fields.insert("target_group".into(), self.target_groups.clone());
        fields.insert("language".into(), self.languages.clone());
        if let Some(level) = &self.expertise_level {
            fields.insert("expertise_level".into(), vec![level.clone()]);
        }
    }

    fn searchable(&self) -> Vec<&str> {
        let mut text = vec![self.title.as_str()];
        text.extend(self.description.as_deref());
        text.extend(self.keywords.iter().map(String::as_str));
        text.extend(self.authors.iter().map(String::as_str));
        text
    }

    fn check(&self) -> Result<(), FieldError> {
        let mut checks = Checks::default();
        checks
            .required("title", &self.title, TITLE_MAX)
            .required("resourceOrganisation", &self.resource_organisation, 255)
            .required("url", &self.url, 1000)
            .url("url", Some(&self.url))
            .max_length("description", self.description.as_deref(), super::provider::DESCRIPTION_MAX);
        match &self.contact {
            Some(contact) => {
                checks
                    .required("contact.email", &contact.email, 255)
                    .email("contact.email", Some(&contact.email));
            },
            None => {
                checks.required("contact", "", 0);
            },
        }
        checks.finish()
    }

    fn vocabulary_refs(&self) -> Vec<VocabularyRef> {
        let mut refs = VocabularyRefs::default();
        refs.one("expertiseLevel", vt::TRAINING_EXPERTISE_LEVEL, self.expertise_level.as_deref());
        refs.one("accessRights", vt::TRAINING_ACCESS_RIGHT, self.access_rights.as_deref());
        refs.many("targetGroups", vt::TRAINING_TARGET_GROUP, &self.target_groups);
        refs.many(
            "learningResourceTypes",
            vt::TRAINING_LEARNING_RESOURCE_TYPE,
            &self.learning_resource_types,
        );
        refs.many("languages", vt::LANGUAGE, &self.languages);
        for domain in &self.scientific_domains {
            refs.one("scientificDomain", vt::SCIENTIFIC_DOMAIN, Some(&domain.scientific_domain));
            refs.one("scientificSubdomain", vt::SCIENTIFIC_SUBDOMAIN, Some(&domain.scientific_subdomain));
        }
        refs.into_vec()
    }

    fn strip_sensitive(&mut self) {
        self.contact = None;
    }

    fn rewrite_for_public(&mut self, catalogue_id: &str) {
        public_ref(&mut self.resource_organisation, catalogue_id);
        public_refs(&mut self.resource_providers, catalogue_id);
    }
}

impl ProviderResource for TrainingResource {
    const PATH: &'static str = "training-resources";
    const USES_TEMPLATE: bool = true;
    const HAS_DATASOURCE: bool = false;
    const LINKS_RECORDS: bool = true;
    const PROVIDER_FIELD: &'static str = "resource_organisation";

    fn provider_id(&self) -> Option<&str> {
        Some(self.resource_organisation.as_str()).filter(|p| !p.is_empty())
    }

    fn generate_id(&self) -> Result<String, IdError> {
        ids::training_resource_id(Some(&self.resource_organisation), Some(&self.title))
    }
}
