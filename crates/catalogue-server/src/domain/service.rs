use serde::{Deserialize, Serialize};

use super::bundle::{Bundle, ResourcePayload};
use super::common::{AlternativeIdentifier, Category, MainContact, PublicContact, ScientificDomain};
use super::resource::{public_ref, public_refs, ProviderResource};
use super::states::{vocabulary_type as vt, StateVocabulary, RESOURCE_STATES};
use super::validation::{Checks, FieldError, VocabularyRef, VocabularyRefs};
use crate::ids::{self, IdError};
use crate::store::IndexFields;

pub const SERVICE_NAME_MAX: usize = 80;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub abbreviation: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub resource_organisation: String,
    #[serde(default)]
    pub resource_providers: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub webpage: Option<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,
    #[serde(default)]
    pub scientific_domains: Vec<ScientificDomain>,
    #[serde(default)]
    pub categories: Vec<Category>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trl: Option<String>,
    #[serde(default)]
    pub language_availabilities: Vec<String>,
    #[serde(default)]
    pub geographical_availabilities: Vec<String>,
    #[serde(default)]
    pub terms_of_use: Option<String>,
    #[serde(default)]
    pub privacy_policy: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_policy: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub main_contact: Option<MainContact>,
    #[serde(default)]
    pub public_contacts: Vec<PublicContact>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub catalogue_id: Option<String>,
    #[serde(default)]
    pub alternative_identifiers: Vec<AlternativeIdentifier>,
}

pub type ServiceBundle = Bundle<Service>;

impl ResourcePayload for Service {
    const RESOURCE_TYPE: &'static str = "service";
    const DISPLAY_NAME: &'static str = "Service";
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
        &self.name
    }

    fn index(&self, fields: &mut IndexFields) {
        fields.insert("resource_organisation".into(), vec![self.resource_organisation.clone()]);
        fields.insert("resource_providers".into(), self.resource_providers.clone());
        fields.insert(
            "category".into(),
            self.categories.iter().map(|c| c.category.clone()).collect(),
        );
        fields.insert(
            "scientific_domain".into(),
            self.scientific_domains.iter().map(|d| d.scientific_domain.clone()).collect(),
        );
        if let Some(trl) = &self.trl {
            fields.insert("trl".into(), vec![trl.clone()]);
        }
        if let Some(order_type) = &self.order_type {
            fields.insert("order_type".into(), vec![order_type.clone()]);
        }
    }

    fn searchable(&self) -> Vec<&str> {
        let mut text = vec![self.name.as_str(), self.abbreviation.as_str(), self.description.as_str()];
        text.extend(self.tags.iter().map(String::as_str));
        text
    }

    fn check(&self) -> Result<(), FieldError> {
        let mut checks = Checks::default();
        checks
            .required("name", &self.name, SERVICE_NAME_MAX)
            .required("abbreviation", &self.abbreviation, super::provider::ABBREVIATION_MAX)
            .required("resourceOrganisation", &self.resource_organisation, 255)
            .required("description", &self.description, super::provider::DESCRIPTION_MAX)
            .url("webpage", self.webpage.as_deref())
            .url("logo", self.logo.as_deref())
            .url("termsOfUse", self.terms_of_use.as_deref())
            .url("privacyPolicy", self.privacy_policy.as_deref())
            .url("accessPolicy", self.access_policy.as_deref())
            .url("order", self.order.as_deref());
        match &self.main_contact {
            Some(contact) => {
                checks
                    .required("mainContact.email", &contact.email, 255)
                    .email("mainContact.email", Some(&contact.email));
            },
            None => {
                checks.required("mainContact", "", 0);
            },
        }
        for contact in &self.public_contacts {
            checks.email("publicContacts.email", Some(&contact.email));
        }
        checks.finish()
    }

    fn vocabulary_refs(&self) -> Vec<VocabularyRef> {
        let mut refs = VocabularyRefs::default();
        refs.one("trl", vt::TRL, self.trl.as_deref());
        refs.one("orderType", vt::ORDER_TYPE, self.order_type.as_deref());
        refs.many("languageAvailabilities", vt::LANGUAGE, &self.language_availabilities);
        refs.many("geographicalAvailabilities", vt::COUNTRY, &self.geographical_availabilities);
        for domain in &self.scientific_domains {
            refs.one("scientificDomain", vt::SCIENTIFIC_DOMAIN, Some(&domain.scientific_domain));
            refs.one("scientificSubdomain", vt::SCIENTIFIC_SUBDOMAIN, Some(&domain.scientific_subdomain));
        }
        for category in &self.categories {
            refs.one("category", vt::CATEGORY, Some(&category.category));
            refs.one("subcategory", vt::SUBCATEGORY, Some(&category.subcategory));
        }
        refs.into_vec()
    }

    fn strip_sensitive(&mut self) {
        self.main_contact = None;
    }

    fn rewrite_for_public(&mut self, catalogue_id: &str) {
        public_ref(&mut self.resource_organisation, catalogue_id);
        public_refs(&mut self.resource_providers, catalogue_id);
    }
}

impl ProviderResource for Service {
    const PATH: &'static str = "services";
    const USES_TEMPLATE: bool = true;
    const HAS_DATASOURCE: bool = true;
    const LINKS_RECORDS: bool = true;
    const PROVIDER_FIELD: &'static str = "resource_organisation";

    fn provider_id(&self) -> Option<&str> {
        Some(self.resource_organisation.as_str()).filter(|p| !p.is_empty())
    }

    fn generate_id(&self) -> Result<String, IdError> {
        ids::service_id(Some(&self.resource_organisation), Some(&self.abbreviation))
    }

    fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    fn normalize_version(&mut self) {
        if self.version.as_deref().is_some_and(|v| v.trim().is_empty()) {
            self.version = None;
        }
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub fn service(provider_id: &str, abbreviation: &str) -> Service {
        Service {
            abbreviation: abbreviation.to_string(),
            name: format!("{} service", abbreviation),
            resource_organisation: provider_id.to_string(),
            resource_providers: vec![provider_id.to_string()],
            webpage: Some("https://service.example.org".into()),
            description: "A research service".into(),
            main_contact: Some(MainContact {
                email: "contact@example.org".into(),
                ..Default::default()
            }),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::service;
    use super::*;

    #[test]
    fn test_generate_id_and_version() {
        let mut s = service("athena", "Graph Explorer");
        assert_eq!(s.generate_id().unwrap(), "athena.graph_explorer");
        s.version = Some("  ".into());
        s.normalize_version();
        assert_eq!(ProviderResource::version(&s), None);
    }

    #[test]
    fn test_check_requires_organisation() {
        let mut s = service("athena", "x");
        s.resource_organisation.clear();
        assert_eq!(
            s.check(),
            Err(FieldError::Required { field: "resourceOrganisation".into() })
        );
    }

    #[test]
    fn test_rewrite_for_public() {
        let mut bundle = Bundle::new(service("athena", "graph"));
        bundle.id = "athena.graph".into();
        bundle.payload.id = "athena.graph".into();
        let copy = bundle.public_copy("eosc");
        assert_eq!(copy.payload.resource_organisation, "eosc.athena");
        assert_eq!(copy.payload.resource_providers, vec!["eosc.athena"]);
        assert_eq!(copy.id, "eosc.athena.graph");
    }
}
