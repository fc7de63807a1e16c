//! Providers: the organisations that register resources

use serde::{Deserialize, Serialize};

use super::bundle::{Bundle, ResourcePayload};
use super::common::{AlternativeIdentifier, Location, MainContact, PublicContact, ScientificDomain, User};
use super::states::{vocabulary_type as vt, StateVocabulary, PROVIDER_STATES};
use super::validation::{Checks, FieldError, VocabularyRef, VocabularyRefs};
use crate::store::IndexFields;

pub const PROVIDER_NAME_MAX: usize = 80;
pub const ABBREVIATION_MAX: usize = 30;
pub const DESCRIPTION_MAX: usize = 1000;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Provider {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub abbreviation: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(default)]
    pub legal_entity: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub legal_status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hosting_legal_entity: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,
    #[serde(default)]
    pub scientific_domains: Vec<ScientificDomain>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub structure_types: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub main_contact: Option<MainContact>,
    #[serde(default)]
    pub public_contacts: Vec<PublicContact>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub life_cycle_status: Option<String>,
    #[serde(default)]
    pub participating_countries: Vec<String>,
    #[serde(default)]
    pub affiliations: Vec<String>,
    #[serde(default)]
    pub networks: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub catalogue_id: Option<String>,
    #[serde(default)]
    pub alternative_identifiers: Vec<AlternativeIdentifier>,
    /// Provider administrators
    #[serde(default)]
    pub users: Vec<User>,
}

pub type ProviderBundle = Bundle<Provider>;

impl Provider {
    pub fn has_user(&self, email: &str) -> bool {
        self.users.iter().any(|u| u.has_email(email))
    }

    pub fn user_emails(&self) -> Vec<String> {
        self.users.iter().map(|u| u.email.to_lowercase()).collect()
    }
}

impl ResourcePayload for Provider {
    const RESOURCE_TYPE: &'static str = "provider";
    const DISPLAY_NAME: &'static str = "Provider";
    const STATES: StateVocabulary = PROVIDER_STATES;

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
        fields.insert("users".into(), self.user_emails());
        fields.insert("abbreviation".into(), vec![self.abbreviation.clone()]);
        fields.insert("legal_entity".into(), vec![self.legal_entity.to_string()]);
        if let Some(country) = self.location.as_ref().map(|l| l.country.clone()) {
            fields.insert("country".into(), vec![country]);
        }
        fields.insert(
            "scientific_domain".into(),
            self.scientific_domains.iter().map(|d| d.scientific_domain.clone()).collect(),
        );
        fields.insert("networks".into(), self.networks.clone());
    }

    fn searchable(&self) -> Vec<&str> {
        let mut text = vec![self.name.as_str(), self.abbreviation.as_str()];
        text.extend(self.description.as_deref());
        text.extend(self.tags.iter().map(String::as_str));
        text
    }

    fn check(&self) -> Result<(), FieldError> {
        let mut checks = Checks::default();
        checks
            .required("name", &self.name, PROVIDER_NAME_MAX)
            .required("abbreviation", &self.abbreviation, ABBREVIATION_MAX)
            .required_opt("website", self.website.as_deref(), 1000)
            .url("website", self.website.as_deref())
            .url("logo", self.logo.as_deref())
            .max_length("description", self.description.as_deref(), DESCRIPTION_MAX);

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
        for user in &self.users {
            checks.email("users.email", Some(&user.email));
        }
        checks.finish()
    }

    fn vocabulary_refs(&self) -> Vec<VocabularyRef> {
        let mut refs = VocabularyRefs::default();
        refs.one("legalStatus", vt::PROVIDER_LEGAL_STATUS, self.legal_status.as_deref());
        refs.one(
            "hostingLegalEntity",
            vt::PROVIDER_HOSTING_LEGAL_ENTITY,
            self.hosting_legal_entity.as_deref(),
        );
        refs.one("lifeCycleStatus", vt::PROVIDER_LIFE_CYCLE_STATUS, self.life_cycle_status.as_deref());
        refs.many("structureTypes", vt::PROVIDER_STRUCTURE_TYPE, &self.structure_types);
        refs.many("participatingCountries", vt::COUNTRY, &self.participating_countries);
        refs.one(
            "location.country",
            vt::COUNTRY,
            self.location.as_ref().map(|l| l.country.as_str()),
        );
        for domain in &self.scientific_domains {
            refs.one("scientificDomain", vt::SCIENTIFIC_DOMAIN, Some(&domain.scientific_domain));
            refs.one(
                "scientificSubdomain",
                vt::SCIENTIFIC_SUBDOMAIN,
                Some(&domain.scientific_subdomain),
            );
        }
        refs.into_vec()
    }

    fn strip_sensitive(&mut self) {
        self.users.clear();
        self.main_contact = None;
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub fn provider(abbreviation: &str, name: &str) -> Provider {
        Provider {
            abbreviation: abbreviation.to_string(),
            name: name.to_string(),
            website: Some(format!(
                "https://{}.example.org",
                catalogue_common::text::sanitize(abbreviation).replace('_', "-")
            )),
            description: Some(format!("{} provides research infrastructure", name)),
            main_contact: Some(MainContact {
                first_name: "Jane".into(),
                last_name: "Doe".into(),
                email: "jane@example.org".into(),
                ..Default::default()
            }),
            users: vec![User::new("jane@example.org", "Jane", "Doe")],
            ..Default::default()
        }
    }
}
