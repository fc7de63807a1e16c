//! Resource id generation
//!
//! Ids are derived from the submitted payload so that the same provider or
//! resource always lands on the same id.

use catalogue_common::text::{md5_hex, sanitize};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum IdError {
    #[error("{kind} must have a non-empty '{field}' to derive an id")]
    MissingField {
        kind: &'static str,
        field: &'static str,
    },

    #[error("'{0}' is not a valid id: only letters, digits, hyphens and underscores are allowed")]
    Invalid(String),

    #[error("Id is too long; max {0} characters allowed")]
    TooLong(usize),
}

fn required<'a>(
    kind: &'static str,
    field: &'static str,
    value: Option<&'a str>,
) -> Result<&'a str, IdError> {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() && v != "null" => Ok(v),
        _ => Err(IdError::MissingField { kind, field }),
    }
}

/// `sanitize(abbreviation)`
pub fn provider_id(abbreviation: Option<&str>) -> Result<String, IdError> {
    let abbreviation = required("Provider", "abbreviation", abbreviation)?;
    let id = sanitize(abbreviation);
    if id.is_empty() {
        return Err(IdError::Invalid(abbreviation.to_string()));
    }
    Ok(id)
}

/// `{resourceOrganisation}.{sanitize(abbreviation)}`
pub fn service_id(
    resource_organisation: Option<&str>,
    abbreviation: Option<&str>,
) -> Result<String, IdError> {
    let organisation = required("Service", "resourceOrganisation", resource_organisation)?;
    let abbreviation = required("Service", "abbreviation", abbreviation)?;
    let suffix = sanitize(abbreviation);
    if suffix.is_empty() {
        return Err(IdError::Invalid(abbreviation.to_string()));
    }
    Ok(format!("{}.{}", organisation, suffix))
}

/// `{resourceOrganisation}.{md5(title)}`
pub fn training_resource_id(
    resource_organisation: Option<&str>,
    title: Option<&str>,
) -> Result<String, IdError> {
    let organisation = required("Training Resource", "resourceOrganisation", resource_organisation)?;
    let title = required("Training Resource", "title", title)?;
    Ok(format!("{}.{}", organisation, md5_hex(title)))
}

/// `md5({identifier}.{identifierType})`
pub fn interoperability_record_id(
    identifier: Option<&str>,
    identifier_type: Option<&str>,
) -> Result<String, IdError> {
    let identifier = required("Interoperability Record", "identifier", identifier)?;
    let identifier_type = required("Interoperability Record", "identifierType", identifier_type)?;
    Ok(md5_hex(&format!("{}.{}", identifier, identifier_type)))
}

/// A datasource extends exactly one service: `{serviceId}.datasource`
pub fn datasource_id(service_id: Option<&str>) -> Result<String, IdError> {
    let service_id = required("Datasource", "serviceId", service_id)?;
    Ok(format!("{}.datasource", service_id))
}

/// A resource links to its interoperability records once: `{resourceId}.interoperability`
pub fn resource_interoperability_record_id(resource_id: Option<&str>) -> Result<String, IdError> {
    let resource_id = required("Resource Interoperability Record", "resourceId", resource_id)?;
    Ok(format!("{}.interoperability", resource_id))
}

/// Id of the published copy: `{catalogueId}.{id}`
pub fn public_id(id: &str, catalogue_id: &str) -> String {
    format!("{}.{}", catalogue_id, id)
}

/// Vocabulary ids: lowercase, `_` for spaces, `and` for `&`, parent prefixed
pub fn vocabulary_id(name: &str, parent_id: Option<&str>) -> String {
    let base = name.trim().to_lowercase().replace('&', "and").replace(' ', "_");
    match parent_id.map(str::trim).filter(|p| !p.is_empty()) {
        Some(parent) => format!("{}-{}", parent.to_lowercase(), base),
        None => base,
    }
}

/// Longest id a foreign catalogue may bring
pub const MAX_EXTERNAL_ID_LEN: usize = 50;

/// Ids supplied by other catalogues: letters, digits, `-` and `_`, at most
/// [`MAX_EXTERNAL_ID_LEN`] characters
///
/// Dots are refused since they separate the parts of public and child ids.
pub fn validate_external_id(id: &str) -> Result<(), IdError> {
    if id.is_empty() {
        return Err(IdError::Invalid(id.to_string()));
    }
    if id.chars().count() > MAX_EXTERNAL_ID_LEN {
        return Err(IdError::TooLong(MAX_EXTERNAL_ID_LEN));
    }
    if !id.chars().all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_')) {
        return Err(IdError::Invalid(id.to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_id() {
        assert_eq!(provider_id(Some("OpenAIRE")).unwrap(), "openaire");
        assert_eq!(provider_id(Some("CNR / ISTI")).unwrap(), "cnr_isti");
        assert!(matches!(
            provider_id(Some("null")),
            Err(IdError::MissingField { field: "abbreviation", .. })
        ));
        assert!(provider_id(None).is_err());
        assert!(matches!(provider_id(Some("!!!")), Err(IdError::Invalid(_))));
    }

    #[test]
    fn test_service_id() {
        assert_eq!(
            service_id(Some("openaire"), Some("Graph Explorer")).unwrap(),
            "openaire.graph_explorer"
        );
        assert!(service_id(None, Some("x")).is_err());
    }

    #[test]
    fn test_hashed_ids() {
        assert_eq!(
            training_resource_id(Some("openaire"), Some("abc")).unwrap(),
            "openaire.900150983cd24fb0d6963f7d28e17f72"
        );
        assert_eq!(
            interoperability_record_id(Some("a"), Some("bc")).unwrap(),
            md5_hex("a.bc")
        );
    }

    #[test]
    fn test_public_and_datasource_ids() {
        assert_eq!(public_id("openaire", "eosc"), "eosc.openaire");
        assert_eq!(datasource_id(Some("openaire.graph")).unwrap(), "openaire.graph.datasource");
        assert_eq!(
            resource_interoperability_record_id(Some("openaire.graph")).unwrap(),
            "openaire.graph.interoperability"
        );
    }

    #[test]
    fn test_vocabulary_id() {
        assert_eq!(vocabulary_id("Arts & Humanities", None), "arts_and_humanities");
        assert_eq!(
            vocabulary_id("Social Sciences", Some("Scientific_Domain")),
            "scientific_domain-social_sciences"
        );
    }

    #[test]
    fn test_external_ids() {
        assert!(validate_external_id("other-provider_1").is_ok());
        assert!(validate_external_id(&"a".repeat(MAX_EXTERNAL_ID_LEN)).is_ok());
        assert!(validate_external_id("bad id").is_err());
        assert!(validate_external_id("").is_err());
        assert!(matches!(validate_external_id("a.b"), Err(IdError::Invalid(_))));
        assert_eq!(
            validate_external_id(&"a".repeat(60)),
            Err(IdError::TooLong(MAX_EXTERNAL_ID_LEN))
        );
    }
}
