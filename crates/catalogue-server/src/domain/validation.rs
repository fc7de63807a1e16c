//! Field validation for catalogue payloads
//!
//! Payloads run the synchronous checks here in their `check` method and list
//! the vocabulary-typed values they hold. The async vocabulary lookup lives in
//! `features::vocabularies::validator`.
//!
//! ```rust,ignore
//! let mut v = Checks::default();
//! v.required("name", &provider.name, 80);
//! v.url("website", provider.website.as_deref());
//! v.finish()?;
//! ```

use thiserror::Error;
use url::Url;

/// A single invalid field
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FieldError {
    #[error("Field '{field}' is mandatory")]
    Required { field: String },

    #[error("Field '{field}' exceeds the maximum length of {max_length} characters")]
    TooLong { field: String, max_length: usize },

    #[error("Field '{field}' must be a valid http(s) URL")]
    InvalidUrl { field: String },

    #[error("Field '{field}' must be a valid email address")]
    InvalidEmail { field: String },

    #[error("Field '{field}' should contain a Vocabulary of type '{expected}' (got '{value}')")]
    InvalidVocabulary {
        field: String,
        expected: String,
        value: String,
    },
}

/// A vocabulary id held by a payload field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VocabularyRef {
    pub field: &'static str,
    pub vocabulary_type: &'static str,
    pub value: String,
}

impl VocabularyRef {
    pub fn new(field: &'static str, vocabulary_type: &'static str, value: &str) -> Self {
        Self {
            field,
            vocabulary_type,
            value: value.to_string(),
        }
    }
}

/// Collect vocabulary references, skipping empty values
#[derive(Debug, Default)]
pub struct VocabularyRefs(Vec<VocabularyRef>);

impl VocabularyRefs {
    pub fn one(&mut self, field: &'static str, vocabulary_type: &'static str, value: Option<&str>) {
        if let Some(value) = value.map(str::trim).filter(|v| !v.is_empty()) {
            self.0.push(VocabularyRef::new(field, vocabulary_type, value));
        }
    }

    pub fn many<'a>(
        &mut self,
        field: &'static str,
        vocabulary_type: &'static str,
        values: impl IntoIterator<Item = &'a String>,
    ) {
        for value in values {
            self.one(field, vocabulary_type, Some(value));
        }
    }

    pub fn into_vec(self) -> Vec<VocabularyRef> {
        self.0
    }
}

/// Stops at the first failing rule
#[derive(Debug, Default)]
pub struct Checks {
    error: Option<FieldError>,
}

impl Checks {
    fn fail(&mut self, error: FieldError) {
        if self.error.is_none() {
            self.error = Some(error);
        }
    }

    /// Non-blank and at most `max_length` characters
    pub fn required(&mut self, field: &str, value: &str, max_length: usize) -> &mut Self {
        if let Err(e) = validate_required(field, value, max_length) {
            self.fail(e);
        }
        self
    }

    pub fn required_opt(&mut self, field: &str, value: Option<&str>, max_length: usize) -> &mut Self {
        self.required(field, value.unwrap_or_default(), max_length)
    }

    /// Optional text bounded by `max_length`
    pub fn max_length(&mut self, field: &str, value: Option<&str>, max_length: usize) -> &mut Self {
        if let Some(value) = value {
            if value.chars().count() > max_length {
                self.fail(FieldError::TooLong {
                    field: field.to_string(),
                    max_length,
                });
            }
        }
        self
    }

    pub fn url(&mut self, field: &str, value: Option<&str>) -> &mut Self {
        if let Some(value) = value {
            if let Err(e) = validate_url(value, field) {
                self.fail(e);
            }
        }
        self
    }

    pub fn email(&mut self, field: &str, value: Option<&str>) -> &mut Self {
        if let Some(value) = value {
            if let Err(e) = validate_email(value, field) {
                self.fail(e);
            }
        }
        self
    }

    pub fn finish(&mut self) -> Result<(), FieldError> {
        match self.error.take() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

/// Validate a mandatory text field
pub fn validate_required(field: &str, value: &str, max_length: usize) -> Result<(), FieldError> {
    if value.trim().is_empty() {
        return Err(FieldError::Required {
            field: field.to_string(),
        });
    }
    if value.chars().count() > max_length {
        return Err(FieldError::TooLong {
            field: field.to_string(),
            max_length,
        });
    }
    Ok(())
}

/// Validate an http(s) URL. Empty values pass.
pub fn validate_url(value: &str, field: &str) -> Result<(), FieldError> {
    if value.trim().is_empty() {
        return Ok(());
    }
    match Url::parse(value.trim()) {
        Ok(url) if matches!(url.scheme(), "http" | "https") && url.host().is_some() => Ok(()),
        _ => Err(FieldError::InvalidUrl {
            field: field.to_string(),
        }),
    }
}

/// Validate an email address: one `@` with text on both sides
pub fn validate_email(value: &str, field: &str) -> Result<(), FieldError> {
    let value = value.trim();
    let valid = match value.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.is_empty()
                && !domain.contains('@')
                && !value.contains(char::is_whitespace)
        },
        None => false,
    };
    if valid {
        Ok(())
    } else {
        Err(FieldError::InvalidEmail {
            field: field.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required() {
        assert!(validate_required("name", "Athena", 80).is_ok());
        assert_eq!(
            validate_required("name", "   ", 80),
            Err(FieldError::Required { field: "name".into() })
        );
        assert!(matches!(
            validate_required("name", &"x".repeat(81), 80),
            Err(FieldError::TooLong { max_length: 80, .. })
        ));
    }

    #[test]
    fn test_urls() {
        assert!(validate_url("https://athena.example.org/path", "website").is_ok());
        assert!(validate_url("", "website").is_ok());
        assert!(validate_url("ftp://example.org", "website").is_err());
        assert!(validate_url("not a url", "website").is_err());
    }

    #[test]
    fn test_emails() {
        assert!(validate_email("jane@example.org", "email").is_ok());
        assert!(validate_email("jane@", "email").is_err());
        assert!(validate_email("jane@a@b", "email").is_err());
        assert!(validate_email("jane doe@example.org", "email").is_err());
    }

    #[test]
    fn test_checks_keep_first_error() {
        let mut checks = Checks::default();
        checks
            .required("name", "", 10)
            .url("website", Some("nope"))
            .email("email", Some("x@y"));
        assert_eq!(
            checks.finish(),
            Err(FieldError::Required { field: "name".into() })
        );
    }

    #[test]
    fn test_vocabulary_refs_skip_blanks() {
        let mut refs = VocabularyRefs::default();
        refs.one("trl", "TRL", Some(" "));
        refs.one("trl", "TRL", Some("trl-9"));
        refs.many("tags", "Tag", &["a".to_string(), String::new()]);
        let refs = refs.into_vec();
        assert_eq!(refs.len(), 2);
        assert_eq!(refs[0].value, "trl-9");
    }
}
