//! Identifier and text helpers
//!
//! Catalogue identifiers are derived from user supplied names and
//! abbreviations. [`sanitize`] turns free text into the lowercase,
//! underscore separated form used in resource ids.

use std::sync::LazyLock;

use regex::Regex;

static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| build(r"[\n\t\s]+"));
static TRAILING_WHITESPACE: LazyLock<Regex> = LazyLock::new(|| build(r"\s+$"));
static DISALLOWED: LazyLock<Regex> = LazyLock::new(|| build(r"[^a-zA-Z0-9\s\-_/]+"));
static SEPARATORS: LazyLock<Regex> = LazyLock::new(|| build(r"[/\s]+"));

// The patterns are literals; a failure here is a programming error caught by the tests.
#[allow(clippy::expect_used)]
fn build(pattern: &str) -> Regex {
    Regex::new(pattern).expect("static regex pattern")
}

/// Replace accented and other non-ASCII letters by their closest ASCII form.
///
/// Characters without a transliteration are dropped.
pub fn strip_accents(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        if ch.is_ascii() {
            out.push(ch);
        } else if ch.is_whitespace() {
            out.push(' ');
        } else {
            out.push_str(&slug::slugify(ch.to_string()));
        }
    }
    out
}

/// Turn free text into an identifier fragment.
///
/// ```
/// use catalogue_common::text::sanitize;
///
/// assert_eq!(sanitize("Athena R.C. / Data"), "athena_rc_data");
/// ```
pub fn sanitize(input: &str) -> String {
    let ascii = strip_accents(input);
    let collapsed = WHITESPACE.replace_all(&ascii, " ");
    let trimmed = TRAILING_WHITESPACE.replace_all(&collapsed, "");
    let allowed = DISALLOWED.replace_all(&trimmed, "");
    SEPARATORS.replace_all(&allowed, "_").to_lowercase()
}

/// Lowercase hexadecimal MD5 digest of `input`
pub fn md5_hex(input: &str) -> String {
    format!("{:x}", md5::compute(input.as_bytes()))
}

/// Normalise an email address for comparisons
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
