//! Request bodies

use serde_json::{json, Value};

pub fn provider_json(abbreviation: &str) -> Value {
    json!({
        "abbreviation": abbreviation,
        "name": format!("{abbreviation} Institute"),
        "website": format!("https://{}.example.org", abbreviation.to_lowercase()),
        "description": "Research infrastructure",
        "mainContact": {
            "firstName": "Jane",
            "lastName": "Doe",
            "email": "jane@example.org"
        },
        "users": [
            { "email": "jane@example.org", "name": "Jane", "surname": "Doe" }
        ]
    })
}

pub fn service_json(provider_id: &str, abbreviation: &str) -> Value {
    json!({
        "abbreviation": abbreviation,
        "name": format!("{abbreviation} service"),
        "resourceOrganisation": provider_id,
        "resourceProviders": [provider_id],
        "webpage": "https://service.example.org",
        "description": "A research service",
        "mainContact": { "email": "contact@example.org" }
    })
}

pub fn record_json(provider_id: &str, identifier: &str) -> Value {
    json!({
        "providerId": provider_id,
        "identifierInfo": {
            "identifier": identifier,
            "identifierType": "ir_identifier_type-doi"
        },
        "title": "Metadata guideline",
        "description": "How to describe research data"
    })
}
