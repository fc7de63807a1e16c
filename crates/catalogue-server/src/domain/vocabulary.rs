//! Controlled vocabularies

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::store::{IndexFields, Indexed};

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vocabulary {
    #[serde(default)]
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    #[serde(rename = "type")]
    pub vocabulary_type: String,
    #[serde(default)]
    pub extras: BTreeMap<String, String>,
}

impl Vocabulary {
    pub fn new(id: &str, name: &str, vocabulary_type: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            vocabulary_type: vocabulary_type.to_string(),
            ..Default::default()
        }
    }

    pub fn with_parent(mut self, parent_id: &str) -> Self {
        self.parent_id = Some(parent_id.to_string());
        self
    }

    pub fn with_extra(mut self, key: &str, value: &str) -> Self {
        self.extras.insert(key.to_string(), value.to_string());
        self
    }
}

impl Indexed for Vocabulary {
    const RESOURCE_TYPE: &'static str = "vocabulary";
    const DISPLAY_NAME: &'static str = "Vocabulary";

    fn resource_id(&self) -> &str {
        &self.id
    }

    fn index_fields(&self) -> IndexFields {
        let mut fields = IndexFields::new();
        fields.insert("id".into(), vec![self.id.clone()]);
        fields.insert("name".into(), vec![self.name.clone()]);
        fields.insert("type".into(), vec![self.vocabulary_type.clone()]);
        if let Some(parent_id) = &self.parent_id {
            fields.insert("parent_id".into(), vec![parent_id.clone()]);
        }
        fields
    }

    fn searchable_text(&self) -> String {
        format!("{} {}", self.id, self.name).to_lowercase()
    }
}
