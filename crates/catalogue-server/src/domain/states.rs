//! Status values and the vocabulary types they belong to
//!
//! Statuses are vocabulary ids. The state vocabularies are seeded at startup
//! so that `verify` can check a requested status against its type.

/// The three onboarding states of one kind of bundle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateVocabulary {
    pub vocabulary_type: &'static str,
    pub pending: &'static str,
    pub approved: &'static str,
    pub rejected: &'static str,
}

impl StateVocabulary {
    pub fn all(&self) -> [&'static str; 3] {
        [self.pending, self.approved, self.rejected]
    }

    pub fn is_pending(&self, status: Option<&str>) -> bool {
        status == Some(self.pending)
    }

    pub fn is_approved(&self, status: Option<&str>) -> bool {
        status == Some(self.approved)
    }

    pub fn is_rejected(&self, status: Option<&str>) -> bool {
        status == Some(self.rejected)
    }
}

pub mod vocabulary_type {
    pub const PROVIDER_STATE: &str = "Provider state";
    pub const TEMPLATE_STATE: &str = "Template state";
    pub const RESOURCE_STATE: &str = "Resource state";
    pub const DATASOURCE_STATE: &str = "Datasource state";
    pub const INTEROPERABILITY_RECORD_STATE: &str = "Interoperability record state";

    pub const COUNTRY: &str = "Country";
    pub const LANGUAGE: &str = "Language";
    pub const SCIENTIFIC_DOMAIN: &str = "Scientific domain";
    pub const SCIENTIFIC_SUBDOMAIN: &str = "Scientific subdomain";
    pub const CATEGORY: &str = "Category";
    pub const SUBCATEGORY: &str = "Subcategory";
    pub const TRL: &str = "TRL";
    pub const ORDER_TYPE: &str = "Order type";
    pub const PROVIDER_LEGAL_STATUS: &str = "Provider legal status";
    pub const PROVIDER_HOSTING_LEGAL_ENTITY: &str = "Provider hosting legal entity";
    pub const PROVIDER_LIFE_CYCLE_STATUS: &str = "Provider life cycle status";
    pub const PROVIDER_STRUCTURE_TYPE: &str = "Provider structure type";
    pub const TRAINING_EXPERTISE_LEVEL: &str = "Training resource expertise level";
    pub const TRAINING_TARGET_GROUP: &str = "Target user";
    pub const TRAINING_ACCESS_RIGHT: &str = "Training resource access right";
    pub const TRAINING_LEARNING_RESOURCE_TYPE: &str = "Training resource learning resource type";
    pub const DATASOURCE_CLASSIFICATION: &str = "Datasource classification";
    pub const DATASOURCE_RESEARCH_ENTITY_TYPE: &str = "Datasource research entity type";
    pub const DATASOURCE_JURISDICTION: &str = "Datasource jurisdiction";
    pub const GUIDELINE_TYPE: &str = "Interoperability record eosc guideline type";
    pub const GUIDELINE_STATUS: &str = "Interoperability record status";
    pub const GUIDELINE_DOMAIN: &str = "Interoperability record domain";
    pub const GUIDELINE_INTEGRATION_OPTION: &str = "Interoperability record eosc integration option";
}

pub const PROVIDER_STATES: StateVocabulary = StateVocabulary {
    vocabulary_type: vocabulary_type::PROVIDER_STATE,
    pending: "pending provider",
    approved: "approved provider",
    rejected: "rejected provider",
};

pub const RESOURCE_STATES: StateVocabulary = StateVocabulary {
    vocabulary_type: vocabulary_type::RESOURCE_STATE,
    pending: "pending resource",
    approved: "approved resource",
    rejected: "rejected resource",
};

pub const DATASOURCE_STATES: StateVocabulary = StateVocabulary {
    vocabulary_type: vocabulary_type::DATASOURCE_STATE,
    pending: "pending datasource",
    approved: "approved datasource",
    rejected: "rejected datasource",
};

pub const INTEROPERABILITY_RECORD_STATES: StateVocabulary = StateVocabulary {
    vocabulary_type: vocabulary_type::INTEROPERABILITY_RECORD_STATE,
    pending: "pending interoperability record",
    approved: "approved interoperability record",
    rejected: "rejected interoperability record",
};

/// Provider template status: where the provider's first resource stands
pub mod template {
    pub const NONE: &str = "no template status";
    pub const PENDING: &str = "pending template";
    pub const APPROVED: &str = "approved template";
    pub const REJECTED: &str = "rejected template";

    pub const ALL: [&str; 4] = [NONE, PENDING, APPROVED, REJECTED];
}
