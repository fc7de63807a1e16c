//! Catalogue domain model

pub mod bundle;
pub mod common;
pub mod datasource;
pub mod interoperability_record;
pub mod logging_info;
pub mod metadata;
pub mod provider;
pub mod resource;
pub mod resource_interoperability_record;
pub mod service;
pub mod states;
pub mod training_resource;
pub mod validation;
pub mod vocabulary;

pub use bundle::{Bundle, Identifiers, ResourcePayload};
pub use datasource::{Datasource, DatasourceBundle};
pub use interoperability_record::{InteroperabilityRecord, InteroperabilityRecordBundle};
pub use logging_info::{ActionType, AuditState, LoggingInfo, LoggingType};
pub use metadata::Metadata;
pub use provider::{Provider, ProviderBundle};
pub use resource::ProviderResource;
pub use resource_interoperability_record::{
    ResourceInteroperabilityRecord, ResourceInteroperabilityRecordBundle,
};
pub use service::{Service, ServiceBundle};
pub use training_resource::{TrainingResource, TrainingResourceBundle};
pub use vocabulary::Vocabulary;
