pub mod by_resource;
pub mod get;
pub mod list;

pub use by_resource::ResourceInteroperabilityRecordByResourceQuery;
pub use get::GetResourceInteroperabilityRecordQuery;
pub use list::ListResourceInteroperabilityRecordsQuery;
