pub mod by_provider;
pub mod get;
pub mod inactive;
pub mod list;
pub mod random;

pub use by_provider::ResourcesByProviderQuery;
pub use get::GetResourceQuery;
pub use inactive::InactiveResourcesQuery;
pub use list::ListResourcesQuery;
pub use random::RandomResourcesQuery;
