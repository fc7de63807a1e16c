pub mod get;
pub mod inactive;
pub mod list;
pub mod my;
pub mod random;
pub mod services;
pub mod terms;

pub use get::GetProviderQuery;
pub use inactive::InactiveProvidersQuery;
pub use list::ListProvidersQuery;
pub use my::MyProvidersQuery;
pub use random::RandomProvidersQuery;
pub use services::ProviderServicesQuery;
pub use terms::HasAcceptedTermsQuery;
