pub mod by_service;
pub mod get;
pub mod list;

pub use by_service::DatasourceByServiceQuery;
pub use get::GetDatasourceQuery;
pub use list::ListDatasourcesQuery;
