pub mod add;
pub mod cascade;
pub mod delete;
pub mod update;
pub mod verify;

pub use add::AddDatasourceCommand;
pub use delete::DeleteDatasourceCommand;
pub use update::UpdateDatasourceCommand;
pub use verify::VerifyDatasourceCommand;
