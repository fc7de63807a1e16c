pub mod activate;
pub mod add;
pub mod audit;
pub mod delete;
pub mod suspend;
pub mod update;
pub mod verify;

pub use activate::ActivateResourceCommand;
pub use add::AddResourceCommand;
pub use audit::AuditResourceCommand;
pub use delete::DeleteResourceCommand;
pub use suspend::SuspendResourceCommand;
pub use update::UpdateResourceCommand;
pub use verify::VerifyResourceCommand;
