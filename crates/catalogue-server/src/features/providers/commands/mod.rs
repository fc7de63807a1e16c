pub mod activate;
pub mod add;
pub mod audit;
pub mod delete;
pub mod delete_user_info;
pub mod deletion_request;
pub mod suspend;
pub(crate) mod template;
pub mod terms;
pub mod update;
pub mod verify;

pub use activate::ActivateProviderCommand;
pub use add::AddProviderCommand;
pub use audit::AuditProviderCommand;
pub use delete::DeleteProviderCommand;
pub use delete_user_info::{DeleteUserInfoCommand, DeleteUserInfoResponse};
pub use deletion_request::RequestDeletionCommand;
pub use suspend::SuspendProviderCommand;
pub use terms::AcceptTermsCommand;
pub use update::UpdateProviderCommand;
pub use verify::VerifyProviderCommand;
