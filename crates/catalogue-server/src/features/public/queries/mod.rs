pub mod get;
pub mod list;
mod reveal;

pub use get::GetPublicQuery;
pub use list::ListPublicQuery;
