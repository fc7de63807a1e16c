//! Helpers shared by the feature slices
//!
//! Every lifecycle command needs the same handful of steps: stamp a history
//! entry for the caller, keep the public copy in sync, check vocabulary
//! references and hide contact details from outsiders. They live here so the
//! slices only spell out what differs.

pub mod auditing;
pub mod checks;
pub mod history;
pub mod labels;
pub mod params;
pub mod publication;
pub mod visibility;

#[cfg(test)]
pub mod test_helpers;

pub use auditing::{random_for_auditing, record_audit};
pub use checks::{check_status, check_vocabularies};
pub use history::{actor, entry, ensure_not_published};
pub use labels::label_facets;
pub use params::{
    ActiveParams, AuditParams, AuditVerdict, CommentParams, RandomParams, SuspendParams,
    VerifyParams,
};
pub use publication::{delete_public_copy, get_source, refresh_public_copy};
pub use visibility::{restrict_list, reveal, reveal_all};
