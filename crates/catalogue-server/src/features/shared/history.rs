use crate::domain::{ActionType, Bundle, LoggingInfo, LoggingType, ResourcePayload};
use crate::error::{CatalogueError, CatalogueResult};
use crate::security::Authentication;

/// History entry recorded on behalf of `auth`
pub fn entry(
    auth: &Authentication,
    kind: LoggingType,
    action: ActionType,
    comment: Option<String>,
) -> LoggingInfo {
    match auth {
        Authentication::User(principal) => LoggingInfo::new(
            Some(&principal.email),
            Some(&principal.full_name),
            auth.role_name(),
            kind,
            action,
            comment,
        ),
        Authentication::System | Authentication::Anonymous => {
            let mut entry = LoggingInfo::system(kind, action);
            entry.comment = comment.filter(|c| !c.trim().is_empty());
            entry
        },
    }
}

/// Name stored in `metadata.registeredBy` / `modifiedBy`
pub fn actor(auth: &Authentication) -> String {
    auth.full_name().unwrap_or("system").to_string()
}

/// Published copies only change through their source bundle
pub fn ensure_not_published<T: ResourcePayload>(bundle: &Bundle<T>, verb: &str) -> CatalogueResult<()> {
    if bundle.is_published() {
        return Err(CatalogueError::forbidden(format!(
            "You cannot directly {} a Public {}",
            verb,
            T::DISPLAY_NAME
        )));
    }
    Ok(())
}
