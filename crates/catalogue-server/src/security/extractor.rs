use axum::{async_trait, extract::FromRequestParts, http::request::Parts};

use super::Authentication;
use crate::api::AppState;
use crate::error::CatalogueError;

pub const USER_EMAIL_HEADER: &str = "x-user-email";
pub const USER_NAME_HEADER: &str = "x-user-name";

fn header<'a>(parts: &'a Parts, name: &str) -> Option<&'a str> {
    parts
        .headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

#[async_trait]
impl FromRequestParts<AppState> for Authentication {
    type Rejection = CatalogueError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let Some(email) = header(parts, USER_EMAIL_HEADER) else {
            return Ok(Authentication::Anonymous);
        };
        let full_name = header(parts, USER_NAME_HEADER).unwrap_or(email);
        let auth = state.security.resolve(email, full_name).await?;
        tracing::debug!(email, role = auth.role_name(), "Resolved caller");
        Ok(auth)
    }
}
