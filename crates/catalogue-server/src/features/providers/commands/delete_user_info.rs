//! Remove the caller from every provider they administer
//!
//! Nothing changes when the caller is the last administrator of any of
//! those providers.

use mediator::Request;
use serde::Serialize;

use crate::api::AppState;
use crate::domain::{ActionType, LoggingType, Metadata};
use crate::error::{CatalogueError, CatalogueResult};
use crate::features::shared::{actor, entry, refresh_public_copy};
use crate::search::FacetFilter;
use crate::security::Authentication;

#[derive(Debug, Clone, Default)]
pub struct DeleteUserInfoCommand;

/// Providers the caller was removed from
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteUserInfoResponse {
    pub providers: Vec<String>,
}

impl Request<CatalogueResult<DeleteUserInfoResponse>> for DeleteUserInfoCommand {}

#[tracing::instrument(skip(state, auth, _command), fields(caller = auth.email()))]
pub async fn handle(
    state: &AppState,
    auth: &Authentication,
    _command: DeleteUserInfoCommand,
) -> CatalogueResult<DeleteUserInfoResponse> {
    let email = auth
        .email()
        .ok_or_else(|| CatalogueError::unauthenticated("You must be logged in"))?
        .to_string();

    let repo = state.repos.providers();
    let filter = FacetFilter::all()
        .with_filter("users", email.as_str())
        .with_filter("published", "false");
    let providers = repo.all(&filter).await?;

    if let Some(last) = providers.iter().find(|p| p.payload.users.len() <= 1) {
        return Err(CatalogueError::conflict(format!(
            "You are the last administrator of Provider '{}'. Add another administrator before leaving.",
            last.id
        )));
    }

    let removed = vec![email.clone()];
    let mut ids = Vec::with_capacity(providers.len());
    for mut bundle in providers {
        bundle.payload.users.retain(|u| !u.has_email(&email));
        bundle.log(entry(
            auth,
            LoggingType::Update,
            ActionType::Updated,
            Some("Removed user information".into()),
        ));
        bundle.metadata = Some(Metadata::update(bundle.metadata.as_ref(), &actor(auth), None));
        repo.update(&bundle).await?;
        refresh_public_copy(state, &bundle).await?;
        state.mailer.admins_removed(&bundle, &removed).await;
        ids.push(bundle.id);
    }

    tracing::info!(count = ids.len(), "User information removed from providers");
    Ok(DeleteUserInfoResponse { providers: ids })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::common::User;
    use crate::features::shared::test_helpers::TestContext;

    #[tokio::test]
    async fn test_last_admin_conflicts_without_changes() {
        let ctx = TestContext::new().await;
        let mut shared = ctx.pending_provider("ATHENA").await;
        shared.payload.users.push(User::new("john@example.org", "John", "Roe"));
        ctx.state.repos.providers().update(&shared).await.unwrap();
        ctx.pending_provider("HERMES").await;

        let err = handle(&ctx.state, &TestContext::owner(), DeleteUserInfoCommand)
            .await
            .unwrap_err();
        assert!(matches!(err, CatalogueError::Conflict(_)));
        let athena = ctx.state.repos.providers().get_required("athena").await.unwrap();
        assert!(athena.payload.has_user("jane@example.org"));
    }

    #[tokio::test]
    async fn test_caller_is_removed() {
        let ctx = TestContext::new().await;
        let mut shared = ctx.approved_provider("ATHENA").await;
        shared.payload.users.push(User::new("john@example.org", "John", "Roe"));
        ctx.state.repos.providers().update(&shared).await.unwrap();
        ctx.mail.clear().await;

        let response = handle(&ctx.state, &TestContext::owner(), DeleteUserInfoCommand)
            .await
            .unwrap();
        assert_eq!(response.providers, vec!["athena"]);

        let athena = ctx.state.repos.providers().get_required("athena").await.unwrap();
        assert!(!athena.payload.has_user("jane@example.org"));
        let public = ctx.state.repos.providers().get_required("eosc.athena").await.unwrap();
        assert!(!public.payload.has_user("jane@example.org"));
        assert_eq!(ctx.mail.sent().await[0].to, vec!["jane@example.org"]);
    }
}
