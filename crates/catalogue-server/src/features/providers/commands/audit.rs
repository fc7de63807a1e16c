//! Audit a provider on behalf of the onboarding team

use mediator::Request;
use serde::Deserialize;

use crate::api::AppState;
use crate::domain::ProviderBundle;
use crate::error::CatalogueResult;
use crate::features::shared::{record_audit, AuditVerdict};
use crate::security::Authentication;

#[derive(Debug, Clone, Deserialize)]
pub struct AuditProviderCommand {
    pub id: String,
    pub action: AuditVerdict,
    #[serde(default)]
    pub comment: Option<String>,
}

impl Request<CatalogueResult<ProviderBundle>> for AuditProviderCommand {}

#[tracing::instrument(skip(state, auth), fields(caller = auth.email()))]
pub async fn handle(
    state: &AppState,
    auth: &Authentication,
    command: AuditProviderCommand,
) -> CatalogueResult<ProviderBundle> {
    auth.require_admin_or_epot()?;
    let mut bundle = state.repos.providers().get_required(&command.id).await?;
    record_audit(state, auth, &mut bundle, command.action, command.comment).await?;
    state.mailer.audited(&bundle, &bundle).await;
    Ok(bundle)
}
