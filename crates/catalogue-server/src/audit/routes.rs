use axum::{
    extract::{Query, State},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};

use super::models::AuditQuery;
use crate::api::response::ApiResponse;
use crate::api::AppState;
use crate::error::CatalogueError;
use crate::security::Authentication;

pub fn routes() -> Router<AppState> {
    Router::new().route("/", get(list_audit_logs))
}

#[tracing::instrument(skip(state, auth))]
async fn list_audit_logs(
    State(state): State<AppState>,
    auth: Authentication,
    Query(query): Query<AuditQuery>,
) -> Result<Response, CatalogueError> {
    auth.require_admin()?;
    let entries = state.audit.query(&query).await?;
    let meta = serde_json::json!({
        "limit": query.effective_limit(),
        "offset": query.effective_offset(),
        "count": entries.len(),
    });
    Ok(ApiResponse::success_with_meta(entries, meta).into_response())
}
