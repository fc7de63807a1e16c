//! Audit logging middleware for write requests
//!
//! - Only POST, PUT, PATCH and DELETE are audited
//! - The request body is captured and stored as `changes`
//! - The caller comes from the `x-user-email` gateway header
//! - Entries are written after a successful response, off the request path

use axum::{
    body::{Body, Bytes},
    extract::{ConnectInfo, Request},
    http::{HeaderMap, Method, Uri},
    response::{IntoResponse, Response},
};
use http_body_util::{BodyExt, LengthLimitError, Limited};
use serde_json::Value as JsonValue;
use std::{
    future::Future,
    net::SocketAddr,
    pin::Pin,
    sync::Arc,
    task::{Context, Poll},
};
use tower::{Layer, Service};
use tracing::{debug, error, info, warn};

use super::models::{AuditAction, CreateAuditEntry, ResourceType};
use super::store::AuditStore;
use crate::error::CatalogueError;
use crate::security::USER_EMAIL_HEADER;

/// Largest write body the middleware buffers, in bytes
pub const MAX_AUDITED_BODY: usize = 2 * 1024 * 1024;

fn header_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn payload_too_large() -> Response {
    CatalogueError::PayloadTooLarge(format!("Request body exceeds {MAX_AUDITED_BODY} bytes")).into_response()
}

/// Audit logging layer
#[derive(Clone)]
pub struct AuditLayer {
    store: Arc<dyn AuditStore>,
}

impl AuditLayer {
    pub fn new(store: Arc<dyn AuditStore>) -> Self {
        Self { store }
    }
}

impl<S> Layer<S> for AuditLayer {
    type Service = AuditMiddleware<S>;

    fn layer(&self, inner: S) -> Self::Service {
        AuditMiddleware {
            inner,
            store: Arc::clone(&self.store),
        }
    }
}

/// Audit middleware service
#[derive(Clone)]
pub struct AuditMiddleware<S> {
    inner: S,
    store: Arc<dyn AuditStore>,
}

impl<S> Service<Request> for AuditMiddleware<S>
where
    S: Service<Request, Response = Response> + Clone + Send + 'static,
    S::Future: Send + 'static,
    S::Error: std::fmt::Display,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, request: Request) -> Self::Future {
        let mut inner = self.inner.clone();
        let store = Arc::clone(&self.store);

        Box::pin(async move {
            let method = request.method().clone();
            let uri = request.uri().clone();

            let should_audit =
                matches!(method, Method::POST | Method::PUT | Method::PATCH | Method::DELETE);
            if !should_audit {
                return inner.call(request).await;
            }

            let ip_address = request
                .extensions()
                .get::<ConnectInfo<SocketAddr>>()
                .map(|ci| ci.0.ip().to_string());
            let user_agent = header_value(request.headers(), "user-agent");
            let user_email =
                header_value(request.headers(), USER_EMAIL_HEADER).map(|e| e.to_lowercase());

            let (parts, body) = request.into_parts();
            let body_bytes = match Limited::new(body, MAX_AUDITED_BODY).collect().await {
                Ok(collected) => collected.to_bytes(),
                Err(e) if e.downcast_ref::<LengthLimitError>().is_some() => {
                    warn!(method = %method, uri = %uri, limit = MAX_AUDITED_BODY, "Request body too large");
                    return Ok(payload_too_large());
                },
                Err(e) => {
                    warn!(method = %method, uri = %uri, error = %e, "Failed to capture request body");
                    Bytes::new()
                },
            };
            let request = Request::from_parts(parts, Body::from(body_bytes.clone()));

            debug!(method = %method, uri = %uri, user = ?user_email, "Auditable command received");

            let response = inner.call(request).await?;

            if !response.status().is_success() {
                warn!(
                    method = %method,
                    uri = %uri,
                    status = %response.status(),
                    "Command failed or returned non-success status"
                );
                return Ok(response);
            }

            let (resource_type, resource_id) = infer_resource(&uri);
            let changes = if body_bytes.is_empty() {
                None
            } else {
                serde_json::from_slice::<JsonValue>(&body_bytes).ok()
            };
            let metadata = serde_json::json!({
                "method": method.as_str(),
                "uri": uri.to_string(),
                "status": response.status().as_u16(),
            });

            let entry = CreateAuditEntry::builder()
                .user_email(user_email)
                .action(infer_action(&method, &uri))
                .resource_type(resource_type)
                .resource_id(resource_id)
                .changes(changes)
                .metadata(metadata)
                .ip_address(ip_address)
                .user_agent(user_agent)
                .try_build();

            match entry {
                Ok(entry) => {
                    tokio::spawn(async move {
                        match store.record(entry).await {
                            Ok(entry) => info!(
                                audit_id = %entry.id,
                                action = %entry.action,
                                resource_type = %entry.resource_type,
                                "Audit log entry created"
                            ),
                            Err(e) => error!(error = %e, "Failed to create audit log entry"),
                        }
                    });
                },
                Err(e) => error!(error = e, "Incomplete audit entry"),
            }

            Ok(response)
        })
    }
}

/// Infer the audit action from the HTTP method and the last path segment
pub(crate) fn infer_action(method: &Method, uri: &Uri) -> AuditAction {
    let last = uri.path().trim_end_matches('/').rsplit('/').next().unwrap_or_default();
    match *method {
        Method::POST => AuditAction::Create,
        Method::PUT => AuditAction::Update,
        Method::DELETE => AuditAction::Delete,
        Method::PATCH => match last {
            "verify" => AuditAction::Verify,
            "publish" => AuditAction::Publish,
            "suspend" => AuditAction::Suspend,
            "audit" => AuditAction::Audit,
            "terms" => AuditAction::Update,
            _ => AuditAction::Other,
        },
        _ => AuditAction::Other,
    }
}

fn is_version(segment: &str) -> bool {
    segment
        .strip_prefix('v')
        .is_some_and(|n| !n.is_empty() && n.chars().all(|c| c.is_ascii_digit()))
}

/// Infer the resource type and id from `/api/v1/{collection}/{id}/...`
pub(crate) fn infer_resource(uri: &Uri) -> (ResourceType, Option<String>) {
    let mut segments = uri
        .path()
        .split('/')
        .filter(|s| !s.is_empty())
        .skip_while(|s| *s == "api" || is_version(s));

    let Some(collection) = segments.next() else {
        return (ResourceType::Other, None);
    };
    let resource_type = ResourceType::from_segment(collection);
    let resource_id = segments
        .next()
        .filter(|s| !matches!(*s, "bulk" | "by-type" | "my-user-info"))
        .map(str::to_string);
    (resource_type, resource_id)
}
