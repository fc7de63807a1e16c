//! Helpers for the HTTP level tests
//!
//! A [`TestApp`] is the full router over the in-memory store, with the state
//! vocabularies seeded and mail captured.

pub mod fixtures;

use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::Value;
use tower::ServiceExt;

use catalogue_server::{
    api::{self, AppState},
    audit::MemoryAuditStore,
    config::Config,
    features::vocabularies,
    mail::MemoryTransport,
    store::MemoryResourceStore,
};

pub use fixtures::*;

pub const ADMIN: &str = "admin@example.org";
pub const EPOT: &str = "epot@example.org";
pub const OWNER: &str = "jane@example.org";

pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    pub mail: Arc<MemoryTransport>,
    pub audit: Arc<MemoryAuditStore>,
}

pub fn config() -> Config {
    let mut config = Config::default();
    config.catalogue.admins.insert(ADMIN.to_string());
    config.catalogue.onboarding_team.insert(EPOT.to_string());
    config.mail.registration_to = "registration@example.org".into();
    config.rate_limit.enabled = false;
    config
}

impl TestApp {
    pub async fn new() -> Self {
        Self::with_config(config()).await
    }

    pub async fn with_config(config: Config) -> Self {
        let mail = Arc::new(MemoryTransport::new());
        let audit = Arc::new(MemoryAuditStore::new());
        let state = AppState::new(
            config,
            Arc::new(MemoryResourceStore::new()),
            mail.clone(),
            audit.clone(),
        )
        .expect("app state");
        vocabularies::commands::seed::handle(&state)
            .await
            .expect("seeded vocabularies");
        Self {
            router: api::create_router(state.clone()),
            state,
            mail,
            audit,
        }
    }

    /// Send a request as `user` (anonymous when `None`), returning the status
    /// and the JSON body
    pub async fn call(
        &self,
        method: Method,
        uri: &str,
        user: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(email) = user {
            builder = builder.header("x-user-email", email);
        }
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("request");

        let response = self.router.clone().oneshot(request).await.expect("response");
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body");
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, json)
    }

    pub async fn get(&self, uri: &str, user: Option<&str>) -> (StatusCode, Value) {
        self.call(Method::GET, uri, user, None).await
    }

    /// Register and approve a provider, returning its id
    pub async fn approved_provider(&self, abbreviation: &str) -> String {
        let (status, json) = self
            .call(Method::POST, "/api/v1/providers", Some(OWNER), Some(provider_json(abbreviation)))
            .await;
        assert_eq!(status, StatusCode::CREATED, "{json}");
        let id = json["data"]["id"].as_str().expect("provider id").to_string();

        let uri = format!("/api/v1/providers/{id}/verify?status=approved%20provider&active=true");
        let (status, json) = self.call(Method::PATCH, &uri, Some(ADMIN), None).await;
        assert_eq!(status, StatusCode::OK, "{json}");
        id
    }

    /// Wait for the audit layer's background writes
    pub async fn audit_entries(&self, at_least: usize) -> usize {
        for _ in 0..50 {
            let len = self.audit.len().await;
            if len >= at_least {
                return len;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        self.audit.len().await
    }
}
