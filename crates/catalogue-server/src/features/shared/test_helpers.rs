//! Fixtures for feature tests
//!
//! A [`TestContext`] is an [`AppState`] over the in-memory store with the
//! state vocabularies seeded and every mail captured.
//!
//! ```rust,ignore
//! let ctx = TestContext::new().await;
//! let provider = ctx.approved_provider("ATHENA").await;
//! assert!(provider.active);
//! ```

use std::sync::Arc;

use crate::api::AppState;
use crate::audit::MemoryAuditStore;
use crate::config::Config;
use crate::domain::interoperability_record::fixtures::record;
use crate::domain::provider::fixtures::provider;
use crate::domain::service::fixtures::service;
use crate::domain::states::{INTEROPERABILITY_RECORD_STATES, PROVIDER_STATES, RESOURCE_STATES};
use crate::domain::{InteroperabilityRecordBundle, ProviderBundle, ServiceBundle};
use crate::features::{providers, resources, vocabularies};
use crate::mail::MemoryTransport;
use crate::security::{Authentication, Authority};
use crate::store::MemoryResourceStore;

pub const ADMIN_EMAIL: &str = "admin@example.org";
pub const EPOT_EMAIL: &str = "epot@example.org";
pub const OWNER_EMAIL: &str = "jane@example.org";

pub struct TestContext {
    pub state: AppState,
    pub mail: Arc<MemoryTransport>,
}

impl TestContext {
    pub fn config() -> Config {
        let mut config = Config::default();
        config.catalogue.admins.insert(ADMIN_EMAIL.to_string());
        config.catalogue.onboarding_team.insert(EPOT_EMAIL.to_string());
        config.mail.registration_to = "registration@example.org".into();
        config.mail.monitoring_to = "monitoring@example.org".into();
        config.rate_limit.enabled = false;
        config
    }

    pub async fn new() -> Self {
        Self::with_config(Self::config()).await
    }

    pub async fn with_config(config: Config) -> Self {
        let mail = Arc::new(MemoryTransport::new());
        let state = AppState::new(
            config,
            Arc::new(MemoryResourceStore::new()),
            mail.clone(),
            Arc::new(MemoryAuditStore::new()),
        )
        .unwrap();
        vocabularies::commands::seed::handle(&state).await.unwrap();
        Self { state, mail }
    }

    pub fn admin() -> Authentication {
        Authentication::user(ADMIN_EMAIL, "Portal Admin", [Authority::Admin, Authority::User])
    }

    pub fn epot() -> Authentication {
        Authentication::user(EPOT_EMAIL, "Onboarding Team", [Authority::Epot, Authority::User])
    }

    /// Jane Doe, the administrator of every fixture provider
    pub fn owner() -> Authentication {
        Authentication::user(OWNER_EMAIL, "Jane Doe", [Authority::Provider, Authority::User])
    }

    pub fn stranger() -> Authentication {
        Authentication::user("someone@example.org", "Some One", [Authority::User])
    }

    /// Registered by Jane, still pending
    pub async fn pending_provider(&self, abbreviation: &str) -> ProviderBundle {
        let command = providers::commands::add::AddProviderCommand {
            provider: provider(abbreviation, &format!("{} Institute", abbreviation)),
        };
        providers::commands::add::handle(&self.state, &Self::owner(), command)
            .await
            .unwrap()
    }

    pub async fn approved_provider(&self, abbreviation: &str) -> ProviderBundle {
        let pending = self.pending_provider(abbreviation).await;
        let command = providers::commands::verify::VerifyProviderCommand {
            id: pending.id,
            status: PROVIDER_STATES.approved.to_string(),
            active: Some(true),
        };
        providers::commands::verify::handle(&self.state, &Self::admin(), command)
            .await
            .unwrap()
    }

    /// A service approved by the portal administrators, making it the
    /// provider's approved template
    pub async fn approved_service(&self, provider_id: &str, abbreviation: &str) -> ServiceBundle {
        let added = resources::commands::add::handle(
            &self.state,
            &Self::owner(),
            resources::commands::add::AddResourceCommand::new(service(provider_id, abbreviation)),
        )
        .await
        .unwrap();
        if added.is_approved() {
            return added;
        }
        resources::commands::verify::handle(
            &self.state,
            &Self::admin(),
            resources::commands::verify::VerifyResourceCommand::new(
                &added.id,
                RESOURCE_STATES.approved,
                Some(true),
            ),
        )
        .await
        .unwrap()
    }

    /// An interoperability record approved by the portal administrators
    pub async fn approved_record(&self, provider_id: &str, identifier: &str) -> InteroperabilityRecordBundle {
        let added = resources::commands::add::handle(
            &self.state,
            &Self::owner(),
            resources::commands::add::AddResourceCommand::new(record(provider_id, identifier)),
        )
        .await
        .unwrap();
        resources::commands::verify::handle(
            &self.state,
            &Self::admin(),
            resources::commands::verify::VerifyResourceCommand::new(
                &added.id,
                INTEROPERABILITY_RECORD_STATES.approved,
                Some(true),
            ),
        )
        .await
        .unwrap()
    }
}
