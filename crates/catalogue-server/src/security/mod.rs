//! Who is calling and what they may do
//!
//! Identity comes from a trusted gateway in the `x-user-email` and
//! `x-user-name` headers. Roles are resolved on every request: portal admins
//! and the onboarding team from configuration, provider administrators from
//! the providers they are listed in.

mod extractor;

use std::collections::BTreeSet;
use std::fmt;

use serde::Serialize;

use catalogue_common::text::normalize_email;

use crate::config::CatalogueConfig;
use crate::domain::{Bundle, ProviderBundle, ProviderResource};
use crate::domain::states::{template, PROVIDER_STATES};
use crate::error::{CatalogueError, CatalogueResult};
use crate::search::FacetFilter;
use crate::store::Repositories;

pub use extractor::{USER_EMAIL_HEADER, USER_NAME_HEADER};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Authority {
    #[serde(rename = "ROLE_ADMIN")]
    Admin,
    #[serde(rename = "ROLE_EPOT")]
    Epot,
    #[serde(rename = "ROLE_PROVIDER")]
    Provider,
    #[serde(rename = "ROLE_USER")]
    User,
}

impl Authority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "ROLE_ADMIN",
            Self::Epot => "ROLE_EPOT",
            Self::Provider => "ROLE_PROVIDER",
            Self::User => "ROLE_USER",
        }
    }
}

impl fmt::Display for Authority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An authenticated user
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Principal {
    pub email: String,
    pub full_name: String,
    pub authorities: BTreeSet<Authority>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Authentication {
    #[default]
    Anonymous,
    User(Principal),
    /// The platform itself: scheduled jobs and cascades
    System,
}

impl Authentication {
    pub fn user(email: &str, full_name: &str, authorities: impl IntoIterator<Item = Authority>) -> Self {
        Self::User(Principal {
            email: normalize_email(email),
            full_name: full_name.to_string(),
            authorities: authorities.into_iter().collect(),
        })
    }

    pub fn is_authenticated(&self) -> bool {
        !matches!(self, Self::Anonymous)
    }

    pub fn email(&self) -> Option<&str> {
        match self {
            Self::User(principal) => Some(&principal.email),
            Self::System => Some("system"),
            Self::Anonymous => None,
        }
    }

    pub fn full_name(&self) -> Option<&str> {
        match self {
            Self::User(principal) => Some(&principal.full_name),
            Self::System => Some("system"),
            Self::Anonymous => None,
        }
    }

    pub fn has_role(&self, authority: Authority) -> bool {
        match self {
            Self::User(principal) => principal.authorities.contains(&authority),
            Self::System => true,
            Self::Anonymous => false,
        }
    }

    pub fn is_admin_or_epot(&self) -> bool {
        self.has_role(Authority::Admin) || self.has_role(Authority::Epot)
    }

    /// Role recorded in logging entries
    pub fn role_name(&self) -> &'static str {
        match self {
            Self::System => "system",
            _ if self.has_role(Authority::Admin) => "admin",
            _ if self.has_role(Authority::Epot) => "EPOT",
            _ if self.has_role(Authority::Provider) => "provider",
            _ => "user",
        }
    }

    pub fn require_authenticated(&self) -> CatalogueResult<()> {
        if self.is_authenticated() {
            Ok(())
        } else {
            Err(CatalogueError::unauthenticated("Authentication is required"))
        }
    }

    pub fn require_admin(&self) -> CatalogueResult<()> {
        self.require_authenticated()?;
        if self.has_role(Authority::Admin) {
            Ok(())
        } else {
            Err(CatalogueError::forbidden("Only portal administrators can do this"))
        }
    }

    pub fn require_admin_or_epot(&self) -> CatalogueResult<()> {
        self.require_authenticated()?;
        if self.is_admin_or_epot() {
            Ok(())
        } else {
            Err(CatalogueError::forbidden(
                "Only portal administrators or the onboarding team can do this",
            ))
        }
    }
}

/// Role resolution and ownership checks
#[derive(Clone)]
pub struct SecurityService {
    admins: BTreeSet<String>,
    onboarding_team: BTreeSet<String>,
    repos: Repositories,
}

impl SecurityService {
    pub fn new(catalogue: &CatalogueConfig, repos: Repositories) -> Self {
        Self {
            admins: catalogue.admins.clone(),
            onboarding_team: catalogue.onboarding_team.clone(),
            repos,
        }
    }

    /// Authorities of `email`, looking up provider administration
    pub async fn authorities_for(&self, email: &str) -> CatalogueResult<BTreeSet<Authority>> {
        let email = normalize_email(email);
        let mut authorities = BTreeSet::from([Authority::User]);
        if self.admins.contains(&email) {
            authorities.insert(Authority::Admin);
        }
        if self.onboarding_team.contains(&email) {
            authorities.insert(Authority::Epot);
        }

        let filter = FacetFilter {
            quantity: 1,
            ..FacetFilter::default()
        }
        .with_filter("users", email.as_str())
        .with_filter("published", "false");
        if self.repos.providers().search(&filter).await?.total > 0 {
            authorities.insert(Authority::Provider);
        }
        Ok(authorities)
    }

    pub async fn resolve(&self, email: &str, full_name: &str) -> CatalogueResult<Authentication> {
        let authorities = self.authorities_for(email).await?;
        Ok(Authentication::user(email, full_name, authorities))
    }

    /// Is the caller one of the provider's administrators
    pub async fn has_admin_access(&self, auth: &Authentication, provider_id: &str) -> CatalogueResult<bool> {
        let email = match auth {
            Authentication::System => return Ok(true),
            Authentication::Anonymous => return Ok(false),
            Authentication::User(principal) => &principal.email,
        };
        Ok(self
            .repos
            .providers()
            .get(provider_id)
            .await?
            .is_some_and(|p| p.payload.has_user(email)))
    }

    /// Provider owning a service, training resource, record or datasource
    pub async fn owning_provider(&self, resource_id: &str) -> CatalogueResult<Option<String>> {
        if let Some(service) = self.repos.services().get(resource_id).await? {
            return Ok(service.payload.provider_id().map(str::to_string));
        }
        if let Some(training) = self.repos.training_resources().get(resource_id).await? {
            return Ok(training.payload.provider_id().map(str::to_string));
        }
        if let Some(record) = self.repos.interoperability_records().get(resource_id).await? {
            return Ok(record.payload.provider_id().map(str::to_string));
        }
        if let Some(datasource) = self.repos.datasources().get(resource_id).await? {
            if let Some(service) = self.repos.services().get(&datasource.payload.service_id).await? {
                return Ok(service.payload.provider_id().map(str::to_string));
            }
        }
        Ok(None)
    }

    /// Is the caller an administrator of the provider owning `resource_id`
    pub async fn is_resource_admin(&self, auth: &Authentication, resource_id: &str) -> CatalogueResult<bool> {
        if !auth.is_authenticated() {
            return Ok(false);
        }
        match self.owning_provider(resource_id).await? {
            Some(provider_id) => self.has_admin_access(auth, &provider_id).await,
            None => Ok(false),
        }
    }

    /// May see unpublished details of a provider
    pub async fn can_manage_provider(&self, auth: &Authentication, provider_id: &str) -> CatalogueResult<bool> {
        Ok(auth.is_admin_or_epot() || self.has_admin_access(auth, provider_id).await?)
    }

    /// May see unpublished details of a resource
    pub async fn can_manage_resource(&self, auth: &Authentication, resource_id: &str) -> CatalogueResult<bool> {
        Ok(auth.is_admin_or_epot() || self.is_resource_admin(auth, resource_id).await?)
    }

    pub async fn require_provider_admin(&self, auth: &Authentication, provider_id: &str) -> CatalogueResult<()> {
        auth.require_authenticated()?;
        if self.can_manage_provider(auth, provider_id).await? {
            Ok(())
        } else {
            Err(CatalogueError::forbidden(format!(
                "You are not an administrator of Provider '{}'",
                provider_id
            )))
        }
    }

    pub async fn require_resource_admin(&self, auth: &Authentication, resource_id: &str) -> CatalogueResult<()> {
        auth.require_authenticated()?;
        if self.can_manage_resource(auth, resource_id).await? {
            Ok(())
        } else {
            Err(CatalogueError::forbidden(format!(
                "You are not an administrator of resource '{}'",
                resource_id
            )))
        }
    }

    /// May the caller register another `T` under `provider`
    ///
    /// An active, approved provider may add anything. Before that a provider
    /// gets exactly one template, submitted while its template status is
    /// still "no template status".
    pub async fn provider_can_add_resources<T: ProviderResource>(
        &self,
        auth: &Authentication,
        provider: &ProviderBundle,
    ) -> CatalogueResult<()> {
        auth.require_authenticated()?;
        if auth.is_admin_or_epot() {
            return Ok(());
        }
        if !self.has_admin_access(auth, &provider.id).await? {
            return Err(CatalogueError::forbidden(format!(
                "You are not an administrator of Provider '{}'",
                provider.id
            )));
        }
        let Some(status) = provider.status() else {
            return Err(CatalogueError::Internal(format!(
                "Provider '{}' has no status",
                provider.id
            )));
        };
        if provider.active && PROVIDER_STATES.is_approved(Some(status)) {
            return Ok(());
        }

        let no_template = provider.template_status.as_deref() == Some(template::NONE);
        if no_template && !self.has_resources::<T>(&provider.id).await? {
            return Ok(());
        }
        Err(CatalogueError::conflict(format!(
            "You have already created a {} Template.",
            T::DISPLAY_NAME
        )))
    }

    async fn has_resources<T: ProviderResource>(&self, provider_id: &str) -> CatalogueResult<bool> {
        let filter = FacetFilter {
            quantity: 1,
            ..FacetFilter::default()
        }
        .with_filter(T::PROVIDER_FIELD, provider_id);
        Ok(self.repos.of::<Bundle<T>>().search(&filter).await?.total > 0)
    }
}
