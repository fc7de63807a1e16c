//! Configuration management
//!
//! Every setting comes from the environment (a `.env` file is honoured) and
//! falls back to the `DEFAULT_*` constants below.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::str::FromStr;

use catalogue_common::text::normalize_email;

// ============================================================================
// Server Configuration Constants
// ============================================================================

/// Default server host binding.
pub const DEFAULT_SERVER_HOST: &str = "127.0.0.1";

/// Default server port.
pub const DEFAULT_SERVER_PORT: u16 = 8080;

/// Default shutdown timeout in seconds.
pub const DEFAULT_SHUTDOWN_TIMEOUT_SECS: u64 = 30;

/// Default database URL for local development.
pub const DEFAULT_DATABASE_URL: &str = "postgresql://localhost/catalogue";

/// Default maximum database connections in the pool.
pub const DEFAULT_DATABASE_MAX_CONNECTIONS: u32 = 10;

/// Default minimum database connections in the pool.
pub const DEFAULT_DATABASE_MIN_CONNECTIONS: u32 = 2;

/// Default database connection timeout in seconds.
pub const DEFAULT_DATABASE_CONNECT_TIMEOUT_SECS: u64 = 10;

/// Default database idle timeout in seconds (10 minutes).
pub const DEFAULT_DATABASE_IDLE_TIMEOUT_SECS: u64 = 600;

/// Default CORS allowed origin for local development.
pub const DEFAULT_CORS_ALLOWED_ORIGIN: &str = "http://localhost:3000";

// ============================================================================
// Catalogue Configuration Constants
// ============================================================================

/// Identifier of the catalogue this instance owns.
pub const DEFAULT_CATALOGUE_ID: &str = "eosc";

/// Display name used in notification subjects.
pub const DEFAULT_CATALOGUE_NAME: &str = "EOSC";

pub const DEFAULT_CATALOGUE_HOMEPAGE: &str = "https://catalogue.eosc-portal.eu";

/// Hour (UTC) at which the daily digest is mailed.
pub const DEFAULT_DIGEST_HOUR_UTC: u32 = 12;

/// Interval between onboarding reminders (one week).
pub const DEFAULT_REMINDER_INTERVAL_HOURS: u64 = 168;

/// Matomo site id.
pub const DEFAULT_MATOMO_SITE_ID: &str = "1";

/// Visits cache refresh period (5 minutes).
pub const DEFAULT_MATOMO_REFRESH_SECS: u64 = 300;

/// Public API requests allowed per minute and client.
pub const DEFAULT_RATE_LIMIT_REQUESTS_PER_MINUTE: u64 = 100;

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub store: StoreBackend,
    pub cors: CorsConfig,
    pub catalogue: CatalogueConfig,
    pub mail: MailConfig,
    pub matomo: MatomoConfig,
    pub rate_limit: RateLimitConfig,
}

/// Server-specific configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub shutdown_timeout_secs: u64,
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub connect_timeout_secs: u64,
    pub idle_timeout_secs: u64,
}

/// Which resource store backs the catalogue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    #[default]
    Postgres,
    Memory,
}

impl FromStr for StoreBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(StoreBackend::Postgres),
            "memory" | "in-memory" => Ok(StoreBackend::Memory),
            other => Err(anyhow::anyhow!("Unknown store backend: {}", other)),
        }
    }
}

/// CORS configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
    pub allow_credentials: bool,
}

/// Identity of this catalogue and its privileged users
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogueConfig {
    pub id: String,
    pub name: String,
    pub homepage: String,
    /// Portal administrators (lowercased emails)
    pub admins: BTreeSet<String>,
    /// Onboarding team members (lowercased emails)
    pub onboarding_team: BTreeSet<String>,
}

/// Which transport delivers notifications
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MailTransportKind {
    #[default]
    Log,
    Disabled,
}

impl FromStr for MailTransportKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "log" => Ok(MailTransportKind::Log),
            "disabled" | "none" | "off" => Ok(MailTransportKind::Disabled),
            other => Err(anyhow::anyhow!("Unknown mail transport: {}", other)),
        }
    }
}

/// Notification settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MailConfig {
    pub registration_to: String,
    pub helpdesk_to: String,
    pub monitoring_to: String,
    pub admin_notifications: bool,
    pub provider_notifications: bool,
    pub transport: MailTransportKind,
    pub digest_hour_utc: u32,
    pub reminder_interval_hours: u64,
}

/// Matomo reporting API settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatomoConfig {
    /// Base URL; empty disables analytics polling
    pub host: String,
    pub token: String,
    pub site_id: String,
    pub authorization_header: Option<String>,
    pub refresh_secs: u64,
}

impl MatomoConfig {
    pub fn enabled(&self) -> bool {
        !self.host.trim().is_empty()
    }
}

/// Rate limiting for the public views
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitConfig {
    /// Off for in-process routers, which have no peer address to key on
    pub enabled: bool,
    pub requests_per_minute: u64,
}

impl Config {
    /// Load configuration from environment and defaults
    pub fn load() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let config = Config {
            server: ServerConfig {
                host: env_or("CATALOGUE_HOST", DEFAULT_SERVER_HOST),
                port: env_parse("CATALOGUE_PORT", DEFAULT_SERVER_PORT),
                shutdown_timeout_secs: env_parse(
                    "CATALOGUE_SHUTDOWN_TIMEOUT",
                    DEFAULT_SHUTDOWN_TIMEOUT_SECS,
                ),
            },
            database: DatabaseConfig {
                url: env_or("DATABASE_URL", DEFAULT_DATABASE_URL),
                max_connections: env_parse(
                    "DATABASE_MAX_CONNECTIONS",
                    DEFAULT_DATABASE_MAX_CONNECTIONS,
                ),
                min_connections: env_parse(
                    "DATABASE_MIN_CONNECTIONS",
                    DEFAULT_DATABASE_MIN_CONNECTIONS,
                ),
                connect_timeout_secs: env_parse(
                    "DATABASE_CONNECT_TIMEOUT",
                    DEFAULT_DATABASE_CONNECT_TIMEOUT_SECS,
                ),
                idle_timeout_secs: env_parse(
                    "DATABASE_IDLE_TIMEOUT",
                    DEFAULT_DATABASE_IDLE_TIMEOUT_SECS,
                ),
            },
            store: match std::env::var("CATALOGUE_STORE") {
                Ok(value) => value.parse()?,
                Err(_) => StoreBackend::default(),
            },
            cors: CorsConfig {
                allowed_origins: env_list("CORS_ALLOWED_ORIGINS")
                    .unwrap_or_else(|| vec![DEFAULT_CORS_ALLOWED_ORIGIN.to_string()]),
                allow_credentials: env_parse("CORS_ALLOW_CREDENTIALS", true),
            },
            catalogue: CatalogueConfig {
                id: env_or("CATALOGUE_ID", DEFAULT_CATALOGUE_ID),
                name: env_or("CATALOGUE_NAME", DEFAULT_CATALOGUE_NAME),
                homepage: env_or("CATALOGUE_HOMEPAGE", DEFAULT_CATALOGUE_HOMEPAGE),
                admins: env_emails("CATALOGUE_ADMINS"),
                onboarding_team: env_emails("CATALOGUE_ONBOARDING_TEAM"),
            },
            mail: MailConfig {
                registration_to: env_or("MAIL_REGISTRATION_TO", ""),
                helpdesk_to: env_or("MAIL_HELPDESK_TO", ""),
                monitoring_to: env_or("MAIL_MONITORING_TO", ""),
                admin_notifications: env_parse("MAIL_ADMIN_NOTIFICATIONS", true),
                provider_notifications: env_parse("MAIL_PROVIDER_NOTIFICATIONS", true),
                transport: match std::env::var("MAIL_TRANSPORT") {
                    Ok(value) => value.parse()?,
                    Err(_) => MailTransportKind::default(),
                },
                digest_hour_utc: env_parse("MAIL_DIGEST_HOUR_UTC", DEFAULT_DIGEST_HOUR_UTC),
                reminder_interval_hours: env_parse(
                    "MAIL_REMINDER_INTERVAL_HOURS",
                    DEFAULT_REMINDER_INTERVAL_HOURS,
                ),
            },
            matomo: MatomoConfig {
                host: env_or("MATOMO_HOST", ""),
                token: env_or("MATOMO_TOKEN", ""),
                site_id: env_or("MATOMO_SITE_ID", DEFAULT_MATOMO_SITE_ID),
                authorization_header: std::env::var("MATOMO_AUTHORIZATION_HEADER")
                    .ok()
                    .filter(|v| !v.trim().is_empty()),
                refresh_secs: env_parse("MATOMO_REFRESH_SECS", DEFAULT_MATOMO_REFRESH_SECS),
            },
            rate_limit: RateLimitConfig {
                enabled: env_parse("RATE_LIMIT_ENABLED", true),
                requests_per_minute: env_parse(
                    "RATE_LIMIT_REQUESTS_PER_MINUTE",
                    DEFAULT_RATE_LIMIT_REQUESTS_PER_MINUTE,
                ),
            },
        };

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.server.port == 0 {
            anyhow::bail!("Server port must be greater than 0");
        }

        if self.store == StoreBackend::Postgres && self.database.url.is_empty() {
            anyhow::bail!("Database URL cannot be empty");
        }

        if self.database.max_connections == 0 {
            anyhow::bail!("Database max_connections must be greater than 0");
        }

        if self.database.min_connections > self.database.max_connections {
            anyhow::bail!(
                "Database min_connections ({}) cannot be greater than max_connections ({})",
                self.database.min_connections,
                self.database.max_connections
            );
        }

        if self.catalogue.id.trim().is_empty() {
            anyhow::bail!("CATALOGUE_ID cannot be empty");
        }

        if self.catalogue.admins.is_empty() {
            anyhow::bail!("At least one portal administrator must be configured (CATALOGUE_ADMINS)");
        }

        if self.mail.digest_hour_utc > 23 {
            anyhow::bail!("MAIL_DIGEST_HOUR_UTC must be between 0 and 23");
        }

        if self.mail.reminder_interval_hours == 0 {
            anyhow::bail!("MAIL_REMINDER_INTERVAL_HOURS must be greater than 0");
        }

        if self.rate_limit.requests_per_minute == 0 {
            anyhow::bail!("RATE_LIMIT_REQUESTS_PER_MINUTE must be greater than 0");
        }

        if self.matomo.enabled() && self.matomo.refresh_secs == 0 {
            anyhow::bail!("MATOMO_REFRESH_SECS must be greater than 0");
        }

        if self.cors.allowed_origins.is_empty() {
            tracing::warn!("No CORS origins configured - all origins will be allowed");
        }

        if self.mail.registration_to.is_empty() {
            tracing::warn!("MAIL_REGISTRATION_TO is empty - team notifications will be skipped");
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: DEFAULT_SERVER_HOST.to_string(),
                port: DEFAULT_SERVER_PORT,
                shutdown_timeout_secs: DEFAULT_SHUTDOWN_TIMEOUT_SECS,
            },
            database: DatabaseConfig {
                url: DEFAULT_DATABASE_URL.to_string(),
                max_connections: DEFAULT_DATABASE_MAX_CONNECTIONS,
                min_connections: DEFAULT_DATABASE_MIN_CONNECTIONS,
                connect_timeout_secs: DEFAULT_DATABASE_CONNECT_TIMEOUT_SECS,
                idle_timeout_secs: DEFAULT_DATABASE_IDLE_TIMEOUT_SECS,
            },
            store: StoreBackend::default(),
            cors: CorsConfig {
                allowed_origins: vec![DEFAULT_CORS_ALLOWED_ORIGIN.to_string()],
                allow_credentials: true,
            },
            catalogue: CatalogueConfig {
                id: DEFAULT_CATALOGUE_ID.to_string(),
                name: DEFAULT_CATALOGUE_NAME.to_string(),
                homepage: DEFAULT_CATALOGUE_HOMEPAGE.to_string(),
                admins: BTreeSet::new(),
                onboarding_team: BTreeSet::new(),
            },
            mail: MailConfig {
                registration_to: String::new(),
                helpdesk_to: String::new(),
                monitoring_to: String::new(),
                admin_notifications: true,
                provider_notifications: true,
                transport: MailTransportKind::default(),
                digest_hour_utc: DEFAULT_DIGEST_HOUR_UTC,
                reminder_interval_hours: DEFAULT_REMINDER_INTERVAL_HOURS,
            },
            matomo: MatomoConfig {
                host: String::new(),
                token: String::new(),
                site_id: DEFAULT_MATOMO_SITE_ID.to_string(),
                authorization_header: None,
                refresh_secs: DEFAULT_MATOMO_REFRESH_SECS,
            },
            rate_limit: RateLimitConfig {
                enabled: true,
                requests_per_minute: DEFAULT_RATE_LIMIT_REQUESTS_PER_MINUTE,
            },
        }
    }
}

fn env_or(name: &str, default: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| default.to_string())
}

fn env_parse<T: FromStr>(name: &str, default: T) -> T {
    std::env::var(name)
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(default)
}

fn env_list(name: &str) -> Option<Vec<String>> {
    std::env::var(name).ok().map(|raw| {
        raw.split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    })
}

fn env_emails(name: &str) -> BTreeSet<String> {
    env_list(name)
        .unwrap_or_default()
        .iter()
        .map(|email| normalize_email(email))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    const VARS: &[&str] = &[
        "CATALOGUE_ADMINS",
        "CATALOGUE_ONBOARDING_TEAM",
        "CATALOGUE_STORE",
        "CATALOGUE_PORT",
        "MAIL_TRANSPORT",
        "MAIL_DIGEST_HOUR_UTC",
    ];

    fn clear_env() {
        for var in VARS {
            std::env::remove_var(var);
        }
    }

    #[test]
    #[serial]
    fn test_load_normalizes_admin_emails() {
        clear_env();
        std::env::set_var("CATALOGUE_ADMINS", " Admin@Example.org, second@example.org ,");
        std::env::set_var("CATALOGUE_ONBOARDING_TEAM", "Team@Example.org");
        std::env::set_var("CATALOGUE_STORE", "memory");

        let config = Config::load().unwrap();
        assert!(config.catalogue.admins.contains("admin@example.org"));
        assert!(config.catalogue.admins.contains("second@example.org"));
        assert_eq!(config.catalogue.admins.len(), 2);
        assert!(config.catalogue.onboarding_team.contains("team@example.org"));
        assert_eq!(config.store, StoreBackend::Memory);

        clear_env();
    }

    #[test]
    #[serial]
    fn test_load_requires_an_admin() {
        clear_env();
        assert!(Config::load().is_err());
    }

    #[test]
    #[serial]
    fn test_load_rejects_unknown_transport() {
        clear_env();
        std::env::set_var("CATALOGUE_ADMINS", "admin@example.org");
        std::env::set_var("MAIL_TRANSPORT", "smtp");
        assert!(Config::load().is_err());
        clear_env();
    }

    #[test]
    fn test_validate_digest_hour() {
        let mut config = Config::default();
        config.catalogue.admins.insert("admin@example.org".into());
        assert!(config.validate().is_ok());

        config.mail.digest_hour_utc = 24;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_matomo_disabled_without_host() {
        let config = Config::default();
        assert!(!config.matomo.enabled());
    }
}
