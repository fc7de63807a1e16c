//! Background mailing: the daily digest and the weekly onboarding reminders

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Duration as ChronoDuration, NaiveTime, Utc};
use tokio::task::JoinHandle;
use tokio::time::{interval_at, sleep, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use super::digest::{DailyDigest, DigestWindow};
use super::mailer::RegistrationMailer;
use crate::config::MailConfig;
use crate::domain::states::{template, PROVIDER_STATES};
use crate::search::FacetFilter;
use crate::store::{Repositories, StoreResult};

pub struct MailScheduler {
    mailer: Arc<RegistrationMailer>,
    repos: Repositories,
    digest_hour_utc: u32,
    reminder_interval: Duration,
}

/// Time left until the next `hour:00` UTC
pub(crate) fn until_next_digest(now: DateTime<Utc>, hour: u32) -> Duration {
    let at = NaiveTime::from_hms_opt(hour.min(23), 0, 0).unwrap_or(NaiveTime::MIN);
    let mut next = now.date_naive().and_time(at).and_utc();
    if next <= now {
        next += ChronoDuration::days(1);
    }
    (next - now).to_std().unwrap_or_default()
}

impl MailScheduler {
    pub fn new(mailer: Arc<RegistrationMailer>, repos: Repositories, config: &MailConfig) -> Self {
        Self {
            mailer,
            repos,
            digest_hour_utc: config.digest_hour_utc,
            reminder_interval: Duration::from_secs(config.reminder_interval_hours * 60 * 60),
        }
    }

    fn unpublished() -> FacetFilter {
        FacetFilter::all().with_filter("published", "false")
    }

    /// Mail yesterday's changes to the portal administrators
    #[tracing::instrument(skip(self))]
    pub async fn run_daily_digest(&self, now: DateTime<Utc>) -> StoreResult<()> {
        let digest = DailyDigest::build(&self.repos, DigestWindow::yesterday(now)).await?;
        self.mailer.daily_digest(&digest).await;
        Ok(())
    }

    /// Remind approved providers that never submitted a resource
    #[tracing::instrument(skip(self))]
    pub async fn run_onboarding_reminders(&self) -> StoreResult<usize> {
        let filter = Self::unpublished()
            .with_filter("status", PROVIDER_STATES.approved)
            .with_filter("template_status", template::NONE);
        let providers = self.repos.providers().all(&filter).await?;
        for provider in &providers {
            self.mailer.onboarding_reminder(provider).await;
        }
        tracing::info!(count = providers.len(), "Sent onboarding reminders");
        Ok(providers.len())
    }

    /// Tell the portal administrators what waits for their approval
    #[tracing::instrument(skip(self))]
    pub async fn run_admin_onboarding_digest(&self) -> StoreResult<()> {
        let providers = self.repos.providers();
        let pending = providers
            .all(&Self::unpublished().with_filter("status", PROVIDER_STATES.pending))
            .await?;
        let pending_templates = providers
            .all(&Self::unpublished().with_filter("template_status", template::PENDING))
            .await?;
        self.mailer.admin_onboarding_digest(&pending, &pending_templates).await;
        Ok(())
    }

    async fn weekly(&self) {
        if let Err(e) = self.run_onboarding_reminders().await {
            tracing::error!(error = %e, "Onboarding reminders failed");
        }
        if let Err(e) = self.run_admin_onboarding_digest().await {
            tracing::error!(error = %e, "Admin onboarding digest failed");
        }
    }

    /// Run until `shutdown` is cancelled
    pub fn spawn(self, shutdown: CancellationToken) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut reminders = interval_at(
                Instant::now() + self.reminder_interval,
                self.reminder_interval,
            );
            reminders.set_missed_tick_behavior(MissedTickBehavior::Delay);

            tracing::info!(
                digest_hour_utc = self.digest_hour_utc,
                reminder_interval_secs = self.reminder_interval.as_secs(),
                "Mail scheduler started"
            );

            loop {
                let digest_in = until_next_digest(Utc::now(), self.digest_hour_utc);
                tokio::select! {
                    _ = shutdown.cancelled() => {
                        tracing::info!("Mail scheduler stopped");
                        break;
                    },
                    _ = sleep(digest_in) => {
                        if let Err(e) = self.run_daily_digest(Utc::now()).await {
                            tracing::error!(error = %e, "Daily digest failed");
                        }
                    },
                    _ = reminders.tick() => self.weekly().await,
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::domain::provider::fixtures::provider;
    use crate::domain::{Bundle, Metadata};
    use crate::mail::MemoryTransport;
    use crate::store::MemoryResourceStore;
    use chrono::TimeZone;

    fn scheduler(transport: Arc<MemoryTransport>, repos: Repositories) -> MailScheduler {
        let mut config = Config::default();
        config.mail.registration_to = "registration@example.org".into();
        let mailer = Arc::new(RegistrationMailer::new(
            transport,
            config.catalogue.clone(),
            config.mail.clone(),
        ));
        MailScheduler::new(mailer, repos, &config.mail)
    }

    async fn seed(repos: &Repositories, id: &str, status: &str, template_status: &str) {
        let mut p = provider(id, id);
        p.id = id.into();
        let mut bundle = Bundle::new(p);
        bundle.status = Some(status.into());
        bundle.template_status = Some(template_status.into());
        bundle.metadata = Some(Metadata::default());
        repos.providers().add(&bundle).await.unwrap();
    }

    #[test]
    fn test_until_next_digest() {
        let now = Utc.with_ymd_and_hms(2024, 3, 1, 10, 0, 0).unwrap();
        assert_eq!(until_next_digest(now, 12), Duration::from_secs(2 * 3600));
        assert_eq!(until_next_digest(now, 10), Duration::from_secs(24 * 3600));
        assert_eq!(until_next_digest(now, 9), Duration::from_secs(23 * 3600));
    }

    #[tokio::test]
    async fn test_reminders_go_to_providers_without_template() {
        let repos = Repositories::new(Arc::new(MemoryResourceStore::new()));
        seed(&repos, "athena", PROVIDER_STATES.approved, template::NONE).await;
        seed(&repos, "hermes", PROVIDER_STATES.approved, template::APPROVED).await;
        seed(&repos, "zeus", PROVIDER_STATES.pending, template::NONE).await;

        let transport = Arc::new(MemoryTransport::new());
        let sent = scheduler(transport.clone(), repos).run_onboarding_reminders().await.unwrap();
        assert_eq!(sent, 1);
        assert_eq!(
            transport.subjects().await,
            vec!["[EOSC Portal] Friendly reminder for your Provider"]
        );
    }

    #[tokio::test]
    async fn test_admin_digest_lists_pending() {
        let repos = Repositories::new(Arc::new(MemoryResourceStore::new()));
        seed(&repos, "athena", PROVIDER_STATES.pending, template::NONE).await;
        seed(&repos, "hermes", PROVIDER_STATES.approved, template::PENDING).await;

        let transport = Arc::new(MemoryTransport::new());
        scheduler(transport.clone(), repos).run_admin_onboarding_digest().await.unwrap();

        let sent = transport.sent().await;
        assert_eq!(sent.len(), 1);
        assert!(sent[0].body.contains("[athena]-[athena]"));
        assert!(sent[0].body.contains("[hermes]-[hermes]"));
    }

    #[tokio::test]
    async fn test_quiet_day_sends_no_digest() {
        let repos = Repositories::new(Arc::new(MemoryResourceStore::new()));
        let transport = Arc::new(MemoryTransport::new());
        scheduler(transport.clone(), repos)
            .run_daily_digest(Utc::now())
            .await
            .unwrap();
        assert!(transport.sent().await.is_empty());
    }

    #[tokio::test]
    async fn test_stops_on_shutdown() {
        let repos = Repositories::new(Arc::new(MemoryResourceStore::new()));
        let transport = Arc::new(MemoryTransport::new());
        let shutdown = CancellationToken::new();
        let handle = scheduler(transport, repos).spawn(shutdown.clone());
        shutdown.cancel();
        handle.await.unwrap();
    }
}
