use std::sync::Arc;

use super::digest::DailyDigest;
use super::transport::MailTransport;
use super::Mail;
use crate::config::{CatalogueConfig, MailConfig};
use crate::domain::{
    Bundle, DatasourceBundle, ProviderBundle, ResourcePayload,
};

/// Who a notification is for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Audience {
    /// Onboarding team and the registration address; never muted
    Team,
    /// Portal administrators at the registration address
    Portal,
    /// The monitoring address
    Monitoring,
    /// Administrators of a provider
    Provider(Vec<String>),
}

/// The bundle an onboarding mail is about
struct Onboarding<'a> {
    name: &'a str,
    id: &'a str,
    kind: &'a str,
    status: &'a str,
    /// The status is the provider's template status
    template: bool,
    provider_active: bool,
}

/// Composes catalogue notifications and hands them to the transport
///
/// Delivery never fails the caller: problems are logged and swallowed.
pub struct RegistrationMailer {
    transport: Arc<dyn MailTransport>,
    catalogue: CatalogueConfig,
    config: MailConfig,
}

impl RegistrationMailer {
    pub fn new(transport: Arc<dyn MailTransport>, catalogue: CatalogueConfig, config: MailConfig) -> Self {
        Self {
            transport,
            catalogue,
            config,
        }
    }

    fn subject(&self, text: &str) -> String {
        format!("[{} Portal] {}", self.catalogue.name, text)
    }

    fn letter(&self, greeting: &str, paragraphs: &[String]) -> String {
        let mut body = format!("Dear {},\n\n", greeting);
        for paragraph in paragraphs {
            body.push_str(paragraph);
            body.push_str("\n\n");
        }
        body.push_str(&format!("Best Regards,\nthe {} Team", self.catalogue.name));
        body
    }

    /// Recipients of `audience`, or `None` when that kind of mail is muted
    pub fn recipients(&self, audience: &Audience) -> Option<Vec<String>> {
        let addresses = match audience {
            Audience::Team => {
                let mut to: Vec<String> = self.catalogue.onboarding_team.iter().cloned().collect();
                to.push(self.config.registration_to.clone());
                to
            },
            Audience::Portal if self.config.admin_notifications => {
                vec![self.config.registration_to.clone()]
            },
            Audience::Monitoring if self.config.admin_notifications => {
                vec![self.config.monitoring_to.clone()]
            },
            Audience::Provider(emails) if self.config.provider_notifications => emails.clone(),
            _ => return None,
        };

        let mut to: Vec<String> = addresses
            .into_iter()
            .map(|a| a.trim().to_lowercase())
            .filter(|a| !a.is_empty())
            .collect();
        to.sort();
        to.dedup();
        Some(to)
    }

    async fn deliver(&self, audience: Audience, subject: String, body: String) {
        let Some(to) = self.recipients(&audience) else {
            tracing::debug!(?audience, subject = %subject, "Notifications muted for audience");
            return;
        };
        if to.is_empty() {
            tracing::error!(?audience, subject = %subject, "No recipients for mail, not sending");
            return;
        }

        let mail = Mail::new(to, subject, body);
        if let Err(e) = self.transport.send(&mail).await {
            tracing::error!(error = %e, subject = %mail.subject, "Failed to send mail");
        }
    }

    fn onboarding_subject(&self, target: &Onboarding<'_>, team: bool) -> String {
        let pronoun = if team { "The" } else { "Your" };
        let base = self.subject(&format!(
            "{} application for registering [{}]-[{}] as a new {} {}",
            pronoun, target.name, target.id, self.catalogue.name, target.kind
        ));
        if target.status.contains("pending") {
            format!(
                "{} to the {} Portal has been received and {}",
                base,
                self.catalogue.name,
                if team { "should be reviewed" } else { "is under review" }
            )
        } else if target.status.contains("approved") {
            if target.template && !target.provider_active {
                self.subject(&format!("The Provider [{}] has been set to inactive", target.name))
            } else {
                format!("{} has been approved", base)
            }
        } else if target.status.contains("rejected") {
            format!("{} has been rejected", base)
        } else {
            self.subject("Resource Registration")
        }
    }

    async fn onboarding(&self, target: Onboarding<'_>, admins: Vec<String>) {
        let outcome = if target.status.contains("pending") {
            "has been received and is waiting for review"
        } else if target.status.contains("approved") {
            "has been approved"
        } else if target.status.contains("rejected") {
            "has been rejected"
        } else {
            "has changed status"
        };

        let team_body = self.letter(
            &format!("{} Onboarding Team", self.catalogue.name),
            &[format!(
                "The application of [{}]-[{}] as a new {} {}. Current status: {}.",
                target.name, target.id, target.kind, outcome, target.status
            )],
        );
        self.deliver(Audience::Team, self.onboarding_subject(&target, true), team_body)
            .await;

        let provider_body = self.letter(
            &format!("{} administrators", target.name),
            &[
                format!(
                    "Your application for registering [{}]-[{}] as a new {} {}.",
                    target.name, target.id, target.kind, outcome
                ),
                format!("You can follow its progress at {}.", self.catalogue.homepage),
            ],
        );
        self.deliver(
            Audience::Provider(admins),
            self.onboarding_subject(&target, false),
            provider_body,
        )
        .await;
    }

    /// A provider was registered or verified
    pub async fn provider_onboarding(&self, provider: &ProviderBundle) {
        let target = Onboarding {
            name: provider.name(),
            id: &provider.id,
            kind: "Provider",
            status: provider.status().unwrap_or_default(),
            template: false,
            provider_active: provider.active,
        };
        self.onboarding(target, provider.payload.user_emails()).await;
    }

    /// The provider's first resource changed template status
    pub async fn template_onboarding(&self, provider: &ProviderBundle) {
        let target = Onboarding {
            name: provider.name(),
            id: &provider.id,
            kind: "Resource",
            status: provider.template_status.as_deref().unwrap_or_default(),
            template: true,
            provider_active: provider.active,
        };
        self.onboarding(target, provider.payload.user_emails()).await;
    }

    pub async fn admins_added(&self, provider: &ProviderBundle, emails: &[String]) {
        if emails.is_empty() {
            return;
        }
        let subject = self.subject(&format!(
            "Your email has been added as an Administrator for the Provider '{}'",
            provider.name()
        ));
        let body = self.letter(
            "user",
            &[format!(
                "You have been added as an administrator of the Provider [{}]-[{}]. You can now manage it at {}.",
                provider.name(),
                provider.id,
                self.catalogue.homepage
            )],
        );
        self.deliver(Audience::Provider(emails.to_vec()), subject, body).await;
    }

    pub async fn admins_removed(&self, provider: &ProviderBundle, emails: &[String]) {
        if emails.is_empty() {
            return;
        }
        let subject = self.subject(&format!(
            "Your email has been deleted from the Administration Team of the Provider '{}'",
            provider.name()
        ));
        let body = self.letter(
            "user",
            &[format!(
                "You are no longer an administrator of the Provider [{}]-[{}].",
                provider.name(),
                provider.id
            )],
        );
        self.deliver(Audience::Provider(emails.to_vec()), subject, body).await;
    }

    pub async fn deletion_request(&self, provider: &ProviderBundle, requested_by: &str) {
        let body = self.letter(
            &format!("{} Team", self.catalogue.name),
            &[format!(
                "User '{}' asked for the Provider [{}]-[{}] to be deleted.",
                requested_by,
                provider.name(),
                provider.id
            )],
        );
        self.deliver(Audience::Team, self.subject("Provider Deletion Request"), body)
            .await;
    }

    pub async fn provider_deleted(&self, provider: &ProviderBundle) {
        let subject = self.subject(&format!(
            "Your Provider [{}]-[{}] has been Deleted",
            provider.name(),
            provider.id
        ));
        let body = self.letter(
            &format!("{} administrators", provider.name()),
            &[format!(
                "The Provider [{}]-[{}] and all of its resources have been deleted from the {} Portal.",
                provider.name(),
                provider.id,
                self.catalogue.name
            )],
        );
        self.deliver(Audience::Provider(provider.payload.user_emails()), subject, body)
            .await;
    }

    /// A provider or one of its resources was audited
    pub async fn audited<T: ResourcePayload>(&self, bundle: &Bundle<T>, provider: &ProviderBundle) {
        let subject = self.subject(&format!(
            "Your {} [{}]-[{}] has been audited by the EPOT team",
            T::DISPLAY_NAME,
            bundle.name(),
            bundle.id
        ));
        let outcome = bundle
            .latest_audit_info
            .as_ref()
            .map(|info| info.action_type.as_str())
            .unwrap_or("audited");
        let mut paragraphs = vec![format!(
            "The {} [{}]-[{}] has been audited and marked as {}.",
            T::DISPLAY_NAME,
            bundle.name(),
            bundle.id,
            outcome
        )];
        if let Some(comment) = bundle.latest_audit_info.as_ref().and_then(|i| i.comment.as_ref()) {
            paragraphs.push(format!("Comment: {}", comment));
        }
        let body = self.letter(&format!("{} administrators", provider.name()), &paragraphs);
        self.deliver(Audience::Provider(provider.payload.user_emails()), subject, body)
            .await;
    }

    /// A bundle whose latest audit was invalid has been updated
    pub async fn invalid_update<T: ResourcePayload>(&self, bundle: &Bundle<T>) {
        let subject = self.subject(&format!(
            "The {} [{}]-[{}] previously marked as [invalid] has been updated",
            T::DISPLAY_NAME,
            bundle.name(),
            bundle.id
        ));
        let body = self.letter(
            &format!("{} Team", self.catalogue.name),
            &[format!(
                "The {} [{}]-[{}] was audited as invalid and has since been updated. Please audit it again.",
                T::DISPLAY_NAME,
                bundle.name(),
                bundle.id
            )],
        );
        self.deliver(Audience::Team, subject, body).await;
    }

    pub async fn datasource_created(&self, datasource: &DatasourceBundle, provider: &ProviderBundle) {
        let subject = self.subject(&format!(
            "The Provider [{}] has created a new Datasource Extension",
            provider.name()
        ));
        let body = self.letter(
            &format!("{} Team", self.catalogue.name),
            &[format!(
                "The Provider [{}]-[{}] has created a new Datasource Extension [{}] for the Service [{}].",
                provider.name(),
                provider.id,
                datasource.id,
                datasource.payload.service_id
            )],
        );
        self.deliver(Audience::Team, subject, body).await;
    }

    pub async fn datasource_updated(&self, datasource: &DatasourceBundle, provider: &ProviderBundle) {
        let subject = self.subject(&format!(
            "The Provider [{}] updated its Datasource Extension",
            provider.name()
        ));
        let body = self.letter(
            &format!("{} Team", self.catalogue.name),
            &[format!(
                "The Provider [{}]-[{}] updated the Datasource Extension [{}] of the Service [{}].",
                provider.name(),
                provider.id,
                datasource.id,
                datasource.payload.service_id
            )],
        );
        self.deliver(Audience::Team, subject, body).await;
    }

    /// A resource outside the template flow was registered and waits for review
    pub async fn resource_received<T: ResourcePayload>(&self, bundle: &Bundle<T>, provider: &ProviderBundle) {
        let subject = self.subject(&format!(
            "The Provider [{}] has created a new {} [{}]",
            provider.name(),
            T::DISPLAY_NAME,
            bundle.name()
        ));
        let monitoring_body = self.letter(
            &format!("{} Team", self.catalogue.name),
            &[format!(
                "The Provider [{}]-[{}] registered the {} [{}]-[{}]. It is waiting for review.",
                provider.name(),
                provider.id,
                T::DISPLAY_NAME,
                bundle.name(),
                bundle.id
            )],
        );
        self.deliver(Audience::Monitoring, subject, monitoring_body).await;

        let subject = self.subject(&format!(
            "Your {} [{}]-[{}] has been received",
            T::DISPLAY_NAME,
            bundle.name(),
            bundle.id
        ));
        let provider_body = self.letter(
            &format!("{} administrators", provider.name()),
            &[format!(
                "Your {} [{}]-[{}] has been received and is under review.",
                T::DISPLAY_NAME,
                bundle.name(),
                bundle.id
            )],
        );
        self.deliver(Audience::Provider(provider.payload.user_emails()), subject, provider_body)
            .await;
    }

    /// Reminds a provider that it still has to submit its first resource
    pub async fn onboarding_reminder(&self, provider: &ProviderBundle) {
        let body = self.letter(
            &format!("{} administrators", provider.name()),
            &[
                format!(
                    "Your Provider [{}]-[{}] has been approved, but it has not registered any resource yet.",
                    provider.name(),
                    provider.id
                ),
                format!("You can add your first resource at {}.", self.catalogue.homepage),
            ],
        );
        self.deliver(
            Audience::Provider(provider.payload.user_emails()),
            self.subject("Friendly reminder for your Provider"),
            body,
        )
        .await;
    }

    /// Lists providers waiting for the portal administrators
    pub async fn admin_onboarding_digest(
        &self,
        pending_providers: &[ProviderBundle],
        pending_templates: &[ProviderBundle],
    ) {
        if pending_providers.is_empty() && pending_templates.is_empty() {
            tracing::debug!("No providers pending approval");
            return;
        }
        let list = |providers: &[ProviderBundle]| {
            providers
                .iter()
                .map(|p| format!("- [{}]-[{}]", p.name(), p.id))
                .collect::<Vec<_>>()
                .join("\n")
        };
        let mut paragraphs = Vec::new();
        if !pending_providers.is_empty() {
            paragraphs.push(format!("Providers pending approval:\n{}", list(pending_providers)));
        }
        if !pending_templates.is_empty() {
            paragraphs.push(format!(
                "Providers with a resource template pending approval:\n{}",
                list(pending_templates)
            ));
        }
        let body = self.letter(&format!("{} Portal Admins", self.catalogue.name), &paragraphs);
        self.deliver(
            Audience::Portal,
            self.subject("Some new Providers are pending for your approval"),
            body,
        )
        .await;
    }

    /// Sent only when `digest` recorded any change
    pub async fn daily_digest(&self, digest: &DailyDigest) {
        if digest.is_empty() {
            tracing::debug!("Nothing changed yesterday, skipping daily digest");
            return;
        }
        let body = self.letter(
            &format!("{} Portal Admins", self.catalogue.name),
            &digest.paragraphs(),
        );
        self.deliver(
            Audience::Portal,
            self.subject("Daily Notification - Changes to Resources"),
            body,
        )
        .await;
    }
}
