//! Registration notifications and the scheduled mailer
//!
//! Nothing here talks SMTP. A [`MailTransport`] decides what happens to a
//! finished [`Mail`]: it is logged, recorded for tests, or dropped.

mod digest;
mod mailer;
mod scheduler;
mod transport;

use serde::Serialize;
use thiserror::Error;

pub use digest::{BundleChanges, DailyDigest, DigestWindow};
pub use mailer::{Audience, RegistrationMailer};
pub use scheduler::MailScheduler;
pub use transport::{transport_for, DisabledTransport, LogTransport, MailTransport, MemoryTransport};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Mail {
    pub to: Vec<String>,
    pub cc: Vec<String>,
    pub subject: String,
    pub body: String,
}

impl Mail {
    pub fn new(to: Vec<String>, subject: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            to,
            cc: Vec::new(),
            subject: subject.into(),
            body: body.into(),
        }
    }
}

#[derive(Error, Debug)]
pub enum MailError {
    #[error("Mail '{0}' has no recipients")]
    NoRecipients(String),

    #[error("Transport failed: {0}")]
    Transport(String),
}
