use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use super::{Mail, MailError};
use crate::config::MailTransportKind;

/// Delivers finished mails
#[async_trait]
pub trait MailTransport: Send + Sync {
    async fn send(&self, mail: &Mail) -> Result<(), MailError>;
}

/// Writes every mail to the log
#[derive(Debug, Default)]
pub struct LogTransport;

#[async_trait]
impl MailTransport for LogTransport {
    async fn send(&self, mail: &Mail) -> Result<(), MailError> {
        tracing::info!(
            to = ?mail.to,
            cc = ?mail.cc,
            subject = %mail.subject,
            body = %mail.body,
            "Sending mail"
        );
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct DisabledTransport;

#[async_trait]
impl MailTransport for DisabledTransport {
    async fn send(&self, mail: &Mail) -> Result<(), MailError> {
        tracing::debug!(subject = %mail.subject, "Mail transport disabled, dropping mail");
        Ok(())
    }
}

/// Keeps sent mails in memory
#[derive(Debug, Default)]
pub struct MemoryTransport {
    sent: Mutex<Vec<Mail>>,
}

impl MemoryTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn sent(&self) -> Vec<Mail> {
        self.sent.lock().await.clone()
    }

    pub async fn subjects(&self) -> Vec<String> {
        self.sent.lock().await.iter().map(|m| m.subject.clone()).collect()
    }

    pub async fn clear(&self) {
        self.sent.lock().await.clear();
    }
}

#[async_trait]
impl MailTransport for MemoryTransport {
    async fn send(&self, mail: &Mail) -> Result<(), MailError> {
        self.sent.lock().await.push(mail.clone());
        Ok(())
    }
}

pub fn transport_for(kind: MailTransportKind) -> Arc<dyn MailTransport> {
    match kind {
        MailTransportKind::Log => Arc::new(LogTransport),
        MailTransportKind::Disabled => Arc::new(DisabledTransport),
    }
}
