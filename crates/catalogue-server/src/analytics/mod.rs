//! Visit statistics pulled from Matomo's reporting API

mod cache;
mod client;

use thiserror::Error;

pub use cache::{AnalyticsPoller, VisitsCache};
pub use client::{Interval, MatomoClient};

#[derive(Error, Debug)]
pub enum AnalyticsError {
    #[error("Matomo request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Matomo answered with status {0}")]
    Status(u16),

    #[error("Unexpected Matomo response: {0}")]
    Parse(String),

    #[error("Invalid Matomo host '{0}'")]
    InvalidHost(String),
}
