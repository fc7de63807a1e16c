use std::collections::{BTreeMap, HashMap};
use std::str::FromStr;
use std::time::Duration;

use chrono::Utc;
use reqwest::{header, Client};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use url::Url;

use super::AnalyticsError;
use crate::config::MatomoConfig;

/// Default timeout for reporting API requests in seconds.
pub const DEFAULT_MATOMO_TIMEOUT_SECS: u64 = 30;

/// First day of the service visits range
const VISITS_SINCE: &str = "2017-01-01";

/// Page url segment in front of a service id
const SERVICE_SEGMENT: &str = "/service/";

/// Granularity of per-label statistics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Interval {
    #[default]
    Day,
    Week,
    Month,
    Year,
}

impl Interval {
    /// Matomo `period` value
    pub fn period(&self) -> &'static str {
        match self {
            Self::Day => "day",
            Self::Week => "week",
            Self::Month => "month",
            Self::Year => "year",
        }
    }
}

impl FromStr for Interval {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "day" => Ok(Self::Day),
            "week" => Ok(Self::Week),
            "month" => Ok(Self::Month),
            "year" => Ok(Self::Year),
            other => Err(format!("Unknown interval '{}'", other)),
        }
    }
}

#[derive(Debug, Deserialize)]
struct PageUrl {
    #[serde(default)]
    label: String,
    #[serde(default)]
    nb_visits: i64,
}

/// Client for `Actions.getPageUrls`
#[derive(Debug, Clone)]
pub struct MatomoClient {
    client: Client,
    base: Url,
    token: String,
    site_id: String,
}

impl MatomoClient {
    pub fn new(config: &MatomoConfig) -> Result<Self, AnalyticsError> {
        let host = config.host.trim_end_matches('/');
        let base = Url::parse(&format!("{}/index.php", host))
            .map_err(|_| AnalyticsError::InvalidHost(config.host.clone()))?;

        let mut headers = header::HeaderMap::new();
        if let Some(auth) = &config.authorization_header {
            let value = header::HeaderValue::from_str(auth)
                .map_err(|e| AnalyticsError::Parse(format!("authorization header: {}", e)))?;
            headers.insert(header::AUTHORIZATION, value);
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(DEFAULT_MATOMO_TIMEOUT_SECS))
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            base,
            token: config.token.clone(),
            site_id: config.site_id.clone(),
        })
    }

    fn page_urls(&self, extra: &[(&str, &str)]) -> Url {
        let mut url = self.base.clone();
        url.query_pairs_mut()
            .append_pair("token_auth", &self.token)
            .append_pair("module", "API")
            .append_pair("method", "Actions.getPageUrls")
            .append_pair("format", "JSON")
            .append_pair("idSite", &self.site_id)
            .append_pair("flat", "1")
            .extend_pairs(extra);
        url
    }

    async fn fetch(&self, url: Url) -> Result<Value, AnalyticsError> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(AnalyticsError::Status(status.as_u16()));
        }
        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| AnalyticsError::Parse(e.to_string()))
    }

    /// Visits per service id since the portal went live
    #[tracing::instrument(skip(self))]
    pub async fn service_visits(&self) -> Result<HashMap<String, i64>, AnalyticsError> {
        let range = format!("{},{}", VISITS_SINCE, Utc::now().format("%Y-%m-%d"));
        let json = self
            .fetch(self.page_urls(&[("period", "range"), ("date", &range)]))
            .await?;
        let pages: Vec<PageUrl> =
            serde_json::from_value(json).map_err(|e| AnalyticsError::Parse(e.to_string()))?;
        Ok(visits_by_service(pages))
    }

    /// Visits of one page label over the last 30 periods, by date
    #[tracing::instrument(skip(self))]
    pub async fn visits_for_label(
        &self,
        label: &str,
        by: Interval,
    ) -> Result<BTreeMap<String, i64>, AnalyticsError> {
        let json = self
            .fetch(self.page_urls(&[
                ("filter_limit", "100"),
                ("period", by.period()),
                ("date", "last30"),
                ("label", label),
            ]))
            .await?;
        let Value::Object(days) = json else {
            return Err(AnalyticsError::Parse("expected an object keyed by date".into()));
        };
        Ok(days
            .into_iter()
            .map(|(date, rows)| {
                let visits = rows
                    .get(0)
                    .and_then(|row| row.get("nb_visits"))
                    .and_then(Value::as_i64)
                    .unwrap_or(0);
                (date, visits)
            })
            .collect())
    }
}

fn visits_by_service(pages: Vec<PageUrl>) -> HashMap<String, i64> {
    let mut visits = HashMap::new();
    for page in pages {
        let mut parts = page.label.split(SERVICE_SEGMENT);
        if let (Some(_), Some(id), None) = (parts.next(), parts.next(), parts.next()) {
            if !id.is_empty() {
                visits.entry(id.to_string()).or_insert(page.nb_visits);
            }
        }
    }
    visits
}
