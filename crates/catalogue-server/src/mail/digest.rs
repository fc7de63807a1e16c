//! What changed in the catalogue during one day

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, NaiveTime, Utc};

use catalogue_common::time::millis_or_zero;

use crate::domain::{Bundle, LoggingInfo, ResourcePayload};
use crate::search::FacetFilter;
use crate::store::{Repositories, StoreResult};

/// Half-open range `[start, end)` of epoch milliseconds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DigestWindow {
    pub start: i64,
    pub end: i64,
}

impl DigestWindow {
    /// The UTC day before `now`
    pub fn yesterday(now: DateTime<Utc>) -> Self {
        let today = now.date_naive().and_time(NaiveTime::MIN).and_utc();
        let yesterday = today - Duration::days(1);
        Self {
            start: yesterday.timestamp_millis(),
            end: today.timestamp_millis(),
        }
    }

    pub fn contains(&self, millis: i64) -> bool {
        millis >= self.start && millis < self.end
    }

    fn contains_str(&self, millis: &str) -> bool {
        self.contains(millis_or_zero(millis))
    }
}

/// Changes to one kind of bundle
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BundleChanges {
    pub new: Vec<String>,
    pub updated: Vec<String>,
    /// History entries dated inside the window, by bundle id
    pub logs: BTreeMap<String, Vec<LoggingInfo>>,
}

impl BundleChanges {
    pub fn collect<T: ResourcePayload>(bundles: &[Bundle<T>], window: DigestWindow) -> Self {
        let mut changes = Self::default();
        for bundle in bundles {
            if let Some(metadata) = &bundle.metadata {
                if window.contains_str(&metadata.registered_at) {
                    changes.new.push(bundle.id.clone());
                } else if window.contains_str(&metadata.modified_at) {
                    changes.updated.push(bundle.id.clone());
                }
            }
            let entries: Vec<LoggingInfo> = bundle
                .logging_info
                .iter()
                .filter(|entry| window.contains(entry.timestamp()))
                .cloned()
                .collect();
            if !entries.is_empty() {
                changes.logs.insert(bundle.id.clone(), entries);
            }
        }
        changes.new.sort();
        changes.updated.sort();
        changes
    }

    pub fn is_empty(&self) -> bool {
        self.new.is_empty() && self.updated.is_empty() && self.logs.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DailyDigest {
    pub sections: Vec<(&'static str, BundleChanges)>,
}

async fn changes_of<T: ResourcePayload>(
    repos: &Repositories,
    window: DigestWindow,
) -> StoreResult<BundleChanges> {
    let filter = FacetFilter::all().with_filter("published", "false");
    let bundles = repos.of::<Bundle<T>>().all(&filter).await?;
    Ok(BundleChanges::collect(&bundles, window))
}

impl DailyDigest {
    /// Unpublished providers, services, training resources and
    /// interoperability records
    pub async fn build(repos: &Repositories, window: DigestWindow) -> StoreResult<Self> {
        use crate::domain::{InteroperabilityRecord, Provider, Service, TrainingResource};

        Ok(Self {
            sections: vec![
                ("Providers", changes_of::<Provider>(repos, window).await?),
                ("Services", changes_of::<Service>(repos, window).await?),
                ("Training Resources", changes_of::<TrainingResource>(repos, window).await?),
                (
                    "Interoperability Records",
                    changes_of::<InteroperabilityRecord>(repos, window).await?,
                ),
            ],
        })
    }

    pub fn is_empty(&self) -> bool {
        self.sections.iter().all(|(_, changes)| changes.is_empty())
    }

    pub(crate) fn paragraphs(&self) -> Vec<String> {
        self.sections
            .iter()
            .filter(|(_, changes)| !changes.is_empty())
            .map(|(title, changes)| {
                let mut lines = vec![format!("{}:", title)];
                if !changes.new.is_empty() {
                    lines.push(format!("New: {}", changes.new.join(", ")));
                }
                if !changes.updated.is_empty() {
                    lines.push(format!("Updated: {}", changes.updated.join(", ")));
                }
                for (id, entries) in &changes.logs {
                    for entry in entries {
                        lines.push(format!(
                            "- {}: {}/{} by {}",
                            id,
                            entry.kind.as_str(),
                            entry.action_type,
                            entry.user_email.as_deref().unwrap_or("unknown")
                        ));
                    }
                }
                lines.join("\n")
            })
            .collect()
    }
}
