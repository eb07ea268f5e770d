//! Failure records and the `failed-urls.json` report

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// A URL that permanently failed during the run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailureRecord {
    /// Canonical URL that failed
    pub url: String,

    /// Underlying error message
    pub reason: String,

    /// Page the URL was first discovered on, or `Initial URL` for the seed
    pub referrer: String,
}

/// On-disk shape of the failure report
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FailureReport {
    pub total_failed: usize,

    /// ISO-8601 UTC timestamp of when the report was written
    pub timestamp: String,

    pub failed_pages: Vec<FailureRecord>,
}

impl FailureReport {
    /// Builds a report stamped with the current time
    pub fn new(failures: &[FailureRecord]) -> Self {
        Self {
            total_failed: failures.len(),
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            failed_pages: failures.to_vec(),
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
