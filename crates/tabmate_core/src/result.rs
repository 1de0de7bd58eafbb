use serde::{Deserialize, Serialize};

use crate::TabRecord;

/// Error record for a URL that could not be fetched or classified.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchFailure {
    pub status: FailureStatus,
    pub message: String,
    pub url: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailureStatus {
    Error,
}

/// Outcome for exactly one input URL.
///
/// Serialized untagged: a success is the bare tab record, a failure is
/// `{"status": "error", "message": ..., "url": ...}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FetchResult {
    Failure(FetchFailure),
    Success(TabRecord),
}

impl FetchResult {
    pub fn failure(url: impl Into<String>, message: impl Into<String>) -> Self {
        FetchResult::Failure(FetchFailure {
            status: FailureStatus::Error,
            message: message.into(),
            url: url.into(),
        })
    }

    pub fn url(&self) -> &str {
        match self {
            FetchResult::Success(record) => &record.url,
            FetchResult::Failure(failure) => &failure.url,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, FetchResult::Success(_))
    }

    pub fn as_record(&self) -> Option<&TabRecord> {
        match self {
            FetchResult::Success(record) => Some(record),
            FetchResult::Failure(_) => None,
        }
    }
}
