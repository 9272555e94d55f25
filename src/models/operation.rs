//! Long-running operation status, error envelope and paging models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Error detail returned by the provider.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct OperationError {
    /// Machine readable code.
    #[serde(default)]
    pub code: String,
    /// Human readable message.
    #[serde(default)]
    pub message: String,
    /// Element the error refers to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    /// Nested errors.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub details: Vec<Self>,
}

/// Body of a failed request: `{"error": {...}}`.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct CloudError {
    /// Error detail.
    pub error: OperationError,
}

/// Classification of an operation status string.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum OperationState {
    /// Still running.
    InProgress,
    /// Completed successfully.
    Succeeded,
    /// Completed with an error.
    Failed,
    /// Cancelled before completion.
    Canceled,
    /// A status this client does not recognise. Treated as still running.
    Other(String),
}

impl OperationState {
    /// Parses a status string case-insensitively.
    #[must_use]
    pub fn parse(status: &str) -> Self {
        match status.to_ascii_lowercase().as_str() {
            "inprogress" => Self::InProgress,
            "succeeded" => Self::Succeeded,
            "failed" => Self::Failed,
            "canceled" | "cancelled" => Self::Canceled,
            _ => Self::Other(status.to_owned()),
        }
    }

    /// Returns `true` once the operation can no longer change.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Succeeded | Self::Failed | Self::Canceled)
    }
}

/// Status document served by an `Azure-AsyncOperation` URL.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationStatus {
    /// Tracking id of the operation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Raw status string.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// Start of the operation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time: Option<DateTime<Utc>>,
    /// End of the operation, once terminal.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<DateTime<Utc>>,
    /// Failure detail, when the operation failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<OperationError>,
}

impl OperationStatus {
    /// Tracking id, which is also the last path segment of the status URL.
    #[must_use]
    pub fn tracking_operation_id(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Classified status; a missing status counts as in progress.
    #[must_use]
    pub fn state(&self) -> OperationState {
        self.status
            .as_deref()
            .map_or(OperationState::InProgress, OperationState::parse)
    }
}

/// One page of a list response.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    /// Items on this page.
    #[serde(default = "Vec::new")]
    pub value: Vec<T>,
    /// URL of the next page.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_link: Option<String>,
}
