//! Error types for Resource Manager requests.

use thiserror::Error;

use crate::config::ConfigError;

/// Errors raised while talking to Resource Manager.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum ArmError {
    /// Raised when the client cannot be built from the configuration.
    #[error("configuration error: {0}")]
    Config(String),
    /// Raised when the request never produced a response.
    #[error("transport error: {message}")]
    Transport {
        /// Message returned by the HTTP stack.
        message: String,
    },
    /// Raised when no bearer token could be obtained.
    #[error("authentication failed: {message}")]
    Authentication {
        /// Reason reported by the token endpoint.
        message: String,
    },
    /// Raised when the provider answers with a non-success status.
    #[error("request failed with status {status} ({code}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Provider error code.
        code: String,
        /// Provider error message.
        message: String,
    },
    /// Raised when a request body cannot be encoded.
    #[error("failed to encode request body: {message}")]
    Encode {
        /// Serializer message.
        message: String,
    },
    /// Raised when a response body does not match the expected model.
    #[error("failed to decode response body: {message}")]
    Decode {
        /// Deserializer message.
        message: String,
    },
    /// Raised when a response lacks a header the caller depends on.
    #[error("response is missing the {header} header")]
    MissingHeader {
        /// Header name.
        header: String,
    },
    /// Raised when a long-running operation ends in a failed state.
    #[error("operation {operation_id} finished as {status} ({code}): {message}")]
    OperationFailed {
        /// Tracking id of the operation.
        operation_id: String,
        /// Terminal status.
        status: String,
        /// Provider error code, empty when none was reported.
        code: String,
        /// Provider error message, empty when none was reported.
        message: String,
    },
    /// Raised when a long-running operation outlives the polling timeout.
    #[error("timeout after {waited_secs}s waiting for operation {url}")]
    OperationTimeout {
        /// Status URL being polled.
        url: String,
        /// Seconds spent polling.
        waited_secs: u64,
    },
}

impl ArmError {
    /// HTTP status of an API error.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns `true` for `404 Not Found` answers.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self.status(), Some(404))
    }
}

impl From<ConfigError> for ArmError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value.to_string())
    }
}
