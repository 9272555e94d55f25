//! Long-running operation polling.
//!
//! Polling re-checks the status URL at a fixed interval until the operation
//! reaches a terminal state or the client's timeout elapses.

use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use tokio::time::{Instant, sleep};
use tracing::{debug, info};

use crate::models::{OperationState, OperationStatus};

use super::{ArmClient, ArmError, ArmResponse};

/// Extracts the operation id from a status URL: the last path segment,
/// without the query string.
///
/// ```
/// use arm_compute::client::operation_id_from_url;
///
/// let url = "https://management.azure.com/subscriptions/s/providers/Microsoft.Compute/locations/westus/operations/abc-123?api-version=2019-11-01";
/// assert_eq!(operation_id_from_url(url), Some("abc-123"));
/// ```
#[must_use]
pub fn operation_id_from_url(url: &str) -> Option<&str> {
    let without_query = url.split_once('?').map_or(url, |(path, _)| path);
    without_query
        .rsplit('/')
        .next()
        .filter(|segment| !segment.is_empty())
}

impl ArmClient {
    /// Fetches the current status of the operation behind an
    /// `Azure-AsyncOperation` URL.
    ///
    /// # Errors
    ///
    /// Returns [`ArmError`] when the request fails or the body is not an
    /// operation status.
    pub async fn long_running_operation_status(
        &self,
        url: &str,
    ) -> Result<OperationStatus, ArmError> {
        self.send_raw(Method::GET, url, &[], None)
            .await?
            .error_for_status()?
            .decode()
            .map(ArmResponse::into_body)
    }

    /// Polls an `Azure-AsyncOperation` URL until the operation succeeds.
    ///
    /// # Errors
    ///
    /// Returns [`ArmError::OperationFailed`] when the operation fails or is
    /// cancelled, and [`ArmError::OperationTimeout`] when it is still running
    /// once the client's timeout elapses.
    pub async fn wait_for_operation(&self, url: &str) -> Result<OperationStatus, ArmError> {
        let started = Instant::now();
        let deadline = started + self.lro_timeout;

        while Instant::now() <= deadline {
            let status = self.long_running_operation_status(url).await?;
            match status.state() {
                OperationState::Succeeded => {
                    info!(
                        operation = status.tracking_operation_id().unwrap_or_default(),
                        "operation succeeded"
                    );
                    return Ok(status);
                }
                OperationState::Failed | OperationState::Canceled => {
                    return Err(Self::operation_failed(url, status));
                }
                state => {
                    debug!(%url, ?state, "operation still running");
                }
            }
            sleep(self.poll_interval).await;
        }

        Err(ArmError::OperationTimeout {
            url: url.to_owned(),
            waited_secs: started.elapsed().as_secs(),
        })
    }

    /// Polls a `Location` URL until it stops answering `202 Accepted`, then
    /// decodes the final body.
    ///
    /// # Errors
    ///
    /// Returns [`ArmError::OperationTimeout`] when the URL still answers
    /// `202` once the client's timeout elapses, or any request error.
    pub async fn wait_for_location<T: DeserializeOwned>(
        &self,
        url: &str,
    ) -> Result<ArmResponse<T>, ArmError> {
        let started = Instant::now();
        let deadline = started + self.lro_timeout;

        while Instant::now() <= deadline {
            let response = self
                .send_raw(Method::GET, url, &[], None)
                .await?
                .error_for_status()?;
            if response.status() != StatusCode::ACCEPTED {
                return response.decode();
            }
            debug!(%url, "location still accepted");
            sleep(self.poll_interval).await;
        }

        Err(ArmError::OperationTimeout {
            url: url.to_owned(),
            waited_secs: started.elapsed().as_secs(),
        })
    }

    fn operation_failed(url: &str, status: OperationStatus) -> ArmError {
        let operation_id = status
            .name
            .clone()
            .or_else(|| operation_id_from_url(url).map(str::to_owned))
            .unwrap_or_default();
        let error = status.error.unwrap_or_default();
        ArmError::OperationFailed {
            operation_id,
            status: status.status.unwrap_or_default(),
            code: error.code,
            message: error.message,
        }
    }
}
