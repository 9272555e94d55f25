//! Authenticated HTTP pipeline shared by every operation group.

mod error;
mod lro;

use std::fmt;
use std::sync::{Arc, LazyLock};
use std::time::Duration;

use reqwest::header::{HeaderMap, LOCATION};
use reqwest::{Method, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::auth::TokenProvider;
use crate::config::ArmConfig;
use crate::models::{CloudError, Page};
use crate::operations::{
    AvailabilitySets, NetworkInterfaces, PublicIpAddresses, ResourceGroups, StorageAccounts,
    VirtualMachineScaleSets, VirtualMachines, VirtualNetworks,
};

pub use error::ArmError;
pub use lro::operation_id_from_url;

const HTTP_TIMEOUT: Duration = Duration::from_secs(30);
const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);
const DEFAULT_LRO_TIMEOUT: Duration = Duration::from_secs(500);
const DEFAULT_MAX_RETRIES: u32 = 3;

/// Header carrying the status URL of an asynchronous operation.
pub const AZURE_ASYNC_OPERATION: &str = "azure-asyncoperation";
const REQUEST_ID: &str = "x-ms-request-id";
const CLIENT_REQUEST_ID: &str = "x-ms-client-request-id";

pub(crate) static HTTP_CLIENT: LazyLock<reqwest::Client> = LazyLock::new(|| {
    reqwest::Client::builder()
        .timeout(HTTP_TIMEOUT)
        .build()
        .unwrap_or_else(|_| reqwest::Client::new())
});

/// Response of a single request, with the headers callers act upon.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ArmResponse<T> {
    /// HTTP status code.
    pub status: StatusCode,
    /// Decoded body.
    pub body: T,
    /// Status URL of the operation started by the request.
    pub azure_async_operation: Option<String>,
    /// Polling or created-resource URL.
    pub location: Option<String>,
    /// Provider side request id, useful when filing support tickets.
    pub request_id: Option<String>,
}

impl<T> ArmResponse<T> {
    /// Discards headers and returns the body.
    pub fn into_body(self) -> T {
        self.body
    }

    /// Returns the `Azure-AsyncOperation` URL.
    ///
    /// # Errors
    ///
    /// Returns [`ArmError::MissingHeader`] when the header was absent.
    pub fn async_operation_url(&self) -> Result<&str, ArmError> {
        self.azure_async_operation
            .as_deref()
            .ok_or_else(|| ArmError::MissingHeader {
                header: String::from("Azure-AsyncOperation"),
            })
    }

    /// Returns the `Location` URL.
    ///
    /// # Errors
    ///
    /// Returns [`ArmError::MissingHeader`] when the header was absent.
    pub fn location_url(&self) -> Result<&str, ArmError> {
        self.location
            .as_deref()
            .ok_or_else(|| ArmError::MissingHeader {
                header: String::from("Location"),
            })
    }
}

/// Status, headers and undecoded body of a response.
pub(crate) struct RawResponse {
    status: StatusCode,
    body: Vec<u8>,
    azure_async_operation: Option<String>,
    location: Option<String>,
    request_id: Option<String>,
}

impl RawResponse {
    fn header(headers: &HeaderMap, name: &str) -> Option<String> {
        headers
            .get(name)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned)
    }

    pub(crate) const fn status(&self) -> StatusCode {
        self.status
    }

    /// Maps a non-success status to [`ArmError::Api`], decoding the provider's
    /// error envelope when present.
    pub(crate) fn error_for_status(self) -> Result<Self, ArmError> {
        if self.status.is_success() {
            return Ok(self);
        }
        let (code, message) = match serde_json::from_slice::<CloudError>(&self.body) {
            Ok(envelope) => (envelope.error.code, envelope.error.message),
            Err(_) => (
                self.status
                    .canonical_reason()
                    .unwrap_or("Unknown")
                    .to_owned(),
                String::from_utf8_lossy(&self.body).into_owned(),
            ),
        };
        Err(ArmError::Api {
            status: self.status.as_u16(),
            code,
            message,
        })
    }

    /// Decodes the body; an empty body decodes as JSON `null`.
    pub(crate) fn decode<T: DeserializeOwned>(self) -> Result<ArmResponse<T>, ArmError> {
        let bytes: &[u8] = if self.body.iter().all(u8::is_ascii_whitespace) {
            b"null"
        } else {
            &self.body
        };
        let body = serde_json::from_slice(bytes).map_err(|err| ArmError::Decode {
            message: err.to_string(),
        })?;
        Ok(ArmResponse {
            status: self.status,
            body,
            azure_async_operation: self.azure_async_operation,
            location: self.location,
            request_id: self.request_id,
        })
    }

    /// Drops the body, keeping status and headers.
    pub(crate) fn empty(self) -> ArmResponse<()> {
        ArmResponse {
            status: self.status,
            body: (),
            azure_async_operation: self.azure_async_operation,
            location: self.location,
            request_id: self.request_id,
        }
    }
}

/// Client for the Resource Manager REST API, scoped to one subscription.
#[derive(Clone)]
pub struct ArmClient {
    http: reqwest::Client,
    base_url: String,
    subscription_id: String,
    credential: Arc<dyn TokenProvider>,
    poll_interval: Duration,
    lro_timeout: Duration,
    max_retries: u32,
}

impl fmt::Debug for ArmClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArmClient")
            .field("base_url", &self.base_url)
            .field("subscription_id", &self.subscription_id)
            .field("credential", &self.credential)
            .field("poll_interval", &self.poll_interval)
            .field("lro_timeout", &self.lro_timeout)
            .field("max_retries", &self.max_retries)
            .finish_non_exhaustive()
    }
}

impl ArmClient {
    /// Builds a client from validated configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ArmError::Config`] when the configuration is incomplete.
    pub fn new(config: &ArmConfig) -> Result<Self, ArmError> {
        config.validate()?;
        Self::builder()
            .base_url(config.effective_base_url())
            .subscription_id(config.effective_subscription_id()?)
            .credential(config.credential()?)
            .poll_interval(config.lro_poll_interval())
            .lro_timeout(config.lro_timeout())
            .max_retries(config.max_retries)
            .build()
    }

    /// Starts a builder with default timings.
    #[must_use]
    pub fn builder() -> ArmClientBuilder {
        ArmClientBuilder::default()
    }

    /// Subscription every resource path is scoped to.
    #[must_use]
    pub fn subscription_id(&self) -> &str {
        &self.subscription_id
    }

    /// Endpoint requests are sent to.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Resource groups of the subscription.
    #[must_use]
    pub const fn resource_groups(&self) -> ResourceGroups<'_> {
        ResourceGroups::new(self)
    }

    /// Virtual machines.
    #[must_use]
    pub const fn virtual_machines(&self) -> VirtualMachines<'_> {
        VirtualMachines::new(self)
    }

    /// Availability sets.
    #[must_use]
    pub const fn availability_sets(&self) -> AvailabilitySets<'_> {
        AvailabilitySets::new(self)
    }

    /// Virtual machine scale sets.
    #[must_use]
    pub const fn virtual_machine_scale_sets(&self) -> VirtualMachineScaleSets<'_> {
        VirtualMachineScaleSets::new(self)
    }

    /// Storage accounts.
    #[must_use]
    pub const fn storage_accounts(&self) -> StorageAccounts<'_> {
        StorageAccounts::new(self)
    }

    /// Virtual networks.
    #[must_use]
    pub const fn virtual_networks(&self) -> VirtualNetworks<'_> {
        VirtualNetworks::new(self)
    }

    /// Public IP addresses.
    #[must_use]
    pub const fn public_ip_addresses(&self) -> PublicIpAddresses<'_> {
        PublicIpAddresses::new(self)
    }

    /// Network interfaces.
    #[must_use]
    pub const fn network_interfaces(&self) -> NetworkInterfaces<'_> {
        NetworkInterfaces::new(self)
    }

    /// `/subscriptions/{id}` prefix shared by every resource path.
    pub(crate) fn subscription_path(&self) -> String {
        format!("/subscriptions/{}", self.subscription_id)
    }

    fn url(&self, path_or_url: &str) -> String {
        if path_or_url.starts_with("http://") || path_or_url.starts_with("https://") {
            path_or_url.to_owned()
        } else {
            format!("{}{path_or_url}", self.base_url)
        }
    }

    /// Sends one request, re-sending it when the connection could not be
    /// established. Status codes are not interpreted.
    pub(crate) async fn send_raw(
        &self,
        method: Method,
        path_or_url: &str,
        query: &[(&str, &str)],
        body: Option<&serde_json::Value>,
    ) -> Result<RawResponse, ArmError> {
        let url = self.url(path_or_url);
        let token = self.credential.token().await?;
        let mut attempt = 0;
        let response = loop {
            let mut request = self
                .http
                .request(method.clone(), &url)
                .bearer_auth(&token.secret)
                .header(CLIENT_REQUEST_ID, Uuid::new_v4().to_string());
            if !query.is_empty() {
                request = request.query(query);
            }
            if let Some(payload) = body {
                request = request.json(payload);
            }

            match request.send().await {
                Ok(response) => break response,
                Err(err) if err.is_connect() && attempt < self.max_retries => {
                    attempt += 1;
                    warn!(%method, %url, attempt, error = %err, "retrying after connection failure");
                }
                Err(err) => {
                    return Err(ArmError::Transport {
                        message: err.to_string(),
                    });
                }
            }
        };

        let status = response.status();
        let headers = response.headers().clone();
        let body = response
            .bytes()
            .await
            .map_err(|err| ArmError::Transport {
                message: err.to_string(),
            })?
            .to_vec();
        debug!(%method, %url, status = status.as_u16(), "request completed");

        Ok(RawResponse {
            status,
            body,
            azure_async_operation: RawResponse::header(&headers, AZURE_ASYNC_OPERATION),
            location: RawResponse::header(&headers, LOCATION.as_str()),
            request_id: RawResponse::header(&headers, REQUEST_ID),
        })
    }

    /// Sends a request with `api-version` and decodes a successful JSON body.
    pub(crate) async fn request<T, B>(
        &self,
        method: Method,
        path: &str,
        api_version: &str,
        extra_query: &[(&str, &str)],
        body: Option<&B>,
    ) -> Result<ArmResponse<T>, ArmError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let payload = encode(body)?;
        let query = with_api_version(api_version, extra_query);
        self.send_raw(method, path, &query, payload.as_ref())
            .await?
            .error_for_status()?
            .decode()
    }

    /// Sends a request with `api-version` whose response body is irrelevant.
    pub(crate) async fn request_empty<B>(
        &self,
        method: Method,
        path: &str,
        api_version: &str,
        body: Option<&B>,
    ) -> Result<ArmResponse<()>, ArmError>
    where
        B: Serialize + ?Sized,
    {
        let payload = encode(body)?;
        let query = with_api_version(api_version, &[]);
        Ok(self
            .send_raw(method, path, &query, payload.as_ref())
            .await?
            .error_for_status()?
            .empty())
    }

    /// Collects every page of a list operation by following `nextLink`.
    pub(crate) async fn list_all<T: DeserializeOwned>(
        &self,
        path: &str,
        api_version: &str,
    ) -> Result<Vec<T>, ArmError> {
        let first: Page<T> = self
            .request::<Page<T>, ()>(Method::GET, path, api_version, &[], None)
            .await?
            .into_body();
        let mut items = first.value;
        let mut next = first.next_link;
        while let Some(link) = next {
            let page: Page<T> = self
                .send_raw(Method::GET, &link, &[], None)
                .await?
                .error_for_status()?
                .decode()?
                .into_body();
            items.extend(page.value);
            next = page.next_link;
        }
        Ok(items)
    }
}

fn encode<B: Serialize + ?Sized>(body: Option<&B>) -> Result<Option<serde_json::Value>, ArmError> {
    body.map(serde_json::to_value)
        .transpose()
        .map_err(|err| ArmError::Encode {
            message: err.to_string(),
        })
}

fn with_api_version<'a>(
    api_version: &'a str,
    extra_query: &[(&'a str, &'a str)],
) -> Vec<(&'a str, &'a str)> {
    let mut query = Vec::with_capacity(extra_query.len() + 1);
    query.push(("api-version", api_version));
    query.extend_from_slice(extra_query);
    query
}

/// Builder for [`ArmClient`].
#[derive(Default)]
pub struct ArmClientBuilder {
    base_url: Option<String>,
    subscription_id: Option<String>,
    credential: Option<Arc<dyn TokenProvider>>,
    poll_interval: Option<Duration>,
    lro_timeout: Option<Duration>,
    max_retries: Option<u32>,
}

impl ArmClientBuilder {
    /// Sets the endpoint; a trailing slash is ignored.
    #[must_use]
    pub fn base_url(mut self, value: impl Into<String>) -> Self {
        self.base_url = Some(value.into());
        self
    }

    /// Sets the subscription.
    #[must_use]
    pub fn subscription_id(mut self, value: impl Into<String>) -> Self {
        self.subscription_id = Some(value.into());
        self
    }

    /// Sets the token provider.
    #[must_use]
    pub fn credential(mut self, value: Arc<dyn TokenProvider>) -> Self {
        self.credential = Some(value);
        self
    }

    /// Sets the delay between two polls of a long-running operation.
    #[must_use]
    pub const fn poll_interval(mut self, value: Duration) -> Self {
        self.poll_interval = Some(value);
        self
    }

    /// Sets the time after which polling gives up.
    #[must_use]
    pub const fn lro_timeout(mut self, value: Duration) -> Self {
        self.lro_timeout = Some(value);
        self
    }

    /// Sets how often a request is re-sent after a connection failure.
    #[must_use]
    pub const fn max_retries(mut self, value: u32) -> Self {
        self.max_retries = Some(value);
        self
    }

    /// Builds the client.
    ///
    /// # Errors
    ///
    /// Returns [`ArmError::Config`] when the endpoint, subscription or
    /// credential is missing.
    pub fn build(self) -> Result<ArmClient, ArmError> {
        let base_url = self
            .base_url
            .map(|url| url.trim().trim_end_matches('/').to_owned())
            .filter(|url| !url.is_empty())
            .ok_or_else(|| ArmError::Config(String::from("base_url is required")))?;
        let subscription_id = self
            .subscription_id
            .map(|id| id.trim().to_owned())
            .filter(|id| !id.is_empty())
            .ok_or_else(|| ArmError::Config(String::from("subscription_id is required")))?;
        let credential = self
            .credential
            .ok_or_else(|| ArmError::Config(String::from("credential is required")))?;
        Ok(ArmClient {
            http: HTTP_CLIENT.clone(),
            base_url,
            subscription_id,
            credential,
            poll_interval: self.poll_interval.unwrap_or(DEFAULT_POLL_INTERVAL),
            lro_timeout: self.lro_timeout.unwrap_or(DEFAULT_LRO_TIMEOUT),
            max_retries: self.max_retries.unwrap_or(DEFAULT_MAX_RETRIES),
        })
    }
}

#[cfg(test)]
mod tests;
