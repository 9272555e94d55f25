//! Configuration loading via `ortho-config`.

use std::sync::Arc;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;
use thiserror::Error;

use crate::auth::{ServicePrincipal, StaticToken, TokenProvider};

/// Subscription identifier used when the client targets a mock endpoint.
pub const MOCK_SUBSCRIPTION: &str = "00000000-0000-0000-0000-000000000000";

/// Bearer token presented to a mock endpoint.
pub const MOCK_TOKEN: &str = "mock";

/// Resource Manager configuration derived from environment variables,
/// configuration files, and CLI flags.
#[derive(Clone, Debug, Deserialize, OrthoConfig, PartialEq, Eq)]
#[ortho_config(
    prefix = "ARM",
    discovery(
        app_name = "arm-compute",
        env_var = "ARM_CONFIG_PATH",
        config_file_name = "arm-compute.toml",
        dotfile_name = ".arm-compute.toml",
        project_file_name = "arm-compute.toml"
    )
)]
pub struct ArmConfig {
    /// Subscription that owns every resource created by the client.
    pub subscription_id: Option<String>,
    /// Directory (tenant) the service principal belongs to.
    pub tenant_id: Option<String>,
    /// Application id of the service principal.
    pub client_id: Option<String>,
    /// Secret of the service principal.
    pub client_secret: Option<String>,
    /// Pre-issued bearer token. Takes precedence over the service principal.
    pub access_token: Option<String>,
    /// Resource Manager endpoint.
    #[ortho_config(default = "https://management.azure.com".to_owned())]
    pub base_url: String,
    /// Directory endpoint used for the client-credentials grant.
    #[ortho_config(default = "https://login.microsoftonline.com".to_owned())]
    pub authority_url: String,
    /// Audience requested for the access token.
    #[ortho_config(default = "https://management.core.windows.net/".to_owned())]
    pub token_resource: String,
    /// Region for new resources. Spaces are stripped when read, so
    /// `South East Asia` and `SouthEastAsia` are equivalent.
    #[ortho_config(default = "SouthEastAsia".to_owned())]
    pub location: String,
    /// Seconds between two polls of a long-running operation.
    #[ortho_config(default = 5)]
    pub lro_poll_interval_secs: u64,
    /// Seconds after which polling a long-running operation gives up.
    #[ortho_config(default = 500)]
    pub lro_timeout_secs: u64,
    /// Number of times a request is re-sent after a connection failure.
    #[ortho_config(default = 3)]
    pub max_retries: u32,
    /// Mock endpoint. When set, requests go there with a fixed subscription
    /// and token, and resource-group cleanup is skipped.
    pub mock_uri: Option<String>,
    /// Prefix for generated resource-group names.
    #[ortho_config(default = "rusttest".to_owned())]
    pub resource_group_prefix: String,
}

/// Metadata for a configuration field, used to generate actionable error messages.
struct FieldMetadata {
    description: &'static str,
    env_var: &'static str,
    toml_key: &'static str,
}

impl FieldMetadata {
    const fn new(description: &'static str, env_var: &'static str, toml_key: &'static str) -> Self {
        Self {
            description,
            env_var,
            toml_key,
        }
    }

    fn missing(&self) -> ConfigError {
        ConfigError::MissingField(format!(
            "missing {}: set {} or add {} to arm-compute.toml",
            self.description, self.env_var, self.toml_key
        ))
    }
}

const SUBSCRIPTION: FieldMetadata =
    FieldMetadata::new("subscription id", "ARM_SUBSCRIPTION_ID", "subscription_id");
const TENANT: FieldMetadata = FieldMetadata::new("tenant id", "ARM_TENANT_ID", "tenant_id");
const CLIENT_ID: FieldMetadata =
    FieldMetadata::new("service principal client id", "ARM_CLIENT_ID", "client_id");
const CLIENT_SECRET: FieldMetadata = FieldMetadata::new(
    "service principal secret",
    "ARM_CLIENT_SECRET",
    "client_secret",
);
const BASE_URL: FieldMetadata =
    FieldMetadata::new("Resource Manager endpoint", "ARM_BASE_URL", "base_url");
const LOCATION: FieldMetadata = FieldMetadata::new("region", "ARM_LOCATION", "location");
const PREFIX: FieldMetadata = FieldMetadata::new(
    "resource group prefix",
    "ARM_RESOURCE_GROUP_PREFIX",
    "resource_group_prefix",
);

fn present(value: Option<&String>) -> Option<&str> {
    value.map(|inner| inner.trim()).filter(|inner| !inner.is_empty())
}

impl ArmConfig {
    fn require_field(value: &str, metadata: &FieldMetadata) -> Result<(), ConfigError> {
        if value.trim().is_empty() {
            return Err(metadata.missing());
        }
        Ok(())
    }

    fn require_optional<'a>(
        value: Option<&'a String>,
        metadata: &FieldMetadata,
    ) -> Result<&'a str, ConfigError> {
        present(value).ok_or_else(|| metadata.missing())
    }

    /// Loads configuration using the `ortho-config` derive. Values merge
    /// defaults, configuration files, environment variables, and CLI flags in
    /// that order of precedence.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] when the loader fails to merge sources.
    pub fn load_from_sources() -> Result<Self, ConfigError> {
        Self::load().map_err(|err| ConfigError::Parse(err.to_string()))
    }

    /// Loads configuration without attempting to parse CLI arguments. Values
    /// still merge defaults, configuration files, and environment variables.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] when the merge fails.
    pub fn load_without_cli_args() -> Result<Self, ConfigError> {
        Self::load_from_iter([std::ffi::OsString::from("arm-compute")])
            .map_err(|err| ConfigError::Parse(err.to_string()))
    }

    /// Returns `true` when requests are directed at a mock endpoint.
    #[must_use]
    pub fn is_mocked(&self) -> bool {
        present(self.mock_uri.as_ref()).is_some()
    }

    /// Region with embedded spaces removed.
    #[must_use]
    pub fn location(&self) -> String {
        self.location.replace(' ', "")
    }

    /// Endpoint every request is sent to, honouring mock mode.
    #[must_use]
    pub fn effective_base_url(&self) -> String {
        present(self.mock_uri.as_ref())
            .unwrap_or(self.base_url.trim())
            .trim_end_matches('/')
            .to_owned()
    }

    /// Subscription used in resource paths, honouring mock mode.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingField`] when no subscription is
    /// configured outside mock mode.
    pub fn effective_subscription_id(&self) -> Result<String, ConfigError> {
        if self.is_mocked() {
            return Ok(MOCK_SUBSCRIPTION.to_owned());
        }
        Self::require_optional(self.subscription_id.as_ref(), &SUBSCRIPTION).map(str::to_owned)
    }

    /// Polling cadence for long-running operations.
    #[must_use]
    pub const fn lro_poll_interval(&self) -> Duration {
        Duration::from_secs(self.lro_poll_interval_secs)
    }

    /// Upper bound on the time spent polling one long-running operation.
    #[must_use]
    pub const fn lro_timeout(&self) -> Duration {
        Duration::from_secs(self.lro_timeout_secs)
    }

    /// Builds the credential matching the configuration: a fixed token in
    /// mock mode or when `access_token` is set, otherwise a service principal.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingField`] when service-principal
    /// credentials are incomplete.
    pub fn credential(&self) -> Result<Arc<dyn TokenProvider>, ConfigError> {
        if self.is_mocked() {
            return Ok(Arc::new(StaticToken::new(MOCK_TOKEN)));
        }
        if let Some(token) = present(self.access_token.as_ref()) {
            return Ok(Arc::new(StaticToken::new(token)));
        }
        let tenant = Self::require_optional(self.tenant_id.as_ref(), &TENANT)?;
        let client_id = Self::require_optional(self.client_id.as_ref(), &CLIENT_ID)?;
        let secret = Self::require_optional(self.client_secret.as_ref(), &CLIENT_SECRET)?;
        Ok(Arc::new(ServicePrincipal::new(
            self.authority_url.trim(),
            tenant,
            client_id,
            secret,
            self.token_resource.trim(),
        )))
    }

    /// Performs semantic validation on required fields. Error messages include
    /// guidance on how to provide missing values via environment variables or
    /// configuration files.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingField`] when a required field is empty.
    pub fn validate(&self) -> Result<(), ConfigError> {
        Self::require_field(&self.location, &LOCATION)?;
        Self::require_field(&self.resource_group_prefix, &PREFIX)?;
        if self.is_mocked() {
            return Ok(());
        }
        Self::require_field(&self.base_url, &BASE_URL)?;
        Self::require_optional(self.subscription_id.as_ref(), &SUBSCRIPTION)?;
        if present(self.access_token.as_ref()).is_none() {
            Self::require_optional(self.tenant_id.as_ref(), &TENANT)?;
            Self::require_optional(self.client_id.as_ref(), &CLIENT_ID)?;
            Self::require_optional(self.client_secret.as_ref(), &CLIENT_SECRET)?;
        }
        Ok(())
    }
}

/// Errors raised during configuration loading and validation.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum ConfigError {
    /// Indicates a required configuration field is empty or missing.
    #[error("missing configuration field: {0}")]
    MissingField(String),
    /// Surfaces errors from the `ortho-config` loader.
    #[error("configuration parsing failed: {0}")]
    Parse(String),
}

impl From<ortho_config::OrthoError> for ConfigError {
    fn from(value: ortho_config::OrthoError) -> Self {
        Self::Parse(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mocked() -> ArmConfig {
        ArmConfig {
            subscription_id: None,
            tenant_id: None,
            client_id: None,
            client_secret: None,
            access_token: None,
            base_url: String::from("https://management.azure.com"),
            authority_url: String::from("https://login.microsoftonline.com"),
            token_resource: String::from("https://management.core.windows.net/"),
            location: String::from("South East Asia"),
            lro_poll_interval_secs: 5,
            lro_timeout_secs: 500,
            max_retries: 3,
            mock_uri: Some(String::from("http://localhost:8043/")),
            resource_group_prefix: String::from("rusttest"),
        }
    }

    #[test]
    fn location_strips_spaces() {
        assert_eq!(mocked().location(), "SouthEastAsia");
    }

    #[test]
    fn mock_mode_overrides_endpoint_and_subscription() {
        let cfg = mocked();
        assert!(cfg.is_mocked());
        assert_eq!(cfg.effective_base_url(), "http://localhost:8043");
        assert_eq!(
            cfg.effective_subscription_id().as_deref(),
            Ok(MOCK_SUBSCRIPTION)
        );
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn blank_mock_uri_is_not_mock_mode() {
        let cfg = ArmConfig {
            mock_uri: Some(String::from("  ")),
            ..mocked()
        };
        assert!(!cfg.is_mocked());
        assert_eq!(cfg.effective_base_url(), "https://management.azure.com");
    }

    #[test]
    fn access_token_skips_service_principal_fields() {
        let cfg = ArmConfig {
            mock_uri: None,
            subscription_id: Some(String::from("sub")),
            access_token: Some(String::from("token")),
            ..mocked()
        };
        assert!(cfg.validate().is_ok());
        assert!(cfg.credential().is_ok());
    }

    #[test]
    fn credential_requires_tenant_without_token() {
        let cfg = ArmConfig {
            mock_uri: None,
            subscription_id: Some(String::from("sub")),
            ..mocked()
        };
        let Err(ConfigError::MissingField(message)) = cfg.credential() else {
            panic!("expected missing tenant");
        };
        assert!(message.contains("ARM_TENANT_ID"), "{message}");
    }
}
