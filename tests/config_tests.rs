//! Integration tests for configuration loading and validation.

#[path = "common/test_constants.rs"]
mod test_constants;

use arm_compute::config::{MOCK_SUBSCRIPTION, MOCK_TOKEN};
use arm_compute::test_support::EnvGuard;
use arm_compute::{ArmClient, ArmConfig, ConfigError};
use rstest::{fixture, rstest};

use test_constants::{CREDENTIAL_ENV_VARS, TEST_LOCATION, TEST_SUBSCRIPTION};

#[fixture]
fn valid_config() -> ArmConfig {
    ArmConfig {
        subscription_id: Some(String::from(TEST_SUBSCRIPTION)),
        tenant_id: Some(String::from("72f988bf-86f1-41af-91ab-2d7cd011db47")),
        client_id: Some(String::from("4ae2a4b1-4b9e-4c5f-9a89-8f0c5b6f6a11")),
        client_secret: Some(String::from("not-a-real-secret")),
        access_token: None,
        base_url: String::from("https://management.azure.com"),
        authority_url: String::from("https://login.microsoftonline.com"),
        token_resource: String::from("https://management.core.windows.net/"),
        location: String::from(TEST_LOCATION),
        lro_poll_interval_secs: 5,
        lro_timeout_secs: 500,
        max_retries: 3,
        mock_uri: None,
        resource_group_prefix: String::from("rusttest"),
    }
}

#[rstest]
fn valid_config_passes_validation(valid_config: ArmConfig) {
    valid_config
        .validate()
        .unwrap_or_else(|err| panic!("valid config should validate: {err}"));
}

/// Every required field names both its environment variable and its key in
/// the configuration file.
#[rstest]
#[case::subscription("ARM_SUBSCRIPTION_ID", "subscription_id")]
#[case::tenant("ARM_TENANT_ID", "tenant_id")]
#[case::client("ARM_CLIENT_ID", "client_id")]
#[case::secret("ARM_CLIENT_SECRET", "client_secret")]
#[case::location("ARM_LOCATION", "location")]
#[case::prefix("ARM_RESOURCE_GROUP_PREFIX", "resource_group_prefix")]
fn validation_errors_are_actionable(
    valid_config: ArmConfig,
    #[case] env_var: &str,
    #[case] toml_key: &str,
) {
    let mut cfg = valid_config;
    match toml_key {
        "subscription_id" => cfg.subscription_id = None,
        "tenant_id" => cfg.tenant_id = Some(String::from("  ")),
        "client_id" => cfg.client_id = None,
        "client_secret" => cfg.client_secret = None,
        "location" => cfg.location.clear(),
        "resource_group_prefix" => cfg.resource_group_prefix.clear(),
        other => panic!("unknown field {other}"),
    }

    let err = cfg.validate().expect_err("validation should fail");
    let ConfigError::MissingField(ref message) = err else {
        panic!("expected MissingField, got {err:?}");
    };
    assert!(message.contains(env_var), "should mention {env_var}: {message}");
    assert!(message.contains(toml_key), "should mention {toml_key}: {message}");
    assert!(
        message.contains("arm-compute.toml"),
        "should mention the config file: {message}"
    );
}

#[rstest]
fn access_token_replaces_service_principal(valid_config: ArmConfig) {
    let cfg = ArmConfig {
        tenant_id: None,
        client_id: None,
        client_secret: None,
        access_token: Some(String::from("eyJ0eXAi")),
        ..valid_config
    };

    cfg.validate()
        .unwrap_or_else(|err| panic!("token-only config should validate: {err}"));
    cfg.credential()
        .unwrap_or_else(|err| panic!("token credential: {err}"));
}

#[rstest]
fn mock_mode_needs_no_credentials(valid_config: ArmConfig) {
    let cfg = ArmConfig {
        subscription_id: None,
        tenant_id: None,
        client_id: None,
        client_secret: None,
        mock_uri: Some(String::from("http://localhost:8043/")),
        ..valid_config
    };

    cfg.validate()
        .unwrap_or_else(|err| panic!("mock config should validate: {err}"));
    let client = ArmClient::new(&cfg).unwrap_or_else(|err| panic!("mock client: {err}"));
    assert_eq!(client.subscription_id(), MOCK_SUBSCRIPTION);
    assert_eq!(client.base_url(), "http://localhost:8043");
}

#[rstest]
fn client_refuses_incomplete_credentials(valid_config: ArmConfig) {
    let cfg = ArmConfig {
        client_secret: None,
        ..valid_config
    };

    let err = ArmClient::new(&cfg).expect_err("missing secret should fail");
    assert!(
        err.to_string().contains("ARM_CLIENT_SECRET"),
        "unexpected error: {err}"
    );
}

#[tokio::test]
async fn environment_overrides_defaults() {
    let _guard = EnvGuard::isolate(
        &[
            ("ARM_SUBSCRIPTION_ID", TEST_SUBSCRIPTION),
            ("ARM_ACCESS_TOKEN", "eyJ0eXAi"),
            ("ARM_LOCATION", "West US"),
            ("ARM_LRO_TIMEOUT_SECS", "60"),
        ],
        &[
            "ARM_MOCK_URI",
            "ARM_TENANT_ID",
            "ARM_CLIENT_ID",
            "ARM_CLIENT_SECRET",
            "ARM_BASE_URL",
        ],
    )
    .await;

    let cfg = ArmConfig::load_without_cli_args()
        .unwrap_or_else(|err| panic!("config should load from env: {err}"));

    assert_eq!(cfg.subscription_id.as_deref(), Some(TEST_SUBSCRIPTION));
    assert_eq!(cfg.location(), "WestUS");
    assert_eq!(cfg.lro_timeout().as_secs(), 60);
    assert_eq!(cfg.base_url, "https://management.azure.com");
    assert!(!cfg.is_mocked());
    cfg.validate()
        .unwrap_or_else(|err| panic!("env config should validate: {err}"));
}

#[tokio::test]
async fn mock_uri_from_environment_enables_mock_mode() {
    let mut unset = CREDENTIAL_ENV_VARS.to_vec();
    unset.push("ARM_LOCATION");
    let _guard = EnvGuard::isolate(&[("ARM_MOCK_URI", "http://127.0.0.1:8043")], &unset).await;

    let cfg = ArmConfig::load_without_cli_args()
        .unwrap_or_else(|err| panic!("config should load from env: {err}"));

    assert!(cfg.is_mocked());
    assert_eq!(cfg.effective_base_url(), "http://127.0.0.1:8043");
    assert_eq!(
        cfg.effective_subscription_id().as_deref(),
        Ok(MOCK_SUBSCRIPTION)
    );
    let token = cfg
        .credential()
        .unwrap_or_else(|err| panic!("mock credential: {err}"))
        .token()
        .await
        .unwrap_or_else(|err| panic!("mock token: {err}"));
    assert_eq!(token.secret, MOCK_TOKEN);
}
