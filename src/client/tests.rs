//! Unit tests for the HTTP pipeline and long-running operation polling.

use std::time::Duration;

use rstest::rstest;
use serde_json::json;
use wiremock::matchers::{header, header_exists, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::*;
use crate::auth::StaticToken;
use crate::models::{OperationState, ResourceGroup};
use crate::test_support::{failed_operation_json, mock_client, operation_status_json};

const SUBSCRIPTION: &str = "00000000-0000-0000-0000-000000000000";

fn client_for(server: &MockServer) -> ArmClient {
    mock_client(&server.uri(), Duration::from_secs(2))
        .unwrap_or_else(|err| panic!("mock client: {err}"))
}

#[tokio::test]
async fn requests_carry_bearer_token_and_api_version() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("/subscriptions/{SUBSCRIPTION}/resourcegroups/rg1")))
        .and(query_param("api-version", "2019-10-01"))
        .and(header("authorization", "Bearer mock"))
        .and(header_exists(CLIENT_REQUEST_ID))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header(REQUEST_ID, "req-1")
                .set_body_json(json!({"name": "rg1", "location": "southeastasia"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let response = client
        .resource_groups()
        .get("rg1")
        .await
        .unwrap_or_else(|err| panic!("get resource group: {err}"));

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.request_id.as_deref(), Some("req-1"));
    assert_eq!(response.body.name.as_deref(), Some("rg1"));
}

#[tokio::test]
async fn error_envelope_becomes_api_error() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(409).set_body_json(json!({
            "error": {"code": "Conflict", "message": "group is being deleted"}
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client
        .resource_groups()
        .create_or_update("rg1", &ResourceGroup::new("westus"))
        .await
        .expect_err("conflict should fail");

    assert_eq!(
        err,
        ArmError::Api {
            status: 409,
            code: String::from("Conflict"),
            message: String::from("group is being deleted"),
        }
    );
}

#[tokio::test]
async fn error_without_envelope_keeps_body_text() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(502).set_body_string("upstream down"))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client
        .resource_groups()
        .get("rg1")
        .await
        .expect_err("bad gateway should fail");

    assert_eq!(err.status(), Some(502));
    assert!(err.to_string().contains("upstream down"), "{err}");
}

#[tokio::test]
async fn list_follows_next_link() {
    let server = MockServer::start().await;
    let next = format!("{}/page-two", server.uri());
    Mock::given(method("GET"))
        .and(path(format!("/subscriptions/{SUBSCRIPTION}/resourcegroups")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "value": [{"name": "a", "location": "westus"}],
            "nextLink": next,
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/page-two"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "value": [{"name": "b", "location": "westus"}],
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let groups = client
        .resource_groups()
        .list()
        .await
        .unwrap_or_else(|err| panic!("list groups: {err}"));

    let names: Vec<_> = groups.iter().filter_map(|group| group.name.as_deref()).collect();
    assert_eq!(names, ["a", "b"]);
}

#[tokio::test]
async fn wait_for_operation_polls_until_success() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/operations/op-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(operation_status_json("op-1", "InProgress")))
        .up_to_n_times(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/operations/op-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(operation_status_json("op-1", "Succeeded")))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let url = format!("{}/operations/op-1?api-version=2019-11-01", server.uri());
    let status = client
        .wait_for_operation(&url)
        .await
        .unwrap_or_else(|err| panic!("wait for operation: {err}"));

    assert_eq!(status.state(), OperationState::Succeeded);
    assert_eq!(status.tracking_operation_id(), Some("op-1"));
    let polls = server.received_requests().await.map_or(0, |requests| requests.len());
    assert_eq!(polls, 3);
}

#[tokio::test]
async fn wait_for_operation_reports_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(failed_operation_json(
            "op-2",
            "OSProvisioningTimedOut",
            "guest agent did not report",
        )))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let url = format!("{}/operations/op-2", server.uri());
    let err = client
        .wait_for_operation(&url)
        .await
        .expect_err("failed operation should error");

    assert_eq!(
        err,
        ArmError::OperationFailed {
            operation_id: String::from("op-2"),
            status: String::from("Failed"),
            code: String::from("OSProvisioningTimedOut"),
            message: String::from("guest agent did not report"),
        }
    );
}

#[tokio::test]
async fn wait_for_operation_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(operation_status_json("op-3", "InProgress")))
        .mount(&server)
        .await;

    let client = mock_client(&server.uri(), Duration::from_millis(50))
        .unwrap_or_else(|err| panic!("mock client: {err}"));
    let url = format!("{}/operations/op-3", server.uri());
    let err = client
        .wait_for_operation(&url)
        .await
        .expect_err("running operation should time out");

    assert!(
        matches!(&err, ArmError::OperationTimeout { url: polled, .. } if polled.ends_with("/operations/op-3")),
        "unexpected error: {err:?}"
    );
}

#[tokio::test]
async fn wait_for_location_returns_final_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/poll/acct"))
        .respond_with(ResponseTemplate::new(202))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/poll/acct"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": "acct",
            "location": "southeastasia",
            "properties": {"primaryEndpoints": {"blob": "https://acct.blob.core.windows.net/"}}
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let url = format!("{}/poll/acct", server.uri());
    let response = client
        .wait_for_location::<crate::models::StorageAccount>(&url)
        .await
        .unwrap_or_else(|err| panic!("wait for location: {err}"));

    assert_eq!(
        response.body.blob_endpoint(),
        Some("https://acct.blob.core.windows.net/")
    );
}

#[tokio::test]
async fn wait_for_location_accepts_empty_final_answer() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/poll/empty"))
        .respond_with(ResponseTemplate::new(202))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/poll/empty"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let url = format!("{}/poll/empty", server.uri());
    let response = client
        .wait_for_location::<Option<crate::models::StorageAccount>>(&url)
        .await
        .unwrap_or_else(|err| panic!("wait for location: {err}"));

    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.is_none());
}

#[tokio::test]
async fn connection_failures_are_retried_then_reported() {
    let port = std::net::TcpListener::bind("127.0.0.1:0")
        .and_then(|listener| listener.local_addr())
        .map(|addr| addr.port())
        .unwrap_or_else(|err| panic!("reserve port: {err}"));
    let client = ArmClient::builder()
        .base_url(format!("http://127.0.0.1:{port}"))
        .subscription_id(SUBSCRIPTION)
        .credential(Arc::new(StaticToken::new("t")))
        .max_retries(2)
        .build()
        .unwrap_or_else(|err| panic!("build client: {err}"));

    let err = client
        .resource_groups()
        .get("rg")
        .await
        .expect_err("closed port should fail");

    assert!(
        matches!(&err, ArmError::Transport { .. }),
        "unexpected error: {err:?}"
    );
}

#[tokio::test]
async fn async_operation_header_is_exposed() {
    let server = MockServer::start().await;
    let status_url = format!("{}/operations/op-9", server.uri());
    Mock::given(method("DELETE"))
        .respond_with(
            ResponseTemplate::new(202)
                .insert_header("Azure-AsyncOperation", status_url.as_str())
                .insert_header("Location", status_url.as_str()),
        )
        .mount(&server)
        .await;

    let client = client_for(&server);
    let response = client
        .resource_groups()
        .begin_deleting("rg1")
        .await
        .unwrap_or_else(|err| panic!("delete group: {err}"));

    assert_eq!(response.status, StatusCode::ACCEPTED);
    assert_eq!(response.async_operation_url().ok(), Some(status_url.as_str()));
    assert_eq!(response.location_url().ok(), Some(status_url.as_str()));
}

#[test]
fn missing_headers_are_reported() {
    let response = ArmResponse {
        status: StatusCode::OK,
        body: (),
        azure_async_operation: None,
        location: None,
        request_id: None,
    };
    assert_eq!(
        response.async_operation_url(),
        Err(ArmError::MissingHeader {
            header: String::from("Azure-AsyncOperation")
        })
    );
    assert!(response.location_url().is_err());
}

#[rstest]
#[case::missing_endpoint(None, Some("sub"), true, "base_url")]
#[case::blank_subscription(Some("https://example.test"), Some("  "), true, "subscription_id")]
#[case::missing_credential(Some("https://example.test"), Some("sub"), false, "credential")]
fn builder_rejects_incomplete_settings(
    #[case] base_url: Option<&str>,
    #[case] subscription_id: Option<&str>,
    #[case] with_credential: bool,
    #[case] field: &str,
) {
    let mut builder = ArmClient::builder();
    if let Some(url) = base_url {
        builder = builder.base_url(url);
    }
    if let Some(id) = subscription_id {
        builder = builder.subscription_id(id);
    }
    if with_credential {
        builder = builder.credential(Arc::new(StaticToken::new("t")));
    }

    let err = builder.build().expect_err("builder should fail");
    assert!(
        matches!(&err, ArmError::Config(message) if message.contains(field)),
        "unexpected error: {err:?}"
    );
}

#[test]
fn builder_trims_trailing_slash_and_defaults_timings() {
    let client = ArmClient::builder()
        .base_url("https://management.azure.com/")
        .subscription_id("sub")
        .credential(Arc::new(StaticToken::new("t")))
        .build()
        .unwrap_or_else(|err| panic!("build client: {err}"));

    assert_eq!(client.base_url(), "https://management.azure.com");
    assert_eq!(client.poll_interval, DEFAULT_POLL_INTERVAL);
    assert_eq!(client.lro_timeout, DEFAULT_LRO_TIMEOUT);
    assert_eq!(client.url("/x"), "https://management.azure.com/x");
    assert_eq!(client.url("https://other.test/y"), "https://other.test/y");
}
