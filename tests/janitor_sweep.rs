//! Runs the `arm-janitor` binary against a mock Resource Manager.

#[path = "common/test_constants.rs"]
mod test_constants;

use arm_compute::config::MOCK_SUBSCRIPTION;
use arm_compute::test_support::resource_group_json;
use assert_cmd::cargo::cargo_bin_cmd;
use predicates::str::contains;
use serde_json::json;
use wiremock::matchers::{method, path, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};

use test_constants::{CREDENTIAL_ENV_VARS, TEST_LOCATION, TEST_PREFIX};

fn groups_path() -> String {
    format!("/subscriptions/{MOCK_SUBSCRIPTION}/resourcegroups")
}

fn janitor(server: &MockServer) -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("arm-janitor");
    for key in CREDENTIAL_ENV_VARS {
        cmd.env_remove(key);
    }
    cmd.env("ARM_MOCK_URI", server.uri())
        .env("ARM_RESOURCE_GROUP_PREFIX", TEST_PREFIX)
        .env("RUST_LOG", "warn");
    cmd
}

#[tokio::test(flavor = "multi_thread")]
async fn janitor_binary_deletes_prefixed_groups() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(groups_path()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "value": [
                resource_group_json("rusttestqwert", TEST_LOCATION, "Succeeded"),
                resource_group_json("rusttestyuiop", TEST_LOCATION, "Succeeded"),
                resource_group_json("shared", TEST_LOCATION, "Succeeded"),
            ]
        })))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(groups_path()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "value": [
                resource_group_json("rusttestqwert", TEST_LOCATION, "Deleting"),
                resource_group_json("rusttestyuiop", TEST_LOCATION, "Deleting"),
                resource_group_json("shared", TEST_LOCATION, "Succeeded"),
            ]
        })))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path_regex(r"/resourcegroups/rusttest[a-z]+$"))
        .respond_with(ResponseTemplate::new(202))
        .expect(2)
        .mount(&server)
        .await;

    janitor(&server)
        .assert()
        .success()
        .stdout(contains("janitor sweep complete: deleted_groups=2"));
}

#[tokio::test(flavor = "multi_thread")]
async fn janitor_binary_fails_when_groups_remain() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(groups_path()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "value": [resource_group_json("rusttestlocked", TEST_LOCATION, "Succeeded")]
        })))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(202))
        .mount(&server)
        .await;

    janitor(&server)
        .assert()
        .failure()
        .stderr(contains("resource groups remaining: rusttestlocked"));
}

#[test]
fn janitor_binary_rejects_blank_prefix() {
    let mut cmd = cargo_bin_cmd!("arm-janitor");
    cmd.env("ARM_MOCK_URI", "http://127.0.0.1:9")
        .args(["--prefix", "  "])
        .assert()
        .failure()
        .stderr(contains("prefix"));
}
