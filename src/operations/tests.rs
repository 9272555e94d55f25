//! Unit tests for request paths and bodies of the operation groups.

use std::time::Duration;

use reqwest::StatusCode;
use serde_json::json;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::*;
use crate::client::ArmClient;
use crate::models::{
    HardwareProfile, ResourceGroup, StorageAccount, StorageSku, VirtualMachine,
    VirtualMachineProperties, VirtualMachineScaleSetVmInstanceIds,
    VirtualMachineScaleSetVmInstanceRequiredIds,
};
use crate::test_support::{mock_client, mock_resource_path};

fn client_for(server: &MockServer) -> ArmClient {
    mock_client(&server.uri(), Duration::from_secs(2))
        .unwrap_or_else(|err| panic!("mock client: {err}"))
}

#[tokio::test]
async fn virtual_machine_put_targets_compute_provider() {
    let server = MockServer::start().await;
    let vm_path = mock_resource_path("rg1", VIRTUAL_MACHINES, "vm1");
    let operation_url = format!("{}/operations/op-1", server.uri());
    let expected_body = json!({
        "location": "southeastasia",
        "properties": {"hardwareProfile": {"vmSize": "Standard_A0"}}
    });
    Mock::given(method("PUT"))
        .and(path(vm_path.as_str()))
        .and(query_param("api-version", COMPUTE_API_VERSION))
        .and(body_json(&expected_body))
        .respond_with(
            ResponseTemplate::new(201)
                .insert_header("Azure-AsyncOperation", operation_url.as_str())
                .set_body_json(json!({
                    "id": vm_path,
                    "name": "vm1",
                    "location": "southeastasia",
                    "properties": {
                        "hardwareProfile": {"vmSize": "Standard_A0"},
                        "provisioningState": "Creating"
                    }
                })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let vm = VirtualMachine {
        properties: VirtualMachineProperties {
            hardware_profile: Some(HardwareProfile {
                vm_size: Some(String::from("Standard_A0")),
            }),
            ..VirtualMachineProperties::default()
        },
        ..VirtualMachine::new("southeastasia")
    };
    let response = client
        .virtual_machines()
        .create_or_update("rg1", "vm1", &vm)
        .await
        .unwrap_or_else(|err| panic!("create vm: {err}"));

    assert_eq!(response.status, StatusCode::CREATED);
    assert_eq!(response.async_operation_url().ok(), Some(operation_url.as_str()));
    assert_eq!(
        response.body.properties.provisioning_state.as_deref(),
        Some("Creating")
    );
}

#[tokio::test]
async fn instance_view_is_requested_with_expand() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(mock_resource_path("rg1", VIRTUAL_MACHINES, "vm1").as_str()))
        .and(query_param("$expand", "instanceView"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": "vm1",
            "location": "southeastasia",
            "properties": {"instanceView": {"statuses": [{"code": "PowerState/running"}]}}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let vm = client
        .virtual_machines()
        .get_with_instance_view("rg1", "vm1")
        .await
        .unwrap_or_else(|err| panic!("get vm: {err}"))
        .into_body();

    assert!(vm.properties.instance_view.is_some());
}

#[tokio::test]
async fn virtual_machine_actions_post_to_action_path() {
    let server = MockServer::start().await;
    let vm_path = mock_resource_path("rg1", VIRTUAL_MACHINES, "vm1");
    for action in ["start", "powerOff", "restart", "deallocate", "generalize"] {
        Mock::given(method("POST"))
            .and(path(format!("{vm_path}/{action}")))
            .respond_with(ResponseTemplate::new(202))
            .expect(1)
            .mount(&server)
            .await;
    }

    let client = client_for(&server);
    let machines = client.virtual_machines();
    for response in [
        machines.start("rg1", "vm1").await,
        machines.power_off("rg1", "vm1").await,
        machines.restart("rg1", "vm1").await,
        machines.deallocate("rg1", "vm1").await,
        machines.generalize("rg1", "vm1").await,
    ] {
        let accepted = response.unwrap_or_else(|err| panic!("vm action: {err}"));
        assert_eq!(accepted.status, StatusCode::ACCEPTED);
    }
}

#[tokio::test]
async fn scale_set_action_for_all_instances_sends_empty_object() {
    let server = MockServer::start().await;
    let set_path = mock_resource_path("rg1", SCALE_SETS, "vmss");
    Mock::given(method("POST"))
        .and(path(format!("{set_path}/deallocate")))
        .and(body_json(json!({})))
        .respond_with(ResponseTemplate::new(202))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(format!("{set_path}/delete")))
        .and(body_json(json!({"instanceIds": ["1", "2"]})))
        .respond_with(ResponseTemplate::new(202))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let sets = client.virtual_machine_scale_sets();
    sets.deallocate("rg1", "vmss", &VirtualMachineScaleSetVmInstanceIds::all())
        .await
        .unwrap_or_else(|err| panic!("deallocate: {err}"));
    sets.delete_instances(
        "rg1",
        "vmss",
        &VirtualMachineScaleSetVmInstanceRequiredIds {
            instance_ids: vec![String::from("1"), String::from("2")],
        },
    )
    .await
    .unwrap_or_else(|err| panic!("delete instances: {err}"));
}

#[tokio::test]
async fn scale_set_update_instances_posts_manual_upgrade() {
    let server = MockServer::start().await;
    let set_path = mock_resource_path("rg1", SCALE_SETS, "vmss");
    Mock::given(method("POST"))
        .and(path(format!("{set_path}/manualupgrade")))
        .and(body_json(json!({"instanceIds": ["0"]})))
        .respond_with(ResponseTemplate::new(202))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let response = client
        .virtual_machine_scale_sets()
        .update_instances(
            "rg1",
            "vmss",
            &VirtualMachineScaleSetVmInstanceRequiredIds {
                instance_ids: vec![String::from("0")],
            },
        )
        .await
        .unwrap_or_else(|err| panic!("update instances: {err}"));
    assert_eq!(response.status.as_u16(), 202);
}

#[tokio::test]
async fn storage_create_accepts_empty_202() {
    let server = MockServer::start().await;
    let account_path = mock_resource_path("rg1", STORAGE_ACCOUNTS, "acct");
    let poll_url = format!("{}/poll/acct", server.uri());
    Mock::given(method("PUT"))
        .and(path(account_path.as_str()))
        .and(query_param("api-version", STORAGE_API_VERSION))
        .respond_with(ResponseTemplate::new(202).insert_header("Location", poll_url.as_str()))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let account = StorageAccount {
        sku: Some(StorageSku {
            name: String::from("Standard_LRS"),
        }),
        kind: Some(String::from("Storage")),
        location: String::from("southeastasia"),
        ..StorageAccount::default()
    };
    let response = client
        .storage_accounts()
        .create("rg1", "acct", &account)
        .await
        .unwrap_or_else(|err| panic!("create account: {err}"));

    assert_eq!(response.status, StatusCode::ACCEPTED);
    assert_eq!(response.body, None);
    assert_eq!(response.location_url().ok(), Some(poll_url.as_str()));
}

#[tokio::test]
async fn network_resources_use_network_api_version() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(mock_resource_path("rg1", PUBLIC_IP_ADDRESSES, "pip").as_str()))
        .and(query_param("api-version", NETWORK_API_VERSION))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": "pip",
            "location": "southeastasia",
            "properties": {"publicIPAllocationMethod": "Dynamic", "ipAddress": "52.0.0.1"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let address = client
        .public_ip_addresses()
        .get("rg1", "pip")
        .await
        .unwrap_or_else(|err| panic!("get public ip: {err}"))
        .into_body();

    assert_eq!(address.properties.ip_address.as_deref(), Some("52.0.0.1"));
}

#[tokio::test]
async fn check_existence_maps_status_codes() {
    let server = MockServer::start().await;
    let groups = format!("/subscriptions/{}/resourcegroups", crate::config::MOCK_SUBSCRIPTION);
    Mock::given(method("HEAD"))
        .and(path(format!("{groups}/present")))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;
    Mock::given(method("HEAD"))
        .and(path(format!("{groups}/absent")))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    Mock::given(method("HEAD"))
        .and(path(format!("{groups}/forbidden")))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let resource_groups = client.resource_groups();
    assert_eq!(resource_groups.check_existence("present").await, Ok(true));
    assert_eq!(resource_groups.check_existence("absent").await, Ok(false));
    let err = resource_groups
        .check_existence("forbidden")
        .await
        .expect_err("403 should fail");
    assert_eq!(err.status(), Some(403));
}

#[tokio::test]
async fn resource_group_put_sends_location() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(body_json(json!({"location": "westus"})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "name": "rg1",
            "location": "westus",
            "properties": {"provisioningState": "Succeeded"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let group = client
        .resource_groups()
        .create_or_update("rg1", &ResourceGroup::new("westus"))
        .await
        .unwrap_or_else(|err| panic!("create group: {err}"))
        .into_body();

    assert_eq!(group.provisioning_state(), Some("Succeeded"));
}

#[test]
fn collection_path_omits_name() {
    assert_eq!(
        collection_path("s", "rg", VIRTUAL_MACHINES),
        "/subscriptions/s/resourceGroups/rg/providers/Microsoft.Compute/virtualMachines"
    );
}
