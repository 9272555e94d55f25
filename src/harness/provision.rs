//! Creation of a machine's dependencies and of the machine definition.

use tracing::{debug, info};

use crate::client::{ArmClient, ArmError, ArmResponse};
use crate::models::{
    AddressSpace, AvailabilitySet, CachingType, DiskCreateOption, HardwareProfile,
    IpAllocationMethod, NetworkInterface, NetworkInterfaceIpConfiguration,
    NetworkInterfaceIpConfigurationProperties, NetworkInterfaceProperties,
    NetworkInterfaceReference, NetworkProfile, OsDisk, OsProfile, OsType, PublicIpAddress,
    PublicIpAddressProperties, ResourceGroup, Sku, StorageAccount, StorageProfile, StorageSku,
    SubResource, Subnet, SubnetProperties, VirtualHardDisk, VirtualMachine,
    VirtualMachineProperties, VirtualNetwork, VirtualNetworkProperties, WindowsConfiguration,
};
use crate::operations::{VIRTUAL_NETWORKS, resource_id};

use super::context::ResourceContext;
use super::{HarnessError, VmModifier};

/// Administrator account of harness machines.
pub const ADMIN_USERNAME: &str = "Foo12";
/// Administrator password of harness machines.
pub const ADMIN_PASSWORD: &str = "BaR@123rgababaab";

const STORAGE_SKU: &str = "Standard_LRS";
const STORAGE_KIND: &str = "Storage";
const AVAILABILITY_SET_SKU: &str = "Classic";
const VNET_ADDRESS_SPACE: &str = "10.0.0.0/16";
const SUBNET_ADDRESS_PREFIX: &str = "10.0.0.0/24";
const IP_CONFIGURATION_NAME: &str = "ipconfig1";

/// Ids of the resources a machine is wired to.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(super) struct Dependencies {
    pub(super) blob_endpoint: String,
    pub(super) network_interface_id: String,
    pub(super) availability_set_id: String,
}

/// Waits on the `Azure-AsyncOperation` URL of a response when one was
/// returned; synchronous answers pass straight through.
async fn settle<T>(client: &ArmClient, response: ArmResponse<T>) -> Result<T, ArmError> {
    if let Some(url) = response.azure_async_operation.as_deref() {
        client.wait_for_operation(url).await?;
    }
    Ok(response.body)
}

pub(super) async fn create_resource_group(
    client: &ArmClient,
    name: &str,
    location: &str,
) -> Result<ResourceGroup, ArmError> {
    let group = client
        .resource_groups()
        .create_or_update(name, &ResourceGroup::new(location))
        .await?
        .into_body();
    debug!(resource_group = name, "resource group ready");
    Ok(group)
}

async fn create_storage_account(
    client: &ArmClient,
    context: &ResourceContext,
) -> Result<String, HarnessError> {
    let name = &context.storage_account_name;
    let parameters = StorageAccount {
        location: context.location().to_owned(),
        sku: Some(StorageSku {
            name: String::from(STORAGE_SKU),
        }),
        kind: Some(String::from(STORAGE_KIND)),
        ..StorageAccount::default()
    };
    let accounts = client.storage_accounts();
    let created = accounts
        .create(context.resource_group(), name, &parameters)
        .await?;
    let account = match (created.body, created.location) {
        (Some(account), _) if account.blob_endpoint().is_some() => account,
        (_, Some(poll_url)) => {
            let polled = client
                .wait_for_location::<Option<StorageAccount>>(&poll_url)
                .await?
                .into_body();
            match polled {
                Some(account) if account.blob_endpoint().is_some() => account,
                _ => accounts
                    .get_properties(context.resource_group(), name)
                    .await?
                    .into_body(),
            }
        }
        (_, None) => accounts
            .get_properties(context.resource_group(), name)
            .await?
            .into_body(),
    };
    debug!(storage_account = %name, "storage account ready");
    account
        .blob_endpoint()
        .map(str::to_owned)
        .ok_or_else(|| HarnessError::Incomplete {
            what: format!("blob endpoint of storage account {name}"),
        })
}

async fn create_virtual_network(
    client: &ArmClient,
    context: &ResourceContext,
) -> Result<String, ArmError> {
    let parameters = VirtualNetwork {
        location: context.location().to_owned(),
        properties: VirtualNetworkProperties {
            address_space: Some(AddressSpace {
                address_prefixes: vec![String::from(VNET_ADDRESS_SPACE)],
            }),
            subnets: vec![Subnet {
                id: None,
                name: Some(context.subnet_name.clone()),
                properties: SubnetProperties {
                    address_prefix: Some(String::from(SUBNET_ADDRESS_PREFIX)),
                    provisioning_state: None,
                },
            }],
            provisioning_state: None,
        },
        ..VirtualNetwork::default()
    };
    let response = client
        .virtual_networks()
        .create_or_update(
            context.resource_group(),
            &context.virtual_network_name,
            &parameters,
        )
        .await?;
    let network = settle(client, response).await?;
    let subnet_id = network
        .subnet(&context.subnet_name)
        .and_then(|subnet| subnet.id.clone())
        .unwrap_or_else(|| {
            format!(
                "{}/subnets/{}",
                resource_id(
                    context.subscription_id(),
                    context.resource_group(),
                    VIRTUAL_NETWORKS,
                    &context.virtual_network_name,
                ),
                context.subnet_name
            )
        });
    debug!(subnet = %subnet_id, "virtual network ready");
    Ok(subnet_id)
}

async fn create_public_ip(
    client: &ArmClient,
    context: &ResourceContext,
) -> Result<Option<String>, ArmError> {
    let name = &context.public_ip_name;
    let parameters = PublicIpAddress {
        location: context.location().to_owned(),
        properties: PublicIpAddressProperties {
            public_ip_allocation_method: Some(IpAllocationMethod::Dynamic),
            ..PublicIpAddressProperties::default()
        },
        ..PublicIpAddress::default()
    };
    let response = client
        .public_ip_addresses()
        .create_or_update(context.resource_group(), name, &parameters)
        .await?;
    let address = settle(client, response).await?;
    debug!(public_ip = %name, "public ip ready");
    Ok(address.id)
}

async fn create_network_interface(
    client: &ArmClient,
    context: &ResourceContext,
    subnet_id: String,
    public_ip_id: Option<String>,
) -> Result<String, HarnessError> {
    let name = &context.network_interface_name;
    let parameters = NetworkInterface {
        location: context.location().to_owned(),
        properties: NetworkInterfaceProperties {
            ip_configurations: vec![NetworkInterfaceIpConfiguration {
                id: None,
                name: Some(String::from(IP_CONFIGURATION_NAME)),
                properties: NetworkInterfaceIpConfigurationProperties {
                    subnet: Some(SubResource::new(subnet_id)),
                    private_ip_allocation_method: Some(IpAllocationMethod::Dynamic),
                    private_ip_address: None,
                    public_ip_address: public_ip_id.map(SubResource::new),
                },
            }],
            ..NetworkInterfaceProperties::default()
        },
        ..NetworkInterface::default()
    };
    let response = client
        .network_interfaces()
        .create_or_update(context.resource_group(), name, &parameters)
        .await?;
    let interface = settle(client, response).await?;
    debug!(network_interface = %name, "network interface ready");
    interface.id.ok_or_else(|| HarnessError::Incomplete {
        what: format!("id of network interface {name}"),
    })
}

async fn create_availability_set(
    client: &ArmClient,
    context: &ResourceContext,
) -> Result<String, ArmError> {
    let parameters = AvailabilitySet {
        location: context.location().to_owned(),
        sku: Some(Sku {
            name: Some(String::from(AVAILABILITY_SET_SKU)),
            ..Sku::default()
        }),
        ..AvailabilitySet::default()
    };
    let set = client
        .availability_sets()
        .create_or_update(
            context.resource_group(),
            &context.availability_set_name,
            &parameters,
        )
        .await?
        .into_body();
    debug!(availability_set = %context.availability_set_name, "availability set ready");
    Ok(set.id.unwrap_or_else(|| context.availability_set_id()))
}

/// Creates the resource group and every resource the machine references.
pub(super) async fn provision_dependencies(
    client: &ArmClient,
    context: &ResourceContext,
) -> Result<Dependencies, HarnessError> {
    create_resource_group(client, context.resource_group(), context.location()).await?;
    let blob_endpoint = create_storage_account(client, context).await?;
    let subnet_id = create_virtual_network(client, context).await?;
    let public_ip_id = if context.create_public_ip() {
        create_public_ip(client, context).await?
    } else {
        None
    };
    let network_interface_id =
        create_network_interface(client, context, subnet_id, public_ip_id).await?;
    let availability_set_id = create_availability_set(client, context).await?;
    info!(
        resource_group = context.resource_group(),
        "machine dependencies provisioned"
    );
    Ok(Dependencies {
        blob_endpoint,
        network_interface_id,
        availability_set_id,
    })
}

/// Builds the definition of a Windows machine whose OS disk lives in the
/// context's storage account.
pub(super) fn build_vm_input(
    context: &ResourceContext,
    dependencies: &Dependencies,
    vm_name: &str,
) -> VirtualMachine {
    let blob_endpoint = if dependencies.blob_endpoint.ends_with('/') {
        dependencies.blob_endpoint.clone()
    } else {
        format!("{}/", dependencies.blob_endpoint)
    };
    let source_image = context.source_image_uri().map(VirtualHardDisk::new);
    let os_disk = OsDisk {
        os_type: source_image.as_ref().map(|_| OsType::Windows),
        name: Some(format!("{vm_name}os")),
        vhd: Some(VirtualHardDisk::new(format!(
            "{blob_endpoint}vhds/{vm_name}os.vhd"
        ))),
        image: source_image,
        caching: Some(CachingType::ReadWrite),
        create_option: Some(DiskCreateOption::FromImage),
        disk_size_gb: None,
    };
    let image_reference = if context.source_image_uri().is_some() {
        None
    } else {
        Some(context.image_reference().clone())
    };

    VirtualMachine {
        properties: VirtualMachineProperties {
            hardware_profile: Some(HardwareProfile {
                vm_size: Some(context.vm_size().to_owned()),
            }),
            storage_profile: Some(StorageProfile {
                image_reference,
                os_disk: Some(os_disk),
                data_disks: Vec::new(),
            }),
            os_profile: Some(OsProfile {
                computer_name: Some(vm_name.to_owned()),
                admin_username: Some(String::from(ADMIN_USERNAME)),
                admin_password: Some(String::from(ADMIN_PASSWORD)),
                windows_configuration: Some(WindowsConfiguration {
                    provision_vm_agent: Some(true),
                    enable_automatic_updates: Some(true),
                }),
                ..OsProfile::default()
            }),
            network_profile: Some(NetworkProfile {
                network_interfaces: vec![NetworkInterfaceReference::primary(
                    dependencies.network_interface_id.clone(),
                )],
            }),
            availability_set: Some(SubResource::new(dependencies.availability_set_id.clone())),
            ..VirtualMachineProperties::default()
        },
        ..VirtualMachine::new(context.location())
    }
}

/// Provisions the dependencies, builds the definition, lets `modifier`
/// adjust it, records it in the context and submits it.
pub(super) async fn submit_vm(
    client: &ArmClient,
    context: &mut ResourceContext,
    vm_name: &str,
    modifier: Option<VmModifier>,
) -> Result<ArmResponse<VirtualMachine>, HarnessError> {
    let dependencies = provision_dependencies(client, context).await?;
    let mut vm = build_vm_input(context, &dependencies, vm_name);
    if let Some(modify) = modifier {
        modify(&mut vm);
    }
    context.record_vm_input(vm.clone());
    let response = client
        .virtual_machines()
        .create_or_update(context.resource_group(), vm_name, &vm)
        .await?;
    Ok(response)
}
