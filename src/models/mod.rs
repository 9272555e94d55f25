//! Wire models for the Resource Manager REST contract.
//!
//! Field names follow the provider's JSON (camelCase), optional values are
//! omitted from request bodies when unset, and every resource keeps its
//! `properties` envelope so payloads round-trip unchanged.

mod compute;
mod network;
mod operation;
mod resources;
mod scale_set;
mod storage;

pub use compute::{
    AvailabilitySet, AvailabilitySetProperties, CachingType, DataDisk, DiskCreateOption,
    DiskInstanceView, HardwareProfile, ImageReference, InstanceViewStatus, LinuxConfiguration,
    NetworkInterfaceReference, NetworkInterfaceReferenceProperties, NetworkProfile, OsDisk,
    OsProfile, OsType, Plan, Sku, StatusLevel, StorageProfile, SubResource, VaultCertificate,
    VaultSecretGroup, VirtualHardDisk, VirtualMachine, VirtualMachineAgentInstanceView,
    VirtualMachineInstanceView, VirtualMachineProperties, WindowsConfiguration,
};
pub use network::{
    AddressSpace, IpAllocationMethod, NetworkInterface, NetworkInterfaceIpConfiguration,
    NetworkInterfaceIpConfigurationProperties, NetworkInterfaceProperties, PublicIpAddress,
    PublicIpAddressDnsSettings, PublicIpAddressProperties, Subnet, SubnetProperties,
    VirtualNetwork, VirtualNetworkProperties,
};
pub use operation::{CloudError, OperationError, OperationState, OperationStatus, Page};
pub use resources::{ResourceGroup, ResourceGroupProperties};
pub use scale_set::{
    UpgradeMode, UpgradePolicy, VirtualMachineScaleSet, VirtualMachineScaleSetIpConfiguration,
    VirtualMachineScaleSetIpConfigurationProperties, VirtualMachineScaleSetNetworkConfiguration,
    VirtualMachineScaleSetNetworkConfigurationProperties, VirtualMachineScaleSetNetworkProfile,
    VirtualMachineScaleSetOsDisk, VirtualMachineScaleSetOsProfile,
    VirtualMachineScaleSetProperties, VirtualMachineScaleSetStorageProfile,
    VirtualMachineScaleSetVmInstanceIds, VirtualMachineScaleSetVmInstanceRequiredIds,
    VirtualMachineScaleSetVmProfile,
};
pub use storage::{Endpoints, StorageAccount, StorageAccountProperties, StorageSku};

/// Resource tags, serialised as a JSON object.
pub type Tags = std::collections::BTreeMap<String, String>;
