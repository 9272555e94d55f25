//! Virtual machine and availability set models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Tags;

/// Reference to another resource by id.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct SubResource {
    /// Fully qualified resource id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

impl SubResource {
    /// Creates a reference to `id`.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
        }
    }
}

/// Marketplace purchase plan attached to an image.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Plan {
    /// Plan id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Publisher id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub publisher: Option<String>,
    /// Offer id from the marketplace.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product: Option<String>,
    /// Promotion code.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub promotion_code: Option<String>,
}

/// SKU of an availability set or scale set.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct Sku {
    /// SKU name, for example `Standard_A1` or `Classic`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// SKU tier.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tier: Option<String>,
    /// Number of instances, for scale sets.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capacity: Option<i64>,
}

/// Hardware settings of a virtual machine.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HardwareProfile {
    /// Size name, for example `Standard_A1`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vm_size: Option<String>,
}

/// Platform or marketplace image used to create a disk.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct ImageReference {
    /// Id of a custom image. Mutually exclusive with the other fields.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Image publisher.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub publisher: Option<String>,
    /// Image offer.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offer: Option<String>,
    /// Image SKU.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sku: Option<String>,
    /// Image version, or `latest`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

/// Location of a VHD blob.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct VirtualHardDisk {
    /// Blob URI.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
}

impl VirtualHardDisk {
    /// Creates a reference to the blob at `uri`.
    #[must_use]
    pub fn new(uri: impl Into<String>) -> Self {
        Self {
            uri: Some(uri.into()),
        }
    }
}

/// Host caching applied to a disk.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum CachingType {
    /// No caching.
    None,
    /// Reads are cached.
    ReadOnly,
    /// Reads and writes are cached.
    ReadWrite,
}

/// How a disk is populated on creation.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum DiskCreateOption {
    /// Copied from the image.
    FromImage,
    /// Blank disk.
    Empty,
    /// Existing VHD attached as-is.
    Attach,
}

/// Operating system family.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum OsType {
    /// Windows.
    Windows,
    /// Linux.
    Linux,
}

/// Operating system disk of a virtual machine.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OsDisk {
    /// Operating system family, required when attaching a specialised VHD.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub os_type: Option<OsType>,
    /// Disk name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Blob that backs the disk.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vhd: Option<VirtualHardDisk>,
    /// User image the disk is created from.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<VirtualHardDisk>,
    /// Host caching.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caching: Option<CachingType>,
    /// Creation behaviour.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub create_option: Option<DiskCreateOption>,
    /// Size in gigabytes.
    #[serde(rename = "diskSizeGB", skip_serializing_if = "Option::is_none")]
    pub disk_size_gb: Option<i32>,
}

/// Additional data disk of a virtual machine.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DataDisk {
    /// Logical unit number, unique per virtual machine.
    pub lun: i32,
    /// Disk name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Blob that backs the disk.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vhd: Option<VirtualHardDisk>,
    /// User image the disk is created from.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<VirtualHardDisk>,
    /// Host caching.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caching: Option<CachingType>,
    /// Creation behaviour.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub create_option: Option<DiskCreateOption>,
    /// Size in gigabytes.
    #[serde(rename = "diskSizeGB", skip_serializing_if = "Option::is_none")]
    pub disk_size_gb: Option<i32>,
}

/// Disks of a virtual machine.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageProfile {
    /// Image for the OS disk.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_reference: Option<ImageReference>,
    /// OS disk.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub os_disk: Option<OsDisk>,
    /// Data disks.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub data_disks: Vec<DataDisk>,
}

/// Certificate installed from a key vault.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VaultCertificate {
    /// Secret URL of the certificate.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub certificate_url: Option<String>,
    /// Windows certificate store.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub certificate_store: Option<String>,
}

/// Certificates taken from one key vault.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VaultSecretGroup {
    /// Vault holding the certificates.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_vault: Option<SubResource>,
    /// Certificates to install.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub vault_certificates: Vec<VaultCertificate>,
}

/// Windows specific OS settings.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WindowsConfiguration {
    /// Installs the VM agent.
    #[serde(rename = "provisionVMAgent", skip_serializing_if = "Option::is_none")]
    pub provision_vm_agent: Option<bool>,
    /// Enables Windows Update.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enable_automatic_updates: Option<bool>,
}

/// Linux specific OS settings.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LinuxConfiguration {
    /// Rejects password logins.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disable_password_authentication: Option<bool>,
}

/// Guest OS settings applied at provisioning.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OsProfile {
    /// Host name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub computer_name: Option<String>,
    /// Administrator account.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub admin_username: Option<String>,
    /// Administrator password. Never returned by the provider.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub admin_password: Option<String>,
    /// Base64 encoded custom data.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_data: Option<String>,
    /// Windows settings.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub windows_configuration: Option<WindowsConfiguration>,
    /// Linux settings.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub linux_configuration: Option<LinuxConfiguration>,
    /// Certificates to install.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub secrets: Vec<VaultSecretGroup>,
}

/// Properties of a network interface reference.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct NetworkInterfaceReferenceProperties {
    /// Marks the primary interface when several are attached.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub primary: Option<bool>,
}

/// Network interface attached to a virtual machine.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct NetworkInterfaceReference {
    /// Network interface id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Attachment properties.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<NetworkInterfaceReferenceProperties>,
}

impl NetworkInterfaceReference {
    /// References `id` as the primary interface.
    #[must_use]
    pub fn primary(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            properties: Some(NetworkInterfaceReferenceProperties {
                primary: Some(true),
            }),
        }
    }
}

/// Network interfaces of a virtual machine.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkProfile {
    /// Attached interfaces.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub network_interfaces: Vec<NetworkInterfaceReference>,
}

/// Severity of an instance view status.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum StatusLevel {
    /// Informational.
    Info,
    /// Warning.
    Warning,
    /// Error.
    Error,
}

/// Status entry reported in instance views.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InstanceViewStatus {
    /// Status code, for example `PowerState/running`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    /// Severity.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<StatusLevel>,
    /// Localised label.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_status: Option<String>,
    /// Detailed message.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Time the status was recorded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time: Option<DateTime<Utc>>,
}

/// Runtime state of one disk.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct DiskInstanceView {
    /// Disk name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Disk statuses.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub statuses: Vec<InstanceViewStatus>,
}

/// Runtime state of the guest agent.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VirtualMachineAgentInstanceView {
    /// Agent version.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vm_agent_version: Option<String>,
    /// Agent statuses.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub statuses: Vec<InstanceViewStatus>,
}

/// Runtime state of a virtual machine, returned with `$expand=instanceView`.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VirtualMachineInstanceView {
    /// Update domain.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub platform_update_domain: Option<i32>,
    /// Fault domain.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub platform_fault_domain: Option<i32>,
    /// Host name reported by the guest.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub computer_name: Option<String>,
    /// Guest OS name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub os_name: Option<String>,
    /// Guest OS version.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub os_version: Option<String>,
    /// Remote desktop certificate thumbprint.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rdp_thumb_print: Option<String>,
    /// Guest agent state.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vm_agent: Option<VirtualMachineAgentInstanceView>,
    /// Disk states.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub disks: Vec<DiskInstanceView>,
    /// Machine statuses.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub statuses: Vec<InstanceViewStatus>,
}

/// Properties envelope of a virtual machine.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VirtualMachineProperties {
    /// Hardware settings.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hardware_profile: Option<HardwareProfile>,
    /// Disks.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage_profile: Option<StorageProfile>,
    /// Guest OS settings.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub os_profile: Option<OsProfile>,
    /// Network interfaces.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub network_profile: Option<NetworkProfile>,
    /// Availability set the machine belongs to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub availability_set: Option<SubResource>,
    /// Provisioning state. Output only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provisioning_state: Option<String>,
    /// Runtime state. Output only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instance_view: Option<VirtualMachineInstanceView>,
    /// Unique machine id. Output only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vm_id: Option<String>,
}

/// Virtual machine resource.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct VirtualMachine {
    /// Resource id. Output only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Resource name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Resource type. Output only.
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub resource_type: Option<String>,
    /// Region.
    pub location: String,
    /// Resource tags.
    #[serde(default, skip_serializing_if = "Tags::is_empty")]
    pub tags: Tags,
    /// Marketplace plan.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plan: Option<Plan>,
    /// Machine properties.
    #[serde(default)]
    pub properties: VirtualMachineProperties,
}

impl VirtualMachine {
    /// Creates an empty machine in `location`.
    #[must_use]
    pub fn new(location: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            ..Self::default()
        }
    }

    /// Id of the availability set, when the machine belongs to one.
    #[must_use]
    pub fn availability_set_id(&self) -> Option<&str> {
        self.properties
            .availability_set
            .as_ref()
            .and_then(|set| set.id.as_deref())
    }

    /// Requested size, when a hardware profile is present.
    #[must_use]
    pub fn vm_size(&self) -> Option<&str> {
        self.properties
            .hardware_profile
            .as_ref()
            .and_then(|profile| profile.vm_size.as_deref())
    }

    /// OS disk, when a storage profile is present.
    #[must_use]
    pub fn os_disk(&self) -> Option<&OsDisk> {
        self.properties
            .storage_profile
            .as_ref()
            .and_then(|profile| profile.os_disk.as_ref())
    }

    /// Data disks; empty when no storage profile is present.
    #[must_use]
    pub fn data_disks(&self) -> &[DataDisk] {
        self.properties
            .storage_profile
            .as_ref()
            .map(|profile| profile.data_disks.as_slice())
            .unwrap_or_default()
    }
}

/// Properties envelope of an availability set.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilitySetProperties {
    /// Number of update domains.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub platform_update_domain_count: Option<i32>,
    /// Number of fault domains.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub platform_fault_domain_count: Option<i32>,
    /// Member machines. Output only.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub virtual_machines: Vec<SubResource>,
}

/// Availability set resource.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct AvailabilitySet {
    /// Resource id. Output only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Resource name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Resource type. Output only.
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub resource_type: Option<String>,
    /// Region.
    pub location: String,
    /// Resource tags.
    #[serde(default, skip_serializing_if = "Tags::is_empty")]
    pub tags: Tags,
    /// `Classic` for unmanaged disks, `Aligned` for managed disks.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sku: Option<Sku>,
    /// Set properties.
    #[serde(default)]
    pub properties: AvailabilitySetProperties,
}
