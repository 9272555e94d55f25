//! Virtual machine scale set models.

use serde::{Deserialize, Serialize};

use super::Tags;
use super::compute::{CachingType, DiskCreateOption, ImageReference, OsType, Plan, Sku, SubResource};

/// How instances pick up model changes.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum UpgradeMode {
    /// Instances are updated automatically.
    Automatic,
    /// Instances are updated through `update_instances`.
    Manual,
    /// Instances are updated in batches.
    Rolling,
}

/// Upgrade policy of a scale set.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct UpgradePolicy {
    /// Upgrade mode.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<UpgradeMode>,
}

/// Guest OS settings shared by all instances.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VirtualMachineScaleSetOsProfile {
    /// Host name prefix, completed with an instance suffix.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub computer_name_prefix: Option<String>,
    /// Administrator account.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub admin_username: Option<String>,
    /// Administrator password.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub admin_password: Option<String>,
    /// Base64 encoded custom data.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_data: Option<String>,
}

/// OS disk template of a scale set.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VirtualMachineScaleSetOsDisk {
    /// Disk name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Host caching.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caching: Option<CachingType>,
    /// Creation behaviour.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub create_option: Option<DiskCreateOption>,
    /// Operating system family.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub os_type: Option<OsType>,
    /// Blob containers receiving the instance VHDs.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub vhd_containers: Vec<String>,
}

/// Disk template of a scale set.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VirtualMachineScaleSetStorageProfile {
    /// Image for the OS disk.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_reference: Option<ImageReference>,
    /// OS disk template.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub os_disk: Option<VirtualMachineScaleSetOsDisk>,
}

/// Properties of an IP configuration template.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct VirtualMachineScaleSetIpConfigurationProperties {
    /// Subnet the instances join.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subnet: Option<SubResource>,
}

/// IP configuration template.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct VirtualMachineScaleSetIpConfiguration {
    /// Configuration name.
    pub name: String,
    /// Configuration properties.
    #[serde(default)]
    pub properties: VirtualMachineScaleSetIpConfigurationProperties,
}

/// Properties of a network interface template.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VirtualMachineScaleSetNetworkConfigurationProperties {
    /// Marks the primary interface.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub primary: Option<bool>,
    /// IP configurations.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ip_configurations: Vec<VirtualMachineScaleSetIpConfiguration>,
}

/// Network interface template.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct VirtualMachineScaleSetNetworkConfiguration {
    /// Template name.
    pub name: String,
    /// Template properties.
    #[serde(default)]
    pub properties: VirtualMachineScaleSetNetworkConfigurationProperties,
}

/// Network template of a scale set.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VirtualMachineScaleSetNetworkProfile {
    /// Interface templates.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub network_interface_configurations: Vec<VirtualMachineScaleSetNetworkConfiguration>,
}

/// Template every instance is created from.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VirtualMachineScaleSetVmProfile {
    /// Guest OS settings.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub os_profile: Option<VirtualMachineScaleSetOsProfile>,
    /// Disk template.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage_profile: Option<VirtualMachineScaleSetStorageProfile>,
    /// Network template.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub network_profile: Option<VirtualMachineScaleSetNetworkProfile>,
}

/// Properties envelope of a scale set.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VirtualMachineScaleSetProperties {
    /// Upgrade policy.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upgrade_policy: Option<UpgradePolicy>,
    /// Instance template.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub virtual_machine_profile: Option<VirtualMachineScaleSetVmProfile>,
    /// Creates extra instances and discards the slowest ones.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overprovision: Option<bool>,
    /// Provisioning state. Output only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provisioning_state: Option<String>,
    /// Unique scale set id. Output only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unique_id: Option<String>,
}

/// Virtual machine scale set resource.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct VirtualMachineScaleSet {
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
    /// Instance size and count.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sku: Option<Sku>,
    /// Marketplace plan.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plan: Option<Plan>,
    /// Scale set properties.
    #[serde(default)]
    pub properties: VirtualMachineScaleSetProperties,
}

/// Instance ids targeted by a scale set action. Omitting the ids applies the
/// action to every instance in the scale set.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VirtualMachineScaleSetVmInstanceIds {
    /// Targeted instance ids; `None` means all instances.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instance_ids: Option<Vec<String>>,
}

impl VirtualMachineScaleSetVmInstanceIds {
    /// Targets every instance.
    #[must_use]
    pub const fn all() -> Self {
        Self { instance_ids: None }
    }

    /// Targets the listed instances only.
    #[must_use]
    pub fn only<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            instance_ids: Some(ids.into_iter().map(Into::into).collect()),
        }
    }
}

/// Instance ids required by actions that cannot target the whole set.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VirtualMachineScaleSetVmInstanceRequiredIds {
    /// Targeted instance ids.
    pub instance_ids: Vec<String>,
}
