//! Operation groups, one per resource type.
//!
//! Each group borrows the [`ArmClient`](crate::client::ArmClient), builds the
//! resource path for its provider namespace and maps every call to one HTTP
//! request.

mod availability_sets;
mod network;
mod resource_groups;
mod scale_sets;
mod storage_accounts;
mod virtual_machines;

pub use availability_sets::AvailabilitySets;
pub use network::{NetworkInterfaces, PublicIpAddresses, VirtualNetworks};
pub use resource_groups::ResourceGroups;
pub use scale_sets::VirtualMachineScaleSets;
pub use storage_accounts::StorageAccounts;
pub use virtual_machines::VirtualMachines;

/// API version of the `Microsoft.Compute` provider.
pub const COMPUTE_API_VERSION: &str = "2019-11-01";
/// API version of the `Microsoft.Network` provider.
pub const NETWORK_API_VERSION: &str = "2019-11-01";
/// API version of the `Microsoft.Storage` provider.
pub const STORAGE_API_VERSION: &str = "2019-06-01";
/// API version of resource group operations.
pub const RESOURCES_API_VERSION: &str = "2019-10-01";

/// Builds the id of a resource inside a resource group.
///
/// ```
/// use arm_compute::operations::resource_id;
///
/// assert_eq!(
///     resource_id("sub", "rg", "Microsoft.Compute/availabilitySets", "set"),
///     "/subscriptions/sub/resourceGroups/rg/providers/Microsoft.Compute/availabilitySets/set"
/// );
/// ```
#[must_use]
pub fn resource_id(
    subscription_id: &str,
    resource_group: &str,
    resource_type: &str,
    name: &str,
) -> String {
    format!(
        "/subscriptions/{subscription_id}/resourceGroups/{resource_group}/providers/{resource_type}/{name}"
    )
}

pub(crate) const AVAILABILITY_SETS: &str = "Microsoft.Compute/availabilitySets";
pub(crate) const VIRTUAL_MACHINES: &str = "Microsoft.Compute/virtualMachines";
pub(crate) const SCALE_SETS: &str = "Microsoft.Compute/virtualMachineScaleSets";
pub(crate) const STORAGE_ACCOUNTS: &str = "Microsoft.Storage/storageAccounts";
pub(crate) const VIRTUAL_NETWORKS: &str = "Microsoft.Network/virtualNetworks";
pub(crate) const PUBLIC_IP_ADDRESSES: &str = "Microsoft.Network/publicIPAddresses";
pub(crate) const NETWORK_INTERFACES: &str = "Microsoft.Network/networkInterfaces";

/// Path listing every resource of a type in a resource group.
pub(crate) fn collection_path(
    subscription_id: &str,
    resource_group: &str,
    resource_type: &str,
) -> String {
    format!("/subscriptions/{subscription_id}/resourceGroups/{resource_group}/providers/{resource_type}")
}

#[cfg(test)]
mod tests;
