//! Per-machine provisioning context.

use crate::models::{ImageReference, VirtualMachine};
use crate::operations::{AVAILABILITY_SETS, resource_id};

use super::naming::generate_name;

/// Size used when the caller does not pick one.
pub const DEFAULT_VM_SIZE: &str = "Standard_A0";

/// Names and settings of the resources backing one virtual machine.
///
/// Dependency names are generated once, when the context is created, so a
/// context can be reused to put several machines in the same availability
/// set and network.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ResourceContext {
    location: String,
    resource_group: String,
    subscription_id: String,
    create_public_ip: bool,
    source_image_uri: Option<String>,
    vm_size: String,
    image_reference: ImageReference,
    /// Storage account holding the VHDs.
    pub storage_account_name: String,
    /// Virtual network.
    pub virtual_network_name: String,
    /// Subnet inside the virtual network.
    pub subnet_name: String,
    /// Public IP address, used when the context asks for one.
    pub public_ip_name: String,
    /// Network interface.
    pub network_interface_name: String,
    /// Availability set.
    pub availability_set_name: String,
    vm_input: Option<VirtualMachine>,
}

impl ResourceContext {
    /// Creates a context, generating dependency names from `prefix`.
    #[must_use]
    pub fn new(
        location: impl Into<String>,
        resource_group: impl Into<String>,
        subscription_id: impl Into<String>,
        create_public_ip: bool,
        prefix: &str,
    ) -> Self {
        Self {
            location: location.into(),
            resource_group: resource_group.into(),
            subscription_id: subscription_id.into(),
            create_public_ip,
            source_image_uri: None,
            vm_size: String::from(DEFAULT_VM_SIZE),
            image_reference: default_image_reference(),
            storage_account_name: generate_name(prefix, "sa"),
            virtual_network_name: generate_name(prefix, "vn"),
            subnet_name: generate_name(prefix, "sn"),
            public_ip_name: generate_name(prefix, "pip"),
            network_interface_name: generate_name(prefix, "nic"),
            availability_set_name: generate_name(prefix, "as"),
            vm_input: None,
        }
    }

    /// Uses a VHD image instead of the marketplace image.
    #[must_use]
    pub fn with_source_image_uri(mut self, uri: impl Into<String>) -> Self {
        self.set_source_image_uri(uri);
        self
    }

    /// Replaces the machine size.
    #[must_use]
    pub fn with_vm_size(mut self, size: impl Into<String>) -> Self {
        self.vm_size = size.into();
        self
    }

    /// Replaces the marketplace image.
    #[must_use]
    pub fn with_image_reference(mut self, image: ImageReference) -> Self {
        self.image_reference = image;
        self
    }

    pub(crate) fn set_source_image_uri(&mut self, uri: impl Into<String>) {
        self.source_image_uri = Some(uri.into());
    }

    /// Region.
    #[must_use]
    pub fn location(&self) -> &str {
        &self.location
    }

    /// Resource group every dependency is created in.
    #[must_use]
    pub fn resource_group(&self) -> &str {
        &self.resource_group
    }

    /// Subscription owning the resource group.
    #[must_use]
    pub fn subscription_id(&self) -> &str {
        &self.subscription_id
    }

    /// Whether a public IP address is attached to the interface.
    #[must_use]
    pub const fn create_public_ip(&self) -> bool {
        self.create_public_ip
    }

    /// VHD image the OS disk is created from, if any.
    #[must_use]
    pub fn source_image_uri(&self) -> Option<&str> {
        self.source_image_uri.as_deref()
    }

    /// Machine size.
    #[must_use]
    pub fn vm_size(&self) -> &str {
        &self.vm_size
    }

    /// Marketplace image used when no source image is set.
    #[must_use]
    pub const fn image_reference(&self) -> &ImageReference {
        &self.image_reference
    }

    /// Full id of the availability set.
    #[must_use]
    pub fn availability_set_id(&self) -> String {
        resource_id(
            &self.subscription_id,
            &self.resource_group,
            AVAILABILITY_SETS,
            &self.availability_set_name,
        )
    }

    /// Machine definition last submitted with this context.
    #[must_use]
    pub const fn vm_input(&self) -> Option<&VirtualMachine> {
        self.vm_input.as_ref()
    }

    pub(crate) fn record_vm_input(&mut self, vm: VirtualMachine) {
        self.vm_input = Some(vm);
    }
}

fn default_image_reference() -> ImageReference {
    ImageReference {
        id: None,
        publisher: Some(String::from("MicrosoftWindowsServer")),
        offer: Some(String::from("WindowsServer")),
        sku: Some(String::from("2012-R2-Datacenter")),
        version: Some(String::from("latest")),
    }
}
