//! Virtual machine operations.

use reqwest::Method;

use crate::client::{ArmClient, ArmError, ArmResponse};
use crate::models::VirtualMachine;

use super::{COMPUTE_API_VERSION, VIRTUAL_MACHINES, collection_path, resource_id};

/// Operations on the virtual machines of the client's subscription.
#[derive(Clone, Copy, Debug)]
pub struct VirtualMachines<'a> {
    client: &'a ArmClient,
}

impl<'a> VirtualMachines<'a> {
    pub(crate) const fn new(client: &'a ArmClient) -> Self {
        Self { client }
    }

    fn path(&self, resource_group: &str, name: &str) -> String {
        resource_id(
            self.client.subscription_id(),
            resource_group,
            VIRTUAL_MACHINES,
            name,
        )
    }

    async fn action(
        &self,
        resource_group: &str,
        name: &str,
        action: &str,
    ) -> Result<ArmResponse<()>, ArmError> {
        let path = format!("{}/{action}", self.path(resource_group, name));
        self.client
            .request_empty::<()>(Method::POST, &path, COMPUTE_API_VERSION, None)
            .await
    }

    /// Submits a machine definition. A new machine is answered with
    /// `201 Created` and an `Azure-AsyncOperation` URL tracking provisioning.
    ///
    /// # Errors
    ///
    /// Returns [`ArmError`] when the provider rejects the definition.
    pub async fn create_or_update(
        &self,
        resource_group: &str,
        name: &str,
        parameters: &VirtualMachine,
    ) -> Result<ArmResponse<VirtualMachine>, ArmError> {
        self.client
            .request(
                Method::PUT,
                &self.path(resource_group, name),
                COMPUTE_API_VERSION,
                &[],
                Some(parameters),
            )
            .await
    }

    /// Fetches a machine's model.
    ///
    /// # Errors
    ///
    /// Returns [`ArmError`] when the request fails.
    pub async fn get(
        &self,
        resource_group: &str,
        name: &str,
    ) -> Result<ArmResponse<VirtualMachine>, ArmError> {
        self.client
            .request::<_, ()>(
                Method::GET,
                &self.path(resource_group, name),
                COMPUTE_API_VERSION,
                &[],
                None,
            )
            .await
    }

    /// Fetches a machine's model together with its runtime instance view.
    ///
    /// # Errors
    ///
    /// Returns [`ArmError`] when the request fails.
    pub async fn get_with_instance_view(
        &self,
        resource_group: &str,
        name: &str,
    ) -> Result<ArmResponse<VirtualMachine>, ArmError> {
        self.client
            .request::<_, ()>(
                Method::GET,
                &self.path(resource_group, name),
                COMPUTE_API_VERSION,
                &[("$expand", "instanceView")],
                None,
            )
            .await
    }

    /// Lists the machines of a resource group.
    ///
    /// # Errors
    ///
    /// Returns [`ArmError`] when any page cannot be fetched.
    pub async fn list(&self, resource_group: &str) -> Result<Vec<VirtualMachine>, ArmError> {
        let path = collection_path(
            self.client.subscription_id(),
            resource_group,
            VIRTUAL_MACHINES,
        );
        self.client.list_all(&path, COMPUTE_API_VERSION).await
    }

    /// Starts deleting a machine. Its disks and network interface remain.
    ///
    /// # Errors
    ///
    /// Returns [`ArmError`] when the request fails.
    pub async fn begin_deleting(
        &self,
        resource_group: &str,
        name: &str,
    ) -> Result<ArmResponse<()>, ArmError> {
        self.client
            .request_empty::<()>(
                Method::DELETE,
                &self.path(resource_group, name),
                COMPUTE_API_VERSION,
                None,
            )
            .await
    }

    /// Starts a stopped machine.
    ///
    /// # Errors
    ///
    /// Returns [`ArmError`] when the request fails.
    pub async fn start(
        &self,
        resource_group: &str,
        name: &str,
    ) -> Result<ArmResponse<()>, ArmError> {
        self.action(resource_group, name, "start").await
    }

    /// Stops a machine while keeping its compute resources allocated.
    ///
    /// # Errors
    ///
    /// Returns [`ArmError`] when the request fails.
    pub async fn power_off(
        &self,
        resource_group: &str,
        name: &str,
    ) -> Result<ArmResponse<()>, ArmError> {
        self.action(resource_group, name, "powerOff").await
    }

    /// Restarts a machine.
    ///
    /// # Errors
    ///
    /// Returns [`ArmError`] when the request fails.
    pub async fn restart(
        &self,
        resource_group: &str,
        name: &str,
    ) -> Result<ArmResponse<()>, ArmError> {
        self.action(resource_group, name, "restart").await
    }

    /// Stops a machine and releases its compute resources.
    ///
    /// # Errors
    ///
    /// Returns [`ArmError`] when the request fails.
    pub async fn deallocate(
        &self,
        resource_group: &str,
        name: &str,
    ) -> Result<ArmResponse<()>, ArmError> {
        self.action(resource_group, name, "deallocate").await
    }

    /// Marks a deallocated machine as generalised so it can be captured as an
    /// image.
    ///
    /// # Errors
    ///
    /// Returns [`ArmError`] when the request fails.
    pub async fn generalize(
        &self,
        resource_group: &str,
        name: &str,
    ) -> Result<ArmResponse<()>, ArmError> {
        self.action(resource_group, name, "generalize").await
    }
}
