//! Virtual machine scale set operations.

use reqwest::Method;

use crate::client::{ArmClient, ArmError, ArmResponse};
use crate::models::{
    VirtualMachineScaleSet, VirtualMachineScaleSetVmInstanceIds,
    VirtualMachineScaleSetVmInstanceRequiredIds,
};

use super::{COMPUTE_API_VERSION, SCALE_SETS, collection_path, resource_id};

/// Operations on virtual machine scale sets.
#[derive(Clone, Copy, Debug)]
pub struct VirtualMachineScaleSets<'a> {
    client: &'a ArmClient,
}

impl<'a> VirtualMachineScaleSets<'a> {
    pub(crate) const fn new(client: &'a ArmClient) -> Self {
        Self { client }
    }

    fn path(&self, resource_group: &str, name: &str) -> String {
        resource_id(
            self.client.subscription_id(),
            resource_group,
            SCALE_SETS,
            name,
        )
    }

    async fn instance_action(
        &self,
        resource_group: &str,
        name: &str,
        action: &str,
        instance_ids: &VirtualMachineScaleSetVmInstanceIds,
    ) -> Result<ArmResponse<()>, ArmError> {
        let path = format!("{}/{action}", self.path(resource_group, name));
        self.client
            .request_empty(Method::POST, &path, COMPUTE_API_VERSION, Some(instance_ids))
            .await
    }

    /// Submits a scale set definition. The answer carries an
    /// `Azure-AsyncOperation` URL tracking provisioning.
    ///
    /// # Errors
    ///
    /// Returns [`ArmError`] when the provider rejects the definition.
    pub async fn create_or_update(
        &self,
        resource_group: &str,
        name: &str,
        parameters: &VirtualMachineScaleSet,
    ) -> Result<ArmResponse<VirtualMachineScaleSet>, ArmError> {
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

    /// Fetches a scale set.
    ///
    /// # Errors
    ///
    /// Returns [`ArmError`] when the request fails.
    pub async fn get(
        &self,
        resource_group: &str,
        name: &str,
    ) -> Result<ArmResponse<VirtualMachineScaleSet>, ArmError> {
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

    /// Lists the scale sets of a resource group.
    ///
    /// # Errors
    ///
    /// Returns [`ArmError`] when any page cannot be fetched.
    pub async fn list(
        &self,
        resource_group: &str,
    ) -> Result<Vec<VirtualMachineScaleSet>, ArmError> {
        let path = collection_path(self.client.subscription_id(), resource_group, SCALE_SETS);
        self.client.list_all(&path, COMPUTE_API_VERSION).await
    }

    /// Starts deleting a scale set and all of its instances.
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

    /// Starts instances; [`VirtualMachineScaleSetVmInstanceIds::all`] targets
    /// the whole set.
    ///
    /// # Errors
    ///
    /// Returns [`ArmError`] when the request fails.
    pub async fn start(
        &self,
        resource_group: &str,
        name: &str,
        instance_ids: &VirtualMachineScaleSetVmInstanceIds,
    ) -> Result<ArmResponse<()>, ArmError> {
        self.instance_action(resource_group, name, "start", instance_ids)
            .await
    }

    /// Stops instances while keeping them allocated.
    ///
    /// # Errors
    ///
    /// Returns [`ArmError`] when the request fails.
    pub async fn power_off(
        &self,
        resource_group: &str,
        name: &str,
        instance_ids: &VirtualMachineScaleSetVmInstanceIds,
    ) -> Result<ArmResponse<()>, ArmError> {
        self.instance_action(resource_group, name, "poweroff", instance_ids)
            .await
    }

    /// Restarts instances.
    ///
    /// # Errors
    ///
    /// Returns [`ArmError`] when the request fails.
    pub async fn restart(
        &self,
        resource_group: &str,
        name: &str,
        instance_ids: &VirtualMachineScaleSetVmInstanceIds,
    ) -> Result<ArmResponse<()>, ArmError> {
        self.instance_action(resource_group, name, "restart", instance_ids)
            .await
    }

    /// Stops instances and releases their compute resources.
    ///
    /// # Errors
    ///
    /// Returns [`ArmError`] when the request fails.
    pub async fn deallocate(
        &self,
        resource_group: &str,
        name: &str,
        instance_ids: &VirtualMachineScaleSetVmInstanceIds,
    ) -> Result<ArmResponse<()>, ArmError> {
        self.instance_action(resource_group, name, "deallocate", instance_ids)
            .await
    }

    /// Deletes the listed instances from the set.
    ///
    /// # Errors
    ///
    /// Returns [`ArmError`] when the request fails.
    pub async fn delete_instances(
        &self,
        resource_group: &str,
        name: &str,
        instance_ids: &VirtualMachineScaleSetVmInstanceRequiredIds,
    ) -> Result<ArmResponse<()>, ArmError> {
        let path = format!("{}/delete", self.path(resource_group, name));
        self.client
            .request_empty(Method::POST, &path, COMPUTE_API_VERSION, Some(instance_ids))
            .await
    }

    /// Applies the latest set model to the listed instances.
    ///
    /// # Errors
    ///
    /// Returns [`ArmError`] when the request fails.
    pub async fn update_instances(
        &self,
        resource_group: &str,
        name: &str,
        instance_ids: &VirtualMachineScaleSetVmInstanceRequiredIds,
    ) -> Result<ArmResponse<()>, ArmError> {
        let path = format!("{}/manualupgrade", self.path(resource_group, name));
        self.client
            .request_empty(Method::POST, &path, COMPUTE_API_VERSION, Some(instance_ids))
            .await
    }
}
