//! Availability set operations.

use reqwest::Method;

use crate::client::{ArmClient, ArmError, ArmResponse};
use crate::models::AvailabilitySet;

use super::{AVAILABILITY_SETS, COMPUTE_API_VERSION, collection_path, resource_id};

/// Operations on availability sets.
#[derive(Clone, Copy, Debug)]
pub struct AvailabilitySets<'a> {
    client: &'a ArmClient,
}

impl<'a> AvailabilitySets<'a> {
    pub(crate) const fn new(client: &'a ArmClient) -> Self {
        Self { client }
    }

    fn path(&self, resource_group: &str, name: &str) -> String {
        resource_id(
            self.client.subscription_id(),
            resource_group,
            AVAILABILITY_SETS,
            name,
        )
    }

    /// Creates or updates a set. The call completes synchronously.
    ///
    /// # Errors
    ///
    /// Returns [`ArmError`] when the request fails.
    pub async fn create_or_update(
        &self,
        resource_group: &str,
        name: &str,
        parameters: &AvailabilitySet,
    ) -> Result<ArmResponse<AvailabilitySet>, ArmError> {
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

    /// Fetches a set.
    ///
    /// # Errors
    ///
    /// Returns [`ArmError`] when the request fails.
    pub async fn get(
        &self,
        resource_group: &str,
        name: &str,
    ) -> Result<ArmResponse<AvailabilitySet>, ArmError> {
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

    /// Deletes a set that no longer has members.
    ///
    /// # Errors
    ///
    /// Returns [`ArmError`] when the request fails.
    pub async fn delete(
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

    /// Lists the sets of a resource group.
    ///
    /// # Errors
    ///
    /// Returns [`ArmError`] when any page cannot be fetched.
    pub async fn list(&self, resource_group: &str) -> Result<Vec<AvailabilitySet>, ArmError> {
        let path = collection_path(
            self.client.subscription_id(),
            resource_group,
            AVAILABILITY_SETS,
        );
        self.client.list_all(&path, COMPUTE_API_VERSION).await
    }
}
