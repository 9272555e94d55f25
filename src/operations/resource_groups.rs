//! Resource group operations.

use reqwest::{Method, StatusCode};

use crate::client::{ArmClient, ArmError, ArmResponse};
use crate::models::ResourceGroup;

use super::RESOURCES_API_VERSION;

/// Operations on the resource groups of the client's subscription.
#[derive(Clone, Copy, Debug)]
pub struct ResourceGroups<'a> {
    client: &'a ArmClient,
}

impl<'a> ResourceGroups<'a> {
    pub(crate) const fn new(client: &'a ArmClient) -> Self {
        Self { client }
    }

    fn path(&self, name: &str) -> String {
        format!("{}/resourcegroups/{name}", self.client.subscription_path())
    }

    /// Creates the group or updates its location and tags.
    ///
    /// # Errors
    ///
    /// Returns [`ArmError`] when the request fails.
    pub async fn create_or_update(
        &self,
        name: &str,
        parameters: &ResourceGroup,
    ) -> Result<ArmResponse<ResourceGroup>, ArmError> {
        self.client
            .request(
                Method::PUT,
                &self.path(name),
                RESOURCES_API_VERSION,
                &[],
                Some(parameters),
            )
            .await
    }

    /// Fetches a group.
    ///
    /// # Errors
    ///
    /// Returns [`ArmError`] when the request fails, including `404` for an
    /// unknown group.
    pub async fn get(&self, name: &str) -> Result<ArmResponse<ResourceGroup>, ArmError> {
        self.client
            .request::<_, ()>(Method::GET, &self.path(name), RESOURCES_API_VERSION, &[], None)
            .await
    }

    /// Returns whether the group exists.
    ///
    /// # Errors
    ///
    /// Returns [`ArmError`] when the answer is neither `204` nor `404`.
    pub async fn check_existence(&self, name: &str) -> Result<bool, ArmError> {
        let response = self
            .client
            .send_raw(
                Method::HEAD,
                &self.path(name),
                &[("api-version", RESOURCES_API_VERSION)],
                None,
            )
            .await?;
        match response.status() {
            StatusCode::NO_CONTENT | StatusCode::OK => Ok(true),
            StatusCode::NOT_FOUND => Ok(false),
            _ => response.error_for_status().map(|_| false),
        }
    }

    /// Lists every group of the subscription.
    ///
    /// # Errors
    ///
    /// Returns [`ArmError`] when any page cannot be fetched.
    pub async fn list(&self) -> Result<Vec<ResourceGroup>, ArmError> {
        let path = format!("{}/resourcegroups", self.client.subscription_path());
        self.client.list_all(&path, RESOURCES_API_VERSION).await
    }

    /// Starts deleting a group and everything in it. The provider answers
    /// `202 Accepted` with a `Location` URL to poll.
    ///
    /// # Errors
    ///
    /// Returns [`ArmError`] when the request fails.
    pub async fn begin_deleting(&self, name: &str) -> Result<ArmResponse<()>, ArmError> {
        self.client
            .request_empty::<()>(Method::DELETE, &self.path(name), RESOURCES_API_VERSION, None)
            .await
    }
}
