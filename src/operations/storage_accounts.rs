//! Storage account operations.

use reqwest::Method;

use crate::client::{ArmClient, ArmError, ArmResponse};
use crate::models::StorageAccount;

use super::{STORAGE_ACCOUNTS, STORAGE_API_VERSION, resource_id};

/// Operations on storage accounts.
#[derive(Clone, Copy, Debug)]
pub struct StorageAccounts<'a> {
    client: &'a ArmClient,
}

impl<'a> StorageAccounts<'a> {
    pub(crate) const fn new(client: &'a ArmClient) -> Self {
        Self { client }
    }

    fn path(&self, resource_group: &str, name: &str) -> String {
        resource_id(
            self.client.subscription_id(),
            resource_group,
            STORAGE_ACCOUNTS,
            name,
        )
    }

    /// Starts creating an account.
    ///
    /// The provider answers either `200 OK` with the account, or
    /// `202 Accepted` with an empty body and a `Location` URL to poll with
    /// [`ArmClient::wait_for_location`].
    ///
    /// # Errors
    ///
    /// Returns [`ArmError`] when the request fails.
    pub async fn create(
        &self,
        resource_group: &str,
        name: &str,
        parameters: &StorageAccount,
    ) -> Result<ArmResponse<Option<StorageAccount>>, ArmError> {
        self.client
            .request(
                Method::PUT,
                &self.path(resource_group, name),
                STORAGE_API_VERSION,
                &[],
                Some(parameters),
            )
            .await
    }

    /// Fetches an account with its endpoints.
    ///
    /// # Errors
    ///
    /// Returns [`ArmError`] when the request fails.
    pub async fn get_properties(
        &self,
        resource_group: &str,
        name: &str,
    ) -> Result<ArmResponse<StorageAccount>, ArmError> {
        self.client
            .request::<_, ()>(
                Method::GET,
                &self.path(resource_group, name),
                STORAGE_API_VERSION,
                &[],
                None,
            )
            .await
    }

    /// Deletes an account.
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
                STORAGE_API_VERSION,
                None,
            )
            .await
    }
}
