//! Network provider operations used to wire up a virtual machine.

use reqwest::Method;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::client::{ArmClient, ArmError, ArmResponse};
use crate::models::{NetworkInterface, PublicIpAddress, VirtualNetwork};

use super::{
    NETWORK_API_VERSION, NETWORK_INTERFACES, PUBLIC_IP_ADDRESSES, VIRTUAL_NETWORKS, resource_id,
};

/// Shared shape of the network resource groups: one resource type, PUT to
/// create, GET to read and DELETE to remove.
#[derive(Clone, Copy, Debug)]
struct NetworkResource<'a> {
    client: &'a ArmClient,
    resource_type: &'static str,
}

impl NetworkResource<'_> {
    fn path(&self, resource_group: &str, name: &str) -> String {
        resource_id(
            self.client.subscription_id(),
            resource_group,
            self.resource_type,
            name,
        )
    }

    async fn put<T>(
        &self,
        resource_group: &str,
        name: &str,
        parameters: &T,
    ) -> Result<ArmResponse<T>, ArmError>
    where
        T: Serialize + DeserializeOwned,
    {
        self.client
            .request(
                Method::PUT,
                &self.path(resource_group, name),
                NETWORK_API_VERSION,
                &[],
                Some(parameters),
            )
            .await
    }

    async fn get<T: DeserializeOwned>(
        &self,
        resource_group: &str,
        name: &str,
    ) -> Result<ArmResponse<T>, ArmError> {
        self.client
            .request::<_, ()>(
                Method::GET,
                &self.path(resource_group, name),
                NETWORK_API_VERSION,
                &[],
                None,
            )
            .await
    }

    async fn delete(&self, resource_group: &str, name: &str) -> Result<ArmResponse<()>, ArmError> {
        self.client
            .request_empty::<()>(
                Method::DELETE,
                &self.path(resource_group, name),
                NETWORK_API_VERSION,
                None,
            )
            .await
    }
}

macro_rules! network_operations {
    ($(#[$meta:meta])* $name:ident, $model:ty, $resource_type:expr) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug)]
        pub struct $name<'a> {
            inner: NetworkResource<'a>,
        }

        impl<'a> $name<'a> {
            pub(crate) const fn new(client: &'a ArmClient) -> Self {
                Self {
                    inner: NetworkResource {
                        client,
                        resource_type: $resource_type,
                    },
                }
            }

            /// Creates or updates the resource. The answer carries an
            /// `Azure-AsyncOperation` URL tracking provisioning.
            ///
            /// # Errors
            ///
            /// Returns [`ArmError`] when the request fails.
            pub async fn create_or_update(
                &self,
                resource_group: &str,
                name: &str,
                parameters: &$model,
            ) -> Result<ArmResponse<$model>, ArmError> {
                self.inner.put(resource_group, name, parameters).await
            }

            /// Fetches the resource.
            ///
            /// # Errors
            ///
            /// Returns [`ArmError`] when the request fails.
            pub async fn get(
                &self,
                resource_group: &str,
                name: &str,
            ) -> Result<ArmResponse<$model>, ArmError> {
                self.inner.get(resource_group, name).await
            }

            /// Starts deleting the resource.
            ///
            /// # Errors
            ///
            /// Returns [`ArmError`] when the request fails.
            pub async fn begin_deleting(
                &self,
                resource_group: &str,
                name: &str,
            ) -> Result<ArmResponse<()>, ArmError> {
                self.inner.delete(resource_group, name).await
            }
        }
    };
}

network_operations!(
    /// Operations on virtual networks and their subnets.
    VirtualNetworks,
    VirtualNetwork,
    VIRTUAL_NETWORKS
);
network_operations!(
    /// Operations on public IP addresses.
    PublicIpAddresses,
    PublicIpAddress,
    PUBLIC_IP_ADDRESSES
);
network_operations!(
    /// Operations on network interfaces.
    NetworkInterfaces,
    NetworkInterface,
    NETWORK_INTERFACES
);
