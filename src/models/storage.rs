//! Storage account models.

use serde::{Deserialize, Serialize};

use super::Tags;

/// Replication SKU of a storage account.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct StorageSku {
    /// SKU name, for example `Standard_LRS`.
    pub name: String,
}

/// Service endpoints of a storage account.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct Endpoints {
    /// Blob endpoint, ending with `/`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blob: Option<String>,
    /// Queue endpoint.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub queue: Option<String>,
    /// Table endpoint.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table: Option<String>,
    /// File endpoint.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
}

/// Properties envelope of a storage account.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageAccountProperties {
    /// Provisioning state. Output only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provisioning_state: Option<String>,
    /// Service endpoints. Output only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub primary_endpoints: Option<Endpoints>,
}

/// Storage account resource, also used as creation parameters.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct StorageAccount {
    /// Resource id. Output only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Resource name. Output only.
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
    /// Replication SKU.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sku: Option<StorageSku>,
    /// Account kind, for example `Storage` or `StorageV2`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    /// Account properties.
    #[serde(default)]
    pub properties: StorageAccountProperties,
}

impl StorageAccount {
    /// Blob endpoint, when the account has been provisioned.
    #[must_use]
    pub fn blob_endpoint(&self) -> Option<&str> {
        self.properties
            .primary_endpoints
            .as_ref()
            .and_then(|endpoints| endpoints.blob.as_deref())
    }
}
