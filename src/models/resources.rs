//! Resource group models.

use serde::{Deserialize, Serialize};

use super::Tags;

/// Provisioning state reported while a group is being removed.
pub(crate) const DELETING: &str = "Deleting";

/// Properties envelope of a resource group.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceGroupProperties {
    /// Provisioning state. Output only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provisioning_state: Option<String>,
}

/// Resource group.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceGroup {
    /// Resource id. Output only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Group name. Output only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Region storing the group metadata.
    pub location: String,
    /// Resource tags.
    #[serde(default, skip_serializing_if = "Tags::is_empty")]
    pub tags: Tags,
    /// Id of the resource managing this group.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub managed_by: Option<String>,
    /// Group properties.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<ResourceGroupProperties>,
}

impl ResourceGroup {
    /// Creates group parameters for `location`.
    #[must_use]
    pub fn new(location: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            ..Self::default()
        }
    }

    /// Provisioning state, when reported.
    #[must_use]
    pub fn provisioning_state(&self) -> Option<&str> {
        self.properties
            .as_ref()
            .and_then(|props| props.provisioning_state.as_deref())
    }

    /// Returns `true` while the provider is removing the group.
    #[must_use]
    pub fn is_deleting(&self) -> bool {
        self.provisioning_state() == Some(DELETING)
    }
}
