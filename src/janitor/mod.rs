//! Resource group janitor for integration tests.
//!
//! Harness runs create resource groups named with a fixed prefix and
//! random letters. The janitor finds every group carrying the prefix,
//! starts deleting it, and fails if a matching group is afterwards neither
//! gone nor being deleted.

use thiserror::Error;
use tracing::{info, warn};

use crate::client::{ArmClient, ArmError};
use crate::models::ResourceGroup;

/// Prefix swept when none is configured.
pub const DEFAULT_PREFIX: &str = "rusttest";

/// Configuration for a janitor sweep.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct JanitorConfig {
    /// Resource group name prefix identifying harness groups.
    pub prefix: String,
}

impl JanitorConfig {
    /// Constructs a config, trimming whitespace.
    ///
    /// # Errors
    ///
    /// Returns [`JanitorError::InvalidConfig`] when the prefix is blank.
    pub fn new(prefix: impl Into<String>) -> Result<Self, JanitorError> {
        let trimmed_prefix = prefix.into().trim().to_owned();
        if trimmed_prefix.is_empty() {
            return Err(JanitorError::InvalidConfig {
                field: String::from("prefix"),
            });
        }
        Ok(Self {
            prefix: trimmed_prefix,
        })
    }

    fn matches(&self, group: &ResourceGroup) -> bool {
        group
            .name
            .as_deref()
            .is_some_and(|name| name.starts_with(&self.prefix))
    }
}

/// Summary of janitor work.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SweepSummary {
    /// Number of resource groups whose deletion was started.
    pub deleted_groups: usize,
}

/// Errors returned by the janitor.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum JanitorError {
    /// Raised when configuration is missing required values.
    #[error("missing {field}")]
    InvalidConfig {
        /// Name of the missing or invalid field.
        field: String,
    },
    /// Raised when a Resource Manager call fails.
    #[error(transparent)]
    Api(#[from] ArmError),
    /// Raised when resource groups remain after the sweep.
    #[error("resources remain after janitor sweep: {message}")]
    NotClean {
        /// Human-readable description of what remains.
        message: String,
    },
}

/// Deletes harness resource groups through the Resource Manager API.
#[derive(Clone, Debug)]
pub struct Janitor<'a> {
    config: JanitorConfig,
    client: &'a ArmClient,
}

impl<'a> Janitor<'a> {
    /// Creates a janitor sweeping the client's subscription.
    #[must_use]
    pub const fn new(config: JanitorConfig, client: &'a ArmClient) -> Self {
        Self { config, client }
    }

    /// Performs a sweep and returns how many groups were deleted.
    ///
    /// Groups already being deleted are left alone. A group that vanished
    /// between listing and deletion counts as deleted.
    ///
    /// # Errors
    ///
    /// Returns [`JanitorError`] when listing or deletion fails, or when a
    /// matching group is neither gone nor deleting afterwards.
    pub async fn sweep(&self) -> Result<SweepSummary, JanitorError> {
        let groups = self.client.resource_groups();

        let mut deleted_groups = 0;
        for group in self.list_matching().await? {
            if group.is_deleting() {
                continue;
            }
            let name = group.name.unwrap_or_default();
            match groups.begin_deleting(&name).await {
                Ok(_) => {
                    info!(resource_group = %name, "resource group deletion started");
                    deleted_groups += 1;
                }
                Err(err) if err.is_not_found() => {
                    warn!(resource_group = %name, "resource group vanished before deletion");
                }
                Err(err) => return Err(err.into()),
            }
        }

        let remaining = self
            .list_matching()
            .await?
            .into_iter()
            .filter(|group| !group.is_deleting())
            .filter_map(|group| group.name)
            .collect::<Vec<_>>();
        if !remaining.is_empty() {
            let message = format!("resource groups remaining: {}", remaining.join(", "));
            return Err(JanitorError::NotClean { message });
        }

        Ok(SweepSummary { deleted_groups })
    }

    async fn list_matching(&self) -> Result<Vec<ResourceGroup>, JanitorError> {
        Ok(self
            .client
            .resource_groups()
            .list()
            .await?
            .into_iter()
            .filter(|group| self.config.matches(group))
            .collect())
    }
}
