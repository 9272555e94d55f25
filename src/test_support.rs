//! Test support utilities shared across unit and integration tests.

use std::collections::BTreeSet;
use std::env;
use std::ffi::OsString;
use std::sync::Arc;
use std::time::Duration;

use serde_json::{Value, json};
use tokio::sync::{Mutex, MutexGuard};

use crate::auth::StaticToken;
use crate::client::{ArmClient, ArmError};
use crate::config::{MOCK_SUBSCRIPTION, MOCK_TOKEN};

/// Poll interval used by clients built for mock servers.
pub const MOCK_POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Builds a client that talks to a mock server with the mock subscription
/// and token, polling fast and giving up after `lro_timeout`.
///
/// # Errors
///
/// Returns [`ArmError::Config`] when `base_url` is empty.
pub fn mock_client(base_url: &str, lro_timeout: Duration) -> Result<ArmClient, ArmError> {
    ArmClient::builder()
        .base_url(base_url)
        .subscription_id(MOCK_SUBSCRIPTION)
        .credential(Arc::new(StaticToken::new(MOCK_TOKEN)))
        .poll_interval(MOCK_POLL_INTERVAL)
        .lro_timeout(lro_timeout)
        .max_retries(0)
        .build()
}

/// Path of a resource under the mock subscription.
#[must_use]
pub fn mock_resource_path(resource_group: &str, resource_type: &str, name: &str) -> String {
    crate::operations::resource_id(MOCK_SUBSCRIPTION, resource_group, resource_type, name)
}

/// Body of an operation status poll.
#[must_use]
pub fn operation_status_json(operation_id: &str, status: &str) -> Value {
    json!({
        "name": operation_id,
        "status": status,
        "startTime": "2019-12-01T10:00:00.0000000+00:00",
    })
}

/// Body of a failed operation status poll.
#[must_use]
pub fn failed_operation_json(operation_id: &str, code: &str, message: &str) -> Value {
    json!({
        "name": operation_id,
        "status": "Failed",
        "startTime": "2019-12-01T10:00:00.0000000+00:00",
        "endTime": "2019-12-01T10:05:00.0000000+00:00",
        "error": {"code": code, "message": message},
    })
}

/// Body of a resource group with the given provisioning state.
#[must_use]
pub fn resource_group_json(name: &str, location: &str, state: &str) -> Value {
    json!({
        "id": format!("/subscriptions/{MOCK_SUBSCRIPTION}/resourceGroups/{name}"),
        "name": name,
        "location": location,
        "properties": {"provisioningState": state},
    })
}

/// Global mutex used to serialise environment mutation in tests.
pub static ENV_LOCK: Mutex<()> = Mutex::const_new(());

/// Guard that holds the env mutex and restores variables on drop.
pub struct EnvGuard {
    previous: Vec<(String, Option<OsString>)>,
    _guard: MutexGuard<'static, ()>,
}

impl EnvGuard {
    /// Sets multiple environment variables while holding a global mutex.
    pub async fn set_vars(pairs: &[(&str, &str)]) -> Self {
        Self::apply(pairs, &[]).await
    }

    /// Sets `pairs` and removes `unset` while holding the global mutex, so
    /// ambient credentials cannot leak into a test.
    pub async fn isolate(pairs: &[(&str, &str)], unset: &[&str]) -> Self {
        Self::apply(pairs, unset).await
    }

    async fn apply(pairs: &[(&str, &str)], unset: &[&str]) -> Self {
        debug_assert!(
            {
                let mut seen = BTreeSet::new();
                pairs
                    .iter()
                    .map(|(key, _)| *key)
                    .chain(unset.iter().copied())
                    .all(|key| seen.insert(key))
            },
            "duplicate environment variable keys passed to EnvGuard"
        );

        let guard = ENV_LOCK.lock().await;
        let mut previous = Vec::with_capacity(pairs.len() + unset.len());
        for key in unset {
            previous.push(((*key).to_owned(), env::var_os(key)));
            // SAFETY: Environment mutation is serialised by `ENV_LOCK`, preventing races.
            unsafe { env::remove_var(key) };
        }
        for (key, value) in pairs {
            previous.push(((*key).to_owned(), env::var_os(key)));
            // SAFETY: Environment mutation is serialised by `ENV_LOCK`, preventing races.
            unsafe { env::set_var(key, value) };
        }

        Self {
            previous,
            _guard: guard,
        }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        for (key, old) in self.previous.iter().rev() {
            // SAFETY: Environment mutation is serialised by holding `_guard`.
            unsafe {
                match old {
                    Some(val) => env::set_var(key, val),
                    None => env::remove_var(key),
                }
            }
        }
    }
}
