//! Shared constants for integration tests.
//!
//! Integration tests are compiled as separate crates (one per top-level file in
//! `tests/`). Placing shared constants under `tests/common/` avoids creating an
//! additional integration test binary while still allowing reuse via:
//!
//! ```rust
//! #[path = "common/test_constants.rs"]
//! mod test_constants;
//! ```

#![expect(dead_code, reason = "each test crate uses a different subset")]

/// Subscription used by configuration fixtures.
pub const TEST_SUBSCRIPTION: &str = "0b1f6471-1bf0-4dda-aec3-111122223333";

/// Region used by harness fixtures, in the spelling Azure echoes back.
pub const TEST_LOCATION: &str = "southeastasia";

/// Resource group prefix used by harness and janitor fixtures.
pub const TEST_PREFIX: &str = "rusttest";

/// Variables that would let ambient credentials leak into a test.
pub const CREDENTIAL_ENV_VARS: &[&str] = &[
    "ARM_SUBSCRIPTION_ID",
    "ARM_TENANT_ID",
    "ARM_CLIENT_ID",
    "ARM_CLIENT_SECRET",
    "ARM_ACCESS_TOKEN",
    "ARM_BASE_URL",
];
