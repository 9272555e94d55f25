//! Random resource names.
//!
//! Names are a fixed prefix followed by lowercase letters, which keeps them
//! valid for storage accounts and lets the janitor find leftovers by prefix.

use rand::Rng;

/// Number of random letters appended to generated names.
pub const RANDOM_SUFFIX_LEN: usize = 5;

/// Returns `len` random lowercase ASCII letters.
#[must_use]
pub fn random_string(len: usize) -> String {
    let mut rng = rand::rng();
    (0..len)
        .map(|_| char::from(rng.random_range(b'a'..=b'z')))
        .collect()
}

/// Builds `prefix` + `suffix` + five random letters.
#[must_use]
pub fn generate_name(prefix: &str, suffix: &str) -> String {
    format!("{prefix}{suffix}{}", random_string(RANDOM_SUFFIX_LEN))
}

/// Builds a resource group name: `prefix` + five random letters.
#[must_use]
pub fn resource_group_name(prefix: &str) -> String {
    generate_name(prefix, "")
}
