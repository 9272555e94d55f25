//! Azure Resource Manager compute client and VM provisioning test harness.
//!
//! The crate exposes typed request and response models for the compute,
//! network, storage and resource management APIs, one operation group per
//! resource type, and long-running operation polling. On top of that sits a
//! harness that provisions a virtual machine together with its storage,
//! network and availability set dependencies and checks that what Azure
//! returns matches what was requested.

pub mod auth;
pub mod client;
pub mod config;
pub mod harness;
pub mod janitor;
pub mod models;
pub mod operations;
pub mod test_support;

pub use auth::{AccessToken, ServicePrincipal, StaticToken, TokenProvider};
pub use client::{ArmClient, ArmClientBuilder, ArmError, ArmResponse};
pub use config::{ArmConfig, ConfigError};
pub use harness::{
    ComputeHarness, CreateVmOptions, CreatedVm, HarnessError, ResourceContext, ValidationError,
};
pub use janitor::{Janitor, JanitorConfig, JanitorError, SweepSummary};
