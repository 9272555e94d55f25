//! Integration-test harness for virtual machine provisioning.
//!
//! The harness owns one client and one randomly named resource group. It
//! creates a machine with all of its dependencies, waits for provisioning,
//! and checks that every answer matches what was submitted. In mock mode
//! the client targets a local double and cleanup is skipped.

mod context;
mod naming;
mod provision;
mod validate;

use reqwest::StatusCode;
use thiserror::Error;
use tracing::info;

use crate::client::{ArmClient, ArmError};
use crate::config::{ArmConfig, ConfigError};
use crate::models::{ResourceGroup, VirtualMachine};

pub use crate::client::operation_id_from_url;
pub use context::{DEFAULT_VM_SIZE, ResourceContext};
pub use naming::{RANDOM_SUFFIX_LEN, generate_name, random_string, resource_group_name};
pub use provision::{ADMIN_PASSWORD, ADMIN_USERNAME};
pub use validate::{
    ValidationError, validate_lro_response, validate_plan, validate_vm, validate_vm_instance_view,
};

/// Adjusts a machine definition before it is submitted.
pub type VmModifier = Box<dyn FnOnce(&mut VirtualMachine) + Send>;

/// Errors raised while driving the harness.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum HarnessError {
    /// Raised when the configuration is incomplete.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// Raised when a provider call fails.
    #[error(transparent)]
    Arm(#[from] ArmError),
    /// Raised when an answer does not match what was submitted.
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// Raised when a call succeeds with an unexpected status.
    #[error("{operation} returned status {actual}, expected {expected}")]
    UnexpectedStatus {
        /// Operation that was called.
        operation: String,
        /// Expected status code.
        expected: u16,
        /// Returned status code.
        actual: u16,
    },
    /// Raised when the provider omits a value later steps depend on.
    #[error("provider did not return the {what}")]
    Incomplete {
        /// Description of the missing value.
        what: String,
    },
}

fn expect_status(operation: &str, expected: StatusCode, actual: StatusCode) -> Result<(), HarnessError> {
    if expected == actual {
        return Ok(());
    }
    Err(HarnessError::UnexpectedStatus {
        operation: operation.to_owned(),
        expected: expected.as_u16(),
        actual: actual.as_u16(),
    })
}

/// Options of [`ComputeHarness::create_vm_with`].
#[derive(Default)]
pub struct CreateVmOptions {
    /// Context to reuse; a fresh one is created when absent.
    pub context: Option<ResourceContext>,
    /// VHD image the OS disk is created from.
    pub image_uri: Option<String>,
    /// Attaches a public IP address when a fresh context is created.
    pub public_ip: bool,
    /// Last-minute changes to the definition.
    pub modifier: Option<VmModifier>,
}

impl CreateVmOptions {
    /// Reuses `context`.
    #[must_use]
    pub fn context(mut self, context: ResourceContext) -> Self {
        self.context = Some(context);
        self
    }

    /// Creates the OS disk from the VHD at `uri`.
    #[must_use]
    pub fn image_uri(mut self, uri: impl Into<String>) -> Self {
        self.image_uri = Some(uri.into());
        self
    }

    /// Attaches a public IP address.
    #[must_use]
    pub const fn public_ip(mut self, enabled: bool) -> Self {
        self.public_ip = enabled;
        self
    }

    /// Applies `modifier` to the definition before submission.
    #[must_use]
    pub fn modifier(mut self, modifier: impl FnOnce(&mut VirtualMachine) + Send + 'static) -> Self {
        self.modifier = Some(Box::new(modifier));
        self
    }
}

/// Machine returned by a successful [`ComputeHarness::create_vm_with`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CreatedVm {
    /// Machine as read back after provisioning.
    pub vm: VirtualMachine,
    /// Context holding the submitted definition.
    pub context: ResourceContext,
}

/// Drives machine creation against one resource group.
#[derive(Clone, Debug)]
pub struct ComputeHarness {
    client: ArmClient,
    location: String,
    resource_group: String,
    prefix: String,
    mocked: bool,
}

impl ComputeHarness {
    /// Builds the client from configuration and picks a fresh resource group
    /// name.
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::Config`] when required settings are missing.
    pub fn from_config(config: &ArmConfig) -> Result<Self, HarnessError> {
        config.validate()?;
        let client = ArmClient::new(config)?;
        Ok(Self::with_client(
            client,
            config.location(),
            &config.resource_group_prefix,
            config.is_mocked(),
        ))
    }

    /// Wraps an existing client.
    #[must_use]
    pub fn with_client(
        client: ArmClient,
        location: impl Into<String>,
        prefix: &str,
        mocked: bool,
    ) -> Self {
        let location = location.into();
        let resource_group = resource_group_name(prefix);
        info!(region = %location, resource_group = %resource_group, "harness ready");
        Self {
            client,
            location,
            resource_group,
            prefix: prefix.to_owned(),
            mocked,
        }
    }

    /// Client shared by every operation group.
    #[must_use]
    pub const fn client(&self) -> &ArmClient {
        &self.client
    }

    /// Region resources are created in.
    #[must_use]
    pub fn location(&self) -> &str {
        &self.location
    }

    /// Resource group owned by this harness.
    #[must_use]
    pub fn resource_group(&self) -> &str {
        &self.resource_group
    }

    /// Whether the client talks to a mock endpoint.
    #[must_use]
    pub const fn is_mocked(&self) -> bool {
        self.mocked
    }

    /// Generates a name under the harness prefix: prefix + `suffix` + five
    /// random letters.
    #[must_use]
    pub fn generate_name(&self, suffix: &str) -> String {
        generate_name(&self.prefix, suffix)
    }

    /// Creates a context in the harness's region and resource group.
    #[must_use]
    pub fn new_context(&self, create_public_ip: bool) -> ResourceContext {
        ResourceContext::new(
            self.location.clone(),
            self.resource_group.clone(),
            self.client.subscription_id(),
            create_public_ip,
            &self.prefix,
        )
    }

    /// Creates or updates a resource group in the harness's region.
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::Arm`] when the request fails.
    pub async fn create_or_update_resource_group(
        &self,
        name: &str,
    ) -> Result<ResourceGroup, HarnessError> {
        Ok(provision::create_resource_group(&self.client, name, &self.location).await?)
    }

    /// Creates a machine with default options.
    ///
    /// # Errors
    ///
    /// See [`ComputeHarness::create_vm_with`].
    pub async fn create_vm(&self, vm_name: &str) -> Result<CreatedVm, HarnessError> {
        self.create_vm_with(vm_name, CreateVmOptions::default())
            .await
    }

    /// Creates a machine and checks every answer.
    ///
    /// The creation must answer `201 Created` with the submitted name,
    /// location and availability set, and pass [`validate_vm`]. Once the
    /// operation has succeeded and passed [`validate_lro_response`], the
    /// machine is read back, which must answer `200 OK` and pass
    /// [`validate_vm`] again.
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError`] when a call fails, a status is unexpected or
    /// a check does not hold.
    pub async fn create_vm_with(
        &self,
        vm_name: &str,
        options: CreateVmOptions,
    ) -> Result<CreatedVm, HarnessError> {
        let mut context = options
            .context
            .unwrap_or_else(|| self.new_context(options.public_ip));
        if let Some(uri) = options.image_uri.filter(|uri| !uri.is_empty()) {
            context.set_source_image_uri(uri);
        }
        info!(
            vm = vm_name,
            resource_group = context.resource_group(),
            image = context.source_image_uri().unwrap_or_default(),
            "creating virtual machine"
        );

        let response =
            provision::submit_vm(&self.client, &mut context, vm_name, options.modifier).await?;
        let submitted = context.vm_input().cloned().ok_or_else(|| HarnessError::Incomplete {
            what: String::from("submitted machine definition"),
        })?;
        info!(vm = vm_name, "creation is requested");

        expect_status("create virtual machine", StatusCode::CREATED, response.status)?;
        let created = &response.body;
        validate::expect_eq("name", &Some(vm_name), &created.name.as_deref())?;
        validate::expect_eq_ignore_case("location", &submitted.location, &created.location)?;
        validate::expect_eq_ignore_case(
            "availabilitySet.id",
            &context.availability_set_id(),
            created.availability_set_id().unwrap_or_default(),
        )?;
        validate_vm(&submitted, created)?;

        let operation_url = response.async_operation_url()?;
        let status = self.client.wait_for_operation(operation_url).await?;
        validate_lro_response(&status, operation_url)?;

        info!(vm = vm_name, "get vm");
        let fetched = self
            .client
            .virtual_machines()
            .get(context.resource_group(), vm_name)
            .await?;
        expect_status("get virtual machine", StatusCode::OK, fetched.status)?;
        validate_vm(&submitted, &fetched.body)?;

        Ok(CreatedVm {
            vm: fetched.into_body(),
            context,
        })
    }

    /// Starts deleting the harness's resource group, expecting
    /// `202 Accepted`. Skipped in mock mode.
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError`] when the request fails or is not accepted.
    pub async fn cleanup_resource_group(&self) -> Result<(), HarnessError> {
        if self.mocked {
            return Ok(());
        }
        info!(resource_group = %self.resource_group, "start remove resource group");
        let response = self
            .client
            .resource_groups()
            .begin_deleting(&self.resource_group)
            .await?;
        expect_status("begin deleting resource group", StatusCode::ACCEPTED, response.status)?;
        info!(resource_group = %self.resource_group, "remove resource group request submitted");
        Ok(())
    }
}
