//! Command-line interface definitions for the `arm-compute` binary.
//!
//! This module centralises the clap parser structures so both the main binary
//! and the build script can reuse them when generating the manual page.

use clap::Parser;

/// Top-level CLI for the `arm-compute` binary.
#[derive(Debug, Parser)]
#[command(
    name = "arm-compute",
    about = "Provision and inspect virtual machines through Azure Resource Manager",
    arg_required_else_help = true
)]
pub(crate) enum Cli {
    /// Create a virtual machine with its dependencies in a fresh resource group.
    #[command(
        name = "create-vm",
        about = "Create a virtual machine with its dependencies in a fresh resource group"
    )]
    CreateVm(CreateVmCommand),
    /// Show a virtual machine.
    #[command(name = "get-vm", about = "Show a virtual machine")]
    GetVm(GetVmCommand),
    /// Show the status behind an Azure-AsyncOperation URL.
    #[command(
        name = "operation-status",
        about = "Show the status behind an Azure-AsyncOperation URL"
    )]
    OperationStatus(OperationStatusCommand),
    /// Start deleting a resource group and everything in it.
    #[command(
        name = "delete-group",
        about = "Start deleting a resource group and everything in it"
    )]
    DeleteGroup(DeleteGroupCommand),
}

/// Arguments for the `arm-compute create-vm` subcommand.
#[derive(Debug, Parser)]
pub(crate) struct CreateVmCommand {
    /// Name of the virtual machine.
    #[arg(long, value_name = "NAME")]
    pub(crate) name: String,
    /// Attach a public IP address to the network interface.
    #[arg(long)]
    pub(crate) public_ip: bool,
    /// Create the OS disk from this VHD instead of the marketplace image.
    #[arg(long, value_name = "URI")]
    pub(crate) image_uri: Option<String>,
    /// Keep the resource group instead of deleting it once the machine is
    /// verified.
    #[arg(long)]
    pub(crate) keep: bool,
}

/// Arguments for the `arm-compute get-vm` subcommand.
#[derive(Debug, Parser)]
pub(crate) struct GetVmCommand {
    /// Resource group holding the machine.
    #[arg(long, value_name = "RG")]
    pub(crate) resource_group: String,
    /// Name of the virtual machine.
    #[arg(long, value_name = "NAME")]
    pub(crate) name: String,
    /// Include the runtime instance view.
    #[arg(long)]
    pub(crate) instance_view: bool,
}

/// Arguments for the `arm-compute operation-status` subcommand.
#[derive(Debug, Parser)]
pub(crate) struct OperationStatusCommand {
    /// Status URL returned in the Azure-AsyncOperation header.
    #[arg(value_name = "URL")]
    pub(crate) url: String,
}

/// Arguments for the `arm-compute delete-group` subcommand.
#[derive(Debug, Parser)]
pub(crate) struct DeleteGroupCommand {
    /// Resource group to delete.
    #[arg(value_name = "RG")]
    pub(crate) resource_group: String,
}
