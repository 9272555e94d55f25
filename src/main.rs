//! Binary entry point for the `arm-compute` CLI.

use std::io::{self, Write};
use std::process;

use clap::Parser;
use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use arm_compute::{ArmClient, ArmConfig, ArmError, ComputeHarness, CreateVmOptions, HarnessError};

mod cli;

use cli::{Cli, CreateVmCommand, DeleteGroupCommand, GetVmCommand, OperationStatusCommand};

#[derive(Debug, Error)]
enum CliError {
    #[error("configuration error: {0}")]
    Config(String),
    #[error(transparent)]
    Arm(#[from] ArmError),
    #[error(transparent)]
    Harness(#[from] HarnessError),
    #[error("failed to write output: {0}")]
    Output(String),
}

#[tokio::main]
async fn main() {
    init_tracing();
    let cli = Cli::parse();
    let exit_code = match dispatch(cli).await {
        Ok(()) => 0,
        Err(err) => {
            report_error(&err);
            1
        }
    };

    process::exit(exit_code);
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn load_config() -> Result<ArmConfig, CliError> {
    ArmConfig::load_without_cli_args().map_err(|err| CliError::Config(err.to_string()))
}

async fn dispatch(cli: Cli) -> Result<(), CliError> {
    let config = load_config()?;
    let mut stdout = io::stdout();
    match cli {
        Cli::CreateVm(command) => {
            let harness = ComputeHarness::from_config(&config)?;
            create_vm(&harness, command, &mut stdout).await
        }
        Cli::GetVm(command) => {
            let client = ArmClient::new(&config)?;
            get_vm(&client, &command, &mut stdout).await
        }
        Cli::OperationStatus(command) => {
            let client = ArmClient::new(&config)?;
            operation_status(&client, &command, &mut stdout).await
        }
        Cli::DeleteGroup(command) => {
            let client = ArmClient::new(&config)?;
            delete_group(&client, &command, &mut stdout).await
        }
    }
}

async fn create_vm(
    harness: &ComputeHarness,
    command: CreateVmCommand,
    out: &mut impl Write,
) -> Result<(), CliError> {
    let mut options = CreateVmOptions::default().public_ip(command.public_ip);
    if let Some(uri) = command.image_uri {
        options = options.image_uri(uri);
    }
    let created = harness.create_vm_with(&command.name, options).await;

    if command.keep {
        info!(resource_group = harness.resource_group(), "keeping resource group");
    } else if let Err(err) = harness.cleanup_resource_group().await {
        warn!(resource_group = harness.resource_group(), error = %err, "cleanup failed");
        if created.is_ok() {
            return Err(err.into());
        }
    }

    write_json(out, &created?.vm)
}

async fn get_vm(
    client: &ArmClient,
    command: &GetVmCommand,
    out: &mut impl Write,
) -> Result<(), CliError> {
    let machines = client.virtual_machines();
    let response = if command.instance_view {
        machines
            .get_with_instance_view(&command.resource_group, &command.name)
            .await?
    } else {
        machines.get(&command.resource_group, &command.name).await?
    };
    write_json(out, &response.body)
}

async fn operation_status(
    client: &ArmClient,
    command: &OperationStatusCommand,
    out: &mut impl Write,
) -> Result<(), CliError> {
    let status = client.long_running_operation_status(&command.url).await?;
    write_json(out, &status)
}

async fn delete_group(
    client: &ArmClient,
    command: &DeleteGroupCommand,
    out: &mut impl Write,
) -> Result<(), CliError> {
    let response = client
        .resource_groups()
        .begin_deleting(&command.resource_group)
        .await?;
    writeln!(
        out,
        "deletion of {} requested: status={}",
        command.resource_group,
        response.status.as_u16()
    )
    .map_err(|err| CliError::Output(err.to_string()))
}

fn write_json(out: &mut impl Write, value: &impl Serialize) -> Result<(), CliError> {
    serde_json::to_writer_pretty(&mut *out, value)
        .map_err(|err| CliError::Output(err.to_string()))?;
    writeln!(out).map_err(|err| CliError::Output(err.to_string()))
}

fn report_error(err: &CliError) {
    write_error(io::stderr(), err);
}

fn write_error(mut target: impl Write, err: &CliError) {
    writeln!(target, "{err}").ok();
}
