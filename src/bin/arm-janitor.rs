//! Resource group janitor for `arm-compute` test runs.
//!
//! This binary starts deleting every resource group whose name carries the
//! harness prefix and then verifies that none is left behind.

use std::io::Write as _;

use arm_compute::janitor::{DEFAULT_PREFIX, Janitor, JanitorConfig};
use arm_compute::{ArmClient, ArmConfig};
use clap::Parser;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(
    name = "arm-janitor",
    about = "Delete resource groups left behind by arm-compute test runs"
)]
struct Cli {
    /// Resource group name prefix to sweep.
    #[arg(long, env = "ARM_RESOURCE_GROUP_PREFIX", default_value = DEFAULT_PREFIX)]
    prefix: String,
}

#[tokio::main]
async fn main() -> Result<(), String> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = JanitorConfig::new(cli.prefix).map_err(|err| err.to_string())?;
    let arm_config = ArmConfig::load_without_cli_args().map_err(|err| err.to_string())?;
    let client = ArmClient::new(&arm_config).map_err(|err| err.to_string())?;
    let summary = Janitor::new(config, &client)
        .sweep()
        .await
        .map_err(|err| err.to_string())?;
    writeln!(
        std::io::stdout(),
        "janitor sweep complete: deleted_groups={}",
        summary.deleted_groups
    )
    .map_err(|err| err.to_string())?;
    Ok(())
}
