//! Deployment configuration resolver.
//!
//! Snapshots the environment (after loading `.env`), resolves credentials,
//! network endpoints, compiler profiles and deterministic deployment data,
//! and prints the resulting document for the build tool. Logs go to
//! stderr; the document goes to stdout.

use std::sync::Arc;

use alloy::primitives::Address;
use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use serde::Serialize;
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use deploy_config_chain::{SingletonFactoryRegistry, DEFAULT_ACCOUNT_COUNT};
use deploy_config_core::{load_config, DeploymentDescriptor, EnvSnapshot};

/// Artifact directory used when `SINGLETON_FACTORY_ARTIFACTS` is unset.
const DEFAULT_ARTIFACTS_DIR: &str = "./artifacts";

#[derive(Parser)]
#[command(
    name = "deploy-config",
    version,
    about = "Resolve multi-network deployment configuration"
)]
struct Cli {
    /// Print only the deterministic deployment descriptor for this chain ID
    #[arg(long, value_name = "ID")]
    chain_id: Option<u64>,

    /// Print the first N account addresses of the resolved credential (default 20)
    #[arg(long, value_name = "N", num_args = 0..=1)]
    accounts: Option<Option<u32>>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    format: OutputFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Json,
    Toml,
}

#[derive(Serialize)]
struct AccountsOutput {
    accounts: Vec<Address>,
}

#[derive(Serialize)]
struct DescriptorOutput {
    chain_id: u64,
    #[serde(flatten)]
    descriptor: DeploymentDescriptor,
}

fn main() -> Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let env = EnvSnapshot::from_process();

    let artifacts_dir = env.factory_artifacts_dir().unwrap_or(DEFAULT_ARTIFACTS_DIR);
    let registry = SingletonFactoryRegistry::load_from_dir(artifacts_dir)
        .with_context(|| format!("Failed to load singleton factory artifacts from {artifacts_dir}"))?;

    let config = load_config(&env, Arc::new(registry)).context("Failed to load configuration")?;

    if let Some(count) = cli.accounts {
        let count = count.unwrap_or(DEFAULT_ACCOUNT_COUNT);
        let accounts = config
            .credential()
            .accounts(count)
            .context("Failed to derive accounts")?;
        info!(
            requested = count,
            derived = accounts.len(),
            "Derived accounts"
        );
        return emit(&AccountsOutput { accounts }, cli.format);
    }

    if let Some(chain_id) = cli.chain_id {
        let Some(resolver) = config.deterministic_deployment.as_ref() else {
            warn!("Deterministic deployment disabled (set CUSTOM_DETERMINISTIC_DEPLOYMENT=true)");
            return emit_none(cli.format);
        };
        return match resolver.resolve(chain_id) {
            Some(descriptor) => emit(&DescriptorOutput { chain_id, descriptor }, cli.format),
            None => {
                warn!(chain_id = chain_id, "No singleton factory for chain");
                emit_none(cli.format)
            }
        };
    }

    emit(&config, cli.format)
}

fn emit<T: Serialize>(value: &T, format: OutputFormat) -> Result<()> {
    let rendered = match format {
        OutputFormat::Json => serde_json::to_string_pretty(value)?,
        OutputFormat::Toml => toml::to_string_pretty(value)?,
    };
    println!("{rendered}");
    Ok(())
}

/// JSON prints `null`; TOML has no null, so nothing is printed.
fn emit_none(format: OutputFormat) -> Result<()> {
    if format == OutputFormat::Json {
        println!("null");
    }
    Ok(())
}
