//! Final configuration assembly.
//!
//! Composes the resolved credential, network table, compiler section and
//! deterministic-deployment resolver into the document the build tool
//! consumes. Assembly is pure: the same snapshot and filesystem state
//! always produce an equal [`FinalConfig`].

use super::{
    network_names, resolve_credential, resolve_mnemonic, url_template, CompilerMode, ConfigError,
    Credential, DeterministicDeployment, EnvSnapshot, LocalNetworkConfig, NetworkEndpoint,
    NetworkTable, SolidityConfig,
};
use deploy_config_chain::FactoryRegistry;
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, warn};

/// Test runner timeout in milliseconds.
pub const MOCHA_TIMEOUT_MS: u64 = 10_000;

/// Test runner settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MochaConfig {
    pub timeout: u64,
}

impl Default for MochaConfig {
    fn default() -> Self {
        Self {
            timeout: MOCHA_TIMEOUT_MS,
        }
    }
}

/// Contract verification settings, passed through untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EtherscanConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
}

/// The assembled build configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FinalConfig {
    pub solidity: SolidityConfig,
    pub networks: NetworkTable,
    /// Present only when deterministic deployment is enabled
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deterministic_deployment: Option<DeterministicDeployment>,
    pub mocha: MochaConfig,
    pub etherscan: EtherscanConfig,
    /// Credential shared by every endpoint
    #[serde(skip)]
    credential: Arc<Credential>,
}

impl FinalConfig {
    /// Remote network by name.
    pub fn network(&self, name: &str) -> Option<&NetworkEndpoint> {
        self.networks.get(name)
    }

    pub fn credential(&self) -> &Credential {
        &self.credential
    }

    /// True when accounts derive from the publicly known test phrase.
    pub fn insecure_fallback_in_use(&self) -> bool {
        self.credential.is_insecure_default()
    }

    pub fn with_etherscan_api_key(mut self, api_key: Option<String>) -> Self {
        self.etherscan.api_key = api_key;
        self
    }

    /// Log the assembled configuration.
    pub fn log_summary(&self) {
        info!(
            networks = self.networks.len(),
            credential = self.credential.kind(),
            compiler_mode = ?self.solidity.mode(),
            default_solc = %self.solidity.default_profile().version,
            deterministic_deployment = self.deterministic_deployment.is_some(),
            "Deployment configuration assembled"
        );
    }
}

/// Compose the configuration from already-resolved parts.
///
/// Every endpoint shares the same credential; the deterministic resolver
/// is attached as-is, not evaluated.
pub fn assemble<'a, I, F>(
    names: I,
    url_for: F,
    credential: Credential,
    deterministic: Option<DeterministicDeployment>,
    solidity: SolidityConfig,
) -> FinalConfig
where
    I: IntoIterator<Item = &'a str>,
    F: Fn(&str) -> String,
{
    let credential = Arc::new(credential);
    let endpoints = names
        .into_iter()
        .map(|name| NetworkEndpoint {
            name: name.to_string(),
            url: url_for(name),
            credential: Arc::clone(&credential),
        })
        .collect();

    FinalConfig {
        solidity,
        networks: NetworkTable::new(LocalNetworkConfig::default(), endpoints),
        deterministic_deployment: deterministic,
        mocha: MochaConfig::default(),
        etherscan: EtherscanConfig::default(),
        credential,
    }
}

/// Resolve the full configuration from a snapshot and the filesystem.
pub fn load_config(
    env: &EnvSnapshot,
    registry: Arc<dyn FactoryRegistry>,
) -> Result<FinalConfig, ConfigError> {
    let phrase = resolve_mnemonic(env.mnemonic_file(), env.home())?;
    let credential = resolve_credential(env.private_key(), phrase);

    if credential.is_insecure_default() {
        warn!(
            "No mnemonic file and no PK set: using the public test mnemonic. \
             Never fund these accounts."
        );
    }

    if env.infura_key().is_none() {
        warn!("INFURA_KEY not set; Infura endpoints keep their placeholder");
    }

    let deterministic = DeterministicDeployment::from_env(env, registry);
    let solidity = SolidityConfig::project(CompilerMode::from_env(env));

    let url_for = |name: &str| {
        url_template(name)
            .map(|template| env.expand(template))
            .unwrap_or_default()
    };

    let config = assemble(network_names(), url_for, credential, deterministic, solidity)
        .with_etherscan_api_key(env.etherscan_api_key().map(str::to_string));

    config.log_summary();
    Ok(config)
}
