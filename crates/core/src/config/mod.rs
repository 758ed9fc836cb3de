//! Deployment configuration resolution.
//!
//! This module provides:
//! - An immutable environment snapshot
//! - Credential resolution (private key vs. recovery phrase)
//! - Deterministic deployment resolution per chain ID
//! - Compiler profile selection with coverage collapse
//! - The network registry data
//! - Final configuration assembly

mod assembler;
mod compiler;
mod credential;
mod deterministic;
mod env;
mod error;
mod networks;

pub use assembler::{
    assemble, load_config, EtherscanConfig, FinalConfig, MochaConfig, MOCHA_TIMEOUT_MS,
};
pub use compiler::{
    project_overrides, select_profile, CompilerMode, CompilerOverrideMap, CompilerProfile,
    CompilerSettings, OptimizerSettings, SolidityConfig, DEFAULT_SOLC_VERSION,
    OPTIMIZED_SOLC_VERSION, OPTIMIZED_SOURCES, OPTIMIZER_RUNS,
};
pub use credential::{
    mnemonic_path, resolve_credential, resolve_mnemonic, Credential, MnemonicOrigin,
    MnemonicPhrase, DEFAULT_MNEMONIC_PATH, INSECURE_TEST_MNEMONIC,
};
pub use deterministic::{
    funding_for, resolve_deterministic_deployment, DeploymentDescriptor, DeterministicDeployment,
};
pub use env::{vars, EnvSnapshot};
pub use error::ConfigError;
pub use networks::{
    network_names, url_template, LocalNetworkConfig, NetworkEndpoint, NetworkTable,
    KNOWN_NETWORKS, LOCAL_NETWORK,
};
