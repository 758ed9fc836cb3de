//! Deployment configuration core.
//!
//! Resolves build and deployment settings for a multi-network contract
//! project from an environment snapshot:
//! - Signing credential (explicit key or recovery phrase)
//! - RPC endpoint per logical network name
//! - Singleton factory bootstrap data per chain ID
//! - Compiler profile per contract source
//!
//! Nothing here talks to a node; the output only describes how to.

pub mod config;

pub use config::{
    load_config, resolve_credential, resolve_deterministic_deployment, resolve_mnemonic,
    select_profile, CompilerMode, CompilerProfile, ConfigError, Credential, DeploymentDescriptor,
    DeterministicDeployment, EnvSnapshot, FinalConfig, MnemonicPhrase, NetworkEndpoint,
    SolidityConfig,
};
