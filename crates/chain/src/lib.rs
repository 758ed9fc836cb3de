//! Chain-facing collaborators of the deployment configuration.
//!
//! This crate provides:
//! - Singleton factory metadata per chain (in memory or from artifacts)
//! - Signer derivation from private keys and recovery phrases

pub mod factory;
pub mod signer;

pub use factory::{FactoryRegistry, SingletonFactoryInfo, SingletonFactoryRegistry, ARTIFACT_FILE};
pub use signer::{
    derive_accounts, signer_for, SignerError, SigningSource, DEFAULT_ACCOUNT_COUNT,
    DEFAULT_DERIVATION_PREFIX,
};
