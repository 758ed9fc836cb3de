//! Configuration load errors.
//!
//! Expected absences (missing mnemonic file, unsupported chain, disabled
//! feature) are not errors; they resolve to fallbacks or `None`.

use deploy_config_chain::SignerError;
use std::path::PathBuf;
use thiserror::Error;

/// Fatal configuration-load failures.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The mnemonic file exists but could not be read.
    #[error("Failed to read mnemonic file {path:?}: {source}")]
    MnemonicRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Signer error: {0}")]
    Signer(#[from] SignerError),
}
