//! Signer derivation for resolved credentials.
//!
//! The configuration core only decides *which* credential applies; turning
//! it into a usable key happens here. Mnemonic accounts follow the build
//! tool's defaults: BIP-44 path `m/44'/60'/0'/0/{index}`, 20 accounts.

use alloy::primitives::Address;
use alloy::signers::local::{coins_bip39::English, MnemonicBuilder, PrivateKeySigner};
use std::fmt;
use thiserror::Error;

/// Derivation path prefix for mnemonic accounts.
pub const DEFAULT_DERIVATION_PREFIX: &str = "m/44'/60'/0'/0/";

/// Number of accounts the build tool derives from a mnemonic by default.
pub const DEFAULT_ACCOUNT_COUNT: u32 = 20;

/// Secret material a signer can be built from.
#[derive(Clone, Copy)]
pub enum SigningSource<'a> {
    /// Hex private key, with or without `0x`
    PrivateKey(&'a str),
    /// BIP-39 recovery phrase
    Mnemonic(&'a str),
}

impl fmt::Debug for SigningSource<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SigningSource::PrivateKey(_) => f.write_str("PrivateKey(<redacted>)"),
            SigningSource::Mnemonic(_) => f.write_str("Mnemonic(<redacted>)"),
        }
    }
}

/// Signer construction errors.
#[derive(Debug, Error)]
pub enum SignerError {
    #[error("Invalid private key: {0}")]
    InvalidPrivateKey(String),

    #[error("Mnemonic derivation failed for account {index}: {reason}")]
    Derivation { index: u32, reason: String },
}

/// Build the signer for account `index`.
///
/// A private key has exactly one account; `index` only applies to mnemonics.
pub fn signer_for(source: SigningSource<'_>, index: u32) -> Result<PrivateKeySigner, SignerError> {
    match source {
        SigningSource::PrivateKey(key) => {
            let key_str = key.trim().trim_start_matches("0x");
            key_str
                .parse::<PrivateKeySigner>()
                .map_err(|e| SignerError::InvalidPrivateKey(e.to_string()))
        }
        SigningSource::Mnemonic(phrase) => MnemonicBuilder::<English>::default()
            .phrase(phrase.trim())
            .derivation_path(format!("{DEFAULT_DERIVATION_PREFIX}{index}"))
            .and_then(|builder| builder.build())
            .map_err(|e| SignerError::Derivation {
                index,
                reason: e.to_string(),
            }),
    }
}

/// Addresses of the first `count` accounts for a source.
pub fn derive_accounts(source: SigningSource<'_>, count: u32) -> Result<Vec<Address>, SignerError> {
    match source {
        SigningSource::PrivateKey(_) => Ok(vec![signer_for(source, 0)?.address()]),
        SigningSource::Mnemonic(_) => (0..count)
            .map(|index| signer_for(source, index).map(|signer| signer.address()))
            .collect(),
    }
}
