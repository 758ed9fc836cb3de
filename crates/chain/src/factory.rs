//! Singleton factory registry.
//!
//! Chains that support deterministic deployment carry a pre-deployed
//! singleton factory, bootstrapped by a pre-signed transaction from a
//! one-shot signer. This module exposes that metadata keyed by chain ID,
//! either built in memory or loaded from the published artifact layout:
//!
//! ```text
//! artifacts/
//!   1/deployment.json
//!   10/deployment.json
//!   137/deployment.json
//! ```

use alloy::primitives::{Address, Bytes};
use anyhow::{Context, Result};
use serde::{Deserialize, Deserializer};
use std::collections::BTreeMap;
use std::fmt::Debug;
use std::path::Path;
use tracing::{debug, info, warn};

/// Artifact file name inside each chain directory.
pub const ARTIFACT_FILE: &str = "deployment.json";

/// Static metadata about the singleton factory on one chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SingletonFactoryInfo {
    /// Chain ID the entry belongs to
    pub chain_id: u64,
    /// Address the factory lands at
    pub address: Address,
    /// Signer of the pre-signed deployment transaction
    pub signer_address: Address,
    /// Gas limit of the deployment transaction
    pub gas_limit: u128,
    /// Gas price of the deployment transaction (wei)
    pub gas_price: u128,
    /// Raw pre-signed deployment transaction
    pub transaction: Bytes,
}

/// Lookup of singleton factory metadata by chain ID.
///
/// An unsupported chain is a normal outcome and yields `None`.
pub trait FactoryRegistry: Send + Sync + Debug {
    /// Get the factory metadata for a chain.
    fn by_chain_id(&self, chain_id: u64) -> Option<SingletonFactoryInfo>;

    /// All chain IDs known to the registry, ascending.
    fn chain_ids(&self) -> Vec<u64>;
}

/// Registry of singleton factory deployments indexed by chain ID.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SingletonFactoryRegistry {
    entries: BTreeMap<u64, SingletonFactoryInfo>,
}

impl SingletonFactoryRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entry, replacing any previous entry for the same chain.
    pub fn insert(&mut self, info: SingletonFactoryInfo) {
        self.entries.insert(info.chain_id, info);
    }

    /// Builder-style [`insert`](Self::insert).
    pub fn with_entry(mut self, info: SingletonFactoryInfo) -> Self {
        self.insert(info);
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Load every `<chainId>/deployment.json` below `dir`.
    ///
    /// A missing directory yields an empty registry. Directories whose name
    /// is not a chain ID are ignored; artifacts that fail to parse are
    /// skipped with a warning.
    pub fn load_from_dir(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        let mut registry = Self::new();

        if !dir.exists() {
            debug!(dir = %dir.display(), "Singleton factory artifact directory not found");
            return Ok(registry);
        }

        let entries = std::fs::read_dir(dir)
            .with_context(|| format!("Failed to read artifact directory {:?}", dir))?;

        for entry in entries {
            let entry = entry?;
            let path = entry.path();

            let Some(chain_id) = path
                .file_name()
                .and_then(|n| n.to_str())
                .and_then(|n| n.parse::<u64>().ok())
            else {
                continue;
            };

            let file = path.join(ARTIFACT_FILE);
            if !file.is_file() {
                continue;
            }

            match load_artifact(chain_id, &file) {
                Ok(info) => {
                    debug!(
                        chain_id = chain_id,
                        factory = %info.address,
                        file = %file.display(),
                        "Loaded singleton factory artifact"
                    );
                    registry.insert(info);
                }
                Err(e) => {
                    warn!(
                        file = %file.display(),
                        error = %e,
                        "Failed to load singleton factory artifact"
                    );
                }
            }
        }

        info!(
            dir = %dir.display(),
            chains = registry.len(),
            "Singleton factory registry loaded"
        );

        Ok(registry)
    }
}

impl FactoryRegistry for SingletonFactoryRegistry {
    fn by_chain_id(&self, chain_id: u64) -> Option<SingletonFactoryInfo> {
        self.entries.get(&chain_id).cloned()
    }

    fn chain_ids(&self) -> Vec<u64> {
        self.entries.keys().copied().collect()
    }
}

impl FromIterator<SingletonFactoryInfo> for SingletonFactoryRegistry {
    fn from_iter<I: IntoIterator<Item = SingletonFactoryInfo>>(iter: I) -> Self {
        let mut registry = Self::new();
        for info in iter {
            registry.insert(info);
        }
        registry
    }
}

/// On-disk artifact shape.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DeploymentArtifact {
    #[serde(deserialize_with = "deserialize_quantity")]
    gas_price: u128,
    #[serde(deserialize_with = "deserialize_quantity")]
    gas_limit: u128,
    signer_address: Address,
    transaction: Bytes,
    address: Address,
}

/// Gas values appear both as JSON numbers and as decimal or hex strings.
#[derive(Deserialize)]
#[serde(untagged)]
enum Quantity {
    Number(u64),
    Text(String),
}

fn deserialize_quantity<'de, D>(deserializer: D) -> std::result::Result<u128, D::Error>
where
    D: Deserializer<'de>,
{
    match Quantity::deserialize(deserializer)? {
        Quantity::Number(n) => Ok(u128::from(n)),
        Quantity::Text(s) => parse_quantity(&s).map_err(serde::de::Error::custom),
    }
}

fn parse_quantity(s: &str) -> std::result::Result<u128, std::num::ParseIntError> {
    match s.strip_prefix("0x") {
        Some(hex) => u128::from_str_radix(hex, 16),
        None => s.parse(),
    }
}

fn load_artifact(chain_id: u64, path: &Path) -> Result<SingletonFactoryInfo> {
    let content = std::fs::read_to_string(path)?;
    let artifact: DeploymentArtifact = serde_json::from_str(&content)?;

    Ok(SingletonFactoryInfo {
        chain_id,
        address: artifact.address,
        signer_address: artifact.signer_address,
        gas_limit: artifact.gas_limit,
        gas_price: artifact.gas_price,
        transaction: artifact.transaction,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::address;

    const FACTORY: Address = address!("914d7Fec6aaC8cd542e72Bca78B30650d45643d7");
    const SIGNER: Address = address!("E1CB04A0fA36DdD16a06ea828007E35e1a3cBC37");

    fn write_artifact(dir: &Path, chain: &str, body: &str) {
        let chain_dir = dir.join(chain);
        std::fs::create_dir_all(&chain_dir).unwrap();
        std::fs::write(chain_dir.join(ARTIFACT_FILE), body).unwrap();
    }

    fn sample(chain_id: u64) -> SingletonFactoryInfo {
        SingletonFactoryInfo {
            chain_id,
            address: FACTORY,
            signer_address: SIGNER,
            gas_limit: 100_000,
            gas_price: 100_000_000_000,
            transaction: Bytes::from_static(&[0xf8, 0xa7, 0x80]),
        }
    }

    #[test]
    fn test_empty_registry() {
        let registry = SingletonFactoryRegistry::new();
        assert!(registry.is_empty());
        assert!(registry.by_chain_id(1).is_none());
        assert!(registry.chain_ids().is_empty());
    }

    #[test]
    fn test_in_memory_lookup() {
        let registry: SingletonFactoryRegistry = [sample(137), sample(1)].into_iter().collect();
        assert_eq!(registry.chain_ids(), vec![1, 137]);
        assert_eq!(registry.by_chain_id(137), Some(sample(137)));
        assert!(registry.by_chain_id(5).is_none());
    }

    #[test]
    fn test_parse_quantity() {
        assert_eq!(parse_quantity("100000").unwrap(), 100_000);
        assert_eq!(parse_quantity("0x174876e800").unwrap(), 100_000_000_000);
        assert!(parse_quantity("lots").is_err());
    }

    #[test]
    fn test_load_from_dir() {
        let tmp = tempfile::tempdir().unwrap();
        write_artifact(
            tmp.path(),
            "1",
            r#"{
                "gasPrice": 100000000000,
                "gasLimit": 100000,
                "signerAddress": "0xE1CB04A0fA36DdD16a06ea828007E35e1a3cBC37",
                "transaction": "0xf8a780",
                "address": "0x914d7Fec6aaC8cd542e72Bca78B30650d45643d7"
            }"#,
        );
        write_artifact(
            tmp.path(),
            "10",
            r#"{
                "gasPrice": "0x3b9aca00",
                "gasLimit": "100000",
                "signerAddress": "0xE1CB04A0fA36DdD16a06ea828007E35e1a3cBC37",
                "transaction": "0xf8a780",
                "address": "0x914d7Fec6aaC8cd542e72Bca78B30650d45643d7"
            }"#,
        );
        // Broken and foreign entries are skipped.
        write_artifact(tmp.path(), "5", "{ not json");
        write_artifact(tmp.path(), "notes", "{}");

        let registry = SingletonFactoryRegistry::load_from_dir(tmp.path()).unwrap();
        assert_eq!(registry.chain_ids(), vec![1, 10]);
        assert_eq!(registry.by_chain_id(1), Some(sample(1)));

        let optimism = registry.by_chain_id(10).unwrap();
        assert_eq!(optimism.gas_price, 1_000_000_000);
        assert_eq!(optimism.gas_limit, 100_000);
    }

    #[test]
    fn test_load_from_missing_dir() {
        let tmp = tempfile::tempdir().unwrap();
        let registry = SingletonFactoryRegistry::load_from_dir(tmp.path().join("absent")).unwrap();
        assert!(registry.is_empty());
    }
}
