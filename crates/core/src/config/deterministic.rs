//! Deterministic deployment resolution.
//!
//! When enabled, each network's chain ID is mapped to the singleton
//! factory bootstrap data the deploy tool needs: the factory address, the
//! one-shot deployer, how much to fund it with and the pre-signed
//! transaction. Resolution is deferred until a chain ID is known, so the
//! assembled config carries a resolver rather than a precomputed value.

use super::EnvSnapshot;
use alloy::primitives::{Address, Bytes, U256};
use deploy_config_chain::{FactoryRegistry, SingletonFactoryInfo};
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Everything needed to bootstrap the singleton factory on one chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentDescriptor {
    /// Factory address
    pub factory: Address,
    /// Signer of the pre-signed transaction
    pub deployer: Address,
    /// Wei to send to the deployer, base-10
    pub funding: String,
    /// Pre-signed deployment transaction
    pub signed_tx: Bytes,
}

impl DeploymentDescriptor {
    pub fn from_factory(info: &SingletonFactoryInfo) -> Self {
        Self {
            factory: info.address,
            deployer: info.signer_address,
            funding: funding_for(info).to_string(),
            signed_tx: info.transaction.clone(),
        }
    }
}

/// Exact `gas_limit * gas_price`. Two 128-bit factors always fit in 256 bits.
pub fn funding_for(info: &SingletonFactoryInfo) -> U256 {
    U256::from(info.gas_limit) * U256::from(info.gas_price)
}

/// Resolve the descriptor for `chain_id`.
///
/// Returns `None` when the feature is disabled or the chain has no factory.
pub fn resolve_deterministic_deployment(
    enabled: bool,
    chain_id: u64,
    registry: &dyn FactoryRegistry,
) -> Option<DeploymentDescriptor> {
    if !enabled {
        return None;
    }
    let info = registry.by_chain_id(chain_id)?;
    Some(DeploymentDescriptor::from_factory(&info))
}

/// Deferred resolver stored in the assembled configuration.
///
/// Two resolvers are equal when they resolve every chain to the same
/// descriptor, whichever registry instance backs them.
#[derive(Clone)]
pub struct DeterministicDeployment {
    registry: Arc<dyn FactoryRegistry>,
}

impl DeterministicDeployment {
    pub fn new(registry: Arc<dyn FactoryRegistry>) -> Self {
        Self { registry }
    }

    /// Resolver when `CUSTOM_DETERMINISTIC_DEPLOYMENT` is exactly `"true"`.
    pub fn from_env(env: &EnvSnapshot, registry: Arc<dyn FactoryRegistry>) -> Option<Self> {
        env.deterministic_deployment_enabled()
            .then(|| Self::new(registry))
    }

    pub fn resolve(&self, chain_id: u64) -> Option<DeploymentDescriptor> {
        resolve_deterministic_deployment(true, chain_id, self.registry.as_ref())
    }

    /// Descriptors for every chain the registry knows.
    pub fn table(&self) -> BTreeMap<u64, DeploymentDescriptor> {
        self.registry
            .chain_ids()
            .into_iter()
            .filter_map(|chain_id| Some((chain_id, self.resolve(chain_id)?)))
            .collect()
    }
}

impl PartialEq for DeterministicDeployment {
    fn eq(&self, other: &Self) -> bool {
        self.table() == other.table()
    }
}

impl Eq for DeterministicDeployment {}

impl fmt::Debug for DeterministicDeployment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeterministicDeployment")
            .field("chains", &self.registry.chain_ids())
            .finish()
    }
}

/// Serialized as the chain-ID keyed table form the deploy tool accepts.
impl Serialize for DeterministicDeployment {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(
            self.table()
                .into_iter()
                .map(|(chain_id, descriptor)| (chain_id.to_string(), descriptor)),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::vars;
    use alloy::primitives::address;
    use deploy_config_chain::SingletonFactoryRegistry;

    fn info(chain_id: u64, gas_limit: u128, gas_price: u128) -> SingletonFactoryInfo {
        SingletonFactoryInfo {
            chain_id,
            address: address!("914d7Fec6aaC8cd542e72Bca78B30650d45643d7"),
            signer_address: address!("E1CB04A0fA36DdD16a06ea828007E35e1a3cBC37"),
            gas_limit,
            gas_price,
            transaction: Bytes::from_static(&[0xf8, 0xa7]),
        }
    }

    fn registry() -> Arc<dyn FactoryRegistry> {
        Arc::new(
            SingletonFactoryRegistry::new()
                .with_entry(info(1, 100_000, 20_000_000_000))
                .with_entry(info(137, 100_000, 100_000_000_000)),
        )
    }

    #[test]
    fn test_funding_is_exact() {
        let registry = registry();
        let descriptor = resolve_deterministic_deployment(true, 1, registry.as_ref()).unwrap();
        assert_eq!(descriptor.funding, "2000000000000000");
        assert_eq!(descriptor.factory, address!("914d7Fec6aaC8cd542e72Bca78B30650d45643d7"));
        assert_eq!(descriptor.deployer, address!("E1CB04A0fA36DdD16a06ea828007E35e1a3cBC37"));
        assert_eq!(descriptor.signed_tx, Bytes::from_static(&[0xf8, 0xa7]));
    }

    #[test]
    fn test_funding_beyond_native_range() {
        let near_2_53 = (1u128 << 53) + 1;
        let descriptor = DeploymentDescriptor::from_factory(&info(1, near_2_53, 10u128.pow(20)));
        assert_eq!(descriptor.funding, format!("{}{}", near_2_53, "0".repeat(20)));

        // (2^128 - 1)^2 = 2^256 - 2^129 + 1
        let max = funding_for(&info(1, u128::MAX, u128::MAX));
        assert_eq!(max, U256::MAX - (U256::from(1u8) << 129usize) + U256::from(2u8));
    }

    #[test]
    fn test_unsupported_chain_is_absent() {
        let registry = registry();
        for chain_id in [0, 5, 10, 42161, u64::MAX] {
            assert!(resolve_deterministic_deployment(true, chain_id, registry.as_ref()).is_none());
        }
    }

    #[test]
    fn test_disabled_is_absent() {
        let registry = registry();
        assert!(resolve_deterministic_deployment(false, 1, registry.as_ref()).is_none());
    }

    #[test]
    fn test_resolution_is_pure() {
        let resolver = DeterministicDeployment::new(registry());
        assert_eq!(resolver.resolve(137), resolver.resolve(137));
        assert_eq!(resolver.resolve(137).unwrap().funding, "10000000000000000");
    }

    #[test]
    fn test_from_env_requires_exact_true() {
        let registry = registry();
        for value in ["TRUE", "1", "", "yes"] {
            let env = EnvSnapshot::from_pairs([(vars::CUSTOM_DETERMINISTIC_DEPLOYMENT, value)]);
            assert!(DeterministicDeployment::from_env(&env, registry.clone()).is_none());
        }

        let env = EnvSnapshot::from_pairs([(vars::CUSTOM_DETERMINISTIC_DEPLOYMENT, "true")]);
        let resolver = DeterministicDeployment::from_env(&env, registry).unwrap();
        assert!(resolver.resolve(1).is_some());
    }

    #[test]
    fn test_equality_compares_resolved_descriptors() {
        let shared = registry();
        assert_eq!(
            DeterministicDeployment::new(shared.clone()),
            DeterministicDeployment::new(shared)
        );
        // Separate registry instances with the same entries are equal.
        assert_eq!(
            DeterministicDeployment::new(registry()),
            DeterministicDeployment::new(registry())
        );

        let repriced: Arc<dyn FactoryRegistry> =
            Arc::new(SingletonFactoryRegistry::new().with_entry(info(1, 100_000, 1)));
        assert_ne!(
            DeterministicDeployment::new(registry()),
            DeterministicDeployment::new(repriced)
        );
    }

    #[test]
    fn test_serialized_table() {
        let resolver = DeterministicDeployment::new(registry());
        let value = serde_json::to_value(&resolver).unwrap();
        assert_eq!(value["1"]["funding"], "2000000000000000");
        assert_eq!(value["137"]["signedTx"], "0xf8a7");
        assert!(value.get("5").is_none());
    }
}
