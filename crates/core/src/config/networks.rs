//! Network registry data.
//!
//! The public networks the project deploys to, in declaration order, with
//! RPC URL templates. `${VAR}` placeholders are expanded from the
//! environment snapshot at assembly time.

use super::Credential;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use std::sync::Arc;

/// Name of the in-process development chain.
pub const LOCAL_NETWORK: &str = "hardhat";

/// Public networks and their RPC URL templates.
pub static KNOWN_NETWORKS: &[(&str, &str)] = &[
    ("mainnet", "https://mainnet.infura.io/v3/${INFURA_KEY}"),
    ("xdai", "https://xdai.poanetwork.dev"),
    ("ewc", "https://rpc.energyweb.org"),
    ("rinkeby", "https://rinkeby.infura.io/v3/${INFURA_KEY}"),
    ("goerli", "https://goerli.infura.io/v3/${INFURA_KEY}"),
    ("kovan", "https://kovan.infura.io/v3/${INFURA_KEY}"),
    ("polygon", "https://polygon-mainnet.infura.io/v3/${INFURA_KEY}"),
    ("volta", "https://volta-rpc.energyweb.org"),
    ("bsc", "https://bsc-dataseed.binance.org/"),
    ("arbitrum", "https://arb1.arbitrum.io/rpc"),
    ("fantomTestnet", "https://rpc.testnet.fantom.network/"),
    ("lineaTestnet", "https://rpc.goerli.linea.build"),
    ("tenetTestnet", "https://rpc.testnet.tenet.org"),
    ("tenetMainnet", "https://rpc.tenet.org"),
    ("hmyt", "https://api.s0.b.hmny.io"),
    ("chilizTestnet", "https://spicy-rpc.chiliz.com/"),
    ("mantleTestnet", "https://rpc.testnet.mantle.xyz"),
    ("rskTestnet", "https://testnet.sovryn.app"),
    ("mantleMainnet", "https://rpc.mantle.xyz"),
    ("neonMainnet", "https://neon-proxy-mainnet.solana.p2p.org"),
    ("lineaMainnet", "https://archive.linea.build"),
    ("rskMainnet", "https://public-node.rsk.co"),
    ("harmonyShard0", "https://a.api.s0.t.hmny.io"),
    ("cascadiaTestnet", "https://testnet.cascadia.foundation"),
    ("scrollSepolia", "https://sepolia-rpc.scroll.io/"),
    ("scrollAlpha", "https://scroll-alphanet.public.blastapi.io"),
    ("horizenTestnet", "https://gobi-rpc.horizenlabs.io/ethv1"),
    ("filecoinTestnet", "https://api.calibration.node.glif.io/rpc/v1"),
];

/// Names of [`KNOWN_NETWORKS`], in order.
pub fn network_names() -> impl Iterator<Item = &'static str> {
    KNOWN_NETWORKS.iter().map(|(name, _)| *name)
}

/// URL template for a known network.
pub fn url_template(name: &str) -> Option<&'static str> {
    KNOWN_NETWORKS
        .iter()
        .find(|(known, _)| *known == name)
        .map(|(_, template)| *template)
}

/// Settings of the local development chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LocalNetworkConfig {
    pub allow_unlimited_contract_size: bool,
    pub block_gas_limit: u64,
    pub gas: u64,
}

impl Default for LocalNetworkConfig {
    fn default() -> Self {
        Self {
            allow_unlimited_contract_size: true,
            block_gas_limit: 100_000_000,
            gas: 100_000_000,
        }
    }
}

/// A remote network entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NetworkEndpoint {
    /// Logical network name
    #[serde(skip)]
    pub name: String,
    /// Fully expanded RPC URL
    pub url: String,
    /// Shared signing credential
    #[serde(rename = "accounts")]
    pub credential: Arc<Credential>,
}

/// Network table: the local chain followed by the remote endpoints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkTable {
    local: LocalNetworkConfig,
    endpoints: Vec<NetworkEndpoint>,
}

impl NetworkTable {
    pub fn new(local: LocalNetworkConfig, endpoints: Vec<NetworkEndpoint>) -> Self {
        Self { local, endpoints }
    }

    pub fn local(&self) -> &LocalNetworkConfig {
        &self.local
    }

    /// Remote endpoint by name.
    pub fn get(&self, name: &str) -> Option<&NetworkEndpoint> {
        self.endpoints.iter().find(|endpoint| endpoint.name == name)
    }

    pub fn endpoints(&self) -> impl Iterator<Item = &NetworkEndpoint> {
        self.endpoints.iter()
    }

    /// All network names, local chain first.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        std::iter::once(LOCAL_NETWORK).chain(self.endpoints.iter().map(|e| e.name.as_str()))
    }

    /// Number of remote endpoints.
    pub fn len(&self) -> usize {
        self.endpoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.endpoints.is_empty()
    }
}

/// Serialized as a name-keyed map in declaration order.
impl Serialize for NetworkTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.endpoints.len() + 1))?;
        map.serialize_entry(LOCAL_NETWORK, &self.local)?;
        for endpoint in &self.endpoints {
            map.serialize_entry(&endpoint.name, endpoint)?;
        }
        map.end()
    }
}
