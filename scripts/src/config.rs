//! The project configuration file: wallet key, keystore location and
//! per-network settings

use std::{
    collections::HashMap,
    env, fs,
    path::{Path, PathBuf},
    str::FromStr,
};

use alloy_primitives::{Address, B256, U256};
use serde::Deserialize;
use tracing::warn;

use crate::{
    constants::{
        DEFAULT_KEYSTORE_DIR, DEFAULT_KEY_HASH, DEFAULT_VRF_FEE, DEV_MNEMONIC, HOME_ENV_VAR,
    },
    errors::ScriptError,
    types::{LogicalContract, Network},
};

/// The contents of the project configuration file
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProjectConfig {
    /// Wallet settings
    #[serde(default)]
    pub wallets: WalletConfig,
    /// The directory holding encrypted account keystores
    #[serde(default)]
    pub keystore_dir: Option<String>,
    /// Settings keyed by network name
    #[serde(default)]
    pub networks: HashMap<String, NetworkConfig>,
}

/// Wallet settings
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WalletConfig {
    /// The private key used on live networks, usually `${PRIVATE_KEY}`
    pub from_key: Option<String>,
}

/// Settings for a single network
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NetworkConfig {
    /// The RPC url of the network
    pub rpc_url: Option<String>,
    /// The mnemonic the node derives its dev accounts from
    pub dev_mnemonic: Option<String>,
    /// The ETH / USD price feed address
    pub eth_usd_price_feed: Option<String>,
    /// The VRF coordinator address
    pub vrf_coordinator: Option<String>,
    /// The LINK token address
    pub link_token: Option<String>,
    /// The VRF key hash
    pub key_hash: Option<String>,
    /// The VRF fee, in LINK wei
    pub fee: Option<String>,
}

impl ProjectConfig {
    /// Read the configuration from the given path, falling back to an empty
    /// configuration if the file doesn't exist
    pub fn load(path: &Path) -> Result<Self, ScriptError> {
        if !path.exists() {
            warn!("No configuration found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path).map_err(|e| {
            ScriptError::Config(format!("failed to read {}: {}", path.display(), e))
        })?;
        Self::from_json(&contents)
    }

    /// Parse the configuration from a JSON string
    pub fn from_json(contents: &str) -> Result<Self, ScriptError> {
        serde_json::from_str(contents).map_err(|e| ScriptError::Config(e.to_string()))
    }

    /// Get the settings for the given network, which may be absent
    pub fn network(&self, network: &Network) -> Option<&NetworkConfig> {
        self.networks.get(&network.name)
    }

    /// The private key used on live networks
    pub fn from_key(&self) -> Result<String, ScriptError> {
        let raw = self
            .wallets
            .from_key
            .as_deref()
            .ok_or_else(|| ScriptError::Config("`wallets.from_key` is not set".to_string()))?;
        expand_env(raw)
    }

    /// The directory holding encrypted account keystores
    pub fn keystore_dir(&self) -> Result<PathBuf, ScriptError> {
        match &self.keystore_dir {
            Some(dir) => {
                let dir = expand_env(dir)?;
                match dir.strip_prefix("~/") {
                    Some(rest) => Ok(home_dir()?.join(rest)),
                    None => Ok(PathBuf::from(dir)),
                }
            }
            None => Ok(home_dir()?.join(DEFAULT_KEYSTORE_DIR)),
        }
    }

    /// The RPC url of the given network, if configured
    pub fn rpc_url(&self, network: &Network) -> Result<Option<String>, ScriptError> {
        self.network(network)
            .and_then(|n| n.rpc_url.as_deref())
            .map(expand_env)
            .transpose()
    }

    /// The mnemonic the node on the given network derives its dev accounts from
    ///
    /// Live networks have no dev accounts unless a mnemonic is configured
    pub fn dev_mnemonic(&self, network: &Network) -> Result<String, ScriptError> {
        match self.network(network).and_then(|n| n.dev_mnemonic.as_deref()) {
            Some(mnemonic) => expand_env(mnemonic),
            None if network.has_dev_accounts() => Ok(DEV_MNEMONIC.to_string()),
            None => Err(ScriptError::Account(format!(
                "network {} has no dev accounts, configure `dev_mnemonic` to index into one",
                network
            ))),
        }
    }

    /// The configured address of a logical contract on the given network
    pub fn contract_address(
        &self,
        network: &Network,
        contract: LogicalContract,
    ) -> Result<Address, ScriptError> {
        let settings = self.network(network);
        let raw = settings
            .and_then(|n| match contract {
                LogicalContract::EthUsdPriceFeed => n.eth_usd_price_feed.as_deref(),
                LogicalContract::VrfCoordinator => n.vrf_coordinator.as_deref(),
                LogicalContract::LinkToken => n.link_token.as_deref(),
            })
            .ok_or_else(|| {
                ScriptError::Config(format!(
                    "no `{}` address configured for network {}",
                    contract.config_key(),
                    network
                ))
            })?;

        Address::from_str(&expand_env(raw)?)
            .map_err(|e| ScriptError::Config(format!("bad `{}` address: {}", contract, e)))
    }

    /// The VRF key hash on the given network
    pub fn key_hash(&self, network: &Network) -> Result<B256, ScriptError> {
        let raw = match self.network(network).and_then(|n| n.key_hash.as_deref()) {
            Some(raw) => expand_env(raw)?,
            None if network.is_local() => DEFAULT_KEY_HASH.to_string(),
            None => {
                return Err(ScriptError::Config(format!(
                    "no `key_hash` configured for network {}",
                    network
                )))
            }
        };

        B256::from_str(&raw).map_err(|e| ScriptError::Config(format!("bad `key_hash`: {}", e)))
    }

    /// The VRF fee on the given network
    pub fn vrf_fee(&self, network: &Network) -> Result<U256, ScriptError> {
        match self.network(network).and_then(|n| n.fee.as_deref()) {
            Some(raw) => U256::from_str(&expand_env(raw)?)
                .map_err(|e| ScriptError::Config(format!("bad `fee`: {}", e))),
            None if network.is_local() => Ok(U256::from(DEFAULT_VRF_FEE)),
            None => Err(ScriptError::Config(format!(
                "no `fee` configured for network {}",
                network
            ))),
        }
    }
}

/// Replace a `${VAR}` value with the contents of the environment variable
fn expand_env(value: &str) -> Result<String, ScriptError> {
    match value.strip_prefix("${").and_then(|v| v.strip_suffix('}')) {
        Some(var) => env::var(var).map_err(|_| {
            ScriptError::Config(format!("environment variable `{}` is not set", var))
        }),
        None => Ok(value.to_string()),
    }
}

/// The user's home directory
fn home_dir() -> Result<PathBuf, ScriptError> {
    env::var(HOME_ENV_VAR)
        .map(PathBuf::from)
        .map_err(|_| ScriptError::Config("could not determine home directory".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A config with one local and one live network
    const CONFIG: &str = r#"{
        "wallets": { "from_key": "${LOTTERY_TEST_FROM_KEY}" },
        "keystore_dir": "/tmp/keystores",
        "networks": {
            "development": { "rpc_url": "http://localhost:7545" },
            "sepolia": {
                "rpc_url": "https://rpc.sepolia.example",
                "eth_usd_price_feed": "0x694AA1769357215DE4FAC081bf1f309aDC325306",
                "vrf_coordinator": "0x8103B0A8A00be2DDC778e6e7eaa21791Cd364625",
                "link_token": "0x779877A7B0D9E8603169DdbD7836e478b4624789",
                "key_hash": "0x474e34a077df58807dbe9c96d3c009b23b3c6d0cce433e59bbf5b34f823bc56c",
                "fee": "250000000000000000"
            }
        }
    }"#;

    #[test]
    fn test_contract_addresses() {
        let config = ProjectConfig::from_json(CONFIG).unwrap();
        let sepolia = Network::new("sepolia");

        let feed = config
            .contract_address(&sepolia, LogicalContract::EthUsdPriceFeed)
            .unwrap();
        assert_eq!(
            feed,
            Address::from_str("0x694AA1769357215DE4FAC081bf1f309aDC325306").unwrap()
        );
        assert_eq!(
            config.vrf_fee(&sepolia).unwrap(),
            U256::from(250_000_000_000_000_000u128)
        );
    }

    #[test]
    fn test_missing_address() {
        let config = ProjectConfig::from_json(CONFIG).unwrap();
        let res = config.contract_address(&Network::new("goerli"), LogicalContract::LinkToken);
        assert!(matches!(res, Err(ScriptError::Config(_))));
    }

    #[test]
    fn test_local_defaults() {
        let config = ProjectConfig::default();
        let dev = Network::new("development");

        assert_eq!(config.vrf_fee(&dev).unwrap(), U256::from(DEFAULT_VRF_FEE));
        assert_eq!(
            config.key_hash(&dev).unwrap(),
            B256::from_str(DEFAULT_KEY_HASH).unwrap()
        );
        assert_eq!(config.dev_mnemonic(&dev).unwrap(), DEV_MNEMONIC);
        assert!(config.key_hash(&Network::new("sepolia")).is_err());
    }

    #[test]
    fn test_dev_mnemonic_on_live_network() {
        let sepolia = Network::new("sepolia");
        let res = ProjectConfig::default().dev_mnemonic(&sepolia);
        assert!(matches!(res, Err(ScriptError::Account(_))));

        let config = ProjectConfig::from_json(
            r#"{"networks": {"sepolia": {"dev_mnemonic": "abandon abandon about"}}}"#,
        )
        .unwrap();
        assert_eq!(config.dev_mnemonic(&sepolia).unwrap(), "abandon abandon about");
    }

    #[test]
    fn test_from_key_env_expansion() {
        let config = ProjectConfig::from_json(CONFIG).unwrap();

        env::remove_var("LOTTERY_TEST_FROM_KEY");
        assert!(config.from_key().is_err());

        env::set_var("LOTTERY_TEST_FROM_KEY", "0xabc");
        assert_eq!(config.from_key().unwrap(), "0xabc");
        env::remove_var("LOTTERY_TEST_FROM_KEY");
    }

    #[test]
    fn test_rpc_url() {
        let config = ProjectConfig::from_json(CONFIG).unwrap();
        assert_eq!(
            config.rpc_url(&Network::new("development")).unwrap().as_deref(),
            Some("http://localhost:7545")
        );
        assert_eq!(config.rpc_url(&Network::new("ganache-local")).unwrap(), None);
        assert_eq!(config.keystore_dir().unwrap(), PathBuf::from("/tmp/keystores"));
    }
}
