//! Type definitions used throughout the scripts

use std::{
    fmt::{self, Display},
    str::FromStr,
};

use alloy::json_abi::JsonAbi;
use alloy_primitives::{Address, Log, TxHash};
use clap::ValueEnum;

use crate::{
    constants::{
        FORKED_LOCAL_ENVIRONMENTS, LINK_TOKEN, LOCAL_BLOCKCHAIN_ENVIRONMENTS, MOCK_V3_AGGREGATOR,
        VRF_COORDINATOR_MOCK,
    },
    errors::ScriptError,
};

// ------------
// | Networks |
// ------------

/// How a network is treated by the account and contract resolvers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetworkKind {
    /// A throwaway local node, mocks are deployed on demand
    Local,
    /// A local node forked from a live network
    ForkedLocal,
    /// A persistent network that needs a funded key and configured addresses
    Live,
}

impl NetworkKind {
    /// Classify a network by name
    pub fn classify(name: &str) -> Self {
        if LOCAL_BLOCKCHAIN_ENVIRONMENTS.contains(&name) {
            NetworkKind::Local
        } else if FORKED_LOCAL_ENVIRONMENTS.contains(&name) {
            NetworkKind::ForkedLocal
        } else {
            NetworkKind::Live
        }
    }
}

/// The active network
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Network {
    /// The network name, as used in the configuration file
    pub name: String,
    /// The classification of the network
    pub kind: NetworkKind,
}

impl Network {
    /// Construct the network with the given name
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            kind: NetworkKind::classify(name),
        }
    }

    /// Whether mocks are deployed on this network
    pub fn is_local(&self) -> bool {
        self.kind == NetworkKind::Local
    }

    /// Whether the node's dev accounts are available on this network
    pub fn has_dev_accounts(&self) -> bool {
        matches!(self.kind, NetworkKind::Local | NetworkKind::ForkedLocal)
    }
}

impl Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

// ---------------------
// | Contract Registry |
// ---------------------

/// The logical contracts the lottery depends on
#[derive(ValueEnum, Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[value(rename_all = "snake_case")]
pub enum LogicalContract {
    /// The ETH / USD price feed
    EthUsdPriceFeed,
    /// The VRF coordinator
    VrfCoordinator,
    /// The LINK token
    LinkToken,
}

impl LogicalContract {
    /// All registered logical contracts
    pub const ALL: [LogicalContract; 3] = [
        LogicalContract::EthUsdPriceFeed,
        LogicalContract::VrfCoordinator,
        LogicalContract::LinkToken,
    ];

    /// The mock that stands in for this contract on local networks
    pub fn mock(&self) -> MockContract {
        match self {
            LogicalContract::EthUsdPriceFeed => MockContract::MockV3Aggregator,
            LogicalContract::VrfCoordinator => MockContract::VrfCoordinatorMock,
            LogicalContract::LinkToken => MockContract::LinkToken,
        }
    }

    /// The key of this contract in a network's configuration
    pub fn config_key(&self) -> &'static str {
        match self {
            LogicalContract::EthUsdPriceFeed => "eth_usd_price_feed",
            LogicalContract::VrfCoordinator => "vrf_coordinator",
            LogicalContract::LinkToken => "link_token",
        }
    }
}

impl Display for LogicalContract {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.config_key())
    }
}

impl FromStr for LogicalContract {
    type Err = ScriptError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LogicalContract::ALL
            .into_iter()
            .find(|c| c.config_key() == s)
            .ok_or_else(|| ScriptError::UnknownContract(s.to_string()))
    }
}

/// The mock contracts deployed on local networks
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum MockContract {
    /// The mock Chainlink price aggregator
    MockV3Aggregator,
    /// The mock VRF coordinator
    VrfCoordinatorMock,
    /// The LINK token
    LinkToken,
}

impl MockContract {
    /// The name of the contract's compiled artifact
    pub fn artifact_name(&self) -> &'static str {
        match self {
            MockContract::MockV3Aggregator => MOCK_V3_AGGREGATOR,
            MockContract::VrfCoordinatorMock => VRF_COORDINATOR_MOCK,
            MockContract::LinkToken => LINK_TOKEN,
        }
    }
}

impl Display for MockContract {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.artifact_name())
    }
}

// -----------
// | Handles |
// -----------

/// A deployed contract bound to its interface
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractHandle {
    /// The contract name
    pub name: String,
    /// The address the contract is deployed at
    pub address: Address,
    /// The contract interface
    pub abi: JsonAbi,
}

impl ContractHandle {
    /// Bind a handle to a contract at the given address
    pub fn from_abi(name: &str, address: Address, abi: JsonAbi) -> Self {
        Self {
            name: name.to_string(),
            address,
            abi,
        }
    }

    /// Whether the contract's interface exposes the given function
    pub fn has_function(&self, function: &str) -> bool {
        self.abi
            .function(function)
            .is_some_and(|overloads| !overloads.is_empty())
    }

    /// Error unless the contract's interface exposes the given function
    pub fn require_function(&self, function: &str) -> Result<(), ScriptError> {
        if self.has_function(function) {
            Ok(())
        } else {
            Err(ScriptError::CalldataConstruction(format!(
                "{} at {:#x} has no `{}` function",
                self.name, self.address, function
            )))
        }
    }
}

/// The parts of a mined transaction the scripts care about
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxReceipt {
    /// The transaction hash
    pub tx_hash: TxHash,
    /// The block the transaction was mined in
    pub block_number: Option<u64>,
    /// The address of the contract created by the transaction, if any
    pub contract_address: Option<Address>,
    /// The logs emitted by the transaction
    pub logs: Vec<Log>,
}
