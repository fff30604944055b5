//! An in-memory chain and fixtures for unit tests

use std::{cell::RefCell, collections::HashMap};

use alloy::json_abi::JsonAbi;
use alloy_primitives::{address, keccak256, Address, Bytes, U256};

use crate::{
    accounts::Account,
    artifacts::{Artifact, ArtifactStore},
    chain::{ChainClient, ContractCall},
    config::ProjectConfig,
    constants::{LINK_TOKEN, LOTTERY, MOCK_V3_AGGREGATOR, VRF_COORDINATOR_MOCK},
    errors::ScriptError,
    session::Session,
    types::{Network, TxReceipt},
};

/// An arbitrary address used as a call target in tests
pub const ADDRESS_A: Address = address!("00000000000000000000000000000000000000aa");

/// The recorded state of a [`MockChain`]
#[derive(Default)]
struct MockState {
    /// The next nonce of each sender
    nonces: HashMap<Address, u64>,
    /// Deployments as (sender, code, created address)
    deployments: Vec<(Address, Bytes, Address)>,
    /// Transactions as (sender, call, confirmations)
    transactions: Vec<(Address, ContractCall, u64)>,
    /// Canned read-only call results keyed by target and selector
    responses: HashMap<(Address, [u8; 4]), Bytes>,
    /// Native balances
    balances: HashMap<Address, U256>,
    /// Whether transactions revert
    revert: bool,
    /// The current block number
    block: u64,
}

/// A chain that records every request and mines instantly
#[derive(Default)]
pub struct MockChain {
    /// The chain's state
    state: RefCell<MockState>,
}

impl MockChain {
    /// The deployments made so far
    pub fn deployments(&self) -> Vec<(Address, Bytes, Address)> {
        self.state.borrow().deployments.clone()
    }

    /// The transactions sent so far
    pub fn transactions(&self) -> Vec<(Address, ContractCall, u64)> {
        self.state.borrow().transactions.clone()
    }

    /// Answer calls to `selector` on `to` with the given return data
    pub fn respond(&self, to: Address, selector: [u8; 4], output: Vec<u8>) {
        self.state
            .borrow_mut()
            .responses
            .insert((to, selector), output.into());
    }

    /// Set the native balance of an address
    pub fn set_balance(&self, address: Address, balance: U256) {
        self.state.borrow_mut().balances.insert(address, balance);
    }

    /// Make every subsequent transaction revert
    pub fn revert_transactions(&self, revert: bool) {
        self.state.borrow_mut().revert = revert;
    }

    /// Consume the sender's next nonce
    fn next_nonce(state: &mut MockState, sender: Address) -> u64 {
        let nonce = state.nonces.entry(sender).or_default();
        *nonce += 1;
        *nonce - 1
    }
}

impl ChainClient for MockChain {
    async fn deploy(&self, sender: &Account, code: Bytes) -> Result<Address, ScriptError> {
        let mut state = self.state.borrow_mut();
        let nonce = Self::next_nonce(&mut state, sender.address());
        let address = sender.address().create(nonce);

        state.block += 1;
        state.deployments.push((sender.address(), code, address));
        Ok(address)
    }

    async fn transact(
        &self,
        sender: &Account,
        call: ContractCall,
        confirmations: u64,
    ) -> Result<TxReceipt, ScriptError> {
        let mut state = self.state.borrow_mut();
        let nonce = Self::next_nonce(&mut state, sender.address());
        let tx_hash = keccak256([sender.address().as_slice(), &nonce.to_be_bytes()].concat());
        if state.revert {
            return Err(ScriptError::TransactionReverted(format!("{:#x}", tx_hash)));
        }

        state.block += 1;
        state.transactions.push((sender.address(), call, confirmations));
        Ok(TxReceipt {
            tx_hash,
            block_number: Some(state.block),
            contract_address: None,
            logs: Vec::new(),
        })
    }

    async fn call(&self, to: Address, input: Bytes) -> Result<Bytes, ScriptError> {
        let selector: [u8; 4] = input
            .get(..4)
            .and_then(|s| s.try_into().ok())
            .ok_or_else(|| ScriptError::CalldataConstruction("calldata too short".to_string()))?;

        self.state
            .borrow()
            .responses
            .get(&(to, selector))
            .cloned()
            .ok_or_else(|| ScriptError::ContractInteraction("execution reverted".to_string()))
    }

    async fn balance(&self, address: Address) -> Result<U256, ScriptError> {
        Ok(self
            .state
            .borrow()
            .balances
            .get(&address)
            .copied()
            .unwrap_or_default())
    }
}

/// Build an artifact from human-readable ABI items
fn artifact(name: &str, tag: u8, items: &[&str]) -> Artifact {
    Artifact {
        name: name.to_string(),
        abi: JsonAbi::parse(items.iter().copied()).unwrap(),
        bytecode: Bytes::from(vec![0x60, 0x80, tag]),
    }
}

/// Artifacts for the mocks and the lottery
pub fn mock_artifacts() -> ArtifactStore {
    let mut store = ArtifactStore::default();
    store.insert(artifact(
        MOCK_V3_AGGREGATOR,
        1,
        &[
            "constructor(uint8 _decimals, int256 _initialAnswer)",
            "function decimals() view returns (uint8)",
            "function latestAnswer() view returns (int256)",
            "function updateAnswer(int256 _answer)",
        ],
    ));
    store.insert(artifact(
        LINK_TOKEN,
        2,
        &[
            "function transfer(address _to, uint256 _value) returns (bool)",
            "function balanceOf(address _owner) view returns (uint256)",
        ],
    ));
    store.insert(artifact(
        VRF_COORDINATOR_MOCK,
        3,
        &[
            "constructor(address linkAddress)",
            "function callBackWithRandomness(bytes32 requestId, uint256 randomness, address consumerContract)",
        ],
    ));
    store.insert(artifact(
        LOTTERY,
        4,
        &[
            "constructor(address _priceFeedAddress, address _vrfCoordinator, address _link, uint256 _fee, bytes32 _keyhash)",
            "function getEntranceFee() view returns (uint256)",
            "function startLottery()",
            "function enter() payable",
            "function endLottery()",
            "function recentWinner() view returns (address)",
            "event RequestedRandomness(bytes32 requestId)",
        ],
    ));
    store
}

/// A session on the `development` network with no deployments
pub fn local_session() -> Session<MockChain> {
    Session::new(
        MockChain::default(),
        Network::new("development"),
        ProjectConfig::default(),
        mock_artifacts(),
    )
}
