//! The client through which the scripts talk to the chain

use alloy::{
    network::{Ethereum, TransactionBuilder},
    providers::{DynProvider, Provider, ProviderBuilder},
    rpc::types::{TransactionReceipt, TransactionRequest},
    transports::http::reqwest::Url,
};
use alloy_primitives::{Address, Bytes, U256};
use tracing::debug;

use crate::{
    accounts::Account,
    errors::ScriptError,
    types::TxReceipt,
};

/// A state-changing call to a deployed contract
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractCall {
    /// The contract being called
    pub to: Address,
    /// The ABI-encoded calldata
    pub input: Bytes,
    /// The wei sent along with the call
    pub value: U256,
}

impl ContractCall {
    /// A call that sends no value
    pub fn new(to: Address, input: impl Into<Bytes>) -> Self {
        Self {
            to,
            input: input.into(),
            value: U256::ZERO,
        }
    }

    /// Attach wei to the call
    pub fn with_value(mut self, value: U256) -> Self {
        self.value = value;
        self
    }
}

/// The operations the scripts need from a chain
///
/// Every method resolves only once the node has processed the request;
/// transactions that revert resolve to an error
#[allow(async_fn_in_trait)]
pub trait ChainClient {
    /// Deploy the given code from the sender, returning the new contract's address
    async fn deploy(&self, sender: &Account, code: Bytes) -> Result<Address, ScriptError>;

    /// Send a transaction from the sender and wait for the given number of
    /// confirmations
    async fn transact(
        &self,
        sender: &Account,
        call: ContractCall,
        confirmations: u64,
    ) -> Result<TxReceipt, ScriptError>;

    /// Execute a read-only call against the latest block
    async fn call(&self, to: Address, input: Bytes) -> Result<Bytes, ScriptError>;

    /// The native balance of an address
    async fn balance(&self, address: Address) -> Result<U256, ScriptError>;
}

/// A [`ChainClient`] talking JSON-RPC over HTTP
#[derive(Clone)]
pub struct RpcClient {
    /// The RPC url, used to build a signing provider per sender
    url: Url,
    /// A provider without a wallet, used for reads
    reader: DynProvider<Ethereum>,
}

impl RpcClient {
    /// Connect to the node at the given url
    pub fn new(rpc_url: &str) -> Result<Self, ScriptError> {
        let url =
            Url::parse(rpc_url).map_err(|e| ScriptError::ClientInitialization(e.to_string()))?;
        let reader = DynProvider::new(ProviderBuilder::new().connect_http(url.clone()));

        Ok(Self { url, reader })
    }

    /// A provider signing with the sender's key
    fn signing_provider(&self, sender: &Account) -> DynProvider<Ethereum> {
        let provider = ProviderBuilder::new()
            .wallet(sender.signer().clone())
            .connect_http(self.url.clone());
        DynProvider::new(provider)
    }
}

impl ChainClient for RpcClient {
    async fn deploy(&self, sender: &Account, code: Bytes) -> Result<Address, ScriptError> {
        let tx = TransactionRequest::default()
            .with_from(sender.address())
            .with_deploy_code(code);

        let receipt = self
            .signing_provider(sender)
            .send_transaction(tx)
            .await
            .map_err(|e| ScriptError::ContractDeployment(e.to_string()))?
            .get_receipt()
            .await
            .map_err(|e| ScriptError::ContractDeployment(e.to_string()))?;

        if !receipt.status() {
            return Err(ScriptError::TransactionReverted(format!(
                "deployment {:#x}",
                receipt.transaction_hash
            )));
        }

        receipt
            .contract_address
            .ok_or_else(|| ScriptError::ContractDeployment("receipt has no address".to_string()))
    }

    async fn transact(
        &self,
        sender: &Account,
        call: ContractCall,
        confirmations: u64,
    ) -> Result<TxReceipt, ScriptError> {
        let tx = TransactionRequest::default()
            .with_from(sender.address())
            .with_to(call.to)
            .with_input(call.input)
            .with_value(call.value);

        let receipt = self
            .signing_provider(sender)
            .send_transaction(tx)
            .await
            .map_err(|e| ScriptError::ContractInteraction(e.to_string()))?
            .with_required_confirmations(confirmations)
            .get_receipt()
            .await
            .map_err(|e| ScriptError::ContractInteraction(e.to_string()))?;

        debug!(
            "Transaction {:#x} mined in block {:?}",
            receipt.transaction_hash, receipt.block_number
        );
        if !receipt.status() {
            return Err(ScriptError::TransactionReverted(format!(
                "{:#x}",
                receipt.transaction_hash
            )));
        }

        Ok(to_tx_receipt(&receipt))
    }

    async fn call(&self, to: Address, input: Bytes) -> Result<Bytes, ScriptError> {
        let tx = TransactionRequest::default().with_to(to).with_input(input);
        self.reader
            .call(tx)
            .await
            .map_err(|e| ScriptError::ContractInteraction(e.to_string()))
    }

    async fn balance(&self, address: Address) -> Result<U256, ScriptError> {
        self.reader
            .get_balance(address)
            .await
            .map_err(|e| ScriptError::ContractInteraction(e.to_string()))
    }
}

/// Keep the parts of an RPC receipt the scripts use
fn to_tx_receipt(receipt: &TransactionReceipt) -> TxReceipt {
    TxReceipt {
        tx_hash: receipt.transaction_hash,
        block_number: receipt.block_number,
        contract_address: receipt.contract_address,
        logs: receipt
            .inner
            .logs()
            .iter()
            .map(|log| log.inner.clone())
            .collect(),
    }
}
