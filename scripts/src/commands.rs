//! Implementations of the mock deployment and funding scripts

use alloy_primitives::{utils::format_ether, Address, I256, U256};
use alloy_sol_types::{SolCall, SolConstructor};
use tracing::info;

use crate::{
    accounts::{Account, AccountSelector},
    chain::{ChainClient, ContractCall},
    constants::{
        DECIMALS, DEFAULT_FUND_AMOUNT, INITIAL_VALUE, LINK_TOKEN, MOCK_V3_AGGREGATOR,
        NUM_FUND_CONFIRMATIONS, VRF_COORDINATOR_MOCK,
    },
    errors::ScriptError,
    session::Session,
    solidity::{LinkToken, MockV3Aggregator, VRFCoordinatorMock},
    types::{ContractHandle, LogicalContract, TxReceipt},
};

/// Parameters of the mock price feed
#[derive(Debug, Clone, Copy)]
pub struct MockParams {
    /// The decimal precision of the price feed
    pub decimals: u8,
    /// The price feed's initial answer
    pub initial_value: i64,
}

impl Default for MockParams {
    fn default() -> Self {
        Self {
            decimals: DECIMALS,
            initial_value: INITIAL_VALUE,
        }
    }
}

/// Deploy a fresh set of mocks: the price feed, the LINK token, and a VRF
/// coordinator accepting that token
///
/// Always deploys, regardless of what the session already holds
pub async fn deploy_mocks<C: ChainClient>(
    session: &mut Session<C>,
    params: &MockParams,
) -> Result<(), ScriptError> {
    info!("Started deploying mocks");
    let account = session.get_account(&AccountSelector::default())?;

    let initial_answer = I256::try_from(params.initial_value)
        .map_err(|e| ScriptError::CalldataConstruction(e.to_string()))?;
    let feed_args = MockV3Aggregator::constructorCall {
        _decimals: params.decimals,
        _initialAnswer: initial_answer,
    }
    .abi_encode();
    session
        .deploy(MOCK_V3_AGGREGATOR, &feed_args, &account)
        .await?;

    let link_token = session.deploy(LINK_TOKEN, &[], &account).await?;

    let coordinator_args = VRFCoordinatorMock::constructorCall {
        linkAddress: link_token.address,
    }
    .abi_encode();
    session
        .deploy(VRF_COORDINATOR_MOCK, &coordinator_args, &account)
        .await?;

    info!("Deploying mocks succeeded");
    Ok(())
}

/// Send LINK to a contract so it can pay for randomness requests
///
/// The sender defaults to the network's default account and the token to the
/// session's LINK token; the amount defaults to 0.1 LINK
pub async fn fund_with_link<C: ChainClient>(
    session: &mut Session<C>,
    contract_address: Address,
    account: Option<&Account>,
    link_token: Option<&ContractHandle>,
    amount: Option<U256>,
) -> Result<TxReceipt, ScriptError> {
    let account = match account {
        Some(account) => account.clone(),
        None => session.get_account(&AccountSelector::default())?,
    };
    let link_token = match link_token {
        Some(link_token) => link_token.clone(),
        None => session.contract(LogicalContract::LinkToken).await?,
    };
    link_token.require_function("transfer")?;

    let amount = amount.unwrap_or(U256::from(DEFAULT_FUND_AMOUNT));
    let input = LinkToken::transferCall {
        _to: contract_address,
        _value: amount,
    }
    .abi_encode();

    let receipt = session
        .client()
        .transact(
            &account,
            ContractCall::new(link_token.address, input),
            NUM_FUND_CONFIRMATIONS,
        )
        .await?;

    info!(
        "Funded {:#x} with {} LINK",
        contract_address,
        format_ether(amount)
    );
    Ok(receipt)
}
