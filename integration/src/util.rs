//! Helpers shared by the integration tests

use alloy_primitives::{Address, I256, U256};
use alloy_sol_types::SolCall;
use eyre::Result;
use scripts::{
    accounts::Account,
    chain::{ChainClient, ContractCall, RpcClient},
    constants::NUM_TX_CONFIRMATIONS,
    session::Session,
    solidity::{LinkToken, MockV3Aggregator},
    types::ContractHandle,
};

/// The LINK balance of an address
pub async fn link_balance(
    session: &Session<RpcClient>,
    link_token: &ContractHandle,
    holder: Address,
) -> Result<U256> {
    let input = LinkToken::balanceOfCall { _owner: holder }.abi_encode();
    let output = session.client().call(link_token.address, input.into()).await?;
    Ok(LinkToken::balanceOfCall::abi_decode_returns(&output)?)
}

/// Set the answer reported by a mock price feed
pub async fn update_price_feed(
    session: &Session<RpcClient>,
    price_feed: &ContractHandle,
    account: &Account,
    answer: i64,
) -> Result<()> {
    let input = MockV3Aggregator::updateAnswerCall {
        _answer: I256::try_from(answer)?,
    }
    .abi_encode();

    session
        .client()
        .transact(
            account,
            ContractCall::new(price_feed.address, input),
            NUM_TX_CONFIRMATIONS,
        )
        .await?;
    Ok(())
}
