//! Scripts driving the lottery contract through a round

use alloy_primitives::{utils::format_ether, Address, B256, U256};
use alloy_sol_types::{SolCall, SolConstructor, SolEvent};
use tracing::info;

use crate::{
    accounts::{Account, AccountSelector},
    chain::{ChainClient, ContractCall},
    commands::fund_with_link,
    constants::{ENTRANCE_FEE_BUFFER, LOTTERY, NUM_TX_CONFIRMATIONS},
    errors::ScriptError,
    session::Session,
    solidity::{Lottery, VRFCoordinatorMock},
    types::{ContractHandle, LogicalContract, TxReceipt},
};

/// Deploy the lottery wired to the price feed, VRF coordinator and LINK token
/// of the active network
pub async fn deploy_lottery<C: ChainClient>(
    session: &mut Session<C>,
) -> Result<ContractHandle, ScriptError> {
    let account = session.get_account(&AccountSelector::default())?;
    let price_feed = session.contract(LogicalContract::EthUsdPriceFeed).await?;
    let vrf_coordinator = session.contract(LogicalContract::VrfCoordinator).await?;
    let link_token = session.contract(LogicalContract::LinkToken).await?;

    let args = Lottery::constructorCall {
        _priceFeedAddress: price_feed.address,
        _vrfCoordinator: vrf_coordinator.address,
        _link: link_token.address,
        _fee: session.config().vrf_fee(session.network())?,
        _keyhash: session.config().key_hash(session.network())?,
    }
    .abi_encode();

    let lottery = session.deploy(LOTTERY, &args, &account).await?;
    info!("Deployed lottery!");
    Ok(lottery)
}

/// Open the lottery for entries
pub async fn start_lottery<C: ChainClient>(
    session: &Session<C>,
    lottery: &ContractHandle,
    account: &Account,
) -> Result<TxReceipt, ScriptError> {
    let input = Lottery::startLotteryCall {}.abi_encode();
    let receipt = session
        .client()
        .transact(
            account,
            ContractCall::new(lottery.address, input),
            NUM_TX_CONFIRMATIONS,
        )
        .await?;

    info!("The lottery is started!");
    Ok(receipt)
}

/// The current entrance fee in wei
pub async fn entrance_fee<C: ChainClient>(
    session: &Session<C>,
    lottery: &ContractHandle,
) -> Result<U256, ScriptError> {
    let input = Lottery::getEntranceFeeCall {}.abi_encode();
    let output = session.client().call(lottery.address, input.into()).await?;

    Lottery::getEntranceFeeCall::abi_decode_returns(&output)
        .map_err(|e| ScriptError::ContractInteraction(e.to_string()))
}

/// Enter the lottery, paying the entrance fee plus a small buffer
pub async fn enter_lottery<C: ChainClient>(
    session: &Session<C>,
    lottery: &ContractHandle,
    account: &Account,
) -> Result<TxReceipt, ScriptError> {
    let value = entrance_fee(session, lottery).await? + U256::from(ENTRANCE_FEE_BUFFER);
    let input = Lottery::enterCall {}.abi_encode();
    let call = ContractCall::new(lottery.address, input).with_value(value);

    let receipt = session
        .client()
        .transact(account, call, NUM_TX_CONFIRMATIONS)
        .await?;

    info!(
        "{:#x} entered the lottery with {} ETH",
        account.address(),
        format_ether(value)
    );
    Ok(receipt)
}

/// Fund the lottery with LINK and close it, requesting randomness
///
/// Returns the receipt of the `endLottery` transaction
pub async fn end_lottery<C: ChainClient>(
    session: &mut Session<C>,
    lottery: &ContractHandle,
    account: &Account,
) -> Result<TxReceipt, ScriptError> {
    fund_with_link(session, lottery.address, Some(account), None, None).await?;

    let input = Lottery::endLotteryCall {}.abi_encode();
    let receipt = session
        .client()
        .transact(
            account,
            ContractCall::new(lottery.address, input),
            NUM_TX_CONFIRMATIONS,
        )
        .await?;

    info!("The lottery is ending, waiting for randomness");
    Ok(receipt)
}

/// The winner of the last round
pub async fn recent_winner<C: ChainClient>(
    session: &Session<C>,
    lottery: &ContractHandle,
) -> Result<Address, ScriptError> {
    let input = Lottery::recentWinnerCall {}.abi_encode();
    let output = session.client().call(lottery.address, input.into()).await?;

    Lottery::recentWinnerCall::abi_decode_returns(&output)
        .map_err(|e| ScriptError::ContractInteraction(e.to_string()))
}

/// The ETH held by the lottery
pub async fn lottery_balance<C: ChainClient>(
    session: &Session<C>,
    lottery: &ContractHandle,
) -> Result<U256, ScriptError> {
    session.client().balance(lottery.address).await
}

/// The VRF request id emitted when the lottery was closed
pub fn requested_randomness(
    lottery: &ContractHandle,
    end_receipt: &TxReceipt,
) -> Result<B256, ScriptError> {
    end_receipt
        .logs
        .iter()
        .filter(|log| log.address == lottery.address)
        .find_map(|log| Lottery::RequestedRandomness::decode_log_data(&log.data).ok())
        .map(|event| event.requestId)
        .ok_or_else(|| {
            ScriptError::ContractInteraction("no `RequestedRandomness` event emitted".to_string())
        })
}

/// Answer the lottery's randomness request through the mock VRF coordinator
///
/// Only meaningful on local networks, where no oracle node is listening
pub async fn fulfill_randomness<C: ChainClient>(
    session: &mut Session<C>,
    lottery: &ContractHandle,
    end_receipt: &TxReceipt,
    randomness: U256,
) -> Result<TxReceipt, ScriptError> {
    if !session.network().is_local() {
        return Err(ScriptError::Config(format!(
            "randomness can only be mocked on local networks, not {}",
            session.network()
        )));
    }

    let request_id = requested_randomness(lottery, end_receipt)?;
    let coordinator = session.contract(LogicalContract::VrfCoordinator).await?;
    let account = session.get_account(&AccountSelector::default())?;

    let input = VRFCoordinatorMock::callBackWithRandomnessCall {
        requestId: request_id,
        randomness,
        consumerContract: lottery.address,
    }
    .abi_encode();

    session
        .client()
        .transact(
            &account,
            ContractCall::new(coordinator.address, input),
            NUM_TX_CONFIRMATIONS,
        )
        .await
}

#[cfg(test)]
mod tests {
    use alloy_primitives::{utils::parse_ether, Log};
    use alloy_sol_types::SolValue;

    use super::*;
    use crate::{
        accounts::dev_account,
        config::ProjectConfig,
        constants::{DEFAULT_KEY_HASH, DEFAULT_VRF_FEE, DEV_MNEMONIC, LINK_TOKEN},
        test_utils::{local_session, mock_artifacts, MockChain, ADDRESS_A},
        types::Network,
    };

    /// A receipt carrying a `RequestedRandomness` event from the given lottery
    fn end_receipt(lottery: Address, request_id: B256) -> TxReceipt {
        let data = Lottery::RequestedRandomness {
            requestId: request_id,
        }
        .encode_log_data();

        TxReceipt {
            tx_hash: B256::ZERO,
            block_number: Some(1),
            contract_address: None,
            logs: vec![Log {
                address: lottery,
                data,
            }],
        }
    }

    #[tokio::test]
    async fn test_deploy_lottery_wires_mocks() {
        let mut session = local_session();
        let lottery = deploy_lottery(&mut session).await.unwrap();

        assert_eq!(session.latest(LOTTERY), Some(lottery));
        assert_eq!(session.client().deployments().len(), 4);

        let deployments = session.client().deployments();
        let (_, code, _) = &deployments[3];
        let expected = Lottery::constructorCall {
            _priceFeedAddress: deployments[0].2,
            _vrfCoordinator: deployments[2].2,
            _link: deployments[1].2,
            _fee: U256::from(DEFAULT_VRF_FEE),
            _keyhash: DEFAULT_KEY_HASH.parse().unwrap(),
        }
        .abi_encode();
        assert!(code.ends_with(&expected));
    }

    #[tokio::test]
    async fn test_entrance_fee_and_entry() {
        let mut session = local_session();
        let lottery = session.bind(LOTTERY, ADDRESS_A).unwrap();
        let fee = parse_ether("0.025").unwrap();
        session.client().respond(
            ADDRESS_A,
            Lottery::getEntranceFeeCall::SELECTOR,
            fee.abi_encode(),
        );

        assert_eq!(entrance_fee(&session, &lottery).await.unwrap(), fee);

        let account = dev_account(DEV_MNEMONIC, 1).unwrap();
        enter_lottery(&session, &lottery, &account).await.unwrap();

        let transactions = session.client().transactions();
        let (sender, call, _) = &transactions[0];
        assert_eq!(*sender, account.address());
        assert_eq!(call.value, fee + U256::from(ENTRANCE_FEE_BUFFER));
        assert_eq!(call.input[..4], Lottery::enterCall::SELECTOR);
    }

    #[tokio::test]
    async fn test_end_lottery_funds_first() {
        let mut session = local_session();
        let lottery = session.bind(LOTTERY, ADDRESS_A).unwrap();
        let account = dev_account(DEV_MNEMONIC, 0).unwrap();

        end_lottery(&mut session, &lottery, &account).await.unwrap();

        let link = session.latest(LINK_TOKEN).unwrap();
        let transactions = session.client().transactions();
        assert_eq!(transactions.len(), 2);
        assert_eq!(transactions[0].1.to, link.address);
        assert_eq!(transactions[1].1.to, lottery.address);
        assert_eq!(
            transactions[1].1.input[..4],
            Lottery::endLotteryCall::SELECTOR
        );
    }

    #[tokio::test]
    async fn test_recent_winner_and_balance() {
        let mut session = local_session();
        let lottery = session.bind(LOTTERY, ADDRESS_A).unwrap();
        session.client().respond(
            ADDRESS_A,
            Lottery::recentWinnerCall::SELECTOR,
            Address::repeat_byte(7).abi_encode(),
        );
        session.client().set_balance(ADDRESS_A, U256::from(42));

        assert_eq!(
            recent_winner(&session, &lottery).await.unwrap(),
            Address::repeat_byte(7)
        );
        assert_eq!(
            lottery_balance(&session, &lottery).await.unwrap(),
            U256::from(42)
        );
    }

    #[tokio::test]
    async fn test_fulfill_randomness_on_local_network() {
        let mut session = local_session();
        let lottery = session.bind(LOTTERY, ADDRESS_A).unwrap();
        let request_id = B256::repeat_byte(9);

        let receipt = end_receipt(ADDRESS_A, request_id);
        fulfill_randomness(&mut session, &lottery, &receipt, U256::from(777))
            .await
            .unwrap();

        let coordinator = session.contract(LogicalContract::VrfCoordinator).await.unwrap();
        let transactions = session.client().transactions();
        let (_, call, _) = &transactions[0];
        assert_eq!(call.to, coordinator.address);

        let callback = VRFCoordinatorMock::callBackWithRandomnessCall::abi_decode(&call.input)
            .unwrap();
        assert_eq!(callback.requestId, request_id);
        assert_eq!(callback.randomness, U256::from(777));
        assert_eq!(callback.consumerContract, ADDRESS_A);
    }

    #[tokio::test]
    async fn test_fulfill_randomness_rejected_on_live_network() {
        let mut session = Session::new(
            MockChain::default(),
            Network::new("sepolia"),
            ProjectConfig::default(),
            mock_artifacts(),
        );
        let lottery = session.bind(LOTTERY, ADDRESS_A).unwrap();
        let receipt = end_receipt(ADDRESS_A, B256::ZERO);

        let res = fulfill_randomness(&mut session, &lottery, &receipt, U256::from(1)).await;
        assert!(matches!(res, Err(ScriptError::Config(_))));
    }

    #[test]
    fn test_requested_randomness_ignores_other_emitters() {
        let lottery = ContractHandle::from_abi(LOTTERY, ADDRESS_A, Default::default());
        let receipt = end_receipt(Address::repeat_byte(1), B256::repeat_byte(2));

        assert!(requested_randomness(&lottery, &receipt).is_err());
        let receipt = end_receipt(ADDRESS_A, B256::repeat_byte(2));
        assert_eq!(
            requested_randomness(&lottery, &receipt).unwrap(),
            B256::repeat_byte(2)
        );
    }
}
