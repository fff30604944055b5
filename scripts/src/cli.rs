//! Definitions of CLI arguments and commands for the lottery scripts

use std::path::PathBuf;

use alloy_primitives::{
    utils::{format_ether, parse_ether},
    Address, U256,
};
use clap::{Args, Parser, Subcommand};
use tracing::info;

use crate::{
    accounts::{import_stored_account, list_stored_accounts, AccountSelector},
    chain::ChainClient,
    commands::{deploy_mocks, fund_with_link, MockParams},
    constants::{
        DECIMALS, DEFAULT_ARTIFACTS_DIR, DEFAULT_CONFIG_PATH, DEFAULT_NETWORK, INITIAL_VALUE,
        KEYSTORE_PASSWORD_ENV_VAR, LINK_TOKEN, LOTTERY,
    },
    errors::ScriptError,
    lottery::{
        deploy_lottery, end_lottery, enter_lottery, entrance_fee, lottery_balance,
        recent_winner, start_lottery,
    },
    session::Session,
    types::LogicalContract,
};

/// Scripts for deploying and operating the lottery contracts
#[derive(Parser)]
pub struct Cli {
    /// The session the command runs in
    #[command(flatten)]
    pub session: SessionArgs,

    /// The command to run
    #[command(subcommand)]
    pub command: Command,
}

/// Arguments describing the session a command runs in
#[derive(Args, Clone)]
pub struct SessionArgs {
    /// The network to run against
    #[arg(short, long, env = "NETWORK", default_value = DEFAULT_NETWORK)]
    pub network: String,

    /// Path to the project configuration
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,

    /// Directory holding the compiled contract artifacts
    #[arg(short, long, default_value = DEFAULT_ARTIFACTS_DIR)]
    pub artifacts: PathBuf,

    /// Network RPC URL, overriding the configured one
    #[arg(short, long, env = "RPC_URL")]
    pub rpc_url: Option<String>,

    /// Password unlocking stored accounts
    #[arg(long, env = KEYSTORE_PASSWORD_ENV_VAR, hide_env_values = true)]
    pub keystore_password: Option<String>,
}

/// The scripts
#[derive(Subcommand)]
pub enum Command {
    /// Deploy the mock price feed, LINK token, and VRF coordinator
    DeployMocks(DeployMocksArgs),
    /// Print the address of a logical contract
    GetContract(GetContractArgs),
    /// Send LINK to a contract
    FundWithLink(FundWithLinkArgs),
    /// Deploy the lottery against the network's contracts
    DeployLottery,
    /// Open a lottery for entries
    StartLottery(LotteryArgs),
    /// Enter a lottery, paying the entrance fee
    EnterLottery(LotteryArgs),
    /// Fund a lottery with LINK and close it
    EndLottery(LotteryArgs),
    /// Print the state of a lottery
    LotteryStatus(LotteryStatusArgs),
    /// Manage stored accounts
    #[command(subcommand)]
    Accounts(AccountsCommand),
}

impl Command {
    /// Run the command in the given session
    pub async fn run<C: ChainClient>(self, session: &mut Session<C>) -> Result<(), ScriptError> {
        match self {
            Command::DeployMocks(args) => {
                let params = MockParams {
                    decimals: args.decimals,
                    initial_value: args.initial_value,
                };
                deploy_mocks(session, &params).await
            }
            Command::GetContract(args) => {
                let handle = session.contract(args.name).await?;
                info!("{} is {} at {:#x}", args.name, handle.name, handle.address);
                Ok(())
            }
            Command::FundWithLink(args) => {
                let account = session.get_account(&args.account)?;
                let link_token = match args.link_token {
                    Some(address) => Some(session.bind(LINK_TOKEN, address)?),
                    None => None,
                };
                let amount = args.amount.as_deref().map(parse_token_amount).transpose()?;

                fund_with_link(
                    session,
                    args.address,
                    Some(&account),
                    link_token.as_ref(),
                    amount,
                )
                .await
                .map(|_| ())
            }
            Command::DeployLottery => deploy_lottery(session).await.map(|_| ()),
            Command::StartLottery(args) => {
                let lottery = session.bind(LOTTERY, args.lottery)?;
                let account = session.get_account(&args.account)?;
                start_lottery(session, &lottery, &account).await.map(|_| ())
            }
            Command::EnterLottery(args) => {
                let lottery = session.bind(LOTTERY, args.lottery)?;
                let account = session.get_account(&args.account)?;
                enter_lottery(session, &lottery, &account).await.map(|_| ())
            }
            Command::EndLottery(args) => {
                let lottery = session.bind(LOTTERY, args.lottery)?;
                let account = session.get_account(&args.account)?;
                end_lottery(session, &lottery, &account).await.map(|_| ())
            }
            Command::LotteryStatus(args) => {
                let lottery = session.bind(LOTTERY, args.lottery)?;
                let fee = entrance_fee(session, &lottery).await?;
                let winner = recent_winner(session, &lottery).await?;
                let balance = lottery_balance(session, &lottery).await?;

                info!("Entrance fee: {} ETH", format_ether(fee));
                info!("Recent winner: {:#x}", winner);
                info!("Balance: {} ETH", format_ether(balance));
                Ok(())
            }
            Command::Accounts(command) => command.run(session),
        }
    }
}

/// Deploy a fresh set of mocks, even if some were already deployed
#[derive(Args)]
pub struct DeployMocksArgs {
    /// Decimal precision of the mock price feed
    #[arg(long, default_value_t = DECIMALS)]
    pub decimals: u8,

    /// Initial answer of the mock price feed
    #[arg(long, default_value_t = INITIAL_VALUE)]
    pub initial_value: i64,
}

/// Print the address of the contract filling a logical role, deploying mocks
/// on local networks if needed
#[derive(Args)]
pub struct GetContractArgs {
    /// The logical contract name
    pub name: LogicalContract,
}

/// Send LINK to a contract
#[derive(Args)]
pub struct FundWithLinkArgs {
    /// Address of the contract to fund
    pub address: Address,

    /// Amount of LINK to send, in whole tokens (defaults to 0.1)
    #[arg(long)]
    pub amount: Option<String>,

    /// Address of the LINK token, overriding the session's
    #[arg(long)]
    pub link_token: Option<Address>,

    /// The sending account
    #[command(flatten)]
    pub account: AccountSelector,
}

/// Act on a deployed lottery
#[derive(Args)]
pub struct LotteryArgs {
    /// Address of the lottery contract
    #[arg(short, long)]
    pub lottery: Address,

    /// The sending account
    #[command(flatten)]
    pub account: AccountSelector,
}

/// Print the entrance fee, the most recent winner, and the balance of a lottery
#[derive(Args)]
pub struct LotteryStatusArgs {
    /// Address of the lottery contract
    #[arg(short, long)]
    pub lottery: Address,
}

/// Manage the stored keystore accounts
#[derive(Subcommand)]
pub enum AccountsCommand {
    /// List the ids of the stored accounts
    List,
    /// Encrypt a private key into a new stored account
    Import {
        /// The id to store the account under
        id: String,

        /// The hex-encoded private key
        #[arg(long, env = "PRIVATE_KEY", hide_env_values = true)]
        private_key: String,
    },
}

impl AccountsCommand {
    /// Run the accounts command against the configured keystore directory
    fn run<C: ChainClient>(self, session: &Session<C>) -> Result<(), ScriptError> {
        let keystore_dir = session.config().keystore_dir()?;
        match self {
            AccountsCommand::List => {
                for id in list_stored_accounts(&keystore_dir)? {
                    info!("{}", id);
                }
                Ok(())
            }
            AccountsCommand::Import { id, private_key } => {
                let password = session.keystore_password().ok_or_else(|| {
                    ScriptError::Account(format!(
                        "a keystore password is required, set {}",
                        KEYSTORE_PASSWORD_ENV_VAR
                    ))
                })?;
                let account = import_stored_account(&keystore_dir, &id, &private_key, password)?;
                info!("Stored {:#x} as {}", account.address(), id);
                Ok(())
            }
        }
    }
}

/// Parse a whole-token amount into its 18-decimal base units
pub fn parse_token_amount(amount: &str) -> Result<U256, ScriptError> {
    parse_ether(amount).map_err(|e| ScriptError::CalldataConstruction(e.to_string()))
}
