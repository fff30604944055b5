//! Constants used in the lottery scripts

/// Networks backed by a throwaway local node, on which mocks are deployed
pub const LOCAL_BLOCKCHAIN_ENVIRONMENTS: [&str; 2] = ["development", "ganache-local"];

/// Local nodes forked from a live network; they use the node's dev accounts
/// but attach to the real oracle contracts
pub const FORKED_LOCAL_ENVIRONMENTS: [&str; 2] = ["mainnet-fork", "mainnet-fork-dev"];

/// The network used when none is given on the command line
pub const DEFAULT_NETWORK: &str = "development";

/// The RPC url of a local node when the configuration doesn't name one
pub const DEFAULT_LOCAL_RPC_URL: &str = "http://127.0.0.1:8545";

/// The default path of the project configuration file
pub const DEFAULT_CONFIG_PATH: &str = "lottery-config.json";

/// The default directory holding compiled contract artifacts
pub const DEFAULT_ARTIFACTS_DIR: &str = "build/contracts";

/// The default keystore directory, relative to the user's home directory
pub const DEFAULT_KEYSTORE_DIR: &str = ".lottery/accounts";

/// The mnemonic that anvil, ganache and hardhat seed their dev accounts from
pub const DEV_MNEMONIC: &str = "test test test test test test test test test test test junk";

/// The number of dev accounts a local node exposes
pub const NUM_DEV_ACCOUNTS: u32 = 10;

/// The default decimal precision of the mock price feed
pub const DECIMALS: u8 = 8;

/// The default answer of the mock price feed, 2000 USD at 8 decimals
pub const INITIAL_VALUE: i64 = 200_000_000_000;

/// The default amount of LINK sent by the funding routine, 0.1 LINK
pub const DEFAULT_FUND_AMOUNT: u128 = 100_000_000_000_000_000;

/// The number of confirmations to wait for when funding a contract
pub const NUM_FUND_CONFIRMATIONS: u64 = 1;

/// The number of confirmations to wait for on any other transaction
pub const NUM_TX_CONFIRMATIONS: u64 = 1;

/// The VRF fee used on local networks, 0.1 LINK
pub const DEFAULT_VRF_FEE: u128 = 100_000_000_000_000_000;

/// The VRF key hash used on local networks
pub const DEFAULT_KEY_HASH: &str =
    "0x2ed0feb3e7fd2022120aa84fab1945545a9f2ffc9076fd6156fa96eaff4c1311";

/// Wei added on top of the entrance fee when entering, absorbs price movement
/// between reading the fee and mining the entry
pub const ENTRANCE_FEE_BUFFER: u64 = 100_000_000;

// --- Artifact names --- //

/// The mock price feed contract
pub const MOCK_V3_AGGREGATOR: &str = "MockV3Aggregator";

/// The mock VRF coordinator contract
pub const VRF_COORDINATOR_MOCK: &str = "VRFCoordinatorMock";

/// The LINK token contract
pub const LINK_TOKEN: &str = "LinkToken";

/// The lottery contract
pub const LOTTERY: &str = "Lottery";

// --- Environment variables --- //

/// The environment variable holding the keystore password
pub const KEYSTORE_PASSWORD_ENV_VAR: &str = "KEYSTORE_PASSWORD";

/// The environment variable holding the user's home directory
pub const HOME_ENV_VAR: &str = "HOME";
