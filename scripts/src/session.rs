//! The session context shared by every script: the active network, its
//! configuration, the chain client, and the ledger of contracts deployed so far

use std::collections::HashMap;

use alloy_primitives::Address;
use tracing::info;

use crate::{
    accounts::{resolve_account, Account, AccountSelector},
    artifacts::ArtifactStore,
    chain::{ChainClient, RpcClient},
    cli::SessionArgs,
    commands::{deploy_mocks, MockParams},
    config::ProjectConfig,
    constants::DEFAULT_LOCAL_RPC_URL,
    errors::ScriptError,
    types::{ContractHandle, LogicalContract, Network},
};

/// A scripting session against a single network
///
/// Contracts deployed through the session are recorded per contract name, in
/// deployment order; the ledger lives as long as the session
pub struct Session<C> {
    /// The chain client
    client: C,
    /// The active network
    network: Network,
    /// The project configuration
    config: ProjectConfig,
    /// Compiled contract artifacts
    artifacts: ArtifactStore,
    /// The password used to unlock stored accounts
    keystore_password: Option<String>,
    /// Contracts deployed in this session, by contract name
    deployments: HashMap<String, Vec<ContractHandle>>,
}

impl Session<RpcClient> {
    /// Open a session against the node described by the arguments
    pub fn connect(args: &SessionArgs) -> Result<Self, ScriptError> {
        let network = Network::new(&args.network);
        let config = ProjectConfig::load(&args.config)?;

        let rpc_url = match (&args.rpc_url, config.rpc_url(&network)?) {
            (Some(url), _) => url.clone(),
            (None, Some(url)) => url,
            (None, None) if network.has_dev_accounts() => DEFAULT_LOCAL_RPC_URL.to_string(),
            (None, None) => {
                return Err(ScriptError::Config(format!(
                    "no `rpc_url` configured for network {}",
                    network
                )))
            }
        };
        info!("Connecting to {} at {}", network, rpc_url);

        let client = RpcClient::new(&rpc_url)?;
        let artifacts = ArtifactStore::from_dir(&args.artifacts);
        Ok(Self::new(client, network, config, artifacts)
            .with_keystore_password(args.keystore_password.clone()))
    }
}

impl<C: ChainClient> Session<C> {
    /// Create a session with an empty deployment ledger
    pub fn new(
        client: C,
        network: Network,
        config: ProjectConfig,
        artifacts: ArtifactStore,
    ) -> Self {
        Self {
            client,
            network,
            config,
            artifacts,
            keystore_password: None,
            deployments: HashMap::new(),
        }
    }

    /// Set the password used to unlock stored accounts
    pub fn with_keystore_password(mut self, password: Option<String>) -> Self {
        self.keystore_password = password;
        self
    }

    /// The chain client
    pub fn client(&self) -> &C {
        &self.client
    }

    /// The active network
    pub fn network(&self) -> &Network {
        &self.network
    }

    /// The project configuration
    pub fn config(&self) -> &ProjectConfig {
        &self.config
    }

    /// The password used to unlock stored accounts, if one was given
    pub fn keystore_password(&self) -> Option<&str> {
        self.keystore_password.as_deref()
    }

    // ------------
    // | Accounts |
    // ------------

    /// Resolve the signing account described by the selector
    pub fn get_account(&self, selector: &AccountSelector) -> Result<Account, ScriptError> {
        resolve_account(
            selector,
            &self.network,
            &self.config,
            self.keystore_password.as_deref(),
        )
    }

    // -------------
    // | Contracts |
    // -------------

    /// Get a handle to the contract filling the given logical role, by name
    pub async fn get_contract(&mut self, name: &str) -> Result<ContractHandle, ScriptError> {
        let contract: LogicalContract = name.parse()?;
        self.contract(contract).await
    }

    /// Get a handle to the contract filling the given logical role
    ///
    /// On local networks this is the most recently deployed mock, deploying the
    /// full set of mocks first if none exists. Elsewhere the handle is bound to
    /// the address in the network's configuration.
    pub async fn contract(
        &mut self,
        contract: LogicalContract,
    ) -> Result<ContractHandle, ScriptError> {
        let name = contract.mock().artifact_name();
        if !self.network.is_local() {
            let address = self.config.contract_address(&self.network, contract)?;
            return self.bind(name, address);
        }

        if self.deployed_count(name) == 0 {
            deploy_mocks(self, &MockParams::default()).await?;
        }

        self.latest(name).ok_or_else(|| {
            ScriptError::ContractDeployment(format!("no {} deployed on {}", name, self.network))
        })
    }

    /// Bind a handle to an already-deployed contract using its artifact's ABI
    pub fn bind(&mut self, name: &str, address: Address) -> Result<ContractHandle, ScriptError> {
        let artifact = self.artifacts.get(name)?;
        Ok(ContractHandle::from_abi(name, address, artifact.abi))
    }

    /// Deploy the named contract from the given account and record it
    pub async fn deploy(
        &mut self,
        name: &str,
        constructor_args: &[u8],
        sender: &Account,
    ) -> Result<ContractHandle, ScriptError> {
        let artifact = self.artifacts.get(name)?;
        let code = artifact.deploy_code(constructor_args);
        let address = self.client.deploy(sender, code).await?;
        info!("{} deployed at {:#x}", name, address);

        let handle = ContractHandle::from_abi(name, address, artifact.abi);
        self.deployments
            .entry(name.to_string())
            .or_default()
            .push(handle.clone());
        Ok(handle)
    }

    /// The most recent deployment of the named contract in this session
    pub fn latest(&self, name: &str) -> Option<ContractHandle> {
        self.deployments.get(name).and_then(|d| d.last()).cloned()
    }

    /// The number of deployments of the named contract in this session
    pub fn deployed_count(&self, name: &str) -> usize {
        self.deployments.get(name).map_or(0, Vec::len)
    }
}
