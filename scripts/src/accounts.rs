//! Resolution of the account that signs deployments and transactions
//!
//! Precedence: an explicit dev account index, then a stored keystore id, then
//! the first dev account on local and forked networks, and finally the
//! configured private key.

use std::{
    fmt::{self, Display},
    fs,
    path::{Path, PathBuf},
    str::FromStr,
};

use alloy::signers::local::{coins_bip39::English, MnemonicBuilder, PrivateKeySigner};
use alloy_primitives::Address;
use clap::Args;
use itertools::Itertools;
use rand::thread_rng;
use tracing::debug;

use crate::{
    config::ProjectConfig, constants::NUM_DEV_ACCOUNTS, errors::ScriptError, types::Network,
};

/// Where a resolved account came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccountSource {
    /// A dev account of the local node, by index
    DevAccount(u32),
    /// An encrypted keystore, by id
    Stored(String),
    /// The private key in the project configuration
    ConfiguredKey,
}

impl Display for AccountSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccountSource::DevAccount(index) => write!(f, "dev account #{}", index),
            AccountSource::Stored(id) => write!(f, "keystore `{}`", id),
            AccountSource::ConfiguredKey => write!(f, "configured key"),
        }
    }
}

/// A signing account
#[derive(Debug, Clone)]
pub struct Account {
    /// The account's signer
    signer: PrivateKeySigner,
    /// Where the account came from
    source: AccountSource,
}

impl Account {
    /// Wrap a signer
    pub fn new(signer: PrivateKeySigner, source: AccountSource) -> Self {
        Self { signer, source }
    }

    /// The account's address
    pub fn address(&self) -> Address {
        self.signer.address()
    }

    /// The account's signer
    pub fn signer(&self) -> &PrivateKeySigner {
        &self.signer
    }

    /// Where the account came from
    pub fn source(&self) -> &AccountSource {
        &self.source
    }
}

impl PartialEq for Account {
    fn eq(&self, other: &Self) -> bool {
        self.address() == other.address()
    }
}

/// Selects an account explicitly, overriding the network defaults
#[derive(Args, Debug, Clone, Default)]
pub struct AccountSelector {
    /// Use the dev account at this index
    #[arg(long = "account-index")]
    pub index: Option<u32>,

    /// Use the stored keystore with this id
    #[arg(long = "account-id")]
    pub id: Option<String>,
}

impl AccountSelector {
    /// Select the dev account at the given index
    pub fn index(index: u32) -> Self {
        Self {
            index: Some(index),
            id: None,
        }
    }

    /// Select the stored keystore with the given id
    pub fn id(id: &str) -> Self {
        Self {
            index: None,
            id: Some(id.to_string()),
        }
    }
}

/// Resolve the account described by the selector on the given network
pub fn resolve_account(
    selector: &AccountSelector,
    network: &Network,
    config: &ProjectConfig,
    keystore_password: Option<&str>,
) -> Result<Account, ScriptError> {
    let account = if let Some(index) = selector.index {
        dev_account(&config.dev_mnemonic(network)?, index)?
    } else if let Some(id) = &selector.id {
        load_stored_account(&config.keystore_dir()?, id, keystore_password)?
    } else if network.has_dev_accounts() {
        dev_account(&config.dev_mnemonic(network)?, 0)?
    } else {
        let signer = PrivateKeySigner::from_str(&config.from_key()?)
            .map_err(|e| ScriptError::Account(format!("bad `wallets.from_key`: {}", e)))?;
        Account::new(signer, AccountSource::ConfiguredKey)
    };

    debug!(
        "Using {} ({:#x}) on {}",
        account.source(),
        account.address(),
        network
    );
    Ok(account)
}

/// Derive the dev account at the given index from the node's mnemonic
pub fn dev_account(mnemonic: &str, index: u32) -> Result<Account, ScriptError> {
    if index >= NUM_DEV_ACCOUNTS {
        return Err(ScriptError::Account(format!(
            "dev account index {} out of range, the node exposes {} accounts",
            index, NUM_DEV_ACCOUNTS
        )));
    }

    let signer = MnemonicBuilder::<English>::default()
        .phrase(mnemonic)
        .index(index)
        .and_then(|builder| builder.build())
        .map_err(|e| ScriptError::Account(e.to_string()))?;
    Ok(Account::new(signer, AccountSource::DevAccount(index)))
}

// -------------
// | Keystores |
// -------------

/// Load and decrypt the keystore with the given id
pub fn load_stored_account(
    keystore_dir: &Path,
    id: &str,
    password: Option<&str>,
) -> Result<Account, ScriptError> {
    let path = keystore_path(keystore_dir, id).ok_or_else(|| {
        ScriptError::Account(format!(
            "no stored account `{}` in {}",
            id,
            keystore_dir.display()
        ))
    })?;
    let password = password.ok_or_else(|| {
        ScriptError::Account(format!("no password given to unlock `{}`", id))
    })?;

    let signer = PrivateKeySigner::decrypt_keystore(&path, password)
        .map_err(|e| ScriptError::Account(format!("failed to unlock `{}`: {}", id, e)))?;
    Ok(Account::new(signer, AccountSource::Stored(id.to_string())))
}

/// Encrypt a private key into a new keystore with the given id
pub fn import_stored_account(
    keystore_dir: &Path,
    id: &str,
    private_key: &str,
    password: &str,
) -> Result<Account, ScriptError> {
    if keystore_path(keystore_dir, id).is_some() {
        return Err(ScriptError::Account(format!(
            "stored account `{}` already exists",
            id
        )));
    }

    let signer = PrivateKeySigner::from_str(private_key)
        .map_err(|e| ScriptError::Account(format!("bad private key: {}", e)))?;
    fs::create_dir_all(keystore_dir).map_err(|e| ScriptError::Account(e.to_string()))?;
    PrivateKeySigner::encrypt_keystore(
        keystore_dir,
        &mut thread_rng(),
        signer.to_bytes(),
        password,
        Some(id),
    )
    .map_err(|e| ScriptError::Account(e.to_string()))?;

    Ok(Account::new(signer, AccountSource::Stored(id.to_string())))
}

/// The ids of all stored accounts, sorted
pub fn list_stored_accounts(keystore_dir: &Path) -> Result<Vec<String>, ScriptError> {
    if !keystore_dir.exists() {
        return Ok(Vec::new());
    }

    let entries =
        fs::read_dir(keystore_dir).map_err(|e| ScriptError::Account(e.to_string()))?;
    let ids = entries
        .filter_map(|entry| {
            let path = entry.ok()?.path();
            if !path.is_file() {
                return None;
            }
            let name = path.file_name()?.to_str()?;
            Some(name.strip_suffix(".json").unwrap_or(name).to_string())
        })
        .sorted()
        .dedup()
        .collect();

    Ok(ids)
}

/// The keystore file for the given id, stored as `<id>` or `<id>.json`
fn keystore_path(keystore_dir: &Path, id: &str) -> Option<PathBuf> {
    [keystore_dir.join(id), keystore_dir.join(format!("{id}.json"))]
        .into_iter()
        .find(|path| path.is_file())
}
