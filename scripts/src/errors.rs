//! Definitions of errors that can occur during the execution of the lottery scripts

use std::{
    error::Error,
    fmt::{self, Display, Formatter},
};

/// Errors that can occur during the execution of the lottery scripts
#[derive(Debug)]
pub enum ScriptError {
    /// Error reading or interpreting the project configuration
    Config(String),
    /// A logical contract name that is not in the contract registry
    UnknownContract(String),
    /// Error resolving a signing account
    Account(String),
    /// Error reading a compiled contract artifact
    Artifact(String),
    /// Error initializing the RPC client
    ClientInitialization(String),
    /// Error constructing calldata for a contract method
    CalldataConstruction(String),
    /// Error deploying a contract
    ContractDeployment(String),
    /// Error calling a contract method
    ContractInteraction(String),
    /// A transaction was mined but reverted
    TransactionReverted(String),
}

impl Display for ScriptError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            ScriptError::Config(s) => write!(f, "configuration error: {}", s),
            ScriptError::UnknownContract(s) => write!(f, "unknown contract: {}", s),
            ScriptError::Account(s) => write!(f, "error resolving account: {}", s),
            ScriptError::Artifact(s) => write!(f, "error reading artifact: {}", s),
            ScriptError::ClientInitialization(s) => write!(f, "error initializing client: {}", s),
            ScriptError::CalldataConstruction(s) => write!(f, "error constructing calldata: {}", s),
            ScriptError::ContractDeployment(s) => write!(f, "error deploying contract: {}", s),
            ScriptError::ContractInteraction(s) => {
                write!(f, "error interacting with contract: {}", s)
            }
            ScriptError::TransactionReverted(s) => write!(f, "transaction reverted: {}", s),
        }
    }
}

impl Error for ScriptError {}
