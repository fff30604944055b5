//! Scripts for deploying and operating the lottery contracts and their
//! Chainlink dependencies

#![deny(missing_docs)]
#![deny(clippy::missing_docs_in_private_items)]

pub mod accounts;
pub mod artifacts;
pub mod chain;
pub mod cli;
pub mod commands;
pub mod config;
pub mod constants;
pub mod errors;
pub mod lottery;
pub mod session;
pub mod solidity;
pub mod types;

#[cfg(test)]
mod test_utils;
