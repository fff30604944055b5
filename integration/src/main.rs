//! Integration tests for the lottery scripts. These assume that a node is
//! already running for the selected network and that the contract artifacts
//! have been compiled.

use clap::Parser;
use colored::Colorize;
use eyre::{eyre, Result};
use scripts::{cli::SessionArgs, session::Session};
use test_inventory::{IntegrationTest, TestArgs};

mod test_inventory;
mod util;

/// CLI tool for running integration tests against a running node
#[derive(Parser)]
struct CliArgs {
    /// The session the tests run in
    #[command(flatten)]
    session: SessionArgs,

    /// Only run tests whose name contains this filter
    #[arg(short, long)]
    test: Option<String>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let CliArgs { session, test } = CliArgs::parse();
    tracing_subscriber::fmt().pretty().init();

    let args = TestArgs::new(Session::connect(&session)?);
    let tests = inventory::iter::<IntegrationTest>
        .into_iter()
        .filter(|t| test.as_deref().map_or(true, |filter| t.name.contains(filter)));

    let mut failures = Vec::new();
    for IntegrationTest { name, test_fn } in tests {
        match test_fn(args.clone()).await {
            Ok(()) => println!("{} {}", "PASS".green().bold(), name),
            Err(e) => {
                println!("{} {}: {}", "FAIL".red().bold(), name, e);
                failures.push(*name);
            }
        }
    }

    if failures.is_empty() {
        Ok(())
    } else {
        Err(eyre!("{} test(s) failed: {}", failures.len(), failures.join(", ")))
    }
}
