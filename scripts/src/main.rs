use clap::Parser;
use scripts::{cli::Cli, errors::ScriptError, session::Session};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), ScriptError> {
    let Cli { session, command } = Cli::parse();

    tracing_subscriber::fmt().pretty().init();

    let mut session = Session::connect(&session)?;
    command.run(&mut session).await
}
