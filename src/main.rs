//! statusctl - send click and action events to the status bar daemon.
//!
//! Formats `segment,token` and writes it to statusd's Unix socket or named pipe
//! in a single one-shot connection.

mod client;
mod config;
mod error;
mod invocation;
mod protocol;

use anyhow::{Context, Result};
use clap::Parser;
use client::StatusClient;
use config::Config;
use protocol::ControlMessage;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "statusctl")]
#[command(author, version, about = "Send button and action events to the status bar daemon")]
#[command(override_usage = "statusctl <SEGMENT> [ACTION]")]
#[command(long_about = "Send button and action events to the status bar daemon.\n\nWith one argument the clicked button is read from $BUTTON.")]
struct Cli {
    /// Status bar segment, optionally followed by an action
    #[arg(value_name = "SEGMENT", allow_hyphen_values = true, trailing_var_arg = true)]
    args: Vec<String>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    init_logging();

    let cli = Cli::parse();
    let result = match Config::load().context("Failed to load configuration") {
        Ok(config) => run(&cli.args, &config).await,
        Err(e) => Err(e),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{:#}", e);
            let code = e.downcast_ref::<error::Error>().map_or(1, error::Error::exit_code);
            ExitCode::from(code)
        }
    }
}

/// Logs go to stderr and stay quiet unless something is wrong or RUST_LOG asks.
fn init_logging() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("statusctl=warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Resolve inputs, format the message and hand it to the daemon.
async fn run(args: &[String], config: &Config) -> Result<()> {
    let invocation = invocation::resolve(args, invocation::button_from_env)?;
    let message = ControlMessage::format(
        &invocation.segment,
        invocation.token.as_str(),
        &config.message,
    )?;

    StatusClient::from_config(&config.endpoint)
        .send(&message)
        .await?;
    Ok(())
}
