mod cli;
mod commands;
mod error;

use crate::cli::{Cli, Command};
use crate::error::{ErrorKind, Result};
use clap::Parser;
use exn::ResultExt;
use mtgetl_config::Config;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!("{err}");
            eprintln!("{err:?}");
            ExitCode::FAILURE
        },
    }
}

async fn run(cli: Cli) -> Result<()> {
    let mut out = std::io::stdout();
    match cli.command {
        Command::Recency(args) => {
            let config = Config::load(cli.config.as_deref()).or_raise(|| ErrorKind::Config)?;
            commands::recency(&config, &args, &mut out).await
        },
        Command::Structure(args) => commands::structure(&args, &mut out),
        Command::Empties(args) => commands::empties(&args, &mut out),
        Command::PurchaseUrls(args) => commands::purchase_urls(&args, &mut out),
    }
}

/// Logs go to stderr so that reports on stdout can be piped.
fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .compact()
        .init();
}
