use azqr_cli::{cli::Cli, config, run_command};
use clap::Parser;
use std::process;
use tokio_util::sync::CancellationToken;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Initialize logging
    cli.init_logging();

    // Load configuration
    let config = match config::load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            process::exit(1);
        }
    };

    // Ctrl+C cancels in-flight listings
    let cancel = CancellationToken::new();
    let interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            log::warn!("Interrupted, cancelling scan");
            interrupt.cancel();
        }
    });

    if let Err(e) = run_command(cli.command, &config, cancel).await {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
