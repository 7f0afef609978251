//! Butterfly - webhook-backed chat client
//!
#![doc = "Main entry point for the Butterfly chat client."]

use anyhow::Result;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use butterfly::cli::{Cli, Commands};
use butterfly::commands;
use butterfly::config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let cli = Cli::parse_args();

    // Initialize tracing
    init_tracing(cli.verbose);

    // Load configuration
    let config_path = cli.config.as_deref().unwrap_or("config/config.yaml");
    let config = Config::load(config_path, &cli)?;

    // Validate configuration
    config.validate()?;

    match cli.command {
        Commands::Chat { .. } => {
            tracing::info!("Starting interactive chat mode");
            commands::chat::run_chat(config).await?;
            Ok(())
        }
        Commands::Send { text, json, .. } => {
            tracing::info!("Sending one-shot message");
            if json {
                tracing::debug!("JSON output enabled");
            }
            commands::send::run_send(config, text, json).await?;
            Ok(())
        }
    }
}

/// Initialize tracing subscriber with environment filter
///
/// Logs go to stderr so they never interleave with the transcript on stdout.
fn init_tracing(verbose: bool) {
    let default_filter = if verbose {
        "butterfly=debug"
    } else {
        "butterfly=info"
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
