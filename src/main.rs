//! livetv - live channel listings and stream resolution
//!
//! # Usage
//!
//! ```bash
//! livetv channels --category sports
//! livetv resolve streamed streamed-abc123 --json
//! livetv providers
//! ```

use clap::Parser;
use tracing_subscriber::EnvFilter;

use livetv::cli::{Cli, Command, ExitCode, Output};
use livetv::commands;
use livetv::config::Config;
use livetv::{LiveTv, ProviderRegistry};

#[tokio::main]
async fn main() -> std::process::ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    run_cli(cli).await.into()
}

/// Log to stderr so JSON on stdout stays clean
fn init_logging(verbose: bool) {
    let default_level = if verbose { "livetv=debug" } else { "livetv=warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Run CLI command and return exit code
async fn run_cli(cli: Cli) -> ExitCode {
    let output = Output::new(&cli);
    let config = cli.load_config();
    let config_path = cli.config.clone().or_else(Config::path);

    // Registry is built once here and shared by every command
    let livetv = LiveTv::from(ProviderRegistry::from_config(&config));

    match cli.command {
        Command::Channels(cmd) => commands::channels_cmd(cmd, &livetv, &output).await,
        Command::Resolve(cmd) => commands::resolve_cmd(cmd, &livetv, &output).await,
        Command::Providers(cmd) => commands::providers_cmd(cmd, &livetv, &output).await,
        Command::Config(cmd) => {
            commands::config_cmd(cmd, &config, config_path.as_deref(), &output)
        }
    }
}
