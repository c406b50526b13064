//! CLI - Command Line Interface for livetv
//!
//! Every operation is scriptable. All output is JSON-parseable.
//!
//! # Examples
//!
//! ```bash
//! # List every live channel
//! livetv channels --json
//!
//! # Only sports from one provider
//! livetv channels --category sports --provider streamed
//!
//! # Resolve a channel to a playable URL
//! livetv resolve iptv iptv-bbcone-uk
//! ```

use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::io::IsTerminal;
use std::path::PathBuf;

use crate::config::Config;
use crate::models::Category;

// =============================================================================
// Exit Codes
// =============================================================================

/// Exit codes for CLI operations (semantic for scripting)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Success
    Success = 0,
    /// General error
    Error = 1,
    /// Invalid arguments
    InvalidArgs = 2,
    /// Network or provider fault
    NetworkError = 3,
    /// No stream available
    NoStream = 5,
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> i32 {
        code as i32
    }
}

impl From<ExitCode> for std::process::ExitCode {
    fn from(code: ExitCode) -> std::process::ExitCode {
        std::process::ExitCode::from(code as u8)
    }
}

impl ExitCode {
    /// Map an HTTP-style envelope status onto an exit code
    pub fn from_status(status: u16) -> Self {
        match status {
            200..=299 => ExitCode::Success,
            400 => ExitCode::InvalidArgs,
            404 => ExitCode::NoStream,
            _ => ExitCode::NetworkError,
        }
    }
}

// =============================================================================
// Main CLI Structure
// =============================================================================

/// livetv - live channel listings and stream resolution
#[derive(Parser, Debug)]
#[command(
    name = "livetv",
    version,
    about = "Live TV channel aggregation and stream resolution",
    long_about = "Lists live channels from several independent sources, merged in \
                  priority order, and resolves a channel to a directly playable URL.",
    after_help = "EXAMPLES:\n\
                  livetv channels                       List all channels\n\
                  livetv channels -C sports -p streamed Sports from one provider\n\
                  livetv resolve iptv iptv-bbcone-uk    Resolve a channel\n\
                  livetv providers --json               Per-provider diagnostics"
)]
pub struct Cli {
    /// Output format as JSON (default for non-TTY)
    #[arg(long, short = 'j', global = true)]
    pub json: bool,

    /// Suppress non-essential output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Enable debug logging (overridden by RUST_LOG)
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Path to config file
    #[arg(long, short = 'c', global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Check if JSON output should be used
    pub fn should_json(&self) -> bool {
        self.json || !std::io::stdout().is_terminal()
    }

    /// Load the config named by `--config`, or the default one
    pub fn load_config(&self) -> Config {
        match &self.config {
            Some(path) => Config::load_from(path),
            None => Config::load(),
        }
    }
}

// =============================================================================
// Subcommands
// =============================================================================

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List live channels from every provider
    #[command(visible_alias = "ch")]
    Channels(ChannelsCmd),

    /// Resolve a channel to a playable stream
    #[command(visible_alias = "r")]
    Resolve(ResolveCmd),

    /// Show each provider and its listing status
    #[command(visible_alias = "p")]
    Providers(ProvidersCmd),

    /// Show the effective configuration
    Config(ConfigCmd),
}

/// List live channels
#[derive(Args, Debug)]
pub struct ChannelsCmd {
    /// Only channels in this category
    #[arg(long, short = 'C', value_enum)]
    pub category: Option<CategoryFilter>,

    /// Only channels from this provider id
    #[arg(long, short = 'p')]
    pub provider: Option<String>,

    /// Maximum number of results
    #[arg(long, short = 'l')]
    pub limit: Option<usize>,
}

/// Category filter for listings
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryFilter {
    Sports,
    General,
    News,
}

impl From<CategoryFilter> for Category {
    fn from(filter: CategoryFilter) -> Self {
        match filter {
            CategoryFilter::Sports => Category::Sports,
            CategoryFilter::General => Category::General,
            CategoryFilter::News => Category::News,
        }
    }
}

/// Resolve a `(provider, channel)` pair
#[derive(Args, Debug)]
pub struct ResolveCmd {
    /// Provider id (e.g., streamed)
    pub provider: Option<String>,

    /// Channel id as listed by the provider (e.g., streamed-abc123)
    pub channel: Option<String>,
}

#[derive(Args, Debug)]
pub struct ProvidersCmd {
    /// Skip fetching listings; only print the registry
    #[arg(long)]
    pub offline: bool,
}

#[derive(Args, Debug)]
pub struct ConfigCmd {
    /// Print only the config file path
    #[arg(long)]
    pub path: bool,

    /// Set a key and save, e.g. `--set providers.iptv=http://localhost:9000`
    #[arg(long, value_name = "KEY=VALUE")]
    pub set: Vec<String>,
}

// =============================================================================
// Output Helpers
// =============================================================================

/// Output handler for consistent formatting
pub struct Output {
    pub json: bool,
    pub quiet: bool,
}

#[derive(Serialize)]
struct ErrorOutput<'a> {
    success: bool,
    error: &'a str,
    exit_code: i32,
}

impl Output {
    pub fn new(cli: &Cli) -> Self {
        Self {
            json: cli.should_json(),
            quiet: cli.quiet,
        }
    }

    /// Print a serializable value as pretty JSON
    pub fn print_json<T: Serialize>(&self, data: &T) -> anyhow::Result<()> {
        println!("{}", serde_json::to_string_pretty(data)?);
        Ok(())
    }

    /// Print a plain text line (human mode)
    pub fn line(&self, text: impl std::fmt::Display) {
        println!("{}", text);
    }

    /// Print error and return exit code
    pub fn error(&self, msg: impl Into<String>, code: ExitCode) -> ExitCode {
        let msg = msg.into();
        if self.json {
            let output = ErrorOutput {
                success: false,
                error: &msg,
                exit_code: code.into(),
            };
            if let Ok(json) = serde_json::to_string_pretty(&output) {
                eprintln!("{}", json);
            }
        } else if !self.quiet {
            eprintln!("Error: {}", msg);
        }
        code
    }

    /// Print info message (suppressed in quiet mode)
    pub fn info(&self, msg: impl std::fmt::Display) {
        if !self.quiet && !self.json {
            eprintln!("{}", msg);
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
