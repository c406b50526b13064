//! CLI Command Handlers
//!
//! Each handler takes CLI args and Output, returns ExitCode.

use std::path::Path;
use tracing::info;

use crate::aggregator::LiveTv;
use crate::cli::{ChannelsCmd, ConfigCmd, ExitCode, Output, ProvidersCmd, ResolveCmd};
use crate::config::Config;
use crate::models::{Category, Channel};
use crate::response::{ChannelsResponse, StreamResponse};

// =============================================================================
// Channels Command
// =============================================================================

/// Apply the listing filters from the command line
pub fn filter_channels(mut channels: Vec<Channel>, cmd: &ChannelsCmd) -> Vec<Channel> {
    if let Some(filter) = cmd.category {
        let category = Category::from(filter);
        channels.retain(|c| c.category == category);
    }

    if let Some(ref provider) = cmd.provider {
        channels.retain(|c| &c.provider == provider);
    }

    if let Some(limit) = cmd.limit {
        channels.truncate(limit);
    }

    channels
}

pub async fn channels_cmd(cmd: ChannelsCmd, livetv: &LiveTv, output: &Output) -> ExitCode {
    output.info(format!(
        "Fetching channels from {} providers...",
        livetv.registry().len()
    ));

    let channels = filter_channels(livetv.all_channels().await, &cmd);
    info!(count = channels.len(), "channel listing complete");

    if output.json {
        if let Err(e) = output.print_json(&ChannelsResponse::new(channels)) {
            return output.error(format!("Failed to serialize: {}", e), ExitCode::Error);
        }
        return ExitCode::Success;
    }

    if channels.is_empty() {
        output.info("No channels found");
    }
    for channel in &channels {
        let badge = channel
            .meta
            .as_ref()
            .and_then(|m| m.badge.as_deref())
            .map(|b| format!(" [{}]", b))
            .unwrap_or_default();
        output.line(format!(
            "{:<10} {:<8} {:<32} {}{}",
            channel.provider,
            channel.category.to_string(),
            channel.id,
            channel.name,
            badge
        ));
    }
    ExitCode::Success
}

// =============================================================================
// Resolve Command
// =============================================================================

pub async fn resolve_cmd(cmd: ResolveCmd, livetv: &LiveTv, output: &Output) -> ExitCode {
    let response = match StreamResponse::validate_request(
        cmd.provider.as_deref(),
        cmd.channel.as_deref(),
    ) {
        Ok((provider, channel)) => {
            output.info(format!("Resolving {}/{}...", provider, channel));
            StreamResponse::from_result(livetv.resolve_stream(provider, channel).await)
        }
        Err(invalid) => invalid,
    };

    let code = ExitCode::from_status(response.status_code());

    if output.json {
        if let Err(e) = output.print_json(&response) {
            return output.error(format!("Failed to serialize: {}", e), ExitCode::Error);
        }
        return code;
    }

    match (&response.stream, &response.error) {
        (Some(stream), _) => {
            output.line(format!("{} {}", stream.stream_type, stream.url));
            code
        }
        (None, Some(error)) => {
            let msg = match &response.message {
                Some(detail) => format!("{}: {}", error, detail),
                None => error.clone(),
            };
            output.error(msg, code)
        }
        (None, None) => output.error("Empty response", ExitCode::Error),
    }
}

// =============================================================================
// Providers Command
// =============================================================================

#[derive(serde::Serialize)]
struct ProviderSummary<'a> {
    id: &'a str,
    name: &'a str,
    priority: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    channels: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<&'a str>,
}

pub async fn providers_cmd(cmd: ProvidersCmd, livetv: &LiveTv, output: &Output) -> ExitCode {
    let listings = if cmd.offline {
        Vec::new()
    } else {
        livetv.channels_by_provider().await
    };

    let summaries: Vec<ProviderSummary> = if cmd.offline {
        livetv
            .registry()
            .providers()
            .iter()
            .map(|p| ProviderSummary {
                id: p.id(),
                name: p.name(),
                priority: p.priority(),
                channels: None,
                error: None,
            })
            .collect()
    } else {
        listings
            .iter()
            .map(|l| ProviderSummary {
                id: &l.id,
                name: &l.name,
                priority: l.priority,
                channels: Some(l.channels.len()),
                error: l.error.as_deref(),
            })
            .collect()
    };

    if output.json {
        if let Err(e) = output.print_json(&summaries) {
            return output.error(format!("Failed to serialize: {}", e), ExitCode::Error);
        }
        return ExitCode::Success;
    }

    for s in &summaries {
        let status = match (s.channels, s.error) {
            (_, Some(err)) => format!("error: {}", err),
            (Some(n), None) => format!("{} channels", n),
            (None, None) => String::new(),
        };
        output.line(format!("{:>4}  {:<10} {:<18} {}", s.priority, s.id, s.name, status));
    }
    ExitCode::Success
}

// =============================================================================
// Config Command
// =============================================================================

pub fn config_cmd(
    cmd: ConfigCmd,
    config: &Config,
    config_path: Option<&Path>,
    output: &Output,
) -> ExitCode {
    if !cmd.set.is_empty() {
        return config_set(&cmd.set, config, config_path, output);
    }

    if cmd.path {
        return match config_path {
            Some(path) => {
                output.line(path.display());
                ExitCode::Success
            }
            None => output.error("Could not determine config path", ExitCode::Error),
        };
    }

    if output.json {
        if let Err(e) = output.print_json(config) {
            return output.error(format!("Failed to serialize: {}", e), ExitCode::Error);
        }
        return ExitCode::Success;
    }

    match toml::to_string_pretty(config) {
        Ok(text) => {
            output.line(text);
            ExitCode::Success
        }
        Err(e) => output.error(format!("Failed to serialize: {}", e), ExitCode::Error),
    }
}

/// Apply `KEY=VALUE` edits and write the result back to `config_path`
fn config_set(
    edits: &[String],
    config: &Config,
    config_path: Option<&Path>,
    output: &Output,
) -> ExitCode {
    let Some(path) = config_path else {
        return output.error("Could not determine config path", ExitCode::Error);
    };

    let mut updated = config.clone();
    for edit in edits {
        let Some((key, value)) = edit.split_once('=') else {
            return output.error(format!("Expected KEY=VALUE, got {:?}", edit), ExitCode::InvalidArgs);
        };
        if let Err(e) = updated.set(key.trim(), value) {
            return output.error(e.to_string(), ExitCode::InvalidArgs);
        }
    }

    if let Err(e) = updated.save_to(path) {
        return output.error(format!("{:#}", e), ExitCode::Error);
    }

    info!(path = %path.display(), keys = edits.len(), "config saved");
    output.info(format!("Saved {}", path.display()));
    ExitCode::Success
}
