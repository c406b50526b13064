//! CLI and Envelope Tests
//!
//! Argument parsing, listing filters, and the JSON envelopes callers see.

// =============================================================================
// CLI Argument Parsing Tests
// =============================================================================

mod cli_parsing {
    use clap::Parser;
    use livetv::cli::{CategoryFilter, Cli, Command};

    #[test]
    fn test_channels_command_basic() {
        let cli = Cli::parse_from(["livetv", "channels"]);
        match cli.command {
            Command::Channels(cmd) => {
                assert!(cmd.category.is_none());
                assert!(cmd.provider.is_none());
                assert!(cmd.limit.is_none());
            }
            _ => panic!("Expected Channels command"),
        }
    }

    #[test]
    fn test_channels_with_filters() {
        let cli = Cli::parse_from([
            "livetv", "ch", "-C", "sports", "--provider", "streamed", "-l", "5",
        ]);
        match cli.command {
            Command::Channels(cmd) => {
                assert_eq!(cmd.category, Some(CategoryFilter::Sports));
                assert_eq!(cmd.provider.as_deref(), Some("streamed"));
                assert_eq!(cmd.limit, Some(5));
            }
            _ => panic!("Expected Channels command"),
        }
    }

    #[test]
    fn test_resolve_command() {
        let cli = Cli::parse_from(["livetv", "resolve", "iptv", "iptv-bbcone-uk"]);
        match cli.command {
            Command::Resolve(cmd) => {
                assert_eq!(cmd.provider.as_deref(), Some("iptv"));
                assert_eq!(cmd.channel.as_deref(), Some("iptv-bbcone-uk"));
            }
            _ => panic!("Expected Resolve command"),
        }
    }

    #[test]
    fn test_resolve_without_ids_still_parses() {
        // Missing ids become an INVALID_REQUEST envelope, not a clap error
        let cli = Cli::parse_from(["livetv", "resolve", "iptv"]);
        match cli.command {
            Command::Resolve(cmd) => {
                assert_eq!(cmd.provider.as_deref(), Some("iptv"));
                assert!(cmd.channel.is_none());
            }
            _ => panic!("Expected Resolve command"),
        }
    }

    #[test]
    fn test_global_flags() {
        let cli = Cli::parse_from([
            "livetv",
            "--json",
            "--quiet",
            "--verbose",
            "--config",
            "/tmp/livetv.toml",
            "providers",
            "--offline",
        ]);
        assert!(cli.json);
        assert!(cli.quiet);
        assert!(cli.verbose);
        assert!(cli.should_json());
        assert_eq!(
            cli.config.as_deref().and_then(|p| p.to_str()),
            Some("/tmp/livetv.toml")
        );
        match cli.command {
            Command::Providers(cmd) => assert!(cmd.offline),
            _ => panic!("Expected Providers command"),
        }
    }

    #[test]
    fn test_invalid_category_rejected() {
        let result = Cli::try_parse_from(["livetv", "channels", "--category", "movies"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_config_set_repeats() {
        let cli = Cli::parse_from([
            "livetv",
            "config",
            "--set",
            "mirror_timeout_ms=2500",
            "--set",
            "providers.iptv=http://localhost:9000",
        ]);
        match cli.command {
            Command::Config(cmd) => {
                assert!(!cmd.path);
                assert_eq!(
                    cmd.set,
                    vec!["mirror_timeout_ms=2500", "providers.iptv=http://localhost:9000"]
                );
            }
            _ => panic!("Expected Config command"),
        }
    }

    #[test]
    fn test_subcommand_required() {
        assert!(Cli::try_parse_from(["livetv"]).is_err());
    }
}

// =============================================================================
// Listing Filter Tests
// =============================================================================

mod listing_filters {
    use livetv::cli::{CategoryFilter, ChannelsCmd};
    use livetv::commands::filter_channels;
    use livetv::{Category, Channel};

    fn sample() -> Vec<Channel> {
        vec![
            Channel::new("streamed-a", "A vs B", Category::Sports, "streamed"),
            Channel::new("iptv-bbc", "BBC One", Category::General, "iptv"),
            Channel::new("iptv-sky", "Sky News", Category::News, "iptv"),
            Channel::new("iptv-espn", "ESPN", Category::Sports, "iptv"),
        ]
    }

    fn cmd(category: Option<CategoryFilter>, provider: Option<&str>, limit: Option<usize>) -> ChannelsCmd {
        ChannelsCmd {
            category,
            provider: provider.map(String::from),
            limit,
        }
    }

    #[test]
    fn test_no_filters_keeps_order() {
        let ids: Vec<String> = filter_channels(sample(), &cmd(None, None, None))
            .into_iter()
            .map(|c| c.id)
            .collect();
        assert_eq!(ids, vec!["streamed-a", "iptv-bbc", "iptv-sky", "iptv-espn"]);
    }

    #[test]
    fn test_category_and_provider_filters() {
        let filtered = filter_channels(sample(), &cmd(Some(CategoryFilter::Sports), Some("iptv"), None));
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].id, "iptv-espn");
    }

    #[test]
    fn test_limit_applies_after_filters() {
        let filtered = filter_channels(sample(), &cmd(None, Some("iptv"), Some(2)));
        let ids: Vec<&str> = filtered.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["iptv-bbc", "iptv-sky"]);
    }
}

// =============================================================================
// Config Command Tests
// =============================================================================

mod config_command {
    use livetv::cli::{ConfigCmd, ExitCode, Output};
    use livetv::commands::config_cmd;
    use livetv::config::Config;

    fn quiet() -> Output {
        Output {
            json: false,
            quiet: true,
        }
    }

    fn set(edits: &[&str]) -> ConfigCmd {
        ConfigCmd {
            path: false,
            set: edits.iter().map(|e| e.to_string()).collect(),
        }
    }

    #[test]
    fn test_set_writes_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("livetv").join("config.toml");
        let existing = Config {
            request_timeout_secs: Some(5),
            ..Config::default()
        };

        let code = config_cmd(
            set(&["mirror_timeout_ms=2500", "disabled_providers=ppv,tvpass"]),
            &existing,
            Some(&path),
            &quiet(),
        );
        assert_eq!(code, ExitCode::Success);

        let saved = Config::load_from(&path);
        assert_eq!(saved.mirror_timeout_ms, Some(2500));
        assert_eq!(saved.request_timeout_secs, Some(5));
        assert!(!saved.is_enabled("ppv"));
        assert!(saved.is_enabled("iptv"));
    }

    #[test]
    fn test_bad_edit_leaves_file_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let code = config_cmd(set(&["no-equals-sign"]), &Config::default(), Some(&path), &quiet());
        assert_eq!(code, ExitCode::InvalidArgs);

        let code = config_cmd(set(&["volume=3"]), &Config::default(), Some(&path), &quiet());
        assert_eq!(code, ExitCode::InvalidArgs);

        assert!(!path.exists());
    }
}

// =============================================================================
// Envelope Tests
// =============================================================================

mod envelopes {
    use livetv::cli::ExitCode;
    use livetv::response::{INVALID_REQUEST, RESOLVE_FAILED, STREAM_UNAVAILABLE};
    use livetv::{Category, Channel, ChannelsResponse, ProviderError, ResolvedStream, StreamResponse, StreamType};

    #[test]
    fn test_channels_envelope() {
        let response = ChannelsResponse::new(vec![Channel::new(
            "iptv-bbc",
            "BBC One",
            Category::General,
            "iptv",
        )]);
        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(json["success"], true);
        assert_eq!(json["channels"][0]["id"], "iptv-bbc");
        assert_eq!(json["channels"][0]["category"], "general");
        assert_eq!(json["channels"][0]["provider"], "iptv");
    }

    #[test]
    fn test_stream_success_envelope() {
        let response = StreamResponse::from_result(Ok(Some(ResolvedStream::new(
            "https://cdn/live.m3u8",
            StreamType::Hls,
        ))));
        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "success": true,
                "stream": {"url": "https://cdn/live.m3u8", "type": "hls"}
            })
        );
        assert_eq!(response.status_code(), 200);
        assert_eq!(ExitCode::from_status(response.status_code()), ExitCode::Success);
    }

    #[test]
    fn test_stream_unavailable_envelope() {
        let response = StreamResponse::from_result(Ok(None));
        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(
            json,
            serde_json::json!({"success": false, "error": STREAM_UNAVAILABLE})
        );
        assert_eq!(response.status_code(), 404);
        assert_eq!(ExitCode::from_status(404), ExitCode::NoStream);
    }

    #[test]
    fn test_stream_fault_envelope_keeps_distinction() {
        let response = StreamResponse::from_result(Err(ProviderError::Status(500)));

        assert!(!response.success);
        assert_eq!(response.error.as_deref(), Some(RESOLVE_FAILED));
        assert!(response.message.as_deref().unwrap().contains("500"));
        assert_eq!(response.status_code(), 502);
        assert_ne!(response, StreamResponse::unavailable());
    }

    #[test]
    fn test_request_validation() {
        assert_eq!(
            StreamResponse::validate_request(Some("iptv"), Some(" iptv-bbc ")),
            Ok(("iptv", "iptv-bbc"))
        );

        let missing_provider = StreamResponse::validate_request(None, Some("x")).unwrap_err();
        assert_eq!(missing_provider.error.as_deref(), Some(INVALID_REQUEST));
        assert_eq!(missing_provider.status_code(), 400);

        let blank_channel = StreamResponse::validate_request(Some("iptv"), Some("  ")).unwrap_err();
        assert_eq!(blank_channel.message.as_deref(), Some("missing channel id"));
    }
}
