//! Integration tests for livetv
//!
//! Tests are organized by component:
//! - aggregator_test: listing order, fault isolation, resolve dispatch
//! - mirror_test: mirror fallback ordering, single pass, timeouts
//! - providers_test: bundled providers against mocked upstreams
//! - cli_test: argument parsing, listing filters, JSON envelopes

// Note: Each test file is a separate integration test crate
// Tests are run individually by cargo, not via mod.rs
