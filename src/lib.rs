//! livetv - live TV channel aggregation and stream resolution
//!
//! Several independent sources publish live channel listings. This crate
//! merges them in provider-priority order, isolating any source that fails,
//! and resolves a `(provider, channel)` pair to a directly playable stream,
//! falling back across a provider's mirrors with a per-attempt timeout.
//!
//! # Modules
//!
//! - `models` - Channels, resolved streams, mirror candidates
//! - `providers` - The provider contract and the bundled sources
//! - `registry` - Priority-ordered provider set
//! - `mirror` - First-success mirror fallback with cancellation
//! - `aggregator` - Listing fan-out and stream dispatch
//! - `response` - Caller-facing JSON envelopes
//! - `config` - Config file and environment overrides
//! - `cli` / `commands` - Command line surface

pub mod aggregator;
pub mod cli;
pub mod commands;
pub mod config;
pub mod mirror;
pub mod models;
pub mod providers;
pub mod registry;
pub mod response;

// Re-export commonly used types
pub use aggregator::{LiveTv, ProviderListing};
pub use mirror::{resolve_with_mirrors, DEFAULT_MIRROR_TIMEOUT};
pub use models::{Category, Channel, ChannelMeta, MirrorCandidate, ResolvedStream, StreamType};
pub use providers::{LiveProvider, ProviderError};
pub use registry::ProviderRegistry;
pub use response::{ChannelsResponse, StreamResponse};
