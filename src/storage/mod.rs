//! # Storage Layer
//!
//! The little state a shell keeps on disk. Store values themselves are
//! persisted only through format hooks.
//!
//! | Data | Format | Location |
//! |------|--------|----------|
//! | Config | TOML | `.stowage/config.toml`, `~/.config/stowage/config.toml` |
//! | Statistics log | JSONL (one record per line) | `.stowage/statistics.jsonl` |
//!
//! ## Key Types
//!
//! - [`Config`] - Project and global configuration
//! - [`StatisticsLog`] - Append-only log of `log_statistics` records

mod config;
mod stats_log;

pub use config::{Config, ConfigError, GlobalConfig, ProjectConfig, PROJECT_DIR};
pub use stats_log::{StatisticsEntry, StatisticsLog};
