//! # Shell Integration
//!
//! The pieces a command shell uses to talk to store hooks.
//!
//! ## Command Context
//!
//! [`CommandContext`] wraps the `clap::Command` of one invocation. Format
//! hooks receive it mutably while the shell asks `can_read`/`can_write`, so
//! a format can register options of its own (`--strict`, `--indent 4`), and
//! immutably once arguments are parsed.
//!
//! ## Generated Flags
//!
//! | Source | Flag | Used by |
//! |--------|------|---------|
//! | Store descriptor | `--<option>`, `-<mnemonic>` | `store`, `print`, `ps`, `current` |
//! | Format tag | `--<name>` | `read`, `write` |
//!
//! ## Output Formats
//!
//! [`Output`] renders in `text` (default) or `json`, and prints verbose
//! diagnostics to stderr when enabled.

mod context;
mod flags;
mod output;

pub use context::CommandContext;
pub use flags::{format_arg_id, store_arg_id};
pub use output::{Output, OutputFormat};
