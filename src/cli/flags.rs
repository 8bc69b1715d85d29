//! Command-line flags generated from the registry
//!
//! Commands that act on "the current item of some store type" get one switch
//! per store type (`--graph` / `-g`); file commands get one switch per
//! format (`--dot`). The shell adds these to its commands and resolves the
//! matches back to descriptors.

use std::path::Path;

use clap::{Arg, ArgAction, ArgMatches};

use crate::domain::{FormatInfo, StoreInfo};
use crate::registry::StoreRegistry;

/// Argument id of the switch for a store type
pub fn store_arg_id(info: &StoreInfo) -> String {
    format!("store-{}", info.key)
}

/// Argument id of the switch for a format
pub fn format_arg_id(info: &FormatInfo) -> String {
    format!("format-{}", info.name)
}

impl StoreRegistry {
    /// One `--<option>` / `-<mnemonic>` switch per store type
    pub fn store_args(&self) -> Vec<Arg> {
        self.stores()
            .map(|info| {
                Arg::new(store_arg_id(info))
                    .long(info.option)
                    .short(info.mnemonic)
                    .help(format!("use {}", info.name_plural))
                    .action(ArgAction::SetTrue)
            })
            .collect()
    }

    /// Store types whose switch was given
    pub fn selected_stores(&self, matches: &ArgMatches) -> Vec<&StoreInfo> {
        self.stores()
            .filter(|info| is_set(matches, &store_arg_id(info)))
            .collect()
    }

    /// One `--<name>` switch per enabled format
    pub fn format_args(&self) -> Vec<Arg> {
        self.formats()
            .filter(|info| !self.is_disabled(info.name))
            .map(|info| {
                let help = if info.description.is_empty() {
                    format!("use {} format", info.name)
                } else {
                    info.description.to_string()
                };
                Arg::new(format_arg_id(info))
                    .long(info.name)
                    .help(help)
                    .action(ArgAction::SetTrue)
            })
            .collect()
    }

    /// Picks the format for a file command
    ///
    /// An explicit format switch wins; otherwise the filename extension
    /// decides.
    pub fn resolve_format(&self, matches: &ArgMatches, path: &Path) -> Option<&FormatInfo> {
        self.formats()
            .find(|info| is_set(matches, &format_arg_id(info)))
            .or_else(|| self.format_for_path(path))
    }
}

fn is_set(matches: &ArgMatches, id: &str) -> bool {
    matches
        .try_get_one::<bool>(id)
        .ok()
        .flatten()
        .copied()
        .unwrap_or(false)
}
