//! File format tags and format I/O capabilities
//!
//! A format tag is a zero-sized marker type. Store types opt into a format by
//! implementing [`ReadFormat`] and/or [`WriteFormat`] for that tag and
//! registering the pair with the [`RegistryBuilder`](crate::RegistryBuilder).
//! Pairs that are never registered answer "unsupported".

use std::path::Path;

use serde::Serialize;

use super::store::StoreType;
use crate::cli::CommandContext;

/// Marker type identifying one file format
pub trait FormatTag: 'static {
    /// Format name, also used as the command-line flag (`--<name>`)
    const NAME: &'static str;

    /// Filename extensions (without dot) that select this format
    const EXTENSIONS: &'static [&'static str] = &[];

    /// Help text for the format flag
    const DESCRIPTION: &'static str = "";
}

/// Runtime view of a format tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FormatInfo {
    pub name: &'static str,
    pub extensions: &'static [&'static str],
    pub description: &'static str,
}

impl FormatInfo {
    pub fn of<F: FormatTag>() -> Self {
        Self {
            name: F::NAME,
            extensions: F::EXTENSIONS,
            description: F::DESCRIPTION,
        }
    }

    /// Returns true if the file extension of `path` belongs to this format
    pub fn matches_path(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| {
                self.extensions
                    .iter()
                    .any(|known| known.eq_ignore_ascii_case(ext))
            })
            .unwrap_or(false)
    }
}

/// Reading a store type from format `F`
pub trait ReadFormat<F: FormatTag>: StoreType {
    /// Asked once per command before its arguments are parsed
    ///
    /// May register format-specific options on `cmd`. Once the pair is
    /// registered this answers true unless overridden.
    fn can_read(cmd: &mut CommandContext) -> bool {
        let _ = cmd;
        true
    }

    /// Reads a value; only called after `can_read` answered true
    fn read(path: &Path, cmd: &CommandContext) -> anyhow::Result<Self>;
}

/// Writing a store type to format `F`
pub trait WriteFormat<F: FormatTag>: StoreType {
    /// Asked once per command before its arguments are parsed
    fn can_write(cmd: &mut CommandContext) -> bool {
        let _ = cmd;
        true
    }

    /// Writes a value; only called after `can_write` answered true
    fn write(&self, path: &Path, cmd: &CommandContext) -> anyhow::Result<()>;
}
