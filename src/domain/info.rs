//! Store descriptors
//!
//! Every store type carries a [`StoreInfo`] that identifies it to the shell:
//! - `key` indexes the environment slot holding values of the type
//! - `option` / `mnemonic` become the `--<option>` / `-<mnemonic>` flags
//! - `name` / `name_plural` appear in help texts and listings

use serde::Serialize;
use thiserror::Error;

/// Short flags the shell keeps for itself (`-n` new, `-v` verbose, `-h` help)
pub const RESERVED_MNEMONICS: &[char] = &['n', 'v', 'h'];

/// Long flags clap adds to every command (`--help`)
pub const RESERVED_OPTIONS: &[&str] = &["help"];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DescriptorError {
    #[error("Store '{key}' has an empty {field}")]
    EmptyField {
        key: &'static str,
        field: &'static str,
    },

    #[error("Store '{key}' uses reserved mnemonic '{mnemonic}'")]
    ReservedMnemonic { key: &'static str, mnemonic: char },

    #[error("Store '{key}' uses reserved option '--{option}'")]
    ReservedOption {
        key: &'static str,
        option: &'static str,
    },

    #[error("Store '{key}' has invalid mnemonic '{mnemonic}': expected an ASCII letter or digit")]
    InvalidMnemonic { key: &'static str, mnemonic: char },

    #[error("Duplicate store key: {0}")]
    DuplicateKey(&'static str),

    #[error("Option '--{option}' is used by both '{first}' and '{second}'")]
    DuplicateOption {
        option: &'static str,
        first: &'static str,
        second: &'static str,
    },

    #[error("Mnemonic '-{mnemonic}' is used by both '{first}' and '{second}'")]
    DuplicateMnemonic {
        mnemonic: char,
        first: &'static str,
        second: &'static str,
    },

    #[error("Invalid format name: '{0}'")]
    InvalidFormatName(&'static str),

    #[error("Format name '{0}' is reserved")]
    ReservedFormatName(&'static str),

    #[error("Duplicate format name: {0}")]
    DuplicateFormat(&'static str),

    #[error("Format '{0}' clashes with a store option of the same name")]
    FormatClash(&'static str),
}

/// Identifying metadata for a store type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct StoreInfo {
    /// Unique key for the environment
    pub key: &'static str,

    /// Long option name (without dashes)
    pub option: &'static str,

    /// Short option character (without dash)
    pub mnemonic: char,

    /// Singular display name
    pub name: &'static str,

    /// Plural display name
    pub name_plural: &'static str,
}

impl StoreInfo {
    pub const fn new(
        key: &'static str,
        option: &'static str,
        mnemonic: char,
        name: &'static str,
        name_plural: &'static str,
    ) -> Self {
        Self {
            key,
            option,
            mnemonic,
            name,
            name_plural,
        }
    }

    /// Checks the invariants of a single descriptor
    pub fn validate(&self) -> Result<(), DescriptorError> {
        let fields = [
            ("key", self.key),
            ("option", self.option),
            ("name", self.name),
            ("name_plural", self.name_plural),
        ];

        for (field, value) in fields {
            if value.trim().is_empty() {
                return Err(DescriptorError::EmptyField {
                    key: self.key,
                    field,
                });
            }
        }

        if RESERVED_OPTIONS.contains(&self.option) {
            return Err(DescriptorError::ReservedOption {
                key: self.key,
                option: self.option,
            });
        }

        if RESERVED_MNEMONICS.contains(&self.mnemonic) {
            return Err(DescriptorError::ReservedMnemonic {
                key: self.key,
                mnemonic: self.mnemonic,
            });
        }

        if !self.mnemonic.is_ascii_alphanumeric() {
            return Err(DescriptorError::InvalidMnemonic {
                key: self.key,
                mnemonic: self.mnemonic,
            });
        }

        Ok(())
    }

    /// Returns the long flag as typed on the command line
    pub fn long_flag(&self) -> String {
        format!("--{}", self.option)
    }

    /// Returns the short flag as typed on the command line
    pub fn short_flag(&self) -> String {
        format!("-{}", self.mnemonic)
    }
}

/// Validates a set of descriptors that will live in one shell
///
/// Each descriptor must be valid on its own, and keys, options and
/// mnemonics must not repeat across descriptors.
pub fn validate_all<'a>(
    infos: impl IntoIterator<Item = &'a StoreInfo>,
) -> Result<(), DescriptorError> {
    let mut seen: Vec<&StoreInfo> = Vec::new();

    for info in infos {
        info.validate()?;

        for other in &seen {
            if other.key == info.key {
                return Err(DescriptorError::DuplicateKey(info.key));
            }
            if other.option == info.option {
                return Err(DescriptorError::DuplicateOption {
                    option: info.option,
                    first: other.key,
                    second: info.key,
                });
            }
            if other.mnemonic == info.mnemonic {
                return Err(DescriptorError::DuplicateMnemonic {
                    mnemonic: info.mnemonic,
                    first: other.key,
                    second: info.key,
                });
            }
        }

        seen.push(info);
    }

    Ok(())
}
