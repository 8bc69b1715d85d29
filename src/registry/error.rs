//! Dispatch errors

use std::fmt;

use thiserror::Error;

/// Action guarded by a capability query
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Read,
    Write,
    Convert,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Read => "read",
            Operation::Write => "write",
            Operation::Convert => "convert",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    /// An action was invoked for a pair whose capability query answers false
    #[error("Unimplemented operation: {operation} '{store}' with '{target}'")]
    Unimplemented {
        operation: Operation,
        store: &'static str,
        target: &'static str,
    },

    #[error("Unknown store type: {0}")]
    UnknownStore(String),

    #[error("Unknown format: {0}")]
    UnknownFormat(String),

    #[error("No {0} in store")]
    EmptyStore(String),

    #[error("Index {index} out of range for '{key}' ({len} stored)")]
    IndexOutOfRange {
        key: String,
        index: usize,
        len: usize,
    },

    #[error("Stored value is not a '{expected}'")]
    TypeMismatch { expected: &'static str },

    #[error("Invalid conversion path: {0}")]
    InvalidPath(String),

    /// Failure raised by a hook implementation, passed through unchanged
    #[error(transparent)]
    Execution(#[from] anyhow::Error),
}

impl StoreError {
    /// Returns true for the misuse fault (action without capability)
    pub fn is_unimplemented(&self) -> bool {
        matches!(self, StoreError::Unimplemented { .. })
    }
}
