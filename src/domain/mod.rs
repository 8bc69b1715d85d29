//! Store extension contract
//!
//! The traits a store type implements to plug into the shell. Contains no
//! I/O of its own; reading and writing live in the implementations.

mod info;
mod store;
mod format;
mod convert;

pub use info::{validate_all, DescriptorError, StoreInfo, RESERVED_MNEMONICS, RESERVED_OPTIONS};
pub use store::StoreType;
pub use format::{FormatInfo, FormatTag, ReadFormat, WriteFormat};
pub use convert::ConvertFrom;
