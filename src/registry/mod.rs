//! # Store Registry
//!
//! The table the shell consults before touching a store type it does not know
//! at compile time.
//!
//! ## Capability pairs
//!
//! | Query | Action | Keyed by |
//! |-------|--------|----------|
//! | `can_read` | `read` | (store type, format tag) |
//! | `can_write` | `write` | (store type, format tag) |
//! | `can_convert` | `convert` | (source type, destination type) |
//!
//! The shell asks the query first and runs the action only on a yes. Pairs
//! that were never declared answer no, and their action fails with
//! [`StoreError::Unimplemented`]. Presentation (`describe`, `print`,
//! `print_statistics`, `log_statistics`) has no query: it is always callable
//! and defaults to empty output.
//!
//! ## Assembly
//!
//! ```text
//! RegistryBuilder::new()
//!     .store::<Graph>()              // descriptor + presentation
//!     .reader::<Graph, Dot>()        // ReadFormat<Dot> for Graph
//!     .writer::<Graph, Dot>()        // WriteFormat<Dot> for Graph
//!     .conversion::<Graph, Table>()  // ConvertFrom<Graph> for Table
//!     .build()?                      // validates descriptors
//! ```
//!
//! ## Key Types
//!
//! - [`RegistryBuilder`] - Declares store types and capabilities
//! - [`StoreRegistry`] - Answers capability queries and runs actions
//! - [`Environment`] - Live values per store key
//! - [`ConversionGraph`] - Multi-hop conversion paths

mod builder;
mod dispatch;
mod environment;
mod erased;
mod error;
mod graph;

pub use builder::RegistryBuilder;
pub use dispatch::{Catalog, StoreRegistry};
pub use environment::Environment;
pub use erased::AnyStore;
pub use error::{Operation, StoreError};
pub use graph::{ConversionGraph, GraphError};
