//! Stowage - pluggable store types for interactive command shells
//!
//! A shell built on stowage manages values of store types it never sees at
//! its own compile time (graphs, circuits, tables). Each store type declares,
//! where it is defined, its identifying metadata, the file formats it can be
//! read from and written to, and the store types it converts into. The shell
//! asks a [`StoreRegistry`] whether an operation is supported before
//! performing it; anything not declared answers "unsupported".

pub mod domain;
pub mod registry;
pub mod storage;
pub mod cli;

pub use cli::{CommandContext, Output, OutputFormat};
pub use domain::{
    ConvertFrom, DescriptorError, FormatInfo, FormatTag, ReadFormat, StoreInfo, StoreType,
    WriteFormat,
};
pub use registry::{
    AnyStore, Catalog, ConversionGraph, Environment, GraphError, Operation, RegistryBuilder, StoreError,
    StoreRegistry,
};
pub use storage::{Config, StatisticsEntry, StatisticsLog};
