//! Registry assembly
//!
//! All capabilities are declared here, once, when the shell is put together.
//! Anything not declared stays unsupported.

use std::any::TypeId;
use std::collections::{HashMap, HashSet};

use super::dispatch::StoreRegistry;
use super::erased::{ConverterEntry, FormatEntry, ReaderEntry, StoreEntry, WriterEntry};
use crate::cli::Output;
use crate::domain::{
    validate_all, ConvertFrom, DescriptorError, FormatTag, ReadFormat, StoreType, WriteFormat,
    RESERVED_OPTIONS,
};
use crate::storage::ProjectConfig;

/// Builder for a [`StoreRegistry`]
///
/// ```
/// use stowage::{RegistryBuilder, StoreInfo, StoreType};
///
/// struct Graph;
///
/// impl StoreType for Graph {
///     const INFO: StoreInfo = StoreInfo::new("graph", "graph", 'g', "graph", "graphs");
/// }
///
/// let registry = RegistryBuilder::new().store::<Graph>().build().unwrap();
/// assert!(registry.is_registered::<Graph>());
/// ```
#[derive(Default)]
pub struct RegistryBuilder {
    stores: Vec<StoreEntry>,
    formats: Vec<FormatEntry>,
    readers: HashMap<(TypeId, TypeId), ReaderEntry>,
    writers: HashMap<(TypeId, TypeId), WriterEntry>,
    converters: HashMap<(TypeId, TypeId), ConverterEntry>,
    extra_extensions: HashMap<String, Vec<String>>,
    disabled_formats: HashSet<String>,
    output: Output,
}

impl RegistryBuilder {
    /// Creates an empty builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a store type (registering the same type again is a no-op)
    pub fn store<T: StoreType>(mut self) -> Self {
        let type_id = TypeId::of::<T>();
        if !self.stores.iter().any(|entry| entry.type_id == type_id) {
            self.stores.push(StoreEntry::of::<T>());
        }
        self
    }

    /// Registers a format tag without any store supporting it yet
    pub fn format<F: FormatTag>(mut self) -> Self {
        let type_id = TypeId::of::<F>();
        if !self.formats.iter().any(|entry| entry.type_id == type_id) {
            self.formats.push(FormatEntry::of::<F>());
        }
        self
    }

    /// Declares that `T` can be read from format `F`
    pub fn reader<T: ReadFormat<F>, F: FormatTag>(self) -> Self {
        let mut builder = self.store::<T>().format::<F>();
        builder
            .readers
            .insert((TypeId::of::<T>(), TypeId::of::<F>()), ReaderEntry::of::<T, F>());
        builder
    }

    /// Declares that `T` can be written to format `F`
    pub fn writer<T: WriteFormat<F>, F: FormatTag>(self) -> Self {
        let mut builder = self.store::<T>().format::<F>();
        builder
            .writers
            .insert((TypeId::of::<T>(), TypeId::of::<F>()), WriterEntry::of::<T, F>());
        builder
    }

    /// Declares that `S` can be converted into `D`
    pub fn conversion<S: StoreType, D: ConvertFrom<S>>(self) -> Self {
        let mut builder = self.store::<S>().store::<D>();
        builder.converters.insert(
            (TypeId::of::<S>(), TypeId::of::<D>()),
            ConverterEntry::of::<S, D>(),
        );
        builder
    }

    /// Applies project settings: extra extensions and disabled formats
    pub fn config(mut self, config: &ProjectConfig) -> Self {
        for (format, extensions) in &config.extensions {
            self.extra_extensions
                .entry(format.clone())
                .or_default()
                .extend(extensions.iter().map(|ext| ext.trim_start_matches('.').to_string()));
        }
        self.disabled_formats
            .extend(config.disabled_formats.iter().cloned());
        self
    }

    /// Sets where dispatch decisions are reported in verbose mode
    pub fn output(mut self, output: Output) -> Self {
        self.output = output;
        self
    }

    /// Validates all descriptors and freezes the registry
    pub fn build(self) -> Result<StoreRegistry, DescriptorError> {
        validate_all(self.stores.iter().map(|entry| &entry.info))?;

        let mut names: Vec<&'static str> = Vec::new();
        for format in &self.formats {
            let name = format.info.name;
            if name.is_empty() || name.contains(char::is_whitespace) {
                return Err(DescriptorError::InvalidFormatName(name));
            }
            if RESERVED_OPTIONS.contains(&name) {
                return Err(DescriptorError::ReservedFormatName(name));
            }
            if names.contains(&name) {
                return Err(DescriptorError::DuplicateFormat(name));
            }
            if self.stores.iter().any(|entry| entry.info.option == name) {
                return Err(DescriptorError::FormatClash(name));
            }
            names.push(name);
        }

        let by_type = self
            .stores
            .iter()
            .enumerate()
            .map(|(idx, entry)| (entry.type_id, idx))
            .collect();
        let by_key = self
            .stores
            .iter()
            .enumerate()
            .map(|(idx, entry)| (entry.info.key, idx))
            .collect();

        Ok(StoreRegistry {
            stores: self.stores,
            by_type,
            by_key,
            formats: self.formats,
            readers: self.readers,
            writers: self.writers,
            converters: self.converters,
            extra_extensions: self.extra_extensions,
            disabled_formats: self.disabled_formats,
            output: self.output,
        })
    }
}
