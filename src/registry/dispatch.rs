//! Capability queries and gated actions
//!
//! Every capability comes as a pair: a query that answers whether the
//! operation is supported, and the action itself. The shell asks first and
//! acts only on a yes. An action for a pair that was never declared fails
//! with [`StoreError::Unimplemented`].
//!
//! Two call styles are offered:
//! - typed (`can_read::<Graph, Dot>`), for code that knows its types
//! - keyed (`can_read_key("graph", "dot")`), for the shell, which only has
//!   the names typed by the user

use std::any::{Any, TypeId};
use std::collections::{HashMap, HashSet};
use std::io::Write;
use std::path::Path;

use serde::Serialize;

use super::erased::{
    AnyStore, ConverterEntry, FormatEntry, ReaderEntry, StoreEntry, WriterEntry,
};
use super::error::{Operation, StoreError};
use crate::cli::{CommandContext, Output};
use crate::domain::{FormatInfo, FormatTag, StoreInfo, StoreType};

/// What a registry offers, as listed by the shell's `help stores`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Catalog<'a> {
    pub stores: Vec<&'a StoreInfo>,
    /// Enabled formats only
    pub formats: Vec<&'a FormatInfo>,
    /// Declared conversions as `(source, destination)` keys, sorted
    pub conversions: Vec<(&'static str, &'static str)>,
}

/// Immutable table of store types and their declared capabilities
///
/// Built once through [`RegistryBuilder`](super::RegistryBuilder); holds only
/// metadata and function pointers, so it can be shared freely.
pub struct StoreRegistry {
    pub(crate) stores: Vec<StoreEntry>,
    pub(crate) by_type: HashMap<TypeId, usize>,
    pub(crate) by_key: HashMap<&'static str, usize>,
    pub(crate) formats: Vec<FormatEntry>,
    pub(crate) readers: HashMap<(TypeId, TypeId), ReaderEntry>,
    pub(crate) writers: HashMap<(TypeId, TypeId), WriterEntry>,
    pub(crate) converters: HashMap<(TypeId, TypeId), ConverterEntry>,
    pub(crate) extra_extensions: HashMap<String, Vec<String>>,
    pub(crate) disabled_formats: HashSet<String>,
    pub(crate) output: Output,
}

impl StoreRegistry {
    // =========================================================================
    // Metadata
    // =========================================================================

    /// Descriptors of all registered store types, in registration order
    pub fn stores(&self) -> impl Iterator<Item = &StoreInfo> {
        self.stores.iter().map(|entry| &entry.info)
    }

    /// Looks up a store type by key
    pub fn store(&self, key: &str) -> Option<&StoreInfo> {
        self.entry(key).map(|entry| &entry.info)
    }

    /// Returns true if `T` is part of this registry
    pub fn is_registered<T: StoreType>(&self) -> bool {
        self.by_type.contains_key(&TypeId::of::<T>())
    }

    /// All registered formats, in registration order
    pub fn formats(&self) -> impl Iterator<Item = &FormatInfo> {
        self.formats.iter().map(|entry| &entry.info)
    }

    /// Looks up a format by name
    pub fn format(&self, name: &str) -> Option<&FormatInfo> {
        self.format_entry(name).map(|entry| &entry.info)
    }

    /// Extensions for a format, including ones added by configuration
    pub fn extensions(&self, format: &str) -> Vec<&str> {
        let mut extensions: Vec<&str> = self
            .format(format)
            .map(|info| info.extensions.to_vec())
            .unwrap_or_default();
        if let Some(extra) = self.extra_extensions.get(format) {
            extensions.extend(extra.iter().map(String::as_str));
        }
        extensions
    }

    /// Finds the enabled format whose extensions match the filename
    pub fn format_for_path(&self, path: &Path) -> Option<&FormatInfo> {
        let ext = path.extension()?.to_str()?;
        self.formats().find(|info| {
            !self.is_disabled(info.name)
                && self
                    .extensions(info.name)
                    .iter()
                    .any(|known| known.eq_ignore_ascii_case(ext))
        })
    }

    /// Listing of stores, enabled formats and conversions
    pub fn catalog(&self) -> Catalog<'_> {
        let mut conversions: Vec<_> = self
            .converters
            .values()
            .filter(|entry| (entry.can_convert)())
            .map(|entry| (entry.source, entry.dest))
            .collect();
        conversions.sort_unstable();

        Catalog {
            stores: self.stores().collect(),
            formats: self
                .formats()
                .filter(|info| !self.is_disabled(info.name))
                .collect(),
            conversions,
        }
    }

    /// Prints the [`catalog`](Self::catalog) through `output`
    pub fn show_catalog(&self, output: &Output) {
        output.data(&self.catalog());
    }

    /// Returns true if configuration switched this format off
    pub fn is_disabled(&self, format: &str) -> bool {
        self.disabled_formats.contains(format)
    }

    pub(crate) fn entry(&self, key: &str) -> Option<&StoreEntry> {
        self.by_key.get(key).map(|&idx| &self.stores[idx])
    }

    pub(crate) fn require_entry(&self, key: &str) -> Result<&StoreEntry, StoreError> {
        self.entry(key)
            .ok_or_else(|| StoreError::UnknownStore(key.to_string()))
    }

    fn format_entry(&self, name: &str) -> Option<&FormatEntry> {
        self.formats.iter().find(|entry| entry.info.name == name)
    }

    fn require_format(&self, name: &str) -> Result<&FormatEntry, StoreError> {
        self.format_entry(name)
            .ok_or_else(|| StoreError::UnknownFormat(name.to_string()))
    }

    fn reader(&self, store: TypeId, format: TypeId, name: &str) -> Option<&ReaderEntry> {
        if self.is_disabled(name) {
            return None;
        }
        self.readers.get(&(store, format))
    }

    fn writer(&self, store: TypeId, format: TypeId, name: &str) -> Option<&WriterEntry> {
        if self.is_disabled(name) {
            return None;
        }
        self.writers.get(&(store, format))
    }

    fn trace(&self, context: &str, message: &str) {
        self.output.verbose_ctx(context, message);
    }

    // =========================================================================
    // Presentation
    // =========================================================================

    /// One-line synopsis of a stored value
    pub fn describe(&self, key: &str, value: &dyn Any) -> Result<String, StoreError> {
        (self.require_entry(key)?.describe)(value)
    }

    /// Verbose rendering of a stored value
    pub fn print(&self, key: &str, value: &dyn Any, out: &mut dyn Write) -> Result<(), StoreError> {
        (self.require_entry(key)?.print)(value, out)
    }

    /// Human-readable statistics of a stored value
    pub fn print_statistics(
        &self,
        key: &str,
        value: &dyn Any,
        out: &mut dyn Write,
    ) -> Result<(), StoreError> {
        (self.require_entry(key)?.print_statistics)(value, out)
    }

    /// Structured statistics of a stored value
    pub fn log_statistics(&self, key: &str, value: &dyn Any) -> Result<serde_json::Value, StoreError> {
        (self.require_entry(key)?.log_statistics)(value)
    }

    // =========================================================================
    // Format I/O (typed)
    // =========================================================================

    /// Can `T` be read from format `F`?
    pub fn can_read<T: StoreType, F: FormatTag>(&self, cmd: &mut CommandContext) -> bool {
        let supported = self
            .reader(TypeId::of::<T>(), TypeId::of::<F>(), F::NAME)
            .map(|entry| (entry.can_read)(cmd))
            .unwrap_or(false);
        self.trace(
            "can_read",
            &format!("{} from {}: {}", T::INFO.key, F::NAME, supported),
        );
        supported
    }

    /// Reads a `T` from `path` in format `F`
    pub fn read<T: StoreType, F: FormatTag>(
        &self,
        path: &Path,
        cmd: &CommandContext,
    ) -> Result<T, StoreError> {
        let entry = self
            .reader(TypeId::of::<T>(), TypeId::of::<F>(), F::NAME)
            .ok_or(StoreError::Unimplemented {
                operation: Operation::Read,
                store: T::INFO.key,
                target: F::NAME,
            })?;
        self.trace("read", &format!("{} from {}", T::INFO.key, path.display()));
        let value = (entry.read)(path, cmd)?;
        value
            .downcast::<T>()
            .map(|element| *element)
            .map_err(|_| StoreError::TypeMismatch {
                expected: T::INFO.key,
            })
    }

    /// Can `T` be written to format `F`?
    pub fn can_write<T: StoreType, F: FormatTag>(&self, cmd: &mut CommandContext) -> bool {
        let supported = self
            .writer(TypeId::of::<T>(), TypeId::of::<F>(), F::NAME)
            .map(|entry| (entry.can_write)(cmd))
            .unwrap_or(false);
        self.trace(
            "can_write",
            &format!("{} to {}: {}", T::INFO.key, F::NAME, supported),
        );
        supported
    }

    /// Writes `element` to `path` in format `F`
    pub fn write<T: StoreType, F: FormatTag>(
        &self,
        element: &T,
        path: &Path,
        cmd: &CommandContext,
    ) -> Result<(), StoreError> {
        let entry = self
            .writer(TypeId::of::<T>(), TypeId::of::<F>(), F::NAME)
            .ok_or(StoreError::Unimplemented {
                operation: Operation::Write,
                store: T::INFO.key,
                target: F::NAME,
            })?;
        self.trace("write", &format!("{} to {}", T::INFO.key, path.display()));
        (entry.write)(element, path, cmd)
    }

    // =========================================================================
    // Format I/O (keyed)
    // =========================================================================

    /// Can the store with `key` be read from the format named `format`?
    ///
    /// Unknown keys and formats answer false.
    pub fn can_read_key(&self, key: &str, format: &str, cmd: &mut CommandContext) -> bool {
        let supported = match (self.entry(key), self.format_entry(format)) {
            (Some(store), Some(tag)) => self
                .reader(store.type_id, tag.type_id, tag.info.name)
                .map(|entry| (entry.can_read)(cmd))
                .unwrap_or(false),
            _ => false,
        };
        self.trace("can_read", &format!("{} from {}: {}", key, format, supported));
        supported
    }

    /// Reads a value of the store with `key` from `path`
    pub fn read_key(
        &self,
        key: &str,
        format: &str,
        path: &Path,
        cmd: &CommandContext,
    ) -> Result<AnyStore, StoreError> {
        let store = self.require_entry(key)?;
        let tag = self.require_format(format)?;
        let entry = self
            .reader(store.type_id, tag.type_id, tag.info.name)
            .ok_or(StoreError::Unimplemented {
                operation: Operation::Read,
                store: store.info.key,
                target: tag.info.name,
            })?;
        self.trace("read", &format!("{} from {}", key, path.display()));
        Ok((entry.read)(path, cmd)?)
    }

    /// Can the store with `key` be written to the format named `format`?
    pub fn can_write_key(&self, key: &str, format: &str, cmd: &mut CommandContext) -> bool {
        let supported = match (self.entry(key), self.format_entry(format)) {
            (Some(store), Some(tag)) => self
                .writer(store.type_id, tag.type_id, tag.info.name)
                .map(|entry| (entry.can_write)(cmd))
                .unwrap_or(false),
            _ => false,
        };
        self.trace("can_write", &format!("{} to {}: {}", key, format, supported));
        supported
    }

    /// Writes a value of the store with `key` to `path`
    pub fn write_key(
        &self,
        key: &str,
        format: &str,
        value: &dyn Any,
        path: &Path,
        cmd: &CommandContext,
    ) -> Result<(), StoreError> {
        let store = self.require_entry(key)?;
        let tag = self.require_format(format)?;
        let entry = self
            .writer(store.type_id, tag.type_id, tag.info.name)
            .ok_or(StoreError::Unimplemented {
                operation: Operation::Write,
                store: store.info.key,
                target: tag.info.name,
            })?;
        self.trace("write", &format!("{} to {}", key, path.display()));
        (entry.write)(value, path, cmd)
    }

    /// Formats the store with `key` can be read from
    ///
    /// Runs every `can_read` hook against `cmd`, so hooks get the chance to
    /// register their options (useful when generating help).
    pub fn readable_formats(&self, key: &str, cmd: &mut CommandContext) -> Vec<&FormatInfo> {
        self.formats
            .iter()
            .filter(|tag| self.can_read_key(key, tag.info.name, cmd))
            .map(|tag| &tag.info)
            .collect()
    }

    /// Formats the store with `key` can be written to
    pub fn writable_formats(&self, key: &str, cmd: &mut CommandContext) -> Vec<&FormatInfo> {
        self.formats
            .iter()
            .filter(|tag| self.can_write_key(key, tag.info.name, cmd))
            .map(|tag| &tag.info)
            .collect()
    }

    // =========================================================================
    // Conversion
    // =========================================================================

    /// Can a `S` be converted into a `D`?
    pub fn can_convert<S: StoreType, D: StoreType>(&self) -> bool {
        let supported = self
            .converters
            .get(&(TypeId::of::<S>(), TypeId::of::<D>()))
            .map(|entry| (entry.can_convert)())
            .unwrap_or(false);
        self.trace(
            "can_convert",
            &format!("{} -> {}: {}", S::INFO.key, D::INFO.key, supported),
        );
        supported
    }

    /// Converts `element` into a `D`
    pub fn convert<S: StoreType, D: StoreType>(&self, element: &S) -> Result<D, StoreError> {
        let entry = self
            .converters
            .get(&(TypeId::of::<S>(), TypeId::of::<D>()))
            .ok_or(StoreError::Unimplemented {
                operation: Operation::Convert,
                store: S::INFO.key,
                target: D::INFO.key,
            })?;
        self.trace("convert", &format!("{} -> {}", S::INFO.key, D::INFO.key));
        let value = (entry.convert)(element)?;
        value
            .downcast::<D>()
            .map(|dest| *dest)
            .map_err(|_| StoreError::TypeMismatch {
                expected: D::INFO.key,
            })
    }

    /// Keyed form of [`can_convert`](Self::can_convert)
    pub fn can_convert_key(&self, from: &str, to: &str) -> bool {
        let supported = self
            .converter(from, to)
            .map(|entry| (entry.can_convert)())
            .unwrap_or(false);
        self.trace("can_convert", &format!("{} -> {}: {}", from, to, supported));
        supported
    }

    /// Keyed form of [`convert`](Self::convert)
    pub fn convert_key(&self, from: &str, to: &str, value: &dyn Any) -> Result<AnyStore, StoreError> {
        let source = self.require_entry(from)?;
        let dest = self.require_entry(to)?;
        let entry = self
            .converter(from, to)
            .ok_or(StoreError::Unimplemented {
                operation: Operation::Convert,
                store: source.info.key,
                target: dest.info.key,
            })?;
        self.trace("convert", &format!("{} -> {}", from, to));
        (entry.convert)(value)
    }

    /// Store keys `from` has a declared single-hop conversion into
    pub fn conversions_from(&self, from: &str) -> Vec<&'static str> {
        let mut targets: Vec<&'static str> = self
            .converters
            .values()
            .filter(|entry| entry.source == from && (entry.can_convert)())
            .map(|entry| entry.dest)
            .collect();
        targets.sort_unstable();
        targets
    }

    /// Runs a multi-hop conversion along `path` (a list of store keys)
    ///
    /// Each hop must be a declared conversion; see
    /// [`ConversionGraph::path`](super::ConversionGraph::path) for finding one.
    pub fn convert_path(&self, path: &[&str], value: &dyn Any) -> Result<AnyStore, StoreError> {
        let mut hops = path.windows(2);
        let first = hops
            .next()
            .ok_or_else(|| StoreError::InvalidPath(path.join(" -> ")))?;

        let mut current = self.convert_key(first[0], first[1], value)?;
        for hop in hops {
            current = self.convert_key(hop[0], hop[1], &*current)?;
        }
        Ok(current)
    }

    pub(crate) fn converter(&self, from: &str, to: &str) -> Option<&ConverterEntry> {
        let source = self.entry(from)?;
        let dest = self.entry(to)?;
        self.converters.get(&(source.type_id, dest.type_id))
    }
}
