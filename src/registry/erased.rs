//! Type-erased registry entries
//!
//! The builder monomorphizes the generic hooks into plain `fn` pointers that
//! work on `dyn Any`. Downcasts only fail if a caller hands a value of the
//! wrong store type to a key-based lookup.

use std::any::{Any, TypeId};
use std::io::Write;
use std::path::Path;

use super::error::StoreError;
use crate::cli::CommandContext;
use crate::domain::{ConvertFrom, FormatInfo, FormatTag, ReadFormat, StoreInfo, StoreType, WriteFormat};

/// A store value with its type erased
pub type AnyStore = Box<dyn Any>;

pub(crate) fn downcast<T: StoreType>(value: &dyn Any) -> Result<&T, StoreError> {
    value
        .downcast_ref::<T>()
        .ok_or(StoreError::TypeMismatch {
            expected: T::INFO.key,
        })
}

/// Descriptor plus presentation hooks of one store type
#[derive(Clone, Copy)]
pub(crate) struct StoreEntry {
    pub info: StoreInfo,
    pub type_id: TypeId,
    pub describe: fn(&dyn Any) -> Result<String, StoreError>,
    pub print: fn(&dyn Any, &mut dyn Write) -> Result<(), StoreError>,
    pub print_statistics: fn(&dyn Any, &mut dyn Write) -> Result<(), StoreError>,
    pub log_statistics: fn(&dyn Any) -> Result<serde_json::Value, StoreError>,
}

impl StoreEntry {
    pub fn of<T: StoreType>() -> Self {
        Self {
            info: T::INFO,
            type_id: TypeId::of::<T>(),
            describe: describe::<T>,
            print: print::<T>,
            print_statistics: print_statistics::<T>,
            log_statistics: log_statistics::<T>,
        }
    }
}

#[derive(Clone, Copy)]
pub(crate) struct FormatEntry {
    pub info: FormatInfo,
    pub type_id: TypeId,
}

impl FormatEntry {
    pub fn of<F: FormatTag>() -> Self {
        Self {
            info: FormatInfo::of::<F>(),
            type_id: TypeId::of::<F>(),
        }
    }
}

#[derive(Clone, Copy)]
pub(crate) struct ReaderEntry {
    pub can_read: fn(&mut CommandContext) -> bool,
    pub read: fn(&Path, &CommandContext) -> anyhow::Result<AnyStore>,
}

impl ReaderEntry {
    pub fn of<T: ReadFormat<F>, F: FormatTag>() -> Self {
        Self {
            can_read: can_read::<T, F>,
            read: read::<T, F>,
        }
    }
}

#[derive(Clone, Copy)]
pub(crate) struct WriterEntry {
    pub can_write: fn(&mut CommandContext) -> bool,
    pub write: fn(&dyn Any, &Path, &CommandContext) -> Result<(), StoreError>,
}

impl WriterEntry {
    pub fn of<T: WriteFormat<F>, F: FormatTag>() -> Self {
        Self {
            can_write: can_write::<T, F>,
            write: write::<T, F>,
        }
    }
}

#[derive(Clone, Copy)]
pub(crate) struct ConverterEntry {
    pub source: &'static str,
    pub dest: &'static str,
    pub can_convert: fn() -> bool,
    pub convert: fn(&dyn Any) -> Result<AnyStore, StoreError>,
}

impl ConverterEntry {
    pub fn of<S: StoreType, D: ConvertFrom<S>>() -> Self {
        Self {
            source: S::INFO.key,
            dest: D::INFO.key,
            can_convert: <D as ConvertFrom<S>>::can_convert,
            convert: convert::<S, D>,
        }
    }
}

fn describe<T: StoreType>(value: &dyn Any) -> Result<String, StoreError> {
    Ok(downcast::<T>(value)?.describe())
}

fn print<T: StoreType>(value: &dyn Any, out: &mut dyn Write) -> Result<(), StoreError> {
    downcast::<T>(value)?
        .print(out)
        .map_err(anyhow::Error::from)?;
    Ok(())
}

fn print_statistics<T: StoreType>(value: &dyn Any, out: &mut dyn Write) -> Result<(), StoreError> {
    downcast::<T>(value)?
        .print_statistics(out)
        .map_err(anyhow::Error::from)?;
    Ok(())
}

fn log_statistics<T: StoreType>(value: &dyn Any) -> Result<serde_json::Value, StoreError> {
    Ok(downcast::<T>(value)?.log_statistics())
}

fn can_read<T: ReadFormat<F>, F: FormatTag>(cmd: &mut CommandContext) -> bool {
    <T as ReadFormat<F>>::can_read(cmd)
}

fn read<T: ReadFormat<F>, F: FormatTag>(path: &Path, cmd: &CommandContext) -> anyhow::Result<AnyStore> {
    let element = <T as ReadFormat<F>>::read(path, cmd)?;
    Ok(Box::new(element))
}

fn can_write<T: WriteFormat<F>, F: FormatTag>(cmd: &mut CommandContext) -> bool {
    <T as WriteFormat<F>>::can_write(cmd)
}

fn write<T: WriteFormat<F>, F: FormatTag>(
    value: &dyn Any,
    path: &Path,
    cmd: &CommandContext,
) -> Result<(), StoreError> {
    let element = downcast::<T>(value)?;
    <T as WriteFormat<F>>::write(element, path, cmd)?;
    Ok(())
}

fn convert<S: StoreType, D: ConvertFrom<S>>(value: &dyn Any) -> Result<AnyStore, StoreError> {
    let source = downcast::<S>(value)?;
    let dest = <D as ConvertFrom<S>>::convert_from(source)?;
    Ok(Box::new(dest))
}
