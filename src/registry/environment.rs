//! Environment of live store values
//!
//! One slot per store key. Each slot holds the values created or loaded so
//! far and remembers which one is current; commands act on the current one
//! unless told otherwise.

use std::any::Any;
use std::collections::HashMap;
use std::io::Write;
use std::path::Path;

use chrono::Utc;

use super::dispatch::StoreRegistry;
use super::erased::AnyStore;
use super::error::StoreError;
use crate::cli::{CommandContext, Output};
use crate::domain::StoreType;
use crate::storage::StatisticsEntry;

#[derive(Default)]
struct Slot {
    items: Vec<AnyStore>,
    current: usize,
}

/// Live values of every store type, indexed by store key
#[derive(Default)]
pub struct Environment {
    slots: HashMap<&'static str, Slot>,
}

impl Environment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a value and makes it current; returns its index
    pub fn push<T: StoreType>(&mut self, value: T) -> usize {
        self.push_any(T::INFO.key, Box::new(value))
    }

    /// Stores a type-erased value under `key` and makes it current
    pub fn push_any(&mut self, key: &'static str, value: AnyStore) -> usize {
        let slot = self.slots.entry(key).or_default();
        slot.items.push(value);
        slot.current = slot.items.len() - 1;
        slot.current
    }

    /// The current value for `key`
    pub fn current(&self, key: &str) -> Option<&dyn Any> {
        let slot = self.slots.get(key)?;
        slot.items.get(slot.current).map(|item| &**item)
    }

    /// The current value of store type `T`
    pub fn current_as<T: StoreType>(&self) -> Option<&T> {
        self.current(T::INFO.key)?.downcast_ref::<T>()
    }

    /// Index of the current value for `key`
    pub fn current_index(&self, key: &str) -> Option<usize> {
        self.slots
            .get(key)
            .filter(|slot| !slot.items.is_empty())
            .map(|slot| slot.current)
    }

    /// Makes the value at `index` current
    pub fn set_current(&mut self, key: &str, index: usize) -> Result<(), StoreError> {
        let slot = self
            .slots
            .get_mut(key)
            .filter(|slot| !slot.items.is_empty())
            .ok_or_else(|| StoreError::EmptyStore(key.to_string()))?;

        if index >= slot.items.len() {
            return Err(StoreError::IndexOutOfRange {
                key: key.to_string(),
                index,
                len: slot.items.len(),
            });
        }

        slot.current = index;
        Ok(())
    }

    /// All values stored under `key`, oldest first
    pub fn iter(&self, key: &str) -> impl Iterator<Item = &dyn Any> {
        self.slots
            .get(key)
            .into_iter()
            .flat_map(|slot| slot.items.iter().map(|item| &**item))
    }

    /// Number of values stored under `key`
    pub fn len(&self, key: &str) -> usize {
        self.slots.get(key).map(|slot| slot.items.len()).unwrap_or(0)
    }

    /// Returns true if nothing is stored under `key`
    pub fn is_empty(&self, key: &str) -> bool {
        self.len(key) == 0
    }

    /// Removes every value stored under `key`
    pub fn clear(&mut self, key: &str) {
        self.slots.remove(key);
    }

    fn require_current(&self, key: &str) -> Result<&dyn Any, StoreError> {
        self.current(key)
            .ok_or_else(|| StoreError::EmptyStore(key.to_string()))
    }
}

/// Environment-level operations, as the shell's commands use them
impl StoreRegistry {
    /// Synopsis lines for every value under `key`, marking the current one
    pub fn list(&self, env: &Environment, key: &str) -> Result<Vec<String>, StoreError> {
        let current = env.current_index(key);
        env.iter(key)
            .enumerate()
            .map(|(idx, value)| {
                let marker = if Some(idx) == current { "*" } else { " " };
                let synopsis = self.describe(key, value)?;
                Ok(format!("{}{:2}: {}", marker, idx, synopsis).trim_end().to_string())
            })
            .collect()
    }

    /// Synopsis of the current value under `key`
    pub fn describe_current(&self, env: &Environment, key: &str) -> Result<String, StoreError> {
        self.describe(key, env.require_current(key)?)
    }

    /// Prints the current value under `key`
    pub fn print_current(
        &self,
        env: &Environment,
        key: &str,
        out: &mut dyn Write,
    ) -> Result<(), StoreError> {
        self.print(key, env.require_current(key)?, out)
    }

    /// Prints statistics of the current value under `key`
    pub fn print_statistics_current(
        &self,
        env: &Environment,
        key: &str,
        out: &mut dyn Write,
    ) -> Result<(), StoreError> {
        self.print_statistics(key, env.require_current(key)?, out)
    }

    /// Structured statistics of the current value under `key`
    pub fn log_statistics_current(
        &self,
        env: &Environment,
        key: &str,
    ) -> Result<serde_json::Value, StoreError> {
        self.log_statistics(key, env.require_current(key)?)
    }

    /// Renders statistics of the current value through `output`
    ///
    /// Text output uses `print_statistics`, JSON output uses `log_statistics`.
    pub fn show_statistics(
        &self,
        env: &Environment,
        key: &str,
        output: &Output,
    ) -> Result<(), StoreError> {
        print!("{}", self.render_statistics(env, key, output)?);
        Ok(())
    }

    /// Statistics of the current value under `key`, as `show_statistics`
    /// prints them
    pub fn render_statistics(
        &self,
        env: &Environment,
        key: &str,
        output: &Output,
    ) -> Result<String, StoreError> {
        let mut text = Vec::new();
        self.print_statistics_current(env, key, &mut text)?;
        let record = self.log_statistics_current(env, key)?;
        Ok(output.render_statistics(key, &String::from_utf8_lossy(&text), &record))
    }

    /// Builds a statistics log entry for the current value under `key`
    pub fn statistics_entry(
        &self,
        env: &Environment,
        command: &str,
        key: &str,
    ) -> Result<StatisticsEntry, StoreError> {
        Ok(StatisticsEntry {
            timestamp: Utc::now(),
            command: command.to_string(),
            store: key.to_string(),
            statistics: self.log_statistics_current(env, key)?,
        })
    }

    /// Reads a value from `path` and makes it current under `key`
    pub fn read_into(
        &self,
        env: &mut Environment,
        key: &str,
        format: &str,
        path: &Path,
        cmd: &CommandContext,
    ) -> Result<usize, StoreError> {
        let value = self.read_key(key, format, path, cmd)?;
        let key = self.require_entry(key)?.info.key;
        Ok(env.push_any(key, value))
    }

    /// Writes the current value under `key` to `path`
    pub fn write_current(
        &self,
        env: &Environment,
        key: &str,
        format: &str,
        path: &Path,
        cmd: &CommandContext,
    ) -> Result<(), StoreError> {
        self.write_key(key, format, env.require_current(key)?, path, cmd)
    }

    /// Converts the current value under `from` and stores it under `to`
    pub fn convert_current(
        &self,
        env: &mut Environment,
        from: &str,
        to: &str,
    ) -> Result<usize, StoreError> {
        let value = self.convert_key(from, to, env.require_current(from)?)?;
        let key = self.require_entry(to)?.info.key;
        Ok(env.push_any(key, value))
    }
}
