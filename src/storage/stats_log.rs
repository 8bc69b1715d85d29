//! JSONL statistics log
//!
//! Every `ps` run with logging enabled appends one line holding the
//! structured statistics of the inspected store value.
//! Uses file locking so concurrent shells do not interleave lines.

use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use fs2::FileExt;
use serde::{Deserialize, Serialize};

/// One logged statistics record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatisticsEntry {
    /// When the statistics were taken
    pub timestamp: DateTime<Utc>,

    /// Command that produced the record (e.g. `ps`)
    pub command: String,

    /// Store key of the inspected value
    pub store: String,

    /// Output of the store's `log_statistics` hook
    pub statistics: serde_json::Value,
}

/// Append-only statistics log in JSONL format
#[derive(Debug, Clone)]
pub struct StatisticsLog {
    path: PathBuf,
}

impl StatisticsLog {
    /// Creates a log writing to the given path
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the path to the log file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Appends one entry
    pub fn append(&self, entry: &StatisticsEntry) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .with_context(|| format!("Failed to open statistics log: {}", self.path.display()))?;

        file.lock_exclusive()
            .context("Failed to acquire write lock on statistics log")?;

        let line = serde_json::to_string(entry).context("Failed to serialize statistics")?;
        writeln!(file, "{}", line).context("Failed to write statistics")?;
        file.flush().context("Failed to flush statistics log")?;

        // Lock is released when file is dropped
        Ok(())
    }

    /// Reads all entries, oldest first
    pub fn read_all(&self) -> Result<Vec<StatisticsEntry>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let file = File::open(&self.path)
            .with_context(|| format!("Failed to open statistics log: {}", self.path.display()))?;

        file.lock_shared()
            .context("Failed to acquire read lock on statistics log")?;

        let reader = BufReader::new(&file);
        let mut entries = Vec::new();

        for (line_num, line) in reader.lines().enumerate() {
            let line = line.with_context(|| format!("Failed to read line {}", line_num + 1))?;

            if line.trim().is_empty() {
                continue;
            }

            let entry: StatisticsEntry = serde_json::from_str(&line)
                .with_context(|| format!("Failed to parse statistics at line {}", line_num + 1))?;

            entries.push(entry);
        }

        Ok(entries)
    }
}
