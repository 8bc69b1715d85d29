//! Output formatting for shell commands

use serde::{Deserialize, Serialize};

/// Output format
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Output helper for consistent formatting
#[derive(Debug, Clone, Copy, Default)]
pub struct Output {
    format: OutputFormat,
    verbose: bool,
}

impl Output {
    pub fn new(format: OutputFormat, verbose: bool) -> Self {
        Self { format, verbose }
    }

    /// Prints structured data
    pub fn data<T: Serialize>(&self, data: &T) {
        if let Some(rendered) = self.render_data(data) {
            println!("{}", rendered);
        }
    }

    /// Renders structured data: pretty JSON for text, compact JSON otherwise
    pub fn render_data<T: Serialize>(&self, data: &T) -> Option<String> {
        let rendered = match self.format {
            OutputFormat::Text => serde_json::to_string_pretty(data),
            OutputFormat::Json => serde_json::to_string(data),
        };
        rendered.ok()
    }

    /// Prints store statistics: the text rendering, or the structured record
    pub fn statistics(&self, store: &str, text: &str, record: &serde_json::Value) {
        print!("{}", self.render_statistics(store, text, record));
    }

    /// Renders store statistics as [`statistics`](Self::statistics) prints them
    pub fn render_statistics(&self, store: &str, text: &str, record: &serde_json::Value) -> String {
        match self.format {
            OutputFormat::Text => text.to_string(),
            OutputFormat::Json => format!(
                "{}\n",
                serde_json::json!({
                    "store": store,
                    "statistics": record
                })
            ),
        }
    }

    /// Returns the configured format
    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Returns true if using JSON format
    pub fn is_json(&self) -> bool {
        self.format == OutputFormat::Json
    }

    /// Returns true if verbose mode is enabled
    pub fn is_verbose(&self) -> bool {
        self.verbose
    }

    /// Prints a verbose debug message with context (only when --verbose is set)
    pub fn verbose_ctx(&self, context: &str, message: &str) {
        if self.verbose {
            eprintln!("[verbose:{}] {}", context, message);
        }
    }
}
