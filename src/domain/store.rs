//! Store type trait
//!
//! A store type is any value the shell keeps in its environment. The
//! descriptor is mandatory; the presentation hooks default to empty output.

use std::any::Any;
use std::io::{self, Write};

use super::info::StoreInfo;

/// A data type managed by the shell
///
/// ```
/// use stowage::{StoreInfo, StoreType};
///
/// struct Graph {
///     nodes: usize,
/// }
///
/// impl StoreType for Graph {
///     const INFO: StoreInfo = StoreInfo::new("graph", "graph", 'g', "graph", "graphs");
///
///     fn describe(&self) -> String {
///         format!("{} nodes", self.nodes)
///     }
/// }
///
/// assert_eq!(Graph { nodes: 3 }.describe(), "3 nodes");
/// ```
pub trait StoreType: Any + Sized {
    /// Identifying metadata
    const INFO: StoreInfo;

    /// One-line synopsis shown in store listings
    fn describe(&self) -> String {
        String::new()
    }

    /// Verbose rendering, used by `print`
    fn print(&self, out: &mut dyn Write) -> io::Result<()> {
        writeln!(out)
    }

    /// Human-readable statistics, used by `ps`
    fn print_statistics(&self, out: &mut dyn Write) -> io::Result<()> {
        writeln!(out)
    }

    /// Machine-readable statistics, used by `ps` when logging is enabled
    fn log_statistics(&self) -> serde_json::Value {
        serde_json::json!({})
    }
}

/// Implements [`StoreType`] from a descriptor
///
/// Presentation overrides can follow the descriptor inside braces:
///
/// ```
/// struct Table(Vec<bool>);
///
/// stowage::store_type!(Table, "table", "table", 't', "truth table", "truth tables", {
///     fn describe(&self) -> String {
///         format!("{} bits", self.0.len())
///     }
/// });
///
/// use stowage::StoreType;
/// assert_eq!(Table(vec![true, false]).describe(), "2 bits");
/// assert_eq!(Table::INFO.name_plural, "truth tables");
/// ```
#[macro_export]
macro_rules! store_type {
    ($ty:ty, $key:expr, $option:expr, $mnemonic:expr, $name:expr, $plural:expr $(, { $($body:tt)* })? $(,)?) => {
        impl $crate::StoreType for $ty {
            const INFO: $crate::StoreInfo =
                $crate::StoreInfo::new($key, $option, $mnemonic, $name, $plural);

            $($($body)*)?
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Bare;

    impl StoreType for Bare {
        const INFO: StoreInfo = StoreInfo::new("bare", "bare", 'b', "bare", "bares");
    }

    #[test]
    fn describe_defaults_to_empty() {
        assert_eq!(Bare.describe(), "");
    }

    #[test]
    fn print_defaults_to_newline() {
        let mut out = Vec::new();
        Bare.print(&mut out).unwrap();
        assert_eq!(out, b"\n");

        let mut out = Vec::new();
        Bare.print_statistics(&mut out).unwrap();
        assert_eq!(out, b"\n");
    }

    #[test]
    fn log_statistics_defaults_to_empty_object() {
        let stats = Bare.log_statistics();
        assert!(stats.as_object().unwrap().is_empty());
    }
}
