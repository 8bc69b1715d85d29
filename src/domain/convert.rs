//! Conversion capability between store types
//!
//! Conversions are in-memory and directional: implementing
//! `ConvertFrom<A> for B` says nothing about `B -> A`, and converting a type
//! into itself is only possible when declared like any other pair.

use super::store::StoreType;

/// Builds a value of `Self` from a value of store type `S`
pub trait ConvertFrom<S: StoreType>: StoreType {
    /// Whether the conversion exists in principle
    ///
    /// A property of the two types alone. Answers true once the pair is
    /// registered unless overridden.
    fn can_convert() -> bool {
        true
    }

    /// Converts a value; only called after `can_convert` answered true
    fn convert_from(source: &S) -> anyhow::Result<Self>;
}
