//! Tabular record decoding and encoding.
//!
//! This module converts between CSV files and typed records using a
//! configurable [`ColumnMapping`]. Decoding never aborts on a bad row;
//! rejected rows are returned alongside the good ones in a [`Decoded`].

mod decode;
mod encode;
mod mapping;

use serde::de::DeserializeOwned;

pub use decode::{Decoded, RowError, decode_records};
pub use encode::encode_records;
pub use mapping::{ColumnBinding, ColumnMapping};

/// A record type that can be read from and written to a mapped CSV file.
pub trait TabularRecord: DeserializeOwned {
    /// Dataset name used in configuration and diagnostics.
    const DATASET: &'static str;

    /// Every field of the record, by its mapped (camelCase) name.
    const FIELDS: &'static [&'static str];

    /// Renders one field as text, or `None` for an unknown field name.
    fn field_value(&self, field: &str) -> Option<String>;
}
