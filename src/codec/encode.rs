//! CSV encoding of record collections.

use std::io;

use super::{ColumnMapping, TabularRecord};

/// Writes the mapping's header row followed by one row per record.
///
/// Each row emits the record's fields in the mapping's column order, so a
/// file written here decodes back through the same mapping.
pub fn encode_records<T, W>(sink: W, mapping: &ColumnMapping, records: &[T]) -> csv::Result<()>
where
    T: TabularRecord,
    W: io::Write,
{
    let mut writer = csv::WriterBuilder::new().quote(b'"').from_writer(sink);

    writer.write_record(mapping.headers())?;
    for record in records {
        writer.write_record(
            mapping
                .fields()
                .map(|field| record.field_value(field).unwrap_or_default()),
        )?;
    }
    writer.flush()?;

    Ok(())
}
