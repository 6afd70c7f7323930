//! Soft-fail CSV decoding.

use std::fmt;
use std::io;

use csv::StringRecord;
use tracing::info;

use super::{ColumnMapping, TabularRecord};

/// A data row that could not be converted into a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowError {
    /// 1-based line number in the source (the header is line 1).
    pub line: u64,
    /// The raw row as read, fields joined with `", "`.
    pub record: String,
    /// Why the row was rejected.
    pub message: String,
}

impl RowError {
    fn new(line: u64, record: &StringRecord, message: impl fmt::Display) -> Self {
        Self {
            line,
            record: record.iter().collect::<Vec<_>>().join(", "),
            message: message.to_string(),
        }
    }
}

impl fmt::Display for RowError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: [{}] {}", self.line, self.record, self.message)
    }
}

/// The result of decoding a tabular source: the rows that converted and the
/// rows that did not.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decoded<T> {
    /// Successfully decoded records, in source order.
    pub records: Vec<T>,
    /// Rejected rows, in source order.
    pub errors: Vec<RowError>,
}

impl<T> Default for Decoded<T> {
    fn default() -> Self {
        Self {
            records: Vec::new(),
            errors: Vec::new(),
        }
    }
}

impl<T> Decoded<T> {
    /// Returns true if any row was rejected.
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Logs every rejected row at info level.
    pub fn log_row_errors(&self, dataset: &str) {
        if self.errors.is_empty() {
            return;
        }
        info!(
            dataset,
            rejected = self.errors.len(),
            "Error records found while decoding dataset"
        );
        for error in &self.errors {
            info!(dataset, line = error.line, "{}", error);
        }
    }

    /// Source line numbers of the rejected rows.
    pub fn rejected_lines(&self) -> Vec<u64> {
        self.errors.iter().map(|error| error.line).collect()
    }

    /// Splits into records and errors.
    pub fn into_parts(self) -> (Vec<T>, Vec<RowError>) {
        (self.records, self.errors)
    }
}

/// Decodes CSV rows from `source` into records of type `T`.
///
/// The first row is the header; each header is translated through
/// `mapping` into a field name of `T`. Rows that fail to convert (wrong
/// field count, non-numeric value, missing column) are collected into
/// [`Decoded::errors`] and decoding continues with the next row.
///
/// Only I/O failures of `source` or an unreadable header row are returned
/// as errors.
///
/// # Example
///
/// ```
/// use leave_reconciler::codec::{ColumnMapping, decode_records};
/// use leave_reconciler::models::LeaveRequest;
///
/// let mapping = ColumnMapping::parse(
///     "employee_leave_request",
///     "EmployeeId,AppliedLeaves",
///     "employeeId,appliedLeaves",
/// )
/// .unwrap();
/// let data = "EmployeeId,AppliedLeaves\n1,5\n2,many\n";
///
/// let decoded = decode_records::<LeaveRequest, _>(data.as_bytes(), &mapping).unwrap();
/// assert_eq!(decoded.records, vec![LeaveRequest::new(1, 5)]);
/// assert_eq!(decoded.errors.len(), 1);
/// assert_eq!(decoded.errors[0].line, 3);
/// ```
pub fn decode_records<T, R>(source: R, mapping: &ColumnMapping) -> csv::Result<Decoded<T>>
where
    T: TabularRecord,
    R: io::Read,
{
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .quote(b'"')
        .trim(csv::Trim::All)
        .from_reader(source);

    let raw_headers = reader.headers()?.clone();
    let mut decoded = Decoded::default();
    if raw_headers.is_empty() {
        return Ok(decoded);
    }
    let headers = mapping.translate(&raw_headers);

    let mut record = StringRecord::new();
    loop {
        match reader.read_record(&mut record) {
            Ok(false) => break,
            Ok(true) => {
                let line = record.position().map_or(0, |pos| pos.line());
                match record.deserialize::<T>(Some(&headers)) {
                    Ok(value) => decoded.records.push(value),
                    Err(err) => decoded.errors.push(RowError::new(line, &record, err)),
                }
            }
            Err(err) => {
                if matches!(err.kind(), csv::ErrorKind::Io(_)) {
                    return Err(err);
                }
                let line = err.position().map_or(0, |pos| pos.line());
                decoded.errors.push(RowError::new(line, &record, err));
            }
        }
    }

    Ok(decoded)
}
