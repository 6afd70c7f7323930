//! Header to field column mappings.

use std::collections::HashSet;

use csv::StringRecord;

use crate::error::{LeaveError, LeaveResult};

use super::TabularRecord;

/// One configured column: the header as it appears in the file and the
/// record field it feeds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnBinding {
    /// Column name in the CSV header row.
    pub header: String,
    /// Record field name (camelCase).
    pub field: String,
}

/// An ordered, positionally paired list of CSV headers and record fields.
///
/// Header lookups are case-insensitive and ignore surrounding whitespace.
///
/// # Example
///
/// ```
/// use leave_reconciler::codec::ColumnMapping;
///
/// let mapping = ColumnMapping::parse(
///     "employee_leave_request",
///     "EmployeeId, AppliedLeaves",
///     "employeeId,appliedLeaves",
/// )
/// .unwrap();
///
/// assert_eq!(mapping.len(), 2);
/// assert_eq!(mapping.field_for_header("appliedleaves"), Some("appliedLeaves"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnMapping {
    columns: Vec<ColumnBinding>,
}

impl ColumnMapping {
    /// Parses comma-separated header and field lists into a mapping.
    ///
    /// Entries are trimmed and empty entries are dropped. Fails if the lists
    /// differ in length, are empty, or contain duplicates.
    pub fn parse(dataset: &str, headers: &str, fields: &str) -> LeaveResult<Self> {
        let headers = split_list(headers);
        let fields = split_list(fields);

        let invalid = |message: String| LeaveError::InvalidMapping {
            dataset: dataset.to_string(),
            message,
        };

        if headers.is_empty() {
            return Err(invalid("no columns configured".to_string()));
        }

        if headers.len() != fields.len() {
            return Err(invalid(format!(
                "{} headers but {} fields",
                headers.len(),
                fields.len()
            )));
        }

        let mut seen_headers = HashSet::new();
        for header in &headers {
            if !seen_headers.insert(header.to_lowercase()) {
                return Err(invalid(format!("duplicate header '{}'", header)));
            }
        }

        let mut seen_fields = HashSet::new();
        for field in &fields {
            if !seen_fields.insert(field.as_str()) {
                return Err(invalid(format!("duplicate field '{}'", field)));
            }
        }

        let columns = headers
            .into_iter()
            .zip(fields)
            .map(|(header, field)| ColumnBinding { header, field })
            .collect();

        Ok(Self { columns })
    }

    /// Parses a mapping and checks it covers exactly the fields of `T`.
    pub fn for_record<T: TabularRecord>(headers: &str, fields: &str) -> LeaveResult<Self> {
        let mapping = Self::parse(T::DATASET, headers, fields)?;

        for binding in &mapping.columns {
            if !T::FIELDS.contains(&binding.field.as_str()) {
                return Err(LeaveError::InvalidMapping {
                    dataset: T::DATASET.to_string(),
                    message: format!(
                        "unknown field '{}', expected one of {}",
                        binding.field,
                        T::FIELDS.join(", ")
                    ),
                });
            }
        }

        if let Some(missing) = T::FIELDS
            .iter()
            .find(|field| !mapping.fields().any(|mapped| mapped == **field))
        {
            return Err(LeaveError::InvalidMapping {
                dataset: T::DATASET.to_string(),
                message: format!("field '{}' is not mapped to any header", missing),
            });
        }

        Ok(mapping)
    }

    /// Number of columns.
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Returns true if no columns are configured.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// The configured columns in order.
    pub fn columns(&self) -> &[ColumnBinding] {
        &self.columns
    }

    /// Header names in column order.
    pub fn headers(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|binding| binding.header.as_str())
    }

    /// Field names in column order.
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|binding| binding.field.as_str())
    }

    /// Looks up the field bound to a header.
    pub fn field_for_header(&self, header: &str) -> Option<&str> {
        let header = header.trim();
        self.columns
            .iter()
            .find(|binding| binding.header.eq_ignore_ascii_case(header))
            .map(|binding| binding.field.as_str())
    }

    /// Rewrites a raw header row into field names.
    ///
    /// Unmapped columns keep their original name and are ignored by
    /// deserialization.
    pub(crate) fn translate(&self, raw: &StringRecord) -> StringRecord {
        raw.iter()
            .map(|header| self.field_for_header(header).unwrap_or(header))
            .collect()
    }
}

fn split_list(list: &str) -> Vec<String> {
    list.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(str::to_string)
        .collect()
}
