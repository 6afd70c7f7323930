//! Error types for the Leave Reconciler.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for every failure that can occur while configuring the service, reading
//! the leave datasets, or writing them back.

use thiserror::Error;

/// The main error type for the Leave Reconciler.
///
/// Row-level decode failures are not represented here; they are collected
/// as [`RowError`](crate::codec::RowError) values and never abort a load.
///
/// # Example
///
/// ```
/// use leave_reconciler::error::LeaveError;
///
/// let error = LeaveError::BalanceFileMissing {
///     path: "/data/EmployeeData.csv".to_string(),
/// };
/// assert_eq!(
///     error.to_string(),
///     "Employee leave balance file not found: /data/EmployeeData.csv"
/// );
/// ```
#[derive(Debug, Error)]
pub enum LeaveError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed or failed validation.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// A header/field mapping is inconsistent.
    #[error("Invalid column mapping for {dataset}: {message}")]
    InvalidMapping {
        /// The dataset the mapping belongs to.
        dataset: String,
        /// A description of what is wrong with the mapping.
        message: String,
    },

    /// The upload directory could not be created or inspected.
    #[error("Upload directory unavailable '{path}': {message}")]
    DirectoryUnavailable {
        /// The upload directory.
        path: String,
        /// The underlying I/O error.
        message: String,
    },

    /// The balance ledger does not exist.
    #[error("Employee leave balance file not found: {path}")]
    BalanceFileMissing {
        /// The expected location of the ledger.
        path: String,
    },

    /// A dataset file could not be opened for reading.
    #[error("Failed to open dataset '{path}': {message}")]
    DatasetOpen {
        /// The dataset file.
        path: String,
        /// The underlying I/O error.
        message: String,
    },

    /// A dataset file failed while being read.
    #[error("Failed to read dataset '{path}': {message}")]
    DatasetRead {
        /// The dataset file.
        path: String,
        /// The underlying read error.
        message: String,
    },

    /// A dataset file could not be written.
    #[error("Failed to write dataset '{path}': {message}")]
    DatasetWrite {
        /// The dataset file.
        path: String,
        /// The underlying write error.
        message: String,
    },
}

/// A type alias for Results that return LeaveError.
pub type LeaveResult<T> = Result<T, LeaveError>;
