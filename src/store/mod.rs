//! Dataset loading and writing.
//!
//! [`LeaveStore`] owns the upload directory and the two fixed files inside
//! it. Reads go through the soft-fail decoder; writes replace the target
//! file atomically via a temporary file in the same directory.

use std::fs::{self, File};
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::codec::{ColumnMapping, Decoded, TabularRecord, decode_records, encode_records};
use crate::config::ConfigLoader;
use crate::error::{LeaveError, LeaveResult};
use crate::models::{LeaveBalance, LeaveRequest};

/// File name of the balance ledger.
pub const BALANCE_FILE: &str = "EmployeeData.csv";

/// File name of the pending request dataset.
pub const REQUEST_FILE: &str = "Leaves.csv";

/// Access to the balance ledger and request file in one directory.
#[derive(Debug, Clone)]
pub struct LeaveStore {
    root: PathBuf,
    balance_mapping: ColumnMapping,
    request_mapping: ColumnMapping,
}

impl LeaveStore {
    /// Creates a store over `root` with the given dataset mappings.
    pub fn new(
        root: impl Into<PathBuf>,
        balance_mapping: ColumnMapping,
        request_mapping: ColumnMapping,
    ) -> Self {
        Self {
            root: root.into(),
            balance_mapping,
            request_mapping,
        }
    }

    /// Creates a store from a loaded configuration.
    pub fn from_config(config: &ConfigLoader) -> Self {
        Self::new(
            config.upload_path(),
            config.balance_mapping().clone(),
            config.request_mapping().clone(),
        )
    }

    /// The upload directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Full path of the balance ledger.
    pub fn balance_path(&self) -> PathBuf {
        self.root.join(BALANCE_FILE)
    }

    /// Full path of the request file.
    pub fn request_path(&self) -> PathBuf {
        self.root.join(REQUEST_FILE)
    }

    /// Creates the upload directory if it does not exist.
    pub fn ensure_directory(&self) -> LeaveResult<()> {
        fs::create_dir_all(&self.root).map_err(|e| LeaveError::DirectoryUnavailable {
            path: self.root.display().to_string(),
            message: e.to_string(),
        })
    }

    /// Returns true if the balance ledger exists.
    pub fn has_balance_file(&self) -> bool {
        self.balance_path().is_file()
    }

    /// Returns true if there is something to process: the directory exists,
    /// is not empty, and contains the request file.
    pub fn has_pending_requests(&self) -> bool {
        let non_empty = fs::read_dir(&self.root)
            .map(|mut entries| entries.next().is_some())
            .unwrap_or(false);
        non_empty && self.request_path().is_file()
    }

    /// Loads the balance ledger.
    ///
    /// # Errors
    ///
    /// [`LeaveError::BalanceFileMissing`] if the ledger does not exist,
    /// [`LeaveError::DatasetOpen`] or [`LeaveError::DatasetRead`] on I/O
    /// failure. Malformed rows are reported in [`Decoded::errors`].
    pub fn load_balances(&self) -> LeaveResult<Decoded<LeaveBalance>> {
        let path = self.balance_path();
        let file = File::open(&path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => LeaveError::BalanceFileMissing {
                path: path.display().to_string(),
            },
            _ => LeaveError::DatasetOpen {
                path: path.display().to_string(),
                message: e.to_string(),
            },
        })?;

        let decoded = read_dataset(&path, file, &self.balance_mapping)?;
        debug!(
            path = %path.display(),
            records = decoded.records.len(),
            rejected = decoded.errors.len(),
            "Loaded leave balances"
        );
        Ok(decoded)
    }

    /// Loads pending leave requests.
    ///
    /// Returns `Ok(None)` when there is nothing to do: the directory is
    /// missing or empty, or the request file is absent.
    pub fn load_requests(&self) -> LeaveResult<Option<Decoded<LeaveRequest>>> {
        if !self.has_pending_requests() {
            info!(
                path = %self.root.display(),
                "{} should be present in the leave directory",
                REQUEST_FILE
            );
            return Ok(None);
        }

        let path = self.request_path();
        let file = File::open(&path).map_err(|e| LeaveError::DatasetOpen {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

        let decoded = read_dataset(&path, file, &self.request_mapping)?;
        debug!(
            path = %path.display(),
            records = decoded.records.len(),
            rejected = decoded.errors.len(),
            "Loaded leave requests"
        );
        Ok(Some(decoded))
    }

    /// Replaces the balance ledger with `balances`, header first, in the
    /// given order.
    pub fn write_balances(&self, balances: &[LeaveBalance]) -> LeaveResult<()> {
        write_dataset(&self.balance_path(), &self.balance_mapping, balances)
    }

    /// Truncates the request file to its header line.
    pub fn clear_requests(&self) -> LeaveResult<()> {
        write_dataset::<LeaveRequest>(&self.request_path(), &self.request_mapping, &[])
    }
}

fn read_dataset<T: TabularRecord>(
    path: &Path,
    file: File,
    mapping: &ColumnMapping,
) -> LeaveResult<Decoded<T>> {
    decode_records(BufReader::new(file), mapping).map_err(|e| LeaveError::DatasetRead {
        path: path.display().to_string(),
        message: e.to_string(),
    })
}

/// Writes the dataset to a temporary file next to `path` and renames it
/// into place, so readers see either the old or the new file.
fn write_dataset<T: TabularRecord>(
    path: &Path,
    mapping: &ColumnMapping,
    records: &[T],
) -> LeaveResult<()> {
    let write_error = |message: String| LeaveError::DatasetWrite {
        path: path.display().to_string(),
        message,
    };

    let parent = path.parent().unwrap_or_else(|| Path::new("."));
    let mut temp_file = tempfile::NamedTempFile::new_in(parent)
        .map_err(|e| write_error(format!("failed to create temp file: {}", e)))?;

    encode_records(temp_file.as_file_mut(), mapping, records)
        .map_err(|e| write_error(e.to_string()))?;

    temp_file
        .as_file()
        .sync_all()
        .map_err(|e| write_error(e.to_string()))?;

    // A fresh temp file is 0600; keep the mode of the file being replaced.
    if let Ok(metadata) = fs::metadata(path) {
        temp_file
            .as_file()
            .set_permissions(metadata.permissions())
            .map_err(|e| write_error(e.to_string()))?;
    }

    temp_file
        .persist(path)
        .map_err(|e| write_error(format!("failed to persist temp file: {}", e.error)))?;

    Ok(())
}
