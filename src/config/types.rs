//! Configuration types for the leave reconciler.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from the YAML configuration file.

use std::path::PathBuf;

use serde::Deserialize;

/// Default period between reconciliation cycles.
pub const DEFAULT_INTERVAL_MS: u64 = 6000;

fn default_interval_ms() -> u64 {
    DEFAULT_INTERVAL_MS
}

/// Header and field lists for one CSV dataset.
///
/// Both lists are comma-separated and paired positionally.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DatasetConfig {
    /// Column names as they appear in the file header.
    pub csv_headers: String,
    /// Record field names, one per header.
    pub field_mapping: String,
}

/// Scheduling settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ScheduleConfig {
    /// Fixed period between cycle starts, in milliseconds.
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            interval_ms: DEFAULT_INTERVAL_MS,
        }
    }
}

/// The complete service configuration file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ServiceConfig {
    /// Directory holding `EmployeeData.csv` and `Leaves.csv`.
    pub upload_path: PathBuf,
    /// Cycle scheduling.
    #[serde(default)]
    pub schedule: ScheduleConfig,
    /// Mapping for the balance ledger.
    pub employee_leave_data: DatasetConfig,
    /// Mapping for the request file.
    pub employee_leave_request: DatasetConfig,
}
