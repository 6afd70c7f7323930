//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading the service
//! configuration from a YAML file and validating its column mappings.

use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::codec::ColumnMapping;
use crate::error::{LeaveError, LeaveResult};
use crate::models::{LeaveBalance, LeaveRequest};

use super::types::ServiceConfig;

/// Loads and validates the service configuration.
///
/// Validation happens once, at load time: both datasets must have a header
/// list and a field list of equal length that together cover every field of
/// the record type.
///
/// # Example
///
/// ```no_run
/// use leave_reconciler::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config/leave-reconciler.yaml")?;
/// println!("Watching {}", loader.upload_path().display());
/// # Ok::<(), leave_reconciler::error::LeaveError>(())
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config: ServiceConfig,
    balance_mapping: ColumnMapping,
    request_mapping: ColumnMapping,
}

impl ConfigLoader {
    /// Loads configuration from the YAML file at `path`.
    ///
    /// # Errors
    ///
    /// - [`LeaveError::ConfigNotFound`] if the file cannot be read
    /// - [`LeaveError::ConfigParseError`] if it is not valid YAML, misses a
    ///   required key, or has a zero interval or empty upload path
    /// - [`LeaveError::InvalidMapping`] if a column mapping is inconsistent
    pub fn load<P: AsRef<Path>>(path: P) -> LeaveResult<Self> {
        let path = path.as_ref();
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| LeaveError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        Self::from_yaml_str(&content, &path_str)
    }

    /// Parses configuration from YAML text. `origin` names the source in
    /// error messages.
    pub fn from_yaml_str(content: &str, origin: &str) -> LeaveResult<Self> {
        let config: ServiceConfig =
            serde_yaml::from_str(content).map_err(|e| LeaveError::ConfigParseError {
                path: origin.to_string(),
                message: e.to_string(),
            })?;

        Self::from_config(config, origin)
    }

    /// Validates an already deserialized configuration.
    pub fn from_config(config: ServiceConfig, origin: &str) -> LeaveResult<Self> {
        if config.upload_path.as_os_str().is_empty() {
            return Err(LeaveError::ConfigParseError {
                path: origin.to_string(),
                message: "upload_path must not be empty".to_string(),
            });
        }

        if config.schedule.interval_ms == 0 {
            return Err(LeaveError::ConfigParseError {
                path: origin.to_string(),
                message: "schedule.interval_ms must be greater than zero".to_string(),
            });
        }

        let balance_mapping = ColumnMapping::for_record::<LeaveBalance>(
            &config.employee_leave_data.csv_headers,
            &config.employee_leave_data.field_mapping,
        )?;
        let request_mapping = ColumnMapping::for_record::<LeaveRequest>(
            &config.employee_leave_request.csv_headers,
            &config.employee_leave_request.field_mapping,
        )?;

        Ok(Self {
            config,
            balance_mapping,
            request_mapping,
        })
    }

    /// Returns the underlying configuration.
    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    /// Directory holding the datasets.
    pub fn upload_path(&self) -> &Path {
        &self.config.upload_path
    }

    /// Period between cycles.
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.config.schedule.interval_ms)
    }

    /// Column mapping for `EmployeeData.csv`.
    pub fn balance_mapping(&self) -> &ColumnMapping {
        &self.balance_mapping
    }

    /// Column mapping for `Leaves.csv`.
    pub fn request_mapping(&self) -> &ColumnMapping {
        &self.request_mapping
    }
}
