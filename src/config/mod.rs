//! Configuration loading for the Leave Reconciler.
//!
//! This module loads the service configuration from a YAML file: the upload
//! directory, the cycle interval, and the header/field mappings of the two
//! CSV datasets.
//!
//! # Example
//!
//! ```no_run
//! use leave_reconciler::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config/leave-reconciler.yaml").unwrap();
//! println!("Cycle interval: {:?}", config.interval());
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{DEFAULT_INTERVAL_MS, DatasetConfig, ScheduleConfig, ServiceConfig};
