//! Leave Reconciler
//!
//! This crate periodically reconciles pending employee leave requests
//! (`Leaves.csv`) against a leave balance ledger (`EmployeeData.csv`),
//! approving requests that fit within the available balance and writing the
//! updated ledger back to disk.

#![warn(missing_docs)]

pub mod codec;
pub mod config;
pub mod cycle;
pub mod error;
pub mod models;
pub mod reconcile;
pub mod service;
pub mod store;
