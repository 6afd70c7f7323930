//! Core data models for the Leave Reconciler.
//!
//! This module contains the ledger and request records read from disk and
//! the outcome types produced by reconciliation.

mod leave_balance;
mod leave_request;
mod outcome;

pub use leave_balance::LeaveBalance;
pub use leave_request::LeaveRequest;
pub use outcome::{OutcomeRecord, ReconciliationReport, RequestOutcome};
