//! One reconciliation cycle: load, reconcile, persist.
//!
//! A [`CycleRunner`] executes the pipeline synchronously and never returns
//! an error; every failure is caught at the cycle boundary, logged, and
//! reported in the returned [`CycleReport`]. Concurrent invocations are
//! refused with [`CycleStatus::Busy`] rather than interleaved.

use std::fmt;
use std::sync::{Mutex, TryLockError};

use chrono::{DateTime, Utc};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::error::{LeaveError, LeaveResult};
use crate::models::{LeaveBalance, ReconciliationReport};
use crate::reconcile::reconcile;
use crate::store::LeaveStore;

/// Pipeline stage, used to attribute a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleStage {
    /// Reading the pending request file.
    LoadRequests,
    /// Reading the balance ledger.
    LoadBalances,
    /// Writing the ledger and clearing the request file.
    Persist,
}

impl fmt::Display for CycleStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CycleStage::LoadRequests => "load_requests",
            CycleStage::LoadBalances => "load_balances",
            CycleStage::Persist => "persist",
        };
        f.write_str(name)
    }
}

/// How a cycle ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleStatus {
    /// No request file (or an empty directory); nothing was touched.
    Skipped,
    /// Another cycle held the guard; nothing was touched.
    Busy,
    /// Requests were reconciled and the datasets rewritten.
    Completed {
        /// Per-request outcomes.
        report: ReconciliationReport,
        /// Balance rows that failed to decode.
        rejected_balances: usize,
        /// Request rows that failed to decode.
        rejected_requests: usize,
    },
    /// A stage failed; the cycle was abandoned.
    Failed {
        /// The stage that failed.
        stage: CycleStage,
        /// The error message.
        message: String,
    },
}

impl CycleStatus {
    /// Returns true if the cycle completed.
    pub fn is_completed(&self) -> bool {
        matches!(self, CycleStatus::Completed { .. })
    }
}

/// Summary of one cycle invocation.
#[derive(Debug, Clone)]
pub struct CycleReport {
    /// Correlation id attached to every log line of the cycle.
    pub cycle_id: Uuid,
    /// When the cycle started.
    pub started_at: DateTime<Utc>,
    /// When the cycle ended.
    pub finished_at: DateTime<Utc>,
    /// How the cycle ended.
    pub status: CycleStatus,
}

struct CycleFailure {
    stage: CycleStage,
    error: LeaveError,
}

impl CycleFailure {
    fn at(stage: CycleStage) -> impl FnOnce(LeaveError) -> Self {
        move |error| Self { stage, error }
    }
}

/// Where the persist stage writes its results.
pub(crate) trait LedgerSink {
    fn write_balances(&self, balances: &[LeaveBalance]) -> LeaveResult<()>;
    fn clear_requests(&self) -> LeaveResult<()>;
}

impl LedgerSink for LeaveStore {
    fn write_balances(&self, balances: &[LeaveBalance]) -> LeaveResult<()> {
        LeaveStore::write_balances(self, balances)
    }

    fn clear_requests(&self) -> LeaveResult<()> {
        LeaveStore::clear_requests(self)
    }
}

/// Runs reconciliation cycles against a [`LeaveStore`].
#[derive(Debug)]
pub struct CycleRunner {
    store: LeaveStore,
    guard: Mutex<()>,
}

impl CycleRunner {
    /// Creates a runner over `store`.
    pub fn new(store: LeaveStore) -> Self {
        Self {
            store,
            guard: Mutex::new(()),
        }
    }

    /// The store this runner reads and writes.
    pub fn store(&self) -> &LeaveStore {
        &self.store
    }

    /// Runs one cycle to completion.
    ///
    /// Never panics on I/O or data errors and never returns an error: the
    /// outcome is reported in [`CycleReport::status`].
    pub fn run_cycle(&self) -> CycleReport {
        self.run_cycle_into(&self.store)
    }

    fn run_cycle_into(&self, sink: &impl LedgerSink) -> CycleReport {
        let cycle_id = Uuid::new_v4();
        let started_at = Utc::now();
        info!(cycle_id = %cycle_id, started_at = %started_at, "Processing leave requests");

        let status = match self.guard.try_lock() {
            Ok(_held) => self.execute(cycle_id, sink),
            Err(TryLockError::Poisoned(poisoned)) => {
                let _held = poisoned.into_inner();
                self.guard.clear_poison();
                warn!(cycle_id = %cycle_id, "Previous cycle panicked; continuing");
                self.execute(cycle_id, sink)
            }
            Err(TryLockError::WouldBlock) => {
                warn!(cycle_id = %cycle_id, "Previous cycle still running; skipping");
                CycleStatus::Busy
            }
        };

        let finished_at = Utc::now();
        info!(
            cycle_id = %cycle_id,
            duration_ms = (finished_at - started_at).num_milliseconds(),
            completed = status.is_completed(),
            "Leave request cycle finished"
        );

        CycleReport {
            cycle_id,
            started_at,
            finished_at,
            status,
        }
    }

    fn execute(&self, cycle_id: Uuid, sink: &impl LedgerSink) -> CycleStatus {
        match self.try_execute(cycle_id, sink) {
            Ok(status) => status,
            Err(CycleFailure { stage, error }) => {
                error!(
                    cycle_id = %cycle_id,
                    stage = %stage,
                    error = %error,
                    "Error in processing leave related files"
                );
                CycleStatus::Failed {
                    stage,
                    message: error.to_string(),
                }
            }
        }
    }

    fn try_execute(
        &self,
        cycle_id: Uuid,
        sink: &impl LedgerSink,
    ) -> Result<CycleStatus, CycleFailure> {
        let Some(requests) = self
            .store
            .load_requests()
            .map_err(CycleFailure::at(CycleStage::LoadRequests))?
        else {
            return Ok(CycleStatus::Skipped);
        };
        requests.log_row_errors("employee_leave_request");

        let balances = self
            .store
            .load_balances()
            .map_err(CycleFailure::at(CycleStage::LoadBalances))?;
        balances.log_row_errors("employee_leave_data");
        if balances.has_errors() {
            warn!(
                cycle_id = %cycle_id,
                rejected_lines = ?balances.rejected_lines(),
                "Ledger rows failed to decode and will be dropped from the rewritten ledger"
            );
        }

        let rejected_balances = balances.errors.len();
        let rejected_requests = requests.errors.len();
        let mut ledger = balances.records;

        let report = reconcile(&mut ledger, &requests.records);
        debug!(cycle_id = %cycle_id, report = %report.to_json(), "Reconciliation report");

        sink.write_balances(&ledger)
            .map_err(CycleFailure::at(CycleStage::Persist))?;
        sink.clear_requests()
            .map_err(CycleFailure::at(CycleStage::Persist))?;

        info!(
            cycle_id = %cycle_id,
            requests = report.outcomes.len(),
            approved = report.approved(),
            rejected_rows = rejected_balances + rejected_requests,
            "Leave balances updated"
        );

        Ok(CycleStatus::Completed {
            report,
            rejected_balances,
            rejected_requests,
        })
    }
}
