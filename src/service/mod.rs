//! Service bootstrap and the fixed-interval scheduler.
//!
//! [`LeaveService::start`] checks the startup preconditions and fails if any
//! is not met. [`LeaveService::run_until`] then drives a cycle on every
//! tick until the shutdown future resolves. Each cycle runs on the blocking
//! pool and is awaited before the next tick is taken, so cycles never
//! overlap.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::time::MissedTickBehavior;
use tracing::{error, info};

use crate::config::ConfigLoader;
use crate::cycle::{CycleReport, CycleRunner};
use crate::error::{LeaveError, LeaveResult};
use crate::store::LeaveStore;

/// A started leave reconciliation service.
#[derive(Debug, Clone)]
pub struct LeaveService {
    runner: Arc<CycleRunner>,
    interval: Duration,
}

impl LeaveService {
    /// Bootstraps the service from configuration.
    ///
    /// Creates the upload directory if needed and loads the balance ledger
    /// once to validate it.
    ///
    /// # Errors
    ///
    /// - [`LeaveError::DirectoryUnavailable`] if the directory cannot be created
    /// - [`LeaveError::BalanceFileMissing`] if the ledger does not exist
    /// - any error from reading the ledger
    pub fn start(config: &ConfigLoader) -> LeaveResult<Self> {
        Self::with_store(LeaveStore::from_config(config), config.interval())
    }

    /// Bootstraps the service over an explicit store and interval.
    pub fn with_store(store: LeaveStore, interval: Duration) -> LeaveResult<Self> {
        store.ensure_directory()?;
        info!(path = %store.root().display(), "Leave upload path is ready");

        if !store.has_balance_file() {
            return Err(LeaveError::BalanceFileMissing {
                path: store.balance_path().display().to_string(),
            });
        }

        let ledger = store.load_balances()?;
        ledger.log_row_errors("employee_leave_data");
        info!(
            employees = ledger.records.len(),
            rejected = ledger.errors.len(),
            interval_ms = interval.as_millis() as u64,
            "Leave balance ledger validated"
        );

        Ok(Self {
            runner: Arc::new(CycleRunner::new(store)),
            interval,
        })
    }

    /// The cycle runner.
    pub fn runner(&self) -> &CycleRunner {
        &self.runner
    }

    /// Period between cycles.
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Runs one cycle on the blocking pool.
    ///
    /// Returns `None` if the cycle panicked; the panic is logged.
    pub async fn run_cycle(&self) -> Option<CycleReport> {
        let runner = Arc::clone(&self.runner);
        match tokio::task::spawn_blocking(move || runner.run_cycle()).await {
            Ok(report) => Some(report),
            Err(e) => {
                error!(error = %e, "Leave request cycle aborted");
                None
            }
        }
    }

    /// Runs a cycle immediately and then once per interval until `shutdown`
    /// resolves. Returns the number of cycles started.
    pub async fn run_until<F>(&self, shutdown: F) -> usize
    where
        F: Future<Output = ()>,
    {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        tokio::pin!(shutdown);

        info!(interval_ms = self.interval.as_millis() as u64, "Leave scheduler started");
        let mut cycles = 0;
        loop {
            tokio::select! {
                biased;
                _ = &mut shutdown => {
                    info!(cycles, "Shutting down leave scheduler");
                    break;
                }
                _ = ticker.tick() => {
                    self.run_cycle().await;
                    cycles += 1;
                }
            }
        }
        cycles
    }
}
