//! Leave reconciler daemon.
//!
//! Usage: `leave-reconciler [CONFIG]`. The configuration path falls back to
//! `LEAVE_RECONCILER_CONFIG`, then `./config/leave-reconciler.yaml`.

use std::process::ExitCode;

use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use leave_reconciler::config::ConfigLoader;
use leave_reconciler::service::LeaveService;

const DEFAULT_CONFIG_PATH: &str = "./config/leave-reconciler.yaml";

fn init_tracing() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn config_path() -> String {
    std::env::args()
        .nth(1)
        .or_else(|| std::env::var("LEAVE_RECONCILER_CONFIG").ok())
        .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();

    let path = config_path();
    info!(config = %path, "Starting leave reconciler");

    let service = match ConfigLoader::load(&path).and_then(|config| LeaveService::start(&config)) {
        Ok(service) => service,
        Err(e) => {
            error!(error = %e, "Error in setting up application");
            return ExitCode::FAILURE;
        }
    };

    let cycles = service.run_until(shutdown_signal()).await;
    info!(cycles, "Leave reconciler stopped");

    ExitCode::SUCCESS
}
