//! Structured logging for simulation debugging
//!
//! Per-call lifecycle messages are emitted at trace level, keyed by virtual
//! time and call identity; pool transitions at debug level; run start/end at
//! info level. Logging is a side channel only: it must never influence
//! counters or event order.
//!
//! Output is controlled through `RUST_LOG` in the usual way, e.g.
//!
//! ```bash
//! RUST_LOG=pcs_components=trace cargo test
//! RUST_LOG=pcs_core=debug,pcs_components=trace cargo run --example handoff_run
//! ```

use tracing::info;
use tracing_subscriber::{filter::EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize logging for the simulation with sensible defaults.
pub fn init_simulation_logging() {
    init_simulation_logging_with_level("info")
}

/// Initialize logging with a specific level.
///
/// # Arguments
/// * `level` - Log level: "trace", "debug", "info", "warn", or "error"
pub fn init_simulation_logging_with_level(level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("pcs_core={level},pcs_components={level}").into());

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(true)
                .with_level(true)
                .with_file(true)
                .with_line_number(true),
        )
        .with(filter)
        .init();

    info!("Simulation logging initialized at level: {}", level);
}
