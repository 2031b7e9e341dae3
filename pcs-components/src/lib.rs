//! Dynamic priority queueing of handoff requests at a wireless cell.
//!
//! This crate models call admission at a single base-station channel pool,
//! after the policy published in "Dynamic priority queueing of handoff
//! requests in PCS". Three call classes compete for `C` channels:
//!
//! - **new calls** — lowest priority, no waiting room: served on arrival or
//!   blocked;
//! - **priority-1 handoffs** — highest priority, may wait in the bounded
//!   room Q1 up to an exponential dwell time;
//! - **priority-2 handoffs** — may wait in the bounded room Q2 and, under
//!   the dynamic policy, promote into Q1 when their transition timer fires.
//!
//! The only outputs are the per-class served / blocked / dropped counters
//! and the arrival-observed occupancy histogram in [`RunStatistics`].
//!
//! # Basic Usage
//!
//! ```rust
//! use pcs_components::{CellSimulation, QueuePolicy, SimulationConfig};
//!
//! let config = SimulationConfig {
//!     channels: 30,
//!     q1_size: 5,
//!     q2_size: 5,
//!     arrival_rate: 20.0,
//!     handoff_ratio: 0.5,
//!     p1_ratio: 0.5,
//!     new_service_rate: 1.0,
//!     handoff_service_rate: 2.0,
//!     q1_dwell_rate: 8.0,
//!     q2_dwell_rate: 4.8,
//!     transition_rate: 10.0,
//!     max_calls: 10_000,
//!     time_limit: None,
//!     policy: QueuePolicy::Dynamic,
//!     seed: 42,
//! };
//!
//! let stats = CellSimulation::new(config).unwrap().run();
//! assert_eq!(stats.new_served + stats.new_blocked, stats.new_arrivals);
//! println!("Pb = {:.4}", stats.new_call_blocking_probability());
//! ```

mod arrivals;
pub mod call;
pub mod channel;
pub mod config;
pub mod error;
pub mod simulation;
pub mod stats;

pub use call::{CallClass, CallId};
pub use channel::{ChannelPool, Grant, Priority, RequestId, RequestOutcome};
pub use config::{QueuePolicy, SimulationConfig};
pub use error::ConfigError;
pub use simulation::CellSimulation;
pub use stats::{OccupancyState, RunStatistics};
