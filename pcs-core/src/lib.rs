//! Core discrete event simulation substrate.
//!
//! This crate provides the fundamental building blocks for discrete event
//! simulation: time management, event scheduling, probability distributions,
//! deterministic seed derivation, and run execution.
//!
//! # Architecture Overview
//!
//! - [`SimTime`] is virtual time: nanoseconds since the start of the run,
//!   advanced only by the scheduler.
//! - [`Scheduler`] keeps the clock and a min-heap of pending events, generic
//!   over the event vocabulary of the simulation driving it. Simultaneous
//!   events are ordered by [`SimEvent::rank`] and then FIFO, so a run is a
//!   deterministic function of its configuration and seed.
//! - [`Executor`] drives anything implementing [`Stepper`] to completion,
//!   either until the event set drains or until a virtual-time cutoff.
//!
//! Concurrency here is logical, not physical: all processes are interleaved
//! by the scheduler on one thread, in strict virtual-time order.
//!
//! # Basic Usage
//!
//! ```rust
//! use pcs_core::{Scheduler, SimEvent, SimTime};
//!
//! #[derive(Debug)]
//! struct Ping;
//! impl SimEvent for Ping {}
//!
//! let mut scheduler = Scheduler::default();
//! scheduler.schedule(SimTime::from_secs(3), Ping);
//! let (time, _ping) = scheduler.pop().unwrap();
//! assert_eq!(time, SimTime::from_secs(3));
//! assert_eq!(scheduler.time(), time);
//! ```

pub mod dists;
pub mod execute;
pub mod logging;
pub mod scheduler;
pub mod seed;
pub mod time;

pub use execute::{Executor, Stepper};
pub use logging::{init_simulation_logging, init_simulation_logging_with_level};
pub use scheduler::{ClockRef, EventId, Scheduler, SimEvent};
pub use seed::substream_seed;
pub use time::SimTime;
