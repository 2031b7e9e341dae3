//! Run statistics
//!
//! One [`RunStatistics`] value is owned by the run, written only by call
//! state-machine transitions, and read only after the run completes. Every
//! call increments exactly one terminal counter (served, blocked, or
//! dropped); a call that promotes from Q2 to Q1 keeps its arrival class for
//! counting purposes, so the per-class identities hold exactly.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::call::CallClass;

/// State of the cell as seen by an arriving call: channels in use, pending
/// priority-1 requests, pending priority-2 requests.
pub type OccupancyState = (usize, usize, usize);

/// Aggregated outcome counters of one run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunStatistics {
    /// New-call arrivals.
    pub new_arrivals: u64,
    /// Handoff arrivals of either priority.
    pub handoff_arrivals: u64,
    /// Priority-1 handoff arrivals.
    pub p1_arrivals: u64,
    /// Priority-2 handoff arrivals.
    pub p2_arrivals: u64,

    /// New calls served to completion.
    pub new_served: u64,
    /// New calls denied a channel on arrival.
    pub new_blocked: u64,

    /// Priority-1 calls served to completion.
    pub p1_served: u64,
    /// Priority-1 calls turned away because Q1 was full.
    pub p1_blocked: u64,
    /// Priority-1 calls that abandoned Q1 unserved.
    pub p1_dropped: u64,

    /// Priority-2 calls served to completion.
    pub p2_served: u64,
    /// Priority-2 calls turned away because Q2 was full.
    pub p2_blocked: u64,
    /// Priority-2 calls that abandoned unserved (in Q2, at a rejected
    /// promotion, or in Q1 after promoting).
    pub p2_dropped: u64,

    /// How often each `(in_use, q1_depth, q2_depth)` state was observed at
    /// an arrival instant, before the arriving call touched the pool.
    occupancy_at_arrival: BTreeMap<OccupancyState, u64>,
}

impl RunStatistics {
    pub(crate) fn record_arrival(&mut self, class: CallClass) {
        match class {
            CallClass::New => self.new_arrivals += 1,
            CallClass::HandoffP1 => {
                self.handoff_arrivals += 1;
                self.p1_arrivals += 1;
            }
            CallClass::HandoffP2 => {
                self.handoff_arrivals += 1;
                self.p2_arrivals += 1;
            }
        }
    }

    pub(crate) fn record_served(&mut self, class: CallClass) {
        match class {
            CallClass::New => self.new_served += 1,
            CallClass::HandoffP1 => self.p1_served += 1,
            CallClass::HandoffP2 => self.p2_served += 1,
        }
    }

    pub(crate) fn record_blocked(&mut self, class: CallClass) {
        match class {
            CallClass::New => self.new_blocked += 1,
            CallClass::HandoffP1 => self.p1_blocked += 1,
            CallClass::HandoffP2 => self.p2_blocked += 1,
        }
    }

    pub(crate) fn record_dropped(&mut self, class: CallClass) {
        match class {
            CallClass::New => unreachable!("new calls never queue, so they cannot drop"),
            CallClass::HandoffP1 => self.p1_dropped += 1,
            CallClass::HandoffP2 => self.p2_dropped += 1,
        }
    }

    pub(crate) fn record_occupancy(&mut self, state: OccupancyState) {
        *self.occupancy_at_arrival.entry(state).or_insert(0) += 1;
    }

    /// Blocking probability for new calls: `new_blocked / new_arrivals`.
    pub fn new_call_blocking_probability(&self) -> f64 {
        if self.new_arrivals == 0 {
            return 0.0;
        }
        self.new_blocked as f64 / self.new_arrivals as f64
    }

    /// Combined blocking/dropping probability for handoff calls, weighted by
    /// the priority-1 ratio the run was configured with.
    pub fn handoff_failure_probability(&self, p1_ratio: f64) -> f64 {
        if self.handoff_arrivals == 0 {
            return 0.0;
        }
        let h = self.handoff_arrivals as f64;
        let p1_failed = (self.p1_blocked + self.p1_dropped) as f64;
        let p2_failed = (self.p2_blocked + self.p2_dropped) as f64;
        p1_ratio * p1_failed / h + (1.0 - p1_ratio) * p2_failed / h
    }

    /// Fraction of arrivals that observed the given pool state.
    pub fn occupancy_fraction(&self, state: OccupancyState) -> f64 {
        let total: u64 = self.occupancy_at_arrival.values().sum();
        if total == 0 {
            return 0.0;
        }
        *self.occupancy_at_arrival.get(&state).unwrap_or(&0) as f64 / total as f64
    }

    /// The full arrival-observed occupancy histogram.
    pub fn occupancy_histogram(&self) -> &BTreeMap<OccupancyState, u64> {
        &self.occupancy_at_arrival
    }

    /// Total arrivals across all classes.
    pub fn total_arrivals(&self) -> u64 {
        self.new_arrivals + self.handoff_arrivals
    }
}
