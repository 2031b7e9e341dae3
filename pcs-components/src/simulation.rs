//! The run driver
//!
//! `CellSimulation` wires the scheduler, the channel pool, the call source,
//! and the statistics into one run. Each step pops the earliest event and
//! dispatches it; a channel freed by a completing call is re-granted to the
//! frontmost waiting request inside the same step, before any other event at
//! the same virtual time is processed.

use std::collections::HashMap;

use pcs_core::{Executor, Scheduler, SimEvent, SimTime, Stepper};
use tracing::{debug, info, trace};

use crate::arrivals::CallSource;
use crate::call::{Call, CallId, CallState, EngineCtx};
use crate::channel::{ChannelPool, Grant, Priority};
use crate::config::SimulationConfig;
use crate::error::ConfigError;
use crate::stats::RunStatistics;

/// The event vocabulary of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CellEvent {
    /// A serving call's holding time elapsed; release its channel.
    ServiceCompleted { call: CallId },
    /// A waiting call's patience (or transition) timer fired.
    PatienceExpired { call: CallId },
    /// The next call arrives.
    NextArrival,
}

impl SimEvent for CellEvent {
    fn rank(&self) -> u8 {
        // Releases run before timers at the same instant, so a call racing
        // "channel freed" against "patience expired" is served, not dropped.
        match self {
            CellEvent::ServiceCompleted { .. } => 0,
            CellEvent::PatienceExpired { .. } => 1,
            CellEvent::NextArrival => 2,
        }
    }
}

/// One simulation run of the cell.
///
/// Construct with a validated [`SimulationConfig`], then call [`run`] to
/// execute to completion and obtain the [`RunStatistics`] snapshot.
///
/// [`run`]: CellSimulation::run
pub struct CellSimulation {
    config: SimulationConfig,
    scheduler: Scheduler<CellEvent>,
    pool: ChannelPool,
    source: CallSource,
    calls: HashMap<CallId, Call>,
    stats: RunStatistics,
}

impl CellSimulation {
    /// Build a run. Fails on an invalid configuration before any simulated
    /// time advances.
    pub fn new(config: SimulationConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let mut scheduler = Scheduler::default();
        scheduler.schedule_now(CellEvent::NextArrival);
        Ok(Self {
            pool: ChannelPool::new(config.channels),
            source: CallSource::new(&config),
            scheduler,
            calls: HashMap::new(),
            stats: RunStatistics::default(),
            config,
        })
    }

    /// Execute the run to completion and return its statistics.
    ///
    /// The run ends when the event set drains (every generated call reached
    /// a terminal outcome) or, if a time limit is configured, at the cutoff.
    pub fn run(mut self) -> RunStatistics {
        info!(
            channels = self.config.channels,
            q1_size = self.config.q1_size,
            q2_size = self.config.q2_size,
            max_calls = self.config.max_calls,
            seed = self.config.seed,
            "starting run"
        );
        let executor = match self.config.time_limit {
            Some(cutoff) => Executor::timed(cutoff),
            None => Executor::unbound(),
        };
        executor.execute(&mut self);
        info!(
            final_time = %self.scheduler.time(),
            arrivals = self.stats.total_arrivals(),
            "run complete"
        );
        self.stats
    }

    /// Statistics accumulated so far.
    pub fn statistics(&self) -> &RunStatistics {
        &self.stats
    }

    /// Current virtual time.
    pub fn time(&self) -> SimTime {
        self.scheduler.time()
    }

    fn handle_arrival(&mut self) {
        let now = self.scheduler.time();
        // The pool state as the arrival sees it, before the call touches
        // anything.
        self.stats.record_occupancy((
            self.pool.in_use(),
            self.pool.queue_depth(Priority::Handoff1),
            self.pool.queue_depth(Priority::Handoff2),
        ));

        let call = self.source.on_arrival(now, &mut self.scheduler);
        self.stats.record_arrival(call.class);
        trace!(time = %now, call = %call.id, class = ?call.class, "arrived");

        let mut ctx = EngineCtx {
            scheduler: &mut self.scheduler,
            pool: &mut self.pool,
            stats: &mut self.stats,
            config: &self.config,
        };
        if let Some(live) = call.admit(&mut ctx) {
            self.calls.insert(live.id, live);
        }
    }

    fn handle_service_completed(&mut self, id: CallId) {
        let call = self
            .calls
            .remove(&id)
            .unwrap_or_else(|| panic!("service completion for unknown {id}"));
        let CallState::Serving { request, .. } = call.state else {
            panic!("service completion for {id} in state {:?}", call.state);
        };
        self.stats.record_served(call.class);
        trace!(
            time = %self.scheduler.time(),
            call = %id,
            sojourn = ?self.scheduler.time().duration_since(call.arrived_at),
            "finished service, leaving system"
        );

        if let Some(grant) = self.pool.release(request) {
            debug!(time = %self.scheduler.time(), call = %grant.call, "freed channel re-granted");
            self.deliver_grant(grant);
        }
    }

    fn handle_patience_expired(&mut self, id: CallId) {
        let call = self
            .calls
            .remove(&id)
            .unwrap_or_else(|| panic!("patience timer fired for unknown {id}"));
        let mut ctx = EngineCtx {
            scheduler: &mut self.scheduler,
            pool: &mut self.pool,
            stats: &mut self.stats,
            config: &self.config,
        };
        if let Some(live) = call.on_patience_expired(&mut ctx) {
            self.calls.insert(live.id, live);
        }
    }

    fn deliver_grant(&mut self, grant: Grant) {
        let call = self
            .calls
            .get_mut(&grant.call)
            .unwrap_or_else(|| panic!("channel granted to unknown {}", grant.call));
        let mut ctx = EngineCtx {
            scheduler: &mut self.scheduler,
            pool: &mut self.pool,
            stats: &mut self.stats,
            config: &self.config,
        };
        call.on_granted(&mut ctx, grant.request);
    }
}

impl Stepper for CellSimulation {
    fn step(&mut self) -> bool {
        match self.scheduler.pop() {
            Some((_, CellEvent::NextArrival)) => {
                self.handle_arrival();
                true
            }
            Some((_, CellEvent::ServiceCompleted { call })) => {
                self.handle_service_completed(call);
                true
            }
            Some((_, CellEvent::PatienceExpired { call })) => {
                self.handle_patience_expired(call);
                true
            }
            None => false,
        }
    }

    fn next_event_time(&mut self) -> Option<SimTime> {
        self.scheduler.peek_time()
    }
}
