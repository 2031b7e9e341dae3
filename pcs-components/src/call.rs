//! The call admission state machine
//!
//! One [`Call`] value exists per arriving demand for a channel. Its class
//! decides the protocol: new calls are served or blocked on the spot,
//! priority-1 handoffs may wait in Q1 up to a dwell time, and priority-2
//! handoffs may wait in Q2 and, under the dynamic policy, promote into Q1
//! when their transition timer fires. Every call ends in exactly one
//! terminal outcome (served, blocked, or dropped) and owns at most one
//! channel request at any instant.

use pcs_core::{EventId, Scheduler, SimTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use tracing::trace;

use crate::channel::{ChannelPool, Priority, RequestId, RequestOutcome};
use crate::config::{QueuePolicy, SimulationConfig};
use crate::simulation::CellEvent;
use crate::stats::RunStatistics;

/// Unique identifier of a call, assigned in arrival order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CallId(u64);

impl CallId {
    pub fn from_raw(id: u64) -> Self {
        CallId(id)
    }
}

impl fmt::Display for CallId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Call({})", self.0)
    }
}

/// The three classes of arriving calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CallClass {
    /// Fresh call originating in the cell; lowest priority, no waiting room.
    New,
    /// Priority-1 handoff from a neighbouring cell; may wait in Q1.
    HandoffP1,
    /// Priority-2 handoff; may wait in Q2 (and promote into Q1).
    HandoffP2,
}

impl CallClass {
    /// Channel-request priority this class arrives with.
    pub fn priority(self) -> Priority {
        match self {
            CallClass::New => Priority::New,
            CallClass::HandoffP1 => Priority::Handoff1,
            CallClass::HandoffP2 => Priority::Handoff2,
        }
    }
}

/// The call's random draws, each sampled exactly once at arrival.
///
/// `dwell` is meaningful for handoff classes only, `transition` for
/// priority-2 only; both stay zero otherwise and are never consulted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HoldingDraws {
    pub service: Duration,
    pub dwell: Duration,
    pub transition: Duration,
}

/// Where in its lifecycle a live call currently is. Terminal outcomes are
/// not states: a served, blocked, or dropped call is destroyed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CallState {
    /// Just arrived, not yet presented to the pool.
    Admitting,
    /// Holding a channel until the scheduled completion event.
    Serving { request: RequestId },
    /// Priority-1 call pending in Q1 with a dwell timer armed.
    WaitingQ1 { request: RequestId, timer: EventId },
    /// Priority-2 call pending in Q2. Under the dynamic policy the timer is
    /// the transition timer; under FCFS it is the full dwell timer.
    WaitingQ2 {
        request: RequestId,
        timer: EventId,
        enqueued_at: SimTime,
    },
    /// Priority-2 call re-queued at priority 1 after its transition fired.
    WaitingPromoted {
        request: RequestId,
        timer: EventId,
        enqueued_at: SimTime,
    },
}

/// Mutable view of the run the state machine transitions against.
pub(crate) struct EngineCtx<'a> {
    pub scheduler: &'a mut Scheduler<CellEvent>,
    pub pool: &'a mut ChannelPool,
    pub stats: &'a mut RunStatistics,
    pub config: &'a SimulationConfig,
}

#[derive(Debug)]
pub(crate) struct Call {
    pub id: CallId,
    pub class: CallClass,
    pub arrived_at: SimTime,
    pub draws: HoldingDraws,
    pub state: CallState,
}

impl Call {
    pub(crate) fn new(id: CallId, class: CallClass, arrived_at: SimTime, draws: HoldingDraws) -> Self {
        Self {
            id,
            class,
            arrived_at,
            draws,
            state: CallState::Admitting,
        }
    }

    /// Run the arrival protocol. Returns the call if it is still live
    /// (serving or queued), `None` if it reached a terminal outcome.
    pub(crate) fn admit(mut self, ctx: &mut EngineCtx<'_>) -> Option<Self> {
        match ctx.pool.request(self.id, self.class.priority()) {
            RequestOutcome::Granted(request) => {
                trace!(time = %ctx.scheduler.time(), call = %self.id, "served on arrival");
                self.begin_service(ctx, request, self.draws.service);
                Some(self)
            }
            RequestOutcome::Queued(request) => {
                // Zero patience on the first attempt: withdraw, then decide
                // whether this class may queue at all.
                ctx.pool.withdraw(request);
                match self.class {
                    CallClass::New => {
                        ctx.stats.record_blocked(self.class);
                        trace!(time = %ctx.scheduler.time(), call = %self.id, "blocked, leaving system");
                        None
                    }
                    CallClass::HandoffP1 => self.join_q1(ctx),
                    CallClass::HandoffP2 => self.join_q2(ctx),
                }
            }
        }
    }

    /// A channel freed up and the pool picked this call's pending request.
    /// Runs in the same event step as the release.
    pub(crate) fn on_granted(&mut self, ctx: &mut EngineCtx<'_>, granted: RequestId) {
        let now = ctx.scheduler.time();
        let (request, timer, queued_since) = match self.state {
            CallState::WaitingQ1 { request, timer } => (request, timer, None),
            CallState::WaitingQ2 { request, timer, enqueued_at }
            | CallState::WaitingPromoted { request, timer, enqueued_at } => {
                (request, timer, Some(enqueued_at))
            }
            ref other => panic!("channel granted to {} in non-waiting state {other:?}", self.id),
        };
        assert_eq!(request, granted, "grant delivered to the wrong request of {}", self.id);

        ctx.scheduler.cancel(timer);
        // Service time is a single draw at arrival; a priority-2 call
        // consumes it while queued.
        let service = match queued_since {
            Some(t0) => self.draws.service.saturating_sub(now - t0),
            None => self.draws.service,
        };
        trace!(time = %now, call = %self.id, "granted a channel from the waiting list");
        self.begin_service(ctx, request, service);
    }

    /// The call's patience (or transition) timer fired before any grant.
    /// Returns the call if it is still live, `None` on a terminal outcome.
    pub(crate) fn on_patience_expired(self, ctx: &mut EngineCtx<'_>) -> Option<Self> {
        let now = ctx.scheduler.time();
        match self.state {
            CallState::WaitingQ1 { request, .. } => {
                ctx.pool.withdraw(request);
                ctx.stats.record_dropped(self.class);
                trace!(time = %now, call = %self.id, "dropped out of Q1");
                None
            }
            CallState::WaitingPromoted { request, .. } => {
                ctx.pool.withdraw(request);
                ctx.stats.record_dropped(self.class);
                trace!(time = %now, call = %self.id, "dropped out of Q1 after promotion");
                None
            }
            CallState::WaitingQ2 { request, enqueued_at, .. } => {
                ctx.pool.withdraw(request);
                match ctx.config.policy {
                    QueuePolicy::Fcfs => {
                        ctx.stats.record_dropped(self.class);
                        trace!(time = %now, call = %self.id, "dropped out of Q2");
                        None
                    }
                    QueuePolicy::Dynamic => self.promote(ctx, enqueued_at),
                }
            }
            ref other => panic!("patience timer fired for {} in state {other:?}", self.id),
        }
    }

    /// Attempt the Q2 -> Q1 promotion after the transition timer fired.
    /// The old priority-2 request is already withdrawn.
    fn promote(mut self, ctx: &mut EngineCtx<'_>, enqueued_at: SimTime) -> Option<Self> {
        let now = ctx.scheduler.time();
        if ctx.pool.queue_depth(Priority::Handoff1) >= ctx.config.q1_size {
            ctx.stats.record_dropped(self.class);
            trace!(time = %now, call = %self.id, "promotion rejected, Q1 full");
            return None;
        }
        match ctx.pool.request(self.id, Priority::Handoff1) {
            RequestOutcome::Granted(request) => {
                let service = self.draws.service.saturating_sub(now - enqueued_at);
                self.begin_service(ctx, request, service);
            }
            RequestOutcome::Queued(request) => {
                // The patience left over after the transition: the Q2 dwell
                // draw minus the transition already waited, floored at zero.
                let remaining = self.draws.dwell.saturating_sub(self.draws.transition);
                let timer = ctx.scheduler.schedule(
                    SimTime::from_duration(remaining),
                    CellEvent::PatienceExpired { call: self.id },
                );
                trace!(time = %now, call = %self.id, "promoted from Q2 to Q1");
                self.state = CallState::WaitingPromoted {
                    request,
                    timer,
                    enqueued_at,
                };
            }
        }
        Some(self)
    }

    fn join_q1(mut self, ctx: &mut EngineCtx<'_>) -> Option<Self> {
        if ctx.pool.queue_depth(Priority::Handoff1) >= ctx.config.q1_size {
            ctx.stats.record_blocked(self.class);
            trace!(time = %ctx.scheduler.time(), call = %self.id, "Q1 full, blocked");
            return None;
        }
        match ctx.pool.request(self.id, Priority::Handoff1) {
            RequestOutcome::Granted(request) => {
                self.begin_service(ctx, request, self.draws.service);
            }
            RequestOutcome::Queued(request) => {
                let timer = ctx.scheduler.schedule(
                    SimTime::from_duration(self.draws.dwell),
                    CellEvent::PatienceExpired { call: self.id },
                );
                trace!(time = %ctx.scheduler.time(), call = %self.id, "queued in Q1");
                self.state = CallState::WaitingQ1 { request, timer };
            }
        }
        Some(self)
    }

    fn join_q2(mut self, ctx: &mut EngineCtx<'_>) -> Option<Self> {
        if ctx.pool.queue_depth(Priority::Handoff2) >= ctx.config.q2_size {
            ctx.stats.record_blocked(self.class);
            trace!(time = %ctx.scheduler.time(), call = %self.id, "Q2 full, blocked");
            return None;
        }
        match ctx.pool.request(self.id, Priority::Handoff2) {
            RequestOutcome::Granted(request) => {
                self.begin_service(ctx, request, self.draws.service);
            }
            RequestOutcome::Queued(request) => {
                let patience = match ctx.config.policy {
                    QueuePolicy::Dynamic => self.draws.transition,
                    QueuePolicy::Fcfs => self.draws.dwell,
                };
                let timer = ctx.scheduler.schedule(
                    SimTime::from_duration(patience),
                    CellEvent::PatienceExpired { call: self.id },
                );
                trace!(time = %ctx.scheduler.time(), call = %self.id, "queued in Q2");
                self.state = CallState::WaitingQ2 {
                    request,
                    timer,
                    enqueued_at: ctx.scheduler.time(),
                };
            }
        }
        Some(self)
    }

    fn begin_service(&mut self, ctx: &mut EngineCtx<'_>, request: RequestId, service: Duration) {
        ctx.scheduler.schedule(
            SimTime::from_duration(service),
            CellEvent::ServiceCompleted { call: self.id },
        );
        self.state = CallState::Serving { request };
    }
}
