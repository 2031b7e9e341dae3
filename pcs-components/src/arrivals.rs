//! The Poisson call source
//!
//! Generates a stream of calls at exponential inter-arrival times, each one
//! classified new / priority-1 handoff / priority-2 handoff by two uniform
//! draws against the configured traffic ratios. The source schedules its own
//! next arrival and never waits on a call's fate.

use pcs_core::dists::{ArrivalPattern, ExponentialHoldTime, HoldTimeDistribution, PoissonArrivals};
use pcs_core::{substream_seed, Scheduler, SimTime};
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::time::Duration;

use crate::call::{Call, CallClass, CallId, HoldingDraws};
use crate::config::SimulationConfig;
use crate::simulation::CellEvent;

// Domain tags of the run's independent sampling streams.
const STREAM_ARRIVALS: u64 = 0x4152_5249_5641_4C53; // "ARRIVALS"
const STREAM_CLASS_MIX: u64 = 0x434C_4153_534D_4958; // "CLASSMIX"
const STREAM_NEW_HOLD: u64 = 0x4E45_5748_4F4C_4421; // "NEWHOLD!"
const STREAM_HANDOFF_HOLD: u64 = 0x484F_4646_484F_4C44; // "HOFFHOLD"
const STREAM_Q1_DWELL: u64 = 0x5131_4457_454C_4C21; // "Q1DWELL!"
const STREAM_Q2_DWELL: u64 = 0x5132_4457_454C_4C21; // "Q2DWELL!"
const STREAM_TRANSITION: u64 = 0x5452_414E_5349_5421; // "TRANSIT!"

pub(crate) struct CallSource {
    remaining: u64,
    interarrival: PoissonArrivals,
    class_rng: ChaCha8Rng,
    handoff_ratio: f64,
    p1_ratio: f64,
    new_service: ExponentialHoldTime,
    handoff_service: ExponentialHoldTime,
    q1_dwell: ExponentialHoldTime,
    q2_dwell: ExponentialHoldTime,
    transition: ExponentialHoldTime,
    next_call_id: u64,
}

impl CallSource {
    pub(crate) fn new(config: &SimulationConfig) -> Self {
        let seed = config.seed;
        Self {
            remaining: config.max_calls,
            interarrival: PoissonArrivals::with_seed(
                config.arrival_rate,
                substream_seed(seed, STREAM_ARRIVALS),
            ),
            class_rng: ChaCha8Rng::seed_from_u64(substream_seed(seed, STREAM_CLASS_MIX)),
            handoff_ratio: config.handoff_ratio,
            p1_ratio: config.p1_ratio,
            new_service: ExponentialHoldTime::with_seed(
                config.new_service_rate,
                substream_seed(seed, STREAM_NEW_HOLD),
            ),
            handoff_service: ExponentialHoldTime::with_seed(
                config.handoff_service_rate,
                substream_seed(seed, STREAM_HANDOFF_HOLD),
            ),
            q1_dwell: ExponentialHoldTime::with_seed(
                config.q1_dwell_rate,
                substream_seed(seed, STREAM_Q1_DWELL),
            ),
            q2_dwell: ExponentialHoldTime::with_seed(
                config.q2_dwell_rate,
                substream_seed(seed, STREAM_Q2_DWELL),
            ),
            transition: ExponentialHoldTime::with_seed(
                config.transition_rate,
                substream_seed(seed, STREAM_TRANSITION),
            ),
            next_call_id: 0,
        }
    }

    /// Spawn the call arriving now and schedule the next arrival.
    pub(crate) fn on_arrival(&mut self, now: SimTime, scheduler: &mut Scheduler<CellEvent>) -> Call {
        debug_assert!(self.remaining > 0, "arrival event fired on an exhausted source");
        self.remaining -= 1;
        if self.remaining > 0 {
            let gap = self.interarrival.next_arrival_time();
            scheduler.schedule(SimTime::from_duration(gap), CellEvent::NextArrival);
        }

        self.next_call_id += 1;
        let class = self.classify();
        let draws = self.draw_holding_times(class);
        Call::new(CallId::from_raw(self.next_call_id), class, now, draws)
    }

    fn classify(&mut self) -> CallClass {
        let u1: f64 = self.class_rng.gen();
        if u1 > self.handoff_ratio {
            CallClass::New
        } else if self.class_rng.gen::<f64>() > self.p1_ratio {
            CallClass::HandoffP2
        } else {
            CallClass::HandoffP1
        }
    }

    fn draw_holding_times(&mut self, class: CallClass) -> HoldingDraws {
        match class {
            CallClass::New => HoldingDraws {
                service: self.new_service.sample(),
                dwell: Duration::ZERO,
                transition: Duration::ZERO,
            },
            CallClass::HandoffP1 => HoldingDraws {
                service: self.handoff_service.sample(),
                dwell: self.q1_dwell.sample(),
                transition: Duration::ZERO,
            },
            CallClass::HandoffP2 => HoldingDraws {
                service: self.handoff_service.sample(),
                dwell: self.q2_dwell.sample(),
                transition: self.transition.sample(),
            },
        }
    }
}
