//! Run configuration
//!
//! All parameters of one simulation run, validated up front. Rates are in
//! events per unit of virtual time; one unit of virtual time corresponds to
//! one second of [`SimTime`].

use pcs_core::SimTime;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Which queueing discipline the priority-2 waiting room follows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum QueuePolicy {
    /// A priority-2 call that outlives its transition timer attempts to
    /// promote into Q1 and continue waiting at priority 1.
    #[default]
    Dynamic,
    /// No promotion: a priority-2 call waits out its full dwell time in Q2.
    Fcfs,
}

/// Complete configuration of one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Number of channels at the base station (C). Zero is legal: nothing
    /// is ever granted.
    pub channels: usize,
    /// Capacity of the priority-1 waiting room (Q1).
    pub q1_size: usize,
    /// Capacity of the priority-2 waiting room (Q2).
    pub q2_size: usize,
    /// Total call arrival rate (lambda, calls per unit time).
    pub arrival_rate: f64,
    /// Fraction of arrivals that are handoff calls.
    pub handoff_ratio: f64,
    /// Fraction of handoff calls that are priority 1.
    pub p1_ratio: f64,
    /// Service rate for new calls.
    pub new_service_rate: f64,
    /// Service rate for handoff calls.
    pub handoff_service_rate: f64,
    /// Rate of the patience timer for calls waiting in Q1.
    pub q1_dwell_rate: f64,
    /// Rate of the patience timer for calls waiting in Q2.
    pub q2_dwell_rate: f64,
    /// Rate of the Q2 -> Q1 transition timer.
    pub transition_rate: f64,
    /// Number of calls to generate before the source goes quiet.
    pub max_calls: u64,
    /// Optional cutoff in virtual time; events past it are not processed.
    pub time_limit: Option<SimTime>,
    /// Queueing discipline for priority-2 calls.
    pub policy: QueuePolicy,
    /// Master seed; every sampling stream is derived from it.
    pub seed: u64,
}

impl SimulationConfig {
    /// Validate the configuration. Called by the run constructor before any
    /// event is scheduled.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let rates = [
            ("arrival_rate", self.arrival_rate),
            ("new_service_rate", self.new_service_rate),
            ("handoff_service_rate", self.handoff_service_rate),
            ("q1_dwell_rate", self.q1_dwell_rate),
            ("q2_dwell_rate", self.q2_dwell_rate),
            ("transition_rate", self.transition_rate),
        ];
        for (name, value) in rates {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::InvalidRate { name, value });
            }
        }

        let ratios = [
            ("handoff_ratio", self.handoff_ratio),
            ("p1_ratio", self.p1_ratio),
        ];
        for (name, value) in ratios {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::RatioOutOfRange { name, value });
            }
        }

        if self.max_calls == 0 {
            return Err(ConfigError::NoCalls);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> SimulationConfig {
        SimulationConfig {
            channels: 30,
            q1_size: 5,
            q2_size: 5,
            arrival_rate: 10.0,
            handoff_ratio: 0.5,
            p1_ratio: 0.5,
            new_service_rate: 1.0,
            handoff_service_rate: 2.0,
            q1_dwell_rate: 8.0,
            q2_dwell_rate: 4.8,
            transition_rate: 10.0,
            max_calls: 10_000,
            time_limit: None,
            policy: QueuePolicy::Dynamic,
            seed: 1,
        }
    }

    #[test]
    fn test_valid_config_passes() {
        assert_eq!(valid().validate(), Ok(()));
    }

    #[test]
    fn test_zero_capacity_and_queues_are_legal() {
        let mut config = valid();
        config.channels = 0;
        config.q1_size = 0;
        config.q2_size = 0;
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn test_non_positive_rate_rejected() {
        let mut config = valid();
        config.arrival_rate = 0.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidRate { name: "arrival_rate", .. })
        ));

        let mut config = valid();
        config.transition_rate = -3.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidRate { name: "transition_rate", .. })
        ));

        let mut config = valid();
        config.q1_dwell_rate = f64::INFINITY;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidRate { name: "q1_dwell_rate", .. })
        ));
    }

    #[test]
    fn test_ratio_out_of_range_rejected() {
        let mut config = valid();
        config.handoff_ratio = 1.5;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::RatioOutOfRange { name: "handoff_ratio", .. })
        ));

        let mut config = valid();
        config.p1_ratio = -0.1;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::RatioOutOfRange { name: "p1_ratio", .. })
        ));
    }

    #[test]
    fn test_zero_calls_rejected() {
        let mut config = valid();
        config.max_calls = 0;
        assert_eq!(config.validate(), Err(ConfigError::NoCalls));
    }
}
