//! Distribution traits and implementations for arrival and holding times
//!
//! This module abstracts over the probability distributions a simulation
//! samples from: arrival patterns for call generation and holding-time
//! distributions for service, patience, and transition draws.

use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rand_distr::Exp;
use std::time::Duration;

/// Trait for generating arrival patterns
///
/// Abstracts over different arrival processes for call generation
/// (Poisson, constant, etc.).
pub trait ArrivalPattern: Send {
    /// Get the time until the next arrival
    fn next_arrival_time(&mut self) -> Duration;
}

/// Trait for sampling holding times from a distribution
///
/// Covers service durations as well as patience (dwell) and transition
/// timers, which are all just holding times on different resources.
pub trait HoldTimeDistribution: Send {
    /// Sample a holding time from the distribution
    fn sample(&mut self) -> Duration;
}

/// Poisson arrival pattern
///
/// Generates arrivals according to a Poisson process with exponentially
/// distributed inter-arrival times.
pub struct PoissonArrivals {
    /// Rate parameter (lambda) - average arrivals per unit time
    rate: f64,
    rng: ChaCha8Rng,
    exp_dist: Exp<f64>,
}

impl PoissonArrivals {
    /// Create a new Poisson arrival pattern with an entropy-seeded RNG.
    ///
    /// # Panics
    ///
    /// Panics if rate is not positive.
    pub fn new(rate: f64) -> Self {
        Self::with_rng(rate, ChaCha8Rng::from_entropy())
    }

    /// Create a new Poisson arrival pattern with a deterministic RNG.
    pub fn with_seed(rate: f64, seed: u64) -> Self {
        Self::with_rng(rate, ChaCha8Rng::seed_from_u64(seed))
    }

    fn with_rng(rate: f64, rng: ChaCha8Rng) -> Self {
        assert!(rate > 0.0, "Rate must be positive");
        let exp_dist = Exp::new(rate).expect("Rate must be positive");
        Self { rate, rng, exp_dist }
    }

    /// Get the rate parameter
    pub fn rate(&self) -> f64 {
        self.rate
    }
}

impl ArrivalPattern for PoissonArrivals {
    fn next_arrival_time(&mut self) -> Duration {
        let inter_arrival_seconds: f64 = self.rng.sample(self.exp_dist);
        Duration::from_secs_f64(inter_arrival_seconds)
    }
}

/// Constant arrival pattern
///
/// Generates arrivals with a fixed inter-arrival time; handy for
/// deterministic protocol tests.
#[derive(Debug, Clone)]
pub struct ConstantArrivalPattern {
    inter_arrival_time: Duration,
}

impl ConstantArrivalPattern {
    pub fn new(inter_arrival_time: Duration) -> Self {
        Self { inter_arrival_time }
    }
}

impl ArrivalPattern for ConstantArrivalPattern {
    fn next_arrival_time(&mut self) -> Duration {
        self.inter_arrival_time
    }
}

/// Exponential holding-time distribution
///
/// Samples durations from an exponential distribution with a given rate
/// parameter. Used for service times and for patience/transition timers,
/// per queueing-theory convention.
pub struct ExponentialHoldTime {
    /// Rate parameter (mu) - average completions per unit time
    rate: f64,
    rng: ChaCha8Rng,
    exp_dist: Exp<f64>,
}

impl ExponentialHoldTime {
    /// Create a new exponential holding-time distribution with an
    /// entropy-seeded RNG.
    ///
    /// # Panics
    ///
    /// Panics if rate is not positive.
    pub fn new(rate: f64) -> Self {
        Self::with_rng(rate, ChaCha8Rng::from_entropy())
    }

    /// Create a new exponential holding-time distribution with a
    /// deterministic RNG.
    pub fn with_seed(rate: f64, seed: u64) -> Self {
        Self::with_rng(rate, ChaCha8Rng::seed_from_u64(seed))
    }

    fn with_rng(rate: f64, rng: ChaCha8Rng) -> Self {
        assert!(rate > 0.0, "Rate must be positive");
        let exp_dist = Exp::new(rate).expect("Rate must be positive");
        Self { rate, rng, exp_dist }
    }

    /// Get the rate parameter
    pub fn rate(&self) -> f64 {
        self.rate
    }

    /// Get the mean holding time (1/rate)
    pub fn mean(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.rate)
    }
}

impl HoldTimeDistribution for ExponentialHoldTime {
    fn sample(&mut self) -> Duration {
        let seconds: f64 = self.rng.sample(self.exp_dist);
        Duration::from_secs_f64(seconds)
    }
}
