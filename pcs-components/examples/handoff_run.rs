//! Run the cell once with the paper's parameters and print the derived
//! blocking/dropping probabilities for both queueing policies.
//!
//! Run with: cargo run --package pcs-components --example handoff_run

use pcs_components::{CellSimulation, QueuePolicy, SimulationConfig};

fn config(policy: QueuePolicy) -> SimulationConfig {
    SimulationConfig {
        channels: 30,
        q1_size: 5,
        q2_size: 5,
        arrival_rate: 25.0,
        handoff_ratio: 0.5,
        p1_ratio: 0.5,
        new_service_rate: 1.0,
        handoff_service_rate: 2.0,
        q1_dwell_rate: 8.0,
        q2_dwell_rate: 4.8,
        transition_rate: 10.0,
        max_calls: 10_000,
        time_limit: None,
        policy,
        seed: 1,
    }
}

fn main() {
    pcs_core::init_simulation_logging();

    for policy in [QueuePolicy::Dynamic, QueuePolicy::Fcfs] {
        let cfg = config(policy);
        let p1_ratio = cfg.p1_ratio;
        let stats = CellSimulation::new(cfg).expect("valid configuration").run();

        println!("\n=== {policy:?} queue ===");
        println!(
            "arrivals: {} new, {} handoff ({} P1 / {} P2)",
            stats.new_arrivals, stats.handoff_arrivals, stats.p1_arrivals, stats.p2_arrivals
        );
        println!(
            "new calls:  {} served, {} blocked  (Pb = {:.4})",
            stats.new_served,
            stats.new_blocked,
            stats.new_call_blocking_probability()
        );
        println!(
            "P1 calls:   {} served, {} blocked, {} dropped",
            stats.p1_served, stats.p1_blocked, stats.p1_dropped
        );
        println!(
            "P2 calls:   {} served, {} blocked, {} dropped",
            stats.p2_served, stats.p2_blocked, stats.p2_dropped
        );
        println!(
            "handoff failure probability: {:.4}",
            stats.handoff_failure_probability(p1_ratio)
        );
    }
}
