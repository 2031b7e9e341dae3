//! Convergence against the hand-computable Markov chain
//!
//! With both waiting rooms disabled and every class served at the same rate
//! μ, the cell is an M/M/C/C loss system: the arrival-observed occupancy
//! must converge to the Erlang steady state. For C = 2 and offered load
//! a = λ/μ = 2 the stationary distribution is (1/5, 2/5, 2/5) and the
//! blocking probability is Erlang-B(2, 2) = 0.4.

use pcs_components::{CellSimulation, QueuePolicy, SimulationConfig};

const TOLERANCE: f64 = 0.03;

fn loss_system_config(seed: u64) -> SimulationConfig {
    SimulationConfig {
        channels: 2,
        q1_size: 0,
        q2_size: 0,
        arrival_rate: 4.0,
        handoff_ratio: 0.5,
        p1_ratio: 0.5,
        new_service_rate: 2.0,
        handoff_service_rate: 2.0,
        // Patience rates are irrelevant without waiting rooms but must
        // still be valid.
        q1_dwell_rate: 1.0,
        q2_dwell_rate: 1.0,
        transition_rate: 1.0,
        max_calls: 10_000,
        time_limit: None,
        policy: QueuePolicy::Dynamic,
        seed,
    }
}

#[test]
fn occupancy_at_arrivals_matches_the_erlang_steady_state() {
    let stats = CellSimulation::new(loss_system_config(21)).unwrap().run();

    // Without waiting rooms the only reachable states are 0, 1, or 2 busy
    // channels with empty queues.
    for (&(in_use, q1, q2), _) in stats.occupancy_histogram() {
        assert!(in_use <= 2, "impossible occupancy {in_use}");
        assert_eq!(q1, 0);
        assert_eq!(q2, 0);
    }

    let p0 = stats.occupancy_fraction((0, 0, 0));
    let p1 = stats.occupancy_fraction((1, 0, 0));
    let p2 = stats.occupancy_fraction((2, 0, 0));
    assert!((p0 - 0.2).abs() < TOLERANCE, "P(empty) = {p0}, expected 0.2");
    assert!((p1 - 0.4).abs() < TOLERANCE, "P(one busy) = {p1}, expected 0.4");
    assert!((p2 - 0.4).abs() < TOLERANCE, "P(both busy) = {p2}, expected 0.4");
}

#[test]
fn blocking_probability_matches_erlang_b() {
    let stats = CellSimulation::new(loss_system_config(22)).unwrap().run();

    // No queues, so nothing can drop; PASTA makes every class block at the
    // same Erlang-B rate.
    assert_eq!(stats.p1_dropped, 0);
    assert_eq!(stats.p2_dropped, 0);

    let blocked = stats.new_blocked + stats.p1_blocked + stats.p2_blocked;
    let overall = blocked as f64 / stats.total_arrivals() as f64;
    assert!(
        (overall - 0.4).abs() < TOLERANCE,
        "overall blocking = {overall}, expected Erlang-B(2, 2) = 0.4"
    );

    let pb_new = stats.new_call_blocking_probability();
    assert!(
        (pb_new - 0.4).abs() < 2.0 * TOLERANCE,
        "new-call blocking = {pb_new}, expected 0.4"
    );
}
