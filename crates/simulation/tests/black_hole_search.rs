//! End-to-end black-hole search runs.

use ringscout_simulation::{
    NetworkConfig, SimulationConfig, SimulationReport, SimulationRunner, TraceKind,
};
use ringscout_types::{AgentId, AgentState, NodeId, NodeState};
use std::time::Duration;
use tracing_test::traced_test;

fn run(config: SimulationConfig) -> SimulationReport {
    SimulationRunner::new(config)
        .expect("valid scenario")
        .run_checked()
        .expect("run completes without invariant violations")
}

fn jittery(jitter_ms: u64) -> NetworkConfig {
    NetworkConfig::default().with_latency_jitter(Duration::from_millis(jitter_ms))
}

// ═══════════════════════════════════════════════════════════════════════════
// Scenarios
// ═══════════════════════════════════════════════════════════════════════════

#[traced_test]
#[test]
fn test_five_node_ring_with_hole_at_three() {
    let config = SimulationConfig::new(5).with_black_hole(NodeId(3));
    let mut runner = SimulationRunner::new(config).unwrap();

    // Both placements first.
    runner.step().unwrap();
    runner.step().unwrap();
    assert_eq!(runner.agent(AgentId(0)).unwrap().num_req(), 2);
    assert_eq!(runner.agent(AgentId(1)).unwrap().num_req(), 2);

    let report = runner.run().unwrap();

    assert_eq!(report.verify(), Ok(()));
    assert_eq!(
        report.node_states,
        vec![
            NodeState::Clean,
            NodeState::Clean,
            NodeState::EdgeToBlackHole,
            NodeState::Unknown,
            NodeState::EdgeToBlackHole,
        ]
    );

    let survivor = report.survivor().unwrap();
    assert_eq!(survivor.id, AgentId(0));
    assert_eq!(survivor.state, AgentState::Done);
    assert_eq!(
        survivor.outcome.and_then(|o| o.black_hole_neighbours()),
        Some((NodeId(4), NodeId(2)))
    );
    assert!(report.agents[1].is_destroyed());
    assert_eq!(report.located_black_hole(), Some(NodeId(3)));
}

#[traced_test]
#[test]
fn test_four_node_ring_every_hole_position() {
    for hole in 1..4 {
        let report = run(SimulationConfig::new(4).with_black_hole(NodeId(hole)));
        assert_eq!(report.verify(), Ok(()), "hole at {}", hole);
    }
}

#[traced_test]
#[test]
fn test_four_node_ring_hole_opposite_home() {
    let report = run(SimulationConfig::new(4).with_black_hole(NodeId(2)));

    assert_eq!(report.survivor().map(|a| a.id), Some(AgentId(0)));
    assert_eq!(
        report.node_states,
        vec![
            NodeState::Clean,
            NodeState::EdgeToBlackHole,
            NodeState::Unknown,
            NodeState::EdgeToBlackHole,
        ]
    );
}

#[traced_test]
#[test]
fn test_hole_next_to_home_on_first_side() {
    let report = run(SimulationConfig::new(3).with_black_hole(NodeId(1)));

    assert_eq!(report.verify(), Ok(()));
    assert_eq!(report.survivor().map(|a| a.id), Some(AgentId(1)));
    assert_eq!(report.agents[0].destroyed_at, Some(NodeId(1)));
}

#[traced_test]
#[test]
fn test_partner_takes_over_stalled_partition() {
    let report = run(SimulationConfig::new(6).with_black_hole(NodeId(5)));

    assert_eq!(report.verify(), Ok(()));
    let survivor = report.survivor().unwrap();
    assert_eq!(survivor.id, AgentId(0));
    assert!(survivor.round > 1, "survivor stayed in round {}", survivor.round);
}

#[traced_test]
#[test]
fn test_home_away_from_node_zero() {
    for hole in [0, 1, 2, 5, 6] {
        let config = SimulationConfig::new(7)
            .with_home(NodeId(3))
            .with_black_hole(NodeId(hole));
        assert_eq!(run(config).verify(), Ok(()), "hole at {}", hole);
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Sweeps
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_every_size_and_hole_without_jitter() {
    for size in 3..=16 {
        for hole in 1..size {
            let report = run(SimulationConfig::new(size).with_black_hole(NodeId(hole)));
            assert_eq!(report.verify(), Ok(()), "n={} hole={}", size, hole);
        }
    }
}

#[test]
fn test_every_size_and_hole_with_jitter() {
    for size in 3..=12 {
        for hole in 1..size {
            for seed in 0..4 {
                for jitter_ms in [3, 10] {
                    let config = SimulationConfig::new(size)
                        .with_black_hole(NodeId(hole))
                        .with_network(jittery(jitter_ms))
                        .with_seed(seed);
                    let report = run(config);
                    assert_eq!(
                        report.verify(),
                        Ok(()),
                        "n={} hole={} seed={} jitter={}ms",
                        size,
                        hole,
                        seed,
                        jitter_ms
                    );
                }
            }
        }
    }
}

#[test]
fn test_ring_without_hole_terminates() {
    for size in 3..=12 {
        for seed in 0..4 {
            for jitter_ms in [0, 3, 10] {
                let config = SimulationConfig::new(size)
                    .with_network(jittery(jitter_ms))
                    .with_seed(seed);
                let report = run(config);

                assert_eq!(
                    report.verify(),
                    Ok(()),
                    "n={} seed={} jitter={}ms",
                    size,
                    seed,
                    jitter_ms
                );
                assert!(report.agents.iter().all(|a| a.outcome.is_some()));
            }
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Trace
// ═══════════════════════════════════════════════════════════════════════════

#[traced_test]
#[test]
fn test_trace_covers_every_event() {
    let config = SimulationConfig::new(8)
        .with_black_hole(NodeId(5))
        .with_network(jittery(4))
        .with_seed(3)
        .with_trace(true);
    let mut runner = SimulationRunner::new(config).unwrap();
    let report = runner.run().unwrap();

    let trace = runner.trace();
    assert_eq!(trace.len() as u64, report.events_processed);
    assert!(trace.windows(2).all(|w| w[0].time <= w[1].time));
    assert_eq!(trace[0].kind, TraceKind::Init);

    let deaths: Vec<_> = trace
        .iter()
        .filter(|e| e.kind == TraceKind::Destroyed)
        .collect();
    assert_eq!(deaths.len(), 1);
    assert_eq!(deaths[0].node, NodeId(5));
    assert!(deaths[0].board.is_empty());
}

#[traced_test]
#[test]
fn test_board_snapshots_are_frozen() {
    let config = SimulationConfig::new(5)
        .with_black_hole(NodeId(3))
        .with_trace(true);
    let mut runner = SimulationRunner::new(config).unwrap();
    runner.run().unwrap();

    // The first entry saw only the first claim on the home board, even
    // though the board kept changing afterwards.
    let first = &runner.trace()[0];
    assert_eq!(first.node, NodeId(0));
    assert_eq!(first.board.len(), 1);
    assert_ne!(
        runner.world().board(NodeId(0)).unwrap().snapshot(),
        first.board
    );
}
