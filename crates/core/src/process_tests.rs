use super::*;

#[test]
fn process_id_helpers_name_roles_consistently() {
    assert_eq!(ProcessId::coordinator().as_str(), "coordinator");
    assert_eq!(ProcessId::worker(1).as_str(), "worker-1");
    assert!(ProcessId::worker(2).is_worker());
    assert!(!ProcessId::coordinator().is_worker());
}

#[test]
fn metrics_replace_context_tokens_but_accumulate_output() {
    let mut metrics = ProcessMetrics::default();
    metrics.record_turn(0.01, 100, 50);
    metrics.record_turn(0.02, 180, 60);
    assert_eq!(metrics.context_tokens, 180);
    assert_eq!(metrics.cumulative_output_tokens, 110);
    assert!((metrics.total_cost_usd - 0.03).abs() < 1e-9);
    assert_eq!(metrics.turn_count, 2);
}

use yare::parameterized;

#[parameterized(
    starting = { ProcessStatus::Starting, true, false },
    running = { ProcessStatus::Running, true, false },
    busy = { ProcessStatus::Busy, true, false },
    idle = { ProcessStatus::Idle, true, false },
    dormant = { ProcessStatus::Dormant, false, false },
    stopping = { ProcessStatus::Stopping, false, false },
    stopped = { ProcessStatus::Stopped, false, true },
    crashed = { ProcessStatus::Crashed, false, true },
)]
fn status_classifies_live_and_terminal_states(status: ProcessStatus, live: bool, terminal: bool) {
    assert_eq!(status.has_live_subprocess(), live);
    assert_eq!(status.is_terminal(), terminal);
}
