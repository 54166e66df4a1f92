use super::*;
use coswarm_core::FakeClock;

#[test]
fn a_workflow_past_the_threshold_is_flagged_stuck() {
    let clock = Arc::new(FakeClock::new(0));
    let monitor = HealthMonitor::new(clock.clone(), Duration::from_secs(30));
    let workflow = WorkflowId::new();
    monitor.register(workflow);
    assert_eq!(monitor.status(workflow), HealthStatus::Healthy);

    clock.advance(31_000);
    assert_eq!(monitor.status(workflow), HealthStatus::Stuck);
    assert_eq!(monitor.sweep(), vec![(workflow, RecoveryAction::ReplaceCoordinator, 31_000)]);
}

#[test]
fn observing_an_event_resets_the_heartbeat() {
    let clock = Arc::new(FakeClock::new(0));
    let monitor = HealthMonitor::new(clock.clone(), Duration::from_secs(30));
    let workflow = WorkflowId::new();
    monitor.register(workflow);

    clock.advance(20_000);
    monitor.observe(workflow, &Event::WorkflowStarted { workflow });
    clock.advance(20_000);
    assert_eq!(monitor.status(workflow), HealthStatus::Healthy);
}

#[test]
fn an_unregistered_workflow_is_reported_healthy() {
    let clock = Arc::new(FakeClock::new(0));
    let monitor = HealthMonitor::new(clock, Duration::from_secs(30));
    assert_eq!(monitor.status(WorkflowId::new()), HealthStatus::Healthy);
}

#[tokio::test]
async fn attach_resets_the_heartbeat_from_bus_activity() {
    let clock = Arc::new(FakeClock::new(0));
    let monitor = Arc::new(HealthMonitor::new(clock.clone(), Duration::from_secs(30)));
    let workflow = WorkflowId::new();
    monitor.register(workflow);

    let bus = Arc::new(EventBus::new());
    let join = monitor.attach(workflow, bus.clone());

    clock.advance(20_000);
    bus.publish(Event::WorkflowStarted { workflow });
    // give the forwarding task a chance to run before asserting.
    tokio::task::yield_now().await;
    tokio::time::sleep(Duration::from_millis(10)).await;

    clock.advance(20_000);
    assert_eq!(monitor.status(workflow), HealthStatus::Healthy);

    drop(bus);
    let _ = join.await;
}

use yare::parameterized;

#[parameterized(
    just_under = { 29_999, HealthStatus::Healthy },
    exactly_at = { 30_000, HealthStatus::Stuck },
    well_past = { 90_000, HealthStatus::Stuck },
)]
fn status_flips_to_stuck_at_the_threshold_boundary(elapsed_millis: i64, expected: HealthStatus) {
    let clock = Arc::new(FakeClock::new(0));
    let monitor = HealthMonitor::new(clock.clone(), Duration::from_secs(30));
    let workflow = WorkflowId::new();
    monitor.register(workflow);
    clock.advance(elapsed_millis);
    assert_eq!(monitor.status(workflow), expected);
}
