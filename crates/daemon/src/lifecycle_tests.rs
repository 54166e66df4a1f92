use super::*;
use coswarm_adapters::FakeProvider;
use coswarm_core::FakeClock;
use std::time::Duration;

fn test_supervisor() -> Supervisor {
    let clock: Arc<dyn Clock> = Arc::new(FakeClock::new(0));
    let provider: Arc<dyn Provider> = Arc::new(FakeProvider::new());
    Supervisor::new(
        Arc::new(ResourceScheduler::new(crate::scheduler::SchedulerLimits::default())),
        Arc::new(HealthMonitor::new(clock.clone(), Duration::from_secs(60))),
        Arc::new(CrossWorkflowEventBus::new(64)),
        clock,
        provider,
    )
}

#[tokio::test]
async fn starting_then_stopping_a_workflow_removes_it_from_the_registry() {
    let supervisor = test_supervisor();
    let workflow = WorkflowInstance::builder().build();
    let workflow_id = supervisor.start(workflow).expect("start");
    assert!(supervisor.registry().get(workflow_id).is_some());

    supervisor.stop(workflow_id, StopOptions::default()).await.expect("stop");
    assert!(supervisor.registry().get(workflow_id).is_none());
}

#[tokio::test]
async fn stopping_an_unknown_workflow_is_a_no_op() {
    let supervisor = test_supervisor();
    supervisor.stop(WorkflowId::new(), StopOptions::default()).await.expect("stop is a no-op");
}

#[tokio::test]
async fn a_stuck_workflow_gets_its_coordinator_replaced_on_sweep() {
    let fake_clock = Arc::new(FakeClock::new(0));
    let clock: Arc<dyn Clock> = fake_clock.clone();
    let provider: Arc<dyn Provider> = Arc::new(FakeProvider::new());
    let health = Arc::new(HealthMonitor::new(clock.clone(), Duration::from_secs(30)));
    let supervisor = Supervisor::new(
        Arc::new(ResourceScheduler::new(crate::scheduler::SchedulerLimits::default())),
        health,
        Arc::new(CrossWorkflowEventBus::new(64)),
        clock,
        provider,
    );
    let workflow = WorkflowInstance::builder().build();
    let workflow_id = supervisor.start(workflow).expect("start");

    let engine = supervisor.registry().get(workflow_id).expect("registered");
    let (mut events, _dropped) = engine.bus.subscribe();
    engine
        .handle
        .submit(coswarm_core::Command::new(
            workflow_id,
            coswarm_core::CommandSource::ControlPlane,
            coswarm_core::CommandKind::SpawnProcess { role: coswarm_core::ProcessRole::Coordinator, process: coswarm_core::ProcessId::coordinator() },
            0,
        ))
        .await
        .expect("spawn coordinator");
    let _ = events.recv().await.expect("spawned event");

    fake_clock.advance(31_000);
    supervisor.run_recovery_sweep().await;
    let mut saw_stuck = false;
    let mut saw_replacement = false;
    while let Ok(Some(event)) = tokio::time::timeout(Duration::from_millis(200), events.recv()).await {
        match event {
            coswarm_core::Event::ProcessStuck { idle_for_millis, .. } => {
                saw_stuck = true;
                assert!(idle_for_millis >= 31_000);
            }
            coswarm_core::Event::ProcessReplaced { .. } => {
                saw_replacement = true;
                break;
            }
            _ => {}
        }
    }
    assert!(saw_stuck, "expected a ProcessStuck event ahead of the replacement");
    assert!(saw_replacement, "expected a ProcessReplaced event after the stuck sweep");
}

#[tokio::test]
async fn admission_denial_prevents_registration() {
    let clock: Arc<dyn Clock> = Arc::new(FakeClock::new(0));
    let provider: Arc<dyn Provider> = Arc::new(FakeProvider::new());
    let scheduler = Arc::new(ResourceScheduler::new(crate::scheduler::SchedulerLimits { max_workflows: 0, ..Default::default() }));
    let supervisor = Supervisor::new(
        scheduler,
        Arc::new(HealthMonitor::new(clock.clone(), Duration::from_secs(60))),
        Arc::new(CrossWorkflowEventBus::new(64)),
        clock,
        provider,
    );
    let result = supervisor.start(WorkflowInstance::builder().build());
    assert!(matches!(result, Err(OrchestratorError::AdmissionDenied { .. })));
}
