use super::*;
use coswarm_adapters::{FakeProvider, ProviderKind};
use coswarm_core::{Event, FakeClock};
use std::sync::Arc;

#[tokio::test]
async fn a_completed_turn_reports_output_to_the_processor() {
    let bus = Arc::new(crate::bus::EventBus::new());
    let clock: Arc<dyn coswarm_core::Clock> = Arc::new(FakeClock::new(0));
    let workflow_id = WorkflowId::new();
    let workflow = coswarm_core::WorkflowInstance::builder().id(workflow_id).build();
    let (handle, processor) = crate::processor::CommandProcessor::spawn(workflow, bus.clone(), clock, |_| {}, 32);
    tokio::spawn(processor.run());

    handle
        .submit(Command::new(
            workflow_id,
            CommandSource::ControlPlane,
            CommandKind::SpawnProcess { role: coswarm_core::ProcessRole::Worker, process: ProcessId::worker(1) },
            0,
        ))
        .await
        .expect("spawn process into state");

    let (mut events, _dropped) = bus.subscribe();
    let _ = events.recv().await.expect("spawned event");

    let provider = Arc::new(FakeProvider::new());
    let worker = ProcessId::worker(1);
    provider.script(
        &worker,
        vec![ProviderEvent::Result { usage: coswarm_core::ProviderUsage { output_tokens: 42, ..Default::default() }, is_error: false }],
    );

    let supervisor = ProcessSupervisor::new(workflow_id, worker.clone(), provider.clone(), handle.clone());
    let config = ProviderConfig::new(worker, ProviderKind::Fake, "/tmp".into(), "go");
    supervisor.run(config).await.expect("run");

    let event = events.recv().await.expect("output recorded event");
    assert!(matches!(event, Event::ProcessOutputRecorded { output_tokens: 42, .. }));
}

#[tokio::test]
async fn a_failed_turn_does_not_commit_the_session_ref_it_captured_at_init() {
    let bus = Arc::new(crate::bus::EventBus::new());
    let clock: Arc<dyn coswarm_core::Clock> = Arc::new(FakeClock::new(0));
    let workflow_id = WorkflowId::new();
    let workflow = coswarm_core::WorkflowInstance::builder().id(workflow_id).build();
    let (handle, processor) = crate::processor::CommandProcessor::spawn(workflow, bus.clone(), clock, |_| {}, 32);
    tokio::spawn(processor.run());

    let worker = ProcessId::worker(1);
    handle
        .submit(Command::new(
            workflow_id,
            CommandSource::ControlPlane,
            CommandKind::SpawnProcess { role: coswarm_core::ProcessRole::Worker, process: worker.clone() },
            0,
        ))
        .await
        .expect("spawn process into state");

    let (mut events, _dropped) = bus.subscribe();
    let _ = events.recv().await.expect("spawned event");

    let provider = Arc::new(FakeProvider::new());
    provider.script(
        &worker,
        vec![
            ProviderEvent::Init { session_ref: "sess-new".to_string(), model: None },
            ProviderEvent::Result { usage: coswarm_core::ProviderUsage::default(), is_error: true },
        ],
    );

    let supervisor = ProcessSupervisor::new(workflow_id, worker.clone(), provider.clone(), handle.clone());
    let config = ProviderConfig::new(worker, ProviderKind::Fake, "/tmp".into(), "go");
    supervisor.run(config).await.expect("run");

    let output = events.recv().await.expect("output recorded event");
    assert!(matches!(output, Event::ProcessOutputRecorded { .. }));
    let crashed = events.recv().await.expect("crashed event");
    assert!(matches!(crashed, Event::ProcessCrashed { .. }), "a failed turn must surface as ProcessCrashed, got {crashed:?}");
}
