use super::*;
use coswarm_core::{CommandSource, FakeClock, ProcessId, ProcessRole, WorkflowInstance};

fn spawn_processor(workflow_id: coswarm_core::WorkflowId) -> (CommandProcessorHandle, tokio::task::JoinHandle<()>, Arc<EventBus>) {
    let bus = Arc::new(EventBus::new());
    let clock: Arc<dyn Clock> = Arc::new(FakeClock::new(0));
    let workflow = WorkflowInstance::builder().id(workflow_id).build();
    let (handle, processor) = CommandProcessor::spawn(workflow, bus.clone(), clock, |_effects| {}, 32);
    let join = tokio::spawn(processor.run());
    (handle, join, bus)
}

#[tokio::test]
async fn commands_apply_in_fifo_order() {
    let workflow_id = coswarm_core::WorkflowId::new();
    let (handle, _join, bus) = spawn_processor(workflow_id);
    let (mut events, _dropped) = bus.subscribe();

    handle
        .submit(Command::new(workflow_id, CommandSource::ControlPlane, coswarm_core::CommandKind::StartWorkflow, 0))
        .await
        .expect("submit");
    handle
        .submit(Command::new(
            workflow_id,
            CommandSource::ControlPlane,
            coswarm_core::CommandKind::SpawnProcess { role: ProcessRole::Coordinator, process: ProcessId::coordinator() },
            0,
        ))
        .await
        .expect("submit");

    let first = events.recv().await.expect("first");
    assert!(matches!(first, Event::WorkflowStarted { .. }));
    let second = events.recv().await.expect("second");
    assert!(matches!(second, Event::ProcessSpawned { .. }));
}

#[tokio::test]
async fn submit_and_wait_returns_the_error_for_an_invalid_command() {
    let workflow_id = coswarm_core::WorkflowId::new();
    let (handle, _join, _bus) = spawn_processor(workflow_id);
    let result = handle
        .submit_and_wait(
            Command::new(workflow_id, CommandSource::Process(ProcessId::worker(1)), coswarm_core::CommandKind::StopWorkflow { reason: None }, 0),
            std::time::Duration::from_secs(1),
        )
        .await;
    assert!(matches!(result, Err(OrchestratorError::ValidationFailed(_))));
}

#[tokio::test]
async fn submit_and_wait_returns_effects_for_a_valid_command() {
    let workflow_id = coswarm_core::WorkflowId::new();
    let (handle, _join, _bus) = spawn_processor(workflow_id);
    let effects = handle
        .submit_and_wait(
            Command::new(
                workflow_id,
                CommandSource::ControlPlane,
                coswarm_core::CommandKind::SpawnProcess { role: ProcessRole::Worker, process: ProcessId::worker(1) },
                0,
            ),
            std::time::Duration::from_secs(1),
        )
        .await
        .expect("apply");
    assert!(effects.iter().any(|e| matches!(e, Effect::SpawnProcess { .. })));
}
