use super::*;

#[test]
fn stop_and_drain_require_a_privileged_source() {
    let stop = Command::new(WorkflowId::new(), CommandSource::Operator, CommandKind::StopWorkflow { reason: None }, 0);
    assert!(stop.requires_privileged_source());
    assert!(stop.is_privileged());

    let worker_stop = Command::new(
        WorkflowId::new(),
        CommandSource::Process(ProcessId::worker(1)),
        CommandKind::StopWorkflow { reason: None },
        0,
    );
    assert!(worker_stop.requires_privileged_source());
    assert!(!worker_stop.is_privileged());
}

#[test]
fn enqueue_task_is_not_privileged() {
    let cmd = Command::new(
        WorkflowId::new(),
        CommandSource::Process(ProcessId::coordinator()),
        CommandKind::EnqueueTask { description: "write tests".to_string() },
        0,
    );
    assert!(!cmd.requires_privileged_source());
}
