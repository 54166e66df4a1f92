use super::*;
use coswarm_core::ProcessRole;

#[test]
fn message_repo_delivers_fifo_per_process() {
    let mut repo = MessageRepo::default();
    let worker = ProcessId::worker(1);
    repo.push(QueuedMessage::builder().to(worker.clone()).body("first").build());
    repo.push(QueuedMessage::builder().to(worker.clone()).body("second").build());

    let first = repo.pop_next(&worker).expect("first message");
    assert_eq!(first.body, "first");
    let second = repo.pop_next(&worker).expect("second message");
    assert_eq!(second.body, "second");
    assert!(repo.pop_next(&worker).is_none());
}

#[test]
fn process_repo_round_trips_by_id() {
    let mut repo = ProcessRepo::default();
    let workflow = coswarm_core::WorkflowId::new();
    let process = Process {
        id: ProcessId::coordinator(),
        workflow,
        role: ProcessRole::Coordinator,
        status: coswarm_core::ProcessStatus::Starting,
        session_ref: None,
        metrics: Default::default(),
        started_at_millis: 0,
        last_activity_millis: 0,
        current_task: None,
    };
    repo.insert(process);
    assert!(repo.get(&ProcessId::coordinator()).is_some());
    assert_eq!(repo.len(), 1);
    repo.remove(&ProcessId::coordinator());
    assert!(repo.is_empty());
}
