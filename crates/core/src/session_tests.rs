use super::*;

fn sample_metadata() -> SessionMetadata {
    SessionMetadata {
        workflow: WorkflowId::new(),
        application: "demo".to_string(),
        coordinator_session_ref: None,
        coordinator_usage: TokenUsage { total_cost_usd: 1.5, ..Default::default() },
        workers: {
            let mut map = HashMap::new();
            map.insert(
                "worker-1".to_string(),
                WorkerMetadata {
                    process_id: ProcessId::worker(1),
                    session_ref: None,
                    usage: TokenUsage { total_cost_usd: 0.5, ..Default::default() },
                    started_at_millis: 0,
                    ended_at_millis: None,
                },
            );
            map
        },
        created_at_millis: 0,
        updated_at_millis: 0,
        state: crate::WorkflowState::Running,
        workflow_completion_status: None,
        workflow_summary: None,
        workflow_completed_at_millis: None,
    }
}

#[test]
fn total_cost_sums_coordinator_and_workers() {
    let meta = sample_metadata();
    assert!((meta.total_cost_usd() - 2.0).abs() < 1e-9);
}

#[test]
fn index_entry_derives_from_metadata() {
    let meta = sample_metadata();
    let entry = IndexEntry::from(&meta);
    assert_eq!(entry.application, "demo");
    assert!((entry.total_cost_usd - 2.0).abs() < 1e-9);
}
