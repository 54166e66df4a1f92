use super::*;
use coswarm_core::{TokenUsage, WorkflowId, WorkflowState};
use std::collections::HashMap;

fn sample() -> SessionMetadata {
    SessionMetadata {
        workflow: WorkflowId::new(),
        application: "demo".to_string(),
        coordinator_session_ref: None,
        coordinator_usage: TokenUsage::default(),
        workers: HashMap::new(),
        created_at_millis: 0,
        updated_at_millis: 0,
        state: WorkflowState::Running,
        workflow_completion_status: None,
        workflow_summary: None,
        workflow_completed_at_millis: None,
    }
}

#[test]
fn save_then_load_round_trips() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("metadata.json");
    let meta = sample();
    save(&path, &meta).expect("save");
    let loaded = load(&path).expect("load");
    // Full-struct diff: a mismatch on any field (not just the two
    // checked before) now prints exactly which one instead of a flat
    // "not equal" failure.
    similar_asserts::assert_eq!(loaded, meta);
}

#[test]
fn save_leaves_no_temp_file_behind() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("metadata.json");
    save(&path, &sample()).expect("save");
    assert!(!path.with_extension("json.tmp").exists());
    assert!(path.exists());
}

#[test]
fn try_load_returns_none_for_missing_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("missing.json");
    assert!(try_load(&path).expect("try_load").is_none());
}
