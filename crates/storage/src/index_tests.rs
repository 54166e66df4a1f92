use super::*;
use coswarm_core::{WorkflowId, WorkflowState};

fn entry(workflow: WorkflowId, updated_at: i64) -> IndexEntry {
    IndexEntry {
        workflow,
        application: "demo".to_string(),
        state: WorkflowState::Running,
        created_at_millis: 0,
        updated_at_millis: updated_at,
        total_cost_usd: 0.0,
    }
}

#[test]
fn upsert_replaces_existing_entry_for_the_same_workflow() {
    let workflow = WorkflowId::new();
    let mut index = ApplicationIndex::default();
    index.upsert(entry(workflow, 10));
    index.upsert(entry(workflow, 20));
    assert_eq!(index.entries.len(), 1);
    assert_eq!(index.entries[0].updated_at_millis, 20);
}

#[test]
fn entries_sort_most_recently_updated_first() {
    let mut index = ApplicationIndex::default();
    index.upsert(entry(WorkflowId::new(), 5));
    index.upsert(entry(WorkflowId::new(), 50));
    index.upsert(entry(WorkflowId::new(), 25));
    let timestamps: Vec<i64> = index.entries.iter().map(|e| e.updated_at_millis).collect();
    assert_eq!(timestamps, vec![50, 25, 5]);
}

use yare::parameterized;

#[parameterized(
    already_sorted = { vec![30, 20, 10] },
    reversed = { vec![10, 20, 30] },
    single_entry = { vec![42] },
    duplicate_timestamps = { vec![10, 10, 10] },
)]
fn upsert_keeps_entries_sorted_descending_by_update_time(timestamps: Vec<i64>) {
    let mut index = ApplicationIndex::default();
    for t in &timestamps {
        index.upsert(entry(WorkflowId::new(), *t));
    }
    let observed: Vec<i64> = index.entries.iter().map(|e| e.updated_at_millis).collect();
    let mut expected = timestamps;
    expected.sort_by(|a, b| b.cmp(a));
    assert_eq!(observed, expected);
}

#[test]
fn load_tolerates_a_missing_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    let index = ApplicationIndex::load(&dir.path().join("missing.json"));
    assert!(index.entries.is_empty());
}

#[test]
fn load_tolerates_a_corrupt_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("sessions.json");
    std::fs::write(&path, "{not valid json").expect("write");
    let index = ApplicationIndex::load(&path);
    assert!(index.entries.is_empty());
}

#[test]
fn save_then_load_round_trips() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("sessions.json");
    let mut index = ApplicationIndex::default();
    index.upsert(entry(WorkflowId::new(), 1));
    index.save(&path).expect("save");

    let loaded = ApplicationIndex::load(&path);
    assert_eq!(loaded.entries.len(), 1);
}
