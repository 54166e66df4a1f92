use super::*;

fn sample_layout() -> SessionLayout {
    SessionLayout::new(
        "/var/coswarm/sessions",
        "demo-app",
        NaiveDate::from_ymd_opt(2026, 8, 1).expect("valid date"),
        WorkflowId::from_string("wkfl00000000000000000"),
    )
}

#[test]
fn root_nests_by_application_then_date_then_session() {
    let layout = sample_layout();
    assert_eq!(
        layout.root(),
        PathBuf::from("/var/coswarm/sessions/demo-app/2026-08-01/wkfl00000000000000000")
    );
}

#[test]
fn transcript_for_routes_by_role() {
    let layout = sample_layout();
    assert!(layout.transcript_for(&ProcessId::coordinator()).ends_with("coordinator/raw.jsonl"));
    assert!(layout.transcript_for(&ProcessId::worker(1)).ends_with("workers/worker-1/raw.jsonl"));
    assert!(layout.transcript_for(&ProcessId::observer()).ends_with("observer/raw.jsonl"));
}

#[test]
fn application_index_path_is_per_application() {
    let path = SessionLayout::application_index_path(Path::new("/var/coswarm/sessions"), "demo-app");
    assert_eq!(path, PathBuf::from("/var/coswarm/sessions/demo-app/sessions.json"));
}
