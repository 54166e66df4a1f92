use super::*;

#[tokio::test]
async fn spawn_replays_scripted_events_in_order() {
    let provider = FakeProvider::new();
    let process = ProcessId::coordinator();
    provider.script(
        &process,
        vec![
            ProviderEvent::Init { session_ref: "sess-1".to_string(), model: None },
            ProviderEvent::Result { usage: Default::default(), is_error: false },
        ],
    );
    let (tx, mut rx) = mpsc::channel(8);
    let config = ProviderConfig::new(process, crate::provider::ProviderKind::Fake, "/tmp".into(), "hi");
    let _handle = provider.spawn(config, tx).await.expect("spawn");

    let first = rx.recv().await.expect("first event");
    assert!(matches!(first, ProviderEvent::Init { .. }));
    let second = rx.recv().await.expect("second event");
    assert!(second.ends_turn());
}

#[tokio::test]
async fn send_and_cancel_are_recorded() {
    let provider = FakeProvider::new();
    let process = ProcessId::worker(1);
    let (tx, _rx) = mpsc::channel(8);
    let config = ProviderConfig::new(process, crate::provider::ProviderKind::Fake, "/tmp".into(), "hi");
    let handle = provider.spawn(config, tx).await.expect("spawn");

    handle.send("do the thing").await.expect("send");
    handle.cancel().await.expect("cancel");

    assert_eq!(
        provider.calls(),
        vec![RecordedCall::Send("do the thing".to_string()), RecordedCall::Cancel]
    );
}
