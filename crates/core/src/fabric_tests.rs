use super::*;

#[test]
fn mentions_detects_named_process() {
    let worker = ProcessId::worker(1);
    let msg = FabricMessage::builder().mentions(vec![worker.clone()]).build();
    assert!(msg.mentions(&worker));
    assert!(!msg.mentions(&ProcessId::worker(2)));
}

#[test]
fn named_channel_displays_its_name() {
    let channel = FabricChannel::Named("reviews".to_string());
    assert_eq!(channel.to_string(), "reviews");
    assert_eq!(FabricChannel::Default.to_string(), "default");
}
