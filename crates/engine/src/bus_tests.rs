use super::*;
use coswarm_core::WorkflowId;

#[tokio::test]
async fn subscribers_receive_published_events() {
    let bus = EventBus::new();
    let (mut rx, _dropped) = bus.subscribe();
    bus.publish(Event::WorkflowStarted { workflow: WorkflowId::new() });
    let event = rx.recv().await.expect("event");
    assert!(matches!(event, Event::WorkflowStarted { .. }));
}

#[tokio::test]
async fn full_channel_drops_and_counts_instead_of_blocking() {
    let bus = EventBus::new();
    let (_rx, dropped) = bus.subscribe_with_capacity(1);
    bus.publish(Event::WorkflowStarted { workflow: WorkflowId::new() });
    bus.publish(Event::WorkflowCompleted { workflow: WorkflowId::new(), status: None, summary: None });
    assert_eq!(dropped.load(Ordering::Relaxed), 1);
}

#[tokio::test]
async fn dropped_receivers_are_pruned_on_next_publish() {
    let bus = EventBus::new();
    {
        let (_rx, _d) = bus.subscribe();
    }
    assert_eq!(bus.subscriber_count(), 1);
    bus.publish(Event::WorkflowStarted { workflow: WorkflowId::new() });
    assert_eq!(bus.subscriber_count(), 0);
}
