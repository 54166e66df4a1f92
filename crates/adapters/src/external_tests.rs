use super::*;

#[test]
fn enqueue_task_tool_call_maps_to_command() {
    let request = ToolCallRequest {
        id: "1".to_string(),
        tool: "enqueue_task".to_string(),
        arguments: serde_json::json!({"description": "write docs"}),
    };
    let command = tool_call_to_command(WorkflowId::new(), &request, 0).expect("maps");
    assert!(matches!(command.kind, CommandKind::EnqueueTask { .. }));
    assert_eq!(command.source, CommandSource::ExternalAdapter);
}

#[test]
fn missing_required_argument_is_malformed() {
    let request = ToolCallRequest { id: "1".to_string(), tool: "enqueue_task".to_string(), arguments: serde_json::json!({}) };
    let err = tool_call_to_command(WorkflowId::new(), &request, 0).unwrap_err();
    assert!(matches!(err, ExternalAdapterError::Malformed(_)));
}

#[test]
fn unknown_tool_is_rejected() {
    let request = ToolCallRequest { id: "1".to_string(), tool: "launch_missiles".to_string(), arguments: serde_json::json!({}) };
    let err = tool_call_to_command(WorkflowId::new(), &request, 0).unwrap_err();
    assert!(matches!(err, ExternalAdapterError::UnknownTool(_)));
}

#[test]
fn response_serializes_without_the_unset_field() {
    let resp = ToolCallResponse::ok("1".to_string(), serde_json::json!({"ok": true}));
    let json = serde_json::to_value(&resp).expect("serialize");
    assert!(json.get("error").is_none());
}

fn request(tool: &str, arguments: serde_json::Value) -> ToolCallRequest {
    ToolCallRequest { id: "1".to_string(), tool: tool.to_string(), arguments }
}

#[test]
fn assign_task_maps_to_command() {
    let req = request("assign_task", serde_json::json!({"task": "task-1", "worker": "worker-1"}));
    let command = tool_call_to_command(WorkflowId::new(), &req, 0).expect("maps");
    assert!(matches!(command.kind, CommandKind::AssignTask { .. }));
}

#[test]
fn mark_task_complete_and_failed_report_opposite_outcomes() {
    let wf = WorkflowId::new();
    let complete = request("mark_task_complete", serde_json::json!({"task": "task-1"}));
    let failed = request("mark_task_failed", serde_json::json!({"task": "task-1"}));
    match tool_call_to_command(wf, &complete, 0).expect("maps").kind {
        CommandKind::ReportTaskResult { success, .. } => assert!(success),
        other => panic!("unexpected kind: {other:?}"),
    }
    match tool_call_to_command(wf, &failed, 0).expect("maps").kind {
        CommandKind::ReportTaskResult { success, .. } => assert!(!success),
        other => panic!("unexpected kind: {other:?}"),
    }
}

#[test]
fn send_to_worker_rejects_a_non_worker_target() {
    let req = request("send_to_worker", serde_json::json!({"to": "coordinator", "body": "go"}));
    let err = tool_call_to_action(WorkflowId::new(), &req, 0).unwrap_err();
    assert!(matches!(err, ExternalAdapterError::Malformed(_)));
}

#[test]
fn send_to_worker_accepts_a_worker_target() {
    let req = request("send_to_worker", serde_json::json!({"to": "worker-1", "body": "go"}));
    let action = tool_call_to_action(WorkflowId::new(), &req, 0).expect("maps");
    assert!(matches!(action, AdapterAction::Submit(_)));
}

#[test]
fn read_only_tools_resolve_to_queries_not_commands() {
    let wf = WorkflowId::new();
    let cases = [
        request("get_task_status", serde_json::json!({"task": "task-1"})),
        request("list_workers", serde_json::json!({})),
        request("read_message_log", serde_json::json!({"process": "worker-1"})),
        request("fabric_inbox", serde_json::json!({"subscriber": "worker-1"})),
        request("fabric_history", serde_json::json!({})),
    ];
    for req in cases {
        let action = tool_call_to_action(wf, &req, 0).unwrap_or_else(|e| panic!("{} should map: {e}", req.tool));
        assert!(matches!(action, AdapterAction::Answer(_)), "{} should be a query", req.tool);
        let err = tool_call_to_command(wf, &req, 0).unwrap_err();
        assert!(matches!(err, ExternalAdapterError::Malformed(_)));
    }
}

#[test]
fn signal_workflow_complete_carries_status_and_summary() {
    let req = request(
        "signal_workflow_complete",
        serde_json::json!({"status": "partial", "summary": "3 of 5 tasks", "tasks_closed": 3}),
    );
    let command = tool_call_to_command(WorkflowId::new(), &req, 0).expect("maps");
    match command.kind {
        CommandKind::SignalWorkflowComplete { status, summary, tasks_closed } => {
            assert_eq!(status, coswarm_core::CompletionStatus::Partial);
            assert_eq!(summary, "3 of 5 tasks");
            assert_eq!(tasks_closed, 3);
        }
        other => panic!("unexpected kind: {other:?}"),
    }
}

#[test]
fn signal_workflow_complete_rejects_an_unknown_status() {
    let req = request("signal_workflow_complete", serde_json::json!({"status": "vibes"}));
    let err = tool_call_to_command(WorkflowId::new(), &req, 0).unwrap_err();
    assert!(matches!(err, ExternalAdapterError::Malformed(_)));
}

#[test]
fn fabric_send_posts_to_the_default_channel() {
    let req = request("fabric_send", serde_json::json!({"body": "status update"}));
    let command = tool_call_to_command(WorkflowId::new(), &req, 0).expect("maps");
    match command.kind {
        CommandKind::PostFabricMessage(msg) => assert_eq!(msg.channel, FabricChannel::Default),
        other => panic!("unexpected kind: {other:?}"),
    }
}

#[test]
fn fabric_reply_without_reply_to_is_malformed() {
    let req = request("fabric_reply", serde_json::json!({"body": "no parent"}));
    let err = tool_call_to_command(WorkflowId::new(), &req, 0).unwrap_err();
    assert!(matches!(err, ExternalAdapterError::Malformed(_)));
}

#[test]
fn fabric_reply_with_reply_to_maps_to_fabric_reply_command() {
    let req = request("fabric_reply", serde_json::json!({"body": "ack", "reply_to": "fabricmsg-1"}));
    let command = tool_call_to_command(WorkflowId::new(), &req, 0).expect("maps");
    assert!(matches!(command.kind, CommandKind::FabricReply(_)));
}

#[test]
fn fabric_attach_without_attachments_is_malformed() {
    let req = request("fabric_attach", serde_json::json!({"body": "see attached"}));
    let err = tool_call_to_command(WorkflowId::new(), &req, 0).unwrap_err();
    assert!(matches!(err, ExternalAdapterError::Malformed(_)));
}

#[test]
fn fabric_attach_with_attachments_posts_a_fabric_message() {
    let req = request("fabric_attach", serde_json::json!({"body": "see attached", "attachments": ["report.pdf"]}));
    let command = tool_call_to_command(WorkflowId::new(), &req, 0).expect("maps");
    assert!(matches!(command.kind, CommandKind::PostFabricMessage(_)));
}

#[test]
fn fabric_subscribe_establishes_an_empty_ack_cursor() {
    let req = request("fabric_subscribe", serde_json::json!({"subscriber": "worker-1"}));
    let command = tool_call_to_command(WorkflowId::new(), &req, 0).expect("maps");
    match command.kind {
        CommandKind::FabricAck { ids, .. } => assert!(ids.is_empty()),
        other => panic!("unexpected kind: {other:?}"),
    }
}

#[test]
fn fabric_ack_maps_requested_ids() {
    let req = request("fabric_ack", serde_json::json!({"subscriber": "worker-1", "ids": ["fabricmsg-1", "fabricmsg-2"]}));
    let command = tool_call_to_command(WorkflowId::new(), &req, 0).expect("maps");
    match command.kind {
        CommandKind::FabricAck { ids, .. } => assert_eq!(ids.len(), 2),
        other => panic!("unexpected kind: {other:?}"),
    }
}

#[test]
fn report_review_verdict_maps_approval_to_success() {
    let wf = WorkflowId::new();
    let approved = request("report_review_verdict", serde_json::json!({"task": "task-1", "approved": true}));
    let rejected = request("report_review_verdict", serde_json::json!({"task": "task-1", "approved": false}));
    match tool_call_to_command(wf, &approved, 0).expect("maps").kind {
        CommandKind::ReportTaskResult { success, .. } => assert!(success),
        other => panic!("unexpected kind: {other:?}"),
    }
    match tool_call_to_command(wf, &rejected, 0).expect("maps").kind {
        CommandKind::ReportTaskResult { success, .. } => assert!(!success),
        other => panic!("unexpected kind: {other:?}"),
    }
}

#[test]
fn replace_worker_and_signal_ready_map_to_their_commands() {
    let wf = WorkflowId::new();
    let replace = request("replace_worker", serde_json::json!({"worker": "worker-1"}));
    assert!(matches!(tool_call_to_command(wf, &replace, 0).expect("maps").kind, CommandKind::ReplaceProcess { .. }));

    let ready = request("signal_ready", serde_json::json!({"process": "worker-1"}));
    assert!(matches!(tool_call_to_command(wf, &ready, 0).expect("maps").kind, CommandKind::DeliverQueued { .. }));
}
