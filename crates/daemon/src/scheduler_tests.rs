use super::*;
use std::sync::Arc;

#[test]
fn admits_up_to_the_workflow_cap_then_rejects() {
    let scheduler = ResourceScheduler::new(SchedulerLimits { max_workflows: 2, ..Default::default() });
    assert!(scheduler.admit_workflow(WorkflowId::new()).is_ok());
    assert!(scheduler.admit_workflow(WorkflowId::new()).is_ok());
    assert!(matches!(scheduler.admit_workflow(WorkflowId::new()), Err(OrchestratorError::AdmissionDenied { .. })));
}

#[test]
fn releasing_a_workflow_frees_its_worker_slots() {
    let scheduler = ResourceScheduler::new(SchedulerLimits { max_workers_per_workflow: 1, ..Default::default() });
    let workflow = WorkflowId::new();
    scheduler.admit_worker(workflow).expect("first worker");
    assert!(matches!(scheduler.admit_worker(workflow), Err(OrchestratorError::AdmissionDenied { .. })));

    scheduler.release_workflow(workflow);
    assert!(scheduler.admit_worker(workflow).is_ok());
}

#[test]
fn tokens_beyond_the_period_budget_are_rejected() {
    let scheduler = ResourceScheduler::new(SchedulerLimits { tokens_per_period_budget: 100, ..Default::default() });
    let workflow = WorkflowId::new();
    scheduler.record_tokens(workflow, 60).expect("under budget");
    assert!(matches!(scheduler.record_tokens(workflow, 60), Err(OrchestratorError::AdmissionDenied { .. })));
    scheduler.reset_period();
    assert!(scheduler.record_tokens(workflow, 60).is_ok());
}

#[test]
fn resource_scheduler_is_usable_as_an_admission_control_trait_object() {
    let scheduler: Arc<dyn AdmissionControl> = Arc::new(ResourceScheduler::new(SchedulerLimits { max_workers_per_workflow: 1, ..Default::default() }));
    let workflow = WorkflowId::new();
    scheduler.admit_worker(workflow).expect("first worker");
    assert!(matches!(scheduler.admit_worker(workflow), Err(OrchestratorError::AdmissionDenied { .. })));
    scheduler.release_worker(workflow);
    assert!(scheduler.admit_worker(workflow).is_ok());
}
