use super::*;
use proptest::prelude::*;

proptest! {
    /// Whatever the cap, exactly that many workflows are admitted
    /// before the scheduler starts rejecting.
    #[test]
    fn admits_exactly_the_cap_before_rejecting(cap in 1usize..50) {
        let scheduler = ResourceScheduler::new(SchedulerLimits { max_workflows: cap, ..Default::default() });
        for _ in 0..cap {
            prop_assert!(scheduler.admit_workflow(WorkflowId::new()).is_ok());
        }
        let rejected = matches!(scheduler.admit_workflow(WorkflowId::new()), Err(OrchestratorError::AdmissionDenied { .. }));
        prop_assert!(rejected);
    }
}
