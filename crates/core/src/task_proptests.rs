use super::*;
use proptest::prelude::*;

proptest! {
    /// A task parks exactly once it has been assigned past
    /// `MAX_REASSIGNMENTS`, for any number of prior assignments.
    #[test]
    fn parks_iff_reassignment_count_exceeds_the_limit(assignments in 1usize..20) {
        let mut task = Task::builder().build();
        for n in 0..assignments {
            task.assign(ProcessId::worker(n));
        }
        let expected_parked = assignments as u32 > MAX_REASSIGNMENTS;
        prop_assert_eq!(task.status == TaskStatus::Parked, expected_parked);
    }
}
