use std::collections::HashSet;

use azmirror_core::PrincipalId;

use crate::Assignment;

/// Partition of two assignment sets relative to each other.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssignmentComparison {
    /// Assignments present on the target whose principal is absent from the
    /// original; candidates for removal.
    pub extra_in_target: Vec<Assignment>,
    /// Assignments present on the original whose principal is absent from the
    /// target; candidates for addition.
    pub missing_in_target: Vec<Assignment>,
}

impl AssignmentComparison {
    /// Returns true when both objects hold the same principal-id set.
    #[must_use]
    pub fn is_converged(&self) -> bool {
        self.extra_in_target.is_empty() && self.missing_in_target.is_empty()
    }
}

/// Partitions `original` and `target` assignments by principal membership.
///
/// Membership is tested on principal identifiers only. Output order follows
/// the input order of the respective source list; duplicates survive as the
/// directory returned them.
#[must_use]
pub fn compare_assignments(original: &[Assignment], target: &[Assignment]) -> AssignmentComparison {
    let original_principal_ids: HashSet<PrincipalId> = original
        .iter()
        .map(|assignment| assignment.principal_id)
        .collect();
    let target_principal_ids: HashSet<PrincipalId> = target
        .iter()
        .map(|assignment| assignment.principal_id)
        .collect();

    let extra_in_target = target
        .iter()
        .filter(|assignment| !original_principal_ids.contains(&assignment.principal_id))
        .cloned()
        .collect();
    let missing_in_target = original
        .iter()
        .filter(|assignment| !target_principal_ids.contains(&assignment.principal_id))
        .cloned()
        .collect();

    AssignmentComparison {
        extra_in_target,
        missing_in_target,
    }
}
