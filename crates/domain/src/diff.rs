use std::collections::HashSet;

use crate::Assignment;

/// Returns the assignments of `left` with no structurally equal counterpart in `right`.
///
/// Order of `left` is preserved. Matching is exact over every field, without
/// case or whitespace normalisation.
#[must_use]
pub fn diff_assignments(left: &[Assignment], right: &[Assignment]) -> Vec<Assignment> {
    let right: HashSet<&Assignment> = right.iter().collect();
    left.iter()
        .filter(|assignment| !right.contains(assignment))
        .cloned()
        .collect()
}

/// Removes repeated assignments, keeping the first occurrence of each.
#[must_use]
pub fn dedupe_assignments(assignments: Vec<Assignment>) -> Vec<Assignment> {
    let mut seen = HashSet::with_capacity(assignments.len());
    assignments
        .into_iter()
        .filter(|assignment| seen.insert(assignment.clone()))
        .collect()
}

/// Creates and deletes required to converge current state onto desired state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangePlan {
    /// Desired assignments missing from current state.
    pub to_create: Vec<Assignment>,
    /// Current assignments not present in desired state.
    pub to_delete: Vec<Assignment>,
}

impl ChangePlan {
    /// Computes the plan from desired and current assignment lists.
    #[must_use]
    pub fn between(desired: &[Assignment], current: &[Assignment]) -> Self {
        Self {
            to_create: diff_assignments(desired, current),
            to_delete: diff_assignments(current, desired),
        }
    }

    /// Returns true when no change is required.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.to_create.is_empty() && self.to_delete.is_empty()
    }
}
