//! Per-run reconciliation context.
//!
//! A `ReconciliationRun` owns every piece of reference data loaded during one
//! reconciliation: accounts, groups, permission sets and resolved OU mappings.
//! Each is loaded at most once, on first use, and the whole context is dropped
//! when the run ends so nothing leaks into the next run.

use std::collections::HashMap;
use std::sync::Arc;

use ssosync_domain::{Account, Group, OuAccountMapping, PermissionSet};

use crate::reconciliation_ports::{AssignmentService, DirectoryService, OrganizationService};

mod current_state;
mod desired_state;
mod hierarchy;
mod reference_data;

/// Reference data and resolution caches scoped to one reconciliation run.
pub struct ReconciliationRun {
    directory: Arc<dyn DirectoryService>,
    organization: Arc<dyn OrganizationService>,
    assignments: Arc<dyn AssignmentService>,
    fan_out: usize,
    accounts: Option<Vec<Account>>,
    groups: Option<Vec<Group>>,
    permission_sets: Option<Vec<PermissionSet>>,
    ou_mappings: HashMap<String, Option<OuAccountMapping>>,
}

impl ReconciliationRun {
    /// Creates an empty run context.
    ///
    /// `fan_out` bounds the concurrent calls made while walking sibling OUs and
    /// describing permission sets. Zero is treated as one.
    #[must_use]
    pub fn new(
        directory: Arc<dyn DirectoryService>,
        organization: Arc<dyn OrganizationService>,
        assignments: Arc<dyn AssignmentService>,
        fan_out: usize,
    ) -> Self {
        Self {
            directory,
            organization,
            assignments,
            fan_out: fan_out.max(1),
            accounts: None,
            groups: None,
            permission_sets: None,
            ou_mappings: HashMap::new(),
        }
    }
}
