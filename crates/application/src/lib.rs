//! Application services and ports.

#![forbid(unsafe_code)]

mod assignment_applier;
mod assignment_notifier;
mod reconciliation_ports;
mod reconciliation_run;
mod reconciliation_service;

#[cfg(test)]
mod test_support;

pub use assignment_applier::{AppliedChange, ApplyPolicy, AssignmentApplier};
pub use assignment_notifier::AssignmentNotifier;
pub use reconciliation_ports::{
    AccountStatus, AssignmentOperationStatus, AssignmentRequest, AssignmentService,
    ConfigurationStore, DirectoryGroup, DirectoryService, NotificationSink, OperationState,
    OrganizationAccount, OrganizationService, Page, ProvisionedAssignment, drain_pages,
};
pub use reconciliation_run::ReconciliationRun;
pub use reconciliation_service::{
    ReconciliationOutcome, ReconciliationPorts, ReconciliationReport, ReconciliationService,
    ReconciliationSettings,
};
