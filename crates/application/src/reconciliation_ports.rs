//! Ports to the directory, organization, assignment, configuration and
//! notification services.

mod assignment;
mod configuration;
mod directory;
mod notification;
mod organization;
mod pagination;

pub use assignment::{
    AssignmentOperationStatus, AssignmentRequest, AssignmentService, OperationState,
    ProvisionedAssignment,
};
pub use configuration::ConfigurationStore;
pub use directory::{DirectoryGroup, DirectoryService};
pub use notification::NotificationSink;
pub use organization::{AccountStatus, OrganizationAccount, OrganizationService};
pub use pagination::{Page, drain_pages};
