//! Domain entities and invariants.

#![forbid(unsafe_code)]

mod apply;
mod assignment;
mod config;
mod diff;
mod hierarchy;
mod notification;
mod trigger;

pub use apply::{ApplyOutcome, AssignmentAction};
pub use assignment::{Account, Assignment, Group, PermissionSet, PrincipalType, TargetType};
pub use config::{AccountAssignments, AssignmentConfig, GroupBinding, OuAssignments};
pub use diff::{ChangePlan, dedupe_assignments, diff_assignments};
pub use hierarchy::{OrganizationalUnit, OuAccountMapping, ROOT_NODE_NAME};
pub use notification::{
    AssignmentNotification, MessageCard, MessageCardFact, MessageCardSection, NotificationKind,
};
pub use trigger::{ORGANIZATION_EVENT_NAMES, ReconcileTrigger};
