use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::NotificationKind;

/// Change applied to one assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssignmentAction {
    /// Provision a missing assignment.
    Create,
    /// Remove an assignment that is no longer desired.
    Delete,
}

impl AssignmentAction {
    /// Returns a stable label for this action.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Delete => "delete",
        }
    }

    /// Returns the progressive verb used in notification titles.
    #[must_use]
    pub fn gerund(&self) -> &'static str {
        match self {
            Self::Create => "creating",
            Self::Delete => "deleting",
        }
    }
}

impl Display for AssignmentAction {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Terminal result of applying one assignment change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ApplyOutcome {
    /// The operation reached the succeeded state.
    Succeeded,
    /// The operation reached the failed state.
    Failed {
        /// Reason reported by the assignment service.
        reason: String,
    },
    /// The operation was still in progress after the poll bound.
    TimedOut {
        /// Number of status checks performed.
        attempts: u32,
    },
}

impl ApplyOutcome {
    /// Returns true for the succeeded outcome.
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Succeeded)
    }

    /// Returns the notification kind reported for this outcome.
    #[must_use]
    pub fn notification_kind(&self) -> NotificationKind {
        match self {
            Self::Succeeded => NotificationKind::Success,
            Self::Failed { .. } | Self::TimedOut { .. } => NotificationKind::Error,
        }
    }

    /// Returns a human-readable failure reason, if any.
    #[must_use]
    pub fn failure_reason(&self) -> Option<String> {
        match self {
            Self::Succeeded => None,
            Self::Failed { reason } => Some(reason.clone()),
            Self::TimedOut { attempts } => Some(format!("timed out after {attempts} status checks")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ApplyOutcome, AssignmentAction};
    use crate::NotificationKind;

    #[test]
    fn timeout_is_reported_as_error() {
        let outcome = ApplyOutcome::TimedOut { attempts: 3 };
        assert_eq!(outcome.notification_kind(), NotificationKind::Error);
        assert_eq!(
            outcome.failure_reason().as_deref(),
            Some("timed out after 3 status checks")
        );
    }

    #[test]
    fn success_has_no_reason() {
        assert!(ApplyOutcome::Succeeded.is_success());
        assert_eq!(ApplyOutcome::Succeeded.failure_reason(), None);
    }

    #[test]
    fn action_labels() {
        assert_eq!(AssignmentAction::Create.gerund(), "creating");
        assert_eq!(AssignmentAction::Delete.to_string(), "delete");
    }
}
