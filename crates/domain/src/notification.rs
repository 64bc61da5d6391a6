//! Apply-outcome notifications and their message card rendering.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::{ApplyOutcome, Assignment, AssignmentAction};

const MISSING_VALUE: &str = "N/A";

/// Outcome class of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    /// The change was applied.
    Success,
    /// The change failed or timed out.
    Error,
}

impl NotificationKind {
    /// Returns the card theme color as a hex triplet.
    #[must_use]
    pub fn theme_color(&self) -> &'static str {
        match self {
            Self::Success => "00ff00",
            Self::Error => "ff0000",
        }
    }
}

/// Facts reported for one applied assignment change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignmentNotification {
    /// Applied change.
    pub action: AssignmentAction,
    /// Outcome class.
    pub kind: NotificationKind,
    /// Target account name.
    pub account_name: String,
    /// Target account identifier.
    pub account_id: String,
    /// Permission set name.
    pub permission_set_name: String,
    /// Principal group name.
    pub group_name: String,
    /// Failure reason for error notifications.
    pub failure_reason: Option<String>,
}

impl AssignmentNotification {
    /// Builds the notification for an apply outcome.
    #[must_use]
    pub fn from_outcome(
        action: AssignmentAction,
        assignment: &Assignment,
        outcome: &ApplyOutcome,
    ) -> Self {
        Self {
            action,
            kind: outcome.notification_kind(),
            account_name: or_missing(&assignment.account_name),
            account_id: or_missing(&assignment.target_id),
            permission_set_name: or_missing(&assignment.permission_set_name),
            group_name: or_missing(&assignment.group_name),
            failure_reason: outcome.failure_reason(),
        }
    }

    /// Returns the one-line summary used as card title.
    #[must_use]
    pub fn summary(&self) -> String {
        match self.kind {
            NotificationKind::Success => format!("Successfully {} assignment", self.action.gerund()),
            NotificationKind::Error => format!("Error {} assignment", self.action.gerund()),
        }
    }

    /// Renders the notification as a message card stamped with `sent_at`.
    #[must_use]
    pub fn to_message_card(&self, sent_at: DateTime<Utc>) -> MessageCard {
        let summary = self.summary();
        let mut facts = vec![
            MessageCardFact::new(
                "Account",
                format!("{}({})", self.account_name, self.account_id),
            ),
            MessageCardFact::new("Permission Set", self.permission_set_name.clone()),
            MessageCardFact::new("AD Group", self.group_name.clone()),
        ];
        let activity_text = match (self.kind, self.failure_reason.as_deref()) {
            (NotificationKind::Error, reason) => {
                let reason = reason.unwrap_or(MISSING_VALUE);
                facts.push(MessageCardFact::new("Failure Reason", reason));
                Some(format!("Failure reason: {reason}"))
            }
            (NotificationKind::Success, _) => None,
        };

        MessageCard {
            card_type: "MessageCard".to_owned(),
            context: "http://schema.org/extensions".to_owned(),
            theme_color: self.kind.theme_color().to_owned(),
            summary: summary.clone(),
            sections: vec![MessageCardSection {
                activity_title: summary,
                activity_subtitle: sent_at.to_rfc3339_opts(SecondsFormat::Millis, true),
                activity_text,
                markdown: true,
                facts,
            }],
        }
    }
}

fn or_missing(value: &str) -> String {
    if value.is_empty() {
        MISSING_VALUE.to_owned()
    } else {
        value.to_owned()
    }
}

/// Connector message card payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageCard {
    /// Card type marker.
    #[serde(rename = "@type")]
    pub card_type: String,
    /// Schema context marker.
    #[serde(rename = "@context")]
    pub context: String,
    /// Hex color of the card accent.
    pub theme_color: String,
    /// Summary shown in notification previews.
    pub summary: String,
    /// Card sections.
    pub sections: Vec<MessageCardSection>,
}

/// One message card section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageCardSection {
    /// Section title.
    pub activity_title: String,
    /// Section subtitle, a timestamp.
    pub activity_subtitle: String,
    /// Optional body text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub activity_text: Option<String>,
    /// Enables markdown rendering.
    pub markdown: bool,
    /// Key facts.
    pub facts: Vec<MessageCardFact>,
}

/// One name/value fact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageCardFact {
    /// Fact label.
    pub name: String,
    /// Fact value.
    pub value: String,
}

impl MessageCardFact {
    /// Creates a fact.
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}
