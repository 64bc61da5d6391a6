use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Organization API calls that can change which accounts an OU binding reaches.
pub const ORGANIZATION_EVENT_NAMES: &[&str] = &[
    "CreateAccount",
    "CloseAccount",
    "MoveAccount",
    "CreateOrganizationalUnit",
    "DeleteOrganizationalUnit",
    "UpdateOrganizationalUnit",
    "RemoveAccountFromOrganization",
];

/// Event that caused a reconciliation run.
///
/// The classification is informational; every trigger runs the same full
/// reconciliation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ReconcileTrigger {
    /// Organization structure changed.
    OrganizationChange {
        /// API call reported by the organization audit trail.
        event_name: String,
    },
    /// The stored assignment configuration changed.
    ConfigurationChange {
        /// Name of the changed parameter, when reported.
        parameter_name: Option<String>,
    },
    /// Periodic or manual run without an originating event.
    Scheduled,
    /// Any other event source.
    Other {
        /// Reported event source.
        source: String,
    },
}

impl ReconcileTrigger {
    /// Classifies an event envelope carrying `source`, `detail-type` and `detail`.
    #[must_use]
    pub fn from_event(event: &Value) -> Self {
        let source = event.get("source").and_then(Value::as_str).unwrap_or_default();
        let detail = event.get("detail");

        match source {
            "aws.organizations" => {
                let event_name = detail
                    .and_then(|detail| detail.get("eventName"))
                    .and_then(Value::as_str)
                    .unwrap_or_default();
                if ORGANIZATION_EVENT_NAMES.contains(&event_name) {
                    Self::OrganizationChange {
                        event_name: event_name.to_owned(),
                    }
                } else {
                    Self::Other {
                        source: source.to_owned(),
                    }
                }
            }
            "aws.ssm" => Self::ConfigurationChange {
                parameter_name: detail
                    .and_then(|detail| detail.get("name"))
                    .and_then(Value::as_str)
                    .map(str::to_owned),
            },
            "aws.events" | "" => Self::Scheduled,
            other => Self::Other {
                source: other.to_owned(),
            },
        }
    }

    /// Returns the event source this trigger was classified from.
    #[must_use]
    pub fn source(&self) -> &str {
        match self {
            Self::OrganizationChange { .. } => "aws.organizations",
            Self::ConfigurationChange { .. } => "aws.ssm",
            Self::Scheduled => "aws.events",
            Self::Other { source } => source.as_str(),
        }
    }
}

impl Display for ReconcileTrigger {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::OrganizationChange { event_name } => {
                write!(formatter, "organization change ({event_name})")
            }
            Self::ConfigurationChange {
                parameter_name: Some(name),
            } => write!(formatter, "configuration change ({name})"),
            Self::ConfigurationChange {
                parameter_name: None,
            } => formatter.write_str("configuration change"),
            Self::Scheduled => formatter.write_str("scheduled"),
            Self::Other { source } => write!(formatter, "event from {source}"),
        }
    }
}
