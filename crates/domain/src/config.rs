//! Declarative assignment document.
//!
//! The document is stored as JSON with PascalCase keys. All three scope
//! arrays are optional; an absent or `null` array contributes nothing.

use serde::{Deserialize, Deserializer, Serialize};
use ssosync_core::{AppError, AppResult, NonEmptyString};

/// One group to permission set binding.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GroupBinding {
    /// Directory group name without the domain suffix.
    pub ad_group_name: String,
    /// Permission set name.
    pub permission_set: String,
}

impl GroupBinding {
    /// Creates a binding.
    #[must_use]
    pub fn new(ad_group_name: impl Into<String>, permission_set: impl Into<String>) -> Self {
        Self {
            ad_group_name: ad_group_name.into(),
            permission_set: permission_set.into(),
        }
    }
}

/// Bindings applied to every account under an organizational unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct OuAssignments {
    /// Organizational unit name.
    pub ou_name: String,
    /// Bindings for the unit.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub assignments: Vec<GroupBinding>,
}

/// Bindings applied to a single account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AccountAssignments {
    /// Account name.
    pub account_name: String,
    /// Bindings for the account.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub assignments: Vec<GroupBinding>,
}

/// Desired-state configuration for one reconciliation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AssignmentConfig {
    /// Directory domain stripped from group display names.
    pub ad_domain: String,
    /// Bindings applied to every active account.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub global_assignments: Vec<GroupBinding>,
    /// Bindings applied per organizational unit.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub ou_assignments: Vec<OuAssignments>,
    /// Bindings applied per account.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub account_assignments: Vec<AccountAssignments>,
}

impl AssignmentConfig {
    /// Parses and validates a JSON configuration document.
    pub fn parse(document: &str) -> AppResult<Self> {
        let config = serde_json::from_str::<Self>(document).map_err(|error| {
            AppError::Validation(format!("invalid assignment configuration: {error}"))
        })?;
        NonEmptyString::new(config.ad_domain.as_str()).map_err(|_| {
            AppError::Validation("assignment configuration requires AdDomain".to_owned())
        })?;

        Ok(config)
    }

    /// Returns the total number of configured bindings across all scopes.
    #[must_use]
    pub fn binding_count(&self) -> usize {
        self.global_assignments.len()
            + self
                .ou_assignments
                .iter()
                .map(|entry| entry.assignments.len())
                .sum::<usize>()
            + self
                .account_assignments
                .iter()
                .map(|entry| entry.assignments.len())
                .sum::<usize>()
    }
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::{AssignmentConfig, GroupBinding};

    #[test]
    fn parses_full_document() {
        let document = r#"{
            "AdDomain": "corp.example",
            "GlobalAssignments": [{ "AdGroupName": "CLOUD-ADMINS", "PermissionSet": "Admin" }],
            "OuAssignments": [{
                "OuName": "Finance",
                "Assignments": [{ "AdGroupName": "FIN-OPS", "PermissionSet": "Operator" }]
            }],
            "AccountAssignments": [{
                "AccountName": "security",
                "Assignments": [{ "AdGroupName": "SEC-AUDIT", "PermissionSet": "Audit" }]
            }]
        }"#;

        let config = AssignmentConfig::parse(document)
            .unwrap_or_else(|error| panic!("unexpected error: {error}"));

        assert_eq!(config.ad_domain, "corp.example");
        assert_eq!(
            config.global_assignments,
            vec![GroupBinding::new("CLOUD-ADMINS", "Admin")]
        );
        assert_eq!(config.ou_assignments[0].ou_name, "Finance");
        assert_eq!(config.account_assignments[0].account_name, "security");
        assert_eq!(config.binding_count(), 3);
    }

    #[test]
    fn missing_and_null_scopes_default_to_empty() {
        let config =
            AssignmentConfig::parse(r#"{ "AdDomain": "corp.example", "OuAssignments": null }"#)
                .unwrap_or_else(|error| panic!("unexpected error: {error}"));

        assert!(config.global_assignments.is_empty());
        assert!(config.ou_assignments.is_empty());
        assert!(config.account_assignments.is_empty());
        assert_eq!(config.binding_count(), 0);
    }

    #[test]
    fn blank_domain_is_rejected() {
        assert!(AssignmentConfig::parse(r#"{ "AdDomain": "  " }"#).is_err());
    }

    #[test]
    fn malformed_json_is_rejected() {
        assert!(AssignmentConfig::parse("{ not json").is_err());
        assert!(AssignmentConfig::parse(r#"{ "GlobalAssignments": [] }"#).is_err());
    }
}
