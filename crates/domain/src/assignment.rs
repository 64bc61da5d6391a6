use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use ssosync_core::AppError;

/// Active member account of the organization.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Account {
    /// Twelve-digit account identifier.
    pub id: String,
    /// Account display name.
    pub name: String,
}

impl Account {
    /// Creates an account projection.
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// Directory group synchronised into the identity store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Group {
    /// Identity store group identifier.
    pub group_id: String,
    /// Group name with the directory domain suffix removed.
    pub group_name: String,
}

impl Group {
    /// Derives a group from its raw directory display name.
    ///
    /// The name is everything before the first `@<domain>` occurrence. Display
    /// names without that suffix produce an empty name, which never matches a
    /// configured binding.
    #[must_use]
    pub fn from_display_name(
        group_id: impl Into<String>,
        display_name: &str,
        domain: &str,
    ) -> Self {
        let suffix = format!("@{domain}");
        let group_name = display_name
            .find(suffix.as_str())
            .map(|index| display_name[..index].to_owned())
            .unwrap_or_default();

        Self {
            group_id: group_id.into(),
            group_name,
        }
    }
}

/// Permission set provisioned on the SSO instance.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PermissionSet {
    /// Stable permission set ARN.
    pub arn: String,
    /// Permission set name referenced by configuration.
    pub name: String,
}

impl PermissionSet {
    /// Creates a permission set projection.
    #[must_use]
    pub fn new(arn: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            arn: arn.into(),
            name: name.into(),
        }
    }
}

/// Kind of principal an assignment grants access to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PrincipalType {
    /// Directory group principal.
    Group,
    /// Individual directory user principal.
    User,
}

impl PrincipalType {
    /// Returns the wire value for this principal type.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Group => "GROUP",
            Self::User => "USER",
        }
    }
}

impl Display for PrincipalType {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl FromStr for PrincipalType {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "GROUP" => Ok(Self::Group),
            "USER" => Ok(Self::User),
            _ => Err(AppError::Validation(format!(
                "unknown principal type '{value}'"
            ))),
        }
    }
}

/// Kind of target an assignment is provisioned to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TargetType {
    /// Member account of the organization.
    AwsAccount,
}

impl TargetType {
    /// Returns the wire value for this target type.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AwsAccount => "AWS_ACCOUNT",
        }
    }
}

/// One (principal, permission set, account) binding.
///
/// Equality and hashing cover every field, so a stale denormalised name makes
/// two otherwise identical bindings distinct.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Assignment {
    /// Permission set ARN.
    pub permission_set_arn: String,
    /// Permission set name.
    pub permission_set_name: String,
    /// Identity store principal identifier.
    pub principal_id: String,
    /// Principal kind.
    pub principal_type: PrincipalType,
    /// Target account identifier.
    pub target_id: String,
    /// Target account name.
    pub account_name: String,
    /// Principal group name.
    pub group_name: String,
}

impl Assignment {
    /// Builds a group assignment from resolved reference data.
    #[must_use]
    pub fn for_group(account: &Account, group: &Group, permission_set: &PermissionSet) -> Self {
        Self {
            permission_set_arn: permission_set.arn.clone(),
            permission_set_name: permission_set.name.clone(),
            principal_id: group.group_id.clone(),
            principal_type: PrincipalType::Group,
            target_id: account.id.clone(),
            account_name: account.name.clone(),
            group_name: group.group_name.clone(),
        }
    }

    /// Returns the target kind, which is always an account.
    #[must_use]
    pub fn target_type(&self) -> TargetType {
        TargetType::AwsAccount
    }
}
