use serde::{Deserialize, Serialize};

use crate::Account;

/// Name given to the synthetic node representing the organization root.
pub const ROOT_NODE_NAME: &str = "root";

/// Organizational unit node.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OrganizationalUnit {
    /// Unit or root identifier.
    pub id: String,
    /// Unit display name.
    pub name: String,
}

impl OrganizationalUnit {
    /// Creates an organizational unit projection.
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// Active accounts found beneath one resolved organizational unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OuAccountMapping {
    /// Requested unit name.
    pub ou_name: String,
    /// Identifier of the first unit matching the name.
    pub ou_id: String,
    /// Active accounts attached to the unit or any descendant unit.
    pub accounts: Vec<Account>,
}

impl OuAccountMapping {
    /// Returns true when no active account was found beneath the unit.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }
}
