use async_trait::async_trait;

use ssosync_core::AppResult;
use ssosync_domain::{Account, OrganizationalUnit};

use super::Page;

/// Lifecycle state of an organization member account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccountStatus {
    /// Account is usable.
    Active,
    /// Account is suspended.
    Suspended,
    /// Account is being closed.
    PendingClosure,
    /// State not recognised by this service.
    Unknown,
}

/// Account as listed by the organization service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrganizationAccount {
    /// Account identifier.
    pub id: Option<String>,
    /// Account name.
    pub name: Option<String>,
    /// Lifecycle state.
    pub status: AccountStatus,
}

impl OrganizationAccount {
    /// Creates an active account listing entry.
    #[must_use]
    pub fn active(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            name: Some(name.into()),
            status: AccountStatus::Active,
        }
    }

    /// Converts the listing entry into an account when it is active and complete.
    #[must_use]
    pub fn into_active_account(self) -> Option<Account> {
        if self.status != AccountStatus::Active {
            return None;
        }

        match (self.id, self.name) {
            (Some(id), Some(name)) => Some(Account::new(id, name)),
            _ => None,
        }
    }
}

/// Port for querying the organization hierarchy.
#[async_trait]
pub trait OrganizationService: Send + Sync {
    /// Lists one page of root identifiers.
    async fn list_roots(&self, next_token: Option<String>) -> AppResult<Page<String>>;

    /// Lists one page of organizational unit identifiers directly below a parent.
    async fn list_child_unit_ids(
        &self,
        parent_id: &str,
        next_token: Option<String>,
    ) -> AppResult<Page<String>>;

    /// Describes one organizational unit, or `None` when the service omits it.
    async fn describe_organizational_unit(
        &self,
        unit_id: &str,
    ) -> AppResult<Option<OrganizationalUnit>>;

    /// Lists one page of organizational units directly below a parent.
    async fn list_units_for_parent(
        &self,
        parent_id: &str,
        next_token: Option<String>,
    ) -> AppResult<Page<OrganizationalUnit>>;

    /// Lists one page of accounts attached directly to a parent.
    async fn list_accounts_for_parent(
        &self,
        parent_id: &str,
        next_token: Option<String>,
    ) -> AppResult<Page<OrganizationAccount>>;

    /// Lists one page of every account in the organization.
    async fn list_accounts(&self, next_token: Option<String>)
    -> AppResult<Page<OrganizationAccount>>;
}
