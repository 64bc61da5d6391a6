use futures::{StreamExt, TryStreamExt, stream};
use tracing::{debug, info};

use ssosync_core::AppResult;
use ssosync_domain::{Account, Group, PermissionSet};

use crate::reconciliation_ports::{OrganizationAccount, drain_pages};

use super::ReconciliationRun;

impl ReconciliationRun {
    /// Loads every active account once per run.
    pub async fn load_accounts(&mut self) -> AppResult<&[Account]> {
        if self.accounts.is_none() {
            let listed = drain_pages(|token| self.organization.list_accounts(token)).await?;
            let accounts: Vec<Account> = listed
                .into_iter()
                .filter_map(OrganizationAccount::into_active_account)
                .collect();
            info!(account_count = accounts.len(), "loaded active accounts");
            self.accounts = Some(accounts);
        }

        Ok(self.accounts())
    }

    /// Loads directory groups once per run, deriving names with `domain`.
    ///
    /// Later calls return the cached groups regardless of `domain`.
    pub async fn load_groups(&mut self, domain: &str) -> AppResult<&[Group]> {
        if self.groups.is_none() {
            let listed = drain_pages(|token| self.directory.list_groups(token)).await?;
            let groups: Vec<Group> = listed
                .into_iter()
                .map(|group| {
                    Group::from_display_name(
                        group.group_id,
                        group.display_name.as_deref().unwrap_or_default(),
                        domain,
                    )
                })
                .collect();
            info!(group_count = groups.len(), domain, "loaded directory groups");
            self.groups = Some(groups);
        }

        Ok(self.groups())
    }

    /// Loads every permission set once per run.
    ///
    /// The full ARN list is drained first; the ARNs are then described
    /// concurrently, bounded by the run fan-out, keeping listing order.
    pub async fn load_permission_sets(&mut self) -> AppResult<&[PermissionSet]> {
        if self.permission_sets.is_none() {
            let arns =
                drain_pages(|token| self.assignments.list_permission_set_arns(token)).await?;
            let permission_sets: Vec<PermissionSet> = stream::iter(
                arns.iter()
                    .map(|arn| self.assignments.describe_permission_set(arn)),
            )
            .buffered(self.fan_out)
            .try_collect()
            .await?;
            info!(
                permission_set_count = permission_sets.len(),
                "loaded permission sets"
            );
            self.permission_sets = Some(permission_sets);
        }

        Ok(self.permission_sets())
    }

    /// Drops cached permission sets so the next load reads them again.
    ///
    /// Accounts and groups stay cached.
    pub fn clear_permission_set_cache(&mut self) {
        if self.permission_sets.take().is_some() {
            debug!("cleared permission set cache");
        }
    }

    /// Returns cached accounts, empty before the first load.
    #[must_use]
    pub fn accounts(&self) -> &[Account] {
        self.accounts.as_deref().unwrap_or_default()
    }

    /// Returns cached groups, empty before the first load.
    #[must_use]
    pub fn groups(&self) -> &[Group] {
        self.groups.as_deref().unwrap_or_default()
    }

    /// Returns cached permission sets, empty before the first load.
    #[must_use]
    pub fn permission_sets(&self) -> &[PermissionSet] {
        self.permission_sets.as_deref().unwrap_or_default()
    }

    pub(super) fn find_account_by_name(&self, name: &str) -> Option<&Account> {
        self.accounts().iter().find(|account| account.name == name)
    }

    pub(super) fn find_account_by_id(&self, id: &str) -> Option<&Account> {
        self.accounts().iter().find(|account| account.id == id)
    }

    pub(super) fn find_group_by_name(&self, name: &str) -> Option<&Group> {
        if name.is_empty() {
            return None;
        }
        self.groups().iter().find(|group| group.group_name == name)
    }

    pub(super) fn find_group_by_id(&self, group_id: &str) -> Option<&Group> {
        self.groups().iter().find(|group| group.group_id == group_id)
    }

    pub(super) fn find_permission_set_by_name(&self, name: &str) -> Option<&PermissionSet> {
        self.permission_sets()
            .iter()
            .find(|permission_set| permission_set.name == name)
    }

    pub(super) fn find_permission_set_by_arn(&self, arn: &str) -> Option<&PermissionSet> {
        self.permission_sets()
            .iter()
            .find(|permission_set| permission_set.arn == arn)
    }
}
