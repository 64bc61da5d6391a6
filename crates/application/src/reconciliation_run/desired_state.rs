use tracing::{debug, info, warn};

use ssosync_core::AppResult;
use ssosync_domain::{Account, Assignment, AssignmentConfig, Group, GroupBinding, PermissionSet};

use super::ReconciliationRun;

impl ReconciliationRun {
    /// Expands the configuration into a flat list of desired assignments.
    ///
    /// Global, OU and account scopes are additive. Bindings whose group or
    /// permission set cannot be resolved are skipped with a warning, as are OU
    /// entries without accounts and account entries naming an unknown account.
    /// Duplicates reachable through several scopes are kept.
    pub async fn build_desired(&mut self, config: &AssignmentConfig) -> AppResult<Vec<Assignment>> {
        self.load_accounts().await?;
        self.load_permission_sets().await?;
        self.load_groups(config.ad_domain.as_str()).await?;

        let mut desired = Vec::new();

        for binding in &config.global_assignments {
            let Some((group, permission_set)) = self.resolve_binding(binding, "global") else {
                continue;
            };
            desired.extend(
                self.accounts()
                    .iter()
                    .map(|account| Assignment::for_group(account, group, permission_set)),
            );
            debug!(
                group_name = %group.group_name,
                permission_set = %permission_set.name,
                "built global assignments"
            );
        }

        for entry in &config.ou_assignments {
            let Some(accounts) = self.resolve_ou_accounts(entry.ou_name.as_str()).await? else {
                warn!(
                    ou_name = %entry.ou_name,
                    "no accounts found for organizational unit, skipping"
                );
                continue;
            };
            for binding in &entry.assignments {
                let Some((group, permission_set)) = self.resolve_binding(binding, &entry.ou_name)
                else {
                    continue;
                };
                desired.extend(
                    accounts
                        .iter()
                        .map(|account| Assignment::for_group(account, group, permission_set)),
                );
                debug!(
                    ou_name = %entry.ou_name,
                    group_name = %group.group_name,
                    permission_set = %permission_set.name,
                    "built organizational unit assignments"
                );
            }
        }

        for entry in &config.account_assignments {
            let Some(account) = self.find_account_by_name(entry.account_name.as_str()) else {
                warn!(
                    account_name = %entry.account_name,
                    "account not found or inactive, skipping"
                );
                continue;
            };
            for binding in &entry.assignments {
                if let Some(assignment) = self.account_assignment(account, binding) {
                    desired.push(assignment);
                }
            }
        }

        info!(desired_count = desired.len(), "built desired assignments");
        Ok(desired)
    }

    fn account_assignment(&self, account: &Account, binding: &GroupBinding) -> Option<Assignment> {
        let (group, permission_set) = self.resolve_binding(binding, account.name.as_str())?;
        Some(Assignment::for_group(account, group, permission_set))
    }

    fn resolve_binding(
        &self,
        binding: &GroupBinding,
        scope: &str,
    ) -> Option<(&Group, &PermissionSet)> {
        let group = self.find_group_by_name(binding.ad_group_name.as_str());
        let permission_set = self.find_permission_set_by_name(binding.permission_set.as_str());

        match (group, permission_set) {
            (Some(group), Some(permission_set)) => Some((group, permission_set)),
            (group, permission_set) => {
                warn!(
                    scope,
                    group_name = %binding.ad_group_name,
                    permission_set = %binding.permission_set,
                    group_found = group.is_some(),
                    permission_set_found = permission_set.is_some(),
                    "skipping unresolvable binding"
                );
                None
            }
        }
    }
}
