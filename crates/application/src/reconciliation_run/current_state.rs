use std::sync::Arc;

use tracing::{debug, info};

use ssosync_core::AppResult;
use ssosync_domain::Assignment;

use crate::reconciliation_ports::{ProvisionedAssignment, drain_pages};

use super::ReconciliationRun;

impl ReconciliationRun {
    /// Collects every assignment currently provisioned on the SSO instance.
    ///
    /// Permission sets are walked in cached order and their provisioned
    /// accounts in listing order. Each listing is drained completely before
    /// its items are consumed.
    pub async fn collect_current(&mut self, domain: &str) -> AppResult<Vec<Assignment>> {
        self.load_permission_sets().await?;
        self.load_groups(domain).await?;
        self.load_accounts().await?;

        let service = Arc::clone(&self.assignments);
        let mut current = Vec::new();

        for permission_set in self.permission_sets() {
            let arn = permission_set.arn.as_str();
            let account_ids = drain_pages(|token| {
                service.list_accounts_for_provisioned_permission_set(arn, token)
            })
            .await?;

            for account_id in &account_ids {
                let provisioned = drain_pages(|token| {
                    service.list_account_assignments(account_id.as_str(), arn, token)
                })
                .await?;
                debug!(
                    permission_set = %permission_set.name,
                    account_id = %account_id,
                    assignment_count = provisioned.len(),
                    "listed account assignments"
                );
                current.extend(
                    provisioned
                        .into_iter()
                        .map(|assignment| self.denormalize(assignment)),
                );
            }
        }

        info!(current_count = current.len(), "collected current assignments");
        Ok(current)
    }

    /// Fills display names from cached reference data.
    ///
    /// Unknown identifiers denormalise to empty names, which never equal a
    /// desired assignment.
    fn denormalize(&self, provisioned: ProvisionedAssignment) -> Assignment {
        let permission_set_name = self
            .find_permission_set_by_arn(provisioned.permission_set_arn.as_str())
            .map(|permission_set| permission_set.name.clone())
            .unwrap_or_default();
        let account_name = self
            .find_account_by_id(provisioned.account_id.as_str())
            .map(|account| account.name.clone())
            .unwrap_or_default();
        let group_name = self
            .find_group_by_id(provisioned.principal_id.as_str())
            .map(|group| group.group_name.clone())
            .unwrap_or_default();

        Assignment {
            permission_set_arn: provisioned.permission_set_arn,
            permission_set_name,
            principal_id: provisioned.principal_id,
            principal_type: provisioned.principal_type,
            target_id: provisioned.account_id,
            account_name,
            group_name,
        }
    }
}
