use futures::{StreamExt, TryStreamExt, stream};
use tracing::{debug, info, warn};

use ssosync_core::AppResult;
use ssosync_domain::{Account, OrganizationalUnit, OuAccountMapping, ROOT_NODE_NAME};

use crate::reconciliation_ports::{OrganizationAccount, drain_pages};

use super::ReconciliationRun;

/// Node visited by the name search, with a back-reference to its parent slot.
struct SearchNode {
    unit: OrganizationalUnit,
    parent: Option<usize>,
}

impl ReconciliationRun {
    /// Returns the active accounts beneath the first OU named `ou_name`.
    ///
    /// Returns `None` when no unit has that name or the unit holds no active
    /// account. Resolutions, including misses, are cached by name for the rest
    /// of the run.
    pub async fn resolve_ou_accounts(&mut self, ou_name: &str) -> AppResult<Option<Vec<Account>>> {
        if !self.ou_mappings.contains_key(ou_name) {
            let mapping = match self.find_unit_id(ou_name).await? {
                Some(ou_id) => {
                    let accounts = self.collect_active_accounts(ou_id.as_str()).await?;
                    info!(
                        ou_name,
                        ou_id = %ou_id,
                        account_count = accounts.len(),
                        "resolved organizational unit"
                    );
                    Some(OuAccountMapping {
                        ou_name: ou_name.to_owned(),
                        ou_id,
                        accounts,
                    })
                }
                None => {
                    warn!(ou_name, "organizational unit not found");
                    None
                }
            };
            self.ou_mappings.insert(ou_name.to_owned(), mapping);
        }

        Ok(self
            .ou_mappings
            .get(ou_name)
            .and_then(Option::as_ref)
            .filter(|mapping| !mapping.is_empty())
            .map(|mapping| mapping.accounts.clone()))
    }

    /// Depth-first search from the first root for a unit named `ou_name`.
    ///
    /// Children are expanded in listing order, so the first match in a
    /// depth-first pre-order walk wins.
    async fn find_unit_id(&self, ou_name: &str) -> AppResult<Option<String>> {
        let roots = drain_pages(|token| self.organization.list_roots(token)).await?;
        let Some(root_id) = roots.into_iter().next() else {
            warn!("organization has no root");
            return Ok(None);
        };

        let mut nodes = vec![SearchNode {
            unit: OrganizationalUnit::new(root_id, ROOT_NODE_NAME),
            parent: None,
        }];
        let mut stack = vec![0_usize];

        while let Some(index) = stack.pop() {
            if nodes[index].unit.name == ou_name {
                debug!(ou_name, path = %search_path(&nodes, index), "matched organizational unit");
                return Ok(Some(nodes[index].unit.id.clone()));
            }

            let parent_id = nodes[index].unit.id.clone();
            let child_ids = drain_pages(|token| {
                self.organization
                    .list_child_unit_ids(parent_id.as_str(), token)
            })
            .await?;
            let children: Vec<Option<OrganizationalUnit>> = stream::iter(
                child_ids
                    .iter()
                    .map(|child_id| self.organization.describe_organizational_unit(child_id)),
            )
            .buffered(self.fan_out)
            .try_collect()
            .await?;

            let first_child = nodes.len();
            nodes.extend(children.into_iter().flatten().map(|unit| SearchNode {
                unit,
                parent: Some(index),
            }));
            stack.extend((first_child..nodes.len()).rev());
        }

        Ok(None)
    }

    /// Collects active accounts attached to `ou_id` and every descendant unit.
    ///
    /// The walk proceeds level by level; all units of one level are listed
    /// concurrently, bounded by the run fan-out, and merged into one list.
    async fn collect_active_accounts(&self, ou_id: &str) -> AppResult<Vec<Account>> {
        let mut accounts = Vec::new();
        let mut frontier = vec![ou_id.to_owned()];

        while !frontier.is_empty() {
            let level: Vec<(Vec<OrganizationAccount>, Vec<OrganizationalUnit>)> = stream::iter(
                frontier
                    .iter()
                    .map(|parent_id| self.list_unit_contents(parent_id.as_str())),
            )
            .buffer_unordered(self.fan_out)
            .try_collect()
            .await?;

            let mut next_frontier = Vec::new();
            for (members, children) in level {
                accounts.extend(
                    members
                        .into_iter()
                        .filter_map(OrganizationAccount::into_active_account),
                );
                next_frontier.extend(children.into_iter().map(|unit| unit.id));
            }
            frontier = next_frontier;
        }

        Ok(accounts)
    }

    async fn list_unit_contents(
        &self,
        parent_id: &str,
    ) -> AppResult<(Vec<OrganizationAccount>, Vec<OrganizationalUnit>)> {
        let accounts = drain_pages(|token| {
            self.organization
                .list_accounts_for_parent(parent_id, token)
        })
        .await?;
        let units =
            drain_pages(|token| self.organization.list_units_for_parent(parent_id, token)).await?;

        Ok((accounts, units))
    }
}

fn search_path(nodes: &[SearchNode], index: usize) -> String {
    let mut names = Vec::new();
    let mut cursor = Some(index);
    while let Some(current) = cursor {
        names.push(nodes[current].unit.name.as_str());
        cursor = nodes[current].parent;
    }
    names.reverse();
    names.join("/")
}
