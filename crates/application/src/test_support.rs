//! In-memory fakes for application tests.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use ssosync_core::{AppError, AppResult};
use ssosync_domain::{MessageCard, OrganizationalUnit, PermissionSet, PrincipalType};

use crate::reconciliation_ports::{
    AssignmentOperationStatus, AssignmentRequest, AssignmentService, ConfigurationStore,
    DirectoryGroup, DirectoryService, NotificationSink, OperationState, OrganizationAccount,
    OrganizationService, Page, ProvisionedAssignment,
};
use crate::reconciliation_run::ReconciliationRun;

pub const ROOT_ID: &str = "r-root";

/// Serves `items` in pages of `page_size`, using the item offset as token.
pub fn paginate<T: Clone>(items: &[T], page_size: usize, token: Option<String>) -> AppResult<Page<T>> {
    let offset = match token {
        Some(token) => token
            .parse::<usize>()
            .map_err(|error| AppError::Internal(format!("bad token '{token}': {error}")))?,
        None => 0,
    };
    let end = (offset + page_size).min(items.len());
    let page_items = items.get(offset..end).unwrap_or_default().to_vec();

    if end < items.len() {
        Ok(Page::with_next(page_items, end.to_string()))
    } else {
        Ok(Page::last(page_items))
    }
}

pub struct FakeDirectory {
    groups: Vec<DirectoryGroup>,
    pub group_listings: Mutex<usize>,
}

impl FakeDirectory {
    pub fn with_groups(domain: &str, groups: &[(&str, &str)]) -> Self {
        Self {
            groups: groups
                .iter()
                .map(|(group_id, name)| DirectoryGroup {
                    group_id: (*group_id).to_owned(),
                    display_name: Some(format!("{name}@{domain}")),
                })
                .collect(),
            group_listings: Mutex::new(0),
        }
    }
}

#[async_trait]
impl DirectoryService for FakeDirectory {
    async fn list_groups(&self, next_token: Option<String>) -> AppResult<Page<DirectoryGroup>> {
        if next_token.is_none() {
            *self.group_listings.lock().await += 1;
        }
        paginate(&self.groups, 1, next_token)
    }
}

/// Organization tree keyed by parent identifier.
#[derive(Default)]
pub struct FakeOrganization {
    units: HashMap<String, Vec<OrganizationalUnit>>,
    accounts: HashMap<String, Vec<OrganizationAccount>>,
    pub describe_calls: Mutex<usize>,
    pub list_root_calls: Mutex<usize>,
    pub account_listings: Mutex<usize>,
    fail_account_listing: bool,
}

impl FakeOrganization {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_unit(mut self, parent_id: &str, unit_id: &str, name: &str) -> Self {
        self.units
            .entry(parent_id.to_owned())
            .or_default()
            .push(OrganizationalUnit::new(unit_id, name));
        self
    }

    pub fn with_account(mut self, parent_id: &str, account: OrganizationAccount) -> Self {
        self.accounts
            .entry(parent_id.to_owned())
            .or_default()
            .push(account);
        self
    }

    /// Makes every `list_accounts` call fail with an upstream error.
    pub fn with_failing_account_listing(mut self) -> Self {
        self.fail_account_listing = true;
        self
    }

    fn all_accounts(&self) -> Vec<OrganizationAccount> {
        let mut parents: Vec<&String> = self.accounts.keys().collect();
        parents.sort();
        parents
            .into_iter()
            .flat_map(|parent| self.accounts[parent].iter().cloned())
            .collect()
    }

    fn all_units(&self) -> impl Iterator<Item = &OrganizationalUnit> {
        self.units.values().flatten()
    }
}

#[async_trait]
impl OrganizationService for FakeOrganization {
    async fn list_roots(&self, next_token: Option<String>) -> AppResult<Page<String>> {
        *self.list_root_calls.lock().await += 1;
        paginate(&[ROOT_ID.to_owned()], 1, next_token)
    }

    async fn list_child_unit_ids(
        &self,
        parent_id: &str,
        next_token: Option<String>,
    ) -> AppResult<Page<String>> {
        let ids: Vec<String> = self
            .units
            .get(parent_id)
            .map(|units| units.iter().map(|unit| unit.id.clone()).collect())
            .unwrap_or_default();
        paginate(&ids, 1, next_token)
    }

    async fn describe_organizational_unit(
        &self,
        unit_id: &str,
    ) -> AppResult<Option<OrganizationalUnit>> {
        *self.describe_calls.lock().await += 1;
        Ok(self.all_units().find(|unit| unit.id == unit_id).cloned())
    }

    async fn list_units_for_parent(
        &self,
        parent_id: &str,
        next_token: Option<String>,
    ) -> AppResult<Page<OrganizationalUnit>> {
        let units = self.units.get(parent_id).cloned().unwrap_or_default();
        paginate(&units, 1, next_token)
    }

    async fn list_accounts_for_parent(
        &self,
        parent_id: &str,
        next_token: Option<String>,
    ) -> AppResult<Page<OrganizationAccount>> {
        let accounts = self.accounts.get(parent_id).cloned().unwrap_or_default();
        paginate(&accounts, 1, next_token)
    }

    async fn list_accounts(
        &self,
        next_token: Option<String>,
    ) -> AppResult<Page<OrganizationAccount>> {
        if self.fail_account_listing {
            return Err(AppError::Upstream("ListAccounts: throttled".to_owned()));
        }
        if next_token.is_none() {
            *self.account_listings.lock().await += 1;
        }
        paginate(&self.all_accounts(), 2, next_token)
    }
}

struct PendingOperation {
    request: AssignmentRequest,
    remaining: VecDeque<AssignmentOperationStatus>,
    is_create: bool,
}

/// Assignment service whose apply operations follow scripted status sequences.
///
/// Successful operations mutate the provisioned state, so a second run
/// observes the result of the first.
#[derive(Default)]
pub struct FakeAssignmentService {
    permission_sets: Vec<PermissionSet>,
    provisioned: Mutex<Vec<ProvisionedAssignment>>,
    scripts: Mutex<HashMap<String, VecDeque<AssignmentOperationStatus>>>,
    pending: Mutex<HashMap<String, PendingOperation>>,
    pub created: Mutex<Vec<AssignmentRequest>>,
    pub deleted: Mutex<Vec<AssignmentRequest>>,
    pub status_polls: Mutex<usize>,
    pub permission_set_listings: Mutex<usize>,
    request_counter: Mutex<usize>,
}

impl FakeAssignmentService {
    pub fn with_permission_sets(permission_sets: &[(&str, &str)]) -> Self {
        Self {
            permission_sets: permission_sets
                .iter()
                .map(|(arn, name)| PermissionSet::new(*arn, *name))
                .collect(),
            ..Self::default()
        }
    }

    pub async fn provision(&self, account_id: &str, permission_set_arn: &str, principal_id: &str) {
        self.provisioned.lock().await.push(ProvisionedAssignment {
            account_id: account_id.to_owned(),
            permission_set_arn: permission_set_arn.to_owned(),
            principal_id: principal_id.to_owned(),
            principal_type: PrincipalType::Group,
        });
    }

    /// Scripts the statuses returned for operations targeting `target_id`.
    ///
    /// The first status is returned by the create/delete call, the rest by
    /// successive polls. Unscripted targets succeed immediately.
    pub async fn script(&self, target_id: &str, states: &[(OperationState, Option<&str>)]) {
        self.scripts.lock().await.insert(
            target_id.to_owned(),
            states
                .iter()
                .map(|(state, reason)| AssignmentOperationStatus {
                    request_id: None,
                    state: *state,
                    failure_reason: reason.map(str::to_owned),
                })
                .collect(),
        );
    }

    async fn start(
        &self,
        request: &AssignmentRequest,
        is_create: bool,
    ) -> AppResult<AssignmentOperationStatus> {
        let mut counter = self.request_counter.lock().await;
        *counter += 1;
        let request_id = format!("req-{}", *counter);
        drop(counter);

        let mut script = self
            .scripts
            .lock()
            .await
            .remove(request.target_id.as_str())
            .unwrap_or_else(|| {
                VecDeque::from(vec![AssignmentOperationStatus {
                    request_id: None,
                    state: OperationState::Succeeded,
                    failure_reason: None,
                }])
            });
        let first = script
            .pop_front()
            .ok_or_else(|| AppError::Internal("empty status script".to_owned()))?;
        self.pending.lock().await.insert(
            request_id.clone(),
            PendingOperation {
                request: request.clone(),
                remaining: script,
                is_create,
            },
        );
        self.settle(request, &first, is_create).await;

        Ok(AssignmentOperationStatus {
            request_id: Some(request_id),
            ..first
        })
    }

    async fn poll(&self, request_id: &str) -> AppResult<AssignmentOperationStatus> {
        *self.status_polls.lock().await += 1;
        let mut pending = self.pending.lock().await;
        let operation = pending
            .get_mut(request_id)
            .ok_or_else(|| AppError::NotFound(format!("request {request_id}")))?;
        let status = operation
            .remaining
            .pop_front()
            .unwrap_or(AssignmentOperationStatus {
                request_id: None,
                state: OperationState::InProgress,
                failure_reason: None,
            });
        let request = operation.request.clone();
        let is_create = operation.is_create;
        drop(pending);
        self.settle(&request, &status, is_create).await;

        Ok(AssignmentOperationStatus {
            request_id: Some(request_id.to_owned()),
            ..status
        })
    }

    async fn settle(&self, request: &AssignmentRequest, status: &AssignmentOperationStatus, is_create: bool) {
        if status.state != OperationState::Succeeded {
            return;
        }
        let mut provisioned = self.provisioned.lock().await;
        if is_create {
            provisioned.push(ProvisionedAssignment {
                account_id: request.target_id.clone(),
                permission_set_arn: request.permission_set_arn.clone(),
                principal_id: request.principal_id.clone(),
                principal_type: request.principal_type,
            });
        } else {
            provisioned.retain(|assignment| {
                !(assignment.account_id == request.target_id
                    && assignment.permission_set_arn == request.permission_set_arn
                    && assignment.principal_id == request.principal_id)
            });
        }
    }
}

#[async_trait]
impl AssignmentService for FakeAssignmentService {
    async fn list_permission_set_arns(
        &self,
        next_token: Option<String>,
    ) -> AppResult<Page<String>> {
        if next_token.is_none() {
            *self.permission_set_listings.lock().await += 1;
        }
        let arns: Vec<String> = self
            .permission_sets
            .iter()
            .map(|permission_set| permission_set.arn.clone())
            .collect();
        paginate(&arns, 1, next_token)
    }

    async fn describe_permission_set(&self, permission_set_arn: &str) -> AppResult<PermissionSet> {
        self.permission_sets
            .iter()
            .find(|permission_set| permission_set.arn == permission_set_arn)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("permission set {permission_set_arn}")))
    }

    async fn list_accounts_for_provisioned_permission_set(
        &self,
        permission_set_arn: &str,
        next_token: Option<String>,
    ) -> AppResult<Page<String>> {
        let mut account_ids: Vec<String> = Vec::new();
        for assignment in self.provisioned.lock().await.iter() {
            if assignment.permission_set_arn == permission_set_arn
                && !account_ids.contains(&assignment.account_id)
            {
                account_ids.push(assignment.account_id.clone());
            }
        }
        paginate(&account_ids, 1, next_token)
    }

    async fn list_account_assignments(
        &self,
        account_id: &str,
        permission_set_arn: &str,
        next_token: Option<String>,
    ) -> AppResult<Page<ProvisionedAssignment>> {
        let assignments: Vec<ProvisionedAssignment> = self
            .provisioned
            .lock()
            .await
            .iter()
            .filter(|assignment| {
                assignment.account_id == account_id
                    && assignment.permission_set_arn == permission_set_arn
            })
            .cloned()
            .collect();
        paginate(&assignments, 1, next_token)
    }

    async fn create_account_assignment(
        &self,
        request: &AssignmentRequest,
    ) -> AppResult<AssignmentOperationStatus> {
        self.created.lock().await.push(request.clone());
        self.start(request, true).await
    }

    async fn delete_account_assignment(
        &self,
        request: &AssignmentRequest,
    ) -> AppResult<AssignmentOperationStatus> {
        self.deleted.lock().await.push(request.clone());
        self.start(request, false).await
    }

    async fn describe_creation_status(
        &self,
        request_id: &str,
    ) -> AppResult<AssignmentOperationStatus> {
        self.poll(request_id).await
    }

    async fn describe_deletion_status(
        &self,
        request_id: &str,
    ) -> AppResult<AssignmentOperationStatus> {
        self.poll(request_id).await
    }
}

pub struct FakeConfigurationStore {
    document: Option<String>,
}

impl FakeConfigurationStore {
    pub fn with_document(document: Option<&str>) -> Self {
        Self {
            document: document.map(str::to_owned),
        }
    }
}

#[async_trait]
impl ConfigurationStore for FakeConfigurationStore {
    async fn load_document(&self) -> AppResult<Option<String>> {
        Ok(self.document.clone())
    }
}

#[derive(Default)]
pub struct RecordingNotificationSink {
    pub cards: Mutex<Vec<MessageCard>>,
    fail: bool,
}

impl RecordingNotificationSink {
    pub fn failing() -> Self {
        Self {
            cards: Mutex::new(Vec::new()),
            fail: true,
        }
    }
}

#[async_trait]
impl NotificationSink for RecordingNotificationSink {
    async fn deliver(&self, card: &MessageCard) -> AppResult<()> {
        self.cards.lock().await.push(card.clone());
        if self.fail {
            return Err(AppError::Upstream("webhook unavailable".to_owned()));
        }
        Ok(())
    }
}

/// Organization with three active accounts, one suspended account and a small OU tree:
///
/// ```text
/// root
/// ├── Workloads (ou-workloads)
/// │   ├── Prod (ou-prod): prod-a, prod-b
/// │   └── Dev (ou-dev): dev-a, closed (suspended)
/// └── Sandbox (ou-sandbox): no accounts
/// ```
pub fn sample_organization() -> FakeOrganization {
    FakeOrganization::new()
        .with_unit(ROOT_ID, "ou-workloads", "Workloads")
        .with_unit(ROOT_ID, "ou-sandbox", "Sandbox")
        .with_unit("ou-workloads", "ou-prod", "Prod")
        .with_unit("ou-workloads", "ou-dev", "Dev")
        .with_account("ou-prod", OrganizationAccount::active("111", "prod-a"))
        .with_account("ou-prod", OrganizationAccount::active("222", "prod-b"))
        .with_account("ou-dev", OrganizationAccount::active("333", "dev-a"))
        .with_account(
            "ou-dev",
            OrganizationAccount {
                id: Some("444".to_owned()),
                name: Some("closed".to_owned()),
                status: crate::reconciliation_ports::AccountStatus::Suspended,
            },
        )
}

pub const DOMAIN: &str = "corp.example";

pub fn sample_directory() -> FakeDirectory {
    FakeDirectory::with_groups(DOMAIN, &[("g-admins", "ADMINS"), ("g-ops", "OPS"), ("g-audit", "AUDIT")])
}

pub fn sample_assignment_service() -> FakeAssignmentService {
    FakeAssignmentService::with_permission_sets(&[
        ("arn:ps/admin", "Admin"),
        ("arn:ps/read", "ReadOnly"),
    ])
}

pub fn sample_run(
    organization: Arc<FakeOrganization>,
    assignments: Arc<FakeAssignmentService>,
) -> ReconciliationRun {
    ReconciliationRun::new(Arc::new(sample_directory()), organization, assignments, 2)
}
