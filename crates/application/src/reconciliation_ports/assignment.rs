use async_trait::async_trait;

use ssosync_core::AppResult;
use ssosync_domain::{Assignment, PermissionSet, PrincipalType};

use super::Page;

/// Assignment as listed by the assignment service, before denormalisation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvisionedAssignment {
    /// Target account identifier.
    pub account_id: String,
    /// Permission set ARN.
    pub permission_set_arn: String,
    /// Principal identifier.
    pub principal_id: String,
    /// Principal kind.
    pub principal_type: PrincipalType,
}

/// Identity of an assignment to create or delete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssignmentRequest {
    /// Permission set ARN.
    pub permission_set_arn: String,
    /// Principal identifier.
    pub principal_id: String,
    /// Principal kind.
    pub principal_type: PrincipalType,
    /// Target account identifier.
    pub target_id: String,
}

impl From<&Assignment> for AssignmentRequest {
    fn from(assignment: &Assignment) -> Self {
        Self {
            permission_set_arn: assignment.permission_set_arn.clone(),
            principal_id: assignment.principal_id.clone(),
            principal_type: assignment.principal_type,
            target_id: assignment.target_id.clone(),
        }
    }
}

/// State of an asynchronous create or delete operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationState {
    /// Still running.
    InProgress,
    /// Completed successfully.
    Succeeded,
    /// Completed with a failure.
    Failed,
}

/// Status handle of an asynchronous create or delete operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssignmentOperationStatus {
    /// Request identifier used to poll the operation.
    pub request_id: Option<String>,
    /// Operation state.
    pub state: OperationState,
    /// Failure reason reported for failed operations.
    pub failure_reason: Option<String>,
}

/// Port for the permission assignment service of the SSO instance.
#[async_trait]
pub trait AssignmentService: Send + Sync {
    /// Lists one page of permission set ARNs.
    async fn list_permission_set_arns(&self, next_token: Option<String>)
    -> AppResult<Page<String>>;

    /// Describes one permission set.
    async fn describe_permission_set(&self, permission_set_arn: &str) -> AppResult<PermissionSet>;

    /// Lists one page of account identifiers a permission set is provisioned to.
    async fn list_accounts_for_provisioned_permission_set(
        &self,
        permission_set_arn: &str,
        next_token: Option<String>,
    ) -> AppResult<Page<String>>;

    /// Lists one page of assignments on an account scoped to one permission set.
    async fn list_account_assignments(
        &self,
        account_id: &str,
        permission_set_arn: &str,
        next_token: Option<String>,
    ) -> AppResult<Page<ProvisionedAssignment>>;

    /// Starts creating an assignment.
    async fn create_account_assignment(
        &self,
        request: &AssignmentRequest,
    ) -> AppResult<AssignmentOperationStatus>;

    /// Starts deleting an assignment.
    async fn delete_account_assignment(
        &self,
        request: &AssignmentRequest,
    ) -> AppResult<AssignmentOperationStatus>;

    /// Polls the status of a create operation.
    async fn describe_creation_status(
        &self,
        request_id: &str,
    ) -> AppResult<AssignmentOperationStatus>;

    /// Polls the status of a delete operation.
    async fn describe_deletion_status(
        &self,
        request_id: &str,
    ) -> AppResult<AssignmentOperationStatus>;
}
