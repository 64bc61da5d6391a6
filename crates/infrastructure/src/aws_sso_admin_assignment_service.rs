use async_trait::async_trait;
use aws_config::SdkConfig;
use aws_sdk_ssoadmin::types::{self as sdk, StatusValues, TargetType};
use ssosync_application::{
    AssignmentOperationStatus, AssignmentRequest, AssignmentService, OperationState, Page,
    ProvisionedAssignment,
};
use ssosync_core::{AppError, AppResult};
use ssosync_domain::{PermissionSet, PrincipalType};

use crate::aws_sdk_config::{next_token, upstream_error};

/// SSO Admin implementation of the assignment port, bound to one instance.
#[derive(Clone)]
pub struct AwsSsoAdminAssignmentService {
    client: aws_sdk_ssoadmin::Client,
    instance_arn: String,
}

impl AwsSsoAdminAssignmentService {
    /// Creates an assignment service for the SSO instance `instance_arn`.
    #[must_use]
    pub fn new(config: &SdkConfig, instance_arn: impl Into<String>) -> Self {
        Self {
            client: aws_sdk_ssoadmin::Client::new(config),
            instance_arn: instance_arn.into(),
        }
    }
}

fn sdk_principal_type(principal_type: PrincipalType) -> sdk::PrincipalType {
    match principal_type {
        PrincipalType::Group => sdk::PrincipalType::Group,
        PrincipalType::User => sdk::PrincipalType::User,
    }
}

fn provisioned_assignment(assignment: &sdk::AccountAssignment) -> AppResult<ProvisionedAssignment> {
    let principal_type = match assignment.principal_type() {
        Some(sdk::PrincipalType::Group) => PrincipalType::Group,
        Some(sdk::PrincipalType::User) => PrincipalType::User,
        other => {
            return Err(AppError::Upstream(format!(
                "unsupported principal type in account assignment: {other:?}"
            )));
        }
    };

    Ok(ProvisionedAssignment {
        account_id: assignment.account_id().unwrap_or_default().to_owned(),
        permission_set_arn: assignment.permission_set_arn().unwrap_or_default().to_owned(),
        principal_id: assignment.principal_id().unwrap_or_default().to_owned(),
        principal_type,
    })
}

fn operation_status(
    operation: &str,
    status: Option<&sdk::AccountAssignmentOperationStatus>,
) -> AppResult<AssignmentOperationStatus> {
    let status = status.ok_or_else(|| {
        AppError::Upstream(format!("{operation} returned no operation status"))
    })?;
    let state = match status.status() {
        Some(StatusValues::Succeeded) => OperationState::Succeeded,
        Some(StatusValues::Failed) => OperationState::Failed,
        _ => OperationState::InProgress,
    };

    Ok(AssignmentOperationStatus {
        request_id: status.request_id().map(str::to_owned),
        state,
        failure_reason: status.failure_reason().map(str::to_owned),
    })
}

#[async_trait]
impl AssignmentService for AwsSsoAdminAssignmentService {
    async fn list_permission_set_arns(&self, next: Option<String>) -> AppResult<Page<String>> {
        let output = self
            .client
            .list_permission_sets()
            .instance_arn(self.instance_arn.as_str())
            .set_next_token(next)
            .send()
            .await
            .map_err(|error| upstream_error("sso:ListPermissionSets", error))?;

        Ok(Page {
            items: output.permission_sets().to_vec(),
            next_token: next_token(output.next_token()),
        })
    }

    async fn describe_permission_set(&self, permission_set_arn: &str) -> AppResult<PermissionSet> {
        let output = self
            .client
            .describe_permission_set()
            .instance_arn(self.instance_arn.as_str())
            .permission_set_arn(permission_set_arn)
            .send()
            .await
            .map_err(|error| upstream_error("sso:DescribePermissionSet", error))?;

        let name = output
            .permission_set()
            .and_then(|permission_set| permission_set.name())
            .ok_or_else(|| {
                AppError::NotFound(format!("permission set '{permission_set_arn}' has no name"))
            })?;

        Ok(PermissionSet::new(permission_set_arn, name))
    }

    async fn list_accounts_for_provisioned_permission_set(
        &self,
        permission_set_arn: &str,
        next: Option<String>,
    ) -> AppResult<Page<String>> {
        let output = self
            .client
            .list_accounts_for_provisioned_permission_set()
            .instance_arn(self.instance_arn.as_str())
            .permission_set_arn(permission_set_arn)
            .set_next_token(next)
            .send()
            .await
            .map_err(|error| {
                upstream_error("sso:ListAccountsForProvisionedPermissionSet", error)
            })?;

        Ok(Page {
            items: output.account_ids().to_vec(),
            next_token: next_token(output.next_token()),
        })
    }

    async fn list_account_assignments(
        &self,
        account_id: &str,
        permission_set_arn: &str,
        next: Option<String>,
    ) -> AppResult<Page<ProvisionedAssignment>> {
        let output = self
            .client
            .list_account_assignments()
            .instance_arn(self.instance_arn.as_str())
            .account_id(account_id)
            .permission_set_arn(permission_set_arn)
            .set_next_token(next)
            .send()
            .await
            .map_err(|error| upstream_error("sso:ListAccountAssignments", error))?;

        Ok(Page {
            items: output
                .account_assignments()
                .iter()
                .map(provisioned_assignment)
                .collect::<AppResult<Vec<_>>>()?,
            next_token: next_token(output.next_token()),
        })
    }

    async fn create_account_assignment(
        &self,
        request: &AssignmentRequest,
    ) -> AppResult<AssignmentOperationStatus> {
        let output = self
            .client
            .create_account_assignment()
            .instance_arn(self.instance_arn.as_str())
            .target_id(request.target_id.as_str())
            .target_type(TargetType::AwsAccount)
            .permission_set_arn(request.permission_set_arn.as_str())
            .principal_type(sdk_principal_type(request.principal_type))
            .principal_id(request.principal_id.as_str())
            .send()
            .await
            .map_err(|error| upstream_error("sso:CreateAccountAssignment", error))?;

        operation_status(
            "sso:CreateAccountAssignment",
            output.account_assignment_creation_status(),
        )
    }

    async fn delete_account_assignment(
        &self,
        request: &AssignmentRequest,
    ) -> AppResult<AssignmentOperationStatus> {
        let output = self
            .client
            .delete_account_assignment()
            .instance_arn(self.instance_arn.as_str())
            .target_id(request.target_id.as_str())
            .target_type(TargetType::AwsAccount)
            .permission_set_arn(request.permission_set_arn.as_str())
            .principal_type(sdk_principal_type(request.principal_type))
            .principal_id(request.principal_id.as_str())
            .send()
            .await
            .map_err(|error| upstream_error("sso:DeleteAccountAssignment", error))?;

        operation_status(
            "sso:DeleteAccountAssignment",
            output.account_assignment_deletion_status(),
        )
    }

    async fn describe_creation_status(
        &self,
        request_id: &str,
    ) -> AppResult<AssignmentOperationStatus> {
        let output = self
            .client
            .describe_account_assignment_creation_status()
            .instance_arn(self.instance_arn.as_str())
            .account_assignment_creation_request_id(request_id)
            .send()
            .await
            .map_err(|error| {
                upstream_error("sso:DescribeAccountAssignmentCreationStatus", error)
            })?;

        operation_status(
            "sso:DescribeAccountAssignmentCreationStatus",
            output.account_assignment_creation_status(),
        )
    }

    async fn describe_deletion_status(
        &self,
        request_id: &str,
    ) -> AppResult<AssignmentOperationStatus> {
        let output = self
            .client
            .describe_account_assignment_deletion_status()
            .instance_arn(self.instance_arn.as_str())
            .account_assignment_deletion_request_id(request_id)
            .send()
            .await
            .map_err(|error| {
                upstream_error("sso:DescribeAccountAssignmentDeletionStatus", error)
            })?;

        operation_status(
            "sso:DescribeAccountAssignmentDeletionStatus",
            output.account_assignment_deletion_status(),
        )
    }
}

#[cfg(test)]
mod tests {
    use aws_sdk_ssoadmin::types as sdk;
    use ssosync_application::OperationState;
    use ssosync_core::AppError;
    use ssosync_domain::PrincipalType;

    use super::{operation_status, provisioned_assignment};

    #[test]
    fn failed_status_keeps_reason_and_request_id() {
        let status = sdk::AccountAssignmentOperationStatus::builder()
            .status(sdk::StatusValues::Failed)
            .request_id("req-1")
            .failure_reason("QuotaExceeded")
            .build();

        let status = operation_status("sso:Test", Some(&status))
            .unwrap_or_else(|error| panic!("unexpected error: {error}"));

        assert_eq!(status.state, OperationState::Failed);
        assert_eq!(status.request_id.as_deref(), Some("req-1"));
        assert_eq!(status.failure_reason.as_deref(), Some("QuotaExceeded"));
    }

    #[test]
    fn unset_status_is_in_progress() {
        let status = sdk::AccountAssignmentOperationStatus::builder()
            .request_id("req-2")
            .build();

        let status = operation_status("sso:Test", Some(&status))
            .unwrap_or_else(|error| panic!("unexpected error: {error}"));

        assert_eq!(status.state, OperationState::InProgress);
    }

    #[test]
    fn missing_status_is_an_upstream_error() {
        let result = operation_status("sso:Test", None);

        assert!(matches!(result, Err(AppError::Upstream(_))));
    }

    #[test]
    fn listed_assignment_keeps_observed_principal_type() {
        let assignment = sdk::AccountAssignment::builder()
            .account_id("111")
            .permission_set_arn("arn:ps/read")
            .principal_type(sdk::PrincipalType::User)
            .principal_id("u-1")
            .build();

        let assignment = provisioned_assignment(&assignment)
            .unwrap_or_else(|error| panic!("unexpected error: {error}"));

        assert_eq!(assignment.principal_type, PrincipalType::User);
        assert_eq!(assignment.account_id, "111");
    }
}
