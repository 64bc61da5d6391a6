use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use ssosync_core::AppResult;
use ssosync_domain::{ApplyOutcome, Assignment, AssignmentAction, AssignmentNotification};

use crate::assignment_notifier::AssignmentNotifier;
use crate::reconciliation_ports::{
    AssignmentOperationStatus, AssignmentRequest, AssignmentService, OperationState,
};

const DEFAULT_MAX_POLL_ATTEMPTS: u32 = 120;

/// Status polling cadence for one kind of change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ApplyPolicy {
    /// Wait between status checks.
    pub poll_interval: Duration,
    /// Status checks performed before giving up on an in-progress operation.
    pub max_poll_attempts: u32,
}

impl ApplyPolicy {
    /// Default policy for creates: 500 ms between checks.
    #[must_use]
    pub fn create_default() -> Self {
        Self {
            poll_interval: Duration::from_millis(500),
            max_poll_attempts: DEFAULT_MAX_POLL_ATTEMPTS,
        }
    }

    /// Default policy for deletes: 2 s between checks.
    #[must_use]
    pub fn delete_default() -> Self {
        Self {
            poll_interval: Duration::from_secs(2),
            max_poll_attempts: DEFAULT_MAX_POLL_ATTEMPTS,
        }
    }
}

/// One applied change and its terminal outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppliedChange {
    /// Applied action.
    pub action: AssignmentAction,
    /// Affected assignment.
    pub assignment: Assignment,
    /// Terminal outcome.
    pub outcome: ApplyOutcome,
}

/// Creates and deletes assignments, waiting for each operation to settle.
#[derive(Clone)]
pub struct AssignmentApplier {
    assignments: Arc<dyn AssignmentService>,
    notifier: AssignmentNotifier,
    create_policy: ApplyPolicy,
    delete_policy: ApplyPolicy,
}

impl AssignmentApplier {
    /// Creates an applier.
    #[must_use]
    pub fn new(
        assignments: Arc<dyn AssignmentService>,
        notifier: AssignmentNotifier,
        create_policy: ApplyPolicy,
        delete_policy: ApplyPolicy,
    ) -> Self {
        Self {
            assignments,
            notifier,
            create_policy,
            delete_policy,
        }
    }

    /// Applies every assignment sequentially with the same action.
    ///
    /// Failed and timed-out operations are reported and the loop moves on;
    /// only transport errors from the assignment service abort it.
    pub async fn apply_all(
        &self,
        assignments: &[Assignment],
        action: AssignmentAction,
    ) -> AppResult<Vec<AppliedChange>> {
        let mut applied = Vec::with_capacity(assignments.len());

        for assignment in assignments {
            let outcome = self.apply(assignment, action).await?;
            applied.push(AppliedChange {
                action,
                assignment: assignment.clone(),
                outcome,
            });
        }

        Ok(applied)
    }

    /// Issues one create or delete, polls it to a terminal state and notifies.
    pub async fn apply(
        &self,
        assignment: &Assignment,
        action: AssignmentAction,
    ) -> AppResult<ApplyOutcome> {
        let request = AssignmentRequest::from(assignment);
        let initial = match action {
            AssignmentAction::Create => self.assignments.create_account_assignment(&request).await?,
            AssignmentAction::Delete => self.assignments.delete_account_assignment(&request).await?,
        };

        let outcome = self.await_terminal(action, initial).await?;
        log_outcome(action, assignment, &outcome);

        self.notifier
            .notify(&AssignmentNotification::from_outcome(
                action, assignment, &outcome,
            ))
            .await;

        Ok(outcome)
    }

    async fn await_terminal(
        &self,
        action: AssignmentAction,
        initial: AssignmentOperationStatus,
    ) -> AppResult<ApplyOutcome> {
        let policy = self.policy(action);
        let request_id = initial.request_id.clone();
        let mut status = initial;
        let mut attempts = 0_u32;

        loop {
            match status.state {
                OperationState::Succeeded => return Ok(ApplyOutcome::Succeeded),
                OperationState::Failed => {
                    return Ok(ApplyOutcome::Failed {
                        reason: status
                            .failure_reason
                            .unwrap_or_else(|| "no failure reason reported".to_owned()),
                    });
                }
                OperationState::InProgress => {}
            }

            let Some(request_id) = request_id.as_deref() else {
                return Ok(ApplyOutcome::Failed {
                    reason: "operation returned no request id".to_owned(),
                });
            };
            if attempts >= policy.max_poll_attempts {
                return Ok(ApplyOutcome::TimedOut { attempts });
            }

            tokio::time::sleep(policy.poll_interval).await;
            attempts += 1;
            status = match action {
                AssignmentAction::Create => {
                    self.assignments.describe_creation_status(request_id).await?
                }
                AssignmentAction::Delete => {
                    self.assignments.describe_deletion_status(request_id).await?
                }
            };
            debug!(
                action = %action,
                request_id,
                attempt = attempts,
                state = ?status.state,
                "polled assignment operation"
            );
        }
    }

    fn policy(&self, action: AssignmentAction) -> ApplyPolicy {
        match action {
            AssignmentAction::Create => self.create_policy,
            AssignmentAction::Delete => self.delete_policy,
        }
    }
}

fn log_outcome(action: AssignmentAction, assignment: &Assignment, outcome: &ApplyOutcome) {
    match outcome {
        ApplyOutcome::Succeeded => info!(
            action = %action,
            account_id = %assignment.target_id,
            permission_set = %assignment.permission_set_name,
            group_name = %assignment.group_name,
            "assignment change applied"
        ),
        ApplyOutcome::Failed { reason } => warn!(
            action = %action,
            account_id = %assignment.target_id,
            permission_set = %assignment.permission_set_name,
            group_name = %assignment.group_name,
            reason = %reason,
            "assignment change failed"
        ),
        ApplyOutcome::TimedOut { attempts } => warn!(
            action = %action,
            account_id = %assignment.target_id,
            permission_set = %assignment.permission_set_name,
            group_name = %assignment.group_name,
            attempts,
            "assignment change did not settle"
        ),
    }
}
