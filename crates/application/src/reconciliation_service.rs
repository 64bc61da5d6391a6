use std::sync::Arc;

use tracing::{info, warn};

use ssosync_core::AppResult;
use ssosync_domain::{
    AssignmentAction, AssignmentConfig, ChangePlan, ReconcileTrigger, dedupe_assignments,
};

use crate::assignment_applier::{AppliedChange, ApplyPolicy, AssignmentApplier};
use crate::assignment_notifier::AssignmentNotifier;
use crate::reconciliation_ports::{
    AssignmentService, ConfigurationStore, DirectoryService, NotificationSink,
    OrganizationService,
};
use crate::reconciliation_run::ReconciliationRun;

const DEFAULT_FAN_OUT: usize = 4;

/// External collaborators used by a reconciliation.
#[derive(Clone)]
pub struct ReconciliationPorts {
    /// Directory holding the principal groups.
    pub directory: Arc<dyn DirectoryService>,
    /// Organization hierarchy and accounts.
    pub organization: Arc<dyn OrganizationService>,
    /// SSO assignment service.
    pub assignments: Arc<dyn AssignmentService>,
    /// Source of the assignment configuration document.
    pub configuration: Arc<dyn ConfigurationStore>,
    /// Sink receiving apply-outcome notifications.
    pub notifications: Arc<dyn NotificationSink>,
}

/// Tunables of the reconciliation service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReconciliationSettings {
    /// Concurrency bound for OU traversal and permission set describes.
    pub fan_out: usize,
    /// Polling policy for creates.
    pub create_policy: ApplyPolicy,
    /// Polling policy for deletes.
    pub delete_policy: ApplyPolicy,
    /// Computes and logs the plan without applying it.
    pub dry_run: bool,
}

impl Default for ReconciliationSettings {
    fn default() -> Self {
        Self {
            fan_out: DEFAULT_FAN_OUT,
            create_policy: ApplyPolicy::create_default(),
            delete_policy: ApplyPolicy::delete_default(),
            dry_run: false,
        }
    }
}

/// Summary of one completed reconciliation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconciliationReport {
    /// Trigger that started the run.
    pub trigger: ReconcileTrigger,
    /// Desired assignments after deduplication.
    pub desired_count: usize,
    /// Desired assignments dropped as duplicates.
    pub duplicate_count: usize,
    /// Assignments observed on the SSO instance.
    pub current_count: usize,
    /// Computed creates and deletes.
    pub plan: ChangePlan,
    /// Outcome of every applied change, creates first.
    pub applied: Vec<AppliedChange>,
    /// Whether the plan was left unapplied.
    pub dry_run: bool,
}

impl ReconciliationReport {
    /// Number of changes that reached the succeeded state.
    #[must_use]
    pub fn succeeded_count(&self) -> usize {
        self.applied
            .iter()
            .filter(|change| change.outcome.is_success())
            .count()
    }

    /// Number of changes that failed or timed out.
    #[must_use]
    pub fn failed_count(&self) -> usize {
        self.applied.len() - self.succeeded_count()
    }
}

/// Result of a reconciliation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReconciliationOutcome {
    /// No usable configuration; nothing was read from or written to the instance.
    Skipped {
        /// Why the run was skipped.
        reason: String,
    },
    /// The run completed.
    Completed(ReconciliationReport),
}

/// Converges SSO account assignments onto the configured desired state.
#[derive(Clone)]
pub struct ReconciliationService {
    ports: ReconciliationPorts,
    settings: ReconciliationSettings,
    applier: AssignmentApplier,
}

impl ReconciliationService {
    /// Creates a reconciliation service.
    #[must_use]
    pub fn new(ports: ReconciliationPorts, settings: ReconciliationSettings) -> Self {
        let applier = AssignmentApplier::new(
            ports.assignments.clone(),
            AssignmentNotifier::new(ports.notifications.clone()),
            settings.create_policy,
            settings.delete_policy,
        );

        Self {
            ports,
            settings,
            applier,
        }
    }

    /// Runs one full reconciliation.
    ///
    /// Every trigger runs the same reconciliation; the trigger is only logged
    /// and reported. Creates are applied before deletes and the permission
    /// set cache is dropped once both phases finish.
    pub async fn reconcile(&self, trigger: &ReconcileTrigger) -> AppResult<ReconciliationOutcome> {
        info!(trigger = %trigger, source = trigger.source(), "reconciliation triggered");

        let Some(config) = self.load_config().await? else {
            return Ok(ReconciliationOutcome::Skipped {
                reason: "assignment configuration is missing or invalid".to_owned(),
            });
        };

        let mut run = ReconciliationRun::new(
            self.ports.directory.clone(),
            self.ports.organization.clone(),
            self.ports.assignments.clone(),
            self.settings.fan_out,
        );

        let built = run.build_desired(&config).await?;
        let built_count = built.len();
        let desired = dedupe_assignments(built);
        let duplicate_count = built_count - desired.len();
        if duplicate_count > 0 {
            info!(duplicate_count, "dropped duplicate desired assignments");
        }

        let current = run.collect_current(config.ad_domain.as_str()).await?;
        let plan = ChangePlan::between(&desired, &current);
        info!(
            desired_count = desired.len(),
            current_count = current.len(),
            create_count = plan.to_create.len(),
            delete_count = plan.to_delete.len(),
            dry_run = self.settings.dry_run,
            "computed assignment plan"
        );

        let mut applied = Vec::new();
        if self.settings.dry_run {
            for assignment in &plan.to_create {
                info!(
                    account_id = %assignment.target_id,
                    permission_set = %assignment.permission_set_name,
                    group_name = %assignment.group_name,
                    "dry run: would create assignment"
                );
            }
            for assignment in &plan.to_delete {
                info!(
                    account_id = %assignment.target_id,
                    permission_set = %assignment.permission_set_name,
                    group_name = %assignment.group_name,
                    "dry run: would delete assignment"
                );
            }
        } else {
            applied.extend(
                self.applier
                    .apply_all(&plan.to_create, AssignmentAction::Create)
                    .await?,
            );
            applied.extend(
                self.applier
                    .apply_all(&plan.to_delete, AssignmentAction::Delete)
                    .await?,
            );
        }
        run.clear_permission_set_cache();

        let report = ReconciliationReport {
            trigger: trigger.clone(),
            desired_count: desired.len(),
            duplicate_count,
            current_count: current.len(),
            plan,
            applied,
            dry_run: self.settings.dry_run,
        };
        info!(
            succeeded = report.succeeded_count(),
            failed = report.failed_count(),
            "reconciliation finished"
        );

        Ok(ReconciliationOutcome::Completed(report))
    }

    async fn load_config(&self) -> AppResult<Option<AssignmentConfig>> {
        let Some(document) = self.ports.configuration.load_document().await? else {
            warn!("assignment configuration not found, skipping reconciliation");
            return Ok(None);
        };

        match AssignmentConfig::parse(document.as_str()) {
            Ok(config) => {
                info!(
                    ad_domain = %config.ad_domain,
                    binding_count = config.binding_count(),
                    "loaded assignment configuration"
                );
                Ok(Some(config))
            }
            Err(error) => {
                warn!(error = %error, "assignment configuration is invalid, skipping reconciliation");
                Ok(None)
            }
        }
    }
}
