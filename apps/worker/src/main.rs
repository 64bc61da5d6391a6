//! SSO assignment reconciliation worker runtime.

#![forbid(unsafe_code)]

mod config;

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use ssosync_application::{
    ConfigurationStore, NotificationSink, ReconciliationOutcome, ReconciliationPorts,
    ReconciliationReport, ReconciliationService,
};
use ssosync_core::{AppError, AppResult};
use ssosync_domain::ReconcileTrigger;
use ssosync_infrastructure::{
    AwsIdentityStoreDirectory, AwsOrganizationsService, AwsSsmConfigurationStore,
    AwsSsoAdminAssignmentService, ConsoleNotificationSink, FileConfigurationStore,
    TeamsWebhookNotificationSink, load_aws_sdk_config,
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::config::{ConfigurationSource, WorkerConfig};

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = WorkerConfig::load()?;
    let service = build_reconciliation_service(&config).await?;
    let trigger = load_trigger(config.event_file.as_deref()).await?;

    info!(
        instance_arn = %config.instance_arn,
        identity_store_id = %config.identity_store_id,
        fan_out = config.fan_out,
        dry_run = config.dry_run,
        interval_seconds = ?config.interval_seconds,
        "ssosync-worker started"
    );

    let Some(interval_seconds) = config.interval_seconds else {
        return run_once(&service, &trigger).await;
    };

    let mut trigger = trigger;
    loop {
        if let Err(error) = run_once(&service, &trigger).await {
            warn!(error = %error, "reconciliation run failed");
        }
        trigger = ReconcileTrigger::Scheduled;
        tokio::time::sleep(Duration::from_secs(interval_seconds)).await;
    }
}

async fn build_reconciliation_service(config: &WorkerConfig) -> AppResult<ReconciliationService> {
    let sdk_config = load_aws_sdk_config(config.aws_region.as_deref()).await;

    let configuration: Arc<dyn ConfigurationStore> = match &config.configuration_source {
        ConfigurationSource::File(path) => Arc::new(FileConfigurationStore::new(path.clone())),
        ConfigurationSource::Parameter(name) => {
            Arc::new(AwsSsmConfigurationStore::new(&sdk_config, name.clone()))
        }
    };

    let notifications: Arc<dyn NotificationSink> = match &config.teams_webhook_url {
        Some(webhook_url) => {
            let http_client =
                TeamsWebhookNotificationSink::http_client(Duration::from_secs(15))?;
            Arc::new(TeamsWebhookNotificationSink::new(
                http_client,
                webhook_url.clone(),
                config.notify_max_attempts,
                config.notify_retry_backoff_ms,
            ))
        }
        None => {
            info!("MS_TEAMS_WEBHOOK_URL not set, logging notifications to the console");
            Arc::new(ConsoleNotificationSink::new())
        }
    };

    let ports = ReconciliationPorts {
        directory: Arc::new(AwsIdentityStoreDirectory::new(
            &sdk_config,
            config.identity_store_id.clone(),
        )),
        organization: Arc::new(AwsOrganizationsService::new(&sdk_config)),
        assignments: Arc::new(AwsSsoAdminAssignmentService::new(
            &sdk_config,
            config.instance_arn.clone(),
        )),
        configuration,
        notifications,
    };

    Ok(ReconciliationService::new(
        ports,
        config.reconciliation_settings(),
    ))
}

async fn load_trigger(event_file: Option<&Path>) -> AppResult<ReconcileTrigger> {
    let Some(event_file) = event_file else {
        return Ok(ReconcileTrigger::Scheduled);
    };

    let document = tokio::fs::read_to_string(event_file)
        .await
        .map_err(|error| {
            AppError::Internal(format!(
                "failed to read event file '{}': {error}",
                event_file.display()
            ))
        })?;
    let event = serde_json::from_str::<serde_json::Value>(document.as_str()).map_err(|error| {
        AppError::Validation(format!(
            "invalid event file '{}': {error}",
            event_file.display()
        ))
    })?;

    Ok(ReconcileTrigger::from_event(&event))
}

async fn run_once(service: &ReconciliationService, trigger: &ReconcileTrigger) -> AppResult<()> {
    match service.reconcile(trigger).await? {
        ReconciliationOutcome::Skipped { reason } => {
            warn!(trigger = %trigger, reason = %reason, "reconciliation skipped");
        }
        ReconciliationOutcome::Completed(report) => log_report(&report),
    }

    Ok(())
}

fn log_report(report: &ReconciliationReport) {
    for change in report
        .applied
        .iter()
        .filter(|change| !change.outcome.is_success())
    {
        warn!(
            action = %change.action,
            account_id = %change.assignment.target_id,
            account_name = %change.assignment.account_name,
            permission_set = %change.assignment.permission_set_name,
            group_name = %change.assignment.group_name,
            reason = %change.outcome.failure_reason().unwrap_or_default(),
            "assignment change not applied"
        );
    }

    info!(
        trigger = %report.trigger,
        desired_count = report.desired_count,
        duplicate_count = report.duplicate_count,
        current_count = report.current_count,
        create_count = report.plan.to_create.len(),
        delete_count = report.plan.to_delete.len(),
        succeeded = report.succeeded_count(),
        failed = report.failed_count(),
        dry_run = report.dry_run,
        "reconciliation completed"
    );
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .init();
}
