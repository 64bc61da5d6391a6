use std::env;
use std::fmt::Display;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use ssosync_application::{ApplyPolicy, ReconciliationSettings};
use ssosync_core::{AppError, AppResult};

/// Where the assignment configuration document is read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigurationSource {
    /// Local JSON file.
    File(PathBuf),
    /// SSM parameter name.
    Parameter(String),
}

/// Worker settings resolved from the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerConfig {
    pub instance_arn: String,
    pub identity_store_id: String,
    pub configuration_source: ConfigurationSource,
    pub teams_webhook_url: Option<String>,
    pub aws_region: Option<String>,
    pub create_poll_interval_ms: u64,
    pub delete_poll_interval_ms: u64,
    pub max_poll_attempts: u32,
    pub fan_out: usize,
    pub dry_run: bool,
    pub event_file: Option<PathBuf>,
    pub interval_seconds: Option<u64>,
    pub notify_max_attempts: u8,
    pub notify_retry_backoff_ms: u64,
}

impl WorkerConfig {
    pub fn load() -> AppResult<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup<F>(lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let optional = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_owned())
                .filter(|value| !value.is_empty())
        };

        let instance_arn = required_env(&optional, "SSO_INSTANCE_ARN")?;
        let identity_store_id = required_env(&optional, "IDENTITY_STORE_ID")?;
        let configuration_source = match (
            optional("ASSIGNMENT_CONFIG_FILE"),
            optional("CONFIG_PARAMETER_NAME"),
        ) {
            (Some(path), _) => ConfigurationSource::File(PathBuf::from(path)),
            (None, Some(name)) => ConfigurationSource::Parameter(name),
            (None, None) => {
                return Err(AppError::Validation(
                    "CONFIG_PARAMETER_NAME or ASSIGNMENT_CONFIG_FILE is required".to_owned(),
                ));
            }
        };

        let defaults = ReconciliationSettings::default();
        let create_poll_interval_ms = parse_env(
            &optional,
            "RECONCILE_CREATE_POLL_INTERVAL_MS",
            millis(defaults.create_policy.poll_interval),
        )?;
        let delete_poll_interval_ms = parse_env(
            &optional,
            "RECONCILE_DELETE_POLL_INTERVAL_MS",
            millis(defaults.delete_policy.poll_interval),
        )?;
        let max_poll_attempts = parse_env(
            &optional,
            "RECONCILE_MAX_POLL_ATTEMPTS",
            defaults.create_policy.max_poll_attempts,
        )?;
        let fan_out = parse_env(&optional, "RECONCILE_FAN_OUT", defaults.fan_out)?;
        let dry_run = parse_env(&optional, "RECONCILE_DRY_RUN", defaults.dry_run)?;
        let interval_seconds = optional("RECONCILE_INTERVAL_SECONDS")
            .map(|value| parse_value::<u64>("RECONCILE_INTERVAL_SECONDS", value.as_str()))
            .transpose()?;
        let notify_max_attempts = parse_env(&optional, "NOTIFY_MAX_ATTEMPTS", 3_u8)?;
        let notify_retry_backoff_ms = parse_env(&optional, "NOTIFY_RETRY_BACKOFF_MS", 250_u64)?;

        require_positive("RECONCILE_CREATE_POLL_INTERVAL_MS", create_poll_interval_ms)?;
        require_positive("RECONCILE_DELETE_POLL_INTERVAL_MS", delete_poll_interval_ms)?;
        require_positive("RECONCILE_MAX_POLL_ATTEMPTS", u64::from(max_poll_attempts))?;
        require_positive(
            "RECONCILE_FAN_OUT",
            u64::try_from(fan_out).unwrap_or(u64::MAX),
        )?;
        require_positive("NOTIFY_MAX_ATTEMPTS", u64::from(notify_max_attempts))?;
        if let Some(interval_seconds) = interval_seconds {
            require_positive("RECONCILE_INTERVAL_SECONDS", interval_seconds)?;
        }

        Ok(Self {
            instance_arn,
            identity_store_id,
            configuration_source,
            teams_webhook_url: optional("MS_TEAMS_WEBHOOK_URL"),
            aws_region: optional("AWS_REGION"),
            create_poll_interval_ms,
            delete_poll_interval_ms,
            max_poll_attempts,
            fan_out,
            dry_run,
            event_file: optional("RECONCILE_EVENT_FILE").map(PathBuf::from),
            interval_seconds,
            notify_max_attempts,
            notify_retry_backoff_ms,
        })
    }

    pub fn reconciliation_settings(&self) -> ReconciliationSettings {
        ReconciliationSettings {
            fan_out: self.fan_out,
            create_policy: ApplyPolicy {
                poll_interval: Duration::from_millis(self.create_poll_interval_ms),
                max_poll_attempts: self.max_poll_attempts,
            },
            delete_policy: ApplyPolicy {
                poll_interval: Duration::from_millis(self.delete_poll_interval_ms),
                max_poll_attempts: self.max_poll_attempts,
            },
            dry_run: self.dry_run,
        }
    }
}

fn required_env<F>(optional: &F, name: &str) -> AppResult<String>
where
    F: Fn(&str) -> Option<String>,
{
    optional(name).ok_or_else(|| AppError::Validation(format!("{name} is required")))
}

fn parse_env<F, T>(optional: &F, name: &str, default: T) -> AppResult<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: Display,
{
    match optional(name) {
        Some(value) => parse_value(name, value.as_str()),
        None => Ok(default),
    }
}

fn parse_value<T>(name: &str, value: &str) -> AppResult<T>
where
    T: FromStr,
    T::Err: Display,
{
    value.parse::<T>().map_err(|error| {
        AppError::Validation(format!("invalid {name} value '{value}': {error}"))
    })
}

fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

fn require_positive(name: &str, value: u64) -> AppResult<()> {
    if value == 0 {
        return Err(AppError::Validation(format!(
            "{name} must be greater than zero"
        )));
    }

    Ok(())
}
