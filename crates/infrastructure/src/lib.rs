//! Infrastructure adapters for application ports.

#![forbid(unsafe_code)]

mod aws_identity_store_directory;
mod aws_organizations_service;
mod aws_sdk_config;
mod aws_sso_admin_assignment_service;
mod aws_ssm_configuration_store;
mod console_notification_sink;
mod file_configuration_store;
mod teams_webhook_notification_sink;

pub use aws_identity_store_directory::AwsIdentityStoreDirectory;
pub use aws_organizations_service::AwsOrganizationsService;
pub use aws_sdk_config::load_aws_sdk_config;
pub use aws_sso_admin_assignment_service::AwsSsoAdminAssignmentService;
pub use aws_ssm_configuration_store::AwsSsmConfigurationStore;
pub use console_notification_sink::ConsoleNotificationSink;
pub use file_configuration_store::FileConfigurationStore;
pub use teams_webhook_notification_sink::TeamsWebhookNotificationSink;
