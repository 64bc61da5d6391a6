use async_trait::async_trait;
use aws_config::SdkConfig;
use ssosync_application::ConfigurationStore;
use ssosync_core::AppResult;
use tracing::debug;

use crate::aws_sdk_config::upstream_error;

/// Reads the assignment document from one SSM parameter.
#[derive(Clone)]
pub struct AwsSsmConfigurationStore {
    client: aws_sdk_ssm::Client,
    parameter_name: String,
}

impl AwsSsmConfigurationStore {
    /// Creates a store reading `parameter_name`.
    #[must_use]
    pub fn new(config: &SdkConfig, parameter_name: impl Into<String>) -> Self {
        Self {
            client: aws_sdk_ssm::Client::new(config),
            parameter_name: parameter_name.into(),
        }
    }
}

#[async_trait]
impl ConfigurationStore for AwsSsmConfigurationStore {
    async fn load_document(&self) -> AppResult<Option<String>> {
        match self
            .client
            .get_parameter()
            .name(self.parameter_name.as_str())
            .send()
            .await
        {
            Ok(output) => {
                let value = output
                    .parameter()
                    .and_then(|parameter| parameter.value())
                    .map(str::to_owned);
                debug!(
                    parameter_name = %self.parameter_name,
                    found = value.is_some(),
                    "read assignment configuration parameter"
                );
                Ok(value)
            }
            Err(error) => {
                let service_error = error.into_service_error();
                if service_error.is_parameter_not_found() {
                    Ok(None)
                } else {
                    Err(upstream_error("ssm:GetParameter", service_error))
                }
            }
        }
    }
}
