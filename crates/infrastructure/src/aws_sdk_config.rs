//! Shared AWS SDK configuration loading and error mapping.

use std::error::Error;

use aws_config::SdkConfig;
use aws_sdk_ssoadmin::error::DisplayErrorContext;
use ssosync_core::AppError;
use tracing::info;

/// Loads the shared SDK configuration from the standard credential chain.
///
/// `region` overrides the region resolved from the environment.
pub async fn load_aws_sdk_config(region: Option<&str>) -> SdkConfig {
    let mut loader = aws_config::from_env();

    if let Some(region) = region {
        loader = loader.region(aws_config::Region::new(region.to_owned()));
    }

    let config = loader.load().await;
    info!(
        region = config.region().map(|region| region.as_ref()).unwrap_or("unset"),
        "AWS SDK configuration loaded"
    );
    config
}

/// Wraps an SDK failure as an upstream error naming the failed operation.
pub(crate) fn upstream_error<E>(operation: &str, error: E) -> AppError
where
    E: Error,
{
    AppError::Upstream(format!("{operation} failed: {}", DisplayErrorContext(error)))
}

/// Keeps a continuation token only when it carries a value.
pub(crate) fn next_token(token: Option<&str>) -> Option<String> {
    token.filter(|token| !token.is_empty()).map(str::to_owned)
}

#[cfg(test)]
mod tests {
    use super::next_token;

    #[test]
    fn empty_tokens_end_the_listing() {
        assert_eq!(next_token(None), None);
        assert_eq!(next_token(Some("")), None);
        assert_eq!(next_token(Some("abc")).as_deref(), Some("abc"));
    }
}
