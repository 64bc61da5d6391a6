use std::time::Duration;

use async_trait::async_trait;
use ssosync_application::NotificationSink;
use ssosync_core::{AppError, AppResult};
use ssosync_domain::MessageCard;
use tracing::debug;

/// Posts message cards to an incoming Teams webhook.
pub struct TeamsWebhookNotificationSink {
    http_client: reqwest::Client,
    webhook_url: String,
    max_attempts: u8,
    retry_backoff_ms: u64,
}

impl TeamsWebhookNotificationSink {
    /// Creates a webhook sink.
    ///
    /// Transient failures are retried up to `max_attempts` times with a
    /// linear backoff of `retry_backoff_ms` per attempt.
    #[must_use]
    pub fn new(
        http_client: reqwest::Client,
        webhook_url: impl Into<String>,
        max_attempts: u8,
        retry_backoff_ms: u64,
    ) -> Self {
        Self {
            http_client,
            webhook_url: webhook_url.into(),
            max_attempts: max_attempts.max(1),
            retry_backoff_ms,
        }
    }

    /// Builds the HTTP client used for webhook delivery.
    ///
    /// Redirects are never followed.
    pub fn http_client(timeout: Duration) -> AppResult<reqwest::Client> {
        reqwest::Client::builder()
            .timeout(timeout)
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .map_err(|error| AppError::Internal(format!("failed to build HTTP client: {error}")))
    }
}

#[async_trait]
impl NotificationSink for TeamsWebhookNotificationSink {
    async fn deliver(&self, card: &MessageCard) -> AppResult<()> {
        let mut attempt = 0_u8;
        let mut last_error: Option<String> = None;

        while attempt < self.max_attempts {
            attempt = attempt.saturating_add(1);
            let response = self
                .http_client
                .post(self.webhook_url.as_str())
                .json(card)
                .send()
                .await;

            match response {
                Ok(response) if response.status().is_success() => {
                    debug!(attempt, summary = %card.summary, "webhook accepted message card");
                    return Ok(());
                }
                Ok(response)
                    if response.status().is_server_error()
                        || response.status() == reqwest::StatusCode::TOO_MANY_REQUESTS =>
                {
                    last_error = Some(format!(
                        "transient HTTP status {} from notification webhook",
                        response.status()
                    ));
                }
                Ok(response) => {
                    let status = response.status();
                    let body = response
                        .text()
                        .await
                        .unwrap_or_else(|_| "<response body unavailable>".to_owned());
                    return Err(AppError::Upstream(format!(
                        "notification webhook rejected card with status {status}: {body}"
                    )));
                }
                Err(error) => {
                    last_error = Some(format!("notification webhook transport error: {error}"));
                }
            }

            if attempt < self.max_attempts {
                let delay = self.retry_backoff_ms.saturating_mul(u64::from(attempt));
                tokio::time::sleep(Duration::from_millis(delay)).await;
            }
        }

        Err(AppError::Upstream(last_error.unwrap_or_else(|| {
            "notification webhook exhausted retries".to_owned()
        })))
    }
}
