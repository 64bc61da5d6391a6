//! Console notification sink for development. Logs cards to tracing output.

use async_trait::async_trait;
use ssosync_application::NotificationSink;
use ssosync_core::AppResult;
use ssosync_domain::MessageCard;
use tracing::info;

/// Notification sink that logs message cards instead of posting them.
#[derive(Clone, Default)]
pub struct ConsoleNotificationSink;

impl ConsoleNotificationSink {
    /// Creates a new console notification sink.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl NotificationSink for ConsoleNotificationSink {
    async fn deliver(&self, card: &MessageCard) -> AppResult<()> {
        let facts = card
            .sections
            .iter()
            .flat_map(|section| section.facts.iter())
            .map(|fact| format!("{}: {}", fact.name, fact.value))
            .collect::<Vec<_>>()
            .join("\n");

        info!(
            summary = %card.summary,
            theme_color = %card.theme_color,
            "--- NOTIFICATION (console) ---\n{}\n\n{}\n--- END NOTIFICATION ---",
            card.summary,
            facts
        );

        Ok(())
    }
}
