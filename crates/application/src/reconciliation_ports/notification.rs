use async_trait::async_trait;

use ssosync_core::AppResult;
use ssosync_domain::MessageCard;

/// Port for delivering message cards to an external channel.
#[async_trait]
pub trait NotificationSink: Send + Sync {
    /// Delivers one card.
    async fn deliver(&self, card: &MessageCard) -> AppResult<()>;
}
