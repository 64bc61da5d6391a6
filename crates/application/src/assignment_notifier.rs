use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, warn};

use ssosync_domain::AssignmentNotification;

use crate::reconciliation_ports::NotificationSink;

/// Publishes apply-outcome notifications to the configured sink.
///
/// Delivery failures are logged and swallowed so a broken webhook never
/// interrupts an apply loop.
#[derive(Clone)]
pub struct AssignmentNotifier {
    sink: Arc<dyn NotificationSink>,
}

impl AssignmentNotifier {
    /// Creates a notifier over a sink.
    #[must_use]
    pub fn new(sink: Arc<dyn NotificationSink>) -> Self {
        Self { sink }
    }

    /// Renders and delivers one notification.
    pub async fn notify(&self, notification: &AssignmentNotification) {
        let card = notification.to_message_card(Utc::now());

        match self.sink.deliver(&card).await {
            Ok(()) => debug!(
                action = %notification.action,
                account_id = %notification.account_id,
                summary = %card.summary,
                "delivered assignment notification"
            ),
            Err(error) => warn!(
                action = %notification.action,
                account_id = %notification.account_id,
                error = %error,
                "failed to deliver assignment notification"
            ),
        }
    }
}
