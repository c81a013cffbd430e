// Log-only notifier (no mail provider configured)

use async_trait::async_trait;
use tracing::info;
use waitlist_core::domain::OutboundMessage;
use waitlist_core::port::{DeliveryError, Notifier};

/// Writes each message to the log instead of delivering it
///
/// Used when no provider credentials are configured, so the waitlist still
/// runs end to end in development.
#[derive(Debug, Default, Clone)]
pub struct LogNotifier;

impl LogNotifier {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Notifier for LogNotifier {
    async fn send(&self, message: &OutboundMessage) -> Result<(), DeliveryError> {
        info!(
            to = %message.to,
            subject = %message.subject,
            body = %message.body,
            "Notification (log only, not delivered)"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_log_notifier_always_succeeds() {
        let notifier = LogNotifier::new();
        let message = OutboundMessage {
            to: "a@x".to_string(),
            subject: "s".to_string(),
            body: "b".to_string(),
        };
        tokio_test::assert_ok!(notifier.send(&message).await);
    }
}
