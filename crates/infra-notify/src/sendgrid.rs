// SendGrid notifier
// Delivers notices as plain-text e-mail through the SendGrid v3 mail API

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;
use tracing::debug;
use waitlist_core::domain::OutboundMessage;
use waitlist_core::error::{AppError, Result};
use waitlist_core::port::{DeliveryError, Notifier};

pub const SENDGRID_API_URL: &str = "https://api.sendgrid.com/v3/mail/send";

/// Per-request timeout; a single attempt, never retried
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Cap on provider error bodies copied into logs
const MAX_ERROR_BODY_LEN: usize = 512;

#[derive(Debug, Serialize)]
struct SendGridAddress<'a> {
    email: &'a str,
}

#[derive(Debug, Serialize)]
struct SendGridPersonalization<'a> {
    to: Vec<SendGridAddress<'a>>,
}

#[derive(Debug, Serialize)]
struct SendGridContent<'a> {
    #[serde(rename = "type")]
    content_type: &'static str,
    value: &'a str,
}

#[derive(Debug, Serialize)]
struct SendGridRequest<'a> {
    personalizations: Vec<SendGridPersonalization<'a>>,
    from: SendGridAddress<'a>,
    subject: &'a str,
    content: Vec<SendGridContent<'a>>,
}

/// SendGrid connection settings
#[derive(Debug, Clone)]
pub struct SendGridConfig {
    pub api_key: String,
    /// Verified sender address
    pub from: String,
    /// Override for tests or regional endpoints
    pub api_url: String,
}

impl SendGridConfig {
    pub fn new(api_key: impl Into<String>, from: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            from: from.into(),
            api_url: SENDGRID_API_URL.to_string(),
        }
    }
}

pub struct SendGridNotifier {
    config: SendGridConfig,
    client: Client,
}

impl SendGridNotifier {
    /// Create a notifier with its own HTTP client
    ///
    /// # Errors
    /// - AppError::Config if the API key or sender is empty, or the HTTP
    ///   client cannot be built
    pub fn new(config: SendGridConfig) -> Result<Self> {
        if config.api_key.trim().is_empty() {
            return Err(AppError::Config("SendGrid API key is empty".to_string()));
        }
        if config.from.trim().is_empty() {
            return Err(AppError::Config("SendGrid sender address is empty".to_string()));
        }

        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| AppError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    fn build_request<'a>(&'a self, message: &'a OutboundMessage) -> SendGridRequest<'a> {
        SendGridRequest {
            personalizations: vec![SendGridPersonalization {
                to: vec![SendGridAddress { email: &message.to }],
            }],
            from: SendGridAddress {
                email: &self.config.from,
            },
            subject: &message.subject,
            content: vec![SendGridContent {
                content_type: "text/plain",
                value: &message.body,
            }],
        }
    }
}

#[async_trait]
impl Notifier for SendGridNotifier {
    async fn send(&self, message: &OutboundMessage) -> std::result::Result<(), DeliveryError> {
        if message.to.trim().is_empty() {
            return Err(DeliveryError::InvalidMessage("empty recipient".to_string()));
        }

        let response = self
            .client
            .post(&self.config.api_url)
            .bearer_auth(&self.config.api_key)
            .json(&self.build_request(message))
            .send()
            .await
            .map_err(|e| DeliveryError::Transport(format!("SendGrid request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let mut body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            if body.len() > MAX_ERROR_BODY_LEN {
                let mut cut = MAX_ERROR_BODY_LEN;
                while !body.is_char_boundary(cut) {
                    cut -= 1;
                }
                body.truncate(cut);
            }
            return Err(DeliveryError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        debug!(status = status.as_u16(), "SendGrid accepted message");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message() -> OutboundMessage {
        OutboundMessage {
            to: "b@x.org".to_string(),
            subject: "You are next for the RDA Toolkit".to_string(),
            body: "Bob, it is your turn to use the RDA Toolkit.".to_string(),
        }
    }

    #[test]
    fn test_request_shape() {
        let notifier =
            SendGridNotifier::new(SendGridConfig::new("key", "desk@example.org")).unwrap();
        let msg = message();
        let json = serde_json::to_value(notifier.build_request(&msg)).unwrap();

        assert_eq!(json["personalizations"][0]["to"][0]["email"], "b@x.org");
        assert_eq!(json["from"]["email"], "desk@example.org");
        assert_eq!(json["subject"], "You are next for the RDA Toolkit");
        assert_eq!(json["content"][0]["type"], "text/plain");
        assert_eq!(
            json["content"][0]["value"],
            "Bob, it is your turn to use the RDA Toolkit."
        );
    }

    #[test]
    fn test_rejects_missing_credentials() {
        assert!(matches!(
            SendGridNotifier::new(SendGridConfig::new("  ", "desk@example.org")),
            Err(AppError::Config(_))
        ));
        assert!(matches!(
            SendGridNotifier::new(SendGridConfig::new("key", "")),
            Err(AppError::Config(_))
        ));
    }

    #[tokio::test]
    async fn test_unreachable_provider_is_transport_error() {
        let mut config = SendGridConfig::new("key", "desk@example.org");
        // Port 9 (discard) on localhost: connection refused
        config.api_url = "http://127.0.0.1:9/v3/mail/send".to_string();
        let notifier = SendGridNotifier::new(config).unwrap();

        let err = notifier.send(&message()).await.unwrap_err();
        assert!(matches!(err, DeliveryError::Transport(_)));
    }

    #[tokio::test]
    async fn test_empty_recipient_rejected_before_request() {
        let notifier =
            SendGridNotifier::new(SendGridConfig::new("key", "desk@example.org")).unwrap();
        let mut msg = message();
        msg.to = String::new();

        let err = notifier.send(&msg).await.unwrap_err();
        assert!(matches!(err, DeliveryError::InvalidMessage(_)));
    }
}
