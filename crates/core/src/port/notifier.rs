// Notifier Port
// One-way, best-effort message delivery (e-mail in production)

use crate::domain::OutboundMessage;
use async_trait::async_trait;
use thiserror::Error;

/// Delivery errors (logged by the dispatcher, never surfaced to callers)
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DeliveryError {
    #[error("Transport failed: {0}")]
    Transport(String),

    #[error("Provider rejected message ({status}): {body}")]
    Rejected { status: u16, body: String },

    #[error("Invalid message: {0}")]
    InvalidMessage(String),
}

/// Notifier trait
///
/// Implementations make at most one delivery attempt per call and never
/// retry.
///
/// Implementations:
/// - SendGridNotifier: SendGrid v3 mail API
/// - LogNotifier: writes the message to the log only
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Attempt to deliver `message`
    ///
    /// # Errors
    /// - DeliveryError::Transport if the provider cannot be reached
    /// - DeliveryError::Rejected if the provider refuses the message
    async fn send(&self, message: &OutboundMessage) -> Result<(), DeliveryError>;
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use std::sync::{Arc, Mutex};

    /// Records every message it is asked to send
    #[derive(Clone, Default)]
    pub struct RecordingNotifier {
        sent: Arc<Mutex<Vec<OutboundMessage>>>,
        fail_for: Arc<Mutex<Vec<String>>>,
    }

    impl RecordingNotifier {
        pub fn new() -> Self {
            Self::default()
        }

        /// Make every send to `address` fail with a transport error
        /// (the attempt is still recorded)
        pub fn fail_for(&self, address: impl Into<String>) {
            self.fail_for.lock().unwrap().push(address.into());
        }

        pub fn sent(&self) -> Vec<OutboundMessage> {
            self.sent.lock().unwrap().clone()
        }

        pub fn sent_to(&self, address: &str) -> Vec<OutboundMessage> {
            self.sent()
                .into_iter()
                .filter(|m| m.to == address)
                .collect()
        }

        pub fn call_count(&self) -> usize {
            self.sent.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl Notifier for RecordingNotifier {
        async fn send(&self, message: &OutboundMessage) -> Result<(), DeliveryError> {
            self.sent.lock().unwrap().push(message.clone());

            if self.fail_for.lock().unwrap().contains(&message.to) {
                return Err(DeliveryError::Transport(format!(
                    "mock failure for {}",
                    message.to
                )));
            }
            Ok(())
        }
    }
}
