// Waitlist Infrastructure - Notifier Adapters
// Implements: Notifier

pub mod log_notifier;
pub mod sendgrid;

pub use log_notifier::LogNotifier;
pub use sendgrid::{SendGridConfig, SendGridNotifier};
