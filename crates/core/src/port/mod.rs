// Port Layer - Interfaces for external collaborators

pub mod notifier;
pub mod reservation_store;
pub mod time_provider;

// Re-exports
pub use notifier::{DeliveryError, Notifier};
pub use reservation_store::ReservationStore;
pub use time_provider::TimeProvider;
