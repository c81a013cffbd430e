// Domain Layer - Pure business logic and entities

pub mod error;
pub mod notice;
pub mod reservation;

// Re-exports
pub use error::DomainError;
pub use notice::{Notice, NoticeTemplates, OutboundMessage, QueueRank, DEFAULT_RESOURCE_NAME};
pub use reservation::{
    ContactAddress, DisplayName, NewReservation, Reservation, ReservationId,
};
