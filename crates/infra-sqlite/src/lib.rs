// Waitlist Infrastructure - SQLite Adapter
// Implements: ReservationStore

mod connection;
mod migration;
mod reservation_store;

pub use connection::create_pool;
pub use migration::run_migrations;
pub use reservation_store::SqliteReservationStore;

// Note: sqlx::Error conversion is handled by wrapping in helper functions
// due to Rust's orphan rules (cannot implement From<sqlx::Error> for AppError here)
