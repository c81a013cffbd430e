// Reservation Store Port (Interface)

use crate::domain::{NewReservation, Reservation, ReservationId};
use crate::error::Result;
use async_trait::async_trait;

/// Durable record of reservations
///
/// Reads are always ordered by ascending `id` and filtered to active rows.
/// Writes are single atomic statements; rows are never physically deleted.
#[async_trait]
pub trait ReservationStore: Send + Sync {
    /// Insert a new active reservation and return it with its assigned id
    async fn insert_active(&self, new: &NewReservation) -> Result<Reservation>;

    /// Soft-delete by id
    ///
    /// Returns true when this call flipped `active` to false, false when the
    /// reservation was already inactive or does not exist.
    async fn set_inactive(&self, id: ReservationId, updated_at: i64) -> Result<bool>;

    /// Active reservations, ascending by id, optionally limited
    async fn list_active(&self, limit: Option<u32>) -> Result<Vec<Reservation>>;

    /// Number of active reservations
    async fn count_active(&self) -> Result<i64>;
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use crate::error::AppError;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;

    #[derive(Default)]
    struct Rows {
        next_id: ReservationId,
        rows: Vec<Reservation>,
    }

    /// In-memory store with failure injection
    #[derive(Default)]
    pub struct InMemoryReservationStore {
        state: Mutex<Rows>,
        fail_writes: AtomicBool,
        fail_reads: AtomicBool,
        write_delay: Option<Duration>,
    }

    impl InMemoryReservationStore {
        pub fn new() -> Self {
            Self::default()
        }

        /// Sleep inside `set_inactive`, widening race windows in tests
        pub fn with_write_delay(delay: Duration) -> Self {
            Self {
                write_delay: Some(delay),
                ..Self::default()
            }
        }

        pub fn fail_writes(&self, fail: bool) {
            self.fail_writes.store(fail, Ordering::SeqCst);
        }

        pub fn fail_reads(&self, fail: bool) {
            self.fail_reads.store(fail, Ordering::SeqCst);
        }

        /// Every row, including retired ones
        pub fn all_rows(&self) -> Vec<Reservation> {
            self.state.lock().unwrap().rows.clone()
        }

        pub fn get(&self, id: ReservationId) -> Option<Reservation> {
            self.state
                .lock()
                .unwrap()
                .rows
                .iter()
                .find(|r| r.id == id)
                .cloned()
        }
    }

    #[async_trait]
    impl ReservationStore for InMemoryReservationStore {
        async fn insert_active(&self, new: &NewReservation) -> Result<Reservation> {
            if self.fail_writes.load(Ordering::SeqCst) {
                return Err(AppError::Store("mock write failure".to_string()));
            }
            let mut state = self.state.lock().unwrap();
            state.next_id += 1;
            let reservation = Reservation::admitted(state.next_id, new);
            state.rows.push(reservation.clone());
            Ok(reservation)
        }

        async fn set_inactive(&self, id: ReservationId, updated_at: i64) -> Result<bool> {
            if let Some(delay) = self.write_delay {
                tokio::time::sleep(delay).await;
            }
            if self.fail_writes.load(Ordering::SeqCst) {
                return Err(AppError::Store("mock write failure".to_string()));
            }
            let mut state = self.state.lock().unwrap();
            Ok(state
                .rows
                .iter_mut()
                .find(|r| r.id == id)
                .map(|r| r.retire(updated_at))
                .unwrap_or(false))
        }

        async fn list_active(&self, limit: Option<u32>) -> Result<Vec<Reservation>> {
            if self.fail_reads.load(Ordering::SeqCst) {
                return Err(AppError::Store("mock read failure".to_string()));
            }
            let state = self.state.lock().unwrap();
            // Rows are appended in id order already
            let active = state.rows.iter().filter(|r| r.active).cloned();
            Ok(match limit {
                Some(n) => active.take(n as usize).collect(),
                None => active.collect(),
            })
        }

        async fn count_active(&self) -> Result<i64> {
            if self.fail_reads.load(Ordering::SeqCst) {
                return Err(AppError::Store("mock read failure".to_string()));
            }
            let state = self.state.lock().unwrap();
            Ok(state.rows.iter().filter(|r| r.active).count() as i64)
        }
    }
}
