// Waitlist Service - join, leave and read the first-come-first-served queue

pub mod join;
pub mod leave;


pub use join::JoinRequest;
pub use leave::LeaveOutcome;

use crate::application::dispatch::{DispatchSnapshot, NotificationDispatcher};
use crate::domain::{NoticeTemplates, Reservation, ReservationId};
use crate::error::Result;
use crate::port::{ReservationStore, TimeProvider};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Waitlist Service
///
/// Holds no queue state of its own: every read goes to the store. The only
/// in-process state is `leave_lock`, which lets one departure at a time run
/// its retire -> re-read -> notify sequence.
pub struct WaitlistService {
    store: Arc<dyn ReservationStore>,
    dispatcher: NotificationDispatcher,
    time_provider: Arc<dyn TimeProvider>,
    templates: NoticeTemplates,
    leave_lock: Mutex<()>,
}

impl WaitlistService {
    pub fn new(
        store: Arc<dyn ReservationStore>,
        dispatcher: NotificationDispatcher,
        time_provider: Arc<dyn TimeProvider>,
        templates: NoticeTemplates,
    ) -> Self {
        Self {
            store,
            dispatcher,
            time_provider,
            templates,
            leave_lock: Mutex::new(()),
        }
    }

    /// Active reservations in queue order (rank 1 first)
    pub async fn list_active(&self) -> Result<Vec<Reservation>> {
        self.store.list_active(None).await
    }

    /// Admit a new participant at the back of the queue
    pub async fn join(&self, req: JoinRequest) -> Result<Reservation> {
        join::execute(self.store.as_ref(), self.time_provider.as_ref(), req).await
    }

    /// Retire a reservation and notify the new head of the queue
    pub async fn leave(&self, id: ReservationId) -> Result<LeaveOutcome> {
        let _guard = self.leave_lock.lock().await;
        leave::execute(
            self.store.as_ref(),
            &self.dispatcher,
            self.time_provider.as_ref(),
            &self.templates,
            id,
        )
        .await
    }

    pub async fn count_active(&self) -> Result<i64> {
        self.store.count_active().await
    }

    pub fn dispatch_stats(&self) -> DispatchSnapshot {
        self.dispatcher.stats()
    }

    pub fn templates(&self) -> &NoticeTemplates {
        &self.templates
    }
}
