// Leave Use Case

use crate::application::constants::HEAD_NOTIFY_DEPTH;
use crate::application::dispatch::NotificationDispatcher;
use crate::domain::{Notice, NoticeTemplates, QueueRank, Reservation, ReservationId};
use crate::error::Result;
use crate::port::{ReservationStore, TimeProvider};
use serde::Serialize;
use tracing::{debug, error, info};

/// Result of a leave request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LeaveOutcome {
    pub id: ReservationId,
    /// False when the reservation was already inactive (or unknown)
    pub retired: bool,
    /// Notices handed to the dispatcher (delivery is not awaited)
    pub notices_queued: usize,
}

/// Notices for the head of a freshly read queue
///
/// Slots without a contact address are skipped.
pub fn plan_notices(head: &[Reservation], templates: &NoticeTemplates) -> Vec<Notice> {
    head.iter()
        .enumerate()
        .filter_map(|(idx, reservation)| {
            let rank = QueueRank::from_position(idx + 1)?;
            let notice = templates.render(reservation, rank);
            if notice.is_none() {
                debug!(
                    reservation_id = reservation.id,
                    rank = %rank,
                    "No contact address, rank skipped"
                );
            }
            notice
        })
        .collect()
}

/// Execute leave use case
///
/// Callers must serialize invocations (WaitlistService holds the lock).
///
/// # Errors
/// - AppError::Store if the soft delete fails; nothing changed in that case
pub async fn execute(
    store: &dyn ReservationStore,
    dispatcher: &NotificationDispatcher,
    time_provider: &dyn TimeProvider,
    templates: &NoticeTemplates,
    id: ReservationId,
) -> Result<LeaveOutcome> {
    let now = time_provider.now_millis();
    let retired = store.set_inactive(id, now).await?;

    if !retired {
        // Repeated or unknown leave: the head did not move, so nobody is
        // told again.
        info!(reservation_id = id, "Reservation already inactive, nothing to notify");
        return Ok(LeaveOutcome {
            id,
            retired: false,
            notices_queued: 0,
        });
    }

    info!(reservation_id = id, "Reservation left the queue");

    // Departure is committed from here on; later failures are logged only
    let head = match store.list_active(Some(HEAD_NOTIFY_DEPTH)).await {
        Ok(head) => head,
        Err(e) => {
            error!(
                reservation_id = id,
                error = %e,
                "Could not re-read queue head after leave, no notices sent"
            );
            return Ok(LeaveOutcome {
                id,
                retired: true,
                notices_queued: 0,
            });
        }
    };

    let notices_queued = plan_notices(&head, templates)
        .into_iter()
        .map(|notice| dispatcher.dispatch(notice))
        .filter(|queued| *queued)
        .count();

    info!(
        reservation_id = id,
        head_len = head.len(),
        notices_queued,
        "Queue head notified"
    );

    Ok(LeaveOutcome {
        id,
        retired: true,
        notices_queued,
    })
}
