//! RPC Method Handlers
//!
//! Thin translation between wire types and `WaitlistService` calls.

use crate::error::to_rpc_error;
use crate::types::{
    JoinParams, JoinResponse, LeaveParams, LeaveResponse, ListResponse, QueueEntry, StatsResponse,
};
use jsonrpsee::types::ErrorObjectOwned;
use std::sync::Arc;
use tracing::warn;
use waitlist_core::application::{JoinRequest, WaitlistService};

/// RPC Handler with injected dependencies
pub struct RpcHandler {
    service: Arc<WaitlistService>,
    start_time: std::time::Instant,
}

impl RpcHandler {
    pub fn new(service: Arc<WaitlistService>) -> Self {
        Self {
            service,
            start_time: std::time::Instant::now(),
        }
    }

    /// waitlist.list.v1
    pub async fn list(&self) -> Result<ListResponse, ErrorObjectOwned> {
        let active = self.service.list_active().await.map_err(to_rpc_error)?;

        let reservations = active
            .iter()
            .enumerate()
            .map(|(idx, r)| QueueEntry {
                id: r.id,
                display_name: r.display_name.clone(),
                has_contact: r.notify_address().is_some(),
                rank: idx + 1,
            })
            .collect();

        Ok(ListResponse { reservations })
    }

    /// waitlist.join.v1
    pub async fn join(&self, params: JoinParams) -> Result<JoinResponse, ErrorObjectOwned> {
        let req = JoinRequest {
            display_name: params.display_name,
            contact_address: params.contact_address,
        };
        let reservation = self.service.join(req).await.map_err(to_rpc_error)?;

        // The insert is committed: a failed rank read must not turn into an
        // error, or a retrying client would join twice.
        let rank = match self.service.list_active().await {
            Ok(active) => active
                .iter()
                .position(|r| r.id == reservation.id)
                .map(|idx| idx + 1),
            Err(e) => {
                warn!(
                    reservation_id = reservation.id,
                    error = %e,
                    "Joined, but queue rank could not be read"
                );
                None
            }
        };

        Ok(JoinResponse {
            id: reservation.id,
            display_name: reservation.display_name,
            rank,
        })
    }

    /// waitlist.leave.v1
    pub async fn leave(&self, params: LeaveParams) -> Result<LeaveResponse, ErrorObjectOwned> {
        let outcome = self.service.leave(params.id).await.map_err(to_rpc_error)?;

        Ok(LeaveResponse {
            id: outcome.id,
            retired: outcome.retired,
            notices_queued: outcome.notices_queued,
        })
    }

    /// admin.stats.v1
    pub async fn stats(&self) -> Result<StatsResponse, ErrorObjectOwned> {
        let active_reservations = self.service.count_active().await.map_err(to_rpc_error)?;

        Ok(StatsResponse {
            active_reservations,
            resource_name: self.service.templates().resource_name().to_string(),
            notices: self.service.dispatch_stats(),
            uptime_seconds: self.start_time.elapsed().as_secs() as i64,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::code;
    use waitlist_core::application::{dispatch_channel, DispatchWorker};
    use waitlist_core::domain::NoticeTemplates;
    use waitlist_core::port::notifier::mocks::RecordingNotifier;
    use waitlist_core::port::reservation_store::mocks::InMemoryReservationStore;
    use waitlist_core::port::time_provider::ManualTimeProvider;

    // The worker is returned unstarted so queued notices stay countable
    fn setup() -> (RpcHandler, Arc<InMemoryReservationStore>, DispatchWorker) {
        let store = Arc::new(InMemoryReservationStore::new());
        let (dispatcher, worker) = dispatch_channel(Arc::new(RecordingNotifier::new()), 8);
        let service = Arc::new(WaitlistService::new(
            store.clone(),
            dispatcher,
            Arc::new(ManualTimeProvider::new(0)),
            NoticeTemplates::default(),
        ));
        (RpcHandler::new(service), store, worker)
    }

    fn join_params(name: &str, address: Option<&str>) -> JoinParams {
        JoinParams {
            display_name: name.to_string(),
            contact_address: address.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn test_join_reports_rank() {
        let (handler, _, _worker) = setup();

        let first = handler.join(join_params("Alice", Some("a@x"))).await.unwrap();
        let second = handler.join(join_params("Bob", None)).await.unwrap();

        assert_eq!(first.rank, Some(1));
        assert_eq!(second.rank, Some(2));
        assert_eq!(second.display_name, "Bob");
    }

    #[tokio::test]
    async fn test_list_hides_addresses() {
        let (handler, _, _worker) = setup();
        handler.join(join_params("Alice", Some("a@x"))).await.unwrap();
        handler.join(join_params("Bob", None)).await.unwrap();

        let list = handler.list().await.unwrap();
        assert_eq!(list.reservations.len(), 2);
        assert!(list.reservations[0].has_contact);
        assert!(!list.reservations[1].has_contact);
        assert_eq!(list.reservations[1].rank, 2);

        let json = serde_json::to_string(&list).unwrap();
        assert!(!json.contains("a@x"));
    }

    #[tokio::test]
    async fn test_invalid_join_maps_to_validation_code() {
        let (handler, _, _worker) = setup();

        let err = handler.join(join_params("  ", None)).await.unwrap_err();
        assert_eq!(err.code(), code::VALIDATION_ERROR);
    }

    #[tokio::test]
    async fn test_store_failure_maps_to_store_code() {
        let (handler, store, _worker) = setup();
        store.fail_reads(true);

        let err = handler.list().await.unwrap_err();
        assert_eq!(err.code(), code::STORE_ERROR);
    }

    #[tokio::test]
    async fn test_join_succeeds_when_rank_read_fails() {
        let (handler, store, _worker) = setup();
        store.fail_reads(true);

        let joined = handler.join(join_params("Alice", None)).await.unwrap();
        assert_eq!(joined.rank, None);
        assert_eq!(joined.display_name, "Alice");
        assert_eq!(store.all_rows().len(), 1);

        // Nothing to retry: the queue holds Alice exactly once
        store.fail_reads(false);
        let list = handler.list().await.unwrap();
        assert_eq!(list.reservations.len(), 1);
        assert_eq!(list.reservations[0].id, joined.id);
    }

    #[tokio::test]
    async fn test_leave_and_stats() {
        let (handler, _, _worker) = setup();
        let a = handler.join(join_params("Alice", Some("a@x"))).await.unwrap();
        handler.join(join_params("Bob", Some("b@x"))).await.unwrap();

        let left = handler.leave(LeaveParams { id: a.id }).await.unwrap();
        assert!(left.retired);
        assert_eq!(left.notices_queued, 1);

        let again = handler.leave(LeaveParams { id: a.id }).await.unwrap();
        assert!(!again.retired);

        let stats = handler.stats().await.unwrap();
        assert_eq!(stats.active_reservations, 1);
        assert_eq!(stats.notices.queued, 1);
        assert_eq!(stats.resource_name, "RDA Toolkit");
    }
}
