//! RPC Request/Response Types
//!
//! Defines the JSON-RPC method parameters and results.

use serde::{Deserialize, Serialize};
use waitlist_core::application::DispatchSnapshot;
use waitlist_core::domain::ReservationId;

/// waitlist.list.v1 - One queue slot
///
/// Contact addresses are never echoed back to callers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct QueueEntry {
    pub id: ReservationId,
    pub display_name: String,
    pub has_contact: bool,
    /// 1-based position in the queue
    pub rank: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListResponse {
    pub reservations: Vec<QueueEntry>,
}

/// waitlist.join.v1 - Join the queue
#[derive(Debug, Deserialize)]
pub struct JoinParams {
    pub display_name: String,
    #[serde(default)]
    pub contact_address: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JoinResponse {
    pub id: ReservationId,
    pub display_name: String,
    /// None when the queue could not be re-read after the insert
    pub rank: Option<usize>,
}

/// waitlist.leave.v1 - Leave the queue
#[derive(Debug, Deserialize)]
pub struct LeaveParams {
    pub id: ReservationId,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaveResponse {
    pub id: ReservationId,
    pub retired: bool,
    pub notices_queued: usize,
}

/// admin.stats.v1 - Queue and dispatcher statistics
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    pub active_reservations: i64,
    pub resource_name: String,
    pub notices: DispatchSnapshot,
    pub uptime_seconds: i64,
}
