// Join Use Case

use crate::domain::{ContactAddress, DisplayName, NewReservation, Reservation};
use crate::error::Result;
use crate::port::{ReservationStore, TimeProvider};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Join request (raw, unvalidated input)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JoinRequest {
    pub display_name: String,

    #[serde(default)]
    pub contact_address: Option<String>,
}

impl JoinRequest {
    pub fn new(display_name: impl Into<String>, contact_address: Option<&str>) -> Self {
        Self {
            display_name: display_name.into(),
            contact_address: contact_address.map(String::from),
        }
    }
}

/// Validate a join request before anything touches the store
pub fn validate_request(req: &JoinRequest, now_millis: i64) -> Result<NewReservation> {
    let display_name = DisplayName::parse(&req.display_name)?;
    let contact_address = ContactAddress::parse_optional(req.contact_address.as_deref())?;

    Ok(NewReservation {
        display_name,
        contact_address,
        created_at: now_millis,
    })
}

/// Execute join use case (single atomic insert)
pub async fn execute(
    store: &dyn ReservationStore,
    time_provider: &dyn TimeProvider,
    req: JoinRequest,
) -> Result<Reservation> {
    let new = validate_request(&req, time_provider.now_millis())?;

    let reservation = store.insert_active(&new).await?;

    info!(
        reservation_id = reservation.id,
        has_contact = reservation.contact_address.is_some(),
        "Reservation joined the queue"
    );

    Ok(reservation)
}
