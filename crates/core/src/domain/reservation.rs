// Reservation Domain Model

use crate::domain::error::{DomainError, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

/// Reservation ID (assigned by the store, ascending, never reused)
pub type ReservationId = i64;

/// Upper bound on display name length (characters)
///
/// Only guards the store and log lines against oversized input; any
/// realistic name, including long multi-part names, fits well below it.
pub const MAX_DISPLAY_NAME_LEN: usize = 4096;

/// Maximum contact address length (RFC 5321 path limit)
pub const MAX_CONTACT_ADDRESS_LEN: usize = 254;

// HTML5 e-mail grammar: single-label domains such as `a@x` are accepted
static ADDRESS_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^[A-Za-z0-9.!#$%&'*+/=?^_`{|}~-]+@[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?)*$",
    )
    .expect("address pattern is a valid regex")
});

/// Validated, trimmed, non-empty display name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayName(String);

impl DisplayName {
    pub fn parse(raw: &str) -> Result<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(DomainError::EmptyDisplayName);
        }

        let len = trimmed.chars().count();
        if len > MAX_DISPLAY_NAME_LEN {
            return Err(DomainError::DisplayNameTooLong {
                len,
                max: MAX_DISPLAY_NAME_LEN,
            });
        }

        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Syntactically valid contact (e-mail) address
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactAddress(String);

impl ContactAddress {
    pub fn parse(raw: &str) -> Result<Self> {
        let trimmed = raw.trim();
        if trimmed.len() > MAX_CONTACT_ADDRESS_LEN {
            return Err(DomainError::InvalidContactAddress(format!(
                "longer than {} characters",
                MAX_CONTACT_ADDRESS_LEN
            )));
        }
        if !ADDRESS_PATTERN.is_match(trimmed) {
            return Err(DomainError::InvalidContactAddress(trimmed.to_string()));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Parse an optional form field; blank input means "no address".
    pub fn parse_optional(raw: Option<&str>) -> Result<Option<Self>> {
        match raw.map(str::trim) {
            None | Some("") => Ok(None),
            Some(value) => Self::parse(value).map(Some),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Validated input for a new reservation
#[derive(Debug, Clone)]
pub struct NewReservation {
    pub display_name: DisplayName,
    pub contact_address: Option<ContactAddress>,
    pub created_at: i64, // epoch ms
}

/// Reservation Entity
///
/// Queue order is the ascending order of `id` among active reservations.
/// A reservation is created active, may be retired once, and is never
/// deleted or reactivated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reservation {
    pub id: ReservationId,
    pub display_name: String,
    pub contact_address: Option<String>,
    pub active: bool,
    pub created_at: i64, // epoch ms
    pub updated_at: i64, // epoch ms, bumped when `active` flips
}

impl Reservation {
    /// Build the active record the store writes for `new`
    pub fn admitted(id: ReservationId, new: &NewReservation) -> Self {
        Self {
            id,
            display_name: new.display_name.as_str().to_string(),
            contact_address: new.contact_address.as_ref().map(|a| a.as_str().to_string()),
            active: true,
            created_at: new.created_at,
            updated_at: new.created_at,
        }
    }

    /// Address to notify, if any
    pub fn notify_address(&self) -> Option<&str> {
        self.contact_address
            .as_deref()
            .map(str::trim)
            .filter(|a| !a.is_empty())
    }

    /// Soft-delete. Returns false (and leaves the record untouched) when
    /// the reservation is already inactive.
    pub fn retire(&mut self, now_millis: i64) -> bool {
        if !self.active {
            return false;
        }
        self.active = false;
        self.updated_at = now_millis;
        true
    }
}
