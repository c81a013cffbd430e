// Notice Domain Model - who gets told what after a departure

use crate::domain::reservation::{Reservation, ReservationId};
use serde::{Deserialize, Serialize};

/// Default name of the shared resource participants wait for
pub const DEFAULT_RESOURCE_NAME: &str = "RDA Toolkit";

/// Rank within the head of the queue that earns a notice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QueueRank {
    Next,
    SecondInLine,
}

impl QueueRank {
    /// Map a 1-based queue position to a notified rank
    pub fn from_position(position: usize) -> Option<Self> {
        match position {
            1 => Some(QueueRank::Next),
            2 => Some(QueueRank::SecondInLine),
            _ => None,
        }
    }
}

impl std::fmt::Display for QueueRank {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            QueueRank::Next => write!(f, "NEXT"),
            QueueRank::SecondInLine => write!(f, "SECOND_IN_LINE"),
        }
    }
}

/// Outbound message shape handed to a Notifier
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutboundMessage {
    pub to: String,
    pub subject: String,
    pub body: String,
}

/// A message addressed to a reservation at a given rank
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub reservation_id: ReservationId,
    pub rank: QueueRank,
    pub message: OutboundMessage,
}

/// Subject/body wording for rank notices
#[derive(Debug, Clone)]
pub struct NoticeTemplates {
    resource_name: String,
}

impl Default for NoticeTemplates {
    fn default() -> Self {
        Self::new(DEFAULT_RESOURCE_NAME)
    }
}

impl NoticeTemplates {
    pub fn new(resource_name: impl Into<String>) -> Self {
        Self {
            resource_name: resource_name.into(),
        }
    }

    pub fn resource_name(&self) -> &str {
        &self.resource_name
    }

    pub fn subject(&self, rank: QueueRank) -> String {
        match rank {
            QueueRank::Next => format!("You are next for the {}", self.resource_name),
            QueueRank::SecondInLine => {
                format!("You are second in line for the {}", self.resource_name)
            }
        }
    }

    pub fn body(&self, rank: QueueRank, display_name: &str) -> String {
        match rank {
            QueueRank::Next => format!(
                "{}, it is your turn to use the {}.",
                display_name, self.resource_name
            ),
            QueueRank::SecondInLine => format!(
                "{}, you are second in line to use the {}.",
                display_name, self.resource_name
            ),
        }
    }

    /// Build the notice for `reservation` at `rank`, or None when the
    /// reservation has no address.
    pub fn render(&self, reservation: &Reservation, rank: QueueRank) -> Option<Notice> {
        let to = reservation.notify_address()?;
        Some(Notice {
            reservation_id: reservation.id,
            rank,
            message: OutboundMessage {
                to: to.to_string(),
                subject: self.subject(rank),
                body: self.body(rank, &reservation.display_name),
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reservation(id: i64, name: &str, address: Option<&str>) -> Reservation {
        Reservation {
            id,
            display_name: name.to_string(),
            contact_address: address.map(String::from),
            active: true,
            created_at: 0,
            updated_at: 0,
        }
    }

    #[test]
    fn test_rank_positions() {
        assert_eq!(QueueRank::from_position(1), Some(QueueRank::Next));
        assert_eq!(QueueRank::from_position(2), Some(QueueRank::SecondInLine));
        assert_eq!(QueueRank::from_position(0), None);
        assert_eq!(QueueRank::from_position(3), None);
    }

    #[test]
    fn test_render_next() {
        let templates = NoticeTemplates::default();
        let notice = templates
            .render(&reservation(2, "Bob", Some("b@x")), QueueRank::Next)
            .unwrap();

        assert_eq!(notice.reservation_id, 2);
        assert_eq!(notice.message.to, "b@x");
        assert_eq!(notice.message.subject, "You are next for the RDA Toolkit");
        assert_eq!(
            notice.message.body,
            "Bob, it is your turn to use the RDA Toolkit."
        );
    }

    #[test]
    fn test_render_second_with_custom_resource() {
        let templates = NoticeTemplates::new("3D printer");
        let notice = templates
            .render(&reservation(3, "Cy", Some("c@x")), QueueRank::SecondInLine)
            .unwrap();

        assert!(notice.message.subject.contains("second in line"));
        assert_eq!(notice.message.body, "Cy, you are second in line to use the 3D printer.");
    }

    #[test]
    fn test_render_without_address_is_skipped() {
        let templates = NoticeTemplates::default();
        assert!(templates
            .render(&reservation(4, "Dee", None), QueueRank::Next)
            .is_none());
        assert!(templates
            .render(&reservation(5, "Eve", Some("  ")), QueueRank::Next)
            .is_none());
    }
}
