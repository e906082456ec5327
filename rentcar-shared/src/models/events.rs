use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// State changes broadcast to the admin console.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DomainEvent {
    BookingSubmitted {
        booking_id: i64,
        car_id: i64,
        user_id: Uuid,
        total_price: i64,
        at: DateTime<Utc>,
    },
    BookingReviewed {
        booking_id: i64,
        reviewer_id: Uuid,
        status: String,
        at: DateTime<Utc>,
    },
    RoleChanged {
        profile_id: Uuid,
        changed_by: Uuid,
        role: String,
        at: DateTime<Utc>,
    },
}

impl DomainEvent {
    /// SSE event name
    pub fn name(&self) -> &'static str {
        match self {
            DomainEvent::BookingSubmitted { .. } => "booking.submitted",
            DomainEvent::BookingReviewed { .. } => "booking.reviewed",
            DomainEvent::RoleChanged { .. } => "profile.role_changed",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_tagging() {
        let event = DomainEvent::BookingReviewed {
            booking_id: 7,
            reviewer_id: Uuid::nil(),
            status: "confirmed".to_string(),
            at: Utc::now(),
        };
        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["type"], "booking_reviewed");
        assert_eq!(value["booking_id"], 7);
        assert_eq!(event.name(), "booking.reviewed");
    }
}
