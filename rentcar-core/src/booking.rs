use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::car::Car;
use crate::identity::{Actor, Role};
use crate::policy::{authorize, Action};
use crate::pricing::{self, Quote};
use crate::{CoreError, CoreResult};

/// Booking status in the lifecycle
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    PendingPayment,
    PendingVerification,
    Confirmed,
    Completed,
    Cancelled,
}

impl BookingStatus {
    pub const ALL: [BookingStatus; 5] = [
        BookingStatus::PendingPayment,
        BookingStatus::PendingVerification,
        BookingStatus::Confirmed,
        BookingStatus::Completed,
        BookingStatus::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::PendingPayment => "pending_payment",
            BookingStatus::PendingVerification => "pending_verification",
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Completed => "completed",
            BookingStatus::Cancelled => "cancelled",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, BookingStatus::Completed | BookingStatus::Cancelled)
    }

    pub fn can_transition_to(&self, to: BookingStatus) -> bool {
        matches!(
            (self, to),
            (BookingStatus::PendingPayment, BookingStatus::PendingVerification)
                | (BookingStatus::PendingVerification, BookingStatus::Confirmed)
                | (BookingStatus::PendingVerification, BookingStatus::Cancelled)
                | (BookingStatus::Confirmed, BookingStatus::Completed)
        )
    }

    pub fn transition(self, to: BookingStatus) -> CoreResult<BookingStatus> {
        if !self.can_transition_to(to) {
            return Err(CoreError::InvalidTransition {
                from: self.to_string(),
                to: to.to_string(),
            });
        }
        Ok(to)
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BookingStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BookingStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| CoreError::ValidationError(format!("unknown booking status '{}'", s)))
    }
}

/// Admin verdict on a submitted payment proof.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum BookingDecision {
    Approve,
    Reject,
}

impl BookingDecision {
    pub fn action(&self) -> Action {
        match self {
            BookingDecision::Approve => Action::ApproveBooking,
            BookingDecision::Reject => Action::RejectBooking,
        }
    }

    pub fn target(&self) -> BookingStatus {
        match self {
            BookingDecision::Approve => BookingStatus::Confirmed,
            BookingDecision::Reject => BookingStatus::Cancelled,
        }
    }
}

/// Permission first, then the state machine.
pub fn review(role: Role, current: BookingStatus, decision: BookingDecision) -> CoreResult<BookingStatus> {
    authorize(role, decision.action(), false)?;
    current.transition(decision.target())
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Booking {
    pub id: i64,
    pub user_id: Uuid,
    pub car_id: i64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub total_price: i64,
    pub status: BookingStatus,
    pub payment_proof_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A validated booking ready to be inserted.
#[derive(Debug, Clone, PartialEq)]
pub struct NewBooking {
    pub user_id: Uuid,
    pub car_id: i64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub total_price: i64,
    pub status: BookingStatus,
    pub payment_proof_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BookingRequest {
    pub car_id: i64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub payment_proof_url: String,
}

impl BookingRequest {
    /// Check the request against the car and `today` and price it.
    pub fn prepare(&self, actor: &Actor, car: &Car, today: NaiveDate) -> CoreResult<(NewBooking, Quote)> {
        if car.id != self.car_id {
            return Err(CoreError::ValidationError("car does not match request".to_string()));
        }
        if !car.is_available {
            return Err(CoreError::ValidationError(format!("car {} is not available", car.id)));
        }
        if car.price_per_day <= 0 {
            return Err(CoreError::ValidationError(format!(
                "car {} has no valid daily price",
                car.id
            )));
        }
        if self.payment_proof_url.trim().is_empty() {
            return Err(CoreError::ValidationError("payment proof is required".to_string()));
        }

        let quote = pricing::quote(self.start_date, self.end_date, car.price_per_day, today)?;

        let booking = NewBooking {
            user_id: actor.id,
            car_id: car.id,
            start_date: self.start_date,
            end_date: self.end_date,
            total_price: quote.total,
            status: BookingStatus::PendingVerification,
            payment_proof_url: self.payment_proof_url.trim().to_string(),
        };

        Ok((booking, quote))
    }
}
