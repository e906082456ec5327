use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{CoreError, CoreResult};

/// Result of pricing a rental interval.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Quote {
    pub days: i64,
    pub daily_rate: i64,
    pub total: i64,
}

/// Reject bookings that start before `today` or do not end after they start.
pub fn validate_interval(start: NaiveDate, end: NaiveDate, today: NaiveDate) -> CoreResult<()> {
    if start < today {
        return Err(CoreError::InvalidRange(format!(
            "start date {} is before {}",
            start, today
        )));
    }

    if end <= start {
        return Err(CoreError::InvalidRange(format!(
            "end date {} must be after start date {}",
            end, start
        )));
    }

    Ok(())
}

/// Rental days, counting both the start and the end date.
pub fn compute_duration(start: NaiveDate, end: NaiveDate) -> i64 {
    (end - start).num_days() + 1
}

/// Total in the smallest currency unit. Never clamped; a total that does not
/// fit in `i64` is a validation error.
pub fn compute_price(days: i64, daily_rate: i64) -> CoreResult<i64> {
    days.checked_mul(daily_rate).ok_or_else(|| {
        CoreError::ValidationError(format!(
            "{} days at {} per day exceeds the maximum price",
            days, daily_rate
        ))
    })
}

/// Validate, then price, the interval.
pub fn quote(start: NaiveDate, end: NaiveDate, daily_rate: i64, today: NaiveDate) -> CoreResult<Quote> {
    validate_interval(start, end, today)?;

    let days = compute_duration(start, end);
    Ok(Quote {
        days,
        daily_rate,
        total: compute_price(days, daily_rate)?,
    })
}
