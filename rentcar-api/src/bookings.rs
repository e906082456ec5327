use axum::{
    extract::State,
    http::StatusCode,
    routing::get,
    Extension, Json, Router,
};
use chrono::Utc;
use rentcar_core::booking::{Booking, BookingRequest};
use rentcar_core::document::DocumentKind;
use rentcar_core::{Actor, CoreError};
use rentcar_shared::DomainEvent;
use tracing::info;

use crate::{cars::available_car, error::AppError, state::AppState};

pub fn routes() -> Router<AppState> {
    Router::new().route("/v1/bookings", get(my_bookings).post(submit_booking))
}

/// POST /v1/bookings
async fn submit_booking(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Json(req): Json<BookingRequest>,
) -> Result<(StatusCode, Json<Booking>), AppError> {
    let car = available_car(&state, req.car_id).await?;
    let (new_booking, quote) = req.prepare(&actor, &car, state.today())?;
    if !state
        .documents
        .is_stored_url(DocumentKind::PaymentProof, &new_booking.payment_proof_url)
    {
        return Err(CoreError::ValidationError("payment proof must be an uploaded document".to_string()).into());
    }

    let booking = state.bookings.create_booking(&new_booking).await?;
    info!(
        "Booking {} submitted by {} for car {}: {} days, total {}",
        booking.id, actor.id, car.id, quote.days, booking.total_price
    );

    state.publish(DomainEvent::BookingSubmitted {
        booking_id: booking.id,
        car_id: booking.car_id,
        user_id: booking.user_id,
        total_price: booking.total_price,
        at: Utc::now(),
    });

    Ok((StatusCode::CREATED, Json(booking)))
}

/// GET /v1/bookings
async fn my_bookings(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
) -> Result<Json<Vec<Booking>>, AppError> {
    Ok(Json(state.bookings.list_for_user(actor.id).await?))
}
