use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use chrono::NaiveDate;
use rentcar_core::car::Car;
use rentcar_core::pricing;
use serde::{Deserialize, Serialize};

use crate::{error::AppError, state::AppState};

#[derive(Debug, Deserialize)]
pub struct QuoteRequest {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

#[derive(Debug, Serialize)]
pub struct QuoteResponse {
    pub car_id: i64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub days: i64,
    pub price_per_day: i64,
    pub total_price: i64,
    pub currency: String,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/cars", get(list_cars))
        .route("/v1/cars/{id}", get(get_car))
        .route("/v1/cars/{id}/quote", post(quote_car))
}

/// Cars customers may book. Unavailable cars are hidden.
pub(crate) async fn available_car(state: &AppState, id: i64) -> Result<Car, AppError> {
    state
        .cars
        .get_car(id)
        .await?
        .filter(|car| car.is_available)
        .ok_or_else(|| AppError::NotFoundError(format!("Car {} not found", id)))
}

async fn list_cars(State(state): State<AppState>) -> Result<Json<Vec<Car>>, AppError> {
    Ok(Json(state.cars.list_available().await?))
}

async fn get_car(State(state): State<AppState>, Path(id): Path<i64>) -> Result<Json<Car>, AppError> {
    Ok(Json(available_car(&state, id).await?))
}

async fn quote_car(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<QuoteRequest>,
) -> Result<Json<QuoteResponse>, AppError> {
    let car = available_car(&state, id).await?;
    let quote = pricing::quote(req.start_date, req.end_date, car.price_per_day, state.today())?;

    Ok(Json(QuoteResponse {
        car_id: car.id,
        start_date: req.start_date,
        end_date: req.end_date,
        days: quote.days,
        price_per_day: quote.daily_rate,
        total_price: quote.total,
        currency: state.business_rules.currency.clone(),
    }))
}
