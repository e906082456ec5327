use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{
        sse::{Event, KeepAlive, Sse},
        IntoResponse, Response,
    },
    routing::{get, post, put},
    Extension, Json, Router,
};
use chrono::{NaiveDate, Utc};
use futures_util::stream::{Stream, StreamExt};
use rentcar_core::blog::{BlogPost, BlogPostInput};
use rentcar_core::booking::{self, Booking, BookingDecision, BookingStatus};
use rentcar_core::car::{Car, CarInput};
use rentcar_core::profile::{Profile, RoleCounts};
use rentcar_core::report::{BookingFilter, BookingReportRow, DashboardStats, ReportFormat};
use rentcar_core::{authorize, Action, Actor, Role};
use rentcar_shared::DomainEvent;
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use tokio_stream::wrappers::BroadcastStream;
use tracing::info;
use uuid::Uuid;

use crate::{error::AppError, state::AppState};

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct ExportQuery {
    pub status: Option<BookingStatus>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    #[serde(default)]
    pub format: ReportFormat,
}

impl ExportQuery {
    fn filter(&self) -> BookingFilter {
        BookingFilter { status: self.status, from: self.from, to: self.to }
    }
}

#[derive(Debug, Serialize)]
pub struct UserListResponse {
    pub users: Vec<Profile>,
    pub counts: RoleCounts,
}

#[derive(Debug, Deserialize)]
pub struct ChangeRoleRequest {
    pub role: Role,
}

/// Everything under `/v1/admin`. Callers must layer the actor and
/// admin-area middleware on top.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/admin/stats", get(dashboard_stats))
        .route("/v1/admin/bookings", get(list_bookings))
        .route("/v1/admin/bookings/export", get(export_bookings))
        .route("/v1/admin/bookings/{id}/approve", post(approve_booking))
        .route("/v1/admin/bookings/{id}/reject", post(reject_booking))
        .route("/v1/admin/cars", get(list_all_cars).post(create_car))
        .route("/v1/admin/cars/{id}", put(update_car).delete(delete_car))
        .route("/v1/admin/users", get(list_users))
        .route("/v1/admin/users/{id}/role", put(change_role))
        .route("/v1/admin/blog", post(create_post))
        .route("/v1/admin/blog/{id}", put(update_post).delete(delete_post))
        .route("/v1/admin/events", get(event_stream))
}

// ============================================================================
// Dashboard
// ============================================================================

/// GET /v1/admin/stats
async fn dashboard_stats(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
) -> Result<Json<DashboardStats>, AppError> {
    authorize(actor.role, Action::ViewAdminArea, false)?;

    Ok(Json(DashboardStats {
        total_users: state.profiles.count_profiles().await?,
        total_cars: state.cars.count_cars().await?,
        total_bookings: state.bookings.count_bookings(None).await?,
        pending_bookings: state
            .bookings
            .count_bookings(Some(BookingStatus::PendingVerification))
            .await?,
    }))
}

// ============================================================================
// Booking Verification
// ============================================================================

/// GET /v1/admin/bookings?status=&from=&to=
async fn list_bookings(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Query(filter): Query<BookingFilter>,
) -> Result<Json<Vec<BookingReportRow>>, AppError> {
    authorize(actor.role, Action::ViewAdminArea, false)?;
    let rows = state.bookings.list_report_rows().await?;
    Ok(Json(filter.apply(rows)))
}

/// GET /v1/admin/bookings/export?format=csv|json
async fn export_bookings(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Query(query): Query<ExportQuery>,
) -> Result<Response, AppError> {
    authorize(actor.role, Action::ExportBookingReport, false)?;

    let rows = query.filter().apply(state.bookings.list_report_rows().await?);
    let report = query.format.exporter().export(&rows, state.today())?;
    info!("Actor {} exported {} bookings as {}", actor.id, rows.len(), report.file_name);

    Ok((
        [
            (header::CONTENT_TYPE, report.content_type.to_string()),
            (header::CONTENT_DISPOSITION, format!("attachment; filename=\"{}\"", report.file_name)),
        ],
        report.body,
    )
        .into_response())
}

async fn review_booking(
    state: &AppState,
    actor: &Actor,
    id: i64,
    decision: BookingDecision,
) -> Result<Booking, AppError> {
    // Permission is checked before the booking is even looked up
    authorize(actor.role, decision.action(), false)?;

    let current = state
        .bookings
        .get_booking(id)
        .await?
        .ok_or_else(|| AppError::NotFoundError(format!("Booking {} not found", id)))?;

    let next = booking::review(actor.role, current.status, decision)?;

    let updated = state
        .bookings
        .update_status(id, current.status, next)
        .await?
        .ok_or_else(|| AppError::ConflictError(format!("Booking {} changed during review", id)))?;

    info!("Booking {} moved {} -> {} by {}", id, current.status, next, actor.id);
    state.publish(DomainEvent::BookingReviewed {
        booking_id: id,
        reviewer_id: actor.id,
        status: next.to_string(),
        at: Utc::now(),
    });

    Ok(updated)
}

/// POST /v1/admin/bookings/{id}/approve
async fn approve_booking(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<i64>,
) -> Result<Json<Booking>, AppError> {
    Ok(Json(review_booking(&state, &actor, id, BookingDecision::Approve).await?))
}

/// POST /v1/admin/bookings/{id}/reject
async fn reject_booking(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<i64>,
) -> Result<Json<Booking>, AppError> {
    Ok(Json(review_booking(&state, &actor, id, BookingDecision::Reject).await?))
}

// ============================================================================
// Car Management
// ============================================================================

async fn list_all_cars(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
) -> Result<Json<Vec<Car>>, AppError> {
    authorize(actor.role, Action::ListCars, false)?;
    Ok(Json(state.cars.list_all().await?))
}

async fn create_car(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Json(input): Json<CarInput>,
) -> Result<(StatusCode, Json<Car>), AppError> {
    authorize(actor.role, Action::CreateCar, false)?;
    input.validate()?;

    let car = state.cars.create_car(&input).await?;
    info!("Car {} ({}) created by {}", car.id, car.name, actor.id);
    Ok((StatusCode::CREATED, Json(car)))
}

async fn update_car(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<i64>,
    Json(input): Json<CarInput>,
) -> Result<Json<Car>, AppError> {
    authorize(actor.role, Action::EditCar, false)?;
    input.validate()?;

    let car = state
        .cars
        .update_car(id, &input)
        .await?
        .ok_or_else(|| AppError::NotFoundError(format!("Car {} not found", id)))?;
    info!("Car {} updated by {}", id, actor.id);
    Ok(Json(car))
}

async fn delete_car(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    authorize(actor.role, Action::DeleteCar, false)?;

    if !state.cars.delete_car(id).await? {
        return Err(AppError::NotFoundError(format!("Car {} not found", id)));
    }
    info!("Car {} deleted by {}", id, actor.id);
    Ok(StatusCode::NO_CONTENT)
}

// ============================================================================
// User Management
// ============================================================================

async fn list_users(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
) -> Result<Json<UserListResponse>, AppError> {
    authorize(actor.role, Action::ListUsers, false)?;

    let users = state.profiles.list_profiles().await?;
    let counts = RoleCounts::tally(&users);
    Ok(Json(UserListResponse { users, counts }))
}

/// PUT /v1/admin/users/{id}/role
async fn change_role(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
    Json(req): Json<ChangeRoleRequest>,
) -> Result<Json<Profile>, AppError> {
    authorize(actor.role, Action::ChangeUserRole, actor.is(id))?;

    let profile = state
        .profiles
        .update_role(id, req.role)
        .await?
        .ok_or_else(|| AppError::NotFoundError(format!("User {} not found", id)))?;

    info!("Role of {} set to {} by {}", id, req.role, actor.id);
    state.publish(DomainEvent::RoleChanged {
        profile_id: id,
        changed_by: actor.id,
        role: req.role.to_string(),
        at: Utc::now(),
    });

    Ok(Json(profile))
}

// ============================================================================
// Blog Management
// ============================================================================

async fn create_post(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Json(input): Json<BlogPostInput>,
) -> Result<(StatusCode, Json<BlogPost>), AppError> {
    authorize(actor.role, Action::CreateBlogPost, false)?;
    input.validate()?;

    let post = state.blog.create_post(actor.id, &input).await?;
    info!("Post {} created by {}", post.id, actor.id);
    Ok((StatusCode::CREATED, Json(post)))
}

async fn update_post(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<i64>,
    Json(input): Json<BlogPostInput>,
) -> Result<Json<BlogPost>, AppError> {
    authorize(actor.role, Action::EditBlogPost, false)?;
    input.validate()?;

    state
        .blog
        .update_post(id, &input)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFoundError(format!("Post {} not found", id)))
}

async fn delete_post(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    authorize(actor.role, Action::DeleteBlogPost, false)?;

    if !state.blog.delete_post(id).await? {
        return Err(AppError::NotFoundError(format!("Post {} not found", id)));
    }
    info!("Post {} deleted by {}", id, actor.id);
    Ok(StatusCode::NO_CONTENT)
}

// ============================================================================
// Live Events
// ============================================================================

/// GET /v1/admin/events
async fn event_stream(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, AppError> {
    authorize(actor.role, Action::ViewAdminArea, false)?;

    let stream = BroadcastStream::new(state.events.subscribe()).filter_map(|result| async move {
        match result {
            Ok(event) => Event::default()
                .event(event.name())
                .json_data(&event)
                .ok()
                .map(Ok),
            // Lagged receivers skip what they missed
            Err(_) => None,
        }
    });

    Ok(Sse::new(stream).keep_alive(KeepAlive::default()))
}
