use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use rentcar_core::booking::{Booking, BookingStatus, NewBooking};
use rentcar_core::report::BookingReportRow;
use rentcar_core::repository::{BookingRepository, RepoError};
use sqlx::PgPool;
use uuid::Uuid;

pub struct PgBookingRepository {
    pool: PgPool,
}

impl PgBookingRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

// Status is stored as its snake_case label
#[derive(sqlx::FromRow)]
struct BookingRow {
    id: i64,
    user_id: Uuid,
    car_id: i64,
    start_date: NaiveDate,
    end_date: NaiveDate,
    total_price: i64,
    status: String,
    payment_proof_url: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<BookingRow> for Booking {
    type Error = RepoError;

    fn try_from(row: BookingRow) -> Result<Self, Self::Error> {
        Ok(Booking {
            id: row.id,
            user_id: row.user_id,
            car_id: row.car_id,
            start_date: row.start_date,
            end_date: row.end_date,
            total_price: row.total_price,
            status: row.status.parse::<BookingStatus>()?,
            payment_proof_url: row.payment_proof_url,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct ReportRow {
    id: i64,
    user_id: Uuid,
    customer_name: Option<String>,
    customer_phone: Option<String>,
    car_name: Option<String>,
    car_type: Option<String>,
    start_date: NaiveDate,
    end_date: NaiveDate,
    total_price: i64,
    status: String,
    payment_proof_url: Option<String>,
    created_at: DateTime<Utc>,
}

impl TryFrom<ReportRow> for BookingReportRow {
    type Error = RepoError;

    fn try_from(row: ReportRow) -> Result<Self, Self::Error> {
        Ok(BookingReportRow {
            id: row.id,
            user_id: row.user_id,
            customer_name: row.customer_name,
            customer_phone: row.customer_phone,
            car_name: row.car_name,
            car_type: row.car_type,
            start_date: row.start_date,
            end_date: row.end_date,
            total_price: row.total_price,
            status: row.status.parse::<BookingStatus>()?,
            payment_proof_url: row.payment_proof_url,
            created_at: row.created_at,
        })
    }
}

const BOOKING_COLUMNS: &str =
    "id, user_id, car_id, start_date, end_date, total_price, status, payment_proof_url, created_at, updated_at";

#[async_trait]
impl BookingRepository for PgBookingRepository {
    async fn create_booking(&self, booking: &NewBooking) -> Result<Booking, RepoError> {
        let row: BookingRow = sqlx::query_as(&format!(
            r#"
            INSERT INTO bookings (user_id, car_id, start_date, end_date, total_price, status, payment_proof_url)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {}
            "#,
            BOOKING_COLUMNS
        ))
        .bind(booking.user_id)
        .bind(booking.car_id)
        .bind(booking.start_date)
        .bind(booking.end_date)
        .bind(booking.total_price)
        .bind(booking.status.as_str())
        .bind(&booking.payment_proof_url)
        .fetch_one(&self.pool)
        .await?;

        Booking::try_from(row)
    }

    async fn get_booking(&self, id: i64) -> Result<Option<Booking>, RepoError> {
        let row: Option<BookingRow> =
            sqlx::query_as(&format!("SELECT {} FROM bookings WHERE id = $1", BOOKING_COLUMNS))
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        row.map(Booking::try_from).transpose()
    }

    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<Booking>, RepoError> {
        let rows: Vec<BookingRow> = sqlx::query_as(&format!(
            "SELECT {} FROM bookings WHERE user_id = $1 ORDER BY created_at DESC",
            BOOKING_COLUMNS
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Booking::try_from).collect()
    }

    async fn list_report_rows(&self) -> Result<Vec<BookingReportRow>, RepoError> {
        let rows: Vec<ReportRow> = sqlx::query_as(
            r#"
            SELECT b.id, b.user_id, p.full_name AS customer_name, p.phone_number AS customer_phone,
                   c.name AS car_name, c.car_type AS car_type,
                   b.start_date, b.end_date, b.total_price, b.status, b.payment_proof_url, b.created_at
            FROM bookings b
            LEFT JOIN profiles p ON p.id = b.user_id
            LEFT JOIN cars c ON c.id = b.car_id
            ORDER BY b.created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(BookingReportRow::try_from).collect()
    }

    async fn update_status(
        &self,
        id: i64,
        expected: BookingStatus,
        status: BookingStatus,
    ) -> Result<Option<Booking>, RepoError> {
        let row: Option<BookingRow> = sqlx::query_as(&format!(
            r#"
            UPDATE bookings
            SET status = $3, updated_at = NOW()
            WHERE id = $1 AND status = $2
            RETURNING {}
            "#,
            BOOKING_COLUMNS
        ))
        .bind(id)
        .bind(expected.as_str())
        .bind(status.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(Booking::try_from).transpose()
    }

    async fn count_bookings(&self, status: Option<BookingStatus>) -> Result<i64, RepoError> {
        let (count,): (i64,) = match status {
            Some(status) => {
                sqlx::query_as("SELECT COUNT(*) FROM bookings WHERE status = $1")
                    .bind(status.as_str())
                    .fetch_one(&self.pool)
                    .await?
            }
            None => {
                sqlx::query_as("SELECT COUNT(*) FROM bookings")
                    .fetch_one(&self.pool)
                    .await?
            }
        };
        Ok(count)
    }
}
