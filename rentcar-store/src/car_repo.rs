use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rentcar_core::car::{Car, CarInput};
use rentcar_core::repository::{CarRepository, RepoError};
use sqlx::PgPool;

pub struct PgCarRepository {
    pool: PgPool,
}

impl PgCarRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct CarRow {
    id: i64,
    name: String,
    car_type: String,
    price_per_day: i64,
    fuel_type: String,
    seats: i32,
    transmission: String,
    engine_cc: Option<i32>,
    description: Option<String>,
    image_url: Option<String>,
    is_available: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<CarRow> for Car {
    fn from(row: CarRow) -> Self {
        Car {
            id: row.id,
            name: row.name,
            car_type: row.car_type,
            price_per_day: row.price_per_day,
            fuel_type: row.fuel_type,
            seats: row.seats,
            transmission: row.transmission,
            engine_cc: row.engine_cc,
            description: row.description,
            image_url: row.image_url,
            is_available: row.is_available,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

const CAR_COLUMNS: &str = "id, name, car_type, price_per_day, fuel_type, seats, transmission, engine_cc, description, image_url, is_available, created_at, updated_at";

#[async_trait]
impl CarRepository for PgCarRepository {
    async fn list_available(&self) -> Result<Vec<Car>, RepoError> {
        let rows: Vec<CarRow> = sqlx::query_as(&format!(
            "SELECT {} FROM cars WHERE is_available = TRUE ORDER BY name",
            CAR_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Car::from).collect())
    }

    async fn list_all(&self) -> Result<Vec<Car>, RepoError> {
        let rows: Vec<CarRow> = sqlx::query_as(&format!("SELECT {} FROM cars ORDER BY name", CAR_COLUMNS))
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(Car::from).collect())
    }

    async fn get_car(&self, id: i64) -> Result<Option<Car>, RepoError> {
        let row: Option<CarRow> = sqlx::query_as(&format!("SELECT {} FROM cars WHERE id = $1", CAR_COLUMNS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(Car::from))
    }

    async fn create_car(&self, car: &CarInput) -> Result<Car, RepoError> {
        let row: CarRow = sqlx::query_as(&format!(
            r#"
            INSERT INTO cars (name, car_type, price_per_day, fuel_type, seats, transmission, engine_cc, description, image_url, is_available)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING {}
            "#,
            CAR_COLUMNS
        ))
        .bind(&car.name)
        .bind(&car.car_type)
        .bind(car.price_per_day)
        .bind(&car.fuel_type)
        .bind(car.seats)
        .bind(&car.transmission)
        .bind(car.engine_cc)
        .bind(&car.description)
        .bind(&car.image_url)
        .bind(car.is_available)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }

    async fn update_car(&self, id: i64, car: &CarInput) -> Result<Option<Car>, RepoError> {
        let row: Option<CarRow> = sqlx::query_as(&format!(
            r#"
            UPDATE cars
            SET name = $1, car_type = $2, price_per_day = $3, fuel_type = $4, seats = $5,
                transmission = $6, engine_cc = $7, description = $8, image_url = $9,
                is_available = $10, updated_at = NOW()
            WHERE id = $11
            RETURNING {}
            "#,
            CAR_COLUMNS
        ))
        .bind(&car.name)
        .bind(&car.car_type)
        .bind(car.price_per_day)
        .bind(&car.fuel_type)
        .bind(car.seats)
        .bind(&car.transmission)
        .bind(car.engine_cc)
        .bind(&car.description)
        .bind(&car.image_url)
        .bind(car.is_available)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Car::from))
    }

    async fn delete_car(&self, id: i64) -> Result<bool, RepoError> {
        let result = sqlx::query("DELETE FROM cars WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn count_cars(&self) -> Result<i64, RepoError> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM cars")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}
