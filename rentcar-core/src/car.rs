use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{CoreError, CoreResult};

/// A rentable car in the catalog
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Car {
    pub id: i64,
    pub name: String,
    pub car_type: String,
    pub price_per_day: i64,
    pub fuel_type: String,
    pub seats: i32,
    pub transmission: String,
    pub engine_cc: Option<i32>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub is_available: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Create/update payload from the admin console.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CarInput {
    pub name: String,
    pub car_type: String,
    pub price_per_day: i64,
    pub fuel_type: String,
    pub seats: i32,
    pub transmission: String,
    pub engine_cc: Option<i32>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    #[serde(default = "default_available")]
    pub is_available: bool,
}

fn default_available() -> bool {
    true
}

impl CarInput {
    pub fn validate(&self) -> CoreResult<()> {
        let required = [
            ("name", &self.name),
            ("car_type", &self.car_type),
            ("fuel_type", &self.fuel_type),
            ("transmission", &self.transmission),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(CoreError::ValidationError(format!("{} is required", field)));
            }
        }

        if self.price_per_day <= 0 {
            return Err(CoreError::ValidationError("price_per_day must be positive".to_string()));
        }
        if self.seats <= 0 {
            return Err(CoreError::ValidationError("seats must be positive".to_string()));
        }
        if matches!(self.engine_cc, Some(cc) if cc <= 0) {
            return Err(CoreError::ValidationError("engine_cc must be positive".to_string()));
        }

        Ok(())
    }
}
