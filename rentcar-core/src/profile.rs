use chrono::{DateTime, NaiveDate, Utc};
use rentcar_shared::Masked;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::identity::Role;
use crate::{CoreError, CoreResult};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    pub id: Uuid,
    pub full_name: Option<String>,
    pub phone_number: Option<Masked<String>>,
    pub date_of_birth: Option<NaiveDate>,
    pub ktp_number: Option<Masked<String>>,
    pub license_number: Option<Masked<String>>,
    pub ktp_image_url: Option<String>,
    pub license_image_url: Option<String>,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Profile {
    /// Fresh profile for a first-time actor. Role always starts as `user`.
    pub fn new(id: Uuid) -> Self {
        let now = Utc::now();
        Self {
            id,
            full_name: None,
            phone_number: None,
            date_of_birth: None,
            ktp_number: None,
            license_number: None,
            ktp_image_url: None,
            license_image_url: None,
            role: Role::User,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn apply(&mut self, update: ProfileUpdate) {
        self.full_name = update.full_name.map(|s| s.trim().to_string());
        self.phone_number = update.phone_number.map(Masked);
        self.date_of_birth = update.date_of_birth;
        self.ktp_number = update.ktp_number.map(Masked);
        self.license_number = update.license_number.map(Masked);
        self.ktp_image_url = update.ktp_image_url;
        self.license_image_url = update.license_image_url;
        self.updated_at = Utc::now();
    }
}

/// Self-service profile fields. Role is not writable through this path.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfileUpdate {
    pub full_name: Option<String>,
    pub phone_number: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub ktp_number: Option<String>,
    pub license_number: Option<String>,
    pub ktp_image_url: Option<String>,
    pub license_image_url: Option<String>,
}

impl ProfileUpdate {
    pub fn validate(&self, today: NaiveDate) -> CoreResult<()> {
        if let Some(name) = &self.full_name {
            if name.trim().is_empty() {
                return Err(CoreError::ValidationError("full_name must not be blank".to_string()));
            }
        }
        if let Some(dob) = self.date_of_birth {
            if dob >= today {
                return Err(CoreError::ValidationError("date_of_birth must be in the past".to_string()));
            }
        }
        for (field, value) in [("ktp_number", &self.ktp_number), ("license_number", &self.license_number)] {
            if let Some(v) = value {
                if v.is_empty() || !v.chars().all(|c| c.is_ascii_alphanumeric()) {
                    return Err(CoreError::ValidationError(format!("{} must be alphanumeric", field)));
                }
            }
        }
        if let Some(phone) = &self.phone_number {
            let digits = phone.trim_start_matches('+');
            if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
                return Err(CoreError::ValidationError("phone_number must contain digits only".to_string()));
            }
        }
        Ok(())
    }
}

/// User management totals shown alongside the profile list.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct RoleCounts {
    pub admin: usize,
    pub sub_admin: usize,
    pub user: usize,
}

impl RoleCounts {
    pub fn tally<'a>(profiles: impl IntoIterator<Item = &'a Profile>) -> Self {
        profiles.into_iter().fold(RoleCounts::default(), |mut acc, p| {
            match p.role {
                Role::Admin => acc.admin += 1,
                Role::SubAdmin => acc.sub_admin += 1,
                Role::User => acc.user += 1,
            }
            acc
        })
    }
}
