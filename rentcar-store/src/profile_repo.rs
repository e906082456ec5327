use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use rentcar_core::identity::Role;
use rentcar_core::profile::{Profile, ProfileUpdate};
use rentcar_core::repository::{ProfileRepository, RepoError};
use rentcar_shared::Masked;
use sqlx::PgPool;
use uuid::Uuid;

pub struct PgProfileRepository {
    pool: PgPool,
}

impl PgProfileRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct ProfileRow {
    id: Uuid,
    full_name: Option<String>,
    phone_number: Option<String>,
    date_of_birth: Option<NaiveDate>,
    ktp_number: Option<String>,
    license_number: Option<String>,
    ktp_image_url: Option<String>,
    license_image_url: Option<String>,
    role: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ProfileRow> for Profile {
    fn from(row: ProfileRow) -> Self {
        Profile {
            id: row.id,
            full_name: row.full_name,
            phone_number: row.phone_number.map(Masked),
            date_of_birth: row.date_of_birth,
            ktp_number: row.ktp_number.map(Masked),
            license_number: row.license_number.map(Masked),
            ktp_image_url: row.ktp_image_url,
            license_image_url: row.license_image_url,
            // Unknown or missing labels resolve to the least privileged role
            role: Role::from_label(row.role.as_deref()),
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

const PROFILE_COLUMNS: &str = "id, full_name, phone_number, date_of_birth, ktp_number, license_number, ktp_image_url, license_image_url, role, created_at, updated_at";

#[async_trait]
impl ProfileRepository for PgProfileRepository {
    async fn get_profile(&self, id: Uuid) -> Result<Option<Profile>, RepoError> {
        let row: Option<ProfileRow> =
            sqlx::query_as(&format!("SELECT {} FROM profiles WHERE id = $1", PROFILE_COLUMNS))
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(row.map(Profile::from))
    }

    async fn ensure_profile(&self, id: Uuid) -> Result<Profile, RepoError> {
        // No-op update so RETURNING yields the existing row on conflict
        let row: ProfileRow = sqlx::query_as(&format!(
            r#"
            INSERT INTO profiles (id, role)
            VALUES ($1, $2)
            ON CONFLICT (id) DO UPDATE SET id = EXCLUDED.id
            RETURNING {}
            "#,
            PROFILE_COLUMNS
        ))
        .bind(id)
        .bind(Role::User.as_str())
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }

    async fn update_details(&self, id: Uuid, update: &ProfileUpdate) -> Result<Profile, RepoError> {
        let row: ProfileRow = sqlx::query_as(&format!(
            r#"
            INSERT INTO profiles (id, full_name, phone_number, date_of_birth, ktp_number,
                                  license_number, ktp_image_url, license_image_url, role)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            ON CONFLICT (id) DO UPDATE
            SET full_name = EXCLUDED.full_name,
                phone_number = EXCLUDED.phone_number,
                date_of_birth = EXCLUDED.date_of_birth,
                ktp_number = EXCLUDED.ktp_number,
                license_number = EXCLUDED.license_number,
                ktp_image_url = EXCLUDED.ktp_image_url,
                license_image_url = EXCLUDED.license_image_url,
                updated_at = NOW()
            RETURNING {}
            "#,
            PROFILE_COLUMNS
        ))
        .bind(id)
        .bind(update.full_name.as_deref().map(str::trim))
        .bind(&update.phone_number)
        .bind(update.date_of_birth)
        .bind(&update.ktp_number)
        .bind(&update.license_number)
        .bind(&update.ktp_image_url)
        .bind(&update.license_image_url)
        .bind(Role::User.as_str())
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }

    async fn list_profiles(&self) -> Result<Vec<Profile>, RepoError> {
        let rows: Vec<ProfileRow> = sqlx::query_as(&format!(
            "SELECT {} FROM profiles ORDER BY created_at DESC",
            PROFILE_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Profile::from).collect())
    }

    async fn update_role(&self, id: Uuid, role: Role) -> Result<Option<Profile>, RepoError> {
        let row: Option<ProfileRow> = sqlx::query_as(&format!(
            "UPDATE profiles SET role = $1, updated_at = NOW() WHERE id = $2 RETURNING {}",
            PROFILE_COLUMNS
        ))
        .bind(role.as_str())
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Profile::from))
    }

    async fn count_profiles(&self) -> Result<i64, RepoError> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM profiles")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}
