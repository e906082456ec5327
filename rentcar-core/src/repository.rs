use async_trait::async_trait;
use uuid::Uuid;

use crate::blog::{BlogPost, BlogPostInput};
use crate::booking::{Booking, BookingStatus, NewBooking};
use crate::car::{Car, CarInput};
use crate::identity::Role;
use crate::profile::{Profile, ProfileUpdate};
use crate::report::BookingReportRow;

pub type RepoError = Box<dyn std::error::Error + Send + Sync>;

/// Repository trait for the car catalog
#[async_trait]
pub trait CarRepository: Send + Sync {
    /// Available cars only, ordered by name
    async fn list_available(&self) -> Result<Vec<Car>, RepoError>;

    /// Every car, for the admin console
    async fn list_all(&self) -> Result<Vec<Car>, RepoError>;

    async fn get_car(&self, id: i64) -> Result<Option<Car>, RepoError>;

    async fn create_car(&self, car: &CarInput) -> Result<Car, RepoError>;

    /// Returns `None` when no car has that id
    async fn update_car(&self, id: i64, car: &CarInput) -> Result<Option<Car>, RepoError>;

    /// Returns `false` when no car has that id
    async fn delete_car(&self, id: i64) -> Result<bool, RepoError>;

    async fn count_cars(&self) -> Result<i64, RepoError>;
}

/// Repository trait for bookings
#[async_trait]
pub trait BookingRepository: Send + Sync {
    async fn create_booking(&self, booking: &NewBooking) -> Result<Booking, RepoError>;

    async fn get_booking(&self, id: i64) -> Result<Option<Booking>, RepoError>;

    /// An actor's own bookings, newest first
    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<Booking>, RepoError>;

    /// All bookings joined with customer and car, newest first
    async fn list_report_rows(&self) -> Result<Vec<BookingReportRow>, RepoError>;

    /// Compare-and-set on status. Returns `None` if the booking is gone or
    /// its status is no longer `expected`.
    async fn update_status(
        &self,
        id: i64,
        expected: BookingStatus,
        status: BookingStatus,
    ) -> Result<Option<Booking>, RepoError>;

    async fn count_bookings(&self, status: Option<BookingStatus>) -> Result<i64, RepoError>;
}

/// Repository trait for actor profiles
#[async_trait]
pub trait ProfileRepository: Send + Sync {
    async fn get_profile(&self, id: Uuid) -> Result<Option<Profile>, RepoError>;

    /// Fetch the profile, creating it with role `user` when missing
    async fn ensure_profile(&self, id: Uuid) -> Result<Profile, RepoError>;

    async fn update_details(&self, id: Uuid, update: &ProfileUpdate) -> Result<Profile, RepoError>;

    /// Newest first
    async fn list_profiles(&self) -> Result<Vec<Profile>, RepoError>;

    /// Returns `None` when no profile has that id
    async fn update_role(&self, id: Uuid, role: Role) -> Result<Option<Profile>, RepoError>;

    async fn count_profiles(&self) -> Result<i64, RepoError>;
}

/// Repository trait for blog content
#[async_trait]
pub trait BlogRepository: Send + Sync {
    /// Newest first
    async fn list_posts(&self) -> Result<Vec<BlogPost>, RepoError>;

    async fn get_post(&self, id: i64) -> Result<Option<BlogPost>, RepoError>;

    async fn create_post(&self, author_id: Uuid, post: &BlogPostInput) -> Result<BlogPost, RepoError>;

    async fn update_post(&self, id: i64, post: &BlogPostInput) -> Result<Option<BlogPost>, RepoError>;

    async fn delete_post(&self, id: i64) -> Result<bool, RepoError>;
}
