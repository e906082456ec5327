use async_trait::async_trait;
use chrono::Utc;
use rentcar_core::blog::{BlogPost, BlogPostInput};
use rentcar_core::booking::{Booking, BookingStatus, NewBooking};
use rentcar_core::car::{Car, CarInput};
use rentcar_core::identity::Role;
use rentcar_core::profile::{Profile, ProfileUpdate};
use rentcar_core::report::BookingReportRow;
use rentcar_core::repository::{
    BlogRepository, BookingRepository, CarRepository, ProfileRepository, RepoError,
};
use std::collections::{BTreeMap, HashMap};
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Default)]
struct Tables {
    cars: BTreeMap<i64, Car>,
    bookings: BTreeMap<i64, Booking>,
    profiles: HashMap<Uuid, Profile>,
    posts: BTreeMap<i64, BlogPost>,
    next_car_id: i64,
    next_booking_id: i64,
    next_post_id: i64,
}

impl Tables {
    fn next_id(counter: &mut i64) -> i64 {
        *counter += 1;
        *counter
    }
}

/// Process-local store implementing every repository trait.
/// Used by tests and for running the API without Postgres.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn newest_first<T>(items: &mut [T], key: impl Fn(&T) -> (chrono::DateTime<Utc>, i64)) {
    items.sort_by(|a, b| key(b).cmp(&key(a)));
}

#[async_trait]
impl CarRepository for MemoryStore {
    async fn list_available(&self) -> Result<Vec<Car>, RepoError> {
        let mut cars: Vec<Car> = self.list_all().await?;
        cars.retain(|c| c.is_available);
        Ok(cars)
    }

    async fn list_all(&self) -> Result<Vec<Car>, RepoError> {
        let tables = self.tables.read().await;
        let mut cars: Vec<Car> = tables.cars.values().cloned().collect();
        cars.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(cars)
    }

    async fn get_car(&self, id: i64) -> Result<Option<Car>, RepoError> {
        Ok(self.tables.read().await.cars.get(&id).cloned())
    }

    async fn create_car(&self, input: &CarInput) -> Result<Car, RepoError> {
        let mut tables = self.tables.write().await;
        let id = Tables::next_id(&mut tables.next_car_id);
        let now = Utc::now();
        let car = Car {
            id,
            name: input.name.clone(),
            car_type: input.car_type.clone(),
            price_per_day: input.price_per_day,
            fuel_type: input.fuel_type.clone(),
            seats: input.seats,
            transmission: input.transmission.clone(),
            engine_cc: input.engine_cc,
            description: input.description.clone(),
            image_url: input.image_url.clone(),
            is_available: input.is_available,
            created_at: now,
            updated_at: now,
        };
        tables.cars.insert(id, car.clone());
        Ok(car)
    }

    async fn update_car(&self, id: i64, input: &CarInput) -> Result<Option<Car>, RepoError> {
        let mut tables = self.tables.write().await;
        let Some(car) = tables.cars.get_mut(&id) else {
            return Ok(None);
        };
        car.name = input.name.clone();
        car.car_type = input.car_type.clone();
        car.price_per_day = input.price_per_day;
        car.fuel_type = input.fuel_type.clone();
        car.seats = input.seats;
        car.transmission = input.transmission.clone();
        car.engine_cc = input.engine_cc;
        car.description = input.description.clone();
        car.image_url = input.image_url.clone();
        car.is_available = input.is_available;
        car.updated_at = Utc::now();
        Ok(Some(car.clone()))
    }

    async fn delete_car(&self, id: i64) -> Result<bool, RepoError> {
        let mut tables = self.tables.write().await;
        if tables.bookings.values().any(|b| b.car_id == id) {
            return Err(format!("car {} is referenced by bookings", id).into());
        }
        Ok(tables.cars.remove(&id).is_some())
    }

    async fn count_cars(&self) -> Result<i64, RepoError> {
        Ok(self.tables.read().await.cars.len() as i64)
    }
}

#[async_trait]
impl BookingRepository for MemoryStore {
    async fn create_booking(&self, new: &NewBooking) -> Result<Booking, RepoError> {
        let mut tables = self.tables.write().await;
        if !tables.cars.contains_key(&new.car_id) {
            return Err(format!("car {} does not exist", new.car_id).into());
        }
        let id = Tables::next_id(&mut tables.next_booking_id);
        let now = Utc::now();
        let booking = Booking {
            id,
            user_id: new.user_id,
            car_id: new.car_id,
            start_date: new.start_date,
            end_date: new.end_date,
            total_price: new.total_price,
            status: new.status,
            payment_proof_url: Some(new.payment_proof_url.clone()),
            created_at: now,
            updated_at: now,
        };
        tables.bookings.insert(id, booking.clone());
        Ok(booking)
    }

    async fn get_booking(&self, id: i64) -> Result<Option<Booking>, RepoError> {
        Ok(self.tables.read().await.bookings.get(&id).cloned())
    }

    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<Booking>, RepoError> {
        let tables = self.tables.read().await;
        let mut bookings: Vec<Booking> = tables
            .bookings
            .values()
            .filter(|b| b.user_id == user_id)
            .cloned()
            .collect();
        newest_first(&mut bookings, |b| (b.created_at, b.id));
        Ok(bookings)
    }

    async fn list_report_rows(&self) -> Result<Vec<BookingReportRow>, RepoError> {
        let tables = self.tables.read().await;
        let mut rows: Vec<BookingReportRow> = tables
            .bookings
            .values()
            .map(|b| {
                let profile = tables.profiles.get(&b.user_id);
                let car = tables.cars.get(&b.car_id);
                BookingReportRow {
                    id: b.id,
                    user_id: b.user_id,
                    customer_name: profile.and_then(|p| p.full_name.clone()),
                    customer_phone: profile
                        .and_then(|p| p.phone_number.as_ref())
                        .map(|m| m.expose().clone()),
                    car_name: car.map(|c| c.name.clone()),
                    car_type: car.map(|c| c.car_type.clone()),
                    start_date: b.start_date,
                    end_date: b.end_date,
                    total_price: b.total_price,
                    status: b.status,
                    payment_proof_url: b.payment_proof_url.clone(),
                    created_at: b.created_at,
                }
            })
            .collect();
        newest_first(&mut rows, |r| (r.created_at, r.id));
        Ok(rows)
    }

    async fn update_status(
        &self,
        id: i64,
        expected: BookingStatus,
        status: BookingStatus,
    ) -> Result<Option<Booking>, RepoError> {
        let mut tables = self.tables.write().await;
        match tables.bookings.get_mut(&id) {
            Some(booking) if booking.status == expected => {
                booking.status = status;
                booking.updated_at = Utc::now();
                Ok(Some(booking.clone()))
            }
            _ => Ok(None),
        }
    }

    async fn count_bookings(&self, status: Option<BookingStatus>) -> Result<i64, RepoError> {
        let tables = self.tables.read().await;
        let count = tables
            .bookings
            .values()
            .filter(|b| status.map_or(true, |s| b.status == s))
            .count();
        Ok(count as i64)
    }
}

#[async_trait]
impl ProfileRepository for MemoryStore {
    async fn get_profile(&self, id: Uuid) -> Result<Option<Profile>, RepoError> {
        Ok(self.tables.read().await.profiles.get(&id).cloned())
    }

    async fn ensure_profile(&self, id: Uuid) -> Result<Profile, RepoError> {
        let mut tables = self.tables.write().await;
        Ok(tables.profiles.entry(id).or_insert_with(|| Profile::new(id)).clone())
    }

    async fn update_details(&self, id: Uuid, update: &ProfileUpdate) -> Result<Profile, RepoError> {
        let mut tables = self.tables.write().await;
        let profile = tables.profiles.entry(id).or_insert_with(|| Profile::new(id));
        profile.apply(update.clone());
        Ok(profile.clone())
    }

    async fn list_profiles(&self) -> Result<Vec<Profile>, RepoError> {
        let tables = self.tables.read().await;
        let mut profiles: Vec<Profile> = tables.profiles.values().cloned().collect();
        profiles.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(profiles)
    }

    async fn update_role(&self, id: Uuid, role: Role) -> Result<Option<Profile>, RepoError> {
        let mut tables = self.tables.write().await;
        Ok(tables.profiles.get_mut(&id).map(|profile| {
            profile.role = role;
            profile.updated_at = Utc::now();
            profile.clone()
        }))
    }

    async fn count_profiles(&self) -> Result<i64, RepoError> {
        Ok(self.tables.read().await.profiles.len() as i64)
    }
}

#[async_trait]
impl BlogRepository for MemoryStore {
    async fn list_posts(&self) -> Result<Vec<BlogPost>, RepoError> {
        let tables = self.tables.read().await;
        let mut posts: Vec<BlogPost> = tables.posts.values().cloned().collect();
        newest_first(&mut posts, |p| (p.created_at, p.id));
        Ok(posts)
    }

    async fn get_post(&self, id: i64) -> Result<Option<BlogPost>, RepoError> {
        Ok(self.tables.read().await.posts.get(&id).cloned())
    }

    async fn create_post(&self, author_id: Uuid, input: &BlogPostInput) -> Result<BlogPost, RepoError> {
        let mut tables = self.tables.write().await;
        let id = Tables::next_id(&mut tables.next_post_id);
        let now = Utc::now();
        let post = BlogPost {
            id,
            author_id,
            title: input.title.trim().to_string(),
            content: input.content.clone(),
            created_at: now,
            updated_at: now,
        };
        tables.posts.insert(id, post.clone());
        Ok(post)
    }

    async fn update_post(&self, id: i64, input: &BlogPostInput) -> Result<Option<BlogPost>, RepoError> {
        let mut tables = self.tables.write().await;
        Ok(tables.posts.get_mut(&id).map(|post| {
            post.title = input.title.trim().to_string();
            post.content = input.content.clone();
            post.updated_at = Utc::now();
            post.clone()
        }))
    }

    async fn delete_post(&self, id: i64) -> Result<bool, RepoError> {
        Ok(self.tables.write().await.posts.remove(&id).is_some())
    }
}
