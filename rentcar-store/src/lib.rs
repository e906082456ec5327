pub mod app_config;
pub mod blog_repo;
pub mod booking_repo;
pub mod car_repo;
pub mod database;
pub mod documents;
pub mod memory;
pub mod profile_repo;
pub mod redis_repo;

pub use blog_repo::PgBlogRepository;
pub use booking_repo::PgBookingRepository;
pub use car_repo::PgCarRepository;
pub use database::DbClient;
pub use documents::LocalDocumentStore;
pub use memory::MemoryStore;
pub use profile_repo::PgProfileRepository;
pub use redis_repo::RedisClient;
