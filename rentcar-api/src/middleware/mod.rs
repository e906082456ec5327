pub mod auth;
pub mod rate_limit;

pub use auth::{actor_middleware, admin_area_middleware, Claims};
pub use rate_limit::rate_limit_middleware;
