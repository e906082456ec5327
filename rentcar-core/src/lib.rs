pub mod identity;
pub mod policy;
pub mod pricing;
pub mod booking;
pub mod car;
pub mod profile;
pub mod blog;
pub mod report;
pub mod repository;
pub mod document;

pub use identity::{Actor, Role};
pub use policy::{authorize, is_allowed, Action};
pub use booking::{BookingDecision, BookingStatus};

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum CoreError {
    #[error("Invalid booking range: {0}")]
    InvalidRange(String),
    #[error("Invalid status transition from {from} to {to}")]
    InvalidTransition { from: String, to: String },
    #[error("Permission denied: {0}")]
    PermissionDenied(String),
    #[error("Validation failed: {0}")]
    ValidationError(String),
}

pub type CoreResult<T> = Result<T, CoreError>;
