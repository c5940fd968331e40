//! # Countryclub - booking backend for a country club
//!
//! Facilities, members and bookings persisted to SQLite and served as JSON.
//!
//! Countryclub provides:
//! - Record types with their relationships (bookings, sponsorship)
//! - SQLite-backed storage with enforced foreign keys
//! - A reset-and-seed routine that loads a fixed sample dataset
//! - A query service returning records with related records joined in
//! - An axum HTTP server exposing the three listings

pub mod model;
pub mod storage;
pub mod seed;
pub mod query;
pub mod server;
pub mod config;


// Re-exports for convenient access
pub use model::{Booking, Facility, Member};
pub use storage::ClubStore;
pub use query::QueryService;
pub use config::ClubConfig;

/// Result type alias for Countryclub operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for Countryclub operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("Integrity error: {0}")]
    Integrity(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
