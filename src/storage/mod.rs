//! Storage Layer - SQLite-backed persistence
//!
//! System of record is SQLite with tables:
//! - facilities(id, fac_name)
//! - members(id, first_name, sponsor_id -> members)
//! - bookings(id, start_time, end_time, member_id -> members, facility_id -> facilities)

pub mod schema;
pub mod sqlite;

pub use sqlite::{ClubStore, DbStats};
