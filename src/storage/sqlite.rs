//! SQLite storage implementation

use std::path::Path;
use chrono::Utc;
use rusqlite::{Connection, OpenFlags, params, OptionalExtension};
use uuid::Uuid;
use crate::Result;
use crate::model::{Booking, Facility, Member};
use super::schema;

const FACILITY_COLUMNS: &str = "f.id, f.fac_name, f.created_at, f.updated_at";
const MEMBER_COLUMNS: &str = "m.id, m.first_name, m.sponsor_id, m.created_at, m.updated_at";
const BOOKING_COLUMNS: &str =
    "b.id, b.start_time, b.end_time, b.member_id, b.facility_id, b.created_at, b.updated_at";

const FACILITY_WIDTH: usize = 4;
const MEMBER_WIDTH: usize = 5;
const BOOKING_WIDTH: usize = 7;

/// SQLite-backed storage for the club's records
pub struct ClubStore {
    conn: Connection,
}

impl ClubStore {
    /// Open a database file (creates if doesn't exist)
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;
        Self::from_connection(conn)
    }

    /// Open an in-memory database (for testing)
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::from_connection(conn)
    }

    /// Open from a connection string.
    ///
    /// Accepts a plain path, a `sqlite://` prefixed path, or `:memory:`.
    pub fn connect(url: &str) -> Result<Self> {
        match connection_target(url) {
            MEMORY => Self::open_in_memory(),
            target => Self::open(Path::new(target)),
        }
    }

    /// Open an existing database without creating or altering anything.
    ///
    /// A missing file is an error; an in-memory target yields an empty store.
    pub fn connect_read_only(url: &str) -> Result<Self> {
        match connection_target(url) {
            MEMORY => Self::open_in_memory(),
            target => {
                let conn = Connection::open_with_flags(
                    Path::new(target),
                    OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
                )?;
                Ok(Self { conn })
            }
        }
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        conn.execute_batch("PRAGMA foreign_keys = ON")?;
        let store = Self { conn };
        store.initialize_schema()?;
        Ok(store)
    }

    /// Initialize the database schema
    fn initialize_schema(&self) -> Result<()> {
        for stmt in schema::all_schema_statements() {
            self.conn.execute(stmt, [])?;
        }
        Ok(())
    }

    /// Drop every table and recreate the schema. All data is lost.
    pub fn reset_schema(&self) -> Result<()> {
        for stmt in schema::DROP_TABLES {
            self.conn.execute(stmt, [])?;
        }
        self.initialize_schema()?;
        tracing::debug!("Schema dropped and recreated");
        Ok(())
    }

    // ========== Facility Operations ==========

    /// Insert a new facility
    pub fn insert_facility(&self, facility: &Facility) -> Result<()> {
        self.conn.execute(
            r#"
            INSERT INTO facilities (id, fac_name, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4)
            "#,
            params![
                facility.id.to_string(),
                facility.name,
                facility.created_at,
                facility.updated_at,
            ],
        )?;
        Ok(())
    }

    /// Get a facility by name
    pub fn get_facility_by_name(&self, name: &str) -> Result<Option<Facility>> {
        self.conn
            .query_row(
                &format!("SELECT {FACILITY_COLUMNS} FROM facilities f WHERE f.fac_name = ?1"),
                [name],
                |row| row_to_facility(row, 0),
            )
            .optional()
            .map_err(Into::into)
    }

    /// Count all facilities
    pub fn count_facilities(&self) -> Result<usize> {
        let count: i64 = self.conn.query_row("SELECT COUNT(*) FROM facilities", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    // ========== Member Operations ==========

    /// Insert a new member
    pub fn insert_member(&self, member: &Member) -> Result<()> {
        self.conn.execute(
            r#"
            INSERT INTO members (id, first_name, sponsor_id, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
            params![
                member.id.to_string(),
                member.first_name,
                member.sponsor_id.map(|id| id.to_string()),
                member.created_at,
                member.updated_at,
            ],
        )?;
        Ok(())
    }

    /// Persist a member's relationship fields and bump `updated_at`
    pub fn save_member(&self, member: &mut Member) -> Result<()> {
        member.updated_at = Utc::now();
        self.conn.execute(
            "UPDATE members SET sponsor_id = ?1, updated_at = ?2 WHERE id = ?3",
            params![
                member.sponsor_id.map(|id| id.to_string()),
                member.updated_at,
                member.id.to_string(),
            ],
        )?;
        Ok(())
    }

    /// Get a member by first name
    pub fn get_member_by_name(&self, first_name: &str) -> Result<Option<Member>> {
        self.conn
            .query_row(
                &format!("SELECT {MEMBER_COLUMNS} FROM members m WHERE m.first_name = ?1"),
                [first_name],
                |row| row_to_member(row, 0),
            )
            .optional()
            .map_err(Into::into)
    }

    /// Count all members
    pub fn count_members(&self) -> Result<usize> {
        let count: i64 = self.conn.query_row("SELECT COUNT(*) FROM members", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    // ========== Booking Operations ==========

    /// Insert a new booking under its caller-assigned id
    pub fn insert_booking(&self, booking: &Booking) -> Result<()> {
        self.conn.execute(
            r#"
            INSERT INTO bookings (id, start_time, end_time, member_id, facility_id, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
            params![
                booking.id,
                booking.start_time,
                booking.end_time,
                booking.member_id.map(|id| id.to_string()),
                booking.facility_id.map(|id| id.to_string()),
                booking.created_at,
                booking.updated_at,
            ],
        )?;
        Ok(())
    }

    /// Persist a booking's references and bump `updated_at`
    pub fn save_booking(&self, booking: &mut Booking) -> Result<()> {
        booking.updated_at = Utc::now();
        self.conn.execute(
            "UPDATE bookings SET member_id = ?1, facility_id = ?2, updated_at = ?3 WHERE id = ?4",
            params![
                booking.member_id.map(|id| id.to_string()),
                booking.facility_id.map(|id| id.to_string()),
                booking.updated_at,
                booking.id,
            ],
        )?;
        Ok(())
    }

    /// Get a booking by id
    pub fn get_booking(&self, id: i64) -> Result<Option<Booking>> {
        self.conn
            .query_row(
                &format!("SELECT {BOOKING_COLUMNS} FROM bookings b WHERE b.id = ?1"),
                [id],
                |row| row_to_booking(row, 0),
            )
            .optional()
            .map_err(Into::into)
    }

    /// Count all bookings
    pub fn count_bookings(&self) -> Result<usize> {
        let count: i64 = self.conn.query_row("SELECT COUNT(*) FROM bookings", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    /// Count bookings missing a member or facility reference
    pub fn count_unassigned_bookings(&self) -> Result<usize> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM bookings WHERE member_id IS NULL OR facility_id IS NULL",
            [],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }

    // ========== Joined Reads ==========

    /// Every facility paired with each of its bookings.
    /// A facility without bookings appears once with `None`.
    pub fn facility_booking_rows(&self) -> Result<Vec<(Facility, Option<Booking>)>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {FACILITY_COLUMNS}, {BOOKING_COLUMNS}
             FROM facilities f
             LEFT JOIN bookings b ON b.facility_id = f.id
             ORDER BY f.rowid, b.id"
        ))?;

        let rows = stmt
            .query_map([], |row| {
                let facility = row_to_facility(row, 0)?;
                let booking_id: Option<i64> = row.get(FACILITY_WIDTH)?;
                let booking = match booking_id {
                    Some(_) => Some(row_to_booking(row, FACILITY_WIDTH)?),
                    None => None,
                };
                Ok((facility, booking))
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(rows)
    }

    /// Every booking with the facility and member it references.
    pub fn booking_ref_rows(&self) -> Result<Vec<(Booking, Facility, Member)>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {BOOKING_COLUMNS}, {FACILITY_COLUMNS}, {MEMBER_COLUMNS}
             FROM bookings b
             JOIN facilities f ON f.id = b.facility_id
             JOIN members m ON m.id = b.member_id
             ORDER BY b.id"
        ))?;

        let rows = stmt
            .query_map([], |row| {
                Ok((
                    row_to_booking(row, 0)?,
                    row_to_facility(row, BOOKING_WIDTH)?,
                    row_to_member(row, BOOKING_WIDTH + FACILITY_WIDTH)?,
                ))
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(rows)
    }

    /// Every member paired with each member it sponsors.
    /// A member sponsoring nobody appears once with `None`.
    pub fn member_sponsored_rows(&self) -> Result<Vec<(Member, Option<Member>)>> {
        let sponsored_columns = MEMBER_COLUMNS.replace("m.", "s.");
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {MEMBER_COLUMNS}, {sponsored_columns}
             FROM members m
             LEFT JOIN members s ON s.sponsor_id = m.id
             ORDER BY m.rowid, s.rowid"
        ))?;

        let rows = stmt
            .query_map([], |row| {
                let member = row_to_member(row, 0)?;
                let sponsored_id: Option<String> = row.get(MEMBER_WIDTH)?;
                let sponsored = match sponsored_id {
                    Some(_) => Some(row_to_member(row, MEMBER_WIDTH)?),
                    None => None,
                };
                Ok((member, sponsored))
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(rows)
    }

    // ========== Bulk Operations ==========

    /// Begin a transaction for bulk operations
    pub fn begin_transaction(&mut self) -> Result<()> {
        self.conn.execute("BEGIN TRANSACTION", [])?;
        Ok(())
    }

    /// Commit a transaction
    pub fn commit(&mut self) -> Result<()> {
        self.conn.execute("COMMIT", [])?;
        Ok(())
    }

    /// Rollback a transaction
    pub fn rollback(&mut self) -> Result<()> {
        self.conn.execute("ROLLBACK", [])?;
        Ok(())
    }

    /// Get database statistics
    pub fn stats(&self) -> Result<DbStats> {
        Ok(DbStats {
            facilities: self.count_facilities()?,
            members: self.count_members()?,
            bookings: self.count_bookings()?,
        })
    }
}

const MEMORY: &str = ":memory:";

/// Strip an optional `sqlite://` or `sqlite:` prefix
fn connection_target(url: &str) -> &str {
    url.strip_prefix("sqlite://")
        .or_else(|| url.strip_prefix("sqlite:"))
        .unwrap_or(url)
}

fn uuid_at(row: &rusqlite::Row, idx: usize) -> rusqlite::Result<Uuid> {
    let text: String = row.get(idx)?;
    Uuid::parse_str(&text).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
    })
}

fn opt_uuid_at(row: &rusqlite::Row, idx: usize) -> rusqlite::Result<Option<Uuid>> {
    let text: Option<String> = row.get(idx)?;
    text.map(|t| {
        Uuid::parse_str(&t).map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
        })
    })
    .transpose()
}

/// Read a facility starting at column `at`
fn row_to_facility(row: &rusqlite::Row, at: usize) -> rusqlite::Result<Facility> {
    Ok(Facility {
        id: uuid_at(row, at)?,
        name: row.get(at + 1)?,
        created_at: row.get(at + 2)?,
        updated_at: row.get(at + 3)?,
    })
}

/// Read a member starting at column `at`
fn row_to_member(row: &rusqlite::Row, at: usize) -> rusqlite::Result<Member> {
    Ok(Member {
        id: uuid_at(row, at)?,
        first_name: row.get(at + 1)?,
        sponsor_id: opt_uuid_at(row, at + 2)?,
        created_at: row.get(at + 3)?,
        updated_at: row.get(at + 4)?,
    })
}

/// Read a booking starting at column `at`
fn row_to_booking(row: &rusqlite::Row, at: usize) -> rusqlite::Result<Booking> {
    Ok(Booking {
        id: row.get(at)?,
        start_time: row.get(at + 1)?,
        end_time: row.get(at + 2)?,
        member_id: opt_uuid_at(row, at + 3)?,
        facility_id: opt_uuid_at(row, at + 4)?,
        created_at: row.get(at + 5)?,
        updated_at: row.get(at + 6)?,
    })
}

/// Database statistics
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct DbStats {
    pub facilities: usize,
    pub members: usize,
    pub bookings: usize,
}

impl std::fmt::Display for DbStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Database Statistics:")?;
        writeln!(f, "  Facilities: {}", self.facilities)?;
        writeln!(f, "  Members: {}", self.members)?;
        writeln!(f, "  Bookings: {}", self.bookings)
    }
}
