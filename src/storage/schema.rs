//! Database schema definitions

/// SQL to create the facilities table
pub const CREATE_FACILITIES_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS facilities (
    id TEXT PRIMARY KEY,
    fac_name VARCHAR(100) NOT NULL UNIQUE CHECK (length(fac_name) <= 100),
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
)
"#;

/// SQL to create the members table
/// `sponsor_id` points back into the same table
pub const CREATE_MEMBERS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS members (
    id TEXT PRIMARY KEY,
    first_name VARCHAR(20) NOT NULL UNIQUE CHECK (length(first_name) <= 20),
    sponsor_id TEXT REFERENCES members(id) ON UPDATE CASCADE ON DELETE SET NULL,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
)
"#;

/// SQL to create the bookings table
/// Booking ids are assigned by the caller, not generated
pub const CREATE_BOOKINGS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS bookings (
    id INTEGER PRIMARY KEY,
    start_time TEXT NOT NULL,
    end_time TEXT NOT NULL,
    member_id TEXT REFERENCES members(id) ON UPDATE CASCADE ON DELETE SET NULL,
    facility_id TEXT REFERENCES facilities(id) ON UPDATE CASCADE ON DELETE SET NULL,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
)
"#;

/// SQL to create indexes
pub const CREATE_INDEXES: &[&str] = &[
    "CREATE INDEX IF NOT EXISTS idx_bookings_member ON bookings(member_id)",
    "CREATE INDEX IF NOT EXISTS idx_bookings_facility ON bookings(facility_id)",
    "CREATE INDEX IF NOT EXISTS idx_members_sponsor ON members(sponsor_id)",
];

/// Drop statements, dependents first
pub const DROP_TABLES: &[&str] = &[
    "DROP TABLE IF EXISTS bookings",
    "DROP TABLE IF EXISTS members",
    "DROP TABLE IF EXISTS facilities",
];

/// All schema creation statements
pub fn all_schema_statements() -> Vec<&'static str> {
    let mut stmts = vec![
        CREATE_FACILITIES_TABLE,
        CREATE_MEMBERS_TABLE,
        CREATE_BOOKINGS_TABLE,
    ];
    stmts.extend(CREATE_INDEXES.iter().copied());
    stmts
}
