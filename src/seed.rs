//! Reset-and-seed routine
//!
//! Brings the store to a fixed, known state: the schema is dropped and
//! recreated, then three members, three facilities and two bookings are
//! inserted and linked. Runs on every start, so any prior data is lost.

use chrono::{DateTime, TimeZone, Utc};
use crate::{Error, Result};
use crate::model::{Booking, Facility, Member};
use crate::storage::{ClubStore, DbStats};

/// Member first names, in creation order
pub const SEED_MEMBERS: [&str; 3] = ["Suzie", "Jo", "Jane"];

/// Facility names, in creation order
pub const SEED_FACILITIES: [&str; 3] = ["tennis", "golf", "pool"];

fn midnight(year: i32, month: u32, day: u32) -> Result<DateTime<Utc>> {
    Utc.with_ymd_and_hms(year, month, day, 0, 0, 0)
        .single()
        .ok_or_else(|| Error::Integrity(format!("invalid seed date {year}-{month}-{day}")))
}

/// Drop and recreate the schema, then insert the fixed dataset.
///
/// Everything happens inside one transaction; on any failure the
/// transaction is rolled back and the error returned.
pub fn sync_and_seed(store: &mut ClubStore) -> Result<DbStats> {
    store.begin_transaction()?;
    match seed_in_transaction(store) {
        Ok(()) => store.commit()?,
        Err(e) => {
            if let Err(rollback_err) = store.rollback() {
                tracing::error!("Rollback after failed seed also failed: {}", rollback_err);
            }
            return Err(e);
        }
    }

    let stats = store.stats()?;
    tracing::info!(
        "Seeded {} members, {} facilities, {} bookings",
        stats.members,
        stats.facilities,
        stats.bookings
    );
    Ok(stats)
}

fn seed_in_transaction(store: &ClubStore) -> Result<()> {
    store.reset_schema()?;
    tracing::info!("Schema reset");

    let mut members = SEED_MEMBERS.map(Member::new);
    for member in &members {
        store.insert_member(member)?;
        tracing::debug!("Created member {} ({})", member.first_name, member.id);
    }

    let facilities = SEED_FACILITIES.map(Facility::new);
    for facility in &facilities {
        store.insert_facility(facility)?;
        tracing::debug!("Created facility {} ({})", facility.name, facility.id);
    }

    let mut tuesday = Booking::new(1, midnight(2021, 1, 15)?, midnight(2021, 2, 10)?);
    store.insert_booking(&tuesday)?;
    let mut wednesday = Booking::new(2, midnight(2021, 1, 10)?, midnight(2021, 1, 10)?);
    store.insert_booking(&wednesday)?;

    let [suzie, jo, jane] = &mut members;
    let [tennis, golf, _pool] = &facilities;

    wednesday.set_member(suzie);
    wednesday.set_facility(tennis);
    tuesday.set_member(jo);
    tuesday.set_facility(golf);
    suzie.set_sponsor(jo);
    jane.set_sponsor(jo);

    store.save_booking(&mut wednesday)?;
    store.save_booking(&mut tuesday)?;
    store.save_member(suzie)?;
    store.save_member(jane)?;
    tracing::debug!("Assigned bookings and sponsors");

    let unassigned = store.count_unassigned_bookings()?;
    if unassigned > 0 {
        return Err(Error::Integrity(format!(
            "{unassigned} booking(s) left without a member or facility"
        )));
    }

    Ok(())
}
