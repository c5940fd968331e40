//! Query service implementation
//!
//! Provides the three joined reads served by the API:
//! - Facilities with their bookings
//! - Bookings with their facility and member
//! - Members with the members they sponsor

use crate::Result;
use crate::model::{BookingWithRefs, FacilityWithBookings, MemberWithSponsored};
use crate::storage::ClubStore;

/// Read-only query service over a seeded store
pub struct QueryService<'a> {
    store: &'a ClubStore,
}

impl<'a> QueryService<'a> {
    /// Create a new query service
    pub fn new(store: &'a ClubStore) -> Self {
        Self { store }
    }

    /// All facilities, each with its (possibly empty) list of bookings
    pub fn list_facilities(&self) -> Result<Vec<FacilityWithBookings>> {
        let rows = self.store.facility_booking_rows()?;

        let facilities = group_by_parent(rows, |f| f.id)
            .into_iter()
            .map(|(facility, bookings)| FacilityWithBookings { facility, bookings })
            .collect();

        Ok(facilities)
    }

    /// All bookings, each with its facility and member
    pub fn list_bookings(&self) -> Result<Vec<BookingWithRefs>> {
        let bookings = self
            .store
            .booking_ref_rows()?
            .into_iter()
            .map(|(booking, facility, member)| BookingWithRefs { booking, facility, member })
            .collect();

        Ok(bookings)
    }

    /// All members, each with the members naming it as sponsor
    pub fn list_members(&self) -> Result<Vec<MemberWithSponsored>> {
        let rows = self.store.member_sponsored_rows()?;

        let members = group_by_parent(rows, |m| m.id)
            .into_iter()
            .map(|(member, members_sponsored)| MemberWithSponsored { member, members_sponsored })
            .collect();

        Ok(members)
    }
}

/// Fold left-join rows into one entry per parent.
///
/// Rows for the same parent must be adjacent. A `None` child marks a
/// parent with no children.
fn group_by_parent<P, C, K>(rows: Vec<(P, Option<C>)>, key: impl Fn(&P) -> K) -> Vec<(P, Vec<C>)>
where
    K: PartialEq,
{
    let mut grouped: Vec<(P, Vec<C>)> = Vec::new();

    for (parent, child) in rows {
        let same_parent = grouped
            .last()
            .is_some_and(|(last, _)| key(last) == key(&parent));

        if !same_parent {
            grouped.push((parent, Vec::new()));
        }
        if let (Some(child), Some((_, children))) = (child, grouped.last_mut()) {
            children.push(child);
        }
    }

    grouped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed::sync_and_seed;

    fn seeded_store() -> ClubStore {
        let mut store = ClubStore::open_in_memory().unwrap();
        sync_and_seed(&mut store).unwrap();
        store
    }

    #[test]
    fn test_group_by_parent() {
        let rows = vec![
            ("a", Some(1)),
            ("a", Some(2)),
            ("b", None),
            ("c", Some(3)),
        ];

        let grouped = group_by_parent(rows, |p| *p);
        assert_eq!(grouped, vec![("a", vec![1, 2]), ("b", vec![]), ("c", vec![3])]);
    }

    #[test]
    fn test_list_facilities() {
        let store = seeded_store();
        let service = QueryService::new(&store);

        let facilities = service.list_facilities().unwrap();
        assert_eq!(facilities.len(), 3);

        let tennis = facilities.iter().find(|f| f.facility.name == "tennis").unwrap();
        assert_eq!(tennis.bookings.len(), 1);
        assert_eq!(tennis.bookings[0].id, 2);

        let pool = facilities.iter().find(|f| f.facility.name == "pool").unwrap();
        assert!(pool.bookings.is_empty());
    }

    #[test]
    fn test_list_bookings() {
        let store = seeded_store();
        let service = QueryService::new(&store);

        let bookings = service.list_bookings().unwrap();
        assert_eq!(bookings.len(), 2);

        let tuesday = bookings.iter().find(|b| b.booking.id == 1).unwrap();
        assert_eq!(tuesday.member.first_name, "Jo");
        assert_eq!(tuesday.facility.name, "golf");

        for b in &bookings {
            assert_eq!(b.booking.member_id, Some(b.member.id));
            assert_eq!(b.booking.facility_id, Some(b.facility.id));
        }
    }

    #[test]
    fn test_list_members() {
        let store = seeded_store();
        let service = QueryService::new(&store);

        let members = service.list_members().unwrap();
        assert_eq!(members.len(), 3);

        let jo = members.iter().find(|m| m.member.first_name == "Jo").unwrap();
        let mut sponsored: Vec<_> = jo.members_sponsored.iter().map(|m| m.first_name.as_str()).collect();
        sponsored.sort();
        assert_eq!(sponsored, vec!["Jane", "Suzie"]);

        let suzie = members.iter().find(|m| m.member.first_name == "Suzie").unwrap();
        assert!(suzie.members_sponsored.is_empty());
    }

    #[test]
    fn test_queries_on_empty_store() {
        let store = ClubStore::open_in_memory().unwrap();
        let service = QueryService::new(&store);

        assert!(service.list_facilities().unwrap().is_empty());
        assert!(service.list_bookings().unwrap().is_empty());
        assert!(service.list_members().unwrap().is_empty());
    }
}
