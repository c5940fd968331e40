//! Record types - facilities, members and bookings
//!
//! Three entities, wired together by foreign keys:
//! - `Facility` owns zero or more `Booking`s
//! - `Member` owns zero or more `Booking`s and may name another `Member` as sponsor
//! - `Booking` references one `Member` and one `Facility`
//!
//! The `*With*` types are the joined shapes returned by the query service.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Maximum length of a facility name
pub const FACILITY_NAME_MAX: usize = 100;

/// Maximum length of a member's first name
pub const MEMBER_FIRST_NAME_MAX: usize = 20;

/// A bookable resource (court, pool, course).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Facility {
    pub id: Uuid,
    /// Unique display name
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Facility {
    /// Create a new facility with a fresh id
    pub fn new(name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            created_at: now,
            updated_at: now,
        }
    }
}

/// A club member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    pub id: Uuid,
    /// Unique first name
    pub first_name: String,
    /// The member who vouches for this one, if any
    pub sponsor_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Member {
    /// Create a new, unsponsored member with a fresh id
    pub fn new(first_name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            first_name: first_name.into(),
            sponsor_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Name `sponsor` as this member's sponsor
    pub fn set_sponsor(&mut self, sponsor: &Member) {
        self.sponsor_id = Some(sponsor.id);
    }
}

/// A reservation of one facility by one member.
///
/// The member and facility references are assigned after creation and
/// persisted with an explicit save, so they are optional on the record
/// itself. A committed store never holds a booking with either unset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    /// Caller-assigned id
    pub id: i64,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub member_id: Option<Uuid>,
    pub facility_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Booking {
    /// Create an unassigned booking
    pub fn new(id: i64, start_time: DateTime<Utc>, end_time: DateTime<Utc>) -> Self {
        let now = Utc::now();
        Self {
            id,
            start_time,
            end_time,
            member_id: None,
            facility_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Assign the booking to a member
    pub fn set_member(&mut self, member: &Member) {
        self.member_id = Some(member.id);
    }

    /// Assign the booking to a facility
    pub fn set_facility(&mut self, facility: &Facility) {
        self.facility_id = Some(facility.id);
    }

    /// Whether both references have been set
    pub fn is_assigned(&self) -> bool {
        self.member_id.is_some() && self.facility_id.is_some()
    }
}

/// A facility together with its bookings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FacilityWithBookings {
    #[serde(flatten)]
    pub facility: Facility,
    pub bookings: Vec<Booking>,
}

/// A booking together with the facility and member it references.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingWithRefs {
    #[serde(flatten)]
    pub booking: Booking,
    pub facility: Facility,
    pub member: Member,
}

/// A member together with the members it sponsors.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberWithSponsored {
    #[serde(flatten)]
    pub member: Member,
    pub members_sponsored: Vec<Member>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_booking_assignment() {
        let jo = Member::new("Jo");
        let golf = Facility::new("golf");
        let mut booking = Booking::new(1, Utc::now(), Utc::now());
        assert!(!booking.is_assigned());

        booking.set_member(&jo);
        assert!(!booking.is_assigned());
        booking.set_facility(&golf);
        assert!(booking.is_assigned());
        assert_eq!(booking.member_id, Some(jo.id));
        assert_eq!(booking.facility_id, Some(golf.id));
    }

    #[test]
    fn test_json_keys_are_camel_case() {
        let mut suzie = Member::new("Suzie");
        let jo = Member::new("Jo");
        suzie.set_sponsor(&jo);

        let value = serde_json::to_value(&suzie).unwrap();
        assert_eq!(value["firstName"], "Suzie");
        assert_eq!(value["sponsorId"], jo.id.to_string());
        assert!(value.get("createdAt").is_some());
        assert!(value.get("first_name").is_none());
    }

    #[test]
    fn test_joined_shapes_flatten() {
        let tennis = Facility::new("tennis");
        let joined = FacilityWithBookings { facility: tennis.clone(), bookings: vec![] };

        let value = serde_json::to_value(&joined).unwrap();
        assert_eq!(value["name"], "tennis");
        assert_eq!(value["id"], tennis.id.to_string());
        assert_eq!(value["bookings"].as_array().unwrap().len(), 0);
    }
}
