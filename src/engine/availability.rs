use ulid::Ulid;

use crate::model::{DateRange, RoomSummary};

use super::conflict::conflicting_booking;
use super::store::RoomState;

// ── Availability Algorithm ────────────────────────────────────────

/// A room qualifies for a window when it is in service, sleeps enough
/// guests, and carries no active booking overlapping the window.
///
/// Housekeeping status is deliberately not consulted: a dirty room is still
/// bookable (it only loses ranking points), and an occupied flag means a
/// checked-in booking which the conflict set already covers.
pub(crate) fn room_qualifies(
    rs: &RoomState,
    capacity: u8,
    range: &DateRange,
    min_capacity: u8,
    exclude_booking: Option<Ulid>,
) -> bool {
    rs.room.active
        && capacity >= min_capacity
        && conflicting_booking(rs, range, exclude_booking).is_none()
}

/// Deterministic ordering for room result sets: floor, then room number.
pub(crate) fn sort_rooms(rooms: &mut [RoomSummary]) {
    rooms.sort_by(|a, b| a.floor.cmp(&b.floor).then_with(|| a.number.cmp(&b.number)));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::*;
    use chrono::{NaiveDate, Utc};
    use rust_decimal_macros::dec;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn state(active: bool, booked: Option<(NaiveDate, NaiveDate)>) -> RoomState {
        let mut rs = RoomState::new(Room {
            id: Ulid::new(),
            number: "101".into(),
            floor: 1,
            room_type_id: Ulid::new(),
            status: RoomStatus::Dirty,
            view: View::City,
            active,
            notes: String::new(),
        });
        if let Some((check_in, check_out)) = booked {
            rs.insert_booking(Booking {
                id: Ulid::new(),
                number: format!("HB-TEST-{}", Ulid::new()),
                room_id: rs.room.id,
                guest_id: Ulid::new(),
                range: DateRange::new(check_in, check_out),
                status: BookingStatus::Confirmed,
                adults: 1,
                children: 0,
                nightly_rate: dec!(100000),
                service_charge: dec!(0),
                discount: dec!(0),
                actual_check_in: None,
                actual_check_out: None,
                created_by: None,
                notes: String::new(),
                created_at: Utc::now(),
                updated_at: Utc::now(),
            })
            .unwrap();
        }
        rs
    }

    #[test]
    fn free_active_room_qualifies_even_when_dirty() {
        let rs = state(true, None);
        let range = DateRange::new(d(2025, 6, 1), d(2025, 6, 5));
        assert!(room_qualifies(&rs, 2, &range, 2, None));
    }

    #[test]
    fn inactive_room_never_qualifies() {
        let rs = state(false, None);
        let range = DateRange::new(d(2025, 6, 1), d(2025, 6, 5));
        assert!(!room_qualifies(&rs, 2, &range, 1, None));
    }

    #[test]
    fn undersized_room_does_not_qualify() {
        let rs = state(true, None);
        let range = DateRange::new(d(2025, 6, 1), d(2025, 6, 5));
        assert!(!room_qualifies(&rs, 2, &range, 3, None));
    }

    #[test]
    fn conflicting_booking_disqualifies() {
        let rs = state(true, Some((d(2025, 6, 3), d(2025, 6, 7))));
        let range = DateRange::new(d(2025, 6, 1), d(2025, 6, 5));
        assert!(!room_qualifies(&rs, 2, &range, 1, None));
        // Excluding the conflicting booking itself re-qualifies the room.
        let own = rs.bookings[0].id;
        assert!(room_qualifies(&rs, 2, &range, 1, Some(own)));
    }

    #[test]
    fn sort_orders_by_floor_then_number() {
        let summary = |number: &str, floor: u16| RoomSummary {
            id: Ulid::new(),
            number: number.into(),
            floor,
            room_type_name: "Standard".into(),
            capacity: 2,
            nightly_rate: dec!(100000),
            status: RoomStatus::Clean,
            view: View::City,
        };
        let mut rooms = vec![summary("203", 2), summary("102", 1), summary("201", 2), summary("101", 1)];
        sort_rooms(&mut rooms);
        let order: Vec<&str> = rooms.iter().map(|r| r.number.as_str()).collect();
        assert_eq!(order, vec!["101", "102", "201", "203"]);
    }
}
