use std::sync::Arc;

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use tokio::sync::RwLock;
use ulid::Ulid;

use crate::model::*;

pub type SharedRoomState = Arc<RwLock<RoomState>>;

/// A room and every booking ever taken against it, under one lock.
///
/// Keeping the bookings inside the room's lock is what makes the
/// check-then-insert sequence atomic: whoever holds the write lock owns the
/// room's whole booking set for the duration.
#[derive(Debug, Clone)]
pub struct RoomState {
    pub room: Room,
    /// All bookings (any status), sorted by `range.check_in`.
    pub bookings: Vec<Booking>,
}

impl RoomState {
    pub fn new(room: Room) -> Self {
        Self {
            room,
            bookings: Vec::new(),
        }
    }

    /// Insert maintaining sort order by check-in date.
    ///
    /// Re-checks the no-overlap invariant at commit when the incoming
    /// booking is active; a violation here means the caller's availability
    /// check and this insert were not covered by the same lock.
    pub fn insert_booking(&mut self, booking: Booking) -> Result<(), Ulid> {
        if booking.is_active()
            && let Some(conflict) = self
                .overlapping(&booking.range)
                .find(|b| b.is_active() && b.id != booking.id)
        {
            return Err(conflict.id);
        }
        let pos = self
            .bookings
            .partition_point(|b| b.range.check_in <= booking.range.check_in);
        self.bookings.insert(pos, booking);
        Ok(())
    }

    pub fn booking(&self, id: Ulid) -> Option<&Booking> {
        self.bookings.iter().find(|b| b.id == id)
    }

    pub fn booking_mut(&mut self, id: Ulid) -> Option<&mut Booking> {
        self.bookings.iter_mut().find(|b| b.id == id)
    }

    pub fn remove_booking(&mut self, id: Ulid) -> Option<Booking> {
        let pos = self.bookings.iter().position(|b| b.id == id)?;
        Some(self.bookings.remove(pos))
    }

    /// Bookings whose stay overlaps the window, any status.
    pub fn overlapping(&self, range: &DateRange) -> impl Iterator<Item = &Booking> {
        // Everything at index >= right_bound checks in at or after the
        // window's check-out → cannot overlap a half-open range.
        let right_bound = self
            .bookings
            .partition_point(|b| b.range.check_in < range.check_out);
        self.bookings[..right_bound]
            .iter()
            .filter(move |b| b.range.check_out > range.check_in)
    }
}

/// Concurrent in-memory store: the single consistent transactional backing
/// assumed by the engine. Unique constraints live in the side indexes.
pub struct InMemoryStore {
    room_types: DashMap<Ulid, RoomType>,
    rooms: DashMap<Ulid, SharedRoomState>,
    /// Unique constraint on human room numbers.
    room_numbers: DashMap<String, Ulid>,
    guests: DashMap<Ulid, Guest>,
    /// Unique constraint on guest national ids.
    national_ids: DashMap<String, Ulid>,
    /// Reverse lookup: booking id → room id.
    booking_to_room: DashMap<Ulid, Ulid>,
    invoices: DashMap<Ulid, Invoice>,
    /// 1:1 booking → invoice.
    invoice_by_booking: DashMap<Ulid, Ulid>,
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            room_types: DashMap::new(),
            rooms: DashMap::new(),
            room_numbers: DashMap::new(),
            guests: DashMap::new(),
            national_ids: DashMap::new(),
            booking_to_room: DashMap::new(),
            invoices: DashMap::new(),
            invoice_by_booking: DashMap::new(),
        }
    }

    // ── Room types ───────────────────────────────────────────

    pub fn insert_room_type(&self, room_type: RoomType) {
        self.room_types.insert(room_type.id, room_type);
    }

    pub fn room_type(&self, id: &Ulid) -> Option<RoomType> {
        self.room_types.get(id).map(|e| e.value().clone())
    }

    // ── Rooms ────────────────────────────────────────────────

    /// Claim a room number. Returns false if already taken.
    pub fn claim_room_number(&self, number: &str, room_id: Ulid) -> bool {
        match self.room_numbers.entry(number.to_string()) {
            Entry::Vacant(slot) => {
                slot.insert(room_id);
                true
            }
            Entry::Occupied(_) => false,
        }
    }

    pub fn insert_room(&self, id: Ulid, state: SharedRoomState) {
        self.rooms.insert(id, state);
    }

    pub fn room(&self, id: &Ulid) -> Option<SharedRoomState> {
        self.rooms.get(id).map(|e| e.value().clone())
    }

    /// Snapshot of all room states for whole-property scans.
    pub fn room_states(&self) -> Vec<SharedRoomState> {
        self.rooms.iter().map(|e| e.value().clone()).collect()
    }

    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }

    // ── Guests ───────────────────────────────────────────────

    /// Claim a national id. Returns false if already registered.
    pub fn claim_national_id(&self, national_id: &str, guest_id: Ulid) -> bool {
        match self.national_ids.entry(national_id.to_string()) {
            Entry::Vacant(slot) => {
                slot.insert(guest_id);
                true
            }
            Entry::Occupied(_) => false,
        }
    }

    pub fn insert_guest(&self, guest: Guest) {
        self.guests.insert(guest.id, guest);
    }

    pub fn guest(&self, id: &Ulid) -> Option<Guest> {
        self.guests.get(id).map(|e| e.value().clone())
    }

    pub fn guest_count(&self) -> usize {
        self.guests.len()
    }

    // ── Booking index ────────────────────────────────────────

    pub fn map_booking(&self, booking_id: Ulid, room_id: Ulid) {
        self.booking_to_room.insert(booking_id, room_id);
    }

    pub fn room_for_booking(&self, booking_id: &Ulid) -> Option<Ulid> {
        self.booking_to_room.get(booking_id).map(|e| *e.value())
    }

    // ── Invoices ─────────────────────────────────────────────

    pub fn insert_invoice(&self, invoice: Invoice) {
        self.invoice_by_booking.insert(invoice.booking_id, invoice.id);
        self.invoices.insert(invoice.id, invoice);
    }

    pub fn invoice(&self, id: &Ulid) -> Option<Invoice> {
        self.invoices.get(id).map(|e| e.value().clone())
    }

    pub fn invoice_for_booking(&self, booking_id: &Ulid) -> Option<Invoice> {
        let invoice_id = self.invoice_by_booking.get(booking_id)?;
        self.invoice(invoice_id.value())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};
    use rust_decimal_macros::dec;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn room() -> Room {
        Room {
            id: Ulid::new(),
            number: "101".into(),
            floor: 1,
            room_type_id: Ulid::new(),
            status: RoomStatus::Clean,
            view: View::City,
            active: true,
            notes: String::new(),
        }
    }

    fn booking(check_in: NaiveDate, check_out: NaiveDate, status: BookingStatus) -> Booking {
        Booking {
            id: Ulid::new(),
            number: format!("HB-TEST-{}", Ulid::new()),
            room_id: Ulid::new(),
            guest_id: Ulid::new(),
            range: DateRange::new(check_in, check_out),
            status,
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
        }
    }

    #[test]
    fn insert_keeps_check_in_order() {
        let mut rs = RoomState::new(room());
        rs.insert_booking(booking(d(2025, 6, 10), d(2025, 6, 12), BookingStatus::Pending)).unwrap();
        rs.insert_booking(booking(d(2025, 6, 1), d(2025, 6, 3), BookingStatus::Pending)).unwrap();
        rs.insert_booking(booking(d(2025, 6, 5), d(2025, 6, 8), BookingStatus::Pending)).unwrap();
        let starts: Vec<NaiveDate> = rs.bookings.iter().map(|b| b.range.check_in).collect();
        assert_eq!(starts, vec![d(2025, 6, 1), d(2025, 6, 5), d(2025, 6, 10)]);
    }

    #[test]
    fn insert_rejects_active_overlap_at_commit() {
        let mut rs = RoomState::new(room());
        let first = booking(d(2025, 6, 1), d(2025, 6, 5), BookingStatus::Confirmed);
        let first_id = first.id;
        rs.insert_booking(first).unwrap();
        let clash = booking(d(2025, 6, 3), d(2025, 6, 7), BookingStatus::Pending);
        assert_eq!(rs.insert_booking(clash), Err(first_id));
    }

    #[test]
    fn cancelled_bookings_do_not_block_insert() {
        let mut rs = RoomState::new(room());
        rs.insert_booking(booking(d(2025, 6, 1), d(2025, 6, 5), BookingStatus::Cancelled)).unwrap();
        rs.insert_booking(booking(d(2025, 6, 3), d(2025, 6, 7), BookingStatus::Pending)).unwrap();
        assert_eq!(rs.bookings.len(), 2);
    }

    #[test]
    fn overlapping_window_excludes_adjacent() {
        let mut rs = RoomState::new(room());
        rs.insert_booking(booking(d(2025, 6, 1), d(2025, 6, 5), BookingStatus::Pending)).unwrap();
        rs.insert_booking(booking(d(2025, 6, 5), d(2025, 6, 8), BookingStatus::Pending)).unwrap();
        rs.insert_booking(booking(d(2025, 6, 20), d(2025, 6, 22), BookingStatus::Pending)).unwrap();

        let window = DateRange::new(d(2025, 6, 5), d(2025, 6, 10));
        let hits: Vec<_> = rs.overlapping(&window).collect();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].range.check_in, d(2025, 6, 5));
    }

    #[test]
    fn remove_booking_returns_it() {
        let mut rs = RoomState::new(room());
        let b = booking(d(2025, 6, 1), d(2025, 6, 5), BookingStatus::Pending);
        let id = b.id;
        rs.insert_booking(b).unwrap();
        assert!(rs.remove_booking(id).is_some());
        assert!(rs.remove_booking(id).is_none());
        assert!(rs.bookings.is_empty());
    }

    #[test]
    fn unique_indexes_reject_duplicates() {
        let store = InMemoryStore::new();
        assert!(store.claim_room_number("101", Ulid::new()));
        assert!(!store.claim_room_number("101", Ulid::new()));
        assert!(store.claim_national_id("1234567890", Ulid::new()));
        assert!(!store.claim_national_id("1234567890", Ulid::new()));
    }
}
