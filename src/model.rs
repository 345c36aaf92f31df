use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use ulid::Ulid;

/// Half-open stay range `[check_in, check_out)` — the check-out day itself
/// is not occupied, so a departure and an arrival may share a calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
}

impl DateRange {
    pub fn new(check_in: NaiveDate, check_out: NaiveDate) -> Self {
        debug_assert!(check_in < check_out, "DateRange check_in must be before check_out");
        Self { check_in, check_out }
    }

    pub fn nights(&self) -> i64 {
        (self.check_out - self.check_in).num_days()
    }

    /// The single source of truth for stay conflicts: two half-open ranges
    /// overlap iff each starts before the other ends.
    pub fn overlaps(&self, other: &DateRange) -> bool {
        self.check_in < other.check_out && other.check_in < self.check_out
    }

    pub fn contains_day(&self, day: NaiveDate) -> bool {
        self.check_in <= day && day < self.check_out
    }
}

/// Housekeeping status of a physical room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoomStatus {
    Clean,
    Dirty,
    Occupied,
    Maintenance,
}

/// What the window looks out on. Ranking bonuses live in `suggest`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum View {
    Sea,
    Pool,
    Garden,
    Mountain,
    City,
    None,
}

impl View {
    pub fn label(&self) -> &'static str {
        match self {
            View::Sea => "sea",
            View::Pool => "pool",
            View::Garden => "garden",
            View::Mountain => "mountain",
            View::City => "city",
            View::None => "none",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BedKind {
    Single,
    Double,
    Twin,
    Queen,
    King,
    Suite,
}

/// Booking lifecycle states. Transition rules live in `engine::lifecycle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BookingStatus {
    Pending,
    Confirmed,
    CheckedIn,
    CheckedOut,
    Cancelled,
    NoShow,
}

impl BookingStatus {
    /// Active bookings count against room availability.
    pub fn is_active(&self) -> bool {
        matches!(
            self,
            BookingStatus::Pending | BookingStatus::Confirmed | BookingStatus::CheckedIn
        )
    }

    /// Terminal states permit no further transitions.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            BookingStatus::CheckedOut | BookingStatus::Cancelled | BookingStatus::NoShow
        )
    }

    pub fn label(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::CheckedIn => "checked_in",
            BookingStatus::CheckedOut => "checked_out",
            BookingStatus::Cancelled => "cancelled",
            BookingStatus::NoShow => "no_show",
        }
    }
}

/// Room category. Immutable once registered; bookings snapshot the rate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomType {
    pub id: Ulid,
    pub name: String,
    pub bed: BedKind,
    /// Guest capacity, 1..=10.
    pub capacity: u8,
    /// Base nightly rate. Exact decimal, never floating point.
    pub base_rate: Decimal,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    pub id: Ulid,
    /// Human room number, unique across the property.
    pub number: String,
    pub floor: u16,
    pub room_type_id: Ulid,
    pub status: RoomStatus,
    pub view: View,
    pub active: bool,
    pub notes: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Guest {
    pub id: Ulid,
    pub first_name: String,
    pub last_name: String,
    /// Unique when present.
    pub national_id: Option<String>,
    pub phone: String,
    pub email: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Guest {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Booking {
    pub id: Ulid,
    /// `HB-YYYYMMDD-NNNN`, unique and immutable after creation.
    pub number: String,
    pub room_id: Ulid,
    pub guest_id: Ulid,
    pub range: DateRange,
    pub status: BookingStatus,
    pub adults: u8,
    pub children: u8,
    /// Nightly rate snapshotted from the room type at creation time;
    /// later rate changes never touch existing bookings.
    pub nightly_rate: Decimal,
    pub service_charge: Decimal,
    pub discount: Decimal,
    pub actual_check_in: Option<DateTime<Utc>>,
    pub actual_check_out: Option<DateTime<Utc>>,
    /// Staff actor who recorded the booking.
    pub created_by: Option<Ulid>,
    pub notes: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Booking {
    pub fn nights(&self) -> i64 {
        self.range.nights()
    }

    /// Recomputed on read, never persisted.
    pub fn total_amount(&self) -> Decimal {
        crate::pricing::total_amount(
            self.nightly_rate,
            self.nights(),
            self.service_charge,
            self.discount,
        )
    }

    pub fn is_active(&self) -> bool {
        self.status.is_active()
    }
}

/// One line on an invoice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    pub description: String,
    pub quantity: u32,
    pub unit_price: Decimal,
}

impl LineItem {
    pub fn amount(&self) -> Decimal {
        self.unit_price * Decimal::from(self.quantity)
    }
}

/// Financial record tied 1:1 to a booking, issued at check-out. The PDF is
/// rendered by an external worker; the engine only supplies the totals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invoice {
    pub id: Ulid,
    /// `INV-YYYYMMDD-NNNN`, its own daily sequence.
    pub number: String,
    pub booking_id: Ulid,
    pub issued_at: DateTime<Utc>,
    pub due_date: NaiveDate,
    pub lines: Vec<LineItem>,
}

impl Invoice {
    pub fn total(&self) -> Decimal {
        self.lines.iter().map(|l| l.amount()).sum()
    }
}

// ── Query result types ───────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomSummary {
    pub id: Ulid,
    pub number: String,
    pub floor: u16,
    pub room_type_name: String,
    pub capacity: u8,
    pub nightly_rate: Decimal,
    pub status: RoomStatus,
    pub view: View,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DashboardStats {
    pub rooms_total: usize,
    pub rooms_clean: usize,
    pub rooms_dirty: usize,
    pub rooms_occupied: usize,
    pub rooms_maintenance: usize,
    pub today_checkins: usize,
    pub today_checkouts: usize,
    pub bookings_pending: usize,
    pub bookings_active: usize,
    pub guests_total: usize,
}

/// One row of the tape chart: a room and its active bookings in the window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomSchedule {
    pub room_id: Ulid,
    pub number: String,
    pub floor: u16,
    pub status: RoomStatus,
    pub bookings: Vec<ScheduleEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleEntry {
    pub booking_id: Ulid,
    pub booking_number: String,
    pub guest_name: String,
    pub range: DateRange,
    pub status: BookingStatus,
    pub nights: i64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn range_basics() {
        let r = DateRange::new(d(2025, 6, 1), d(2025, 6, 5));
        assert_eq!(r.nights(), 4);
        assert!(r.contains_day(d(2025, 6, 1)));
        assert!(r.contains_day(d(2025, 6, 4)));
        assert!(!r.contains_day(d(2025, 6, 5))); // half-open
    }

    #[test]
    fn range_overlap_is_symmetric() {
        let a = DateRange::new(d(2025, 6, 1), d(2025, 6, 5));
        let b = DateRange::new(d(2025, 6, 3), d(2025, 6, 7));
        let c = DateRange::new(d(2025, 6, 5), d(2025, 6, 7));
        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));
        assert!(!a.overlaps(&c)); // touching boundary, not overlapping
        assert!(!c.overlaps(&a));
    }

    #[test]
    fn range_overlaps_itself() {
        let a = DateRange::new(d(2025, 6, 1), d(2025, 6, 2));
        assert!(a.overlaps(&a));
    }

    #[test]
    fn single_night_contained_overlap() {
        let outer = DateRange::new(d(2025, 6, 1), d(2025, 6, 30));
        let inner = DateRange::new(d(2025, 6, 10), d(2025, 6, 11));
        assert!(outer.overlaps(&inner));
        assert!(inner.overlaps(&outer));
    }

    #[test]
    fn status_activity_and_terminality() {
        use BookingStatus::*;
        for s in [Pending, Confirmed, CheckedIn] {
            assert!(s.is_active());
            assert!(!s.is_terminal());
        }
        for s in [CheckedOut, Cancelled, NoShow] {
            assert!(!s.is_active());
            assert!(s.is_terminal());
        }
    }

    #[test]
    fn line_item_amount_uses_exact_decimal() {
        let item = LineItem {
            description: "Deluxe room charge".into(),
            quantity: 3,
            unit_price: dec!(100000),
        };
        assert_eq!(item.amount(), dec!(300000));
    }

    #[test]
    fn invoice_total_sums_line_items() {
        let invoice = Invoice {
            id: Ulid::new(),
            number: "INV-20250601-0001".into(),
            booking_id: Ulid::new(),
            issued_at: Utc::now(),
            due_date: d(2025, 6, 12),
            lines: vec![
                LineItem { description: "Room".into(), quantity: 3, unit_price: dec!(100000) },
                LineItem { description: "Service".into(), quantity: 1, unit_price: dec!(5000) },
                LineItem { description: "Discount".into(), quantity: 1, unit_price: dec!(-2000) },
            ],
        };
        assert_eq!(invoice.total(), dec!(303000));
    }

    #[test]
    fn booking_total_recomputed_on_read() {
        let mut b = Booking {
            id: Ulid::new(),
            number: "HB-20250601-0001".into(),
            room_id: Ulid::new(),
            guest_id: Ulid::new(),
            range: DateRange::new(d(2025, 6, 1), d(2025, 6, 4)),
            status: BookingStatus::Pending,
            adults: 2,
            children: 0,
            nightly_rate: dec!(100000),
            service_charge: dec!(5000),
            discount: dec!(2000),
            actual_check_in: None,
            actual_check_out: None,
            created_by: None,
            notes: String::new(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        assert_eq!(b.total_amount(), dec!(305000));
        b.discount = dec!(0);
        assert_eq!(b.total_amount(), dec!(307000));
    }
}
