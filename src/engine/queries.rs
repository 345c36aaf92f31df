use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use ulid::Ulid;

use crate::limits::{DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT, MAX_SUGGESTIONS};
use crate::model::*;
use crate::observability;
use crate::suggest::{self, RankedRoom};

use super::availability::{room_qualifies, sort_rooms};
use super::conflict::validate_range;
use super::store::RoomState;
use super::{Engine, EngineError};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BookingFilter {
    pub status: Option<BookingStatus>,
    pub room_id: Option<Ulid>,
    /// Keep bookings whose stay overlaps [from, to).
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub limit: Option<usize>,
}

impl Engine {
    // ── Availability ─────────────────────────────────────────

    /// Rooms free for the whole window, ordered by (floor, room number).
    pub async fn check_availability(
        &self,
        check_in: NaiveDate,
        check_out: NaiveDate,
        min_capacity: u8,
    ) -> Result<Vec<RoomSummary>, EngineError> {
        let range = validate_range(check_in, check_out)?;
        let start = std::time::Instant::now();
        let rooms = self.available_rooms(&range, min_capacity, None).await;
        metrics::histogram!(observability::AVAILABILITY_DURATION_SECONDS)
            .record(start.elapsed().as_secs_f64());
        Ok(rooms)
    }

    /// `exclude_booking` lets an amendment treat its own stay as vacant.
    pub(super) async fn available_rooms(
        &self,
        range: &DateRange,
        min_capacity: u8,
        exclude_booking: Option<Ulid>,
    ) -> Vec<RoomSummary> {
        let mut out = Vec::new();
        // Snapshot the Arcs first; never hold a map ref across an await.
        for rs in self.store.room_states() {
            let guard = rs.read().await;
            let Some(room_type) = self.store.room_type(&guard.room.room_type_id) else {
                continue;
            };
            if room_qualifies(&guard, room_type.capacity, range, min_capacity, exclude_booking) {
                out.push(summary(&guard, &room_type));
            }
        }
        sort_rooms(&mut out);
        out
    }

    /// Ranked shortlist for a walk-in or a phone enquiry.
    pub async fn suggest_rooms(
        &self,
        check_in: NaiveDate,
        check_out: NaiveDate,
        guests: u8,
        limit: Option<usize>,
    ) -> Result<Vec<RankedRoom>, EngineError> {
        let range = validate_range(check_in, check_out)?;
        if guests == 0 {
            return Err(EngineError::LimitExceeded("at least one guest required"));
        }
        let limit = limit.unwrap_or(MAX_SUGGESTIONS).min(MAX_SUGGESTIONS);
        let free = self.available_rooms(&range, guests, None).await;
        Ok(suggest::rank(&free, guests, range.nights(), limit))
    }

    // ── Lookups ──────────────────────────────────────────────

    pub async fn get_booking(&self, booking_id: Ulid) -> Result<Booking, EngineError> {
        let room_id = self
            .store
            .room_for_booking(&booking_id)
            .ok_or(EngineError::BookingNotFound(booking_id))?;
        let rs = self
            .room_state(&room_id)
            .ok_or(EngineError::RoomNotFound(room_id))?;
        let guard = rs.read().await;
        guard
            .booking(booking_id)
            .cloned()
            .ok_or(EngineError::BookingNotFound(booking_id))
    }

    pub async fn find_booking_by_number(&self, number: &str) -> Option<Booking> {
        let id = self.booking_numbers.lookup(number)?;
        self.get_booking(id).await.ok()
    }

    pub async fn list_bookings(&self, filter: BookingFilter) -> Vec<Booking> {
        let limit = filter
            .limit
            .unwrap_or(DEFAULT_LIST_LIMIT)
            .min(MAX_LIST_LIMIT);
        let window = match (filter.from, filter.to) {
            (Some(from), Some(to)) if from < to => Some(DateRange::new(from, to)),
            _ => None,
        };
        let mut out = Vec::new();
        for rs in self.store.room_states() {
            let guard = rs.read().await;
            if let Some(room_id) = filter.room_id
                && guard.room.id != room_id
            {
                continue;
            }
            for b in &guard.bookings {
                if let Some(status) = filter.status
                    && b.status != status
                {
                    continue;
                }
                if let Some(ref w) = window
                    && !b.range.overlaps(w)
                {
                    continue;
                }
                out.push(b.clone());
            }
        }
        out.sort_by(|a, b| {
            a.range
                .check_in
                .cmp(&b.range.check_in)
                .then_with(|| a.number.cmp(&b.number))
        });
        out.truncate(limit);
        out
    }

    pub async fn get_room(&self, room_id: Ulid) -> Result<Room, EngineError> {
        let rs = self
            .room_state(&room_id)
            .ok_or(EngineError::RoomNotFound(room_id))?;
        let guard = rs.read().await;
        Ok(guard.room.clone())
    }

    pub async fn list_rooms(
        &self,
        status: Option<RoomStatus>,
        floor: Option<u16>,
    ) -> Vec<RoomSummary> {
        let mut out = Vec::new();
        for rs in self.store.room_states() {
            let guard = rs.read().await;
            if let Some(s) = status
                && guard.room.status != s
            {
                continue;
            }
            if let Some(f) = floor
                && guard.room.floor != f
            {
                continue;
            }
            let Some(room_type) = self.store.room_type(&guard.room.room_type_id) else {
                continue;
            };
            out.push(summary(&guard, &room_type));
        }
        sort_rooms(&mut out);
        out
    }

    pub fn invoice_for_booking(&self, booking_id: Ulid) -> Option<Invoice> {
        self.store.invoice_for_booking(&booking_id)
    }

    // ── Front-desk views ─────────────────────────────────────

    pub async fn dashboard_stats(&self) -> DashboardStats {
        let today = self.clock.today();
        let mut stats = DashboardStats {
            rooms_total: self.store.room_count(),
            guests_total: self.store.guest_count(),
            ..Default::default()
        };
        for rs in self.store.room_states() {
            let guard = rs.read().await;
            match guard.room.status {
                RoomStatus::Clean => stats.rooms_clean += 1,
                RoomStatus::Dirty => stats.rooms_dirty += 1,
                RoomStatus::Occupied => stats.rooms_occupied += 1,
                RoomStatus::Maintenance => stats.rooms_maintenance += 1,
            }
            for b in &guard.bookings {
                match b.status {
                    BookingStatus::Pending | BookingStatus::Confirmed => {
                        stats.bookings_pending += usize::from(b.status == BookingStatus::Pending);
                        if b.range.check_in == today {
                            stats.today_checkins += 1;
                        }
                    }
                    BookingStatus::CheckedIn => {
                        stats.bookings_active += 1;
                        if b.range.check_out == today {
                            stats.today_checkouts += 1;
                        }
                    }
                    _ => {}
                }
            }
        }
        stats
    }

    /// Per-room schedule of active stays overlapping the window, for the
    /// tape-chart view. Rooms ordered by (floor, number), inactive included.
    pub async fn tape_chart(
        &self,
        check_in: NaiveDate,
        check_out: NaiveDate,
    ) -> Result<Vec<RoomSchedule>, EngineError> {
        let range = validate_range(check_in, check_out)?;
        let mut out = Vec::new();
        for rs in self.store.room_states() {
            let guard = rs.read().await;
            let bookings = guard
                .overlapping(&range)
                .filter(|b| b.is_active())
                .map(|b| ScheduleEntry {
                    booking_id: b.id,
                    booking_number: b.number.clone(),
                    guest_name: self
                        .store
                        .guest(&b.guest_id)
                        .map(|g| g.full_name())
                        .unwrap_or_default(),
                    range: b.range,
                    status: b.status,
                    nights: b.nights(),
                })
                .collect();
            out.push(RoomSchedule {
                room_id: guard.room.id,
                number: guard.room.number.clone(),
                floor: guard.room.floor,
                status: guard.room.status,
                bookings,
            });
        }
        out.sort_by(|a, b| a.floor.cmp(&b.floor).then_with(|| a.number.cmp(&b.number)));
        Ok(out)
    }
}

fn summary(rs: &RoomState, room_type: &RoomType) -> RoomSummary {
    RoomSummary {
        id: rs.room.id,
        number: rs.room.number.clone(),
        floor: rs.room.floor,
        room_type_name: room_type.name.clone(),
        capacity: room_type.capacity,
        nightly_rate: room_type.base_rate,
        status: rs.room.status,
        view: rs.room.view,
    }
}
