use std::sync::Arc;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use ulid::Ulid;

use crate::documents::DocumentJob;
use crate::limits::*;
use crate::model::*;
use crate::observability;
use crate::pricing;

use super::conflict::{conflicting_booking, validate_range};
use super::lifecycle;
use super::store::RoomState;
use super::{Engine, EngineError};

// ── Request types ────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewRoomType {
    pub name: String,
    pub bed: BedKind,
    pub capacity: u8,
    pub base_rate: Decimal,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewRoom {
    pub number: String,
    pub floor: u16,
    pub room_type_id: Ulid,
    pub view: View,
    pub notes: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewGuest {
    pub first_name: String,
    pub last_name: String,
    pub national_id: Option<String>,
    pub phone: String,
    pub email: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingRequest {
    pub room_id: Ulid,
    pub guest_id: Ulid,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub adults: u8,
    pub children: u8,
    pub service_charge: Decimal,
    pub discount: Decimal,
    pub notes: String,
}

impl Engine {
    // ── Registration ─────────────────────────────────────────

    pub fn add_room_type(&self, req: NewRoomType) -> Result<RoomType, EngineError> {
        if req.name.len() > MAX_NAME_LEN {
            return Err(EngineError::LimitExceeded("room type name too long"));
        }
        if req.capacity == 0 || req.capacity > MAX_OCCUPANTS {
            return Err(EngineError::LimitExceeded("capacity out of range"));
        }
        if req.base_rate < Decimal::ZERO {
            return Err(EngineError::LimitExceeded("negative base rate"));
        }
        let room_type = RoomType {
            id: Ulid::new(),
            name: req.name,
            bed: req.bed,
            capacity: req.capacity,
            base_rate: req.base_rate,
            description: req.description,
        };
        self.store.insert_room_type(room_type.clone());
        Ok(room_type)
    }

    pub fn add_room(&self, req: NewRoom) -> Result<Room, EngineError> {
        if req.number.is_empty() || req.number.len() > MAX_NAME_LEN {
            return Err(EngineError::LimitExceeded("room number out of range"));
        }
        if req.notes.len() > MAX_NOTES_LEN {
            return Err(EngineError::LimitExceeded("notes too long"));
        }
        if self.store.room_type(&req.room_type_id).is_none() {
            return Err(EngineError::RoomTypeNotFound(req.room_type_id));
        }
        let id = Ulid::new();
        if !self.store.claim_room_number(&req.number, id) {
            return Err(EngineError::DuplicateRoomNumber(req.number));
        }
        let room = Room {
            id,
            number: req.number,
            floor: req.floor,
            room_type_id: req.room_type_id,
            status: RoomStatus::Clean,
            view: req.view,
            active: true,
            notes: req.notes,
        };
        self.store
            .insert_room(id, Arc::new(RwLock::new(RoomState::new(room.clone()))));
        tracing::info!(room = %room.number, floor = room.floor, "room registered");
        Ok(room)
    }

    pub fn add_guest(&self, req: NewGuest) -> Result<Guest, EngineError> {
        if req.first_name.len() > MAX_NAME_LEN || req.last_name.len() > MAX_NAME_LEN {
            return Err(EngineError::LimitExceeded("guest name too long"));
        }
        let id = Ulid::new();
        if let Some(ref national_id) = req.national_id
            && !self.store.claim_national_id(national_id, id)
        {
            return Err(EngineError::DuplicateNationalId(national_id.clone()));
        }
        let guest = Guest {
            id,
            first_name: req.first_name,
            last_name: req.last_name,
            national_id: req.national_id,
            phone: req.phone,
            email: req.email,
            created_at: self.clock.now(),
        };
        self.store.insert_guest(guest.clone());
        Ok(guest)
    }

    /// Housekeeping entry point. Does not touch bookings.
    pub async fn set_room_status(
        &self,
        room_id: Ulid,
        status: RoomStatus,
    ) -> Result<(), EngineError> {
        let rs = self
            .room_state(&room_id)
            .ok_or(EngineError::RoomNotFound(room_id))?;
        let mut guard = rs.write().await;
        guard.room.status = status;
        Ok(())
    }

    /// Take a room in or out of service. Existing bookings are untouched;
    /// an inactive room simply stops matching availability and new creates.
    pub async fn set_room_active(&self, room_id: Ulid, active: bool) -> Result<(), EngineError> {
        let rs = self
            .room_state(&room_id)
            .ok_or(EngineError::RoomNotFound(room_id))?;
        let mut guard = rs.write().await;
        guard.room.active = active;
        Ok(())
    }

    // ── Booking lifecycle ────────────────────────────────────

    /// Create a booking in `Pending` state.
    ///
    /// The availability check, booking-number allocation and insert all
    /// happen under the room's write lock, so two racing creates for the
    /// same dates cannot both succeed.
    pub async fn create_booking(
        &self,
        req: BookingRequest,
        actor: Option<Ulid>,
    ) -> Result<Booking, EngineError> {
        let range = validate_range(req.check_in, req.check_out)?;
        if req.adults == 0 {
            return Err(EngineError::LimitExceeded("at least one adult required"));
        }
        let requested = req.adults.saturating_add(req.children);
        if requested > MAX_OCCUPANTS {
            return Err(EngineError::LimitExceeded("too many occupants"));
        }
        if req.notes.len() > MAX_NOTES_LEN {
            return Err(EngineError::LimitExceeded("notes too long"));
        }
        if req.service_charge < Decimal::ZERO || req.discount < Decimal::ZERO {
            return Err(EngineError::LimitExceeded("negative charge amount"));
        }
        if self.store.guest(&req.guest_id).is_none() {
            return Err(EngineError::GuestNotFound(req.guest_id));
        }
        let rs = self
            .room_state(&req.room_id)
            .ok_or(EngineError::RoomNotFound(req.room_id))?;
        let mut guard = rs.write().await;
        if !guard.room.active {
            return Err(EngineError::RoomInactive(req.room_id));
        }
        let room_type = self
            .store
            .room_type(&guard.room.room_type_id)
            .ok_or(EngineError::RoomTypeNotFound(guard.room.room_type_id))?;
        if requested > room_type.capacity {
            return Err(EngineError::CapacityExceeded {
                capacity: room_type.capacity,
                requested,
            });
        }
        if let Some(conflicting) = conflicting_booking(&guard, &range, None) {
            metrics::counter!(observability::BOOKING_CONFLICTS_TOTAL).increment(1);
            return Err(EngineError::RoomUnavailable {
                room_id: req.room_id,
                conflicting,
            });
        }

        let id = Ulid::new();
        let number = self.booking_numbers.allocate(self.clock.today(), id)?;
        let now = self.clock.now();
        let booking = Booking {
            id,
            number,
            room_id: req.room_id,
            guest_id: req.guest_id,
            range,
            status: BookingStatus::Pending,
            adults: req.adults,
            children: req.children,
            nightly_rate: room_type.base_rate,
            service_charge: req.service_charge,
            discount: req.discount,
            actual_check_in: None,
            actual_check_out: None,
            created_by: actor,
            notes: req.notes,
            created_at: now,
            updated_at: now,
        };
        guard
            .insert_booking(booking.clone())
            .map_err(EngineError::ConcurrentBookingConflict)?;
        self.store.map_booking(id, req.room_id);

        tracing::info!(
            booking = %booking.number,
            room = %guard.room.number,
            nights = booking.nights(),
            "booking created"
        );
        metrics::counter!(observability::BOOKINGS_CREATED_TOTAL).increment(1);
        Ok(booking)
    }

    pub async fn confirm_booking(&self, booking_id: Ulid) -> Result<Booking, EngineError> {
        self.transition(booking_id, BookingStatus::Confirmed).await
    }

    pub async fn check_in(&self, booking_id: Ulid) -> Result<Booking, EngineError> {
        self.transition(booking_id, BookingStatus::CheckedIn).await
    }

    pub async fn check_out(&self, booking_id: Ulid) -> Result<Booking, EngineError> {
        self.transition(booking_id, BookingStatus::CheckedOut).await
    }

    pub async fn cancel_booking(&self, booking_id: Ulid) -> Result<Booking, EngineError> {
        self.transition(booking_id, BookingStatus::Cancelled).await
    }

    pub async fn mark_no_show(&self, booking_id: Ulid) -> Result<Booking, EngineError> {
        self.transition(booking_id, BookingStatus::NoShow).await
    }

    /// Move a booking through the state machine, applying side effects.
    ///
    /// Everything that can fail is resolved before the first write, so a
    /// rejected transition leaves the booking and the room untouched.
    pub async fn transition(
        &self,
        booking_id: Ulid,
        target: BookingStatus,
    ) -> Result<Booking, EngineError> {
        let (_, mut guard) = self.resolve_booking_write(&booking_id).await?;
        let from = guard
            .booking(booking_id)
            .ok_or(EngineError::BookingNotFound(booking_id))?
            .status;
        if let Err(e) = lifecycle::check_transition(booking_id, from, target) {
            metrics::counter!(observability::TRANSITION_REJECTIONS_TOTAL).increment(1);
            return Err(e);
        }

        // Check-out issues an invoice: fetch everything it needs up front
        // so a failure here leaves no partial state behind.
        let invoice_parts = if target == BookingStatus::CheckedOut {
            let room_type = self
                .store
                .room_type(&guard.room.room_type_id)
                .ok_or(EngineError::RoomTypeNotFound(guard.room.room_type_id))?;
            let invoice_id = Ulid::new();
            let number = self
                .invoice_numbers
                .allocate(self.clock.today(), invoice_id)?;
            Some((room_type, invoice_id, number))
        } else {
            None
        };

        let now = self.clock.now();
        let booking = {
            let b = guard
                .booking_mut(booking_id)
                .ok_or(EngineError::BookingNotFound(booking_id))?;
            b.status = target;
            b.updated_at = now;
            match target {
                BookingStatus::CheckedIn => b.actual_check_in = Some(now),
                BookingStatus::CheckedOut => b.actual_check_out = Some(now),
                _ => {}
            }
            b.clone()
        };
        match target {
            BookingStatus::CheckedIn => guard.room.status = RoomStatus::Occupied,
            BookingStatus::CheckedOut => guard.room.status = RoomStatus::Dirty,
            _ => {}
        }
        drop(guard);

        tracing::info!(
            booking = %booking.number,
            from = observability::status_label(from),
            to = observability::status_label(target),
            "booking transition"
        );
        metrics::counter!(
            observability::TRANSITIONS_TOTAL,
            "to" => observability::status_label(target)
        )
        .increment(1);

        if let Some((room_type, invoice_id, number)) = invoice_parts {
            let invoice = Invoice {
                id: invoice_id,
                number,
                booking_id,
                issued_at: now,
                due_date: pricing::due_date(booking.range.check_out),
                lines: pricing::invoice_lines(&booking, &room_type.name),
            };
            let total = invoice.total();
            self.store.insert_invoice(invoice);
            metrics::counter!(observability::INVOICES_ISSUED_TOTAL).increment(1);
            tracing::info!(booking = %booking.number, %total, "invoice issued");
            // Fire-and-forget: PDF generation never blocks check-out.
            self.documents
                .enqueue(DocumentJob {
                    invoice_id,
                    booking_id,
                })
                .await;
        }

        Ok(booking)
    }

    /// Change a booking's dates and optionally its room. Only bookings that
    /// have not checked in can be amended; the nightly rate stays as
    /// snapshotted at creation.
    pub async fn amend_booking(
        &self,
        booking_id: Ulid,
        check_in: NaiveDate,
        check_out: NaiveDate,
        new_room: Option<Ulid>,
    ) -> Result<Booking, EngineError> {
        let range = validate_range(check_in, check_out)?;
        let source_room = self
            .store
            .room_for_booking(&booking_id)
            .ok_or(EngineError::BookingNotFound(booking_id))?;
        let target_room = new_room.unwrap_or(source_room);

        if target_room == source_room {
            let rs = self
                .room_state(&source_room)
                .ok_or(EngineError::RoomNotFound(source_room))?;
            let mut guard = rs.write().await;
            let status = guard
                .booking(booking_id)
                .ok_or(EngineError::BookingNotFound(booking_id))?
                .status;
            lifecycle::check_amendable(booking_id, status)?;
            if let Some(conflicting) = conflicting_booking(&guard, &range, Some(booking_id)) {
                metrics::counter!(observability::BOOKING_CONFLICTS_TOTAL).increment(1);
                return Err(EngineError::RoomUnavailable {
                    room_id: source_room,
                    conflicting,
                });
            }
            let mut booking = guard
                .remove_booking(booking_id)
                .ok_or(EngineError::BookingNotFound(booking_id))?;
            booking.range = range;
            booking.updated_at = self.clock.now();
            guard
                .insert_booking(booking.clone())
                .map_err(EngineError::ConcurrentBookingConflict)?;
            return Ok(booking);
        }

        // Room move: lock both rooms in sorted id order to avoid deadlock
        // against a concurrent move in the opposite direction.
        let src_rs = self
            .room_state(&source_room)
            .ok_or(EngineError::RoomNotFound(source_room))?;
        let dst_rs = self
            .room_state(&target_room)
            .ok_or(EngineError::RoomNotFound(target_room))?;
        let (mut src, mut dst) = if source_room < target_room {
            let a = src_rs.write_owned().await;
            let b = dst_rs.write_owned().await;
            (a, b)
        } else {
            let b = dst_rs.write_owned().await;
            let a = src_rs.write_owned().await;
            (a, b)
        };

        let existing = src
            .booking(booking_id)
            .ok_or(EngineError::BookingNotFound(booking_id))?;
        lifecycle::check_amendable(booking_id, existing.status)?;
        if !dst.room.active {
            return Err(EngineError::RoomInactive(target_room));
        }
        let room_type = self
            .store
            .room_type(&dst.room.room_type_id)
            .ok_or(EngineError::RoomTypeNotFound(dst.room.room_type_id))?;
        let requested = existing.adults.saturating_add(existing.children);
        if requested > room_type.capacity {
            return Err(EngineError::CapacityExceeded {
                capacity: room_type.capacity,
                requested,
            });
        }
        if let Some(conflicting) = conflicting_booking(&dst, &range, Some(booking_id)) {
            metrics::counter!(observability::BOOKING_CONFLICTS_TOTAL).increment(1);
            return Err(EngineError::RoomUnavailable {
                room_id: target_room,
                conflicting,
            });
        }

        let mut booking = src
            .remove_booking(booking_id)
            .ok_or(EngineError::BookingNotFound(booking_id))?;
        booking.room_id = target_room;
        booking.range = range;
        booking.updated_at = self.clock.now();
        dst.insert_booking(booking.clone())
            .map_err(EngineError::ConcurrentBookingConflict)?;
        self.store.map_booking(booking_id, target_room);

        tracing::info!(
            booking = %booking.number,
            from_room = %src.room.number,
            to_room = %dst.room.number,
            "booking moved"
        );
        Ok(booking)
    }
}
