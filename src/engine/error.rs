use chrono::NaiveDate;
use ulid::Ulid;

use crate::model::BookingStatus;

#[derive(Debug)]
pub enum EngineError {
    InvalidDateRange {
        check_in: NaiveDate,
        check_out: NaiveDate,
    },
    RoomNotFound(Ulid),
    RoomTypeNotFound(Ulid),
    GuestNotFound(Ulid),
    BookingNotFound(Ulid),
    RoomInactive(Ulid),
    DuplicateRoomNumber(String),
    DuplicateNationalId(String),
    CapacityExceeded {
        capacity: u8,
        requested: u8,
    },
    RoomUnavailable {
        room_id: Ulid,
        conflicting: Ulid,
    },
    InvalidTransition {
        from: BookingStatus,
        to: BookingStatus,
    },
    CannotCancelActive(Ulid),
    AlreadyTerminal(BookingStatus),
    ConcurrentBookingConflict(Ulid),
    IdentifierGenerationFailed(&'static str),
    LimitExceeded(&'static str),
}

impl std::fmt::Display for EngineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EngineError::InvalidDateRange { check_in, check_out } => {
                write!(f, "invalid date range: check-in {check_in} must precede check-out {check_out}")
            }
            EngineError::RoomNotFound(id) => write!(f, "room not found: {id}"),
            EngineError::RoomTypeNotFound(id) => write!(f, "room type not found: {id}"),
            EngineError::GuestNotFound(id) => write!(f, "guest not found: {id}"),
            EngineError::BookingNotFound(id) => write!(f, "booking not found: {id}"),
            EngineError::RoomInactive(id) => write!(f, "room is not in service: {id}"),
            EngineError::DuplicateRoomNumber(n) => write!(f, "room number already registered: {n}"),
            EngineError::DuplicateNationalId(n) => {
                write!(f, "guest with national id already registered: {n}")
            }
            EngineError::CapacityExceeded { capacity, requested } => {
                write!(f, "room sleeps {capacity}, requested {requested}")
            }
            EngineError::RoomUnavailable { room_id, conflicting } => {
                write!(f, "room {room_id} already booked for these dates (conflicts with {conflicting})")
            }
            EngineError::InvalidTransition { from, to } => {
                write!(f, "cannot move booking from {} to {}", from.label(), to.label())
            }
            EngineError::CannotCancelActive(id) => {
                write!(f, "booking {id} is checked in and cannot be cancelled or amended")
            }
            EngineError::AlreadyTerminal(status) => {
                write!(f, "booking already {}: no further transitions", status.label())
            }
            EngineError::ConcurrentBookingConflict(id) => {
                write!(f, "concurrent booking won the room (conflicts with {id}); re-check availability and retry")
            }
            EngineError::IdentifierGenerationFailed(prefix) => {
                write!(f, "could not allocate a unique {prefix} number after retry")
            }
            EngineError::LimitExceeded(msg) => write!(f, "limit exceeded: {msg}"),
        }
    }
}

impl std::error::Error for EngineError {}
