//! The booking state machine, validated in one place.
//!
//! Guard failures are pure decisions: callers check first, mutate after, so
//! a rejected transition leaves nothing behind.

use ulid::Ulid;

use crate::model::BookingStatus;

use super::EngineError;

/// Validate a requested transition. Guard precedence: terminal states first,
/// then the cancel family, then the forward table.
pub(crate) fn check_transition(
    booking_id: Ulid,
    from: BookingStatus,
    to: BookingStatus,
) -> Result<(), EngineError> {
    use BookingStatus::*;

    if from.is_terminal() {
        return Err(EngineError::AlreadyTerminal(from));
    }

    match to {
        // Cancel and no-show share guards; they differ only as reason codes.
        Cancelled | NoShow => {
            if from == CheckedIn {
                Err(EngineError::CannotCancelActive(booking_id))
            } else {
                Ok(())
            }
        }
        Confirmed => {
            if from == Pending {
                Ok(())
            } else {
                Err(EngineError::InvalidTransition { from, to })
            }
        }
        CheckedIn => {
            if matches!(from, Pending | Confirmed) {
                Ok(())
            } else {
                Err(EngineError::InvalidTransition { from, to })
            }
        }
        CheckedOut => {
            if from == CheckedIn {
                Ok(())
            } else {
                Err(EngineError::InvalidTransition { from, to })
            }
        }
        // No way back to the initial state.
        Pending => Err(EngineError::InvalidTransition { from, to }),
    }
}

/// Guard for date/room amendments: only not-yet-arrived active bookings.
pub(crate) fn check_amendable(booking_id: Ulid, status: BookingStatus) -> Result<(), EngineError> {
    if status.is_terminal() {
        return Err(EngineError::AlreadyTerminal(status));
    }
    if status == BookingStatus::CheckedIn {
        return Err(EngineError::CannotCancelActive(booking_id));
    }
    Ok(())
}
