use chrono::NaiveDate;
use ulid::Ulid;

use crate::limits::MAX_STAY_NIGHTS;
use crate::model::DateRange;

use super::EngineError;
use super::store::RoomState;

/// Validate raw check-in/check-out dates into a usable range.
pub(crate) fn validate_range(
    check_in: NaiveDate,
    check_out: NaiveDate,
) -> Result<DateRange, EngineError> {
    if check_in >= check_out {
        return Err(EngineError::InvalidDateRange { check_in, check_out });
    }
    let range = DateRange::new(check_in, check_out);
    if range.nights() > MAX_STAY_NIGHTS {
        return Err(EngineError::LimitExceeded("stay too long"));
    }
    Ok(range)
}

/// First active booking conflicting with the range, if any.
///
/// Every conflict decision in the engine funnels through here and, in turn,
/// through `DateRange::overlaps` — one off-by-one policy for everybody.
pub(crate) fn conflicting_booking(
    rs: &RoomState,
    range: &DateRange,
    exclude_booking: Option<Ulid>,
) -> Option<Ulid> {
    rs.overlapping(range)
        .find(|b| b.is_active() && Some(b.id) != exclude_booking)
        .map(|b| b.id)
}
