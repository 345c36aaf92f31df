//! Hard limits enforced at the engine boundary.

/// Longest bookable stay, in nights.
pub const MAX_STAY_NIGHTS: i64 = 365;

/// Names (guests, room types) and room numbers.
pub const MAX_NAME_LEN: usize = 100;

/// Free-form notes on rooms and bookings.
pub const MAX_NOTES_LEN: usize = 2000;

/// Per-party occupant cap (adults and children each).
pub const MAX_OCCUPANTS: u8 = 10;

/// Most suggestions a single ranking call may return.
pub const MAX_SUGGESTIONS: usize = 10;

/// Default and maximum page size for listing queries.
pub const DEFAULT_LIST_LIMIT: usize = 50;
pub const MAX_LIST_LIMIT: usize = 100;
