//! Human-readable identifier generation.
//!
//! Booking and invoice numbers follow `<PREFIX>-<YYYYMMDD>-<NNNN>`: the
//! sequence restarts each day and increases monotonically within it. The
//! generator doubles as the unique index on issued numbers; a collision with
//! a reserved number is retried exactly once before giving up.

use chrono::NaiveDate;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use ulid::Ulid;

use crate::engine::EngineError;

pub struct SequenceGenerator {
    prefix: &'static str,
    /// Highest sequence handed out per day.
    last: DashMap<NaiveDate, u32>,
    /// Unique index: issued number → owning entity.
    taken: DashMap<String, Ulid>,
}

impl SequenceGenerator {
    pub fn new(prefix: &'static str) -> Self {
        Self {
            prefix,
            last: DashMap::new(),
            taken: DashMap::new(),
        }
    }

    /// Allocate the next number for `day` and bind it to `owner`.
    ///
    /// The counter bump and the unique-index insert are each atomic, so two
    /// concurrent callers always draw distinct sequences. A collision can
    /// only come from a number registered via `reserve`; it is retried once.
    pub fn allocate(&self, day: NaiveDate, owner: Ulid) -> Result<String, EngineError> {
        for _attempt in 0..2 {
            let seq = {
                let mut entry = self.last.entry(day).or_insert(0);
                *entry += 1;
                *entry
            };
            let number = format!("{}-{}-{:04}", self.prefix, day.format("%Y%m%d"), seq);
            match self.taken.entry(number.clone()) {
                Entry::Vacant(slot) => {
                    slot.insert(owner);
                    return Ok(number);
                }
                Entry::Occupied(_) => {
                    tracing::warn!(number = %number, "identifier collision, retrying");
                }
            }
        }
        Err(EngineError::IdentifierGenerationFailed(self.prefix))
    }

    /// Register a pre-existing number (e.g. records carried over from a
    /// previous system). Returns false if the number was already taken.
    pub fn reserve(&self, number: &str, owner: Ulid) -> bool {
        match self.taken.entry(number.to_string()) {
            Entry::Vacant(slot) => {
                slot.insert(owner);
                true
            }
            Entry::Occupied(_) => false,
        }
    }

    /// Resolve an issued number back to its owner.
    pub fn lookup(&self, number: &str) -> Option<Ulid> {
        self.taken.get(number).map(|e| *e.value())
    }
}
