mod availability;
mod conflict;
mod error;
mod lifecycle;
mod mutations;
mod queries;
mod store;

pub use error::EngineError;
pub use mutations::{BookingRequest, NewGuest, NewRoom, NewRoomType};
pub use queries::BookingFilter;
pub use store::{RoomState, SharedRoomState};

use std::sync::Arc;

use tokio::sync::OwnedRwLockWriteGuard;
use ulid::Ulid;

use crate::clock::Clock;
use crate::documents::DocumentSink;
use crate::ident::SequenceGenerator;

use store::InMemoryStore;

pub struct Engine {
    pub(super) store: InMemoryStore,
    pub(super) clock: Arc<dyn Clock>,
    pub(super) documents: Arc<dyn DocumentSink>,
    pub(super) booking_numbers: SequenceGenerator,
    pub(super) invoice_numbers: SequenceGenerator,
}

impl Engine {
    pub fn new(clock: Arc<dyn Clock>, documents: Arc<dyn DocumentSink>) -> Self {
        Self {
            store: InMemoryStore::new(),
            clock,
            documents,
            booking_numbers: SequenceGenerator::new("HB"),
            invoice_numbers: SequenceGenerator::new("INV"),
        }
    }

    pub fn room_state(&self, id: &Ulid) -> Option<SharedRoomState> {
        self.store.room(id)
    }

    /// Lookup booking → room, get room state, acquire write lock.
    pub(super) async fn resolve_booking_write(
        &self,
        booking_id: &Ulid,
    ) -> Result<(Ulid, OwnedRwLockWriteGuard<RoomState>), EngineError> {
        let room_id = self
            .store
            .room_for_booking(booking_id)
            .ok_or(EngineError::BookingNotFound(*booking_id))?;
        let rs = self
            .room_state(&room_id)
            .ok_or(EngineError::RoomNotFound(room_id))?;
        let guard = rs.write_owned().await;
        Ok((room_id, guard))
    }
}
