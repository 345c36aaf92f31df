//! In-memory hotel booking engine: availability, booking lifecycle,
//! pricing and invoicing, with per-room locking for conflict safety.

pub mod clock;
pub mod documents;
pub mod engine;
pub mod ident;
pub mod limits;
pub mod model;
pub mod observability;
pub mod pricing;
pub mod suggest;

pub use engine::{BookingFilter, BookingRequest, Engine, EngineError, NewGuest, NewRoom, NewRoomType};
