//! Domain types for the arrival board.
//!
//! These types represent validated arrival data. Identifiers enforce
//! their invariants at construction time, so code that receives them
//! can trust their validity.

mod due;
mod record;
mod stop;

pub use due::DueTime;
pub use record::Arrival;
pub use stop::{InvalidStopId, StopId};
