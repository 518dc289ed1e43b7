//! Shared test fakes and utilities for the Cardo guessing game.

mod clock;
mod repository;
mod rng;

pub use clock::{FixedClock, fixed_clock};
pub use repository::{EmptyEventRepository, FailingEventRepository, RecordingEventRepository};
pub use rng::{MockRng, SequenceRng};
