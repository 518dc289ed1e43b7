//! Shared domain abstractions for the Cardo guessing game.
//!
//! Traits and types every other Cardo crate builds on: time, randomness,
//! errors, events and the event repository port. No infrastructure lives
//! here.

pub mod aggregate;
pub mod clock;
pub mod command;
pub mod error;
pub mod event;
pub mod repository;
pub mod rng;
