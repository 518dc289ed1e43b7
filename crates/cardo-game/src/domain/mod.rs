//! Domain model for the game context.

pub mod aggregates;
pub mod commands;
pub mod events;
pub mod roles;
pub mod round;
pub mod scoring;
pub mod standings;

use std::collections::BTreeMap;

/// Points per player name.
pub type Scores = BTreeMap<String, u32>;
