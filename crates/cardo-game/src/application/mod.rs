//! Application layer for the game context: the round engine and the
//! command/query handlers that persist and read sessions.

pub mod command_handlers;
pub mod input;
pub mod query_handlers;
pub mod round_engine;
