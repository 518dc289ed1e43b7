//! Game bounded context for Cardo.
//!
//! Two players alternate between choosing a card (the cardoelector) and
//! guessing which card was chosen (the cardomante). This crate owns the
//! scoring policy, role alternation, the per-round state machine, the
//! session aggregate and the handlers that persist it as an event stream.

pub mod application;
pub mod domain;
