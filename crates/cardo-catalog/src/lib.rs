//! Card catalog for the Cardo guessing game.
//!
//! The catalog is the read-only deck the game draws from, partitioned into
//! a fixed set of categories. This crate owns the card model, the
//! [`port::CardCatalog`] port that storage adapters implement, and the
//! [`gateway::CatalogGateway`] that turns the port into uniform sampling
//! and cross-category lookup.

pub mod card;
pub mod deck;
pub mod gateway;
pub mod memory;
pub mod port;

pub use card::{Card, CardId, Category, MAX_SCORE};
pub use gateway::{CatalogGateway, CatalogReport};
pub use memory::InMemoryCardCatalog;
pub use port::CardCatalog;
