//! Cardo stores.
//!
//! `PostgreSQL` adapters for the session event stream and the card
//! catalog, plus an in-memory event repository for local play and tests.

pub mod memory_event_repository;
pub mod pg_card_catalog;
pub mod pg_event_repository;
pub mod schema;

pub use memory_event_repository::InMemoryEventRepository;
pub use pg_card_catalog::PgCardCatalog;
pub use pg_event_repository::PgEventRepository;
