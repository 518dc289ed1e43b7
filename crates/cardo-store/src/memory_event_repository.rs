//! In-memory implementation of the `EventRepository` trait.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use uuid::Uuid;

use cardo_core::error::DomainError;
use cardo_core::repository::{EventRepository, StoredEvent};

/// Event repository that keeps every stream in process memory, with the
/// same version checks as [`crate::PgEventRepository`].
#[derive(Debug, Default)]
pub struct InMemoryEventRepository {
    streams: Mutex<HashMap<Uuid, Vec<StoredEvent>>>,
}

impl InMemoryEventRepository {
    /// Creates an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(
        &self,
    ) -> Result<std::sync::MutexGuard<'_, HashMap<Uuid, Vec<StoredEvent>>>, DomainError> {
        self.streams
            .lock()
            .map_err(|_| DomainError::Infrastructure("event store lock poisoned".to_owned()))
    }
}

#[async_trait]
impl EventRepository for InMemoryEventRepository {
    async fn load_events(&self, aggregate_id: Uuid) -> Result<Vec<StoredEvent>, DomainError> {
        Ok(self.lock()?.get(&aggregate_id).cloned().unwrap_or_default())
    }

    async fn append_events(
        &self,
        aggregate_id: Uuid,
        expected_version: i64,
        events: &[StoredEvent],
    ) -> Result<(), DomainError> {
        if events.is_empty() {
            return Ok(());
        }

        let mut streams = self.lock()?;
        let stream = streams.entry(aggregate_id).or_default();
        let actual = stream.last().map_or(0, |e| e.sequence_number);
        if actual != expected_version {
            return Err(DomainError::ConcurrencyConflict {
                aggregate_id,
                expected: expected_version,
                actual,
            });
        }

        let mut next = actual;
        for event in events {
            if event.sequence_number <= next {
                return Err(DomainError::ConcurrencyConflict {
                    aggregate_id,
                    expected: expected_version,
                    actual: event.sequence_number,
                });
            }
            next = event.sequence_number;
        }

        stream.extend(events.iter().cloned());
        Ok(())
    }
}
