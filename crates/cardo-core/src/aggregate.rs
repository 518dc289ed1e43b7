//! Aggregate root abstraction.

use uuid::Uuid;

use crate::event::DomainEvent;

/// Trait for aggregate roots that are folded from their event stream.
pub trait AggregateRoot: Send + Sync {
    /// The event type this aggregate produces and consumes.
    type Event: DomainEvent;

    /// Returns the aggregate identifier.
    fn aggregate_id(&self) -> Uuid;

    /// Returns the number of events applied so far.
    fn version(&self) -> i64;

    /// Folds one event into the aggregate state.
    fn apply(&mut self, event: &Self::Event);

    /// Events produced by the last command and not yet persisted.
    fn uncommitted_events(&self) -> &[Self::Event];

    /// Drops pending events without applying them.
    fn clear_uncommitted_events(&mut self);

    /// Folds the pending events into the state and clears them. Call only
    /// after the repository has confirmed the append.
    fn commit(&mut self)
    where
        Self::Event: Clone,
    {
        let pending = self.uncommitted_events().to_vec();
        for event in &pending {
            self.apply(event);
        }
        self.clear_uncommitted_events();
    }
}
