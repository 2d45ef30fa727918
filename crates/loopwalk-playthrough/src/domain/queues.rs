//! Per-location action queues.

use std::collections::VecDeque;

use loopwalk_catalog::domain::catalog::Catalog;
use loopwalk_catalog::domain::location::{ActionSpec, LocationId, Side};
use loopwalk_core::error::DomainError;

/// Pending actions of the active location, one FIFO per side.
///
/// An action leaves its queue the moment it is dispatched and is never put
/// back, whatever the outcome.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActionQueues {
    left: VecDeque<ActionSpec>,
    right: VecDeque<ActionSpec>,
    total_actions: usize,
    completed_actions: usize,
}

impl ActionQueues {
    /// Creates empty queues.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the queues with fresh copies of `location`'s actions and
    /// zeroes the counters.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::UnknownLocation` if the catalog has no such
    /// location; the queues are left untouched.
    pub fn initialize(&mut self, catalog: &Catalog, location: LocationId) -> Result<(), DomainError> {
        let definition = catalog.get(location)?;
        self.left = definition.left.actions.iter().cloned().collect();
        self.right = definition.right.actions.iter().cloned().collect();
        self.total_actions = definition.total_actions();
        self.completed_actions = 0;
        Ok(())
    }

    /// Returns the next pending action of `side` without removing it.
    #[must_use]
    pub fn peek_next(&self, side: Side) -> Option<&ActionSpec> {
        self.queue(side).front()
    }

    /// Removes and returns the next pending action of `side`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::QueueEmpty` if `side` has no pending action.
    pub fn dispatch(&mut self, side: Side) -> Result<ActionSpec, DomainError> {
        self.queue_mut(side)
            .pop_front()
            .ok_or(DomainError::QueueEmpty {
                side: side.as_str(),
            })
    }

    /// Returns `true` if `side` has no pending action.
    #[must_use]
    pub fn is_empty(&self, side: Side) -> bool {
        self.queue(side).is_empty()
    }

    /// Returns `true` once both sides are drained.
    #[must_use]
    pub fn all_empty(&self) -> bool {
        self.left.is_empty() && self.right.is_empty()
    }

    /// Returns the number of pending actions of `side`.
    #[must_use]
    pub fn remaining(&self, side: Side) -> usize {
        self.queue(side).len()
    }

    /// Counts one resolved action.
    pub fn record_completion(&mut self) {
        debug_assert!(
            self.completed_actions < self.total_actions,
            "more resolutions than actions"
        );
        self.completed_actions += 1;
    }

    /// Returns the number of resolved actions at this location.
    #[must_use]
    pub fn completed_actions(&self) -> usize {
        self.completed_actions
    }

    /// Returns the number of actions this location started with.
    #[must_use]
    pub fn total_actions(&self) -> usize {
        self.total_actions
    }

    fn queue(&self, side: Side) -> &VecDeque<ActionSpec> {
        match side {
            Side::Left => &self.left,
            Side::Right => &self.right,
        }
    }

    fn queue_mut(&mut self, side: Side) -> &mut VecDeque<ActionSpec> {
        match side {
            Side::Left => &mut self.left,
            Side::Right => &mut self.right,
        }
    }
}
