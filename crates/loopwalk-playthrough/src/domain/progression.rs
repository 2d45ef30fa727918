//! Progression decisions after a resolved action.

use loopwalk_catalog::domain::catalog::Catalog;
use loopwalk_catalog::domain::location::LocationId;

use super::queues::ActionQueues;

/// What follows the return walk of a resolved action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Progression {
    /// Both queues are drained; play the finale.
    LocationComplete,
    /// Actions remain; wait in the corridor again.
    ReturnToIdle,
}

/// What follows the finale of a location.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    /// Continue with the next catalog location.
    Enter(LocationId),
    /// The catalog is exhausted; resolve the ending.
    EndOfContent,
}

/// Decides whether the active location is finished.
///
/// Evaluated after every resolution, whatever its kind.
#[must_use]
pub fn check(queues: &ActionQueues) -> Progression {
    if queues.all_empty() {
        Progression::LocationComplete
    } else {
        Progression::ReturnToIdle
    }
}

/// Decides where a playthrough goes after `current`'s finale.
#[must_use]
pub fn advance(catalog: &Catalog, current: LocationId) -> Advance {
    catalog
        .next_after(current)
        .map_or(Advance::EndOfContent, Advance::Enter)
}
