//! Query handlers for the Playthrough context.
//!
//! This module contains query handlers that project a playthrough into a
//! read-only, serializable view.

use loopwalk_catalog::domain::location::{LocationId, Side};
use serde::Serialize;
use uuid::Uuid;

use crate::domain::aggregates::{ActiveScene, InFlightAction, Playthrough};
use crate::domain::ending::EndingKind;
use crate::domain::phase::Phase;
use crate::domain::scoring::Scores;

/// Read-only view of a playthrough.
#[derive(Debug, Serialize)]
pub struct PlaythroughView {
    /// The playthrough identifier.
    pub playthrough_id: Uuid,
    /// The visible phase.
    pub phase: Phase,
    /// The active location, or the one being loaded.
    pub location: LocationId,
    /// Pending actions on the left side.
    pub left_remaining: usize,
    /// Pending actions on the right side.
    pub right_remaining: usize,
    /// Resolved actions at this location.
    pub completed_actions: usize,
    /// Actions this location started with.
    pub total_actions: usize,
    /// Current scores.
    pub scores: Scores,
    /// The action being played out, if any.
    pub in_flight: Option<InFlightAction>,
    /// The scene the host should be playing, if any.
    pub active_scene: Option<ActiveScene>,
    /// The ending, once resolved.
    pub ending: Option<EndingKind>,
}

/// Projects `playthrough` into a view.
#[must_use]
pub fn get_playthrough_view(playthrough: &Playthrough) -> PlaythroughView {
    let queues = playthrough.queues();
    PlaythroughView {
        playthrough_id: playthrough.id,
        phase: playthrough.phase(),
        location: playthrough.location(),
        left_remaining: queues.remaining(Side::Left),
        right_remaining: queues.remaining(Side::Right),
        completed_actions: queues.completed_actions(),
        total_actions: queues.total_actions(),
        scores: playthrough.scores(),
        in_flight: playthrough.in_flight().cloned(),
        active_scene: playthrough.active_scene().cloned(),
        ending: playthrough.ending(),
    }
}
