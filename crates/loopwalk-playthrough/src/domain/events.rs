//! Domain events for the Playthrough context.

use std::fmt;

use loopwalk_catalog::domain::location::{LocationId, Side};
use loopwalk_core::event::{DomainEvent, EventMetadata};
use loopwalk_core::scene::SceneId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::ending::EndingKind;
use super::phase::Phase;
use super::scoring::{Axis, Scores};

/// Event type for [`LocationEntered`].
pub const LOCATION_ENTERED_EVENT_TYPE: &str = "playthrough.location_entered";
/// Event type for [`SceneRequested`].
pub const SCENE_REQUESTED_EVENT_TYPE: &str = "playthrough.scene_requested";
/// Event type for [`PhaseChanged`].
pub const PHASE_CHANGED_EVENT_TYPE: &str = "playthrough.phase_changed";
/// Event type for [`ActionDispatched`].
pub const ACTION_DISPATCHED_EVENT_TYPE: &str = "playthrough.action_dispatched";
/// Event type for [`ActionResolved`].
pub const ACTION_RESOLVED_EVENT_TYPE: &str = "playthrough.action_resolved";
/// Event type for [`ScoreChanged`].
pub const SCORE_CHANGED_EVENT_TYPE: &str = "playthrough.score_changed";
/// Event type for [`LocationCompleted`].
pub const LOCATION_COMPLETED_EVENT_TYPE: &str = "playthrough.location_completed";
/// Event type for [`PlaythroughEnded`].
pub const PLAYTHROUGH_ENDED_EVENT_TYPE: &str = "playthrough.ended";

/// Identifies one scene request.
///
/// Tokens strictly increase within a playthrough, so the host's end-of-scene
/// notice can be matched against the request it answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SceneToken(pub u64);

impl fmt::Display for SceneToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// How a dispatched action was resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Resolution {
    /// The first answer of a simple action.
    ChoseA,
    /// The second answer of a simple action.
    ChoseB,
    /// A simple action ran out.
    TimedOut,
    /// A chain reached its depth.
    ChainCompleted,
    /// A chain ran out before reaching its depth.
    ChainStopped,
}

impl Resolution {
    /// Returns the score axis this resolution credits, if any.
    #[must_use]
    pub fn axis(self) -> Option<Axis> {
        match self {
            Self::ChoseA => Some(Axis::A),
            Self::ChoseB => Some(Axis::B),
            Self::TimedOut => Some(Axis::Avoidant),
            Self::ChainCompleted | Self::ChainStopped => None,
        }
    }
}

/// Emitted when a location's queues are loaded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationEntered {
    /// The playthrough identifier.
    pub playthrough_id: Uuid,
    /// The location entered.
    pub location: LocationId,
    /// Actions available across both sides.
    pub total_actions: usize,
}

/// Emitted whenever the host should start playing a scene.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneRequested {
    /// Token the host echoes back when the scene ends.
    pub token: SceneToken,
    /// The scene to play.
    pub scene: SceneId,
    /// Whether the host should loop the scene.
    pub looping: bool,
}

/// Emitted when the visible phase changes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhaseChanged {
    /// The phase left.
    pub from: Phase,
    /// The phase entered.
    pub to: Phase,
}

/// Emitted when an action leaves its queue.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionDispatched {
    /// The side it was dispatched from.
    pub side: Side,
    /// The action identifier.
    pub action_id: String,
    /// Required advances for a chain action.
    pub chain_depth: Option<u32>,
}

/// Emitted when a dispatched action is resolved.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionResolved {
    /// The side it was dispatched from.
    pub side: Side,
    /// The action identifier.
    pub action_id: String,
    /// How it was resolved.
    pub resolution: Resolution,
    /// Resolved actions at this location, this one included.
    pub completed_actions: usize,
    /// Actions this location started with.
    pub total_actions: usize,
}

/// Emitted when a score axis moves.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreChanged {
    /// The axis incremented.
    pub axis: Axis,
    /// Scores after the increment.
    pub scores: Scores,
}

/// Emitted when both queues of a location are drained.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationCompleted {
    /// The completed location.
    pub location: LocationId,
}

/// Emitted once the final location's finale has played.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaythroughEnded {
    /// The resolved ending.
    pub ending: EndingKind,
    /// Final scores.
    pub scores: Scores,
}

/// Event payload variants for the Playthrough context.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum PlaythroughEventKind {
    /// A location has been entered.
    LocationEntered(LocationEntered),
    /// A scene should be played.
    SceneRequested(SceneRequested),
    /// The phase has changed.
    PhaseChanged(PhaseChanged),
    /// An action has been dispatched.
    ActionDispatched(ActionDispatched),
    /// An action has been resolved.
    ActionResolved(ActionResolved),
    /// A score has changed.
    ScoreChanged(ScoreChanged),
    /// A location has been completed.
    LocationCompleted(LocationCompleted),
    /// The playthrough has ended.
    PlaythroughEnded(PlaythroughEnded),
}

impl PlaythroughEventKind {
    /// Returns the event type name of this payload.
    #[must_use]
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::LocationEntered(_) => LOCATION_ENTERED_EVENT_TYPE,
            Self::SceneRequested(_) => SCENE_REQUESTED_EVENT_TYPE,
            Self::PhaseChanged(_) => PHASE_CHANGED_EVENT_TYPE,
            Self::ActionDispatched(_) => ACTION_DISPATCHED_EVENT_TYPE,
            Self::ActionResolved(_) => ACTION_RESOLVED_EVENT_TYPE,
            Self::ScoreChanged(_) => SCORE_CHANGED_EVENT_TYPE,
            Self::LocationCompleted(_) => LOCATION_COMPLETED_EVENT_TYPE,
            Self::PlaythroughEnded(_) => PLAYTHROUGH_ENDED_EVENT_TYPE,
        }
    }
}

/// Domain event envelope for the Playthrough context.
#[derive(Debug, Clone)]
pub struct PlaythroughEvent {
    /// Event metadata.
    pub metadata: EventMetadata,
    /// Event-specific payload.
    pub kind: PlaythroughEventKind,
}

impl DomainEvent for PlaythroughEvent {
    fn event_type(&self) -> &'static str {
        self.kind.event_type()
    }

    fn to_payload(&self) -> serde_json::Value {
        // Serialization of derived Serialize types to Value is infallible.
        serde_json::to_value(&self.kind).expect("PlaythroughEventKind serialization is infallible")
    }

    fn metadata(&self) -> &EventMetadata {
        &self.metadata
    }
}
