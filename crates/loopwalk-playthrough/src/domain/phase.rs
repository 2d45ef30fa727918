//! Phases and interaction events.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Externally visible phase of a playthrough.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Phase {
    /// Assets of the upcoming location are being made ready.
    Loading,
    /// Waiting in the corridor for the player.
    Idle,
    /// A walking scene is playing; no choice is pending.
    Transit,
    /// Feedback for a drained side or an unmet prerequisite.
    NoAction,
    /// Awaiting a timed choice, or the first advance of a chain.
    Action,
    /// The consequence of a choice is playing.
    Reaction,
    /// A chain is past its first advance, or its completion scene is playing.
    Chain,
    /// The finale of the location is playing.
    LocationComplete,
    /// The playthrough is over.
    Ended,
}

impl Phase {
    /// Returns the wire name of the phase.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Loading => "LOADING",
            Self::Idle => "IDLE",
            Self::Transit => "TRANSIT",
            Self::NoAction => "NO_ACTION",
            Self::Action => "ACTION",
            Self::Reaction => "REACTION",
            Self::Chain => "CHAIN",
            Self::LocationComplete => "LOCATION_COMPLETE",
            Self::Ended => "ENDED",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Abstract input delivered by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Interaction {
    /// Walk on down the corridor.
    Walk,
    /// Interact with the left side.
    Left,
    /// Interact with the right side.
    Right,
    /// Take the first answer of a simple action.
    ChoiceA,
    /// Take the second answer of a simple action.
    ChoiceB,
    /// Push a chain action one step further.
    ChainAdvance,
    /// The player let the action run out.
    Timeout,
}
