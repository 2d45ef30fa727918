//! Location definitions.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Default number of advances a chain action needs to complete.
pub const DEFAULT_CHAIN_DEPTH: u32 = 2;

/// One of the two interaction lanes of a location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    /// The left lane.
    Left,
    /// The right lane.
    Right,
}

impl Side {
    /// Both sides, left first.
    pub const ALL: [Side; 2] = [Side::Left, Side::Right];

    /// Returns the tag used in scene identifiers.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Left => "L",
            Self::Right => "R",
        }
    }

    /// Returns the opposite side.
    #[must_use]
    pub fn other(self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Number of a location within the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LocationId(pub u32);

impl fmt::Display for LocationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A dispatchable unit of interactive content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ActionSpec {
    /// A single timed A/B choice.
    Simple {
        /// Action identifier used in scene names.
        id: String,
    },
    /// A multi-step action completed by `depth` advances.
    Chain {
        /// Action identifier used in scene names.
        id: String,
        /// Advances required to complete the chain.
        depth: u32,
    },
}

impl ActionSpec {
    /// Creates a simple action.
    #[must_use]
    pub fn simple(id: impl Into<String>) -> Self {
        Self::Simple { id: id.into() }
    }

    /// Creates a chain action.
    #[must_use]
    pub fn chain(id: impl Into<String>, depth: u32) -> Self {
        Self::Chain {
            id: id.into(),
            depth,
        }
    }

    /// Returns the action identifier.
    #[must_use]
    pub fn id(&self) -> &str {
        match self {
            Self::Simple { id } | Self::Chain { id, .. } => id,
        }
    }

    /// Returns the required chain depth, or `None` for simple actions.
    #[must_use]
    pub fn chain_depth(&self) -> Option<u32> {
        match self {
            Self::Simple { .. } => None,
            Self::Chain { depth, .. } => Some(*depth),
        }
    }
}

/// State the other side's queue must be in for a prerequisite to hold.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequiredState {
    /// The queue has no pending actions.
    #[default]
    Empty,
}

/// Cross-side gate on a side's actions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Prerequisite {
    /// The side whose queue is inspected.
    pub depends_on: Side,
    /// The state that queue must be in.
    pub required_state: RequiredState,
    /// Scene suffix played when the prerequisite is unmet.
    pub fallback: String,
}

/// Keyword, actions and optional prerequisite of one side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SideDefinition {
    /// Tag used in this side's scene identifiers (e.g. `Call`, `Door`).
    pub keyword: String,
    /// Ordered actions, dispatched front to back.
    pub actions: Vec<ActionSpec>,
    /// Optional gate evaluated when the side is interacted with.
    pub prerequisite: Option<Prerequisite>,
}

impl SideDefinition {
    /// Creates a side without a prerequisite.
    #[must_use]
    pub fn new(keyword: impl Into<String>, actions: Vec<ActionSpec>) -> Self {
        Self {
            keyword: keyword.into(),
            actions,
            prerequisite: None,
        }
    }

    /// Attaches a prerequisite to this side.
    #[must_use]
    pub fn with_prerequisite(mut self, prerequisite: Prerequisite) -> Self {
        self.prerequisite = Some(prerequisite);
        self
    }
}

/// Immutable definition of one location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LocationDefinition {
    /// Location number.
    pub id: LocationId,
    /// The left lane.
    pub left: SideDefinition,
    /// The right lane.
    pub right: SideDefinition,
}

impl LocationDefinition {
    /// Returns the definition of `side`.
    #[must_use]
    pub fn side(&self, side: Side) -> &SideDefinition {
        match side {
            Side::Left => &self.left,
            Side::Right => &self.right,
        }
    }

    /// Returns the number of actions across both sides.
    #[must_use]
    pub fn total_actions(&self) -> usize {
        self.left.actions.len() + self.right.actions.len()
    }
}
