//! Scene identifier composition.
//!
//! Identifiers follow
//! `{prefix}{location}{keyword}{side}{action}{chain steps}{choice}.{ext}`
//! and must match the host's asset names exactly. Composition only reads the
//! values passed in; no counters are consulted.

use loopwalk_core::scene::SceneId;
use serde::{Deserialize, Serialize};

use super::location::{LocationId, Side};

/// The two answers of a simple action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Choice {
    /// The first (top) answer.
    A,
    /// The second (bottom) answer.
    B,
}

impl Choice {
    /// Returns the suffix of this choice's reaction scene.
    #[must_use]
    pub fn suffix(self) -> &'static str {
        match self {
            Self::A => "A1",
            Self::B => "A2",
        }
    }
}

/// One advance within a chain action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChainStep {
    /// The player pushed the chain forward.
    Advance,
}

impl ChainStep {
    /// Returns the suffix this step appends to the action scene.
    #[must_use]
    pub fn suffix(self) -> &'static str {
        match self {
            Self::Advance => "A1",
        }
    }
}

/// Description of a scene within a location.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scene<'a> {
    /// The looping corridor the player waits in.
    Idle,
    /// Walking animation, also used to return to the corridor.
    Walk,
    /// Closing scene of a completed location.
    Finale,
    /// "Nothing here" feedback for a drained side.
    Empty {
        /// The side's keyword.
        keyword: &'a str,
        /// The side interacted with.
        side: Side,
    },
    /// Feedback for an unmet prerequisite.
    Fallback {
        /// The suffix declared by the prerequisite.
        suffix: &'a str,
    },
    /// An action awaiting input, after `chain_steps` advances.
    Action {
        /// The side's keyword.
        keyword: &'a str,
        /// The side the action came from.
        side: Side,
        /// The action identifier.
        action_id: &'a str,
        /// Advances accumulated so far.
        chain_steps: &'a [ChainStep],
    },
    /// The consequence of a simple action's choice.
    Reaction {
        /// The side's keyword.
        keyword: &'a str,
        /// The side the action came from.
        side: Side,
        /// The action identifier.
        action_id: &'a str,
        /// The choice made.
        choice: Choice,
    },
}

/// Prefix and extension shared by every scene of a catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SceneNaming {
    /// Text preceding the location number.
    pub prefix: String,
    /// File extension, without the dot.
    pub extension: String,
}

impl Default for SceneNaming {
    fn default() -> Self {
        Self {
            prefix: "Gang".to_owned(),
            extension: "mp4".to_owned(),
        }
    }
}

impl SceneNaming {
    /// Composes the identifier of `scene` at `location`.
    #[must_use]
    pub fn scene_id(&self, location: LocationId, scene: &Scene<'_>) -> SceneId {
        let mut name = format!("{}{}", self.prefix, location);
        match scene {
            Scene::Idle => {}
            Scene::Walk => name.push_str("Walk"),
            Scene::Finale => name.push_str("Finale"),
            Scene::Empty { keyword, side } => {
                name.push_str(keyword);
                name.push_str(side.as_str());
                name.push_str("no");
            }
            Scene::Fallback { suffix } => name.push_str(suffix),
            Scene::Action {
                keyword,
                side,
                action_id,
                chain_steps,
            } => {
                name.push_str(keyword);
                name.push_str(side.as_str());
                name.push_str(action_id);
                for step in *chain_steps {
                    name.push_str(step.suffix());
                }
            }
            Scene::Reaction {
                keyword,
                side,
                action_id,
                choice,
            } => {
                name.push_str(keyword);
                name.push_str(side.as_str());
                name.push_str(action_id);
                name.push_str(choice.suffix());
            }
        }
        name.push('.');
        name.push_str(&self.extension);
        SceneId::new(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn compose(scene: &Scene<'_>) -> String {
        SceneNaming::default()
            .scene_id(LocationId(2), scene)
            .as_str()
            .to_owned()
    }

    #[test]
    fn test_corridor_scenes() {
        assert_eq!(compose(&Scene::Idle), "Gang2.mp4");
        assert_eq!(compose(&Scene::Walk), "Gang2Walk.mp4");
        assert_eq!(compose(&Scene::Finale), "Gang2Finale.mp4");
    }

    #[test]
    fn test_feedback_scenes() {
        assert_eq!(
            compose(&Scene::Empty {
                keyword: "Call",
                side: Side::Left
            }),
            "Gang2CallLno.mp4"
        );
        assert_eq!(
            compose(&Scene::Fallback { suffix: "DoorRno" }),
            "Gang2DoorRno.mp4"
        );
    }

    #[test]
    fn test_chain_steps_append_suffixes() {
        let steps = [ChainStep::Advance, ChainStep::Advance];

        assert_eq!(
            compose(&Scene::Action {
                keyword: "Door",
                side: Side::Right,
                action_id: "1",
                chain_steps: &steps[..0],
            }),
            "Gang2DoorR1.mp4"
        );
        assert_eq!(
            compose(&Scene::Action {
                keyword: "Door",
                side: Side::Right,
                action_id: "1",
                chain_steps: &steps,
            }),
            "Gang2DoorR1A1A1.mp4"
        );
    }

    #[test]
    fn test_reaction_scene_uses_choice_suffix() {
        let scene = Scene::Reaction {
            keyword: "Call",
            side: Side::Left,
            action_id: "2",
            choice: Choice::B,
        };
        assert_eq!(compose(&scene), "Gang2CallL2A2.mp4");
    }

    #[test]
    fn test_custom_naming() {
        let naming = SceneNaming {
            prefix: "Hall".to_owned(),
            extension: "webm".to_owned(),
        };
        assert_eq!(
            naming.scene_id(LocationId(7), &Scene::Walk).as_str(),
            "Hall7Walk.webm"
        );
    }
}
