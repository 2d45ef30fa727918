//! Commands for the Playthrough context.

use loopwalk_core::command::Command;
use uuid::Uuid;

use super::events::SceneToken;
use super::phase::Interaction;

/// Command to begin (or restart) a playthrough at the first location.
#[derive(Debug, Clone)]
pub struct StartPlaythrough {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The playthrough identifier.
    pub playthrough_id: Uuid,
}

impl Command for StartPlaythrough {
    fn command_type(&self) -> &'static str {
        "playthrough.start_playthrough"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Command to deliver a player input.
#[derive(Debug, Clone)]
pub struct Interact {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The interaction delivered.
    pub interaction: Interaction,
}

impl Command for Interact {
    fn command_type(&self) -> &'static str {
        "playthrough.interact"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Command reporting that the host finished playing a scene.
#[derive(Debug, Clone)]
pub struct EndScene {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// Token of the scene that ended.
    pub token: SceneToken,
}

impl Command for EndScene {
    fn command_type(&self) -> &'static str {
        "playthrough.end_scene"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}
