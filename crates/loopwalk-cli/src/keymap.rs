//! Phase-aware key mapping.
//!
//! Keys are read a line at a time, so arrow keys and the space bar are typed
//! as words (`up`, `space`). An empty line counts as `enter`.

use loopwalk_playthrough::domain::phase::{Interaction, Phase};

/// What a key press asks the host to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostCommand {
    /// Deliver an interaction to the playthrough.
    Interact(Interaction),
    /// Report that the active scene finished playing.
    EndScene,
    /// Start over from the first location.
    Restart,
    /// Leave the host.
    Quit,
}

/// Maps `key` to a command, given the current phase and whether the action
/// in flight is a chain. Returns `None` for keys with no meaning right now.
#[must_use]
pub fn map_key(key: &str, phase: Phase, chain_in_flight: bool) -> Option<HostCommand> {
    let key = key.trim().to_ascii_lowercase();
    let key = if key.is_empty() { "enter" } else { key.as_str() };

    match key {
        "." | "end" => return Some(HostCommand::EndScene),
        "t" | "timeout" => return Some(HostCommand::Interact(Interaction::Timeout)),
        "r" | "restart" => return Some(HostCommand::Restart),
        "q" | "quit" => return Some(HostCommand::Quit),
        _ => {}
    }

    let interaction = match (phase, chain_in_flight, key) {
        (Phase::Idle, _, "w" | "up") => Interaction::Walk,
        (Phase::Idle, _, "a" | "left") => Interaction::Left,
        (Phase::Idle, _, "d" | "right") => Interaction::Right,
        (Phase::Action | Phase::Chain, true, "w" | "up" | "space" | "enter") => {
            Interaction::ChainAdvance
        }
        (Phase::Action, false, "w" | "up") => Interaction::ChoiceA,
        (Phase::Action, false, "s" | "down") => Interaction::ChoiceB,
        _ => return None,
    };
    Some(HostCommand::Interact(interaction))
}
