//! The interactive terminal host.

use std::sync::{Arc, Mutex, PoisonError};

use loopwalk_asset_store::caching_preloader::Playback;
use loopwalk_core::assets::{LoadObserver, LoadProgress};
use loopwalk_core::error::DomainError;
use loopwalk_core::event::EventRecord;
use loopwalk_playthrough::application::command_handlers::{
    PlaythroughCommandResult, handle_end_scene, handle_interact, handle_start_playthrough,
};
use loopwalk_playthrough::domain::aggregates::{InFlightAction, Playthrough};
use loopwalk_playthrough::domain::commands::{EndScene, Interact, StartPlaythrough};
use loopwalk_playthrough::domain::events::{PlaythroughEvent, PlaythroughEventKind, Resolution};
use loopwalk_playthrough::domain::phase::{Interaction, Phase};
use loopwalk_playthrough::domain::scoring::Scores;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::keymap::{HostCommand, map_key};
use crate::state::AppState;

/// Whether the host keeps reading keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Read the next key.
    Continue,
    /// Leave the host.
    Quit,
}

/// Collects load progress as printable lines.
#[derive(Debug, Default)]
struct ProgressLines(Mutex<Vec<String>>);

impl ProgressLines {
    fn take(&self) -> Vec<String> {
        std::mem::take(&mut *self.0.lock().unwrap_or_else(PoisonError::into_inner))
    }
}

impl LoadObserver for ProgressLines {
    fn on_progress(&self, progress: LoadProgress) {
        self.0
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(format!(
                "   loading {:>3}% [{}/{}]",
                progress.percent(),
                progress.loaded,
                progress.total
            ));
    }
}

/// Drives one playthrough at a time from key presses.
pub struct Host {
    state: AppState,
    playthrough: Option<Playthrough>,
}

impl Host {
    /// Creates a host with no playthrough running.
    #[must_use]
    pub fn new(state: AppState) -> Self {
        Self {
            state,
            playthrough: None,
        }
    }

    /// Returns the running playthrough, if any.
    #[must_use]
    pub fn playthrough(&self) -> Option<&Playthrough> {
        self.playthrough.as_ref()
    }

    /// Starts a fresh playthrough, replacing any running one.
    pub async fn start(&mut self) -> Vec<String> {
        let command = StartPlaythrough {
            correlation_id: Uuid::new_v4(),
            playthrough_id: Uuid::new_v4(),
        };
        info!(playthrough_id = %command.playthrough_id, "starting playthrough");

        let progress = ProgressLines::default();
        let outcome = handle_start_playthrough(
            &command,
            Arc::clone(&self.state.catalog),
            self.state.clock.as_ref(),
            self.state.preloader.as_ref(),
            &progress,
        )
        .await;

        let mut lines = progress.take();
        match outcome {
            Ok((playthrough, result)) => {
                self.playthrough = Some(playthrough);
                lines.extend(self.render(&result));
            }
            Err(err) => {
                self.playthrough = None;
                lines.extend(report(&err));
            }
        }
        lines
    }

    /// Handles one key press and returns what to print.
    pub async fn press(&mut self, key: &str) -> (Flow, Vec<String>) {
        let phase = self
            .playthrough
            .as_ref()
            .map_or(Phase::Loading, Playthrough::phase);
        let chain_in_flight = self
            .playthrough
            .as_ref()
            .and_then(Playthrough::in_flight)
            .is_some_and(InFlightAction::is_chain);

        let Some(command) = map_key(key, phase, chain_in_flight) else {
            debug!(key, %phase, "unmapped key");
            return (Flow::Continue, Vec::new());
        };

        let lines = match command {
            HostCommand::Quit => return (Flow::Quit, Vec::new()),
            HostCommand::Restart => self.start().await,
            HostCommand::Interact(interaction) => self.interact(interaction),
            HostCommand::EndScene => self.end_scene().await,
        };
        (Flow::Continue, lines)
    }

    /// Returns a hint listing the keys that mean something right now.
    #[must_use]
    pub fn prompt(&self) -> String {
        let Some(playthrough) = &self.playthrough else {
            return "[r] restart  [q] quit".to_owned();
        };
        let chain = playthrough.in_flight().is_some_and(InFlightAction::is_chain);
        let phase = playthrough.phase();
        let keys = match phase {
            Phase::Idle => "[w] walk  [a] left  [d] right  ",
            Phase::Action | Phase::Chain if chain => "[w/space] push on  [t] give up  ",
            Phase::Action => "[w] first answer  [s] second answer  [t] let it pass  ",
            Phase::Ended => "[r] play again  ",
            Phase::Loading => "[r] restart  ",
            _ => "",
        };
        format!("{phase}: {keys}[.] scene ends  [q] quit")
    }

    fn interact(&mut self, interaction: Interaction) -> Vec<String> {
        let Some(playthrough) = self.playthrough.as_mut() else {
            return vec!["no playthrough running, press r".to_owned()];
        };
        let command = Interact {
            correlation_id: Uuid::new_v4(),
            interaction,
        };
        match handle_interact(&command, playthrough, self.state.clock.as_ref()) {
            Ok(result) => self.render(&result),
            Err(err) => report(&err),
        }
    }

    async fn end_scene(&mut self) -> Vec<String> {
        let Some(playthrough) = self.playthrough.as_mut() else {
            return vec!["no playthrough running, press r".to_owned()];
        };
        let Some(token) = playthrough.active_scene().map(|scene| scene.token) else {
            return vec!["no scene is playing".to_owned()];
        };

        let command = EndScene {
            correlation_id: Uuid::new_v4(),
            token,
        };
        let progress = ProgressLines::default();
        let outcome = handle_end_scene(
            &command,
            playthrough,
            self.state.clock.as_ref(),
            self.state.preloader.as_ref(),
            &progress,
        )
        .await;

        let mut lines = progress.take();
        match outcome {
            Ok(result) => lines.extend(self.render(&result)),
            Err(err) => lines.extend(report(&err)),
        }
        lines
    }

    fn render(&self, result: &PlaythroughCommandResult) -> Vec<String> {
        let mut lines = Vec::new();
        if let Some(preload) = result.preload.as_ref().filter(|p| !p.is_complete()) {
            lines.push(format!(
                "   {} of {} scenes will stream live",
                preload.unavailable.len(),
                preload.unavailable.len() + preload.ready.len()
            ));
        }

        for event in &result.events {
            emit(event);
            match &event.kind {
                PlaythroughEventKind::LocationEntered(entered) => lines.push(format!(
                    "== location {}: {} actions ==",
                    entered.location, entered.total_actions
                )),
                PlaythroughEventKind::SceneRequested(requested) => {
                    let playback = match self.state.preloader.resolve(&requested.scene) {
                        Playback::Cached(bytes) => format!("cached, {} bytes", bytes.len()),
                        Playback::Live(location) => format!("live: {location}"),
                    };
                    let looping = if requested.looping { " loop" } else { "" };
                    lines.push(format!(
                        "> {} {}{looping} ({playback})",
                        requested.scene, requested.token
                    ));
                }
                PlaythroughEventKind::PhaseChanged(changed) => {
                    lines.push(format!("   phase {} -> {}", changed.from, changed.to));
                }
                PlaythroughEventKind::ActionDispatched(_) => {}
                PlaythroughEventKind::ActionResolved(resolved) => lines.push(format!(
                    "   {}{} {} ({}/{})",
                    resolved.side,
                    resolved.action_id,
                    resolution_label(resolved.resolution),
                    resolved.completed_actions,
                    resolved.total_actions
                )),
                PlaythroughEventKind::ScoreChanged(changed) => {
                    lines.push(format!("   score {}", score_line(&changed.scores)));
                }
                PlaythroughEventKind::LocationCompleted(completed) => {
                    lines.push(format!("== location {} complete ==", completed.location));
                }
                PlaythroughEventKind::PlaythroughEnded(ended) => {
                    lines.push(String::new());
                    lines.push(format!("*** {} ***", ended.ending.title()));
                    lines.push(ended.ending.closing_text().to_owned());
                    lines.push(format!("final score {}", score_line(&ended.scores)));
                }
            }
        }
        lines
    }
}

/// Writes `event` to the log as a single JSON record.
fn emit(event: &PlaythroughEvent) {
    let record = EventRecord::from_event(event);
    match serde_json::to_string(&record) {
        Ok(line) => info!(
            target: "loopwalk::events",
            event_type = %record.event_type,
            sequence_number = record.sequence_number,
            record = %line,
            "domain event"
        ),
        Err(err) => warn!(event_type = %record.event_type, error = %err, "event record not serializable"),
    }
}

fn report(err: &DomainError) -> Vec<String> {
    error!(error = %err, fatal = err.is_fatal(), "command failed");
    if err.is_fatal() {
        vec![format!("error: {err}"), "press r to restart".to_owned()]
    } else {
        vec![format!("error: {err}")]
    }
}

fn resolution_label(resolution: Resolution) -> &'static str {
    match resolution {
        Resolution::ChoseA => "chose A",
        Resolution::ChoseB => "chose B",
        Resolution::TimedOut => "timed out",
        Resolution::ChainCompleted => "chain completed",
        Resolution::ChainStopped => "chain stopped",
    }
}

fn score_line(scores: &Scores) -> String {
    format!(
        "A {} | B {} | avoidant {}",
        scores.axis_a, scores.axis_b, scores.axis_avoidant
    )
}
