//! Aggregate roots for the Playthrough context.

use std::sync::Arc;

use loopwalk_catalog::domain::catalog::Catalog;
use loopwalk_catalog::domain::location::{ActionSpec, LocationId, RequiredState, Side};
use loopwalk_catalog::domain::naming::{ChainStep, Choice, Scene};
use loopwalk_core::clock::Clock;
use loopwalk_core::error::DomainError;
use loopwalk_core::event::EventMetadata;
use loopwalk_core::scene::SceneId;
use serde::Serialize;
use tracing::debug;
use uuid::Uuid;

use super::ending::{self, EndingKind};
use super::events::{
    ActionDispatched, ActionResolved, LocationCompleted, LocationEntered, PhaseChanged,
    PlaythroughEnded, PlaythroughEvent, PlaythroughEventKind, Resolution, SceneRequested,
    SceneToken, ScoreChanged,
};
use super::phase::{Interaction, Phase};
use super::progression::{self, Advance, Progression};
use super::queues::ActionQueues;
use super::scoring::{ScoreLedger, Scores};

/// The action currently being played out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InFlightAction {
    /// The side it was dispatched from.
    pub side: Side,
    /// The action identifier.
    pub action_id: String,
    /// The side's keyword at dispatch time.
    pub keyword: String,
    /// Required advances, for chain actions.
    pub chain_depth: Option<u32>,
    /// Advances accumulated so far.
    pub chain_steps: Vec<ChainStep>,
}

impl InFlightAction {
    /// Returns `true` for chain actions.
    #[must_use]
    pub fn is_chain(&self) -> bool {
        self.chain_depth.is_some()
    }

    fn chain_reached_depth(&self) -> bool {
        self.chain_depth
            .is_some_and(|depth| self.chain_steps.len() >= depth as usize)
    }

    fn scene(&self) -> Scene<'_> {
        Scene::Action {
            keyword: &self.keyword,
            side: self.side,
            action_id: &self.action_id,
            chain_steps: &self.chain_steps,
        }
    }

    fn reaction(&self, choice: Choice) -> Scene<'_> {
        Scene::Reaction {
            keyword: &self.keyword,
            side: self.side,
            action_id: &self.action_id,
            choice,
        }
    }
}

/// The scene the host is expected to be playing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActiveScene {
    /// Token of the request.
    pub token: SceneToken,
    /// The scene requested.
    pub scene: SceneId,
    /// Whether the scene loops.
    pub looping: bool,
}

/// What an ended scene led to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneOutcome {
    /// The token did not match the active scene; nothing changed.
    Stale,
    /// The playthrough moved on (or the end was ignored in the current phase).
    Continued,
    /// The next location must be loaded before play resumes.
    LoadLocation(LocationId),
    /// The playthrough ended.
    Ended(EndingKind),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    Loading,
    Idle,
    Walking,
    NoAction,
    Awaiting,
    Reacting,
    ChainCompleting,
    Returning,
    Finale,
    Ended(EndingKind),
}

#[derive(Clone, Copy)]
struct Cause<'a> {
    correlation_id: Uuid,
    clock: &'a dyn Clock,
}

/// The aggregate root for one playthrough of a catalog.
#[derive(Debug)]
pub struct Playthrough {
    /// Aggregate identifier.
    pub id: Uuid,
    catalog: Arc<Catalog>,
    location: LocationId,
    queues: ActionQueues,
    stage: Stage,
    last_phase: Phase,
    in_flight: Option<InFlightAction>,
    ledger: ScoreLedger,
    active_scene: Option<ActiveScene>,
    last_token: u64,
    sequence: i64,
    /// Events not yet handed to the host.
    uncommitted_events: Vec<PlaythroughEvent>,
}

impl Playthrough {
    /// Creates a playthrough waiting to load the catalog's first location.
    #[must_use]
    pub fn new(id: Uuid, catalog: Arc<Catalog>) -> Self {
        let location = catalog.first();
        Self {
            id,
            catalog,
            location,
            queues: ActionQueues::new(),
            stage: Stage::Loading,
            last_phase: Phase::Loading,
            in_flight: None,
            ledger: ScoreLedger::new(),
            active_scene: None,
            last_token: 0,
            sequence: 0,
            uncommitted_events: Vec::new(),
        }
    }

    /// Returns the catalog being played.
    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Returns the active location, or the one being loaded.
    #[must_use]
    pub fn location(&self) -> LocationId {
        self.location
    }

    /// Returns the visible phase.
    #[must_use]
    pub fn phase(&self) -> Phase {
        match self.stage {
            Stage::Loading => Phase::Loading,
            Stage::Idle => Phase::Idle,
            Stage::Walking | Stage::Returning => Phase::Transit,
            Stage::NoAction => Phase::NoAction,
            Stage::Awaiting => {
                if self
                    .in_flight
                    .as_ref()
                    .is_some_and(|action| !action.chain_steps.is_empty())
                {
                    Phase::Chain
                } else {
                    Phase::Action
                }
            }
            Stage::Reacting => Phase::Reaction,
            Stage::ChainCompleting => Phase::Chain,
            Stage::Finale => Phase::LocationComplete,
            Stage::Ended(_) => Phase::Ended,
        }
    }

    /// Returns the queues of the active location.
    #[must_use]
    pub fn queues(&self) -> &ActionQueues {
        &self.queues
    }

    /// Returns the current scores.
    #[must_use]
    pub fn scores(&self) -> Scores {
        self.ledger.snapshot()
    }

    /// Returns the action being played out, if any.
    #[must_use]
    pub fn in_flight(&self) -> Option<&InFlightAction> {
        self.in_flight.as_ref()
    }

    /// Returns the scene the host should be playing, if any.
    #[must_use]
    pub fn active_scene(&self) -> Option<&ActiveScene> {
        self.active_scene.as_ref()
    }

    /// Returns the ending once the playthrough is over.
    #[must_use]
    pub fn ending(&self) -> Option<EndingKind> {
        match self.stage {
            Stage::Ended(ending) => Some(ending),
            _ => None,
        }
    }

    /// Returns the events produced since the last drain.
    #[must_use]
    pub fn uncommitted_events(&self) -> &[PlaythroughEvent] {
        &self.uncommitted_events
    }

    /// Removes and returns the events produced since the last drain.
    pub fn take_uncommitted_events(&mut self) -> Vec<PlaythroughEvent> {
        std::mem::take(&mut self.uncommitted_events)
    }

    /// Enters the location being loaded: fills its queues and starts the
    /// idle loop. Does nothing outside the loading phase.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::UnknownLocation` if the catalog has no such
    /// location; the playthrough stays in the loading phase.
    pub fn enter_location(
        &mut self,
        correlation_id: Uuid,
        clock: &dyn Clock,
    ) -> Result<(), DomainError> {
        if self.stage != Stage::Loading {
            debug!(phase = %self.phase(), "enter_location ignored outside loading");
            return Ok(());
        }
        let cause = Cause {
            correlation_id,
            clock,
        };

        self.queues.initialize(&self.catalog, self.location)?;
        self.record(
            PlaythroughEventKind::LocationEntered(LocationEntered {
                playthrough_id: self.id,
                location: self.location,
                total_actions: self.queues.total_actions(),
            }),
            cause,
        );
        self.enter_idle(cause);
        Ok(())
    }

    /// Applies a player input. Inputs that do not fit the current phase are
    /// ignored.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::UnknownLocation` if the active location vanished
    /// from the catalog, or `DomainError::QueueEmpty` if a dispatch raced an
    /// empty queue.
    pub fn interact(
        &mut self,
        interaction: Interaction,
        correlation_id: Uuid,
        clock: &dyn Clock,
    ) -> Result<(), DomainError> {
        let cause = Cause {
            correlation_id,
            clock,
        };
        let is_chain = self.in_flight.as_ref().map(InFlightAction::is_chain);

        match (self.stage, interaction, is_chain) {
            (Stage::Idle, Interaction::Walk, _) => {
                self.stage = Stage::Walking;
                self.request(&Scene::Walk, false, cause);
            }
            (Stage::Idle, Interaction::Left, _) => self.approach(Side::Left, cause)?,
            (Stage::Idle, Interaction::Right, _) => self.approach(Side::Right, cause)?,
            (Stage::Awaiting, Interaction::ChoiceA, Some(false)) => self.choose(Choice::A, cause),
            (Stage::Awaiting, Interaction::ChoiceB, Some(false)) => self.choose(Choice::B, cause),
            (Stage::Awaiting, Interaction::ChainAdvance, Some(true)) => self.advance_chain(cause),
            (Stage::Awaiting, Interaction::Timeout, _) => self.time_out(cause),
            (stage, interaction, _) => {
                debug!(?stage, ?interaction, "interaction ignored in current phase");
                return Ok(());
            }
        }

        self.sync_phase(cause);
        Ok(())
    }

    /// Handles the host's notice that the scene with `token` finished.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::UnknownLocation` if the active location vanished
    /// from the catalog.
    pub fn end_scene(
        &mut self,
        token: SceneToken,
        correlation_id: Uuid,
        clock: &dyn Clock,
    ) -> Result<SceneOutcome, DomainError> {
        if self.active_scene.as_ref().map(|scene| scene.token) != Some(token) {
            debug!(%token, "stale scene end ignored");
            return Ok(SceneOutcome::Stale);
        }
        let cause = Cause {
            correlation_id,
            clock,
        };

        let outcome = match self.stage {
            Stage::Loading | Stage::Idle | Stage::Ended(_) => SceneOutcome::Continued,
            Stage::Walking | Stage::NoAction => {
                self.enter_idle(cause);
                SceneOutcome::Continued
            }
            Stage::Awaiting => {
                self.time_out(cause);
                SceneOutcome::Continued
            }
            Stage::Reacting => {
                self.start_return(cause);
                SceneOutcome::Continued
            }
            Stage::ChainCompleting => {
                self.resolve(Resolution::ChainCompleted, cause);
                self.start_return(cause);
                SceneOutcome::Continued
            }
            Stage::Returning => {
                match progression::check(&self.queues) {
                    Progression::LocationComplete => {
                        self.stage = Stage::Finale;
                        self.record(
                            PlaythroughEventKind::LocationCompleted(LocationCompleted {
                                location: self.location,
                            }),
                            cause,
                        );
                        self.request(&Scene::Finale, false, cause);
                    }
                    Progression::ReturnToIdle => self.enter_idle(cause),
                }
                SceneOutcome::Continued
            }
            Stage::Finale => {
                self.active_scene = None;
                match progression::advance(&self.catalog, self.location) {
                    Advance::Enter(next) => {
                        self.location = next;
                        self.stage = Stage::Loading;
                        SceneOutcome::LoadLocation(next)
                    }
                    Advance::EndOfContent => {
                        let scores = self.ledger.snapshot();
                        let ending = ending::resolve(&scores);
                        self.stage = Stage::Ended(ending);
                        self.record(
                            PlaythroughEventKind::PlaythroughEnded(PlaythroughEnded {
                                ending,
                                scores,
                            }),
                            cause,
                        );
                        SceneOutcome::Ended(ending)
                    }
                }
            }
        };

        self.sync_phase(cause);
        Ok(outcome)
    }

    fn approach(&mut self, side: Side, cause: Cause<'_>) -> Result<(), DomainError> {
        let catalog = Arc::clone(&self.catalog);
        let definition = catalog.get(self.location)?.side(side);

        if let Some(prerequisite) = &definition.prerequisite {
            let satisfied = match prerequisite.required_state {
                RequiredState::Empty => self.queues.is_empty(prerequisite.depends_on),
            };
            if !satisfied {
                self.stage = Stage::NoAction;
                self.request(
                    &Scene::Fallback {
                        suffix: &prerequisite.fallback,
                    },
                    false,
                    cause,
                );
                return Ok(());
            }
        }

        if self.queues.is_empty(side) {
            self.stage = Stage::NoAction;
            self.request(
                &Scene::Empty {
                    keyword: &definition.keyword,
                    side,
                },
                false,
                cause,
            );
            return Ok(());
        }

        let spec = self.queues.dispatch(side)?;
        let action = InFlightAction {
            side,
            action_id: spec.id().to_owned(),
            keyword: definition.keyword.clone(),
            chain_depth: spec.chain_depth(),
            chain_steps: Vec::new(),
        };
        self.record(
            PlaythroughEventKind::ActionDispatched(ActionDispatched {
                side,
                action_id: action.action_id.clone(),
                chain_depth: action.chain_depth,
            }),
            cause,
        );
        debug!(
            %side,
            action_id = %action.action_id,
            chain = matches!(spec, ActionSpec::Chain { .. }),
            "action dispatched"
        );

        let scene = self.catalog.scene_id(self.location, &action.scene());
        self.in_flight = Some(action);
        self.stage = Stage::Awaiting;
        self.play(scene, false, cause);
        Ok(())
    }

    fn choose(&mut self, choice: Choice, cause: Cause<'_>) {
        let resolution = match choice {
            Choice::A => Resolution::ChoseA,
            Choice::B => Resolution::ChoseB,
        };
        self.resolve(resolution, cause);

        let Some(action) = self.in_flight.as_ref() else {
            return;
        };
        let scene = self.catalog.scene_id(self.location, &action.reaction(choice));
        self.stage = Stage::Reacting;
        self.play(scene, false, cause);
    }

    fn advance_chain(&mut self, cause: Cause<'_>) {
        let Some(action) = self.in_flight.as_mut() else {
            return;
        };
        action.chain_steps.push(ChainStep::Advance);
        let completing = action.chain_reached_depth();

        let scene = self.catalog.scene_id(self.location, &action.scene());
        self.stage = if completing {
            Stage::ChainCompleting
        } else {
            Stage::Awaiting
        };
        self.play(scene, false, cause);
    }

    fn time_out(&mut self, cause: Cause<'_>) {
        let resolution = if self.in_flight.as_ref().is_some_and(InFlightAction::is_chain) {
            Resolution::ChainStopped
        } else {
            Resolution::TimedOut
        };
        self.resolve(resolution, cause);
        self.start_return(cause);
    }

    fn resolve(&mut self, resolution: Resolution, cause: Cause<'_>) {
        let Some(action) = self.in_flight.as_ref() else {
            return;
        };
        let side = action.side;
        let action_id = action.action_id.clone();

        if let Some(axis) = resolution.axis() {
            self.ledger.increment(axis);
            self.record(
                PlaythroughEventKind::ScoreChanged(ScoreChanged {
                    axis,
                    scores: self.ledger.snapshot(),
                }),
                cause,
            );
        }

        self.queues.record_completion();
        self.record(
            PlaythroughEventKind::ActionResolved(ActionResolved {
                side,
                action_id,
                resolution,
                completed_actions: self.queues.completed_actions(),
                total_actions: self.queues.total_actions(),
            }),
            cause,
        );
    }

    fn enter_idle(&mut self, cause: Cause<'_>) {
        self.in_flight = None;
        self.stage = Stage::Idle;
        self.request(&Scene::Idle, true, cause);
    }

    fn start_return(&mut self, cause: Cause<'_>) {
        self.in_flight = None;
        self.stage = Stage::Returning;
        self.request(&Scene::Walk, false, cause);
    }

    fn request(&mut self, scene: &Scene<'_>, looping: bool, cause: Cause<'_>) {
        let scene = self.catalog.scene_id(self.location, scene);
        self.play(scene, looping, cause);
    }

    fn play(&mut self, scene: SceneId, looping: bool, cause: Cause<'_>) {
        self.last_token += 1;
        let token = SceneToken(self.last_token);
        self.active_scene = Some(ActiveScene {
            token,
            scene: scene.clone(),
            looping,
        });
        self.record(
            PlaythroughEventKind::SceneRequested(SceneRequested {
                token,
                scene,
                looping,
            }),
            cause,
        );
    }

    fn sync_phase(&mut self, cause: Cause<'_>) {
        let phase = self.phase();
        if phase == self.last_phase {
            return;
        }
        let from = std::mem::replace(&mut self.last_phase, phase);
        self.record(
            PlaythroughEventKind::PhaseChanged(PhaseChanged { from, to: phase }),
            cause,
        );
    }

    fn record(&mut self, kind: PlaythroughEventKind, cause: Cause<'_>) {
        // TODO: event_id uses Uuid::new_v4(); thread an id source through
        // `Cause` once events need to be reproducible byte for byte.
        self.sequence += 1;
        let event = PlaythroughEvent {
            metadata: EventMetadata {
                event_id: Uuid::new_v4(),
                event_type: kind.event_type().to_owned(),
                aggregate_id: self.id,
                sequence_number: self.sequence,
                correlation_id: cause.correlation_id,
                causation_id: cause.correlation_id,
                occurred_at: cause.clock.now(),
            },
            kind,
        };
        self.uncommitted_events.push(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use loopwalk_catalog::domain::location::{
        LocationDefinition, Prerequisite, SideDefinition,
    };
    use loopwalk_catalog::domain::naming::SceneNaming;
    use loopwalk_test_support::FixedClock;

    fn clock() -> FixedClock {
        FixedClock(chrono::Utc::now())
    }

    fn corridor_one() -> LocationDefinition {
        LocationDefinition {
            id: LocationId(1),
            left: SideDefinition::new("Call", vec![ActionSpec::simple("1")]),
            right: SideDefinition::new(
                "Call",
                vec![ActionSpec::simple("1"), ActionSpec::simple("2")],
            ),
        }
    }

    fn corridor_two() -> LocationDefinition {
        LocationDefinition {
            id: LocationId(2),
            left: SideDefinition::new("Call", vec![ActionSpec::simple("1"), ActionSpec::simple("2")]),
            right: SideDefinition::new("Door", vec![ActionSpec::chain("1", 2)]).with_prerequisite(
                Prerequisite {
                    depends_on: Side::Left,
                    required_state: RequiredState::Empty,
                    fallback: "DoorRno".to_owned(),
                },
            ),
        }
    }

    fn catalog(locations: Vec<LocationDefinition>) -> Arc<Catalog> {
        Arc::new(Catalog::new(SceneNaming::default(), locations).unwrap())
    }

    fn entered(locations: Vec<LocationDefinition>) -> (Playthrough, FixedClock) {
        let clock = clock();
        let mut playthrough = Playthrough::new(Uuid::new_v4(), catalog(locations));
        playthrough.enter_location(Uuid::new_v4(), &clock).unwrap();
        playthrough.take_uncommitted_events();
        (playthrough, clock)
    }

    fn interact(playthrough: &mut Playthrough, clock: &FixedClock, interaction: Interaction) {
        playthrough
            .interact(interaction, Uuid::new_v4(), clock)
            .unwrap();
    }

    fn finish_scene(playthrough: &mut Playthrough, clock: &FixedClock) -> SceneOutcome {
        let token = playthrough.active_scene().unwrap().token;
        playthrough.end_scene(token, Uuid::new_v4(), clock).unwrap()
    }

    fn active(playthrough: &Playthrough) -> &str {
        playthrough.active_scene().unwrap().scene.as_str()
    }

    fn requested_scenes(events: &[PlaythroughEvent]) -> Vec<String> {
        events
            .iter()
            .filter_map(|event| match &event.kind {
                PlaythroughEventKind::SceneRequested(requested) => {
                    Some(requested.scene.as_str().to_owned())
                }
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_new_playthrough_is_loading_first_location() {
        let playthrough = Playthrough::new(Uuid::new_v4(), catalog(vec![corridor_one()]));

        assert_eq!(playthrough.phase(), Phase::Loading);
        assert_eq!(playthrough.location(), LocationId(1));
        assert!(playthrough.active_scene().is_none());
        assert_eq!(playthrough.scores(), Scores::default());
    }

    #[test]
    fn test_enter_location_starts_idle_loop() {
        // Arrange
        let clock = clock();
        let mut playthrough = Playthrough::new(Uuid::new_v4(), catalog(vec![corridor_one()]));

        // Act
        playthrough.enter_location(Uuid::new_v4(), &clock).unwrap();

        // Assert
        assert_eq!(playthrough.phase(), Phase::Idle);
        let scene = playthrough.active_scene().unwrap();
        assert_eq!(scene.scene.as_str(), "Gang1.mp4");
        assert!(scene.looping);
        let types: Vec<&str> = playthrough
            .uncommitted_events()
            .iter()
            .map(|e| e.metadata.event_type.as_str())
            .collect();
        assert_eq!(
            types,
            vec![
                "playthrough.location_entered",
                "playthrough.scene_requested",
                "playthrough.phase_changed",
            ]
        );
    }

    #[test]
    fn test_event_sequence_numbers_increase() {
        let clock = clock();
        let mut playthrough = Playthrough::new(Uuid::new_v4(), catalog(vec![corridor_one()]));
        playthrough.enter_location(Uuid::new_v4(), &clock).unwrap();
        interact(&mut playthrough, &clock, Interaction::Left);

        let sequence: Vec<i64> = playthrough
            .uncommitted_events()
            .iter()
            .map(|e| e.metadata.sequence_number)
            .collect();

        assert_eq!(sequence, (1..=sequence.len() as i64).collect::<Vec<_>>());
        assert!(
            playthrough
                .uncommitted_events()
                .iter()
                .all(|e| e.metadata.occurred_at == clock.0 && e.metadata.aggregate_id == playthrough.id)
        );
    }

    #[test]
    fn test_walk_returns_to_idle_when_scene_ends() {
        let (mut playthrough, clock) = entered(vec![corridor_one()]);

        interact(&mut playthrough, &clock, Interaction::Walk);
        assert_eq!(playthrough.phase(), Phase::Transit);
        assert_eq!(active(&playthrough), "Gang1Walk.mp4");

        finish_scene(&mut playthrough, &clock);

        assert_eq!(playthrough.phase(), Phase::Idle);
        assert_eq!(active(&playthrough), "Gang1.mp4");
        assert_eq!(playthrough.queues().remaining(Side::Left), 1);
    }

    #[test]
    fn test_choice_a_scores_and_plays_reaction() {
        // Arrange
        let (mut playthrough, clock) = entered(vec![corridor_one()]);

        // Act
        interact(&mut playthrough, &clock, Interaction::Left);
        assert_eq!(playthrough.phase(), Phase::Action);
        assert_eq!(active(&playthrough), "Gang1CallL1.mp4");
        interact(&mut playthrough, &clock, Interaction::ChoiceA);

        // Assert
        assert_eq!(playthrough.phase(), Phase::Reaction);
        assert_eq!(active(&playthrough), "Gang1CallL1A1.mp4");
        assert_eq!(playthrough.scores().axis_a, 1);
        assert_eq!(playthrough.queues().completed_actions(), 1);
    }

    #[test]
    fn test_choice_b_uses_second_reaction() {
        let (mut playthrough, clock) = entered(vec![corridor_one()]);

        interact(&mut playthrough, &clock, Interaction::Right);
        interact(&mut playthrough, &clock, Interaction::ChoiceB);

        assert_eq!(active(&playthrough), "Gang1CallR1A2.mp4");
        assert_eq!(playthrough.scores().axis_b, 1);
    }

    #[test]
    fn test_reaction_walks_back_then_idles() {
        let (mut playthrough, clock) = entered(vec![corridor_one()]);
        interact(&mut playthrough, &clock, Interaction::Right);
        interact(&mut playthrough, &clock, Interaction::ChoiceA);

        finish_scene(&mut playthrough, &clock);
        assert_eq!(playthrough.phase(), Phase::Transit);
        assert_eq!(active(&playthrough), "Gang1Walk.mp4");
        assert!(playthrough.in_flight().is_none());

        finish_scene(&mut playthrough, &clock);
        assert_eq!(playthrough.phase(), Phase::Idle);
        assert_eq!(playthrough.queues().remaining(Side::Right), 1);
    }

    #[test]
    fn test_simple_action_timeout_scores_avoidant() {
        let (mut playthrough, clock) = entered(vec![corridor_one()]);
        interact(&mut playthrough, &clock, Interaction::Left);

        // The action scene running out counts as a timeout.
        finish_scene(&mut playthrough, &clock);

        assert_eq!(playthrough.scores().axis_avoidant, 1);
        assert_eq!(playthrough.phase(), Phase::Transit);
        assert_eq!(active(&playthrough), "Gang1Walk.mp4");
        assert_eq!(playthrough.queues().completed_actions(), 1);
    }

    #[test]
    fn test_dispatched_action_is_never_requeued() {
        let (mut playthrough, clock) = entered(vec![corridor_one()]);

        interact(&mut playthrough, &clock, Interaction::Left);
        interact(&mut playthrough, &clock, Interaction::Timeout);
        finish_scene(&mut playthrough, &clock);
        interact(&mut playthrough, &clock, Interaction::Left);

        assert_eq!(playthrough.phase(), Phase::NoAction);
        assert_eq!(active(&playthrough), "Gang1CallLno.mp4");
        assert_eq!(playthrough.queues().completed_actions(), 1);

        finish_scene(&mut playthrough, &clock);
        assert_eq!(playthrough.phase(), Phase::Idle);
    }

    #[test]
    fn test_unmet_prerequisite_plays_fallback_without_dispatch() {
        // Arrange
        let (mut playthrough, clock) = entered(vec![corridor_two()]);

        // Act
        interact(&mut playthrough, &clock, Interaction::Right);

        // Assert
        assert_eq!(playthrough.phase(), Phase::NoAction);
        assert_eq!(active(&playthrough), "Gang2DoorRno.mp4");
        assert_eq!(playthrough.queues().remaining(Side::Right), 1);
        assert!(playthrough.in_flight().is_none());
        assert!(
            !playthrough
                .uncommitted_events()
                .iter()
                .any(|e| matches!(e.kind, PlaythroughEventKind::ActionDispatched(_)))
        );
    }

    #[test]
    fn test_chain_advances_to_completion_without_scoring() {
        // Arrange
        let (mut playthrough, clock) = entered(vec![corridor_two()]);
        for _ in 0..2 {
            interact(&mut playthrough, &clock, Interaction::Left);
            interact(&mut playthrough, &clock, Interaction::ChoiceA);
            finish_scene(&mut playthrough, &clock);
            finish_scene(&mut playthrough, &clock);
        }
        let before = playthrough.scores();

        // Act
        interact(&mut playthrough, &clock, Interaction::Right);
        assert_eq!(playthrough.phase(), Phase::Action);
        assert_eq!(active(&playthrough), "Gang2DoorR1.mp4");

        interact(&mut playthrough, &clock, Interaction::ChainAdvance);
        assert_eq!(playthrough.phase(), Phase::Chain);
        assert_eq!(active(&playthrough), "Gang2DoorR1A1.mp4");

        interact(&mut playthrough, &clock, Interaction::ChainAdvance);
        assert_eq!(playthrough.phase(), Phase::Chain);
        assert_eq!(active(&playthrough), "Gang2DoorR1A1A1.mp4");

        finish_scene(&mut playthrough, &clock);

        // Assert
        assert_eq!(playthrough.scores(), before);
        assert_eq!(playthrough.queues().completed_actions(), 3);
        assert_eq!(playthrough.phase(), Phase::Transit);
        let resolutions: Vec<Resolution> = playthrough
            .uncommitted_events()
            .iter()
            .filter_map(|e| match &e.kind {
                PlaythroughEventKind::ActionResolved(resolved) => Some(resolved.resolution),
                _ => None,
            })
            .collect();
        assert_eq!(resolutions.last(), Some(&Resolution::ChainCompleted));
    }

    #[test]
    fn test_chain_depth_comes_from_action() {
        // Arrange
        let (mut playthrough, clock) = entered(vec![LocationDefinition {
            id: LocationId(1),
            left: SideDefinition::new("Call", Vec::new()),
            right: SideDefinition::new("Door", vec![ActionSpec::chain("1", 3)]),
        }]);
        interact(&mut playthrough, &clock, Interaction::Right);

        // Act
        interact(&mut playthrough, &clock, Interaction::ChainAdvance);
        assert_eq!(active(&playthrough), "Gang1DoorR1A1.mp4");
        interact(&mut playthrough, &clock, Interaction::ChainAdvance);
        assert_eq!(active(&playthrough), "Gang1DoorR1A1A1.mp4");
        assert_eq!(playthrough.phase(), Phase::Chain);
        assert_eq!(playthrough.in_flight().unwrap().chain_steps.len(), 2);
        assert_eq!(playthrough.queues().completed_actions(), 0);

        interact(&mut playthrough, &clock, Interaction::ChainAdvance);
        assert_eq!(active(&playthrough), "Gang1DoorR1A1A1A1.mp4");
        assert_eq!(playthrough.phase(), Phase::Chain);
        let completion = playthrough.active_scene().unwrap().token;

        interact(&mut playthrough, &clock, Interaction::ChainAdvance);
        assert_eq!(playthrough.active_scene().unwrap().token, completion);

        playthrough.take_uncommitted_events();
        finish_scene(&mut playthrough, &clock);

        // Assert
        assert_eq!(playthrough.queues().completed_actions(), 1);
        assert_eq!(playthrough.scores(), Scores::default());
        assert_eq!(playthrough.phase(), Phase::Transit);
        assert!(
            !playthrough
                .uncommitted_events()
                .iter()
                .any(|e| matches!(e.kind, PlaythroughEventKind::ScoreChanged(_)))
        );
        match playthrough
            .uncommitted_events()
            .iter()
            .find_map(|e| match &e.kind {
                PlaythroughEventKind::ActionResolved(resolved) => Some(resolved),
                _ => None,
            }) {
            Some(resolved) => {
                assert_eq!(resolved.resolution, Resolution::ChainCompleted);
                assert_eq!(resolved.completed_actions, 1);
                assert_eq!(resolved.total_actions, 1);
            }
            other => panic!("expected ActionResolved, got {other:?}"),
        }
    }

    #[test]
    fn test_chain_timeout_stops_without_scoring() {
        let (mut playthrough, clock) = entered(vec![LocationDefinition {
            id: LocationId(3),
            left: SideDefinition::new("Call", Vec::new()),
            right: SideDefinition::new("Door", vec![ActionSpec::chain("1", 2)]),
        }]);

        interact(&mut playthrough, &clock, Interaction::Right);
        interact(&mut playthrough, &clock, Interaction::ChainAdvance);
        finish_scene(&mut playthrough, &clock);

        assert_eq!(playthrough.scores(), Scores::default());
        assert_eq!(playthrough.queues().completed_actions(), 1);
        assert_eq!(active(&playthrough), "Gang3Walk.mp4");
    }

    #[test]
    fn test_choice_on_chain_and_advance_on_simple_are_ignored() {
        let (mut playthrough, clock) = entered(vec![corridor_one()]);
        interact(&mut playthrough, &clock, Interaction::Left);
        playthrough.take_uncommitted_events();

        interact(&mut playthrough, &clock, Interaction::ChainAdvance);

        assert!(playthrough.uncommitted_events().is_empty());
        assert_eq!(playthrough.phase(), Phase::Action);

        let (mut chain, clock) = entered(vec![LocationDefinition {
            id: LocationId(3),
            left: SideDefinition::new("Call", Vec::new()),
            right: SideDefinition::new("Door", vec![ActionSpec::chain("1", 2)]),
        }]);
        interact(&mut chain, &clock, Interaction::Right);
        chain.take_uncommitted_events();

        interact(&mut chain, &clock, Interaction::ChoiceA);

        assert!(chain.uncommitted_events().is_empty());
        assert_eq!(chain.scores(), Scores::default());
    }

    #[test]
    fn test_out_of_phase_interactions_are_ignored() {
        let (mut playthrough, clock) = entered(vec![corridor_one()]);

        interact(&mut playthrough, &clock, Interaction::ChoiceA);
        interact(&mut playthrough, &clock, Interaction::Timeout);
        assert!(playthrough.uncommitted_events().is_empty());

        interact(&mut playthrough, &clock, Interaction::Walk);
        playthrough.take_uncommitted_events();
        interact(&mut playthrough, &clock, Interaction::Left);
        interact(&mut playthrough, &clock, Interaction::Walk);

        assert!(playthrough.uncommitted_events().is_empty());
        assert_eq!(playthrough.phase(), Phase::Transit);
        assert_eq!(playthrough.queues().remaining(Side::Left), 1);
    }

    #[test]
    fn test_stale_scene_end_is_ignored() {
        // Arrange
        let (mut playthrough, clock) = entered(vec![corridor_one()]);
        let idle_token = playthrough.active_scene().unwrap().token;
        interact(&mut playthrough, &clock, Interaction::Left);
        playthrough.take_uncommitted_events();

        // Act
        let outcome = playthrough
            .end_scene(idle_token, Uuid::new_v4(), &clock)
            .unwrap();

        // Assert
        assert_eq!(outcome, SceneOutcome::Stale);
        assert_eq!(playthrough.phase(), Phase::Action);
        assert!(playthrough.uncommitted_events().is_empty());
        assert_eq!(playthrough.scores(), Scores::default());
    }

    #[test]
    fn test_idle_scene_end_keeps_looping() {
        let (mut playthrough, clock) = entered(vec![corridor_one()]);

        let outcome = finish_scene(&mut playthrough, &clock);

        assert_eq!(outcome, SceneOutcome::Continued);
        assert_eq!(playthrough.phase(), Phase::Idle);
        assert!(playthrough.uncommitted_events().is_empty());
    }

    #[test]
    fn test_scene_tokens_strictly_increase() {
        let (mut playthrough, clock) = entered(vec![corridor_one()]);
        interact(&mut playthrough, &clock, Interaction::Left);
        interact(&mut playthrough, &clock, Interaction::ChoiceA);
        finish_scene(&mut playthrough, &clock);

        let tokens: Vec<u64> = playthrough
            .uncommitted_events()
            .iter()
            .filter_map(|e| match &e.kind {
                PlaythroughEventKind::SceneRequested(requested) => Some(requested.token.0),
                _ => None,
            })
            .collect();

        assert_eq!(tokens.len(), 3);
        assert!(tokens.windows(2).all(|pair| pair[0] < pair[1]));
    }

    #[test]
    fn test_draining_location_plays_finale_then_ends() {
        // Arrange
        let (mut playthrough, clock) = entered(vec![LocationDefinition {
            id: LocationId(1),
            left: SideDefinition::new("Call", vec![ActionSpec::simple("1")]),
            right: SideDefinition::new("Call", Vec::new()),
        }]);

        // Act
        interact(&mut playthrough, &clock, Interaction::Left);
        interact(&mut playthrough, &clock, Interaction::ChoiceA);
        finish_scene(&mut playthrough, &clock);
        finish_scene(&mut playthrough, &clock);
        assert_eq!(playthrough.phase(), Phase::LocationComplete);
        assert_eq!(active(&playthrough), "Gang1Finale.mp4");
        assert_eq!(
            playthrough.queues().completed_actions(),
            playthrough.queues().total_actions()
        );
        let outcome = finish_scene(&mut playthrough, &clock);

        // Assert
        assert_eq!(outcome, SceneOutcome::Ended(EndingKind::AxisA));
        assert_eq!(playthrough.phase(), Phase::Ended);
        assert_eq!(playthrough.ending(), Some(EndingKind::AxisA));
        assert!(playthrough.active_scene().is_none());
    }

    #[test]
    fn test_finale_requests_next_location() {
        let (mut playthrough, clock) = entered(vec![
            LocationDefinition {
                id: LocationId(1),
                left: SideDefinition::new("Call", Vec::new()),
                right: SideDefinition::new("Call", vec![ActionSpec::simple("1")]),
            },
            corridor_two(),
        ]);
        interact(&mut playthrough, &clock, Interaction::Right);
        interact(&mut playthrough, &clock, Interaction::Timeout);
        finish_scene(&mut playthrough, &clock);

        let outcome = finish_scene(&mut playthrough, &clock);
        assert_eq!(outcome, SceneOutcome::LoadLocation(LocationId(2)));
        assert_eq!(playthrough.phase(), Phase::Loading);

        playthrough.enter_location(Uuid::new_v4(), &clock).unwrap();
        assert_eq!(playthrough.location(), LocationId(2));
        assert_eq!(active(&playthrough), "Gang2.mp4");
        assert_eq!(playthrough.queues().total_actions(), 3);
        assert_eq!(playthrough.queues().completed_actions(), 0);
        assert_eq!(playthrough.scores().axis_avoidant, 1);
    }

    #[test]
    fn test_phase_changes_are_reported_once_per_change() {
        let (mut playthrough, clock) = entered(vec![corridor_one()]);

        interact(&mut playthrough, &clock, Interaction::Left);
        interact(&mut playthrough, &clock, Interaction::ChoiceB);

        let changes: Vec<(Phase, Phase)> = playthrough
            .uncommitted_events()
            .iter()
            .filter_map(|e| match &e.kind {
                PlaythroughEventKind::PhaseChanged(changed) => Some((changed.from, changed.to)),
                _ => None,
            })
            .collect();
        assert_eq!(
            changes,
            vec![(Phase::Idle, Phase::Action), (Phase::Action, Phase::Reaction)]
        );
        assert_eq!(
            requested_scenes(playthrough.uncommitted_events()),
            vec!["Gang1CallL1.mp4", "Gang1CallL1A2.mp4"]
        );
    }

    #[test]
    fn test_enter_location_outside_loading_is_ignored() {
        let (mut playthrough, clock) = entered(vec![corridor_one()]);
        interact(&mut playthrough, &clock, Interaction::Left);
        playthrough.take_uncommitted_events();

        playthrough.enter_location(Uuid::new_v4(), &clock).unwrap();

        assert!(playthrough.uncommitted_events().is_empty());
        assert_eq!(playthrough.queues().remaining(Side::Left), 0);
    }
}
