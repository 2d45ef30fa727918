//! Command handlers for the Playthrough context.
//!
//! This module contains application-level command handler functions that
//! orchestrate domain logic: apply the command to the playthrough, make the
//! assets of an upcoming location ready, and hand the recorded events back to
//! the host.

use std::sync::Arc;

use loopwalk_catalog::domain::catalog::Catalog;
use loopwalk_core::assets::{AssetPreloader, LoadObserver, PreloadReport};
use loopwalk_core::clock::Clock;
use loopwalk_core::command::Command;
use loopwalk_core::error::DomainError;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::domain::aggregates::{Playthrough, SceneOutcome};
use crate::domain::commands::{EndScene, Interact, StartPlaythrough};
use crate::domain::events::PlaythroughEvent;

/// Result of a successfully handled command.
#[derive(Debug)]
pub struct PlaythroughCommandResult {
    /// The playthrough affected by the command.
    pub playthrough_id: Uuid,
    /// The events produced, in order.
    pub events: Vec<PlaythroughEvent>,
    /// Preload outcome, when the command loaded a location.
    pub preload: Option<PreloadReport>,
}

fn drain(playthrough: &mut Playthrough, preload: Option<PreloadReport>) -> PlaythroughCommandResult {
    PlaythroughCommandResult {
        playthrough_id: playthrough.id,
        events: playthrough.take_uncommitted_events(),
        preload,
    }
}

/// Makes every scene of the location being loaded ready, then enters it.
async fn load_location(
    playthrough: &mut Playthrough,
    correlation_id: Uuid,
    clock: &dyn Clock,
    assets: &dyn AssetPreloader,
    observer: &dyn LoadObserver,
) -> Result<PreloadReport, DomainError> {
    let location = playthrough.location();
    let scenes = playthrough.catalog().scenes_for(location)?;
    let report = assets.ensure_ready(&scenes, observer).await?;
    if !report.is_complete() {
        warn!(
            %location,
            unavailable = report.unavailable.len(),
            "entering location with scenes left to live playback"
        );
    }

    playthrough.enter_location(correlation_id, clock)?;
    Ok(report)
}

/// Handles the `StartPlaythrough` command: creates a playthrough of
/// `catalog`, preloads its first location and enters it.
///
/// # Errors
///
/// Returns `DomainError` if the preloader fails as a whole or the first
/// location cannot be entered.
#[instrument(skip_all, fields(playthrough_id = %command.playthrough_id))]
pub async fn handle_start_playthrough(
    command: &StartPlaythrough,
    catalog: Arc<Catalog>,
    clock: &dyn Clock,
    assets: &dyn AssetPreloader,
    observer: &dyn LoadObserver,
) -> Result<(Playthrough, PlaythroughCommandResult), DomainError> {
    info!(
        correlation_id = %command.correlation_id(),
        command_type = command.command_type(),
        "handling start playthrough command"
    );

    let mut playthrough = Playthrough::new(command.playthrough_id, catalog);
    let report = load_location(
        &mut playthrough,
        command.correlation_id,
        clock,
        assets,
        observer,
    )
    .await?;

    let result = drain(&mut playthrough, Some(report));
    Ok((playthrough, result))
}

/// Handles the `Interact` command.
///
/// # Errors
///
/// Returns `DomainError` if the active location is missing from the catalog.
#[instrument(skip_all, fields(playthrough_id = %playthrough.id))]
pub fn handle_interact(
    command: &Interact,
    playthrough: &mut Playthrough,
    clock: &dyn Clock,
) -> Result<PlaythroughCommandResult, DomainError> {
    info!(
        correlation_id = %command.correlation_id(),
        command_type = command.command_type(),
        interaction = ?command.interaction,
        "handling interact command"
    );

    playthrough.interact(command.interaction, command.correlation_id, clock)?;
    Ok(drain(playthrough, None))
}

/// Handles the `EndScene` command. When the finale of a location ends and
/// another location follows, its assets are made ready and it is entered
/// before returning.
///
/// # Errors
///
/// Returns `DomainError` if the next location cannot be preloaded or
/// entered; the playthrough then stays in the loading phase.
#[instrument(skip_all, fields(playthrough_id = %playthrough.id))]
pub async fn handle_end_scene(
    command: &EndScene,
    playthrough: &mut Playthrough,
    clock: &dyn Clock,
    assets: &dyn AssetPreloader,
    observer: &dyn LoadObserver,
) -> Result<PlaythroughCommandResult, DomainError> {
    info!(
        correlation_id = %command.correlation_id(),
        command_type = command.command_type(),
        token = %command.token,
        "handling end scene command"
    );

    let outcome = playthrough.end_scene(command.token, command.correlation_id, clock)?;
    let preload = match outcome {
        SceneOutcome::LoadLocation(next) => {
            info!(location = %next, "loading next location");
            Some(load_location(playthrough, command.correlation_id, clock, assets, observer).await?)
        }
        SceneOutcome::Ended(ending) => {
            info!(ending = ending.title(), "playthrough ended");
            None
        }
        SceneOutcome::Stale | SceneOutcome::Continued => None,
    };

    Ok(drain(playthrough, preload))
}
