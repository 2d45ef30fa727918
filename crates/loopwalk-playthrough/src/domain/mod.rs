//! Domain layer for the Playthrough context.

pub mod aggregates;
pub mod commands;
pub mod ending;
pub mod events;
pub mod phase;
pub mod progression;
pub mod queues;
pub mod scoring;
