//! Application layer for the Playthrough context.

pub mod command_handlers;
pub mod query_handlers;
