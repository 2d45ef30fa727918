//! Loopwalk — Playthrough bounded context.
//!
//! Responsible for the per-location action queues, the action/chain state
//! machine, score accumulation, progression between locations and the
//! choice of ending.

pub mod application;
pub mod domain;
