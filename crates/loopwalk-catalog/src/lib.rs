//! Loopwalk — Location Catalog bounded context.
//!
//! Static, ordered definitions of every location ("gang"): the keyword and
//! action queue of each side, optional cross-side prerequisites, and the
//! naming scheme that turns a scene description into an asset identifier.

pub mod application;
pub mod domain;
