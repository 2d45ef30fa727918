//! Loopwalk — scene asset store.
//!
//! Asset sources fetch the raw bytes of a scene from a directory or an HTTP
//! server; the caching preloader makes a whole location's scenes ready ahead
//! of play and resolves each scene to cached bytes or a live location.

pub mod caching_preloader;
pub mod directory_source;
pub mod http_source;
pub mod source;
