//! Shared test mocks and utilities for the Loopwalk engine.

mod assets;
mod clock;

pub use assets::{FailingPreloader, InstantPreloader, RecordingObserver};
pub use clock::FixedClock;
