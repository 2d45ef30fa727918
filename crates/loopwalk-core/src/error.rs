//! Domain error types.

use thiserror::Error;

/// Top-level domain error type.
#[derive(Debug, Error)]
pub enum DomainError {
    /// The catalog has no location with this number.
    #[error("unknown location: {0}")]
    UnknownLocation(u32),

    /// An action was dispatched from a side whose queue is already drained.
    #[error("action queue is empty on side {side}")]
    QueueEmpty {
        /// The side that was dispatched from.
        side: &'static str,
    },

    /// A single asset could not be fetched.
    #[error("asset {scene} unavailable: {reason}")]
    AssetUnavailable {
        /// The scene whose asset failed.
        scene: String,
        /// Why the fetch failed.
        reason: String,
    },

    /// A catalog document failed to parse or validate.
    #[error("invalid catalog: {0}")]
    InvalidCatalog(String),

    /// An infrastructure/transport error.
    #[error("infrastructure error: {0}")]
    Infrastructure(String),
}

impl DomainError {
    /// Returns `true` for errors that end the current playthrough.
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::UnknownLocation(_) | Self::InvalidCatalog(_) | Self::Infrastructure(_)
        )
    }
}
