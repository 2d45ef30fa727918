//! Commands sent to an aggregate by the host.

use uuid::Uuid;

/// A request to change a playthrough.
pub trait Command: Send + Sync + std::fmt::Debug {
    /// Dotted name, logged with every handled command.
    fn command_type(&self) -> &'static str;

    /// Correlation ID stamped on every event the command produces.
    fn correlation_id(&self) -> Uuid;
}
