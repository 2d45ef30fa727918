//! Score accumulation.

use serde::{Deserialize, Serialize};

/// One of the three personality axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Axis {
    /// Direct confrontation; credited by choice A.
    A,
    /// Empathy; credited by choice B.
    B,
    /// Avoidance; credited when a simple action times out.
    Avoidant,
}

/// Immutable copy of the three counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scores {
    /// Direct-confrontation counter.
    pub axis_a: u32,
    /// Empathic counter.
    pub axis_b: u32,
    /// Avoidant counter.
    pub axis_avoidant: u32,
}

impl Scores {
    /// Returns the counter of `axis`.
    #[must_use]
    pub fn get(&self, axis: Axis) -> u32 {
        match axis {
            Axis::A => self.axis_a,
            Axis::B => self.axis_b,
            Axis::Avoidant => self.axis_avoidant,
        }
    }
}

/// Running counters for one playthrough. Counters only ever go up.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScoreLedger {
    scores: Scores,
}

impl ScoreLedger {
    /// Creates a ledger with every counter at zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one point to `axis`.
    pub fn increment(&mut self, axis: Axis) {
        let counter = match axis {
            Axis::A => &mut self.scores.axis_a,
            Axis::B => &mut self.scores.axis_b,
            Axis::Avoidant => &mut self.scores.axis_avoidant,
        };
        *counter = counter.saturating_add(1);
    }

    /// Returns a copy of the counters.
    #[must_use]
    pub fn snapshot(&self) -> Scores {
        self.scores
    }
}
