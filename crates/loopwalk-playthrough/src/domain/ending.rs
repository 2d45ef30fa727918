//! Ending resolution.

use serde::{Deserialize, Serialize};

use super::scoring::Scores;

/// The four narrative outcomes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EndingKind {
    /// Direct confrontation dominated.
    AxisA,
    /// Empathy dominated.
    AxisB,
    /// Avoidance dominated or won the tie-break.
    Avoidant,
    /// No clear tendency.
    Mixed,
}

/// Maps final scores to an ending.
///
/// Rules, first match wins:
/// 1. a single axis strictly above both others takes its ending;
/// 2. `A == B` with `A > 2` is `Mixed`;
/// 3. a non-zero avoidant counter equal to `A` is `Avoidant`;
/// 4. anything else is `Mixed`.
#[must_use]
pub fn resolve(scores: &Scores) -> EndingKind {
    let Scores {
        axis_a: a,
        axis_b: b,
        axis_avoidant: avoidant,
    } = *scores;

    if a > b && a > avoidant {
        return EndingKind::AxisA;
    }
    if b > a && b > avoidant {
        return EndingKind::AxisB;
    }
    if avoidant > a && avoidant > b {
        return EndingKind::Avoidant;
    }
    if a == b && a > 2 {
        return EndingKind::Mixed;
    }
    if avoidant > 0 && avoidant == a {
        return EndingKind::Avoidant;
    }
    EndingKind::Mixed
}

impl EndingKind {
    /// Short label of the ending.
    #[must_use]
    pub fn title(self) -> &'static str {
        match self {
            Self::AxisA => "The Doubter",
            Self::AxisB => "The Feeler",
            Self::Avoidant => "The Shadow",
            Self::Mixed => "The Lost One",
        }
    }

    /// Closing text shown once the playthrough ends.
    #[must_use]
    pub fn closing_text(self) -> &'static str {
        match self {
            Self::AxisA => {
                "You are the Doubter.\n\n\
                 Time was never a river to you, only a riddle. You looked behind every door, \
                 not out of hope but out of distrust, and saw the decay before it began.\n\n\
                 Whoever stares only at the cracks forgets the house they hold together. \
                 You are not trapped in the loop; you analysed it until it swallowed you.\n\n\
                 Your heart beats to a clock that runs backwards."
            }
            Self::AxisB => {
                "You are the Feeler.\n\n\
                 In the echoing halls you heard voices, not noise. You tried to understand, \
                 to connect where others saw only walls, and carried the strain for them.\n\n\
                 Compassion inside a time loop is a heavy load. You waited, listened, hoped, \
                 and forgot yourself while saving the ghosts of the past.\n\n\
                 Your rhythm is a heartbeat fighting the silence."
            }
            Self::Avoidant => {
                "You are the Shadow.\n\n\
                 You did not walk, you drifted. Always at the edge, never at the centre, \
                 waiting for time to unravel by itself. But the loop is patient.\n\n\
                 You thought that if you kept still, the decay could not find you. \
                 Standing still is the fastest death. You are a ghost in your own story.\n\n\
                 You are waiting for a sign, but the typewriter has run out of ribbon."
            }
            Self::Mixed => {
                "You are the Lost One.\n\n\
                 One step forward, two steps back. Sometimes you doubted, sometimes you felt, \
                 sometimes you said nothing. Time did not define you; it tore you apart.\n\n\
                 You are the static between stations, a fragment in the loop. \
                 You found no rhythm, only noise.\n\n\
                 Try again. Perhaps next time you will find a melody."
            }
        }
    }
}
