use crease_ledger::DeliveryEvent;
use crease_types::{ExtraKind, PlayerId};
use serde::{Deserialize, Serialize};

/// One scorer input against the active innings.
///
/// The tagged form is what match scripts use, e.g.
/// `{ action = "wicket", dismissed = "p3", how = "caught" }`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ScoringAction {
    Run {
        runs: u32,
    },
    Extra {
        kind: ExtraKind,
        #[serde(default = "one")]
        runs: u32,
    },
    Wicket {
        dismissed: PlayerId,
        /// Dismissal label, parsed loosely ("c", "run out", ...).
        how: String,
        #[serde(default)]
        incoming: Option<PlayerId>,
    },
    Bowler {
        player: PlayerId,
    },
    Striker {
        #[serde(default)]
        player: Option<PlayerId>,
    },
    NonStriker {
        #[serde(default)]
        player: Option<PlayerId>,
    },
    EndInnings,
    Undo,
}

fn one() -> u32 {
    1
}

impl ScoringAction {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Run { .. } => "run",
            Self::Extra { .. } => "extra",
            Self::Wicket { .. } => "wicket",
            Self::Bowler { .. } => "bowler",
            Self::Striker { .. } => "striker",
            Self::NonStriker { .. } => "non_striker",
            Self::EndInnings => "end_innings",
            Self::Undo => "undo",
        }
    }
}

/// What applying a [`ScoringAction`] did.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ActionOutcome {
    Delivered(DeliveryEvent),
    Undone(DeliveryEvent),
    LineupChanged,
    InningsEnded,
}
