//! Delivery events and the crease they act on.

use chrono::{DateTime, Utc};
use crease_types::{DismissalKind, ExtraKind, PlayerId};
use serde::{Deserialize, Serialize};

/// One end of the pitch occupied by a batter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CreaseEnd {
    Striker,
    NonStriker,
}

impl CreaseEnd {
    pub const fn opposite(self) -> Self {
        match self {
            Self::Striker => Self::NonStriker,
            Self::NonStriker => Self::Striker,
        }
    }
}

/// The two batters at the wicket. Either slot may be empty.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Crease {
    pub striker: Option<PlayerId>,
    pub non_striker: Option<PlayerId>,
}

impl Crease {
    pub fn new(striker: Option<PlayerId>, non_striker: Option<PlayerId>) -> Self {
        Self {
            striker,
            non_striker,
        }
    }

    pub fn swap(&mut self) {
        std::mem::swap(&mut self.striker, &mut self.non_striker);
    }

    /// Which end `player` currently occupies, if either.
    pub fn end_of(&self, player: &PlayerId) -> Option<CreaseEnd> {
        if self.striker.as_ref() == Some(player) {
            Some(CreaseEnd::Striker)
        } else if self.non_striker.as_ref() == Some(player) {
            Some(CreaseEnd::NonStriker)
        } else {
            None
        }
    }

    pub fn contains(&self, player: &PlayerId) -> bool {
        self.end_of(player).is_some()
    }

    pub fn at(&self, end: CreaseEnd) -> Option<&PlayerId> {
        match end {
            CreaseEnd::Striker => self.striker.as_ref(),
            CreaseEnd::NonStriker => self.non_striker.as_ref(),
        }
    }

    pub fn slot_mut(&mut self, end: CreaseEnd) -> &mut Option<PlayerId> {
        match end {
            CreaseEnd::Striker => &mut self.striker,
            CreaseEnd::NonStriker => &mut self.non_striker,
        }
    }
}

/// Where the batter replacing a dismissed player came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IncomingSource {
    /// The caller named the incoming batter.
    Explicit,
    /// Taken from the batting order at this index; the cursor moved past it.
    BattingOrder { slot: usize },
    /// The batting order was exhausted; the slot was left empty.
    Exhausted,
}

/// Details of a dismissal.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WicketDetail {
    pub dismissed: PlayerId,
    pub how: DismissalKind,
    /// The slot the dismissed batter held once any end-of-over rotation on
    /// this delivery was applied. This is the slot the incoming batter fills.
    pub end: CreaseEnd,
    pub incoming: Option<PlayerId>,
    pub source: IncomingSource,
}

/// What happened on a delivery.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeliveryKind {
    Run { runs: u32 },
    Extra { kind: ExtraKind, runs: u32 },
    Wicket(WicketDetail),
}

impl DeliveryKind {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Run { .. } => "run",
            Self::Extra { .. } => "extra",
            Self::Wicket(_) => "wicket",
        }
    }

    /// Runs this kind of delivery adds to the innings total.
    pub fn runs(&self) -> u32 {
        match self {
            Self::Run { runs } | Self::Extra { runs, .. } => *runs,
            Self::Wicket(_) => 0,
        }
    }

    /// Whether this kind of delivery counts toward the six-ball over.
    pub fn is_legal(&self) -> bool {
        match self {
            Self::Run { .. } | Self::Wicket(_) => true,
            Self::Extra { kind, .. } => kind.is_legal(),
        }
    }
}

/// An immutable entry in the innings event log.
///
/// Events are created only by the ledger's `apply_*` operations and are
/// never edited after they are appended. The crease snapshots taken before
/// and after the delivery let replay honour crease changes the caller made
/// between deliveries, and let undo put the batters back exactly.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryEvent {
    /// 1-based position in the log.
    pub seq: u64,
    pub kind: DeliveryKind,
    /// Runs added to the innings total.
    pub runs: u32,
    /// Counts toward the over.
    pub legal: bool,
    /// Batter credited with the ball faced: the striker on a run, the
    /// dismissed player on a wicket, nobody on an extra.
    pub batter: Option<PlayerId>,
    pub bowler: PlayerId,
    pub crease: Crease,
    pub crease_after: Crease,
    /// Informational only.
    pub recorded_at: DateTime<Utc>,
}

impl DeliveryEvent {
    pub fn wicket(&self) -> Option<&WicketDetail> {
        match &self.kind {
            DeliveryKind::Wicket(detail) => Some(detail),
            _ => None,
        }
    }

    pub fn extra_kind(&self) -> Option<ExtraKind> {
        match &self.kind {
            DeliveryKind::Extra { kind, .. } => Some(*kind),
            _ => None,
        }
    }
}
