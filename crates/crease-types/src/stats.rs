use serde::{Deserialize, Serialize};

/// Cumulative numbers for one player, or a delta applied to them.
///
/// The same shape is used for a player's running totals and for the
/// per-delivery change the ledger credits (and later debits on undo).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StatLine {
    pub runs: u32,
    pub balls: u32,
    pub fours: u32,
    pub sixes: u32,
    pub wickets: u32,
}

impl StatLine {
    /// Delta for a batter who faced one legal ball and scored `runs` off it.
    pub const fn batting(runs: u32) -> Self {
        Self {
            runs,
            balls: 1,
            fours: if runs == 4 { 1 } else { 0 },
            sixes: if runs == 6 { 1 } else { 0 },
            wickets: 0,
        }
    }

    /// Delta for a batter who faced one legal ball without scoring off the bat.
    pub const fn ball_faced() -> Self {
        Self {
            runs: 0,
            balls: 1,
            fours: 0,
            sixes: 0,
            wickets: 0,
        }
    }

    /// Delta for a bowler credited with one wicket.
    pub const fn wicket_taken() -> Self {
        Self {
            runs: 0,
            balls: 0,
            fours: 0,
            sixes: 0,
            wickets: 1,
        }
    }

    pub fn is_zero(&self) -> bool {
        *self == Self::default()
    }

    /// Field-wise sum.
    pub fn plus(&self, other: &Self) -> Self {
        Self {
            runs: self.runs + other.runs,
            balls: self.balls + other.balls,
            fours: self.fours + other.fours,
            sixes: self.sixes + other.sixes,
            wickets: self.wickets + other.wickets,
        }
    }

    /// Field-wise difference, clamped at zero.
    pub fn saturating_minus(&self, other: &Self) -> Self {
        Self {
            runs: self.runs.saturating_sub(other.runs),
            balls: self.balls.saturating_sub(other.balls),
            fours: self.fours.saturating_sub(other.fours),
            sixes: self.sixes.saturating_sub(other.sixes),
            wickets: self.wickets.saturating_sub(other.wickets),
        }
    }

    /// Runs per hundred balls; zero when no balls were faced.
    pub fn strike_rate(&self) -> f64 {
        if self.balls == 0 {
            return 0.0;
        }
        f64::from(self.runs) * 100.0 / f64::from(self.balls)
    }
}
