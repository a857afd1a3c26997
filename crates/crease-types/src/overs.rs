use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Legal deliveries in one over.
pub const BALLS_PER_OVER: u32 = 6;

/// Completed overs plus balls bowled in the current over.
///
/// Invariant: `balls < BALLS_PER_OVER`. Ordering compares total legal
/// deliveries.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct OverCount {
    pub overs: u32,
    pub balls: u32,
}

impl OverCount {
    pub const fn zero() -> Self {
        Self { overs: 0, balls: 0 }
    }

    pub const fn from_legal_balls(legal_balls: u32) -> Self {
        Self {
            overs: legal_balls / BALLS_PER_OVER,
            balls: legal_balls % BALLS_PER_OVER,
        }
    }

    pub const fn legal_balls(&self) -> u32 {
        self.overs.saturating_mul(BALLS_PER_OVER).saturating_add(self.balls)
    }

    /// Returns `true` when no ball of the current over has been bowled.
    pub const fn at_over_boundary(&self) -> bool {
        self.balls == 0
    }
}

impl fmt::Display for OverCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.overs, self.balls)
    }
}

impl FromStr for OverCount {
    type Err = TypeError;

    /// Parse cricket notation: `"12"` or `"12.3"` (balls 0–5).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: &str| TypeError::InvalidOvers {
            input: s.to_string(),
            reason: reason.to_string(),
        };
        let (overs, balls) = match s.split_once('.') {
            Some((o, b)) => (o, b),
            None => (s, "0"),
        };
        let overs: u32 = overs.parse().map_err(|_| invalid("overs is not a number"))?;
        let balls: u32 = balls.parse().map_err(|_| invalid("balls is not a number"))?;
        if balls >= BALLS_PER_OVER {
            return Err(invalid("balls must be below 6"));
        }
        Ok(Self { overs, balls })
    }
}

/// Runs per over given a number of legal deliveries. Zero balls yields zero.
pub fn run_rate(runs: u32, legal_balls: u32) -> f64 {
    if legal_balls == 0 {
        return 0.0;
    }
    f64::from(runs) * f64::from(BALLS_PER_OVER) / f64::from(legal_balls)
}
