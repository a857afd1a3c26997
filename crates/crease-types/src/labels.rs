use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Kind of extra conceded on a delivery.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtraKind {
    /// Runs taken without bat contact; the ball counts toward the over.
    Bye,
    /// Runs off the body; the ball counts toward the over.
    LegBye,
    /// Delivery out of reach; not counted toward the over.
    Wide,
    /// Illegal delivery; not counted toward the over.
    NoBall,
}

impl ExtraKind {
    /// Returns `true` if a delivery of this kind counts toward the six-ball over.
    pub const fn is_legal(self) -> bool {
        matches!(self, Self::Bye | Self::LegBye)
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Bye => "bye",
            Self::LegBye => "leg-bye",
            Self::Wide => "wide",
            Self::NoBall => "no-ball",
        }
    }
}

impl fmt::Display for ExtraKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ExtraKind {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "bye" | "byes" | "b" => Ok(Self::Bye),
            "legbye" | "legbyes" | "lb" => Ok(Self::LegBye),
            "wide" | "wides" | "wd" => Ok(Self::Wide),
            "noball" | "noballs" | "nb" => Ok(Self::NoBall),
            _ => Err(TypeError::UnknownLabel {
                what: "extra",
                label: s.to_string(),
            }),
        }
    }
}

/// How a batter was dismissed. The ledger treats this as a label only.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DismissalKind {
    Bowled,
    Caught,
    Lbw,
    RunOut,
    Stumped,
    HitWicket,
    /// Any other mode, kept verbatim.
    Other(String),
}

impl fmt::Display for DismissalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bowled => write!(f, "bowled"),
            Self::Caught => write!(f, "caught"),
            Self::Lbw => write!(f, "lbw"),
            Self::RunOut => write!(f, "run out"),
            Self::Stumped => write!(f, "stumped"),
            Self::HitWicket => write!(f, "hit wicket"),
            Self::Other(label) => write!(f, "{label}"),
        }
    }
}

impl FromStr for DismissalKind {
    type Err = TypeError;

    /// Known modes are matched loosely; anything else non-empty becomes `Other`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let kind = match normalize(s).as_str() {
            "" => {
                return Err(TypeError::UnknownLabel {
                    what: "dismissal",
                    label: s.to_string(),
                })
            }
            "bowled" | "b" => Self::Bowled,
            "caught" | "c" | "ct" => Self::Caught,
            "lbw" => Self::Lbw,
            "runout" | "ro" => Self::RunOut,
            "stumped" | "st" => Self::Stumped,
            "hitwicket" | "hw" => Self::HitWicket,
            _ => Self::Other(s.trim().to_string()),
        };
        Ok(kind)
    }
}

fn normalize(s: &str) -> String {
    s.chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_byes_and_leg_byes_are_legal() {
        assert!(ExtraKind::Bye.is_legal());
        assert!(ExtraKind::LegBye.is_legal());
        assert!(!ExtraKind::Wide.is_legal());
        assert!(!ExtraKind::NoBall.is_legal());
    }

    #[test]
    fn extra_parsing_accepts_scorer_spellings() {
        assert_eq!("byes".parse::<ExtraKind>().unwrap(), ExtraKind::Bye);
        assert_eq!("legbyes".parse::<ExtraKind>().unwrap(), ExtraKind::LegBye);
        assert_eq!("leg-bye".parse::<ExtraKind>().unwrap(), ExtraKind::LegBye);
        assert_eq!("noball".parse::<ExtraKind>().unwrap(), ExtraKind::NoBall);
        assert_eq!("No Ball".parse::<ExtraKind>().unwrap(), ExtraKind::NoBall);
        assert!("overthrow".parse::<ExtraKind>().is_err());
    }

    #[test]
    fn dismissal_falls_back_to_other() {
        assert_eq!("Run Out".parse::<DismissalKind>().unwrap(), DismissalKind::RunOut);
        assert_eq!(
            "obstructing the field".parse::<DismissalKind>().unwrap(),
            DismissalKind::Other("obstructing the field".into())
        );
        assert!("  ".parse::<DismissalKind>().is_err());
    }

    #[test]
    fn labels_display() {
        assert_eq!(ExtraKind::NoBall.to_string(), "no-ball");
        assert_eq!(DismissalKind::HitWicket.to_string(), "hit wicket");
    }

    #[test]
    fn serde_uses_snake_case() {
        let json = serde_json::to_string(&ExtraKind::LegBye).unwrap();
        assert_eq!(json, "\"leg_bye\"");
        let parsed: DismissalKind = serde_json::from_str("\"run_out\"").unwrap();
        assert_eq!(parsed, DismissalKind::RunOut);
    }
}
