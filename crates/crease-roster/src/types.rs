//! Team and player records.

use crease_types::{PlayerId, StatLine, TeamId};
use serde::{Deserialize, Serialize};

/// A team that can bat or bowl in a match.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    pub id: TeamId,
    pub name: String,
}

/// A player and their cumulative stats across every innings scored with
/// this roster.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub team: TeamId,
    /// Free-form role label ("batter", "bowler", "all-rounder", ...).
    pub role: String,
    pub stats: StatLine,
}
