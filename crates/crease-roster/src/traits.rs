//! The boundaries between the roster and its collaborators.

use crease_types::{PlayerId, StatLine, TeamId};

use crate::types::{Player, Team};

/// Narrow update interface the innings ledger writes player stats through.
///
/// The ledger calls [`credit`](StatsWriter::credit) when a delivery is
/// applied and [`debit`](StatsWriter::debit) with the identical line when it
/// is undone. Implementations must not fail: a writer that does not know a
/// player simply ignores the update.
pub trait StatsWriter {
    fn credit(&mut self, player: &PlayerId, delta: &StatLine);

    fn debit(&mut self, player: &PlayerId, delta: &StatLine);
}

/// Read boundary for roster lookups.
pub trait RosterReader {
    fn player(&self, id: &PlayerId) -> Option<&Player>;

    fn team(&self, id: &TeamId) -> Option<&Team>;

    /// Players of a team in the order they were added.
    fn players_of(&self, team: &TeamId) -> Vec<&Player>;

    /// The first `squad_size` players of a team, used as a batting order.
    fn batting_order(&self, team: &TeamId, squad_size: usize) -> Vec<PlayerId> {
        self.players_of(team)
            .into_iter()
            .take(squad_size)
            .map(|p| p.id.clone())
            .collect()
    }

    /// Player name, falling back to the raw id for unknown players.
    fn display_name(&self, id: &PlayerId) -> String {
        self.player(id)
            .map(|p| p.name.clone())
            .unwrap_or_else(|| id.to_string())
    }

    /// Team name, falling back to the raw id for unknown teams.
    fn team_name(&self, id: &TeamId) -> String {
        self.team(id)
            .map(|t| t.name.clone())
            .unwrap_or_else(|| id.to_string())
    }
}
