//! In-memory roster owned by a scorebook.
//!
//! [`InMemoryRoster`] keeps teams and players in insertion order, which is
//! also the order batting lineups are drawn from. It is serializable so a
//! scorebook snapshot can carry it verbatim.

use crease_types::{PlayerId, StatLine, TeamId};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{Result, RosterError};
use crate::names::validate_display_name;
use crate::traits::{RosterReader, StatsWriter};
use crate::types::{Player, Team};

/// An owned roster of teams and players.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InMemoryRoster {
    teams: Vec<Team>,
    players: Vec<Player>,
}

impl InMemoryRoster {
    /// Create a new empty roster.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a team under a generated id.
    pub fn add_team(&mut self, name: &str) -> Result<TeamId> {
        self.add_team_with_id(TeamId::generate(), name)
    }

    /// Add a team under a caller-chosen id.
    pub fn add_team_with_id(&mut self, id: TeamId, name: &str) -> Result<TeamId> {
        let name = validate_display_name(name)?;
        if self.team(&id).is_some() {
            return Err(RosterError::DuplicateTeam(id));
        }
        self.teams.push(Team {
            id: id.clone(),
            name,
        });
        Ok(id)
    }

    /// Remove a team and every player on it. Returns the removed players.
    pub fn remove_team(&mut self, id: &TeamId) -> Result<Vec<Player>> {
        let index = self
            .teams
            .iter()
            .position(|t| &t.id == id)
            .ok_or_else(|| RosterError::TeamNotFound(id.clone()))?;
        self.teams.remove(index);

        let (removed, kept): (Vec<Player>, Vec<Player>) = std::mem::take(&mut self.players)
            .into_iter()
            .partition(|p| &p.team == id);
        self.players = kept;
        Ok(removed)
    }

    /// Add a player under a generated id.
    pub fn add_player(&mut self, team: &TeamId, name: &str, role: &str) -> Result<PlayerId> {
        self.add_player_with_id(PlayerId::generate(), team, name, role)
    }

    /// Add a player under a caller-chosen id.
    pub fn add_player_with_id(
        &mut self,
        id: PlayerId,
        team: &TeamId,
        name: &str,
        role: &str,
    ) -> Result<PlayerId> {
        let name = validate_display_name(name)?;
        if self.team(team).is_none() {
            return Err(RosterError::TeamNotFound(team.clone()));
        }
        if self.player(&id).is_some() {
            return Err(RosterError::DuplicatePlayer(id));
        }
        self.players.push(Player {
            id: id.clone(),
            name,
            team: team.clone(),
            role: role.trim().to_string(),
            stats: StatLine::default(),
        });
        Ok(id)
    }

    pub fn rename_player(&mut self, id: &PlayerId, name: &str) -> Result<()> {
        let name = validate_display_name(name)?;
        let player = self
            .player_mut(id)
            .ok_or_else(|| RosterError::PlayerNotFound(id.clone()))?;
        player.name = name;
        Ok(())
    }

    pub fn teams(&self) -> &[Team] {
        &self.teams
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    fn player_mut(&mut self, id: &PlayerId) -> Option<&mut Player> {
        self.players.iter_mut().find(|p| &p.id == id)
    }
}

impl RosterReader for InMemoryRoster {
    fn player(&self, id: &PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| &p.id == id)
    }

    fn team(&self, id: &TeamId) -> Option<&Team> {
        self.teams.iter().find(|t| &t.id == id)
    }

    fn players_of(&self, team: &TeamId) -> Vec<&Player> {
        self.players.iter().filter(|p| &p.team == team).collect()
    }
}

impl StatsWriter for InMemoryRoster {
    fn credit(&mut self, player: &PlayerId, delta: &StatLine) {
        match self.player_mut(player) {
            Some(p) => p.stats = p.stats.plus(delta),
            None => warn!(player = %player, "stat credit for unknown player ignored"),
        }
    }

    fn debit(&mut self, player: &PlayerId, delta: &StatLine) {
        match self.player_mut(player) {
            Some(p) => p.stats = p.stats.saturating_minus(delta),
            None => warn!(player = %player, "stat debit for unknown player ignored"),
        }
    }
}
