//! Match scripts: a roster, a match configuration and a list of scoring
//! actions in one TOML file.

use std::path::Path;

use anyhow::{bail, Context};
use crease_sdk::{MatchConfig, MatchDetails, MatchId, PlayerId, Scorebook, ScoringAction, TeamId};
use serde::Deserialize;
use tracing::debug;

#[derive(Debug, Deserialize)]
pub struct MatchScript {
    #[serde(rename = "match", default)]
    pub header: MatchHeader,
    /// Batting first, then chasing.
    pub teams: Vec<TeamSpec>,
    #[serde(default)]
    pub actions: Vec<ScoringAction>,
}

/// The `[match]` table: scoring limits and descriptive details side by side.
#[derive(Debug, Default, Deserialize)]
pub struct MatchHeader {
    #[serde(flatten)]
    pub config: MatchConfig,
    #[serde(flatten)]
    pub details: MatchDetails,
}

#[derive(Debug, Deserialize)]
pub struct TeamSpec {
    #[serde(default)]
    pub id: Option<TeamId>,
    pub name: String,
    pub players: Vec<PlayerSpec>,
}

#[derive(Debug, Deserialize)]
pub struct PlayerSpec {
    pub id: PlayerId,
    pub name: String,
    #[serde(default)]
    pub role: String,
}

impl MatchScript {
    pub fn from_toml_str(text: &str) -> anyhow::Result<Self> {
        let script: Self = toml::from_str(text).context("invalid match script")?;
        script.header.config.validate()?;
        if script.teams.len() != 2 {
            bail!("a match script needs exactly two teams, found {}", script.teams.len());
        }
        Ok(script)
    }

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        Self::from_toml_str(&text).with_context(|| format!("in {}", path.display()))
    }

    /// Register the teams and open the match.
    pub fn setup(&self) -> anyhow::Result<(Scorebook, MatchId)> {
        let mut book = Scorebook::new();
        let mut team_ids = Vec::with_capacity(self.teams.len());
        for team in &self.teams {
            let roster = book.roster_mut();
            let id = match &team.id {
                Some(id) => roster.add_team_with_id(id.clone(), &team.name)?,
                None => roster.add_team(&team.name)?,
            };
            for player in &team.players {
                roster.add_player_with_id(player.id.clone(), &id, &player.name, &player.role)?;
            }
            team_ids.push(id);
        }
        let match_id = book.create_match_with_details(
            &team_ids[0],
            &team_ids[1],
            self.header.config.clone(),
            self.header.details.clone(),
        )?;
        Ok((book, match_id))
    }

    /// Set up the match and apply every action in order.
    pub fn play(&self) -> anyhow::Result<(Scorebook, MatchId)> {
        let (mut book, match_id) = self.setup()?;
        for (index, action) in self.actions.iter().enumerate() {
            debug!(step = index + 1, action = action.label(), "script action");
            book.apply(action.clone())
                .with_context(|| format!("action {} ({}) failed", index + 1, action.label()))?;
        }
        Ok((book, match_id))
    }
}
