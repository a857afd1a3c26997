use chrono::{DateTime, NaiveDate, Utc};
use crease_ledger::{
    CompletionReason, Innings, InningsConfig, ReplayEngine, StreamValidator, ValidationReport,
};
use crease_roster::{InMemoryRoster, RosterError, RosterReader, StatTally, StatsWriter};
use crease_types::{DismissalKind, MatchId, PlayerId, TeamId};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::action::{ActionOutcome, ScoringAction};
use crate::config::{MatchConfig, MatchDetails};
use crate::error::{SdkError, SdkResult};
use crate::summary::{result_of, MatchResult, MatchSummary};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchStatus {
    InProgress,
    Complete,
}

/// A limited-overs match: one innings per side.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Match {
    pub id: MatchId,
    pub title: String,
    pub venue: Option<String>,
    pub date: Option<NaiveDate>,
    pub format: Option<String>,
    /// Batting first, then chasing.
    pub teams: [TeamId; 2],
    pub config: MatchConfig,
    pub innings: Vec<Innings>,
    pub status: MatchStatus,
    pub created_at: DateTime<Utc>,
}

impl Match {
    pub fn current_innings(&self) -> Option<&Innings> {
        self.innings.last()
    }

    pub fn summary(&self) -> MatchSummary {
        MatchSummary::of(self)
    }

    pub fn result(&self) -> Option<MatchResult> {
        result_of(self)
    }

    fn batting_side(&self, slot: usize) -> &TeamId {
        &self.teams[slot % 2]
    }

    fn fielding_side(&self, slot: usize) -> &TeamId {
        &self.teams[(slot + 1) % 2]
    }
}

/// The roster plus every match scored with it.
///
/// At most one match is active at a time; scoring actions go to the active
/// match's current innings and player stats are written to the roster.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scorebook {
    roster: InMemoryRoster,
    matches: Vec<Match>,
    active: Option<MatchId>,
    /// Stats credited by matches that have since been removed.
    #[serde(default)]
    removed_stats: StatTally,
}

impl Scorebook {
    pub fn new() -> Self {
        Self::default()
    }

    // ---- Roster ----

    pub fn roster(&self) -> &InMemoryRoster {
        &self.roster
    }

    pub fn roster_mut(&mut self) -> &mut InMemoryRoster {
        &mut self.roster
    }

    pub fn add_team(&mut self, name: &str) -> SdkResult<TeamId> {
        Ok(self.roster.add_team(name)?)
    }

    pub fn add_player(&mut self, team: &TeamId, name: &str, role: &str) -> SdkResult<PlayerId> {
        Ok(self.roster.add_player(team, name, role)?)
    }

    // ---- Matches ----

    pub fn matches(&self) -> &[Match] {
        &self.matches
    }

    pub fn get_match(&self, id: &MatchId) -> SdkResult<&Match> {
        self.matches
            .iter()
            .find(|m| &m.id == id)
            .ok_or(SdkError::MatchNotFound(*id))
    }

    pub fn active_match_id(&self) -> Option<MatchId> {
        self.active
    }

    pub fn active_match(&self) -> SdkResult<&Match> {
        let id = self.active.ok_or(SdkError::NoActiveMatch)?;
        self.get_match(&id)
    }

    pub fn active_innings(&self) -> SdkResult<&Innings> {
        self.active_match()?
            .current_innings()
            .ok_or_else(|| SdkError::InvalidOperation("match has no innings".into()))
    }

    /// Start a match and make it active. `batting_first` opens with the
    /// first `squad_size` players of its roster as the batting order.
    pub fn create_match(
        &mut self,
        batting_first: &TeamId,
        chasing: &TeamId,
        config: MatchConfig,
    ) -> SdkResult<MatchId> {
        self.create_match_with_details(batting_first, chasing, config, MatchDetails::default())
    }

    pub fn create_match_with_details(
        &mut self,
        batting_first: &TeamId,
        chasing: &TeamId,
        config: MatchConfig,
        details: MatchDetails,
    ) -> SdkResult<MatchId> {
        config.validate()?;
        if batting_first == chasing {
            return Err(SdkError::InvalidOperation(
                "a match needs two different teams".into(),
            ));
        }
        for team in [batting_first, chasing] {
            if self.roster.team(team).is_none() {
                return Err(RosterError::TeamNotFound(team.clone()).into());
            }
        }
        // Checked here and again before every first-innings action, so the
        // switch of innings cannot fail.
        batting_order(&self.roster, chasing, &config)?;
        let first = open_innings(&self.roster, batting_first, &config)?;

        let details = details.normalized();
        let title = details.title.unwrap_or_else(|| {
            format!(
                "{} vs {}",
                self.roster.team_name(batting_first),
                self.roster.team_name(chasing)
            )
        });
        let game = Match {
            id: MatchId::new(),
            title,
            venue: details.venue,
            date: details.date,
            format: details.format,
            teams: [batting_first.clone(), chasing.clone()],
            config,
            innings: vec![first],
            status: MatchStatus::InProgress,
            created_at: Utc::now(),
        };
        let id = game.id;
        info!(
            match_id = %id.short_id(),
            title = %game.title,
            batting = %self.roster.team_name(batting_first),
            chasing = %self.roster.team_name(chasing),
            overs = game.config.overs_per_innings,
            "match created"
        );
        self.matches.push(game);
        self.active = Some(id);
        Ok(id)
    }

    /// Make an existing match the active one again.
    pub fn resume_match(&mut self, id: &MatchId) -> SdkResult<()> {
        self.get_match(id)?;
        self.active = Some(*id);
        Ok(())
    }

    /// Apply one scoring action to the active match.
    ///
    /// A completed first innings opens the chase; a completed chase
    /// completes the match. Undo at the very start of the chase removes the
    /// empty second innings and undoes the first innings' last delivery.
    pub fn apply(&mut self, action: ScoringAction) -> SdkResult<ActionOutcome> {
        let index = self.active_index()?;
        debug!(action = action.label(), "applying scoring action");
        let Self {
            roster, matches, ..
        } = self;
        let game = &mut matches[index];

        if action == ScoringAction::Undo {
            reopen_first_innings(game);
        } else if game.innings.len() == 1 {
            // The chase has to be able to open before anything is recorded.
            batting_order(roster, &game.teams[1], &game.config)?;
        }
        let slot = game
            .innings
            .len()
            .checked_sub(1)
            .ok_or_else(|| SdkError::InvalidOperation("match has no innings".into()))?;
        let batting = game.batting_side(slot).clone();
        let fielding = game.fielding_side(slot).clone();
        let innings = &mut game.innings[slot];

        let outcome = match action {
            ScoringAction::Run { runs } => {
                ActionOutcome::Delivered(innings.apply_run(runs, roster)?.clone())
            }
            ScoringAction::Extra { kind, runs } => {
                ActionOutcome::Delivered(innings.apply_extra(kind, runs)?.clone())
            }
            ScoringAction::Wicket {
                dismissed,
                how,
                incoming,
            } => {
                let how: DismissalKind = how.parse()?;
                if let Some(id) = &incoming {
                    ensure_member(roster, id, &batting)?;
                }
                ActionOutcome::Delivered(
                    innings
                        .apply_wicket(dismissed, how, incoming, roster)?
                        .clone(),
                )
            }
            ScoringAction::Bowler { player } => {
                ensure_member(roster, &player, &fielding)?;
                innings.set_bowler(player)?;
                ActionOutcome::LineupChanged
            }
            ScoringAction::Striker { player } => {
                if let Some(id) = &player {
                    ensure_member(roster, id, &batting)?;
                }
                innings.set_striker(player)?;
                ActionOutcome::LineupChanged
            }
            ScoringAction::NonStriker { player } => {
                if let Some(id) = &player {
                    ensure_member(roster, id, &batting)?;
                }
                innings.set_non_striker(player)?;
                ActionOutcome::LineupChanged
            }
            ScoringAction::EndInnings => {
                innings.end_innings()?;
                ActionOutcome::InningsEnded
            }
            ScoringAction::Undo => {
                let event = innings.undo_last(roster)?;
                if game.status == MatchStatus::Complete {
                    game.status = MatchStatus::InProgress;
                    info!(match_id = %game.id.short_id(), "match reopened by undo");
                }
                ActionOutcome::Undone(event)
            }
        };

        advance(game, roster)?;
        Ok(outcome)
    }

    /// Mark the active match complete and clear the active slot.
    pub fn finish_match(&mut self) -> SdkResult<MatchId> {
        let index = self.active_index()?;
        let game = &mut self.matches[index];
        game.status = MatchStatus::Complete;
        self.active = None;
        info!(match_id = %game.id.short_id(), result = ?game.result(), "match finished");
        Ok(game.id)
    }

    /// Drop a completed match from the book. Player stats it credited stay
    /// on the roster.
    pub fn remove_match(&mut self, id: &MatchId) -> SdkResult<Match> {
        let index = self
            .matches
            .iter()
            .position(|m| &m.id == id)
            .ok_or(SdkError::MatchNotFound(*id))?;
        if self.matches[index].status != MatchStatus::Complete {
            return Err(SdkError::InvalidOperation(
                "only a completed match can be removed".into(),
            ));
        }
        let mut credited = StatTally::new();
        for innings in &self.matches[index].innings {
            for (player, line) in ReplayEngine::tally(innings)?.iter() {
                credited.credit(player, line);
            }
        }

        let game = self.matches.remove(index);
        for (player, line) in credited.iter() {
            self.removed_stats.credit(player, line);
        }
        if self.active == Some(*id) {
            self.active = None;
        }
        info!(match_id = %id.short_id(), title = %game.title, "match removed");
        Ok(game)
    }

    pub fn summary(&self, id: &MatchId) -> SdkResult<MatchSummary> {
        Ok(self.get_match(id)?.summary())
    }

    /// Validate every innings of a match.
    pub fn validate_match(&self, id: &MatchId) -> SdkResult<Vec<ValidationReport>> {
        let game = self.get_match(id)?;
        let reports = game
            .innings
            .iter()
            .map(StreamValidator::validate)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(reports)
    }

    /// Players whose roster stats differ from what the match logs credit
    /// them with.
    pub fn stat_drift(&self) -> SdkResult<Vec<PlayerId>> {
        let mut expected = self.removed_stats.clone();
        for game in &self.matches {
            for innings in &game.innings {
                for (player, line) in ReplayEngine::tally(innings)?.iter() {
                    expected.credit(player, line);
                }
            }
        }

        let mut drifted: Vec<PlayerId> = self
            .roster
            .players()
            .iter()
            .filter(|p| p.stats != expected.get(&p.id))
            .map(|p| p.id.clone())
            .collect();
        // Credits to players the roster no longer knows count as drift too.
        for (player, _) in expected.iter() {
            if self.roster.player(player).is_none() {
                drifted.push(player.clone());
            }
        }
        Ok(drifted)
    }

    fn active_index(&self) -> SdkResult<usize> {
        let id = self.active.ok_or(SdkError::NoActiveMatch)?;
        self.matches
            .iter()
            .position(|m| m.id == id)
            .ok_or(SdkError::MatchNotFound(id))
    }
}

fn batting_order(
    roster: &InMemoryRoster,
    team: &TeamId,
    config: &MatchConfig,
) -> SdkResult<Vec<PlayerId>> {
    let order = roster.batting_order(team, config.squad_size);
    if order.len() < 2 {
        return Err(SdkError::InvalidOperation(format!(
            "{} needs at least two players",
            roster.team_name(team)
        )));
    }
    Ok(order)
}

fn open_innings(
    roster: &InMemoryRoster,
    team: &TeamId,
    config: &MatchConfig,
) -> SdkResult<Innings> {
    let order = batting_order(roster, team, config)?;
    // The last batter cannot bat alone.
    let cap = config.max_wickets.min(order.len() as u32 - 1);
    let limits = InningsConfig::new(config.overs_per_innings).with_max_wickets(cap);
    Ok(Innings::with_config(team.clone(), order, limits)?)
}

fn ensure_member(roster: &InMemoryRoster, player: &PlayerId, team: &TeamId) -> SdkResult<()> {
    let record = roster
        .player(player)
        .ok_or_else(|| RosterError::PlayerNotFound(player.clone()))?;
    if &record.team != team {
        return Err(SdkError::InvalidOperation(format!(
            "{} does not play for {}",
            record.name,
            roster.team_name(team)
        )));
    }
    Ok(())
}

/// Drop an untouched second innings so undo reaches the first.
fn reopen_first_innings(game: &mut Match) {
    if let [first, second] = game.innings.as_slice() {
        if second.events().is_empty() && !first.events().is_empty() {
            game.innings.pop();
            info!(match_id = %game.id.short_id(), "second innings withdrawn by undo");
        }
    }
}

/// Move the match on after an innings completes.
fn advance(game: &mut Match, roster: &InMemoryRoster) -> SdkResult<()> {
    if let [first, second] = game.innings.as_mut_slice() {
        if !second.is_complete() && second.runs() > first.runs() {
            second.close(CompletionReason::TargetReached)?;
        }
    }

    let Some(current) = game.innings.last() else {
        return Ok(());
    };
    if !current.is_complete() || game.status == MatchStatus::Complete {
        return Ok(());
    }

    if game.innings.len() == 1 {
        let target = current.runs() + 1;
        let chasing = game.teams[1].clone();
        let next = open_innings(roster, &chasing, &game.config)?;
        game.innings.push(next);
        info!(
            match_id = %game.id.short_id(),
            chasing = %roster.team_name(&chasing),
            target,
            "second innings started"
        );
    } else {
        game.status = MatchStatus::Complete;
        info!(match_id = %game.id.short_id(), result = ?result_of(game), "match complete");
    }
    Ok(())
}
