use crease_ledger::{Innings, ProjectionBuilder, ScoreSummary};
use chrono::NaiveDate;
use crease_types::{MatchId, TeamId};
use serde::Serialize;

use crate::scorebook::{Match, MatchStatus};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum Margin {
    Runs(u32),
    Wickets(u32),
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub enum MatchResult {
    Won { team: TeamId, margin: Margin },
    Tied,
    NoResult,
}

/// Both innings at a glance, plus the chase.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MatchSummary {
    pub id: MatchId,
    pub title: String,
    pub venue: Option<String>,
    pub date: Option<NaiveDate>,
    pub format: Option<String>,
    pub teams: [TeamId; 2],
    pub status: MatchStatus,
    pub innings: Vec<ScoreSummary>,
    /// First-innings runs plus one, once the chase has started.
    pub target: Option<u32>,
    pub runs_needed: Option<u32>,
    pub balls_remaining: Option<u32>,
    pub result: Option<MatchResult>,
}

impl MatchSummary {
    pub fn of(game: &Match) -> Self {
        let innings = game.innings.iter().map(ProjectionBuilder::summary).collect();
        let (target, runs_needed, balls_remaining) = match game.innings.as_slice() {
            [first, second] => {
                let target = first.runs() + 1;
                (
                    Some(target),
                    Some(target.saturating_sub(second.runs())),
                    Some(second.legal_balls_remaining()),
                )
            }
            _ => (None, None, None),
        };
        Self {
            id: game.id,
            title: game.title.clone(),
            venue: game.venue.clone(),
            date: game.date,
            format: game.format.clone(),
            teams: game.teams.clone(),
            status: game.status,
            innings,
            target,
            runs_needed,
            balls_remaining,
            result: result_of(game),
        }
    }
}

/// The result of a completed match; `None` while it is in progress.
pub fn result_of(game: &Match) -> Option<MatchResult> {
    if game.status != MatchStatus::Complete {
        return None;
    }
    let [first, second] = game.innings.as_slice() else {
        return Some(MatchResult::NoResult);
    };
    Some(decide(first, second))
}

fn decide(first: &Innings, second: &Innings) -> MatchResult {
    if second.runs() > first.runs() {
        return MatchResult::Won {
            team: second.batting_side().clone(),
            margin: Margin::Wickets(
                second
                    .config()
                    .max_wickets
                    .saturating_sub(second.wickets()),
            ),
        };
    }
    // A chase abandoned before its innings ended decides nothing.
    if !second.is_complete() {
        return MatchResult::NoResult;
    }
    if second.runs() == first.runs() {
        return MatchResult::Tied;
    }
    MatchResult::Won {
        team: first.batting_side().clone(),
        margin: Margin::Runs(first.runs() - second.runs()),
    }
}
