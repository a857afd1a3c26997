//! Plain-text scorecards.

use std::fmt::Write;

use colored::Colorize;
use crease_ledger::{BatterStatus, BattingCard, BowlingCard, CommentaryLine, ExtrasBreakdown};
use crease_sdk::{
    Innings, Margin, Match, MatchResult, MatchStatus, ProjectionBuilder, RosterReader, Scorebook,
};
use crease_types::{DismissalKind, PlayerId};

/// Full scorecard for one match: every innings, then the chase or result.
pub fn match_card(book: &Scorebook, game: &Match, commentary: usize) -> String {
    let roster = book.roster();
    let mut out = String::new();
    let _ = writeln!(out, "{}  [{}]", game.title.bold(), game.id.short_id().dimmed());
    let mut meta = vec![format!(
        "{} v {}",
        roster.team_name(&game.teams[0]),
        roster.team_name(&game.teams[1])
    )];
    meta.extend(game.venue.clone());
    meta.extend(game.date.map(|d| d.format("%-d %b %Y").to_string()));
    meta.extend(game.format.clone());
    meta.push(format!("{} ov", game.config.overs_per_innings));
    let _ = writeln!(out, "{}", meta.join(" | ").dimmed());
    for (slot, innings) in game.innings.iter().enumerate() {
        out.push('\n');
        out.push_str(&innings_card(book, innings, slot + 1, commentary));
    }
    out.push('\n');
    out.push_str(&match_line(book, game));
    out.push('\n');
    out
}

pub fn innings_card(book: &Scorebook, innings: &Innings, number: usize, commentary: usize) -> String {
    let roster = book.roster();
    let batting = ProjectionBuilder::batting_card(innings, roster);
    let bowling = ProjectionBuilder::bowling_card(innings, roster);
    let summary = ProjectionBuilder::summary(innings);

    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} innings {}  {}",
        batting.batting_side.bold(),
        number,
        summary.score_line().cyan()
    );
    out.push_str(&batting_section(&batting, innings.striker(), |id| roster.display_name(id)));
    out.push_str(&bowling_section(&bowling));
    if commentary > 0 {
        let lines = ProjectionBuilder::commentary(innings, roster);
        out.push_str(&commentary_section(&lines, commentary));
    }
    out
}

fn batting_section(
    card: &BattingCard,
    striker: Option<&PlayerId>,
    name_of: impl Fn(&PlayerId) -> String,
) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "  {:<24} {:<28} {:>4} {:>4} {:>3} {:>3} {:>7}", "Batter", "", "R", "B", "4s", "6s", "SR");
    let mut did_not_bat = Vec::new();
    for row in &card.rows {
        let marker = if Some(&row.player) == striker { "*" } else { "" };
        let how = match &row.status {
            BatterStatus::DidNotBat => {
                did_not_bat.push(row.name.clone());
                continue;
            }
            BatterStatus::NotOut { .. } => "not out".green().to_string(),
            BatterStatus::Retired => "retired".yellow().to_string(),
            BatterStatus::Out { how, bowler } => dismissal(how, &name_of(bowler)),
        };
        let _ = writeln!(
            out,
            "  {:<24} {:<28} {:>4} {:>4} {:>3} {:>3} {:>7.2}",
            format!("{}{}", row.name, marker),
            how,
            row.line.runs,
            row.line.balls,
            row.line.fours,
            row.line.sixes,
            row.strike_rate
        );
    }
    let _ = writeln!(out, "  {:<53} {:>4}", format!("Extras {}", extras_detail(&card.extras)), card.extras.total());
    let _ = writeln!(
        out,
        "  {:<53} {:>4}",
        format!("Total ({} wkts, {} ov)", card.wickets, card.progress).bold(),
        card.runs.to_string().bold()
    );
    if !did_not_bat.is_empty() {
        let _ = writeln!(out, "  Did not bat: {}", did_not_bat.join(", ").dimmed());
    }
    out
}

fn dismissal(how: &DismissalKind, bowler: &str) -> String {
    match how {
        DismissalKind::RunOut => how.to_string(),
        DismissalKind::Bowled => format!("b {bowler}"),
        _ => format!("{how} b {bowler}"),
    }
}

fn extras_detail(extras: &ExtrasBreakdown) -> String {
    format!(
        "(b {}, lb {}, w {}, nb {})",
        extras.byes, extras.leg_byes, extras.wides, extras.no_balls
    )
}

fn bowling_section(card: &BowlingCard) -> String {
    let mut out = String::new();
    if card.rows.is_empty() {
        return out;
    }
    let _ = writeln!(out, "  {:<24} {:>5} {:>3} {:>4} {:>3} {:>6} {:>3} {:>3}", "Bowler", "O", "M", "R", "W", "Econ", "Wd", "Nb");
    for row in &card.rows {
        let _ = writeln!(
            out,
            "  {:<24} {:>5} {:>3} {:>4} {:>3} {:>6.2} {:>3} {:>3}",
            row.name,
            row.overs.to_string(),
            row.maidens,
            row.runs,
            row.wickets,
            row.economy,
            row.wides,
            row.no_balls
        );
    }
    out
}

fn commentary_section(lines: &[CommentaryLine], limit: usize) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "  {}", "Commentary".bold());
    for line in lines.iter().take(limit) {
        let _ = writeln!(out, "  {:>5}  {}", line.ball.yellow(), line.text);
    }
    out
}

/// The chase equation while a match is live, the result once it is over.
pub fn match_line(book: &Scorebook, game: &Match) -> String {
    let roster = book.roster();
    if game.status == MatchStatus::Complete {
        return match game.result() {
            Some(MatchResult::Won { team, margin }) => {
                let margin = match margin {
                    Margin::Runs(n) => format!("{n} run{}", plural(n)),
                    Margin::Wickets(n) => format!("{n} wicket{}", plural(n)),
                };
                format!("{} {} won by {margin}", "✓".green().bold(), roster.team_name(&team).bold())
            }
            Some(MatchResult::Tied) => format!("{} Match tied", "✓".green().bold()),
            Some(MatchResult::NoResult) | None => format!("{} No result", "✓".yellow()),
        };
    }
    let summary = game.summary();
    match (summary.target, summary.runs_needed, summary.balls_remaining) {
        (Some(target), Some(needed), Some(balls)) => format!(
            "{} need {} from {} ball{} (target {target})",
            roster.team_name(&game.teams[1]).bold(),
            needed.to_string().yellow(),
            balls,
            plural(balls)
        ),
        _ => format!("{} batting", roster.team_name(&game.teams[0]).bold()),
    }
}

fn plural(n: u32) -> &'static str {
    if n == 1 {
        ""
    } else {
        "s"
    }
}
