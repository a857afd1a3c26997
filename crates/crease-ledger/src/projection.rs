use std::collections::BTreeMap;

use crease_roster::RosterReader;
use crease_types::{
    run_rate, DismissalKind, ExtraKind, InningsId, OverCount, PlayerId, StatLine, TeamId,
    BALLS_PER_OVER,
};
use serde::Serialize;

use crate::innings::{Innings, InningsStatus};
use crate::records::{CreaseEnd, DeliveryEvent, DeliveryKind};

/// Headline state of an innings.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ScoreSummary {
    pub innings: InningsId,
    pub batting_side: TeamId,
    pub runs: u32,
    pub wickets: u32,
    pub progress: OverCount,
    pub over_limit: u32,
    pub run_rate: f64,
    pub extras: u32,
    pub balls_remaining: u32,
    pub striker: Option<PlayerId>,
    pub non_striker: Option<PlayerId>,
    pub bowler: Option<PlayerId>,
    pub status: InningsStatus,
}

impl ScoreSummary {
    /// Conventional score line, e.g. `87/3 (12.4/20 ov)`.
    pub fn score_line(&self) -> String {
        format!(
            "{}/{} ({}/{} ov)",
            self.runs, self.wickets, self.progress, self.over_limit
        )
    }
}

/// Runs conceded through extras, by kind.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ExtrasBreakdown {
    pub byes: u32,
    pub leg_byes: u32,
    pub wides: u32,
    pub no_balls: u32,
}

impl ExtrasBreakdown {
    pub fn total(&self) -> u32 {
        self.byes + self.leg_byes + self.wides + self.no_balls
    }

    fn add(&mut self, kind: ExtraKind, runs: u32) {
        match kind {
            ExtraKind::Bye => self.byes += runs,
            ExtraKind::LegBye => self.leg_byes += runs,
            ExtraKind::Wide => self.wides += runs,
            ExtraKind::NoBall => self.no_balls += runs,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub enum BatterStatus {
    NotOut { end: CreaseEnd },
    Out { how: DismissalKind, bowler: PlayerId },
    /// Left the crease without being dismissed.
    Retired,
    DidNotBat,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct BattingRow {
    pub player: PlayerId,
    pub name: String,
    pub line: StatLine,
    pub strike_rate: f64,
    pub status: BatterStatus,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct BattingCard {
    pub innings: InningsId,
    pub batting_side: String,
    pub rows: Vec<BattingRow>,
    pub extras: ExtrasBreakdown,
    pub runs: u32,
    pub wickets: u32,
    pub progress: OverCount,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct BowlingRow {
    pub bowler: PlayerId,
    pub name: String,
    pub overs: OverCount,
    pub maidens: u32,
    pub runs: u32,
    pub wickets: u32,
    pub economy: f64,
    pub wides: u32,
    pub no_balls: u32,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct BowlingCard {
    pub innings: InningsId,
    pub rows: Vec<BowlingRow>,
}

/// One ball-by-ball commentary entry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CommentaryLine {
    pub seq: u64,
    /// Ball in `over.ball` form, counting from `0.1`. Deliveries that do not
    /// count toward the over carry the number of the ball that will be re-bowled.
    pub ball: String,
    pub text: String,
}

/// Deterministic projections over an innings log.
pub struct ProjectionBuilder;

impl ProjectionBuilder {
    pub fn summary(innings: &Innings) -> ScoreSummary {
        ScoreSummary {
            innings: innings.id(),
            batting_side: innings.batting_side().clone(),
            runs: innings.runs(),
            wickets: innings.wickets(),
            progress: innings.progress(),
            over_limit: innings.config().over_limit,
            run_rate: innings.run_rate(),
            extras: Self::extras(innings).total(),
            balls_remaining: innings.legal_balls_remaining(),
            striker: innings.striker().cloned(),
            non_striker: innings.non_striker().cloned(),
            bowler: innings.bowler().cloned(),
            status: innings.status(),
        }
    }

    pub fn extras(innings: &Innings) -> ExtrasBreakdown {
        let mut extras = ExtrasBreakdown::default();
        for event in innings.events() {
            if let DeliveryKind::Extra { kind, runs } = &event.kind {
                extras.add(*kind, *runs);
            }
        }
        extras
    }

    /// Batting card in batting-order sequence, followed by anyone else who
    /// came to the crease in order of first appearance.
    pub fn batting_card<R: RosterReader + ?Sized>(innings: &Innings, roster: &R) -> BattingCard {
        let mut appeared: Vec<PlayerId> = Vec::new();
        let mut lines: BTreeMap<PlayerId, StatLine> = BTreeMap::new();
        let mut dismissals: BTreeMap<PlayerId, (DismissalKind, PlayerId)> = BTreeMap::new();

        for event in innings.events() {
            note(&event.crease.striker, &mut appeared);
            note(&event.crease.non_striker, &mut appeared);
            note(&event.crease_after.striker, &mut appeared);
            note(&event.crease_after.non_striker, &mut appeared);

            match &event.kind {
                DeliveryKind::Run { runs } => {
                    if let Some(batter) = &event.batter {
                        let line = lines.entry(batter.clone()).or_default();
                        *line = line.plus(&StatLine::batting(*runs));
                    }
                }
                DeliveryKind::Wicket(detail) => {
                    let line = lines.entry(detail.dismissed.clone()).or_default();
                    *line = line.plus(&StatLine::ball_faced());
                    dismissals.insert(
                        detail.dismissed.clone(),
                        (detail.how.clone(), event.bowler.clone()),
                    );
                }
                DeliveryKind::Extra { .. } => {}
            }
        }
        note(&innings.crease().striker, &mut appeared);
        note(&innings.crease().non_striker, &mut appeared);

        let mut ordered: Vec<PlayerId> = innings.batting_order().to_vec();
        for id in &appeared {
            if !ordered.contains(id) {
                ordered.push(id.clone());
            }
        }

        let rows = ordered
            .into_iter()
            .map(|player| {
                let line = lines.get(&player).copied().unwrap_or_default();
                let status = if let Some((how, bowler)) = dismissals.get(&player) {
                    BatterStatus::Out {
                        how: how.clone(),
                        bowler: bowler.clone(),
                    }
                } else if let Some(end) = innings.crease().end_of(&player) {
                    BatterStatus::NotOut { end }
                } else if appeared.contains(&player) {
                    BatterStatus::Retired
                } else {
                    BatterStatus::DidNotBat
                };
                BattingRow {
                    name: roster.display_name(&player),
                    strike_rate: line.strike_rate(),
                    line,
                    status,
                    player,
                }
            })
            .collect();

        BattingCard {
            innings: innings.id(),
            batting_side: roster.team_name(innings.batting_side()),
            rows,
            extras: Self::extras(innings),
            runs: innings.runs(),
            wickets: innings.wickets(),
            progress: innings.progress(),
        }
    }

    /// Bowling figures in order of first appearance, with maidens and
    /// illegal-delivery counts computed from the log.
    pub fn bowling_card<R: RosterReader + ?Sized>(innings: &Innings, roster: &R) -> BowlingCard {
        let maidens = maidens(innings.events());
        let mut illegal: BTreeMap<&PlayerId, (u32, u32)> = BTreeMap::new();
        for event in innings.events() {
            match event.extra_kind() {
                Some(ExtraKind::Wide) => illegal.entry(&event.bowler).or_default().0 += 1,
                Some(ExtraKind::NoBall) => illegal.entry(&event.bowler).or_default().1 += 1,
                _ => {}
            }
        }

        let rows = innings
            .figures()
            .iter()
            .map(|f| {
                let (wides, no_balls) = illegal.get(&f.bowler).copied().unwrap_or_default();
                BowlingRow {
                    bowler: f.bowler.clone(),
                    name: roster.display_name(&f.bowler),
                    overs: f.overs(),
                    maidens: maidens.get(&f.bowler).copied().unwrap_or(0),
                    runs: f.runs_conceded,
                    wickets: f.wickets,
                    economy: run_rate(f.runs_conceded, f.legal_balls),
                    wides,
                    no_balls,
                }
            })
            .collect();

        BowlingCard {
            innings: innings.id(),
            rows,
        }
    }

    /// Ball-by-ball commentary, most recent first.
    pub fn commentary<R: RosterReader + ?Sized>(
        innings: &Innings,
        roster: &R,
    ) -> Vec<CommentaryLine> {
        let mut legal_before = 0u32;
        let mut lines: Vec<CommentaryLine> = innings
            .events()
            .iter()
            .map(|event| {
                let ball = format!(
                    "{}.{}",
                    legal_before / BALLS_PER_OVER,
                    legal_before % BALLS_PER_OVER + 1
                );
                if event.legal {
                    legal_before += 1;
                }
                CommentaryLine {
                    seq: event.seq,
                    ball,
                    text: describe(event, roster),
                }
            })
            .collect();
        lines.reverse();
        lines
    }
}

fn note(player: &Option<PlayerId>, appeared: &mut Vec<PlayerId>) {
    if let Some(id) = player {
        if !appeared.contains(id) {
            appeared.push(id.clone());
        }
    }
}

fn describe<R: RosterReader + ?Sized>(event: &DeliveryEvent, roster: &R) -> String {
    let bowler = roster.display_name(&event.bowler);
    match &event.kind {
        DeliveryKind::Run { runs } => {
            let batter = event
                .batter
                .as_ref()
                .map(|b| roster.display_name(b))
                .unwrap_or_default();
            let outcome = match runs {
                0 => "no run".to_string(),
                1 => "1 run".to_string(),
                4 => "FOUR".to_string(),
                6 => "SIX".to_string(),
                n => format!("{n} runs"),
            };
            format!("{bowler} to {batter}, {outcome}")
        }
        DeliveryKind::Extra { kind, runs } => {
            let plural = if *runs == 1 { "" } else { "s" };
            format!("{bowler}, {kind}, {runs} run{plural}")
        }
        DeliveryKind::Wicket(detail) => {
            let dismissed = roster.display_name(&detail.dismissed);
            let next = match &detail.incoming {
                Some(id) => format!("{} comes in", roster.display_name(id)),
                None => "no batter to come in".to_string(),
            };
            format!("{bowler} to {dismissed}, OUT ({}); {next}", detail.how)
        }
    }
}

/// Maidens per bowler: six legal balls from one bowler with nothing
/// conceded, counting any wides or no-balls bowled within that over.
fn maidens(events: &[DeliveryEvent]) -> BTreeMap<PlayerId, u32> {
    let mut maidens = BTreeMap::new();
    let mut over_bowler: Option<&PlayerId> = None;
    let mut single_bowler = true;
    let mut conceded = 0u32;
    let mut legal = 0u32;

    for event in events {
        match over_bowler {
            None => over_bowler = Some(&event.bowler),
            Some(bowler) if bowler != &event.bowler => single_bowler = false,
            Some(_) => {}
        }
        conceded += event.runs;
        if !event.legal {
            continue;
        }
        legal += 1;
        if legal == BALLS_PER_OVER {
            if let (Some(bowler), true, 0) = (over_bowler, single_bowler, conceded) {
                *maidens.entry(bowler.clone()).or_insert(0) += 1;
            }
            over_bowler = None;
            single_bowler = true;
            conceded = 0;
            legal = 0;
        }
    }
    maidens
}

#[cfg(test)]
mod tests {
    use crease_roster::{InMemoryRoster, StatTally};
    use crease_types::TeamId;

    use super::*;

    fn pid(s: &str) -> PlayerId {
        PlayerId::new(s).unwrap()
    }

    fn setup() -> (InMemoryRoster, Innings) {
        let mut roster = InMemoryRoster::new();
        let side = TeamId::new("alpha").unwrap();
        roster.add_team_with_id(side.clone(), "Alpha XI").unwrap();
        let order: Vec<PlayerId> = (1..=4)
            .map(|i| {
                roster
                    .add_player_with_id(pid(&format!("bat{i}")), &side, &format!("Batter {i}"), "")
                    .unwrap()
            })
            .collect();
        let mut innings = Innings::create(side, order, 20).unwrap();
        innings.set_bowler(pid("bowl1")).unwrap();
        (roster, innings)
    }

    #[test]
    fn summary_reports_score_line() {
        let (_, mut innings) = setup();
        let mut stats = StatTally::new();
        innings.apply_run(4, &mut stats).unwrap();
        innings.apply_extra(ExtraKind::Wide, 1).unwrap();

        let summary = ProjectionBuilder::summary(&innings);
        assert_eq!(summary.score_line(), "5/0 (0.1/20 ov)");
        assert_eq!(summary.extras, 1);
        assert_eq!(summary.balls_remaining, 119);
        assert_eq!(summary.striker, Some(pid("bat1")));
    }

    #[test]
    fn batting_card_tracks_statuses() {
        let (roster, mut innings) = setup();
        let mut stats = StatTally::new();
        innings.apply_run(6, &mut stats).unwrap();
        innings.apply_run(1, &mut stats).unwrap();
        innings
            .apply_wicket(pid("bat2"), DismissalKind::Caught, None, &mut stats)
            .unwrap();

        let card = ProjectionBuilder::batting_card(&innings, &roster);
        assert_eq!(card.batting_side, "Alpha XI");
        assert_eq!(card.rows.len(), 4);

        let bat1 = &card.rows[0];
        assert_eq!(bat1.name, "Batter 1");
        assert_eq!((bat1.line.runs, bat1.line.balls, bat1.line.sixes), (7, 2, 1));
        assert_eq!(bat1.status, BatterStatus::NotOut { end: CreaseEnd::NonStriker });

        let bat2 = &card.rows[1];
        assert_eq!(bat2.line.balls, 1);
        assert_eq!(
            bat2.status,
            BatterStatus::Out {
                how: DismissalKind::Caught,
                bowler: pid("bowl1")
            }
        );
        assert_eq!(card.rows[2].status, BatterStatus::NotOut { end: CreaseEnd::Striker });
        assert_eq!(card.rows[3].status, BatterStatus::DidNotBat);
    }

    #[test]
    fn batting_card_lists_substitutes_and_retirements() {
        let (roster, mut innings) = setup();
        let mut stats = StatTally::new();
        innings.apply_run(0, &mut stats).unwrap();
        innings.set_striker(Some(pid("guest"))).unwrap();
        innings.apply_run(2, &mut stats).unwrap();

        let card = ProjectionBuilder::batting_card(&innings, &roster);
        assert_eq!(card.rows[0].status, BatterStatus::Retired);
        let guest = card.rows.last().unwrap();
        assert_eq!(guest.player, pid("guest"));
        assert_eq!(guest.name, "guest");
        assert_eq!(guest.line.runs, 2);
    }

    #[test]
    fn bowling_card_counts_maidens() {
        let (roster, mut innings) = setup();
        let mut stats = StatTally::new();
        for _ in 0..6 {
            innings.apply_run(0, &mut stats).unwrap();
        }
        innings.set_bowler(pid("bowl2")).unwrap();
        innings.apply_extra(ExtraKind::Wide, 1).unwrap();
        for _ in 0..6 {
            innings.apply_run(0, &mut stats).unwrap();
        }

        let card = ProjectionBuilder::bowling_card(&innings, &roster);
        assert_eq!(card.rows.len(), 2);
        assert_eq!(card.rows[0].maidens, 1);
        assert_eq!(card.rows[0].overs, OverCount { overs: 1, balls: 0 });
        // The wide spoils the second over.
        assert_eq!(card.rows[1].maidens, 0);
        assert_eq!(card.rows[1].wides, 1);
        assert_eq!(card.rows[1].runs, 1);
    }

    #[test]
    fn over_shared_between_bowlers_is_not_a_maiden() {
        let (roster, mut innings) = setup();
        let mut stats = StatTally::new();
        for _ in 0..3 {
            innings.apply_run(0, &mut stats).unwrap();
        }
        innings.set_bowler(pid("bowl2")).unwrap();
        for _ in 0..3 {
            innings.apply_run(0, &mut stats).unwrap();
        }
        let card = ProjectionBuilder::bowling_card(&innings, &roster);
        assert!(card.rows.iter().all(|r| r.maidens == 0));
    }

    #[test]
    fn extras_breakdown_by_kind() {
        let (_, mut innings) = setup();
        innings.apply_extra(ExtraKind::Bye, 2).unwrap();
        innings.apply_extra(ExtraKind::LegBye, 1).unwrap();
        innings.apply_extra(ExtraKind::Wide, 1).unwrap();
        innings.apply_extra(ExtraKind::NoBall, 1).unwrap();
        let extras = ProjectionBuilder::extras(&innings);
        assert_eq!(
            extras,
            ExtrasBreakdown {
                byes: 2,
                leg_byes: 1,
                wides: 1,
                no_balls: 1
            }
        );
        assert_eq!(extras.total(), 5);
    }

    #[test]
    fn commentary_numbers_balls() {
        let (roster, mut innings) = setup();
        let mut stats = StatTally::new();
        innings.apply_run(4, &mut stats).unwrap();
        innings.apply_extra(ExtraKind::Wide, 1).unwrap();
        innings.apply_run(1, &mut stats).unwrap();
        innings
            .apply_wicket(pid("bat2"), DismissalKind::Bowled, None, &mut stats)
            .unwrap();

        let lines = ProjectionBuilder::commentary(&innings, &roster);
        let balls: Vec<&str> = lines.iter().map(|l| l.ball.as_str()).collect();
        assert_eq!(balls, vec!["0.3", "0.2", "0.2", "0.1"]);
        assert_eq!(lines[0].seq, 4);
        assert_eq!(lines[0].text, "bowl1 to Batter 2, OUT (bowled); Batter 3 comes in");
        assert_eq!(lines[2].text, "bowl1, wide, 1 run");
        assert_eq!(lines[3].text, "bowl1 to Batter 1, FOUR");
    }
}
