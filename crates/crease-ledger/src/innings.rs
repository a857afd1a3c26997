use chrono::Utc;
use crease_roster::StatsWriter;
use crease_types::{
    run_rate, DismissalKind, ExtraKind, InningsId, OverCount, PlayerId, StatLine, TeamId,
    BALLS_PER_OVER,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::LedgerError;
use crate::records::{Crease, DeliveryEvent, DeliveryKind, IncomingSource, WicketDetail};

/// Wickets that end an innings unless configured otherwise.
pub const DEFAULT_MAX_WICKETS: u32 = 10;

/// Fixed limits of an innings.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InningsConfig {
    /// Overs available to the batting side. Must be positive.
    pub over_limit: u32,
    /// Wickets at which the side is all out. Must be positive.
    pub max_wickets: u32,
}

impl InningsConfig {
    pub const fn new(over_limit: u32) -> Self {
        Self {
            over_limit,
            max_wickets: DEFAULT_MAX_WICKETS,
        }
    }

    pub const fn with_max_wickets(mut self, max_wickets: u32) -> Self {
        self.max_wickets = max_wickets;
        self
    }

    /// Legal deliveries available in the innings, saturating at `u32::MAX`.
    pub const fn legal_ball_limit(&self) -> u32 {
        self.over_limit.saturating_mul(BALLS_PER_OVER)
    }
}

/// Why an innings ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CompletionReason {
    AllOut,
    OversExhausted,
    /// The chasing side passed its target.
    TargetReached,
    /// Ended explicitly by the caller.
    Declared,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InningsStatus {
    Open,
    Completed(CompletionReason),
}

impl InningsStatus {
    pub const fn is_complete(self) -> bool {
        matches!(self, Self::Completed(_))
    }
}

/// Running figures for one bowler in this innings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BowlerFigures {
    pub bowler: PlayerId,
    pub legal_balls: u32,
    pub runs_conceded: u32,
    pub wickets: u32,
}

impl BowlerFigures {
    fn new(bowler: PlayerId) -> Self {
        Self {
            bowler,
            legal_balls: 0,
            runs_conceded: 0,
            wickets: 0,
        }
    }

    fn record(&mut self, runs: u32, legal: bool, wickets: u32) {
        if legal {
            self.legal_balls += 1;
        }
        self.runs_conceded += runs;
        self.wickets += wickets;
    }

    fn unrecord(&mut self, runs: u32, legal: bool, wickets: u32) {
        if legal {
            self.legal_balls = self.legal_balls.saturating_sub(1);
        }
        self.runs_conceded = self.runs_conceded.saturating_sub(runs);
        self.wickets = self.wickets.saturating_sub(wickets);
    }

    pub const fn overs(&self) -> OverCount {
        OverCount::from_legal_balls(self.legal_balls)
    }

    /// Runs conceded per six legal balls.
    pub fn economy(&self) -> f64 {
        run_rate(self.runs_conceded, self.legal_balls)
    }
}

/// Everything about an innings that replaying its log must reproduce.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Aggregates {
    pub progress: OverCount,
    pub runs: u32,
    pub wickets: u32,
    /// The crease as left by the last delivery.
    pub crease: Crease,
    pub figures: Vec<BowlerFigures>,
    pub next_batter: usize,
    pub status: InningsStatus,
}

/// One innings' live state and its append-only delivery log.
///
/// All mutation goes through [`apply_run`](Self::apply_run),
/// [`apply_extra`](Self::apply_extra), [`apply_wicket`](Self::apply_wicket)
/// and [`undo_last`](Self::undo_last), plus the crease and bowler
/// assignments a scorer makes between deliveries. Every operation validates
/// before it mutates, so a failed call changes nothing.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Innings {
    id: InningsId,
    batting_side: TeamId,
    config: InningsConfig,
    batting_order: Vec<PlayerId>,
    progress: OverCount,
    runs: u32,
    wickets: u32,
    crease: Crease,
    bowler: Option<PlayerId>,
    figures: Vec<BowlerFigures>,
    next_batter: usize,
    events: Vec<DeliveryEvent>,
    status: InningsStatus,
}

impl Innings {
    /// Open an innings with the default wicket cap.
    ///
    /// The first two entries of `batting_order` open the batting; with fewer
    /// than two entries the missing slots start empty and must be assigned
    /// before a run can be scored.
    pub fn create(
        batting_side: TeamId,
        batting_order: Vec<PlayerId>,
        over_limit: u32,
    ) -> Result<Self, LedgerError> {
        Self::with_config(batting_side, batting_order, InningsConfig::new(over_limit))
    }

    pub fn with_config(
        batting_side: TeamId,
        batting_order: Vec<PlayerId>,
        config: InningsConfig,
    ) -> Result<Self, LedgerError> {
        Self::build(InningsId::new(), batting_side, batting_order, config)
    }

    pub(crate) fn build(
        id: InningsId,
        batting_side: TeamId,
        batting_order: Vec<PlayerId>,
        config: InningsConfig,
    ) -> Result<Self, LedgerError> {
        if config.over_limit == 0 {
            return Err(LedgerError::invalid("over limit must be positive"));
        }
        if config.max_wickets == 0 {
            return Err(LedgerError::invalid("wicket cap must be positive"));
        }
        for (index, player) in batting_order.iter().enumerate() {
            if batting_order[..index].contains(player) {
                return Err(LedgerError::invalid(format!(
                    "{player} appears twice in the batting order"
                )));
            }
        }

        let crease = initial_crease(&batting_order);
        Ok(Self {
            id,
            batting_side,
            config,
            batting_order,
            progress: OverCount::zero(),
            runs: 0,
            wickets: 0,
            crease,
            bowler: None,
            figures: Vec::new(),
            next_batter: 2,
            events: Vec::new(),
            status: InningsStatus::Open,
        })
    }

    // ---- Crease and bowler assignment ----

    pub fn set_bowler(&mut self, bowler: PlayerId) -> Result<(), LedgerError> {
        self.ensure_open()?;
        if self.crease.contains(&bowler) {
            return Err(LedgerError::invalid(format!("{bowler} is batting")));
        }
        self.bowler = Some(bowler);
        Ok(())
    }

    /// Assign (or clear) the striker.
    pub fn set_striker(&mut self, striker: Option<PlayerId>) -> Result<(), LedgerError> {
        self.ensure_open()?;
        if let Some(id) = &striker {
            self.ensure_can_bat(id, self.crease.non_striker.as_ref())?;
        }
        self.crease.striker = striker;
        Ok(())
    }

    /// Assign (or clear) the non-striker.
    pub fn set_non_striker(&mut self, non_striker: Option<PlayerId>) -> Result<(), LedgerError> {
        self.ensure_open()?;
        if let Some(id) = &non_striker {
            self.ensure_can_bat(id, self.crease.striker.as_ref())?;
        }
        self.crease.non_striker = non_striker;
        Ok(())
    }

    // ---- Deliveries ----

    /// Record a legal delivery off which the striker scored `runs`.
    pub fn apply_run<S: StatsWriter + ?Sized>(
        &mut self,
        runs: u32,
        stats: &mut S,
    ) -> Result<&DeliveryEvent, LedgerError> {
        self.ensure_open()?;
        let striker = self
            .crease
            .striker
            .clone()
            .ok_or_else(|| LedgerError::invalid("no striker assigned"))?;
        let bowler = self.require_bowler()?;
        let total = self.checked_total(runs)?;

        let crease_before = self.crease.clone();
        self.advance_legal_ball();
        self.runs = total;
        self.figures_for(&bowler).record(runs, true, 0);
        stats.credit(&striker, &StatLine::batting(runs));
        // Independent of the end-of-over swap; the two may cancel out.
        if runs % 2 == 1 {
            self.crease.swap();
        }

        Ok(self.append(DeliveryKind::Run { runs }, Some(striker), bowler, crease_before))
    }

    /// Record an extra. Byes and leg-byes count toward the over; wides and
    /// no-balls do not. No batter is credited and strike does not rotate.
    pub fn apply_extra(&mut self, kind: ExtraKind, runs: u32) -> Result<&DeliveryEvent, LedgerError> {
        self.ensure_open()?;
        let bowler = self.require_bowler()?;
        let total = self.checked_total(runs)?;

        let crease_before = self.crease.clone();
        let legal = kind.is_legal();
        if legal {
            self.advance_legal_ball();
        }
        self.runs = total;
        self.figures_for(&bowler).record(runs, legal, 0);

        Ok(self.append(DeliveryKind::Extra { kind, runs }, None, bowler, crease_before))
    }

    /// Record a dismissal on a legal delivery.
    ///
    /// Without an explicit `incoming` batter the next unused entry of the
    /// batting order walks in; once the order is exhausted the slot is left
    /// empty until the caller assigns someone.
    pub fn apply_wicket<S: StatsWriter + ?Sized>(
        &mut self,
        dismissed: PlayerId,
        how: DismissalKind,
        incoming: Option<PlayerId>,
        stats: &mut S,
    ) -> Result<&DeliveryEvent, LedgerError> {
        self.ensure_open()?;
        let bowler = self.require_bowler()?;
        let end = self
            .crease
            .end_of(&dismissed)
            .ok_or_else(|| LedgerError::invalid(format!("{dismissed} is not at the crease")))?;

        let (incoming, source) = match incoming {
            Some(id) => (Some(id), IncomingSource::Explicit),
            None => match self.batting_order.get(self.next_batter) {
                Some(id) => (
                    Some(id.clone()),
                    IncomingSource::BattingOrder {
                        slot: self.next_batter,
                    },
                ),
                None => (None, IncomingSource::Exhausted),
            },
        };
        if let Some(id) = &incoming {
            if id == &dismissed || self.crease.contains(id) {
                return Err(LedgerError::invalid(format!(
                    "incoming batter {id} is already at the crease"
                )));
            }
            if self.bowler.as_ref() == Some(id) {
                return Err(LedgerError::invalid(format!("incoming batter {id} is bowling")));
            }
            if self.was_dismissed(id) {
                return Err(LedgerError::invalid(format!(
                    "incoming batter {id} is already out"
                )));
            }
        }

        let crease_before = self.crease.clone();
        let end = if self.advance_legal_ball() {
            end.opposite()
        } else {
            end
        };
        *self.crease.slot_mut(end) = incoming.clone();
        if let IncomingSource::BattingOrder { slot } = source {
            self.next_batter = slot + 1;
        }
        self.wickets += 1;
        self.figures_for(&bowler).record(0, true, 1);
        stats.credit(&dismissed, &StatLine::ball_faced());
        stats.credit(&bowler, &StatLine::wicket_taken());

        let detail = WicketDetail {
            dismissed: dismissed.clone(),
            how,
            end,
            incoming,
            source,
        };
        Ok(self.append(DeliveryKind::Wicket(detail), Some(dismissed), bowler, crease_before))
    }

    /// Pop the most recent delivery and reverse everything it changed.
    ///
    /// The popped delivery was recorded against an open innings, so the
    /// innings is open again afterwards. The crease and the current bowler
    /// go back to what they were just before that delivery.
    pub fn undo_last<S: StatsWriter + ?Sized>(
        &mut self,
        stats: &mut S,
    ) -> Result<DeliveryEvent, LedgerError> {
        let event = self.events.pop().ok_or(LedgerError::EmptyLog)?;

        if event.legal {
            self.progress = OverCount::from_legal_balls(self.progress.legal_balls().saturating_sub(1));
        }
        self.runs = self.runs.saturating_sub(event.runs);

        let wickets = match &event.kind {
            DeliveryKind::Run { runs } => {
                if let Some(batter) = &event.batter {
                    stats.debit(batter, &StatLine::batting(*runs));
                }
                0
            }
            DeliveryKind::Extra { .. } => 0,
            DeliveryKind::Wicket(detail) => {
                self.wickets = self.wickets.saturating_sub(1);
                stats.debit(&detail.dismissed, &StatLine::ball_faced());
                stats.debit(&event.bowler, &StatLine::wicket_taken());
                if let IncomingSource::BattingOrder { slot } = detail.source {
                    self.next_batter = slot;
                }
                1
            }
        };
        self.unrecord_figures(&event.bowler, event.runs, event.legal, wickets);

        self.crease = event.crease.clone();
        self.bowler = Some(event.bowler.clone());
        self.status = InningsStatus::Open;

        debug!(
            innings = %self.id.short_id(),
            seq = event.seq,
            kind = event.kind.label(),
            "delivery undone"
        );
        Ok(event)
    }

    /// End the innings before its limits are reached.
    pub fn end_innings(&mut self) -> Result<(), LedgerError> {
        self.close(CompletionReason::Declared)
    }

    /// Close an open innings for a reason the log alone does not imply.
    pub fn close(&mut self, reason: CompletionReason) -> Result<(), LedgerError> {
        self.ensure_open()?;
        self.status = InningsStatus::Completed(reason);
        info!(
            innings = %self.id.short_id(),
            runs = self.runs,
            wickets = self.wickets,
            reason = ?reason,
            "innings closed"
        );
        Ok(())
    }

    // ---- Read access ----

    pub fn id(&self) -> InningsId {
        self.id
    }

    pub fn batting_side(&self) -> &TeamId {
        &self.batting_side
    }

    pub fn config(&self) -> InningsConfig {
        self.config
    }

    pub fn batting_order(&self) -> &[PlayerId] {
        &self.batting_order
    }

    pub fn progress(&self) -> OverCount {
        self.progress
    }

    pub fn overs(&self) -> u32 {
        self.progress.overs
    }

    pub fn balls(&self) -> u32 {
        self.progress.balls
    }

    pub fn runs(&self) -> u32 {
        self.runs
    }

    pub fn wickets(&self) -> u32 {
        self.wickets
    }

    pub fn crease(&self) -> &Crease {
        &self.crease
    }

    pub fn striker(&self) -> Option<&PlayerId> {
        self.crease.striker.as_ref()
    }

    pub fn non_striker(&self) -> Option<&PlayerId> {
        self.crease.non_striker.as_ref()
    }

    pub fn bowler(&self) -> Option<&PlayerId> {
        self.bowler.as_ref()
    }

    /// Bowler figures in order of first appearance.
    pub fn figures(&self) -> &[BowlerFigures] {
        &self.figures
    }

    pub fn figures_of(&self, bowler: &PlayerId) -> Option<&BowlerFigures> {
        self.figures.iter().find(|f| &f.bowler == bowler)
    }

    /// Index of the next unused batting-order entry.
    pub fn next_batter(&self) -> usize {
        self.next_batter
    }

    pub fn events(&self) -> &[DeliveryEvent] {
        &self.events
    }

    pub fn last_event(&self) -> Option<&DeliveryEvent> {
        self.events.last()
    }

    pub fn status(&self) -> InningsStatus {
        self.status
    }

    pub fn is_complete(&self) -> bool {
        self.status.is_complete()
    }

    pub fn legal_balls_remaining(&self) -> u32 {
        self.config.legal_ball_limit().saturating_sub(self.progress.legal_balls())
    }

    /// Runs per six legal balls so far.
    pub fn run_rate(&self) -> f64 {
        run_rate(self.runs, self.progress.legal_balls())
    }

    /// The crease the batting order opens with.
    pub fn opening_crease(&self) -> Crease {
        initial_crease(&self.batting_order)
    }

    /// The log-derived state, for comparison against a replay.
    pub fn aggregates(&self) -> Aggregates {
        Aggregates {
            progress: self.progress,
            runs: self.runs,
            wickets: self.wickets,
            crease: self
                .events
                .last()
                .map(|e| e.crease_after.clone())
                .unwrap_or_else(|| self.opening_crease()),
            figures: self.figures.clone(),
            next_batter: self.next_batter,
            status: self.status,
        }
    }

    /// BLAKE3 digest of the event log.
    pub fn log_digest(&self) -> Result<[u8; 32], LedgerError> {
        let encoded = serde_json::to_vec(&self.events)
            .map_err(|e| LedgerError::Serialization(e.to_string()))?;
        let mut hasher = blake3::Hasher::new();
        hasher.update(b"crease-log-v1:");
        hasher.update(&encoded);
        Ok(*hasher.finalize().as_bytes())
    }

    // ---- Internals ----

    /// Put the crease and bowler as they stood before a logged delivery.
    pub(crate) fn place(&mut self, crease: Crease, bowler: PlayerId) {
        self.crease = crease;
        self.bowler = Some(bowler);
    }

    fn ensure_open(&self) -> Result<(), LedgerError> {
        if self.status.is_complete() {
            return Err(LedgerError::InningsComplete);
        }
        Ok(())
    }

    fn ensure_can_bat(&self, id: &PlayerId, partner: Option<&PlayerId>) -> Result<(), LedgerError> {
        if partner == Some(id) {
            return Err(LedgerError::invalid(format!("{id} is already at the other end")));
        }
        if self.bowler.as_ref() == Some(id) {
            return Err(LedgerError::invalid(format!("{id} is bowling")));
        }
        if self.was_dismissed(id) {
            return Err(LedgerError::invalid(format!("{id} is already out")));
        }
        Ok(())
    }

    fn was_dismissed(&self, id: &PlayerId) -> bool {
        self.events
            .iter()
            .filter_map(DeliveryEvent::wicket)
            .any(|w| &w.dismissed == id)
    }

    fn require_bowler(&self) -> Result<PlayerId, LedgerError> {
        self.bowler
            .clone()
            .ok_or_else(|| LedgerError::invalid("no bowler assigned"))
    }

    fn checked_total(&self, runs: u32) -> Result<u32, LedgerError> {
        self.runs
            .checked_add(runs)
            .ok_or_else(|| LedgerError::invalid("run total overflow"))
    }

    /// Count one legal ball. Returns `true` when it closed the over, in which
    /// case the batters have already changed ends.
    fn advance_legal_ball(&mut self) -> bool {
        self.progress = OverCount::from_legal_balls(self.progress.legal_balls() + 1);
        if self.progress.at_over_boundary() {
            self.crease.swap();
            return true;
        }
        false
    }

    fn figures_for(&mut self, bowler: &PlayerId) -> &mut BowlerFigures {
        let index = match self.figures.iter().position(|f| &f.bowler == bowler) {
            Some(index) => index,
            None => {
                self.figures.push(BowlerFigures::new(bowler.clone()));
                self.figures.len() - 1
            }
        };
        &mut self.figures[index]
    }

    fn unrecord_figures(&mut self, bowler: &PlayerId, runs: u32, legal: bool, wickets: u32) {
        let Some(index) = self.figures.iter().position(|f| &f.bowler == bowler) else {
            return;
        };
        self.figures[index].unrecord(runs, legal, wickets);
        // The entry was created by the popped delivery.
        if !self.events.iter().any(|e| &e.bowler == bowler) {
            self.figures.remove(index);
        }
    }

    fn append(
        &mut self,
        kind: DeliveryKind,
        batter: Option<PlayerId>,
        bowler: PlayerId,
        crease: Crease,
    ) -> &DeliveryEvent {
        let event = DeliveryEvent {
            seq: self.events.len() as u64 + 1,
            runs: kind.runs(),
            legal: kind.is_legal(),
            kind,
            batter,
            bowler,
            crease,
            crease_after: self.crease.clone(),
            recorded_at: Utc::now(),
        };
        debug!(
            innings = %self.id.short_id(),
            seq = event.seq,
            kind = event.kind.label(),
            runs = event.runs,
            score = %format!("{}/{}", self.runs, self.wickets),
            overs = %self.progress,
            "delivery applied"
        );

        let index = self.events.len();
        self.events.push(event);
        self.check_completion();
        &self.events[index]
    }

    fn check_completion(&mut self) {
        let reason = if self.wickets >= self.config.max_wickets {
            CompletionReason::AllOut
        } else if self.progress.overs >= self.config.over_limit && self.progress.at_over_boundary() {
            CompletionReason::OversExhausted
        } else {
            return;
        };
        self.status = InningsStatus::Completed(reason);
        info!(
            innings = %self.id.short_id(),
            runs = self.runs,
            wickets = self.wickets,
            overs = %self.progress,
            reason = ?reason,
            "innings completed"
        );
    }
}

fn initial_crease(batting_order: &[PlayerId]) -> Crease {
    Crease::new(batting_order.first().cloned(), batting_order.get(1).cloned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crease_roster::StatTally;

    use crate::records::CreaseEnd;

    fn pid(s: &str) -> PlayerId {
        PlayerId::new(s).unwrap()
    }

    fn order() -> Vec<PlayerId> {
        (1..=11).map(|i| pid(&format!("bat{i}"))).collect()
    }

    fn innings(over_limit: u32) -> Innings {
        let mut innings =
            Innings::create(TeamId::new("alpha").unwrap(), order(), over_limit).unwrap();
        innings.set_bowler(pid("bowl1")).unwrap();
        innings
    }

    #[test]
    fn create_opens_with_first_two_batters() {
        let innings = Innings::create(TeamId::new("alpha").unwrap(), order(), 20).unwrap();
        assert_eq!(innings.striker(), Some(&pid("bat1")));
        assert_eq!(innings.non_striker(), Some(&pid("bat2")));
        assert_eq!(innings.bowler(), None);
        assert_eq!(innings.next_batter(), 2);
        assert_eq!(innings.progress(), OverCount::zero());
        assert_eq!(innings.status(), InningsStatus::Open);
    }

    #[test]
    fn create_rejects_zero_over_limit_and_duplicates() {
        let side = TeamId::new("alpha").unwrap();
        assert!(matches!(
            Innings::create(side.clone(), order(), 0),
            Err(LedgerError::InvalidState { .. })
        ));
        let dup = vec![pid("a"), pid("b"), pid("a")];
        assert!(Innings::create(side, dup, 5).is_err());
    }

    #[test]
    fn short_batting_order_leaves_slots_empty() {
        let innings = Innings::create(TeamId::new("solo").unwrap(), vec![pid("only")], 5).unwrap();
        assert_eq!(innings.striker(), Some(&pid("only")));
        assert_eq!(innings.non_striker(), None);
    }

    #[test]
    fn run_requires_striker_and_bowler() {
        let mut stats = StatTally::new();
        let mut innings = Innings::create(TeamId::new("alpha").unwrap(), order(), 20).unwrap();
        let err = innings.apply_run(1, &mut stats).unwrap_err();
        assert!(matches!(err, LedgerError::InvalidState { .. }));

        innings.set_bowler(pid("bowl1")).unwrap();
        innings.set_striker(None).unwrap();
        let err = innings.apply_run(1, &mut stats).unwrap_err();
        assert!(matches!(err, LedgerError::InvalidState { .. }));
        assert!(innings.events().is_empty());
        assert!(stats.is_empty());
    }

    #[test]
    fn run_credits_striker_and_bowler() {
        let mut stats = StatTally::new();
        let mut innings = innings(20);
        innings.apply_run(4, &mut stats).unwrap();

        assert_eq!(innings.runs(), 4);
        assert_eq!(innings.progress(), OverCount { overs: 0, balls: 1 });
        let bat1 = stats.get(&pid("bat1"));
        assert_eq!((bat1.runs, bat1.balls, bat1.fours), (4, 1, 1));
        let figures = innings.figures_of(&pid("bowl1")).unwrap();
        assert_eq!((figures.legal_balls, figures.runs_conceded), (1, 4));
        // Even runs keep the strike.
        assert_eq!(innings.striker(), Some(&pid("bat1")));
    }

    #[test]
    fn odd_runs_rotate_strike() {
        let mut stats = StatTally::new();
        let mut innings = innings(20);
        innings.apply_run(3, &mut stats).unwrap();
        assert_eq!(innings.striker(), Some(&pid("bat2")));
        assert_eq!(innings.non_striker(), Some(&pid("bat1")));

        let event = innings.last_event().unwrap();
        assert_eq!(event.batter, Some(pid("bat1")));
        assert_eq!(event.crease.striker, Some(pid("bat1")));
        assert_eq!(event.crease_after.striker, Some(pid("bat2")));
    }

    #[test]
    fn six_legal_balls_close_the_over_and_swap_ends() {
        let mut stats = StatTally::new();
        let mut innings = innings(20);
        for _ in 0..5 {
            innings.apply_run(0, &mut stats).unwrap();
        }
        assert_eq!(innings.progress(), OverCount { overs: 0, balls: 5 });
        let before = innings.crease().clone();

        innings.apply_run(0, &mut stats).unwrap();
        assert_eq!(innings.progress(), OverCount { overs: 1, balls: 0 });
        assert_eq!(innings.striker(), before.non_striker.as_ref());
        assert_eq!(innings.non_striker(), before.striker.as_ref());
    }

    #[test]
    fn single_off_last_ball_keeps_strike() {
        let mut stats = StatTally::new();
        let mut innings = innings(20);
        for _ in 0..5 {
            innings.apply_run(0, &mut stats).unwrap();
        }
        innings.apply_run(1, &mut stats).unwrap();
        // Over-end swap and odd-run swap cancel.
        assert_eq!(innings.striker(), Some(&pid("bat1")));
    }

    #[test]
    fn one_over_innings_of_singles_completes() {
        let mut stats = StatTally::new();
        let mut innings = innings(1);
        for i in 0..6 {
            let expected = if i % 2 == 0 { "bat1" } else { "bat2" };
            assert_eq!(innings.striker(), Some(&pid(expected)));
            innings.apply_run(1, &mut stats).unwrap();
        }

        assert_eq!(innings.runs(), 6);
        assert_eq!(innings.progress(), OverCount { overs: 1, balls: 0 });
        assert_eq!(
            innings.status(),
            InningsStatus::Completed(CompletionReason::OversExhausted)
        );
        assert_eq!(
            innings.apply_run(1, &mut stats).unwrap_err(),
            LedgerError::InningsComplete
        );
        assert_eq!(innings.events().len(), 6);
    }

    #[test]
    fn wide_does_not_count_toward_the_over() {
        let mut innings = innings(20);
        innings.apply_extra(ExtraKind::Wide, 1).unwrap();

        assert_eq!(innings.runs(), 1);
        assert_eq!(innings.progress(), OverCount::zero());
        let figures = innings.figures_of(&pid("bowl1")).unwrap();
        assert_eq!(figures.runs_conceded, 1);
        assert_eq!(figures.legal_balls, 0);
        let event = innings.last_event().unwrap();
        assert!(!event.legal);
        assert_eq!(event.batter, None);
    }

    #[test]
    fn byes_count_toward_the_over_without_batter_credit() {
        let mut innings = innings(20);
        innings.apply_extra(ExtraKind::Bye, 3).unwrap();

        assert_eq!(innings.runs(), 3);
        assert_eq!(innings.progress(), OverCount { overs: 0, balls: 1 });
        // No rotation on extras.
        assert_eq!(innings.striker(), Some(&pid("bat1")));
        assert_eq!(innings.figures_of(&pid("bowl1")).unwrap().legal_balls, 1);
    }

    #[test]
    fn extra_requires_bowler() {
        let mut innings = Innings::create(TeamId::new("alpha").unwrap(), order(), 20).unwrap();
        let err = innings.apply_extra(ExtraKind::NoBall, 1).unwrap_err();
        assert!(matches!(err, LedgerError::InvalidState { .. }));
    }

    #[test]
    fn wicket_brings_in_next_batter_from_order() {
        let mut stats = StatTally::new();
        let mut innings = innings(20);
        innings.apply_run(2, &mut stats).unwrap();
        innings
            .apply_wicket(pid("bat1"), DismissalKind::Bowled, None, &mut stats)
            .unwrap();

        assert_eq!(innings.wickets(), 1);
        assert_eq!(innings.striker(), Some(&pid("bat3")));
        assert_eq!(innings.next_batter(), 3);
        assert_eq!(innings.figures_of(&pid("bowl1")).unwrap().wickets, 1);
        assert_eq!(stats.get(&pid("bat1")).balls, 2);
        assert_eq!(stats.get(&pid("bowl1")).wickets, 1);

        let detail = innings.last_event().unwrap().wicket().unwrap();
        assert_eq!(detail.source, IncomingSource::BattingOrder { slot: 2 });
        assert_eq!(detail.end, CreaseEnd::Striker);
    }

    #[test]
    fn wicket_of_non_striker_replaces_that_end() {
        let mut stats = StatTally::new();
        let mut innings = innings(20);
        innings
            .apply_wicket(pid("bat2"), DismissalKind::RunOut, Some(pid("bat7")), &mut stats)
            .unwrap();

        assert_eq!(innings.striker(), Some(&pid("bat1")));
        assert_eq!(innings.non_striker(), Some(&pid("bat7")));
        // Explicit incoming leaves the order cursor alone.
        assert_eq!(innings.next_batter(), 2);
    }

    #[test]
    fn wicket_on_last_ball_of_over_fills_the_rotated_slot() {
        let mut stats = StatTally::new();
        let mut innings = innings(20);
        for _ in 0..5 {
            innings.apply_run(0, &mut stats).unwrap();
        }
        innings
            .apply_wicket(pid("bat1"), DismissalKind::Caught, None, &mut stats)
            .unwrap();

        // bat1 was striker, the over ended, so bat1's slot was non-striker.
        assert_eq!(innings.striker(), Some(&pid("bat2")));
        assert_eq!(innings.non_striker(), Some(&pid("bat3")));
        let detail = innings.last_event().unwrap().wicket().unwrap();
        assert_eq!(detail.end, CreaseEnd::NonStriker);
    }

    #[test]
    fn wicket_requires_dismissed_batter_at_crease() {
        let mut stats = StatTally::new();
        let mut innings = innings(20);
        let before = innings.clone();
        let err = innings
            .apply_wicket(pid("bat9"), DismissalKind::Bowled, None, &mut stats)
            .unwrap_err();
        assert!(matches!(err, LedgerError::InvalidState { .. }));
        assert_eq!(innings, before);
        assert!(stats.is_empty());
    }

    #[test]
    fn incoming_batter_already_batting_is_rejected() {
        let mut stats = StatTally::new();
        let mut innings = innings(20);
        let err = innings
            .apply_wicket(pid("bat1"), DismissalKind::Bowled, Some(pid("bat2")), &mut stats)
            .unwrap_err();
        assert!(matches!(err, LedgerError::InvalidState { .. }));
    }

    #[test]
    fn exhausted_order_leaves_slot_empty_until_assigned() {
        let mut stats = StatTally::new();
        let side = TeamId::new("pair").unwrap();
        let config = InningsConfig::new(20).with_max_wickets(5);
        let mut innings = Innings::with_config(side, vec![pid("a"), pid("b")], config).unwrap();
        innings.set_bowler(pid("bowl1")).unwrap();

        innings
            .apply_wicket(pid("a"), DismissalKind::Lbw, None, &mut stats)
            .unwrap();
        assert_eq!(innings.striker(), None);
        assert_eq!(innings.next_batter(), 2);
        assert_eq!(
            innings.last_event().unwrap().wicket().unwrap().source,
            IncomingSource::Exhausted
        );
        assert!(matches!(
            innings.apply_run(1, &mut stats),
            Err(LedgerError::InvalidState { .. })
        ));

        innings.set_striker(Some(pid("sub"))).unwrap();
        innings.apply_run(1, &mut stats).unwrap();
        assert_eq!(innings.non_striker(), Some(&pid("sub")));
    }

    #[test]
    fn wicket_cap_ends_the_innings() {
        let mut stats = StatTally::new();
        let side = TeamId::new("alpha").unwrap();
        let config = InningsConfig::new(20).with_max_wickets(2);
        let mut innings = Innings::with_config(side, order(), config).unwrap();
        innings.set_bowler(pid("bowl1")).unwrap();

        innings.apply_wicket(pid("bat1"), DismissalKind::Bowled, None, &mut stats).unwrap();
        innings.apply_wicket(pid("bat3"), DismissalKind::Bowled, None, &mut stats).unwrap();
        assert_eq!(innings.status(), InningsStatus::Completed(CompletionReason::AllOut));
        assert_eq!(
            innings.apply_extra(ExtraKind::Wide, 1).unwrap_err(),
            LedgerError::InningsComplete
        );
    }

    #[test]
    fn undo_on_empty_log_fails() {
        let mut stats = StatTally::new();
        let mut innings = innings(20);
        assert_eq!(innings.undo_last(&mut stats).unwrap_err(), LedgerError::EmptyLog);
    }

    #[test]
    fn undo_restores_everything_for_each_kind() {
        let mut innings = innings(20);
        let mut stats = StatTally::new();
        innings.apply_run(1, &mut stats).unwrap();
        innings.apply_run(2, &mut stats).unwrap();

        let before = innings.clone();
        let stats_before = stats.clone();

        innings.apply_run(3, &mut stats).unwrap();
        innings.undo_last(&mut stats).unwrap();
        assert_eq!(innings, before);
        assert_eq!(stats, stats_before);

        innings.apply_extra(ExtraKind::LegBye, 1).unwrap();
        innings.undo_last(&mut stats).unwrap();
        assert_eq!(innings, before);

        innings.apply_extra(ExtraKind::NoBall, 1).unwrap();
        innings.undo_last(&mut stats).unwrap();
        assert_eq!(innings, before);
    }

    #[test]
    fn undo_after_wicket_restores_striker_slot() {
        let mut stats = StatTally::new();
        let mut innings = innings(20);
        innings.apply_run(2, &mut stats).unwrap();
        let before = innings.clone();
        let stats_before = stats.clone();

        innings
            .apply_wicket(pid("bat1"), DismissalKind::Caught, None, &mut stats)
            .unwrap();
        let popped = innings.undo_last(&mut stats).unwrap();

        assert!(popped.wicket().is_some());
        assert_eq!(innings.wickets(), 0);
        assert_eq!(innings.striker(), Some(&pid("bat1")));
        assert_eq!(innings.next_batter(), 2);
        assert_eq!(innings.progress(), OverCount { overs: 0, balls: 1 });
        assert_eq!(innings.figures_of(&pid("bowl1")).unwrap().wickets, 0);
        assert_eq!(innings, before);
        assert_eq!(stats, stats_before);
    }

    #[test]
    fn undo_after_non_striker_wicket_restores_non_striker_slot() {
        let mut stats = StatTally::new();
        let mut innings = innings(20);
        innings
            .apply_wicket(pid("bat2"), DismissalKind::RunOut, None, &mut stats)
            .unwrap();
        assert_eq!(innings.non_striker(), Some(&pid("bat3")));

        innings.undo_last(&mut stats).unwrap();
        assert_eq!(innings.striker(), Some(&pid("bat1")));
        assert_eq!(innings.non_striker(), Some(&pid("bat2")));
    }

    #[test]
    fn undo_rolls_back_over_and_rotation() {
        let mut stats = StatTally::new();
        let mut innings = innings(20);
        for _ in 0..5 {
            innings.apply_run(0, &mut stats).unwrap();
        }
        let before = innings.clone();
        innings.apply_run(0, &mut stats).unwrap();
        innings.undo_last(&mut stats).unwrap();
        assert_eq!(innings.progress(), OverCount { overs: 0, balls: 5 });
        assert_eq!(innings, before);
    }

    #[test]
    fn undo_reopens_completed_innings() {
        let mut stats = StatTally::new();
        let mut innings = innings(1);
        for _ in 0..6 {
            innings.apply_run(0, &mut stats).unwrap();
        }
        assert!(innings.is_complete());
        innings.undo_last(&mut stats).unwrap();
        assert_eq!(innings.status(), InningsStatus::Open);
        innings.apply_run(4, &mut stats).unwrap();
        assert!(innings.is_complete());
    }

    #[test]
    fn undo_removes_figures_created_by_the_popped_delivery() {
        let mut stats = StatTally::new();
        let mut innings = innings(20);
        innings.apply_run(0, &mut stats).unwrap();
        innings.set_bowler(pid("bowl2")).unwrap();
        innings.apply_extra(ExtraKind::Wide, 0).unwrap();
        assert_eq!(innings.figures().len(), 2);

        innings.undo_last(&mut stats).unwrap();
        assert_eq!(innings.figures().len(), 1);
        assert_eq!(innings.bowler(), Some(&pid("bowl2")));
    }

    #[test]
    fn undo_restores_bowler_at_time_of_delivery() {
        let mut stats = StatTally::new();
        let mut innings = innings(20);
        innings.apply_run(1, &mut stats).unwrap();
        innings.set_bowler(pid("bowl2")).unwrap();
        innings.undo_last(&mut stats).unwrap();
        assert_eq!(innings.bowler(), Some(&pid("bowl1")));
    }

    #[test]
    fn end_innings_declares_once() {
        let mut innings = innings(20);
        innings.end_innings().unwrap();
        assert_eq!(
            innings.status(),
            InningsStatus::Completed(CompletionReason::Declared)
        );
        assert_eq!(innings.end_innings().unwrap_err(), LedgerError::InningsComplete);
        assert_eq!(
            innings.set_bowler(pid("bowl2")).unwrap_err(),
            LedgerError::InningsComplete
        );
    }

    #[test]
    fn assignments_reject_conflicts() {
        let mut innings = innings(20);
        assert!(innings.set_striker(Some(pid("bat2"))).is_err());
        assert!(innings.set_non_striker(Some(pid("bat1"))).is_err());
        assert!(innings.set_striker(Some(pid("bowl1"))).is_err());
        assert!(innings.set_bowler(pid("bat1")).is_err());
        innings.set_striker(Some(pid("bat5"))).unwrap();
        assert_eq!(innings.striker(), Some(&pid("bat5")));
    }

    #[test]
    fn seq_numbers_are_contiguous() {
        let mut stats = StatTally::new();
        let mut innings = innings(20);
        innings.apply_run(1, &mut stats).unwrap();
        innings.apply_extra(ExtraKind::Wide, 1).unwrap();
        innings.apply_run(0, &mut stats).unwrap();
        let seqs: Vec<u64> = innings.events().iter().map(|e| e.seq).collect();
        assert_eq!(seqs, vec![1, 2, 3]);

        innings.undo_last(&mut stats).unwrap();
        innings.apply_run(2, &mut stats).unwrap();
        assert_eq!(innings.last_event().unwrap().seq, 3);
    }

    #[test]
    fn remaining_balls_and_run_rate() {
        let mut stats = StatTally::new();
        let mut innings = innings(2);
        innings.apply_run(6, &mut stats).unwrap();
        innings.apply_run(6, &mut stats).unwrap();
        innings.apply_run(6, &mut stats).unwrap();
        assert_eq!(innings.legal_balls_remaining(), 9);
        assert!((innings.run_rate() - 36.0).abs() < 1e-9);
    }

    #[test]
    fn log_digest_tracks_the_log() {
        let mut stats = StatTally::new();
        let mut innings = innings(20);
        let empty = innings.log_digest().unwrap();
        innings.apply_run(1, &mut stats).unwrap();
        assert_ne!(innings.log_digest().unwrap(), empty);
    }

    #[test]
    fn serde_roundtrip_preserves_state() {
        let mut stats = StatTally::new();
        let mut innings = innings(20);
        innings.apply_run(4, &mut stats).unwrap();
        innings
            .apply_wicket(pid("bat2"), DismissalKind::Stumped, None, &mut stats)
            .unwrap();

        let json = serde_json::to_string(&innings).unwrap();
        let parsed: Innings = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, innings);

        let bytes = bincode::serialize(&innings).unwrap();
        let decoded: Innings = bincode::deserialize(&bytes).unwrap();
        assert_eq!(decoded, innings);
    }

    #[test]
    fn huge_over_limit_saturates_the_ball_count() {
        let mut innings = innings(u32::MAX);
        assert_eq!(innings.config().legal_ball_limit(), u32::MAX);
        assert_eq!(innings.legal_balls_remaining(), u32::MAX);

        innings.apply_run(1, &mut StatTally::new()).unwrap();
        assert_eq!(innings.legal_balls_remaining(), u32::MAX - 1);
        assert_eq!(InningsConfig::new(3).legal_ball_limit(), 18);
    }

    #[test]
    fn dismissed_batter_cannot_return() {
        let mut stats = StatTally::new();
        let mut innings = innings(20);
        innings
            .apply_wicket(pid("bat1"), DismissalKind::Bowled, None, &mut stats)
            .unwrap();

        let err = innings
            .apply_wicket(pid("bat3"), DismissalKind::Caught, Some(pid("bat1")), &mut stats)
            .unwrap_err();
        assert!(matches!(err, LedgerError::InvalidState { .. }));
        assert_eq!(innings.wickets(), 1);
        assert!(innings.set_non_striker(Some(pid("bat1"))).is_err());

        // Undoing the dismissal makes the batter eligible again.
        innings.undo_last(&mut stats).unwrap();
        innings.set_striker(None).unwrap();
        innings.set_striker(Some(pid("bat1"))).unwrap();
    }
}
