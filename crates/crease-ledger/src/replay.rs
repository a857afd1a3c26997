use crease_roster::StatTally;

use crate::error::LedgerError;
use crate::innings::{Aggregates, Innings, InningsStatus};
use crate::records::{DeliveryEvent, DeliveryKind, IncomingSource};

/// Result of replaying an innings log onto a fresh innings.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReplayResult {
    pub aggregates: Aggregates,
    /// What the log credits to each player.
    pub tally: StatTally,
    pub replayed_events: u64,
    /// Sequence numbers whose recomputed crease differs from the one logged.
    pub crease_mismatches: Vec<u64>,
}

/// Deterministic replay of innings logs.
pub struct ReplayEngine;

impl ReplayEngine {
    /// Rebuild an innings from its header and event log.
    ///
    /// Before each delivery the crease and bowler are put back to the logged
    /// snapshot, so assignments the scorer made between deliveries are
    /// honoured. Wickets whose incoming batter came from the batting order are
    /// re-applied through the automatic path, which exercises the order
    /// cursor as well.
    pub fn replay(innings: &Innings) -> Result<ReplayResult, LedgerError> {
        let mut target = Innings::build(
            innings.id(),
            innings.batting_side().clone(),
            innings.batting_order().to_vec(),
            innings.config(),
        )?;
        let mut tally = StatTally::new();
        let mut crease_mismatches = Vec::new();

        for event in innings.events() {
            let recomputed = reapply(&mut target, event, &mut tally)?;
            if recomputed.crease_after != event.crease_after {
                crease_mismatches.push(event.seq);
            }
        }
        if let InningsStatus::Completed(reason) = innings.status() {
            if !target.is_complete() {
                target.close(reason)?;
            }
        }

        Ok(ReplayResult {
            aggregates: target.aggregates(),
            tally,
            replayed_events: innings.events().len() as u64,
            crease_mismatches,
        })
    }

    /// Whether replaying the log reproduces the innings' live aggregates.
    pub fn verify_convergence(innings: &Innings) -> Result<bool, LedgerError> {
        let replayed = Self::replay(innings)?;
        Ok(replayed.aggregates == innings.aggregates() && replayed.crease_mismatches.is_empty())
    }

    /// Per-player stat lines the log accounts for.
    pub fn tally(innings: &Innings) -> Result<StatTally, LedgerError> {
        Ok(Self::replay(innings)?.tally)
    }
}

fn reapply(
    target: &mut Innings,
    event: &DeliveryEvent,
    tally: &mut StatTally,
) -> Result<DeliveryEvent, LedgerError> {
    target.place(event.crease.clone(), event.bowler.clone());
    let applied = match &event.kind {
        DeliveryKind::Run { runs } => target.apply_run(*runs, tally)?,
        DeliveryKind::Extra { kind, runs } => target.apply_extra(*kind, *runs)?,
        DeliveryKind::Wicket(detail) => {
            let incoming = match detail.source {
                IncomingSource::Explicit => detail.incoming.clone(),
                IncomingSource::BattingOrder { .. } | IncomingSource::Exhausted => None,
            };
            target.apply_wicket(detail.dismissed.clone(), detail.how.clone(), incoming, tally)?
        }
    };
    Ok(applied.clone())
}
