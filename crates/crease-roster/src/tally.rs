//! Stand-alone [`StatsWriter`] implementations.

use std::collections::BTreeMap;

use crease_types::{PlayerId, StatLine};
use serde::{Deserialize, Serialize};

use crate::traits::StatsWriter;

/// Collects stat deltas per player without a roster behind them.
///
/// Replay uses a tally to recompute what a log credited to each player, so
/// the result can be compared against a live tally or the roster's totals.
/// Entries that drop back to zero are removed, which keeps a credit followed
/// by the matching debit indistinguishable from no update at all.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatTally {
    lines: BTreeMap<PlayerId, StatLine>,
}

impl StatTally {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, player: &PlayerId) -> StatLine {
        self.lines.get(player).copied().unwrap_or_default()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&PlayerId, &StatLine)> {
        self.lines.iter()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

impl StatsWriter for StatTally {
    fn credit(&mut self, player: &PlayerId, delta: &StatLine) {
        if delta.is_zero() {
            return;
        }
        let line = self.lines.entry(player.clone()).or_default();
        *line = line.plus(delta);
    }

    fn debit(&mut self, player: &PlayerId, delta: &StatLine) {
        let Some(line) = self.lines.get_mut(player) else {
            return;
        };
        *line = line.saturating_minus(delta);
        if line.is_zero() {
            self.lines.remove(player);
        }
    }
}

/// Discards every update.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullStats;

impl StatsWriter for NullStats {
    fn credit(&mut self, _player: &PlayerId, _delta: &StatLine) {}

    fn debit(&mut self, _player: &PlayerId, _delta: &StatLine) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pid(s: &str) -> PlayerId {
        PlayerId::new(s).unwrap()
    }

    #[test]
    fn credits_accumulate_per_player() {
        let mut tally = StatTally::new();
        tally.credit(&pid("a"), &StatLine::batting(4));
        tally.credit(&pid("a"), &StatLine::batting(1));
        tally.credit(&pid("b"), &StatLine::wicket_taken());

        let a = tally.get(&pid("a"));
        assert_eq!((a.runs, a.balls, a.fours), (5, 2, 1));
        assert_eq!(tally.get(&pid("b")).wickets, 1);
        assert_eq!(tally.len(), 2);
    }

    #[test]
    fn credit_then_debit_leaves_no_entry() {
        let mut tally = StatTally::new();
        tally.credit(&pid("a"), &StatLine::batting(6));
        tally.debit(&pid("a"), &StatLine::batting(6));
        assert!(tally.is_empty());
        assert_eq!(tally, StatTally::new());
    }

    #[test]
    fn zero_credit_is_not_recorded() {
        let mut tally = StatTally::new();
        tally.credit(&pid("a"), &StatLine::default());
        assert!(tally.is_empty());
    }

    #[test]
    fn debit_of_unknown_player_is_ignored() {
        let mut tally = StatTally::new();
        tally.debit(&pid("ghost"), &StatLine::batting(1));
        assert!(tally.is_empty());
    }
}
