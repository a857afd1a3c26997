use crease_types::InningsId;
use tracing::warn;

use crate::error::LedgerError;
use crate::innings::Innings;
use crate::records::DeliveryKind;
use crate::replay::ReplayEngine;

/// Result of validating an innings log.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValidationReport {
    pub innings: InningsId,
    pub event_count: u64,
    /// BLAKE3 digest of the log, for comparing copies.
    pub digest: [u8; 32],
    pub sequence_contiguous: bool,
    pub events_consistent: bool,
    pub replay_converges: bool,
    pub violations: Vec<Violation>,
}

impl ValidationReport {
    /// Returns `true` if all checks passed.
    pub fn is_valid(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn digest_hex(&self) -> String {
        hex::encode(self.digest)
    }
}

/// A specific integrity violation detected during validation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Violation {
    pub seq: u64,
    pub kind: ViolationKind,
    pub description: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ViolationKind {
    SequenceGap,
    /// Cached `legal`/`runs`/`batter` fields disagree with the delivery kind.
    InconsistentEvent,
    DismissedNotAtCrease,
    WicketCapExceeded,
    DeliveryAfterCompletion,
    CreaseMismatch,
    ReplayDivergence,
}

/// Innings log integrity validator.
pub struct StreamValidator;

impl StreamValidator {
    /// Check an innings' log against the ledger invariants and against a
    /// replay of itself.
    pub fn validate(innings: &Innings) -> Result<ValidationReport, LedgerError> {
        let events = innings.events();
        let config = innings.config();
        let mut violations = Vec::new();
        let mut sequence_contiguous = true;
        let mut events_consistent = true;
        let mut legal = 0u32;
        let mut wickets = 0u32;

        for (index, event) in events.iter().enumerate() {
            let expected_seq = (index + 1) as u64;
            if event.seq != expected_seq {
                sequence_contiguous = false;
                violations.push(Violation {
                    seq: event.seq,
                    kind: ViolationKind::SequenceGap,
                    description: format!("expected seq {expected_seq}, got {}", event.seq),
                });
            }

            let closed =
                wickets >= config.max_wickets || legal >= config.legal_ball_limit();
            if closed {
                violations.push(Violation {
                    seq: event.seq,
                    kind: ViolationKind::DeliveryAfterCompletion,
                    description: "delivery recorded after the innings was complete".into(),
                });
            }

            let batter_ok = match &event.kind {
                DeliveryKind::Run { .. } => event.batter.is_some(),
                DeliveryKind::Extra { .. } => event.batter.is_none(),
                DeliveryKind::Wicket(detail) => event.batter.as_ref() == Some(&detail.dismissed),
            };
            if event.legal != event.kind.is_legal() || event.runs != event.kind.runs() || !batter_ok
            {
                events_consistent = false;
                violations.push(Violation {
                    seq: event.seq,
                    kind: ViolationKind::InconsistentEvent,
                    description: format!("cached fields disagree with {} delivery", event.kind.label()),
                });
            }

            if let Some(detail) = event.wicket() {
                wickets += 1;
                if wickets > config.max_wickets {
                    violations.push(Violation {
                        seq: event.seq,
                        kind: ViolationKind::WicketCapExceeded,
                        description: format!("wicket {wickets} exceeds cap {}", config.max_wickets),
                    });
                }
                if !event.crease.contains(&detail.dismissed) {
                    violations.push(Violation {
                        seq: event.seq,
                        kind: ViolationKind::DismissedNotAtCrease,
                        description: format!("{} was not at the crease", detail.dismissed),
                    });
                }
            }
            if event.legal {
                legal += 1;
            }
        }

        let replay_converges = match ReplayEngine::replay(innings) {
            Ok(result) => {
                for seq in &result.crease_mismatches {
                    violations.push(Violation {
                        seq: *seq,
                        kind: ViolationKind::CreaseMismatch,
                        description: "recorded crease differs from replay".into(),
                    });
                }
                let converges = result.aggregates == innings.aggregates();
                if !converges {
                    violations.push(Violation {
                        seq: events.len() as u64,
                        kind: ViolationKind::ReplayDivergence,
                        description: "live totals differ from replayed totals".into(),
                    });
                }
                converges && result.crease_mismatches.is_empty()
            }
            Err(err) => {
                violations.push(Violation {
                    seq: events.len() as u64,
                    kind: ViolationKind::ReplayDivergence,
                    description: format!("log does not replay: {err}"),
                });
                false
            }
        };

        if !violations.is_empty() {
            warn!(
                innings = %innings.id().short_id(),
                violations = violations.len(),
                "innings log failed validation"
            );
        }

        Ok(ValidationReport {
            innings: innings.id(),
            event_count: events.len() as u64,
            digest: innings.log_digest()?,
            sequence_contiguous,
            events_consistent,
            replay_converges,
            violations,
        })
    }
}
