//! Innings ledger for Crease.
//!
//! This crate is the heart of Crease. It provides:
//! - [`Innings`], the live state of one innings plus its append-only
//!   delivery log, with exact undo of the latest delivery
//! - [`DeliveryEvent`] records carrying crease snapshots
//! - Deterministic replay of a log onto a fresh innings
//! - Projection builders (score summary, batting and bowling cards,
//!   extras, commentary)
//! - Log validation (sequence, per-event consistency, replay convergence)
//!
//! Player stats are never stored here. Every change goes out through the
//! [`StatsWriter`](crease_roster::StatsWriter) passed to each operation.

pub mod error;
pub mod innings;
pub mod projection;
pub mod records;
pub mod replay;
pub mod validation;

pub use error::LedgerError;
pub use innings::{
    Aggregates, BowlerFigures, CompletionReason, Innings, InningsConfig, InningsStatus,
    DEFAULT_MAX_WICKETS,
};
pub use projection::{
    BatterStatus, BattingCard, BattingRow, BowlingCard, BowlingRow, CommentaryLine,
    ExtrasBreakdown, ProjectionBuilder, ScoreSummary,
};
pub use records::{
    Crease, CreaseEnd, DeliveryEvent, DeliveryKind, IncomingSource, WicketDetail,
};
pub use replay::{ReplayEngine, ReplayResult};
pub use validation::{StreamValidator, ValidationReport, Violation, ViolationKind};
