//! High-level SDK for Crease.
//!
//! [`Scorebook`] ties the roster and the innings ledger together: it creates
//! matches, routes scoring actions to the active innings, opens the chase
//! when the first innings ends, decides results and persists everything as
//! a snapshot. This is the main entry point for applications embedding
//! Crease.

pub mod action;
pub mod config;
pub mod error;
pub mod scorebook;
pub mod snapshot;
pub mod summary;

pub use action::{ActionOutcome, ScoringAction};
pub use config::{ConfigError, MatchConfig, MatchDetails};
pub use error::{SdkError, SdkResult};
pub use scorebook::{Match, MatchStatus, Scorebook};
pub use snapshot::{SNAPSHOT_MAGIC, SNAPSHOT_VERSION};
pub use summary::{Margin, MatchResult, MatchSummary};

// Re-export key types
pub use crease_ledger::{
    BattingCard, BowlingCard, CommentaryLine, DeliveryEvent, Innings, ProjectionBuilder,
    ScoreSummary, ValidationReport,
};
pub use crease_roster::{InMemoryRoster, RosterReader};
pub use crease_types::{DismissalKind, ExtraKind, MatchId, OverCount, PlayerId, TeamId};
