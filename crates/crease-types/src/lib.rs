//! Foundation types for Crease.
//!
//! This crate provides the identity, counting, and labelling types shared by
//! every other Crease crate. It has no knowledge of innings state; it only
//! describes the values the ledger and roster exchange.
//!
//! # Key Types
//!
//! - [`PlayerId`] / [`TeamId`] - Opaque roster identifiers
//! - [`MatchId`] / [`InningsId`] - UUID v7 identifiers for scoring sessions
//! - [`OverCount`] - `overs.balls` arithmetic over legal deliveries
//! - [`ExtraKind`] / [`DismissalKind`] - Delivery labels
//! - [`StatLine`] - Cumulative per-player batting and bowling numbers

pub mod error;
pub mod ids;
pub mod labels;
pub mod overs;
pub mod stats;

pub use error::TypeError;
pub use ids::{InningsId, MatchId, PlayerId, TeamId};
pub use labels::{DismissalKind, ExtraKind};
pub use overs::{run_rate, OverCount, BALLS_PER_OVER};
pub use stats::StatLine;
