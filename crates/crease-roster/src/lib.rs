//! Roster management for Crease.
//!
//! The roster exclusively owns team and player records, including each
//! player's cumulative stats. The innings ledger only holds player ids; it
//! reports every per-delivery change through the narrow [`StatsWriter`]
//! interface and reverses it on undo.
//!
//! # Modules
//!
//! - [`error`] - Error types for roster operations
//! - [`types`] - [`Team`] and [`Player`] records
//! - [`traits`] - [`StatsWriter`] and [`RosterReader`] boundaries
//! - [`names`] - Display name validation
//! - [`memory`] - [`InMemoryRoster`], the owned roster used by the scorebook
//! - [`tally`] - [`StatTally`] and [`NullStats`] writers for replay and tests

pub mod error;
pub mod memory;
pub mod names;
pub mod tally;
pub mod traits;
pub mod types;

pub use error::{Result, RosterError};
pub use memory::InMemoryRoster;
pub use names::validate_display_name;
pub use tally::{NullStats, StatTally};
pub use traits::{RosterReader, StatsWriter};
pub use types::{Player, Team};
