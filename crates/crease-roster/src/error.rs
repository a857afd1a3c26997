//! Error types for roster operations.

use crease_types::{PlayerId, TeamId};
use thiserror::Error;

/// Errors that can occur during roster operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RosterError {
    /// The team was not found.
    #[error("team not found: {0}")]
    TeamNotFound(TeamId),

    /// The player was not found.
    #[error("player not found: {0}")]
    PlayerNotFound(PlayerId),

    /// A player with this id already exists.
    #[error("player already exists: {0}")]
    DuplicatePlayer(PlayerId),

    /// A team with this id already exists.
    #[error("team already exists: {0}")]
    DuplicateTeam(TeamId),

    /// A team or player name is unusable.
    #[error("invalid name {name:?}: {reason}")]
    InvalidName { name: String, reason: String },
}

/// Convenience type alias for roster operations.
pub type Result<T> = std::result::Result<T, RosterError>;
