use crease_types::MatchId;
use thiserror::Error;

use crate::config::ConfigError;

#[derive(Debug, Error)]
pub enum SdkError {
    #[error("no active match")]
    NoActiveMatch,

    #[error("match not found: {0}")]
    MatchNotFound(MatchId),

    #[error("invalid operation: {0}")]
    InvalidOperation(String),

    #[error("snapshot error: {0}")]
    Snapshot(String),

    #[error("ledger error: {0}")]
    Ledger(#[from] crease_ledger::LedgerError),

    #[error("roster error: {0}")]
    Roster(#[from] crease_roster::RosterError),

    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Types(#[from] crease_types::TypeError),

    #[error("serialization error: {0}")]
    Serialization(String),
}

pub type SdkResult<T> = Result<T, SdkError>;
