use thiserror::Error;

/// Errors produced by type parsing and construction.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid identifier: {0:?}")]
    InvalidId(String),

    #[error("invalid over notation {input:?}: {reason}")]
    InvalidOvers { input: String, reason: String },

    #[error("unknown {what} label: {label:?}")]
    UnknownLabel { what: &'static str, label: String },
}
