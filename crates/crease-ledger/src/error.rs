/// Errors produced by innings ledger operations.
///
/// Every variant signals caller misuse. A failed operation leaves the
/// innings and the stat writer exactly as they were.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LedgerError {
    #[error("invalid state: {reason}")]
    InvalidState { reason: String },

    #[error("innings is complete; no further deliveries can be recorded")]
    InningsComplete,

    #[error("event log is empty; nothing to undo")]
    EmptyLog,

    #[error("serialization error: {0}")]
    Serialization(String),
}

impl LedgerError {
    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        Self::InvalidState {
            reason: reason.into(),
        }
    }
}
