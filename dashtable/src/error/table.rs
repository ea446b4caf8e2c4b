//! Top-level error type

use super::{ActionError, ConfigError, RowIdError, StateError};

/// Any error produced by the table engine.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TableError {
    /// Invalid engine configuration.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A snapshot does not fit the column set.
    #[error(transparent)]
    State(#[from] StateError),

    /// Row id resolution failed.
    #[error(transparent)]
    RowId(#[from] RowIdError),

    /// An action could not be run.
    #[error(transparent)]
    Action(#[from] ActionError),
}

impl TableError {
    /// Returns `true` if this error only affects a single row and the
    /// surrounding operation could continue.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::RowId(_))
    }
}
