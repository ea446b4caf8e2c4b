//! Configuration error types

/// Errors raised while building a table engine.
///
/// These are fatal: an engine is never constructed from an invalid
/// configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// Two column descriptors share the same id.
    #[error("Duplicate column id '{id}'")]
    DuplicateColumnId { id: String },

    /// Two actions of the same kind share the same id.
    #[error("Duplicate action id '{id}'")]
    DuplicateActionId { id: String },

    /// Page size must be greater than zero.
    #[error("Invalid page size {size}: must be greater than zero")]
    InvalidPageSize { size: usize },

    /// No row id resolver was configured.
    #[error("No row id resolver configured")]
    MissingRowIdResolver,
}

impl ConfigError {
    /// Creates a new duplicate column id error.
    pub fn duplicate_column(id: impl Into<String>) -> Self {
        Self::DuplicateColumnId { id: id.into() }
    }

    /// Creates a new duplicate action id error.
    pub fn duplicate_action(id: impl Into<String>) -> Self {
        Self::DuplicateActionId { id: id.into() }
    }
}
