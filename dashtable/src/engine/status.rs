//! Load status of a table.

use thiserror::Error;

/// Upstream failure reported by whoever fetches the rows.
///
/// Passed through unchanged into [`TableStatus::Error`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct LoadError {
    /// Error message
    pub message: String,
}

impl LoadError {
    /// Create a new load error
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl From<String> for LoadError {
    fn from(message: String) -> Self {
        Self::new(message)
    }
}

impl From<&str> for LoadError {
    fn from(message: &str) -> Self {
        Self::new(message)
    }
}

/// Where the table is in its load cycle.
///
/// Derived from the loading/error flags supplied by the host: an error wins
/// over loading, loading wins over data.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TableStatus {
    /// No rows supplied yet
    #[default]
    Idle,
    /// The host is fetching rows
    Loading,
    /// Rows are available
    Ready,
    /// The host failed to fetch rows
    Error(LoadError),
}

impl TableStatus {
    pub(crate) fn derive(loading: bool, error: Option<&LoadError>, has_rows: bool) -> Self {
        match (error, loading) {
            (Some(e), _) => Self::Error(e.clone()),
            (None, true) => Self::Loading,
            (None, false) if has_rows => Self::Ready,
            (None, false) => Self::Idle,
        }
    }

    /// Check if no rows have been supplied
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    /// Check if rows are loading
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    /// Check if rows are ready
    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready)
    }

    /// Check if loading failed
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }

    /// Get the error if present
    pub fn as_error(&self) -> Option<&LoadError> {
        match self {
            Self::Error(e) => Some(e),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_wins_over_loading() {
        let err = LoadError::new("boom");
        let status = TableStatus::derive(true, Some(&err), true);
        assert!(status.is_error());
        assert_eq!(status.as_error(), Some(&err));
    }

    #[test]
    fn test_loading_wins_over_rows() {
        assert!(TableStatus::derive(true, None, true).is_loading());
        assert!(TableStatus::derive(false, None, true).is_ready());
        assert!(TableStatus::derive(false, None, false).is_idle());
    }
}
