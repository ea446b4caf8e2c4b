//! Row id resolution errors

/// The row id resolver could not produce an identifier for a row.
///
/// Reported alongside the operation result; the affected row is skipped and
/// the rest of the operation proceeds.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid row id resolution{}: {reason}", position(.row_index))]
pub struct RowIdError {
    /// Position of the row in the input row set, if it belongs to it.
    pub row_index: Option<usize>,
    /// Why resolution failed.
    pub reason: String,
}

impl RowIdError {
    /// Creates a new row id error for the row at `row_index`.
    pub fn new(row_index: usize, reason: impl Into<String>) -> Self {
        Self {
            row_index: Some(row_index),
            reason: reason.into(),
        }
    }

    /// Creates a row id error for a row outside the input row set.
    pub fn detached(reason: impl Into<String>) -> Self {
        Self {
            row_index: None,
            reason: reason.into(),
        }
    }
}

fn position(row_index: &Option<usize>) -> String {
    row_index
        .map(|i| format!(" for row {}", i))
        .unwrap_or_default()
}
