//! State snapshot validation errors

/// A sorting, filtering or pagination snapshot does not fit the column set.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StateError {
    /// The snapshot references a column that is not registered.
    #[error("Unknown column '{column}'")]
    UnknownColumn { column: String },

    /// Sorting was requested on a column that is not sortable.
    #[error("Column '{column}' is not sortable")]
    NotSortable { column: String },

    /// A filter was set on a column that is not filterable.
    #[error("Column '{column}' is not filterable")]
    NotFilterable { column: String },

    /// The same column appears twice in a sorting state.
    #[error("Column '{column}' appears more than once in the sort order")]
    DuplicateSortColumn { column: String },

    /// Several sort criteria were supplied while multi-sort is disabled.
    #[error("Multi-column sorting is disabled ({count} criteria supplied)")]
    MultiSortDisabled { count: usize },

    /// Page size must be greater than zero.
    #[error("Invalid page size {size}: must be greater than zero")]
    InvalidPageSize { size: usize },
}

impl StateError {
    /// Creates a new unknown column error.
    pub fn unknown_column(column: impl Into<String>) -> Self {
        Self::UnknownColumn {
            column: column.into(),
        }
    }
}
