//! Engine construction.

use std::sync::Arc;

use super::{TableCallbacks, TableConfig, TableEngine};
use crate::action::{ActionSet, BulkAction, TableAction};
use crate::column::{ColumnDescriptor, ColumnRegistry};
use crate::error::{ConfigError, StateError, TableError};
use crate::filtering::FilteringState;
use crate::model::{RowIdResolver, TableRow};
use crate::pagination::PaginationState;
use crate::selection::SelectionState;
use crate::sorting::SortingState;

/// Builder for [`TableEngine`].
///
/// Every descriptor and initial snapshot is validated in [`build`](Self::build).
///
/// # Example
///
/// ```
/// use dashtable::{ColumnDescriptor, RowIdResolver, SelectionScope, TableConfig, TableEngine};
///
/// let engine = TableEngine::<serde_json::Value>::builder(TableConfig::new(SelectionScope::Persistent))
///     .columns(vec![
///         ColumnDescriptor::new("name").sortable().filterable(),
///         ColumnDescriptor::new("age").sortable(),
///     ])
///     .row_id(RowIdResolver::key("id"))
///     .build()
///     .unwrap();
/// assert!(engine.status().is_idle());
/// ```
pub struct TableEngineBuilder<T> {
    config: TableConfig,
    columns: Vec<ColumnDescriptor<T>>,
    row_id: Option<RowIdResolver<T>>,
    row_actions: Vec<TableAction<T>>,
    bulk_actions: Vec<BulkAction<T>>,
    callbacks: TableCallbacks,
    rows: Option<Vec<T>>,
    sorting: SortingState,
    filtering: FilteringState,
    pagination: Option<PaginationState>,
    selection: SelectionState,
}

impl<T: TableRow> TableEngineBuilder<T> {
    pub(super) fn new(config: TableConfig) -> Self {
        Self {
            config,
            columns: Vec::new(),
            row_id: None,
            row_actions: Vec::new(),
            bulk_actions: Vec::new(),
            callbacks: TableCallbacks::default(),
            rows: None,
            sorting: SortingState::default(),
            filtering: FilteringState::default(),
            pagination: None,
            selection: SelectionState::default(),
        }
    }

    /// Set the column descriptors.
    pub fn columns(mut self, columns: Vec<ColumnDescriptor<T>>) -> Self {
        self.columns = columns;
        self
    }

    /// Set how row ids are derived. Required.
    pub fn row_id(mut self, resolver: RowIdResolver<T>) -> Self {
        self.row_id = Some(resolver);
        self
    }

    /// Set the row actions.
    pub fn row_actions(mut self, actions: Vec<TableAction<T>>) -> Self {
        self.row_actions = actions;
        self
    }

    /// Set the bulk actions.
    pub fn bulk_actions(mut self, actions: Vec<BulkAction<T>>) -> Self {
        self.bulk_actions = actions;
        self
    }

    /// Set the change callbacks.
    pub fn callbacks(mut self, callbacks: TableCallbacks) -> Self {
        self.callbacks = callbacks;
        self
    }

    /// Supply the initial rows. The engine starts `Ready` instead of `Idle`.
    pub fn rows(mut self, rows: Vec<T>) -> Self {
        self.rows = Some(rows);
        self
    }

    /// Start from a sorting snapshot, e.g. one persisted by the host.
    pub fn sorting(mut self, sorting: SortingState) -> Self {
        self.sorting = sorting;
        self
    }

    /// Start from a filtering snapshot.
    pub fn filtering(mut self, filtering: FilteringState) -> Self {
        self.filtering = filtering;
        self
    }

    /// Start from a pagination snapshot instead of the configured page size.
    pub fn pagination(mut self, pagination: PaginationState) -> Self {
        self.pagination = Some(pagination);
        self
    }

    /// Start from a selection snapshot.
    pub fn selection(mut self, selection: SelectionState) -> Self {
        self.selection = selection;
        self
    }

    /// Validate everything and build the engine.
    pub fn build(self) -> Result<TableEngine<T>, TableError> {
        if self.config.page_size == 0 {
            return Err(ConfigError::InvalidPageSize {
                size: self.config.page_size,
            }
            .into());
        }
        let row_id = self.row_id.ok_or(ConfigError::MissingRowIdResolver)?;
        let columns = ColumnRegistry::new(self.columns)?;
        let actions = ActionSet::new(self.row_actions, self.bulk_actions)?;

        columns.validate_sorting(&self.sorting, self.config.multi_sort)?;
        columns.validate_filtering(&self.filtering)?;
        let pagination = match self.pagination {
            Some(p) if p.page_size() == 0 => {
                return Err(StateError::InvalidPageSize { size: 0 }.into());
            }
            Some(p) => p,
            None => PaginationState::first(self.config.page_size),
        };

        log::debug!(
            "Building table engine: {} columns, scope {:?}",
            columns.len(),
            self.config.selection_scope
        );

        let has_rows = self.rows.is_some();
        let mut engine = TableEngine {
            config: self.config,
            columns,
            row_id,
            actions,
            callbacks: self.callbacks,
            rows: self.rows.unwrap_or_default(),
            has_rows,
            loading: false,
            error: None,
            sorting: Arc::new(self.sorting),
            filtering: Arc::new(self.filtering),
            pagination: Arc::new(pagination),
            selection: Arc::new(self.selection),
        };
        engine.clamp_pagination();
        Ok(engine)
    }
}
