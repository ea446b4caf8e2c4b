//! The composed table engine.
//!
//! [`TableEngine`] owns the four state snapshots of one table and derives the
//! visible row window from them. Rows flow through a fixed pipeline:
//!
//! ```text
//! rows -> apply_sort -> apply_filter -> paginate -> page window
//! ```
//!
//! Selection is measured independently against the selection window. Only
//! the snapshots are kept between recomputations; [`TableEngine::view`]
//! always runs the whole pipeline.

mod builder;
mod callbacks;
mod config;
mod status;

use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

pub use builder::TableEngineBuilder;
pub use callbacks::TableCallbacks;
pub use config::TableConfig;
pub use status::{LoadError, TableStatus};

use crate::action::{ActionSet, BulkAction, TableAction};
use crate::column::ColumnRegistry;
use crate::error::{ActionError, RowIdError, StateError, TableError};
use crate::filtering::{FilterValue, FilteringState, apply_filter};
use crate::model::{RowId, RowIdResolver, TableRow};
use crate::pagination::{PaginationState, paginate};
use crate::selection::{SelectionFlags, SelectionScope, SelectionState, SelectionWindow};
use crate::sorting::{SortingState, apply_sort};

/// Everything a host needs to render one frame of the table.
#[derive(Debug, Clone)]
pub struct TableView<'a, T> {
    /// Load status.
    pub status: TableStatus,
    /// Rows on the current page, in display order.
    pub rows: Vec<&'a T>,
    /// Resolved id for each row in `rows`; `None` where resolution failed.
    pub row_ids: Vec<Option<RowId>>,
    /// Number of rows supplied.
    pub total_rows: usize,
    /// Number of rows passing the filters.
    pub filtered_rows: usize,
    /// Number of pages, at least 1.
    pub total_pages: usize,
    /// Select-all checkbox state for the selection window.
    pub flags: SelectionFlags,
    /// The rows `flags` is measured against.
    pub window: SelectionWindow,
    /// Rows skipped because their id could not be resolved.
    pub skipped: Vec<RowIdError>,
    /// Current sorting snapshot.
    pub sorting: Arc<SortingState>,
    /// Current filtering snapshot.
    pub filtering: Arc<FilteringState>,
    /// Current pagination snapshot.
    pub pagination: Arc<PaginationState>,
    /// Current selection snapshot.
    pub selection: Arc<SelectionState>,
}

impl<T> TableView<'_, T> {
    /// Check whether the row at a page position is selected.
    pub fn is_selected_at(&self, index: usize) -> bool {
        self.row_ids
            .get(index)
            .and_then(Option::as_ref)
            .is_some_and(|id| self.selection.is_selected(id))
    }

    /// Shorthand for `flags.all_selected`.
    pub fn is_all_selected(&self) -> bool {
        self.flags.all_selected
    }

    /// Shorthand for `flags.indeterminate`.
    pub fn is_indeterminate(&self) -> bool {
        self.flags.indeterminate
    }
}

/// A table's state machine.
///
/// Every state-changing method validates its input, replaces one snapshot,
/// fires that snapshot's callback once, then:
/// - clamps the page index if the filtered row count shrank below it,
///   firing the pagination callback;
/// - under [`SelectionScope::PageScoped`], clears the selection if the page
///   now shows different rows, firing the selection callback.
///
/// Setting a snapshot equal to the current one is a no-op.
pub struct TableEngine<T> {
    config: TableConfig,
    columns: ColumnRegistry<T>,
    row_id: RowIdResolver<T>,
    actions: ActionSet<T>,
    callbacks: TableCallbacks,
    rows: Vec<T>,
    has_rows: bool,
    loading: bool,
    error: Option<LoadError>,
    sorting: Arc<SortingState>,
    filtering: Arc<FilteringState>,
    pagination: Arc<PaginationState>,
    selection: Arc<SelectionState>,
}

impl<T: TableRow> TableEngine<T> {
    /// Start building an engine.
    pub fn builder(config: TableConfig) -> TableEngineBuilder<T> {
        TableEngineBuilder::new(config)
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    /// Get the configuration.
    pub fn config(&self) -> &TableConfig {
        &self.config
    }

    /// Get the column registry.
    pub fn columns(&self) -> &ColumnRegistry<T> {
        &self.columns
    }

    /// Get the supplied rows in input order.
    pub fn rows(&self) -> &[T] {
        &self.rows
    }

    /// Get the load status.
    pub fn status(&self) -> TableStatus {
        TableStatus::derive(self.loading, self.error.as_ref(), self.has_rows)
    }

    /// Get the sorting snapshot.
    pub fn sorting(&self) -> Arc<SortingState> {
        Arc::clone(&self.sorting)
    }

    /// Get the filtering snapshot.
    pub fn filtering(&self) -> Arc<FilteringState> {
        Arc::clone(&self.filtering)
    }

    /// Get the pagination snapshot.
    pub fn pagination(&self) -> Arc<PaginationState> {
        Arc::clone(&self.pagination)
    }

    /// Get the selection snapshot.
    pub fn selection(&self) -> Arc<SelectionState> {
        Arc::clone(&self.selection)
    }

    // -------------------------------------------------------------------------
    // Derivation
    // -------------------------------------------------------------------------

    /// Sorted and filtered rows, across all pages.
    pub fn filtered_rows(&self) -> Vec<&T> {
        let sorted = apply_sort(&self.rows, &self.sorting, &self.columns);
        apply_filter(sorted, &self.filtering, &self.columns)
    }

    /// Rows on the current page.
    pub fn page_rows(&self) -> Vec<&T> {
        let filtered = self.filtered_rows();
        paginate(&filtered, &self.pagination).rows.to_vec()
    }

    /// Run the full pipeline and measure the selection.
    pub fn view(&self) -> TableView<'_, T> {
        let filtered = self.filtered_rows();
        let page = paginate(&filtered, &self.pagination);
        let rows = page.rows.to_vec();

        let mut skipped = Vec::new();
        let row_ids: Vec<Option<RowId>> = rows
            .iter()
            .map(|row| match self.resolve_id(row) {
                Ok(id) => Some(id),
                Err(e) => {
                    skipped.push(e);
                    None
                }
            })
            .collect();

        let window = match self.config.selection_window {
            SelectionWindow::CurrentPage => row_ids.iter().flatten().cloned().collect(),
            SelectionWindow::FilteredRows => self.collect_ids(&filtered, &mut skipped),
            SelectionWindow::AllRows => {
                let all: Vec<&T> = self.rows.iter().collect();
                self.collect_ids(&all, &mut skipped)
            }
        };
        skipped.sort_by_key(|e| e.row_index);
        skipped.dedup();
        for e in &skipped {
            log::warn!("Skipping row in selection: {}", e);
        }

        TableView {
            status: self.status(),
            total_rows: self.rows.len(),
            filtered_rows: filtered.len(),
            total_pages: page.total_pages,
            flags: SelectionFlags::compute(&self.selection, &window),
            window: self.config.selection_window,
            rows,
            row_ids,
            skipped,
            sorting: self.sorting(),
            filtering: self.filtering(),
            pagination: self.pagination(),
            selection: self.selection(),
        }
    }

    /// Rows whose id is selected, in input order.
    pub fn selected_rows(&self) -> Vec<&T> {
        self.rows
            .iter()
            .filter(|row| {
                self.row_id
                    .try_resolve(row)
                    .is_ok_and(|id| self.selection.is_selected(&id))
            })
            .collect()
    }

    fn resolve_id(&self, row: &T) -> Result<RowId, RowIdError> {
        self.row_id.try_resolve(row).map_err(|reason| {
            match self.rows.iter().position(|r| std::ptr::eq(r, row)) {
                Some(index) => RowIdError::new(index, reason),
                None => RowIdError::detached(reason),
            }
        })
    }

    fn collect_ids(&self, rows: &[&T], skipped: &mut Vec<RowIdError>) -> Vec<RowId> {
        rows.iter()
            .filter_map(|row| match self.resolve_id(row) {
                Ok(id) => Some(id),
                Err(e) => {
                    skipped.push(e);
                    None
                }
            })
            .collect()
    }

    fn window_ids(&self, skipped: &mut Vec<RowIdError>) -> Vec<RowId> {
        match self.config.selection_window {
            SelectionWindow::CurrentPage => self.collect_ids(&self.page_rows(), skipped),
            SelectionWindow::FilteredRows => self.collect_ids(&self.filtered_rows(), skipped),
            SelectionWindow::AllRows => {
                let all: Vec<&T> = self.rows.iter().collect();
                self.collect_ids(&all, skipped)
            }
        }
    }

    /// Ids on the current page, when page-scoped selection needs them.
    /// Order is ignored: reordering the same rows keeps the selection.
    fn page_ids_if_scoped(&self) -> Option<BTreeSet<RowId>> {
        (self.config.selection_scope == SelectionScope::PageScoped).then(|| self.page_id_set())
    }

    fn page_id_set(&self) -> BTreeSet<RowId> {
        self.collect_ids(&self.page_rows(), &mut Vec::new())
            .into_iter()
            .collect()
    }

    // -------------------------------------------------------------------------
    // Rows and load status
    // -------------------------------------------------------------------------

    /// Replace the rows. Selection is kept; ids no longer present simply
    /// stop matching.
    pub fn set_rows(&mut self, rows: Vec<T>) {
        let before = self.page_ids_if_scoped();
        log::debug!("Replacing {} rows with {}", self.rows.len(), rows.len());
        self.rows = rows;
        self.has_rows = true;
        self.settle(before);
    }

    /// Update the externally supplied loading and error flags.
    pub fn set_load_state(&mut self, loading: bool, error: Option<LoadError>) {
        let previous = self.status();
        self.loading = loading;
        self.error = error;
        let next = self.status();
        if previous != next {
            log::debug!("Table status {:?} -> {:?}", previous, next);
        }
    }

    // -------------------------------------------------------------------------
    // Sorting
    // -------------------------------------------------------------------------

    /// Replace the sorting snapshot.
    pub fn set_sorting(&mut self, sorting: SortingState) -> Result<(), TableError> {
        self.columns
            .validate_sorting(&sorting, self.config.multi_sort)?;
        if *self.sorting == sorting {
            return Ok(());
        }
        let before = self.page_ids_if_scoped();
        log::debug!("Sorting changed: {:?}", sorting.criteria());
        self.sorting = Arc::new(sorting);
        self.callbacks.sorting_changed(&self.sorting);
        self.settle(before);
        Ok(())
    }

    /// Cycle a column through ascending, descending and unsorted.
    pub fn toggle_sort(&mut self, column_id: &str) -> Result<Arc<SortingState>, TableError> {
        let next = self.sorting.toggled(column_id, self.config.multi_sort);
        self.set_sorting(next)?;
        Ok(self.sorting())
    }

    // -------------------------------------------------------------------------
    // Filtering
    // -------------------------------------------------------------------------

    /// Replace the filtering snapshot.
    pub fn set_filtering(&mut self, filtering: FilteringState) -> Result<(), TableError> {
        self.columns.validate_filtering(&filtering)?;
        if *self.filtering == filtering {
            return Ok(());
        }
        let before = self.page_ids_if_scoped();
        log::debug!("Filtering changed: {:?}", filtering);
        self.filtering = Arc::new(filtering);
        self.callbacks.filtering_changed(&self.filtering);
        self.settle(before);
        Ok(())
    }

    /// Set or clear the filter on one column.
    pub fn set_column_filter(
        &mut self,
        column_id: &str,
        value: Option<FilterValue>,
    ) -> Result<(), TableError> {
        let next = match value {
            Some(value) => self.filtering.with_column_filter(column_id, value),
            None => self.filtering.without_column_filter(column_id),
        };
        self.set_filtering(next)
    }

    /// Set the global search string. Blank strings clear it.
    pub fn set_global_filter(&mut self, query: &str) -> Result<(), TableError> {
        let next = self.filtering.with_global(query);
        self.set_filtering(next)
    }

    // -------------------------------------------------------------------------
    // Pagination
    // -------------------------------------------------------------------------

    /// Replace the pagination snapshot. The page index is clamped first.
    pub fn set_pagination(&mut self, pagination: PaginationState) -> Result<(), TableError> {
        if pagination.page_size() == 0 {
            return Err(StateError::InvalidPageSize { size: 0 }.into());
        }
        let next = pagination.clamped(self.filtered_rows().len());
        if *self.pagination == next {
            return Ok(());
        }
        let before = self.page_ids_if_scoped();
        log::debug!(
            "Pagination changed: page {} size {}",
            next.page_index(),
            next.page_size()
        );
        self.pagination = Arc::new(next);
        self.callbacks.pagination_changed(&self.pagination);
        self.settle(before);
        Ok(())
    }

    /// Move to a page.
    pub fn set_page_index(&mut self, page_index: usize) -> Result<(), TableError> {
        self.set_pagination(self.pagination.with_page_index(page_index))
    }

    /// Change the page size. Always returns to the first page.
    pub fn set_page_size(&mut self, page_size: usize) -> Result<(), TableError> {
        if page_size == 0 {
            return Err(StateError::InvalidPageSize { size: 0 }.into());
        }
        self.set_pagination(self.pagination.with_page_size(page_size))
    }

    /// Move to the next page, if there is one.
    pub fn next_page(&mut self) -> Result<(), TableError> {
        self.set_page_index(self.pagination.page_index().saturating_add(1))
    }

    /// Move to the previous page, if there is one.
    pub fn previous_page(&mut self) -> Result<(), TableError> {
        self.set_pagination(self.pagination.previous())
    }

    // -------------------------------------------------------------------------
    // Selection
    // -------------------------------------------------------------------------

    /// Check if a row id is selected.
    pub fn is_selected(&self, id: &RowId) -> bool {
        self.selection.is_selected(id)
    }

    /// Replace the selection snapshot.
    pub fn set_selection(&mut self, selection: SelectionState) {
        if *self.selection == selection {
            return;
        }
        log::debug!("Selection changed: {} rows", selection.len());
        self.selection = Arc::new(selection);
        self.callbacks.selection_changed(&self.selection);
    }

    /// Flip the selection of one row id.
    pub fn toggle_row(&mut self, id: &RowId) {
        self.set_selection(self.selection.toggled(id));
    }

    /// Flip the selection of a row, resolving its id first.
    pub fn toggle_row_for(&mut self, row: &T) -> Result<(), RowIdError> {
        let id = self.resolve_id(row)?;
        self.toggle_row(&id);
        Ok(())
    }

    /// Select the whole selection window, or deselect it if it is already
    /// fully selected. Rows whose id cannot be resolved are skipped and
    /// returned.
    pub fn toggle_all(&mut self) -> Vec<RowIdError> {
        let mut skipped = Vec::new();
        let window = self.window_ids(&mut skipped);
        for e in &skipped {
            log::warn!("Skipping row in toggle all: {}", e);
        }
        self.set_selection(self.selection.with_all_toggled(&window));
        skipped
    }

    /// Deselect everything.
    pub fn clear_selection(&mut self) {
        self.set_selection(self.selection.cleared());
    }

    // -------------------------------------------------------------------------
    // Actions
    // -------------------------------------------------------------------------

    /// Row actions with their enablement for a row.
    pub fn row_actions(&self, row: &T) -> Vec<(&TableAction<T>, bool)> {
        self.actions
            .row_actions()
            .iter()
            .map(|a| (a, a.is_enabled(row)))
            .collect()
    }

    /// Bulk actions with their enablement for the current selection.
    pub fn bulk_actions(&self) -> Vec<(&BulkAction<T>, bool)> {
        let selected = self.selected_rows();
        self.actions
            .bulk_actions()
            .iter()
            .map(|a| (a, a.is_enabled(&selected)))
            .collect()
    }

    /// Run a row action on the row with the given id.
    pub fn run_row_action(&self, action_id: &str, row_id: &RowId) -> Result<(), ActionError> {
        let action = self
            .actions
            .row_action(action_id)
            .ok_or_else(|| ActionError::UnknownAction {
                id: action_id.to_string(),
            })?;
        let row = self
            .rows
            .iter()
            .find(|row| self.row_id.try_resolve(row).is_ok_and(|id| id == *row_id))
            .ok_or_else(|| ActionError::UnknownRow {
                row_id: row_id.to_string(),
            })?;
        if !action.is_enabled(row) {
            return Err(ActionError::ActionDisabled {
                id: action_id.to_string(),
            });
        }
        log::debug!("Running row action '{}' on '{}'", action_id, row_id);
        action.invoke(row);
        Ok(())
    }

    /// Run a bulk action on the selected rows.
    pub fn run_bulk_action(&self, action_id: &str) -> Result<(), ActionError> {
        let action = self
            .actions
            .bulk_action(action_id)
            .ok_or_else(|| ActionError::UnknownAction {
                id: action_id.to_string(),
            })?;
        let selected = self.selected_rows();
        if !action.is_enabled(&selected) {
            return Err(ActionError::ActionDisabled {
                id: action_id.to_string(),
            });
        }
        log::debug!(
            "Running bulk action '{}' on {} rows",
            action_id,
            selected.len()
        );
        action.invoke(&selected);
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Settling
    // -------------------------------------------------------------------------

    /// Re-establish invariants after a snapshot or the rows changed.
    fn settle(&mut self, page_before: Option<BTreeSet<RowId>>) {
        self.clamp_pagination();

        if let Some(before) = page_before {
            let after = self.page_id_set();
            if before != after && !self.selection.is_empty() {
                log::debug!("Visible rows changed, clearing page-scoped selection");
                self.clear_selection();
            }
        }
    }

    fn clamp_pagination(&mut self) {
        let count = self.filtered_rows().len();
        let clamped = self.pagination.clamped(count);
        if clamped != *self.pagination {
            log::warn!(
                "Page {} is past the last page for {} rows, clamping to {}",
                self.pagination.page_index(),
                count,
                clamped.page_index()
            );
            self.pagination = Arc::new(clamped);
            self.callbacks.pagination_changed(&self.pagination);
        }
    }
}

impl<T> fmt::Debug for TableEngine<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TableEngine")
            .field("config", &self.config)
            .field("columns", &self.columns.len())
            .field("rows", &self.rows.len())
            .field("loading", &self.loading)
            .field("error", &self.error)
            .field("sorting", &self.sorting)
            .field("filtering", &self.filtering)
            .field("pagination", &self.pagination)
            .field("selection", &self.selection)
            .field("callbacks", &self.callbacks)
            .finish_non_exhaustive()
    }
}
