//! Selection state management.
//!
//! Selection is tracked by [`RowId`] so it stays stable while rows are
//! sorted, filtered and paged.

use std::collections::BTreeSet;

use serde::Deserialize;
use serde::Serialize;

use crate::model::RowId;

/// What happens to the selection when the visible rows change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionScope {
    /// Selection survives sorting, filtering and paging.
    Persistent,
    /// Selection is cleared whenever the visible page shows different rows.
    PageScoped,
}

/// The rows that select-all and the derived flags are measured against.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionWindow {
    /// Rows on the current page.
    #[default]
    CurrentPage,
    /// Every row passing the filters, across all pages.
    FilteredRows,
    /// Every row, ignoring filters.
    AllRows,
}

/// Set of selected row ids.
///
/// Snapshots are never mutated; every transition returns a new state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SelectionState {
    selected: BTreeSet<RowId>,
}

impl SelectionState {
    /// Get all selected ids in sorted order.
    pub fn selected(&self) -> impl Iterator<Item = &RowId> {
        self.selected.iter()
    }

    /// Check if an id is selected.
    pub fn is_selected(&self, id: &RowId) -> bool {
        self.selected.contains(id)
    }

    /// Get the number of selected rows.
    pub fn len(&self) -> usize {
        self.selected.len()
    }

    /// Check if nothing is selected.
    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    /// Flip the selection of one id.
    pub fn toggled(&self, id: &RowId) -> Self {
        let mut selected = self.selected.clone();
        if !selected.remove(id) {
            selected.insert(id.clone());
        }
        Self { selected }
    }

    /// Add ids to the selection. Ids already selected stay selected.
    pub fn with_selected<I: IntoIterator<Item = RowId>>(&self, ids: I) -> Self {
        let mut selected = self.selected.clone();
        selected.extend(ids);
        Self { selected }
    }

    /// Select every id in the window, or, if the window is already fully
    /// selected, deselect exactly the window. Ids outside the window are
    /// left alone either way.
    pub fn with_all_toggled(&self, window: &[RowId]) -> Self {
        let mut selected = self.selected.clone();
        if SelectionFlags::compute(self, window).all_selected {
            for id in window {
                selected.remove(id);
            }
        } else {
            selected.extend(window.iter().cloned());
        }
        Self { selected }
    }

    /// Returns an empty selection.
    pub fn cleared(&self) -> Self {
        Self::default()
    }
}

impl FromIterator<RowId> for SelectionState {
    fn from_iter<I: IntoIterator<Item = RowId>>(iter: I) -> Self {
        Self {
            selected: iter.into_iter().collect(),
        }
    }
}

/// Checkbox state of a select-all control.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SelectionFlags {
    /// Every row in the window is selected. `false` for an empty window.
    pub all_selected: bool,
    /// Some, but not all, rows in the window are selected.
    pub indeterminate: bool,
    /// Number of window rows that are selected.
    pub selected_in_window: usize,
}

impl SelectionFlags {
    /// Measure a selection against a window of row ids.
    pub fn compute(selection: &SelectionState, window: &[RowId]) -> Self {
        let unique: BTreeSet<&RowId> = window.iter().collect();
        let selected_in_window = unique
            .iter()
            .filter(|id| selection.is_selected(id))
            .count();
        let all_selected = !unique.is_empty() && selected_in_window == unique.len();
        Self {
            all_selected,
            indeterminate: selected_in_window > 0 && !all_selected,
            selected_in_window,
        }
    }
}
