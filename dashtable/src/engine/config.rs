//! Table configuration types.

use serde::Deserialize;
use serde::Serialize;

use crate::pagination::DEFAULT_PAGE_SIZE;
use crate::selection::{SelectionScope, SelectionWindow};

/// Per-table configuration.
///
/// The selection scope has no default: every table states whether its
/// selection survives changes to the visible rows.
///
/// # Example
///
/// ```
/// use dashtable::{SelectionScope, SelectionWindow, TableConfig};
///
/// let config = TableConfig::new(SelectionScope::Persistent)
///     .with_multi_sort(true)
///     .with_page_size(25)
///     .with_selection_window(SelectionWindow::FilteredRows);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableConfig {
    /// Whether selection survives sorting, filtering and paging.
    pub selection_scope: SelectionScope,

    /// Rows that select-all and the selection flags are measured against.
    ///
    /// Default: the current page
    #[serde(default)]
    pub selection_window: SelectionWindow,

    /// Allow sorting on several columns at once.
    ///
    /// Default: false
    #[serde(default)]
    pub multi_sort: bool,

    /// Initial rows per page.
    ///
    /// Default: 10
    #[serde(default = "default_page_size")]
    pub page_size: usize,
}

fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}

impl TableConfig {
    /// Create a config with the given selection scope and defaults otherwise.
    pub fn new(selection_scope: SelectionScope) -> Self {
        Self {
            selection_scope,
            selection_window: SelectionWindow::default(),
            multi_sort: false,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    /// Enable or disable multi-column sorting.
    pub fn with_multi_sort(mut self, multi_sort: bool) -> Self {
        self.multi_sort = multi_sort;
        self
    }

    /// Set the initial page size.
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    /// Set the selection window.
    pub fn with_selection_window(mut self, window: SelectionWindow) -> Self {
        self.selection_window = window;
        self
    }
}
