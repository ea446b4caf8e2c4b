//! Change notifications for the host.

use std::fmt;
use std::sync::Arc;

use crate::filtering::FilteringState;
use crate::pagination::PaginationState;
use crate::selection::SelectionState;
use crate::sorting::SortingState;

type Callback<S> = Box<dyn Fn(Arc<S>) + Send + Sync>;

/// Host callbacks, each receiving the new snapshot after it replaced the
/// previous one. Never a delta.
#[derive(Default)]
pub struct TableCallbacks {
    on_sorting_change: Option<Callback<SortingState>>,
    on_filtering_change: Option<Callback<FilteringState>>,
    on_pagination_change: Option<Callback<PaginationState>>,
    on_selection_change: Option<Callback<SelectionState>>,
}

impl TableCallbacks {
    /// Create an empty callback set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Called when the sorting snapshot is replaced.
    pub fn on_sorting_change<F>(mut self, f: F) -> Self
    where
        F: Fn(Arc<SortingState>) + Send + Sync + 'static,
    {
        self.on_sorting_change = Some(Box::new(f));
        self
    }

    /// Called when the filtering snapshot is replaced.
    pub fn on_filtering_change<F>(mut self, f: F) -> Self
    where
        F: Fn(Arc<FilteringState>) + Send + Sync + 'static,
    {
        self.on_filtering_change = Some(Box::new(f));
        self
    }

    /// Called when the pagination snapshot is replaced, including clamping.
    pub fn on_pagination_change<F>(mut self, f: F) -> Self
    where
        F: Fn(Arc<PaginationState>) + Send + Sync + 'static,
    {
        self.on_pagination_change = Some(Box::new(f));
        self
    }

    /// Called when the selection snapshot is replaced.
    pub fn on_selection_change<F>(mut self, f: F) -> Self
    where
        F: Fn(Arc<SelectionState>) + Send + Sync + 'static,
    {
        self.on_selection_change = Some(Box::new(f));
        self
    }

    pub(crate) fn sorting_changed(&self, state: &Arc<SortingState>) {
        if let Some(f) = &self.on_sorting_change {
            f(Arc::clone(state));
        }
    }

    pub(crate) fn filtering_changed(&self, state: &Arc<FilteringState>) {
        if let Some(f) = &self.on_filtering_change {
            f(Arc::clone(state));
        }
    }

    pub(crate) fn pagination_changed(&self, state: &Arc<PaginationState>) {
        if let Some(f) = &self.on_pagination_change {
            f(Arc::clone(state));
        }
    }

    pub(crate) fn selection_changed(&self, state: &Arc<SelectionState>) {
        if let Some(f) = &self.on_selection_change {
            f(Arc::clone(state));
        }
    }
}

impl fmt::Debug for TableCallbacks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TableCallbacks")
            .field("on_sorting_change", &self.on_sorting_change.is_some())
            .field("on_filtering_change", &self.on_filtering_change.is_some())
            .field("on_pagination_change", &self.on_pagination_change.is_some())
            .field("on_selection_change", &self.on_selection_change.is_some())
            .finish()
    }
}
