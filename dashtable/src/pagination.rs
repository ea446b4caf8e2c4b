//! Pagination state and the pagination engine.

use std::ops::Range;

use serde::Deserialize;
use serde::Serialize;

use crate::error::StateError;

/// Default number of rows per page.
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Page position and size.
///
/// Snapshots are never mutated; every transition returns a new state.
///
/// # Example
///
/// ```
/// use dashtable::PaginationState;
///
/// let page = PaginationState::new(2, 10).unwrap();
/// assert_eq!(page.with_page_size(25).page_index(), 0);
/// assert_eq!(page.clamped(7).page_index(), 0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PaginationState {
    page_index: usize,
    page_size: usize,
}

impl Default for PaginationState {
    fn default() -> Self {
        Self {
            page_index: 0,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl PaginationState {
    /// Creates a pagination state. Fails if `page_size` is zero.
    pub fn new(page_index: usize, page_size: usize) -> Result<Self, StateError> {
        if page_size == 0 {
            return Err(StateError::InvalidPageSize { size: page_size });
        }
        Ok(Self {
            page_index,
            page_size,
        })
    }

    /// First page of the given size. A zero size becomes 1.
    pub fn first(page_size: usize) -> Self {
        Self {
            page_index: 0,
            page_size: page_size.max(1),
        }
    }

    /// Returns the zero-based page index.
    pub fn page_index(&self) -> usize {
        self.page_index
    }

    /// Returns the number of rows per page.
    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Returns the number of pages needed for `row_count` rows. Never zero.
    pub fn total_pages(&self, row_count: usize) -> usize {
        row_count.div_ceil(self.page_size.max(1)).max(1)
    }

    /// Moves to a page. The index is not clamped until [`clamped`](Self::clamped).
    pub fn with_page_index(&self, page_index: usize) -> Self {
        Self {
            page_index,
            ..*self
        }
    }

    /// Changes the page size and returns to the first page.
    pub fn with_page_size(&self, page_size: usize) -> Self {
        Self::first(page_size)
    }

    /// Moves to the next page, staying on the last one.
    pub fn next(&self, row_count: usize) -> Self {
        self.with_page_index(self.page_index.saturating_add(1)).clamped(row_count)
    }

    /// Moves to the previous page, staying on the first one.
    pub fn previous(&self) -> Self {
        self.with_page_index(self.page_index.saturating_sub(1))
    }

    /// Pulls the page index back onto the last page if it is past it.
    pub fn clamped(&self, row_count: usize) -> Self {
        let last = self.total_pages(row_count) - 1;
        self.with_page_index(self.page_index.min(last))
    }

    /// Row positions covered by this page for `row_count` rows.
    pub fn row_range(&self, row_count: usize) -> Range<usize> {
        let start = self.page_index.saturating_mul(self.page_size).min(row_count);
        let end = start.saturating_add(self.page_size).min(row_count);
        start..end
    }
}

/// One page of rows.
#[derive(Debug, Clone, PartialEq)]
pub struct PageSlice<'r, R> {
    /// Rows on this page.
    pub rows: &'r [R],
    /// Number of pages, at least 1.
    pub total_pages: usize,
    /// Number of rows across all pages.
    pub total_rows: usize,
    /// The effective state, after clamping.
    pub state: PaginationState,
    /// Whether the requested page index had to be clamped.
    pub clamped: bool,
}

impl<R> PageSlice<'_, R> {
    /// Returns the 1-based positions of the first and last row on this page,
    /// or `None` for an empty page.
    pub fn showing(&self) -> Option<(usize, usize)> {
        let range = self.state.row_range(self.total_rows);
        (!range.is_empty()).then(|| (range.start + 1, range.end))
    }

    /// Returns `true` if there is a page after this one.
    pub fn has_next(&self) -> bool {
        self.state.page_index() + 1 < self.total_pages
    }

    /// Returns `true` if there is a page before this one.
    pub fn has_previous(&self) -> bool {
        self.state.page_index() > 0
    }
}

/// Cuts the page described by `pagination` out of `rows`.
///
/// `total_pages` is `ceil(len / page_size)` and at least 1. A page index past
/// the last page is clamped to the last page and reported through
/// [`PageSlice::clamped`].
pub fn paginate<'r, R>(rows: &'r [R], pagination: &PaginationState) -> PageSlice<'r, R> {
    let state = pagination.clamped(rows.len());
    let clamped = state != *pagination;
    if clamped {
        log::debug!(
            "Clamped page index {} to {} ({} rows)",
            pagination.page_index(),
            state.page_index(),
            rows.len()
        );
    }
    PageSlice {
        rows: &rows[state.row_range(rows.len())],
        total_pages: state.total_pages(rows.len()),
        total_rows: rows.len(),
        state,
        clamped,
    }
}
