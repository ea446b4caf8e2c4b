//! Tabular view engine for dashboard data tables.
//!
//! Derives the visible row window of a table from caller-supplied rows and
//! column descriptors, through four immutable state snapshots: sorting,
//! filtering, pagination and selection.
//!
//! The free functions [`apply_sort`], [`apply_filter`] and [`paginate`] are
//! pure and can be used on their own. [`TableEngine`] composes them, keeps the
//! snapshots and notifies the host when one is replaced.

pub mod action;
pub mod column;
pub mod engine;
pub mod error;
pub mod filtering;
pub mod model;
pub mod pagination;
pub mod selection;
pub mod sorting;

pub use action::{ActionSet, BulkAction, TableAction};
pub use column::{Alignment, ColumnDescriptor, ColumnRegistry, ColumnWidth};
pub use engine::{
    LoadError, TableCallbacks, TableConfig, TableEngine, TableEngineBuilder, TableStatus,
    TableView,
};
pub use error::*;
pub use filtering::{FilterMatcher, FilterValue, FilteringState, apply_filter};
pub use model::{RowId, RowIdResolver, TableRow, Value};
pub use pagination::{PageSlice, PaginationState, paginate};
pub use selection::{SelectionFlags, SelectionScope, SelectionState, SelectionWindow};
pub use sorting::{SortCriterion, SortDirection, SortingState, apply_sort};
