//! Filtering state and the filtering engine.

mod matcher;

use std::collections::BTreeMap;

use serde::Deserialize;
use serde::Serialize;

pub use matcher::FilterMatcher;
use matcher::{FuzzyScorer, contains_ignore_case};

use crate::column::{ColumnDescriptor, ColumnRegistry};
use crate::model::{TableRow, Value};

/// A per-column filter value.
///
/// # Example
///
/// ```
/// use dashtable::FilterValue;
///
/// let by_name = FilterValue::text("ada");
/// let by_status = FilterValue::one_of(["open", "pending"]);
/// let by_age = FilterValue::range(Some(18), Some(65));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterValue {
    /// Free text.
    Text(String),
    /// A single expected value.
    Exact(Value),
    /// Any of several values.
    OneOf(Vec<Value>),
    /// Inclusive range; a missing bound is open.
    Range {
        #[serde(default)]
        min: Option<Value>,
        #[serde(default)]
        max: Option<Value>,
    },
}

impl FilterValue {
    /// Creates a text filter.
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    /// Creates an exact-value filter.
    pub fn exact(value: impl Into<Value>) -> Self {
        Self::Exact(value.into())
    }

    /// Creates a set-membership filter.
    pub fn one_of<V: Into<Value>>(values: impl IntoIterator<Item = V>) -> Self {
        Self::OneOf(values.into_iter().map(Into::into).collect())
    }

    /// Creates a range filter.
    pub fn range<A: Into<Value>, B: Into<Value>>(min: Option<A>, max: Option<B>) -> Self {
        Self::Range {
            min: min.map(Into::into),
            max: max.map(Into::into),
        }
    }

    /// Returns `false` for filters that let every row through
    /// (blank text, an empty set, a range without bounds).
    pub fn is_active(&self) -> bool {
        match self {
            Self::Text(text) => !text.trim().is_empty(),
            Self::Exact(_) => true,
            Self::OneOf(values) => !values.is_empty(),
            Self::Range { min, max } => min.is_some() || max.is_some(),
        }
    }
}

/// Per-column filters plus an optional global search string.
///
/// Snapshots are never mutated; every transition returns a new state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilteringState {
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    columns: BTreeMap<String, FilterValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    global: Option<String>,
}

impl FilteringState {
    /// Returns the per-column filters.
    pub fn column_filters(&self) -> &BTreeMap<String, FilterValue> {
        &self.columns
    }

    /// Returns the filter set on a column.
    pub fn column_filter(&self, column_id: &str) -> Option<&FilterValue> {
        self.columns.get(column_id)
    }

    /// Returns the global search string.
    pub fn global(&self) -> Option<&str> {
        self.global.as_deref()
    }

    /// Returns `true` if no filter restricts the rows.
    pub fn is_empty(&self) -> bool {
        self.global.is_none() && self.columns.values().all(|f| !f.is_active())
    }

    /// Sets the filter on a column, replacing any previous one.
    pub fn with_column_filter(&self, column_id: impl Into<String>, value: FilterValue) -> Self {
        let mut next = self.clone();
        next.columns.insert(column_id.into(), value);
        next
    }

    /// Removes the filter on a column.
    pub fn without_column_filter(&self, column_id: &str) -> Self {
        let mut next = self.clone();
        next.columns.remove(column_id);
        next
    }

    /// Sets the global search string. Blank strings clear it.
    pub fn with_global(&self, query: impl Into<String>) -> Self {
        let query = query.into();
        let mut next = self.clone();
        next.global = (!query.trim().is_empty()).then_some(query);
        next
    }

    /// Clears the global search string.
    pub fn without_global(&self) -> Self {
        let mut next = self.clone();
        next.global = None;
        next
    }

    /// Returns an empty filtering state.
    pub fn cleared(&self) -> Self {
        Self::default()
    }
}

/// Keeps the rows that pass every active filter.
///
/// The global search is a case-insensitive substring test against the
/// filterable columns' display values joined by a space. Per-column filters
/// use each column's [`FilterMatcher`]. All filters are combined with AND.
/// The output is a subset of the input, in input order.
pub fn apply_filter<'a, T, I>(rows: I, filtering: &FilteringState, columns: &ColumnRegistry<T>) -> Vec<&'a T>
where
    T: TableRow + 'a,
    I: IntoIterator<Item = &'a T>,
{
    let active: Vec<(&ColumnDescriptor<T>, &FilterValue)> = filtering
        .column_filters()
        .iter()
        .filter(|(_, value)| value.is_active())
        .filter_map(|(id, value)| match columns.get(id) {
            Some(column) => Some((column, value)),
            None => {
                log::warn!("Ignoring filter on unknown column '{}'", id);
                None
            }
        })
        .collect();
    let global = filtering.global().map(str::to_lowercase);
    let searchable: Vec<&ColumnDescriptor<T>> = columns.filterable().collect();

    if active.is_empty() && global.is_none() {
        return rows.into_iter().collect();
    }

    let mut fuzzy = FuzzyScorer::new();
    let mut kept = Vec::new();
    let mut total = 0usize;

    for row in rows {
        total += 1;

        if let Some(query) = &global {
            let haystack = searchable
                .iter()
                .map(|c| c.display_value(row))
                .collect::<Vec<_>>()
                .join(" ");
            if !contains_ignore_case(&haystack, query) {
                continue;
            }
        }

        let passes = active.iter().all(|(column, filter)| {
            let value = column.value(row);
            let display = column.display_value(row);
            column.matcher.matches_with(&value, &display, filter, &mut fuzzy)
        });
        if passes {
            kept.push(row);
        }
    }

    log::trace!("Filter kept {} of {} rows", kept.len(), total);
    kept
}
