//! Sorting state and the sorting engine.

use std::cmp::Ordering;

use serde::Deserialize;
use serde::Serialize;

use crate::column::{ColumnDescriptor, ColumnRegistry};
use crate::model::{TableRow, Value};

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    /// Ascending order (A-Z, 0-9).
    Asc,
    /// Descending order (Z-A, 9-0).
    Desc,
}

/// One sort key: a column and its direction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortCriterion {
    /// Column to sort on.
    pub column_id: String,
    /// Whether the order is descending.
    #[serde(default)]
    pub descending: bool,
}

impl SortCriterion {
    /// Returns the direction of this criterion.
    pub fn direction(&self) -> SortDirection {
        if self.descending {
            SortDirection::Desc
        } else {
            SortDirection::Asc
        }
    }
}

/// Ordered sort criteria. The first criterion is the primary key.
///
/// Snapshots are never mutated; every transition returns a new state.
///
/// # Example
///
/// ```
/// use dashtable::SortingState;
///
/// let sorting = SortingState::desc("revenue").then_asc("name");
/// assert_eq!(sorting.len(), 2);
///
/// // ascending -> descending -> removed
/// let s = SortingState::default().toggled("name", false);
/// let s = s.toggled("name", false);
/// assert!(s.criteria()[0].descending);
/// assert!(s.toggled("name", false).is_empty());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SortingState {
    criteria: Vec<SortCriterion>,
}

impl SortingState {
    /// Creates an ascending sort on a column.
    pub fn asc(column_id: impl Into<String>) -> Self {
        Self::default().then_asc(column_id)
    }

    /// Creates a descending sort on a column.
    pub fn desc(column_id: impl Into<String>) -> Self {
        Self::default().then_desc(column_id)
    }

    /// Adds a secondary ascending key.
    pub fn then_asc(mut self, column_id: impl Into<String>) -> Self {
        self.criteria.push(SortCriterion {
            column_id: column_id.into(),
            descending: false,
        });
        self
    }

    /// Adds a secondary descending key.
    pub fn then_desc(mut self, column_id: impl Into<String>) -> Self {
        self.criteria.push(SortCriterion {
            column_id: column_id.into(),
            descending: true,
        });
        self
    }

    /// Returns the criteria in priority order.
    pub fn criteria(&self) -> &[SortCriterion] {
        &self.criteria
    }

    /// Returns the number of criteria.
    pub fn len(&self) -> usize {
        self.criteria.len()
    }

    /// Returns `true` if nothing is sorted.
    pub fn is_empty(&self) -> bool {
        self.criteria.is_empty()
    }

    /// Returns the direction a column is sorted in, if it is sorted.
    pub fn direction_of(&self, column_id: &str) -> Option<SortDirection> {
        self.criteria
            .iter()
            .find(|c| c.column_id == column_id)
            .map(SortCriterion::direction)
    }

    /// Cycles a column through ascending, descending and unsorted.
    ///
    /// An unsorted column becomes ascending: appended as the lowest priority
    /// key when `multi` is set, replacing every other key otherwise.
    pub fn toggled(&self, column_id: &str, multi: bool) -> Self {
        match self.criteria.iter().position(|c| c.column_id == column_id) {
            Some(i) if !self.criteria[i].descending => {
                let mut criteria = if multi {
                    self.criteria.clone()
                } else {
                    vec![self.criteria[i].clone()]
                };
                let at = if multi { i } else { 0 };
                criteria[at].descending = true;
                Self { criteria }
            }
            Some(_) => self.without(column_id),
            None => self.with_sort(column_id, false, multi),
        }
    }

    /// Sorts a column in the given direction.
    ///
    /// With `multi`, an existing key keeps its priority and a new key is
    /// appended; without it, the column becomes the only key.
    pub fn with_sort(&self, column_id: &str, descending: bool, multi: bool) -> Self {
        let criterion = SortCriterion {
            column_id: column_id.to_string(),
            descending,
        };
        if !multi {
            return Self {
                criteria: vec![criterion],
            };
        }
        let mut criteria = self.criteria.clone();
        match criteria.iter_mut().find(|c| c.column_id == column_id) {
            Some(existing) => existing.descending = descending,
            None => criteria.push(criterion),
        }
        Self { criteria }
    }

    /// Removes a column from the sort order.
    pub fn without(&self, column_id: &str) -> Self {
        Self {
            criteria: self
                .criteria
                .iter()
                .filter(|c| c.column_id != column_id)
                .cloned()
                .collect(),
        }
    }

    /// Returns an empty sorting state.
    pub fn cleared(&self) -> Self {
        Self::default()
    }
}

impl FromIterator<SortCriterion> for SortingState {
    fn from_iter<I: IntoIterator<Item = SortCriterion>>(iter: I) -> Self {
        Self {
            criteria: iter.into_iter().collect(),
        }
    }
}

/// Orders rows by the sorting state.
///
/// Stable multi-key sort: the first criterion is the primary key, later
/// criteria break ties, and rows equal under every key keep their input
/// order. `Null` values sort last in both directions. Criteria naming
/// unknown columns are ignored.
pub fn apply_sort<'a, T, I>(rows: I, sorting: &SortingState, columns: &ColumnRegistry<T>) -> Vec<&'a T>
where
    T: TableRow + 'a,
    I: IntoIterator<Item = &'a T>,
{
    let rows: Vec<&'a T> = rows.into_iter().collect();
    if sorting.is_empty() {
        return rows;
    }

    let keys: Vec<(&ColumnDescriptor<T>, bool)> = sorting
        .criteria()
        .iter()
        .filter_map(|c| columns.get(&c.column_id).map(|col| (col, c.descending)))
        .collect();
    if keys.len() < sorting.len() {
        log::warn!(
            "Ignoring {} sort criteria on unknown columns",
            sorting.len() - keys.len()
        );
    }

    // Resolve sort keys once per row rather than once per comparison.
    let mut keyed: Vec<(Vec<Value>, &'a T)> = rows
        .into_iter()
        .map(|row| (keys.iter().map(|(col, _)| col.sort_key(row)).collect(), row))
        .collect();

    keyed.sort_by(|(a, _), (b, _)| compare_keys(a, b, &keys));
    log::trace!("Sorted {} rows by {} keys", keyed.len(), keys.len());

    keyed.into_iter().map(|(_, row)| row).collect()
}

fn compare_keys<T>(a: &[Value], b: &[Value], keys: &[(&ColumnDescriptor<T>, bool)]) -> Ordering {
    a.iter()
        .zip(b)
        .zip(keys)
        .map(|((x, y), (_, descending))| match (x.is_null(), y.is_null()) {
            (true, true) => Ordering::Equal,
            (true, false) => Ordering::Greater,
            (false, true) => Ordering::Less,
            (false, false) if *descending => x.compare(y).reverse(),
            (false, false) => x.compare(y),
        })
        .find(|ord| ord.is_ne())
        .unwrap_or(Ordering::Equal)
}
