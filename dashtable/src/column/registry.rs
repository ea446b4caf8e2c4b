//! Validated column set.

use std::collections::HashMap;
use std::collections::HashSet;

use super::ColumnDescriptor;
use crate::error::{ConfigError, StateError};
use crate::filtering::FilteringState;
use crate::model::{TableRow, Value};
use crate::sorting::SortingState;

/// The column set of one table, with unique ids.
///
/// Resolves cell values, display values and sort keys by column id, and
/// checks sorting and filtering snapshots against the columns.
#[derive(Debug, Clone)]
pub struct ColumnRegistry<T> {
    columns: Vec<ColumnDescriptor<T>>,
    index: HashMap<String, usize>,
}

impl<T> ColumnRegistry<T> {
    /// Build a registry. Fails if two descriptors share an id.
    pub fn new(columns: Vec<ColumnDescriptor<T>>) -> Result<Self, ConfigError> {
        let mut index = HashMap::with_capacity(columns.len());
        for (i, column) in columns.iter().enumerate() {
            if index.insert(column.id.clone(), i).is_some() {
                return Err(ConfigError::duplicate_column(&column.id));
            }
        }
        Ok(Self { columns, index })
    }

    /// Get a column by id.
    pub fn get(&self, id: &str) -> Option<&ColumnDescriptor<T>> {
        self.index.get(id).map(|&i| &self.columns[i])
    }

    /// Get the position of a column by id.
    pub fn position(&self, id: &str) -> Option<usize> {
        self.index.get(id).copied()
    }

    /// Iterate over columns in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &ColumnDescriptor<T>> {
        self.columns.iter()
    }

    /// Iterate over filterable columns in declaration order.
    pub fn filterable(&self) -> impl Iterator<Item = &ColumnDescriptor<T>> {
        self.columns.iter().filter(|c| c.filterable)
    }

    /// Get all column ids in declaration order.
    pub fn ids(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.id.as_str()).collect()
    }

    /// Get the number of columns.
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Check if there are no columns.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Check a sorting snapshot against the columns.
    pub fn validate_sorting(&self, sorting: &SortingState, multi: bool) -> Result<(), StateError> {
        if !multi && sorting.len() > 1 {
            return Err(StateError::MultiSortDisabled {
                count: sorting.len(),
            });
        }

        let mut seen = HashSet::new();
        for criterion in sorting.criteria() {
            let column = self
                .get(&criterion.column_id)
                .ok_or_else(|| StateError::unknown_column(&criterion.column_id))?;
            if !column.sortable {
                return Err(StateError::NotSortable {
                    column: column.id.clone(),
                });
            }
            if !seen.insert(criterion.column_id.as_str()) {
                return Err(StateError::DuplicateSortColumn {
                    column: criterion.column_id.clone(),
                });
            }
        }
        Ok(())
    }

    /// Check a filtering snapshot against the columns.
    pub fn validate_filtering(&self, filtering: &FilteringState) -> Result<(), StateError> {
        for column_id in filtering.column_filters().keys() {
            let column = self
                .get(column_id)
                .ok_or_else(|| StateError::unknown_column(column_id))?;
            if !column.filterable {
                return Err(StateError::NotFilterable {
                    column: column.id.clone(),
                });
            }
        }
        Ok(())
    }
}

impl<T: TableRow> ColumnRegistry<T> {
    /// Resolve the value of a column for a row. `None` for unknown columns.
    pub fn value(&self, row: &T, column_id: &str) -> Option<Value> {
        self.get(column_id).map(|c| c.value(row))
    }

    /// Resolve the display value of a column for a row.
    pub fn display_value(&self, row: &T, column_id: &str) -> Option<String> {
        self.get(column_id).map(|c| c.display_value(row))
    }

    /// Resolve the sort key of a column for a row.
    pub fn sort_key(&self, row: &T, column_id: &str) -> Option<Value> {
        self.get(column_id).map(|c| c.sort_key(row))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filtering::FilterValue;
    use serde_json::json;

    type Row = serde_json::Value;

    fn registry() -> ColumnRegistry<Row> {
        ColumnRegistry::new(vec![
            ColumnDescriptor::new("name").sortable().filterable(),
            ColumnDescriptor::new("role").filterable(),
            ColumnDescriptor::new("age").sortable(),
        ])
        .unwrap()
    }

    #[test]
    fn test_duplicate_column_id() {
        let err = ColumnRegistry::<Row>::new(vec![
            ColumnDescriptor::new("name"),
            ColumnDescriptor::new("age"),
            ColumnDescriptor::new("name"),
        ])
        .unwrap_err();
        assert_eq!(err, ConfigError::duplicate_column("name"));
    }

    #[test]
    fn test_resolves_by_id() {
        let registry = registry();
        let row = json!({ "name": "Ada", "age": 36 });
        assert_eq!(registry.value(&row, "age"), Some(Value::Int(36)));
        assert_eq!(registry.display_value(&row, "name").as_deref(), Some("Ada"));
        assert_eq!(registry.value(&row, "missing"), None);
        assert_eq!(registry.value(&row, "role"), Some(Value::Null));
    }

    #[test]
    fn test_validate_sorting() {
        let registry = registry();
        assert!(registry.validate_sorting(&SortingState::asc("name"), false).is_ok());
        assert_eq!(
            registry.validate_sorting(&SortingState::asc("role"), false),
            Err(StateError::NotSortable {
                column: "role".into()
            })
        );
        assert_eq!(
            registry.validate_sorting(&SortingState::asc("nope"), false),
            Err(StateError::unknown_column("nope"))
        );

        let two = SortingState::asc("name").then_desc("age");
        assert_eq!(
            registry.validate_sorting(&two, false),
            Err(StateError::MultiSortDisabled { count: 2 })
        );
        assert!(registry.validate_sorting(&two, true).is_ok());

        let dup = SortingState::asc("name").then_desc("name");
        assert_eq!(
            registry.validate_sorting(&dup, true),
            Err(StateError::DuplicateSortColumn {
                column: "name".into()
            })
        );
    }

    #[test]
    fn test_validate_filtering() {
        let registry = registry();
        let ok = FilteringState::default().with_column_filter("role", FilterValue::text("adm"));
        assert!(registry.validate_filtering(&ok).is_ok());

        let bad = FilteringState::default().with_column_filter("age", FilterValue::exact(3));
        assert_eq!(
            registry.validate_filtering(&bad),
            Err(StateError::NotFilterable {
                column: "age".into()
            })
        );
    }
}
