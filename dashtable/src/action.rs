//! Row and bulk action descriptors.
//!
//! Actions are read-only: they hold a handler and an optional enablement
//! predicate, never state of their own.

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use crate::error::ConfigError;

type RowHandler<T> = Arc<dyn Fn(&T) + Send + Sync>;
type RowPredicate<T> = Arc<dyn Fn(&T) -> bool + Send + Sync>;
type BulkHandler<T> = Arc<dyn Fn(&[&T]) + Send + Sync>;
type BulkPredicate<T> = Arc<dyn Fn(&[&T]) -> bool + Send + Sync>;

/// An action offered on a single row.
pub struct TableAction<T> {
    /// Unique identifier among row actions.
    pub id: String,
    /// Label shown to the user.
    pub label: String,
    /// Optional icon name.
    pub icon: Option<String>,
    handler: RowHandler<T>,
    enabled: Option<RowPredicate<T>>,
}

impl<T> TableAction<T> {
    /// Create a row action. Enabled for every row unless a predicate is set.
    pub fn new<F>(id: impl Into<String>, label: impl Into<String>, handler: F) -> Self
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        Self {
            id: id.into(),
            label: label.into(),
            icon: None,
            handler: Arc::new(handler),
            enabled: None,
        }
    }

    /// Set the icon name.
    pub fn icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    /// Only enable the action for rows passing the predicate.
    pub fn enabled_when<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&T) -> bool + Send + Sync + 'static,
    {
        self.enabled = Some(Arc::new(predicate));
        self
    }

    /// Check whether the action is enabled for a row.
    pub fn is_enabled(&self, row: &T) -> bool {
        self.enabled.as_ref().is_none_or(|p| p(row))
    }

    pub(crate) fn invoke(&self, row: &T) {
        (self.handler)(row)
    }
}

/// An action offered on the current selection.
pub struct BulkAction<T> {
    /// Unique identifier among bulk actions.
    pub id: String,
    /// Label shown to the user.
    pub label: String,
    /// Optional icon name.
    pub icon: Option<String>,
    handler: BulkHandler<T>,
    enabled: Option<BulkPredicate<T>>,
}

impl<T> BulkAction<T> {
    /// Create a bulk action. Enabled whenever something is selected unless a
    /// predicate is set.
    pub fn new<F>(id: impl Into<String>, label: impl Into<String>, handler: F) -> Self
    where
        F: Fn(&[&T]) + Send + Sync + 'static,
    {
        Self {
            id: id.into(),
            label: label.into(),
            icon: None,
            handler: Arc::new(handler),
            enabled: None,
        }
    }

    /// Set the icon name.
    pub fn icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    /// Only enable the action for selections passing the predicate.
    pub fn enabled_when<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&[&T]) -> bool + Send + Sync + 'static,
    {
        self.enabled = Some(Arc::new(predicate));
        self
    }

    /// Check whether the action is enabled for the selected rows.
    pub fn is_enabled(&self, rows: &[&T]) -> bool {
        match &self.enabled {
            Some(p) => p(rows),
            None => !rows.is_empty(),
        }
    }

    pub(crate) fn invoke(&self, rows: &[&T]) {
        (self.handler)(rows)
    }
}

/// Row and bulk actions of one table, with unique ids per kind.
pub struct ActionSet<T> {
    row: Vec<TableAction<T>>,
    bulk: Vec<BulkAction<T>>,
}

impl<T> ActionSet<T> {
    /// Build an action set. Fails if two actions of the same kind share an id.
    pub fn new(row: Vec<TableAction<T>>, bulk: Vec<BulkAction<T>>) -> Result<Self, ConfigError> {
        check_unique(row.iter().map(|a| a.id.as_str()))?;
        check_unique(bulk.iter().map(|a| a.id.as_str()))?;
        Ok(Self { row, bulk })
    }

    /// Get the row actions in declaration order.
    pub fn row_actions(&self) -> &[TableAction<T>] {
        &self.row
    }

    /// Get the bulk actions in declaration order.
    pub fn bulk_actions(&self) -> &[BulkAction<T>] {
        &self.bulk
    }

    /// Find a row action by id.
    pub fn row_action(&self, id: &str) -> Option<&TableAction<T>> {
        self.row.iter().find(|a| a.id == id)
    }

    /// Find a bulk action by id.
    pub fn bulk_action(&self, id: &str) -> Option<&BulkAction<T>> {
        self.bulk.iter().find(|a| a.id == id)
    }
}

impl<T> Default for ActionSet<T> {
    fn default() -> Self {
        Self {
            row: Vec::new(),
            bulk: Vec::new(),
        }
    }
}

fn check_unique<'a>(ids: impl Iterator<Item = &'a str>) -> Result<(), ConfigError> {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            return Err(ConfigError::duplicate_action(id));
        }
    }
    Ok(())
}

impl<T> fmt::Debug for TableAction<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TableAction")
            .field("id", &self.id)
            .field("label", &self.label)
            .field("icon", &self.icon)
            .finish_non_exhaustive()
    }
}

impl<T> fmt::Debug for BulkAction<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BulkAction")
            .field("id", &self.id)
            .field("label", &self.label)
            .field("icon", &self.icon)
            .finish_non_exhaustive()
    }
}

impl<T> fmt::Debug for ActionSet<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionSet")
            .field("row", &self.row)
            .field("bulk", &self.bulk)
            .finish()
    }
}
