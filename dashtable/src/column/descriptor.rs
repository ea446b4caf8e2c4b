//! Column descriptor types.

use std::fmt;
use std::sync::Arc;

use serde::Deserialize;
use serde::Serialize;

use crate::filtering::FilterMatcher;
use crate::model::{TableRow, Value};

/// Horizontal alignment for column content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    #[default]
    Left,
    Center,
    Right,
}

/// Column width specification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnWidth {
    /// Fixed width in characters.
    Fixed(u16),
    /// Flexible width with weight.
    Flex(u16),
    /// Sized to content by the host.
    Auto,
}

impl Default for ColumnWidth {
    fn default() -> Self {
        ColumnWidth::Flex(1)
    }
}

type AccessorFn<T> = Arc<dyn Fn(&T) -> Value + Send + Sync>;
type FormatterFn<T> = Arc<dyn Fn(&T) -> String + Send + Sync>;

/// Column configuration.
///
/// A column says how to read a value out of a row, whether that value takes
/// part in sorting and filtering, and how the host should lay it out.
///
/// Values are resolved in this order:
/// 1. the accessor function, if one is set;
/// 2. the accessor key, if one is set;
/// 3. the column id used as a field key.
///
/// # Examples
///
/// ```
/// use dashtable::{Alignment, ColumnDescriptor, Value};
///
/// let columns: Vec<ColumnDescriptor<serde_json::Value>> = vec![
///     ColumnDescriptor::new("name").header("Name").sortable().filterable(),
///     ColumnDescriptor::new("email").accessor_key("contact_email").filterable(),
///     ColumnDescriptor::new("age")
///         .accessor(|row: &serde_json::Value| Value::from_json(&row["age"]))
///         .sortable()
///         .align(Alignment::Right),
/// ];
/// ```
pub struct ColumnDescriptor<T> {
    /// Unique identifier for this column.
    pub id: String,
    /// Header text.
    pub header: String,
    /// Field key used to read the value from a row.
    pub accessor_key: Option<String>,
    accessor_fn: Option<AccessorFn<T>>,
    formatter: Option<FormatterFn<T>>,
    /// Whether this column can be sorted on.
    pub sortable: bool,
    /// Whether this column takes part in filtering and global search.
    pub filterable: bool,
    /// How per-column filter values are matched.
    pub matcher: FilterMatcher,
    /// Width specification.
    pub width: ColumnWidth,
    /// Horizontal alignment.
    pub align: Alignment,
}

impl<T> ColumnDescriptor<T> {
    /// Create a new column. The header defaults to the id.
    pub fn new(id: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            header: id.clone(),
            id,
            accessor_key: None,
            accessor_fn: None,
            formatter: None,
            sortable: false,
            filterable: false,
            matcher: FilterMatcher::Auto,
            width: ColumnWidth::default(),
            align: Alignment::Left,
        }
    }

    /// Set the header text.
    pub fn header(mut self, header: impl Into<String>) -> Self {
        self.header = header.into();
        self
    }

    /// Read the value from the given field key.
    pub fn accessor_key(mut self, key: impl Into<String>) -> Self {
        self.accessor_key = Some(key.into());
        self
    }

    /// Compute the value with a function. Takes precedence over the key.
    pub fn accessor<F>(mut self, f: F) -> Self
    where
        F: Fn(&T) -> Value + Send + Sync + 'static,
    {
        self.accessor_fn = Some(Arc::new(f));
        self
    }

    /// Format the display value with a function.
    pub fn format<F>(mut self, f: F) -> Self
    where
        F: Fn(&T) -> String + Send + Sync + 'static,
    {
        self.formatter = Some(Arc::new(f));
        self
    }

    /// Make the column sortable.
    pub fn sortable(mut self) -> Self {
        self.sortable = true;
        self
    }

    /// Make the column filterable.
    pub fn filterable(mut self) -> Self {
        self.filterable = true;
        self
    }

    /// Set how per-column filters are matched.
    pub fn matcher(mut self, matcher: FilterMatcher) -> Self {
        self.matcher = matcher;
        self
    }

    /// Set a fixed width for this column.
    pub fn fixed(mut self, width: u16) -> Self {
        self.width = ColumnWidth::Fixed(width);
        self
    }

    /// Set a flex width for this column.
    pub fn flex(mut self, weight: u16) -> Self {
        self.width = ColumnWidth::Flex(weight);
        self
    }

    /// Let the host size this column to its content.
    pub fn auto(mut self) -> Self {
        self.width = ColumnWidth::Auto;
        self
    }

    /// Set the column alignment.
    pub fn align(mut self, align: Alignment) -> Self {
        self.align = align;
        self
    }

    /// Whether the column has a custom formatter.
    pub fn has_formatter(&self) -> bool {
        self.formatter.is_some()
    }
}

impl<T: TableRow> ColumnDescriptor<T> {
    /// Resolve the cell value for a row.
    pub fn value(&self, row: &T) -> Value {
        if let Some(f) = &self.accessor_fn {
            return f(row);
        }
        row.field(self.accessor_key.as_deref().unwrap_or(&self.id))
    }

    /// Resolve the sort key for a row.
    pub fn sort_key(&self, row: &T) -> Value {
        self.value(row)
    }

    /// Resolve the display value for a row.
    pub fn display_value(&self, row: &T) -> String {
        match &self.formatter {
            Some(f) => f(row),
            None => self.value(row).to_string(),
        }
    }
}

impl<T> Clone for ColumnDescriptor<T> {
    fn clone(&self) -> Self {
        Self {
            id: self.id.clone(),
            header: self.header.clone(),
            accessor_key: self.accessor_key.clone(),
            accessor_fn: self.accessor_fn.clone(),
            formatter: self.formatter.clone(),
            sortable: self.sortable,
            filterable: self.filterable,
            matcher: self.matcher.clone(),
            width: self.width,
            align: self.align,
        }
    }
}

impl<T> fmt::Debug for ColumnDescriptor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ColumnDescriptor")
            .field("id", &self.id)
            .field("header", &self.header)
            .field("accessor_key", &self.accessor_key)
            .field("accessor_fn", &self.accessor_fn.is_some())
            .field("formatter", &self.formatter.is_some())
            .field("sortable", &self.sortable)
            .field("filterable", &self.filterable)
            .field("matcher", &self.matcher)
            .field("width", &self.width)
            .field("align", &self.align)
            .finish()
    }
}
