//! Saved table views.
//!
//! A view file holds everything needed to reproduce what the user was looking
//! at: the column layout, the table configuration and the four state
//! snapshots.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use dashtable::{
    Alignment, ColumnDescriptor, ColumnWidth, FilterMatcher, FilteringState, PaginationState,
    SelectionScope, SelectionState, SortingState, TableConfig, TableEngine,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Serializable subset of a column descriptor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnSpec {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub header: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    #[serde(default)]
    pub sortable: bool,
    #[serde(default)]
    pub filterable: bool,
    #[serde(default)]
    pub matcher: MatcherSpec,
    #[serde(default)]
    pub width: ColumnWidth,
    #[serde(default)]
    pub align: Alignment,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatcherSpec {
    #[default]
    Auto,
    Equals,
    Contains,
    Range,
    Fuzzy,
}

impl From<MatcherSpec> for FilterMatcher {
    fn from(spec: MatcherSpec) -> Self {
        match spec {
            MatcherSpec::Auto => FilterMatcher::Auto,
            MatcherSpec::Equals => FilterMatcher::Equals,
            MatcherSpec::Contains => FilterMatcher::Contains,
            MatcherSpec::Range => FilterMatcher::Range,
            MatcherSpec::Fuzzy => FilterMatcher::Fuzzy,
        }
    }
}

impl ColumnSpec {
    /// A sortable, filterable column reading the field of the same name.
    pub fn inferred(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            header: None,
            key: None,
            sortable: true,
            filterable: true,
            matcher: MatcherSpec::Auto,
            width: ColumnWidth::Auto,
            align: Alignment::Left,
        }
    }

    pub fn to_descriptor(&self) -> ColumnDescriptor<Value> {
        let column = ColumnDescriptor::new(&self.id)
            .matcher(self.matcher.into())
            .align(self.align);
        let mut column = match self.width {
            ColumnWidth::Fixed(width) => column.fixed(width),
            ColumnWidth::Flex(weight) => column.flex(weight),
            ColumnWidth::Auto => column.auto(),
        };
        if let Some(header) = &self.header {
            column = column.header(header);
        }
        if let Some(key) = &self.key {
            column = column.accessor_key(key);
        }
        if self.sortable {
            column = column.sortable();
        }
        if self.filterable {
            column = column.filterable();
        }
        column
    }
}

/// Contents of a view file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewFile {
    #[serde(default)]
    pub columns: Vec<ColumnSpec>,
    #[serde(default = "default_config")]
    pub config: TableConfig,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id_key: Option<String>,
    #[serde(default)]
    pub sorting: SortingState,
    #[serde(default)]
    pub filtering: FilteringState,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pagination: Option<PaginationState>,
    #[serde(default)]
    pub selection: SelectionState,
}

fn default_config() -> TableConfig {
    TableConfig::new(SelectionScope::Persistent)
}

impl Default for ViewFile {
    fn default() -> Self {
        Self {
            columns: Vec::new(),
            config: default_config(),
            id_key: None,
            sorting: SortingState::default(),
            filtering: FilteringState::default(),
            pagination: None,
            selection: SelectionState::default(),
        }
    }
}

impl ViewFile {
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read view file {}", path.display()))?;
        serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse view file {}", path.display()))
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let text = serde_json::to_string_pretty(self).context("Failed to serialize view")?;
        fs::write(path, text)
            .with_context(|| format!("Failed to write view file {}", path.display()))
    }

    /// Capture the engine's current state, keeping this file's layout.
    pub fn capture(&self, engine: &TableEngine<Value>) -> Self {
        Self {
            columns: self.columns.clone(),
            config: engine.config().clone(),
            id_key: self.id_key.clone(),
            sorting: (*engine.sorting()).clone(),
            filtering: (*engine.filtering()).clone(),
            pagination: Some(*engine.pagination()),
            selection: (*engine.selection()).clone(),
        }
    }
}

/// Derive columns from the keys of the first object row.
pub fn infer_columns(rows: &[Value]) -> Vec<ColumnSpec> {
    rows.iter()
        .find_map(Value::as_object)
        .map(|row| row.keys().map(ColumnSpec::inferred).collect())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_infer_columns_from_first_object() {
        let rows = vec![json!({"id": 1, "name": "alice"}), json!({"other": true})];
        let ids: Vec<String> = infer_columns(&rows).into_iter().map(|c| c.id).collect();
        assert_eq!(ids, vec!["id", "name"]);
    }

    #[test]
    fn test_view_file_defaults() {
        let view: ViewFile = serde_json::from_str(r#"{"columns": [{"id": "name"}]}"#).unwrap();
        assert_eq!(view.columns.len(), 1);
        assert!(!view.columns[0].sortable);
        assert_eq!(view.config.selection_scope, SelectionScope::Persistent);
        assert!(view.sorting.is_empty());
    }

    #[test]
    fn test_column_spec_to_descriptor() {
        let spec: ColumnSpec = serde_json::from_str(
            r#"{"id": "mail", "key": "email", "filterable": true, "matcher": "fuzzy", "align": "right"}"#,
        )
        .unwrap();
        let column = spec.to_descriptor();
        assert_eq!(column.id, "mail");
        assert!(column.filterable);
        assert!(!column.sortable);
        assert_eq!(column.align, Alignment::Right);
        assert_eq!(
            column.display_value(&json!({"email": "a@b.c"})),
            "a@b.c"
        );
    }
}
