//! Command line arguments.

use std::path::PathBuf;

use clap::Parser;
use dashtable::{FilterValue, Value};
use simplelog::LevelFilter;

#[derive(Parser, Debug)]
#[command(name = "dashtable", version, about = "Sort, filter and page a JSON table")]
pub struct Cli {
    /// JSON file holding an array of row objects
    pub rows: PathBuf,

    /// Saved view: columns, config and state snapshots
    #[arg(long)]
    pub view: Option<PathBuf>,

    /// Sort by a column, e.g. `name` or `age:desc`. Repeat for multi-column sorting.
    #[arg(long = "sort", value_parser = parse_sort)]
    pub sort: Vec<SortArg>,

    /// Filter a column, e.g. `role=admin`, `role=admin|editor` or `age=18..65`
    #[arg(long = "filter", value_parser = parse_filter)]
    pub filter: Vec<FilterArg>,

    /// Case-insensitive search across all filterable columns
    #[arg(long)]
    pub search: Option<String>,

    /// Page to show, starting at 1
    #[arg(long)]
    pub page: Option<usize>,

    /// Rows per page
    #[arg(long)]
    pub page_size: Option<usize>,

    /// Select a row by id, keeping any saved selection. Repeatable.
    #[arg(long = "select")]
    pub select: Vec<String>,

    /// Field holding the row id
    #[arg(long, default_value = "id")]
    pub id_key: String,

    /// Write the resulting view to this file
    #[arg(long)]
    pub save_view: Option<PathBuf>,

    /// Log level written to stderr
    #[arg(long, default_value = "warn")]
    pub log_level: LevelFilter,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortArg {
    pub column: String,
    pub descending: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FilterArg {
    pub column: String,
    pub value: FilterValue,
}

fn parse_sort(s: &str) -> Result<SortArg, String> {
    let (column, descending) = match s.rsplit_once(':') {
        Some((column, "desc")) => (column, true),
        Some((column, "asc")) => (column, false),
        Some((_, other)) => return Err(format!("unknown sort direction '{}'", other)),
        None => (s, false),
    };
    if column.is_empty() {
        return Err("missing column".to_string());
    }
    Ok(SortArg {
        column: column.to_string(),
        descending,
    })
}

fn parse_filter(s: &str) -> Result<FilterArg, String> {
    let (column, raw) = s
        .split_once('=')
        .ok_or_else(|| format!("expected COLUMN=VALUE, got '{}'", s))?;
    if column.is_empty() {
        return Err("missing column".to_string());
    }

    let value = if let Some((min, max)) = raw.split_once("..") {
        FilterValue::Range {
            min: (!min.is_empty()).then(|| parse_scalar(min)),
            max: (!max.is_empty()).then(|| parse_scalar(max)),
        }
    } else if raw.contains('|') {
        FilterValue::one_of(raw.split('|').map(parse_scalar))
    } else {
        FilterValue::text(raw)
    };

    Ok(FilterArg {
        column: column.to_string(),
        value,
    })
}

/// Numbers first, then dates, then plain text.
fn parse_scalar(s: &str) -> Value {
    if let Ok(i) = s.parse::<i64>() {
        return Value::Int(i);
    }
    if let Ok(f) = s.parse::<f64>() {
        return Value::Float(f);
    }
    Value::parse_text(s)
}
