//! Plain-text table rendering.

use std::fmt::Write;

use dashtable::{
    Alignment, ColumnRegistry, ColumnWidth, SelectionWindow, SortDirection, TableStatus, TableView,
};
use serde_json::Value;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const MAX_AUTO_WIDTH: usize = 40;

pub fn render(view: &TableView<'_, Value>, columns: &ColumnRegistry<Value>) -> String {
    let headers: Vec<String> = columns
        .iter()
        .map(|c| match view.sorting.direction_of(&c.id) {
            Some(SortDirection::Asc) => format!("{} ^", c.header),
            Some(SortDirection::Desc) => format!("{} v", c.header),
            None => c.header.clone(),
        })
        .collect();
    let cells: Vec<Vec<String>> = view
        .rows
        .iter()
        .map(|row| columns.iter().map(|c| c.display_value(row)).collect())
        .collect();

    let widths: Vec<usize> = columns
        .iter()
        .enumerate()
        .map(|(i, c)| match c.width {
            ColumnWidth::Fixed(w) => usize::from(w),
            ColumnWidth::Flex(_) | ColumnWidth::Auto => cells
                .iter()
                .map(|r| r[i].width())
                .chain(std::iter::once(headers[i].width()))
                .max()
                .unwrap_or(0)
                .min(MAX_AUTO_WIDTH),
        })
        .collect();

    let mut out = String::new();
    let header_line = line(&headers, &widths, columns);
    let _ = writeln!(out, "    {}", header_line);
    let _ = writeln!(out, "    {}", "-".repeat(header_line.width()));
    for (i, row) in cells.iter().enumerate() {
        let mark = if view.is_selected_at(i) { "[x]" } else { "[ ]" };
        let _ = writeln!(out, "{} {}", mark, line(row, &widths, columns));
    }
    out.push_str(&footer(view));
    out
}

fn line(cells: &[String], widths: &[usize], columns: &ColumnRegistry<Value>) -> String {
    cells
        .iter()
        .zip(widths)
        .zip(columns.iter())
        .map(|((cell, &width), column)| pad(cell, width, column.align))
        .collect::<Vec<_>>()
        .join(" | ")
}

fn pad(text: &str, width: usize, align: Alignment) -> String {
    let text = truncate(text, width);
    let gap = width.saturating_sub(text.width());
    let (left, right) = match align {
        Alignment::Left => (0, gap),
        Alignment::Center => (gap / 2, gap - gap / 2),
        Alignment::Right => (gap, 0),
    };
    format!("{}{}{}", " ".repeat(left), text, " ".repeat(right))
}

/// Cut `text` to `width` terminal columns, marking the cut with `~`.
fn truncate(text: &str, width: usize) -> String {
    if text.width() <= width {
        return text.to_string();
    }
    let mut out = String::new();
    let mut used = 0;
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if used + w + 1 > width {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push('~');
    out
}

pub fn footer(view: &TableView<'_, Value>) -> String {
    let page = view.pagination.page_index();
    let range = view.pagination.row_range(view.filtered_rows);
    let mut out = if range.is_empty() {
        "No rows".to_string()
    } else {
        format!(
            "Showing {}-{} of {}",
            range.start + 1,
            range.end,
            view.filtered_rows
        )
    };
    if view.filtered_rows != view.total_rows {
        let _ = write!(out, " (filtered from {})", view.total_rows);
    }
    let _ = write!(out, " | page {}/{}", page + 1, view.total_pages);
    let _ = write!(out, " | {} selected", view.selection.len());
    let scope = window_label(view.window);
    if view.is_all_selected() {
        let _ = write!(out, ", all {}", scope);
    } else if view.is_indeterminate() {
        let _ = write!(out, ", {} {}", view.flags.selected_in_window, scope);
    }
    match &view.status {
        TableStatus::Loading => out.push_str(" | loading"),
        TableStatus::Error(e) => {
            let _ = write!(out, " | error: {}", e);
        }
        TableStatus::Idle | TableStatus::Ready => {}
    }
    out.push('\n');
    out
}

fn window_label(window: SelectionWindow) -> &'static str {
    match window {
        SelectionWindow::CurrentPage => "on page",
        SelectionWindow::FilteredRows => "of filtered rows",
        SelectionWindow::AllRows => "of all rows",
    }
}
