//! Aligned text tables for terminal reports.
//!
//! A [`Table`] holds a title, a fixed set of column headers and rows of
//! already-formatted cells. Rendering pads every column to the widest value
//! it contains, optionally truncating long cells first, and frames the result
//! with a title banner and a row-count footer:
//!
//! ```text
//!
//! ============================================================
//!   Users
//! ============================================================
//!   ID | Username
//!   ---+---------
//!   1  | alice
//!
//!   Total: 1 rows
//! ```

use thiserror::Error;
use unicode_width::UnicodeWidthChar;

pub const BANNER_CHAR: char = '=';
pub const RULE_CHAR: char = '-';
pub const COLUMN_SEPARATOR: &str = " | ";
pub const RULE_SEPARATOR: &str = "-+-";
pub const INDENT: &str = "  ";
pub const NO_DATA: &str = "(no data)";

/// Text used for SQL `NULL` cells.
pub const NULL_CELL: &str = "NULL";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TableError {
    #[error("table must have at least one column")]
    NoColumns,

    #[error("row/header length mismatch: row {row} has {found} values, expected {expected}")]
    RowLength {
        row: usize,
        expected: usize,
        found: usize,
    },
}

/// Layout settings shared by every table of one report tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableStyle {
    /// Length of the `=` banner framing the title.
    pub banner_width: usize,
    /// Cells wider than this are cut before measuring and display.
    pub max_cell_width: Option<usize>,
}

impl TableStyle {
    /// Style of the PostgreSQL shop reports.
    pub const SHOP: TableStyle = TableStyle {
        banner_width: 60,
        max_cell_width: None,
    };

    /// Style of the SQL Server version reports.
    pub const VERSIONS: TableStyle = TableStyle {
        banner_width: 80,
        max_cell_width: Some(50),
    };

    pub fn banner(&self) -> String {
        BANNER_CHAR.to_string().repeat(self.banner_width)
    }

    /// Applies the cell cap, if any.
    pub fn fit<'a>(&self, cell: &'a str) -> &'a str {
        match self.max_cell_width {
            Some(max) => truncate_to_width(cell, max),
            None => cell,
        }
    }
}

impl Default for TableStyle {
    fn default() -> Self {
        Self::SHOP
    }
}

/// A record that knows how to lay itself out as one table row.
pub trait TableRow {
    /// Column headers, in cell order.
    const HEADERS: &'static [&'static str];

    fn cells(&self) -> Vec<String>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    title: String,
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new<I, S>(title: impl Into<String>, headers: I) -> Result<Self, TableError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let headers: Vec<String> = headers
            .into_iter()
            .map(|header| flatten_controls(header.into()))
            .collect();
        if headers.is_empty() {
            return Err(TableError::NoColumns);
        }

        Ok(Self {
            title: title.into(),
            headers,
            rows: Vec::new(),
        })
    }

    /// Builds a table from typed records using their declared headers.
    pub fn from_records<R: TableRow>(
        title: impl Into<String>,
        records: &[R],
    ) -> Result<Self, TableError> {
        let mut table = Self::new(title, R::HEADERS.iter().copied())?;
        for record in records {
            table.push_row(record.cells())?;
        }
        Ok(table)
    }

    /// Appends a row, rejecting it when its length differs from the header count.
    pub fn push_row<I, V>(&mut self, row: I) -> Result<(), TableError>
    where
        I: IntoIterator<Item = V>,
        V: ToString,
    {
        let row: Vec<String> = row
            .into_iter()
            .map(|value| flatten_controls(value.to_string()))
            .collect();
        if row.len() != self.headers.len() {
            return Err(TableError::RowLength {
                row: self.rows.len(),
                expected: self.headers.len(),
                found: row.len(),
            });
        }
        self.rows.push(row);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Width of each column: the widest of its header and its (capped) cells.
    pub fn column_widths(&self, style: &TableStyle) -> Vec<usize> {
        let mut widths: Vec<usize> = self.headers.iter().map(|h| display_width(h)).collect();
        for row in &self.rows {
            for (width, cell) in widths.iter_mut().zip(row) {
                *width = (*width).max(display_width(style.fit(cell)));
            }
        }
        widths
    }

    pub fn render(&self, style: &TableStyle) -> String {
        let banner = style.banner();
        let mut lines = vec![
            String::new(),
            banner.clone(),
            format!("{INDENT}{}", self.title),
            banner,
        ];

        if self.rows.is_empty() {
            lines.push(format!("{INDENT}{NO_DATA}"));
            return join_lines(lines);
        }

        let widths = self.column_widths(style);

        lines.push(format_line(
            self.headers.iter().map(String::as_str),
            &widths,
            COLUMN_SEPARATOR,
        ));

        let rule = widths
            .iter()
            .map(|w| RULE_CHAR.to_string().repeat(*w))
            .collect::<Vec<_>>()
            .join(RULE_SEPARATOR);
        lines.push(format!("{INDENT}{rule}"));

        for row in &self.rows {
            lines.push(format_line(
                row.iter().map(|cell| style.fit(cell)),
                &widths,
                COLUMN_SEPARATOR,
            ));
        }

        lines.push(String::new());
        lines.push(format!("{INDENT}Total: {} rows", self.rows.len()));

        join_lines(lines)
    }
}

/// Renders a table in one call.
pub fn render_table<R, V>(
    title: &str,
    headers: &[&str],
    rows: R,
    style: &TableStyle,
) -> Result<String, TableError>
where
    R: IntoIterator,
    R::Item: IntoIterator<Item = V>,
    V: ToString,
{
    let mut table = Table::new(title, headers.iter().copied())?;
    for row in rows {
        table.push_row(row)?;
    }
    Ok(table.render(style))
}

/// Text for an optional database value.
pub fn cell<T: ToString>(value: &Option<T>) -> String {
    value
        .as_ref()
        .map(ToString::to_string)
        .unwrap_or_else(|| NULL_CELL.to_string())
}

/// Terminal columns taken by `text`; control characters count as zero.
pub fn display_width(text: &str) -> usize {
    text.chars().map(|ch| ch.width().unwrap_or(0)).sum()
}

/// Replaces tabs, newlines and other control characters with a space so a
/// cell stays on one line.
fn flatten_controls(text: String) -> String {
    if !text.chars().any(char::is_control) {
        return text;
    }
    text.chars()
        .map(|ch| if ch.is_control() { ' ' } else { ch })
        .collect()
}

/// Cuts `text` so it occupies at most `max` terminal columns.
pub fn truncate_to_width(text: &str, max: usize) -> &str {
    let mut used = 0;
    for (idx, ch) in text.char_indices() {
        let w = ch.width().unwrap_or(0);
        if used + w > max {
            return &text[..idx];
        }
        used += w;
    }
    text
}

/// Left-justifies `text` to `width` columns.
pub fn pad(text: &str, width: usize) -> String {
    let mut out = String::with_capacity(width.max(text.len()));
    out.push_str(text);
    for _ in display_width(text)..width {
        out.push(' ');
    }
    out
}

fn format_line<'a>(cells: impl Iterator<Item = &'a str>, widths: &[usize], sep: &str) -> String {
    let body = cells
        .zip(widths)
        .map(|(cell, width)| pad(cell, *width))
        .collect::<Vec<_>>()
        .join(sep);
    format!("{INDENT}{body}")
}

fn join_lines(lines: Vec<String>) -> String {
    let mut out = lines.join("\n");
    out.push('\n');
    out
}
