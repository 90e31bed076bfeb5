//! Pipe-table parsing and the five table layouts.
//!
//! Chat platforms cannot render Markdown tables, so a table is either
//! flattened into text (`none`, `list`, `compact`) or laid out in
//! monospace (`code`, `unicode`).

use std::sync::LazyLock;

use regex::Regex;
use unicode_width::UnicodeWidthStr;

use crate::config::TableStyle;
use crate::markers::PlatformMarkers;

static SEPARATOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\|?[\s\-:]+\|[\s\-:|]+\|?$").unwrap());

/// Header cells and data rows of a table.
///
/// Rows may be shorter or longer than the header; missing cells render
/// empty and extra cells are ignored by the column layouts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl ParsedTable {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        let headers = headers.into_iter().filter(|h| !h.is_empty()).collect();
        Self { headers, rows }
    }

    /// No headers and no rows: nothing worth rendering.
    pub fn is_empty(&self) -> bool {
        self.headers.is_empty() && self.rows.is_empty()
    }

    fn cell(&self, row: usize, column: usize) -> &str {
        self.rows[row].get(column).map(String::as_str).unwrap_or("")
    }

    /// Display width of each header column across header and rows.
    fn column_widths(&self) -> Vec<usize> {
        (0..self.headers.len())
            .map(|col| {
                (0..self.rows.len())
                    .map(|row| self.cell(row, col).width())
                    .fold(self.headers[col].width(), usize::max)
            })
            .collect()
    }
}

fn is_separator(line: &str) -> bool {
    if SEPARATOR.is_match(line) {
        return true;
    }
    line.contains('-')
        && line
            .chars()
            .all(|c| matches!(c, '-' | ':' | '|' | '+') || c.is_whitespace())
}

fn split_cells(line: &str) -> Vec<String> {
    let line = line.trim();
    let line = line.strip_prefix('|').unwrap_or(line);
    let line = line.strip_suffix('|').unwrap_or(line);
    line.split('|').map(|cell| cell.trim().to_string()).collect()
}

/// Parse consecutive pipe-delimited lines into a table.
///
/// The first non-separator line supplies the headers (empty header cells
/// are dropped); every later non-separator line is a row.
pub fn parse_markdown_table(text: &str) -> ParsedTable {
    let mut lines = text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !is_separator(line));

    let Some(header_line) = lines.next() else {
        return ParsedTable::default();
    };
    let headers = split_cells(header_line);
    let rows = lines.map(split_cells).collect();
    ParsedTable::new(headers, rows)
}

/// Parse `text` and lay it out in `style`. Text with no table content comes
/// back unchanged.
pub fn transform_table(text: &str, style: TableStyle, markers: &PlatformMarkers) -> String {
    let table = parse_markdown_table(text);
    if table.is_empty() {
        return text.to_string();
    }
    format_table(&table, style, markers)
}

pub fn format_table(table: &ParsedTable, style: TableStyle, markers: &PlatformMarkers) -> String {
    match style {
        // Without headers there are no columns to lay out; keep the cells.
        _ if table.headers.is_empty() => plain(table),
        TableStyle::None => plain(table),
        // Row-oriented layouts have nothing to show for a header-only table.
        TableStyle::List | TableStyle::Compact if table.rows.is_empty() => plain(table),
        TableStyle::Code => code(table),
        TableStyle::List => list(table, markers),
        TableStyle::Compact => compact(table, markers),
        TableStyle::Unicode => boxed(table),
    }
}

fn plain(table: &ParsedTable) -> String {
    let mut lines = vec![table.headers.join(", ")];
    lines.extend(table.rows.iter().map(|row| row.join(", ")));
    lines.join("\n").trim().to_string()
}

fn pad(cell: &str, width: usize) -> String {
    let fill = width.saturating_sub(cell.width());
    format!("{cell}{}", " ".repeat(fill))
}

fn padded_row<'a>(cells: impl Iterator<Item = &'a str>, widths: &[usize]) -> Vec<String> {
    cells.zip(widths).map(|(cell, &w)| pad(cell, w)).collect()
}

fn code(table: &ParsedTable) -> String {
    let widths = table.column_widths();
    let mut lines = Vec::with_capacity(table.rows.len() + 2);

    lines.push(padded_row(table.headers.iter().map(String::as_str), &widths).join(" | "));
    lines.push(
        widths
            .iter()
            .map(|&w| "-".repeat(w))
            .collect::<Vec<_>>()
            .join("-+-"),
    );
    for row in 0..table.rows.len() {
        let cells = (0..widths.len()).map(|col| table.cell(row, col));
        lines.push(padded_row(cells, &widths).join(" | "));
    }

    format!("```\n{}\n```", lines.join("\n"))
}

fn list(table: &ParsedTable, markers: &PlatformMarkers) -> String {
    (0..table.rows.len())
        .map(|row| {
            let mut block = markers.bold(&format!("Row {}:", row + 1));
            for (col, header) in table.headers.iter().enumerate() {
                block.push_str(&format!("\n• {}: {}", header, table.cell(row, col)));
            }
            block
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn compact(table: &ParsedTable, markers: &PlatformMarkers) -> String {
    (0..table.rows.len())
        .map(|row| {
            table
                .headers
                .iter()
                .enumerate()
                .map(|(col, header)| format!("{}: {}", markers.bold(header), table.cell(row, col)))
                .collect::<Vec<_>>()
                .join(" | ")
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn boxed(table: &ParsedTable) -> String {
    let widths = table.column_widths();
    let rule = |left: &str, mid: &str, right: &str| {
        let segments: Vec<String> = widths.iter().map(|&w| "─".repeat(w + 2)).collect();
        format!("{left}{}{right}", segments.join(mid))
    };
    let line = |cells: Vec<String>| {
        let inner: Vec<String> = cells.iter().map(|c| format!(" {c} ")).collect();
        format!("│{}│", inner.join("│"))
    };

    let mut lines = vec![
        rule("┌", "┬", "┐"),
        line(padded_row(table.headers.iter().map(String::as_str), &widths)),
    ];
    if !table.rows.is_empty() {
        lines.push(rule("├", "┼", "┤"));
    }
    for row in 0..table.rows.len() {
        let cells = (0..widths.len()).map(|col| table.cell(row, col));
        lines.push(line(padded_row(cells, &widths)));
    }
    lines.push(rule("└", "┴", "┘"));
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markers::{TELEGRAM, WHATSAPP};

    const TABLE: &str = "| Name | Age |\n|------|-----|\n| Alice | 30 |\n| Bob | 4 |";

    #[test]
    fn test_parse_discards_separator() {
        let table = parse_markdown_table(TABLE);
        assert_eq!(table.headers, vec!["Name", "Age"]);
        assert_eq!(
            table.rows,
            vec![vec!["Alice".to_string(), "30".into()], vec!["Bob".into(), "4".into()]]
        );
    }

    #[test]
    fn test_parse_aligned_separator() {
        let table = parse_markdown_table("| a | b |\n|:---|---:|\n| 1 | 2 |");
        assert_eq!(table.headers, vec!["a", "b"]);
        assert_eq!(table.rows.len(), 1);
    }

    #[test]
    fn test_parse_single_column_separator() {
        let table = parse_markdown_table("| only |\n|---|\n| x |");
        assert_eq!(table.headers, vec!["only"]);
        assert_eq!(table.rows, vec![vec!["x".to_string()]]);
    }

    #[test]
    fn test_parse_grid_separator() {
        let table = parse_markdown_table("a | b\n--+--\n1 | 2");
        assert_eq!(table.headers, vec!["a", "b"]);
        assert_eq!(table.rows, vec![vec!["1".to_string(), "2".into()]]);
    }

    #[test]
    fn test_parse_drops_empty_header_cells() {
        let table = parse_markdown_table("|  | b |\n|---|---|\n| 1 | 2 |");
        assert_eq!(table.headers, vec!["b"]);
    }

    #[test]
    fn test_not_a_table_is_unchanged() {
        let input = "|---|---|";
        assert_eq!(transform_table(input, TableStyle::Code, &WHATSAPP), input);
    }

    #[test]
    fn test_none_style() {
        assert_eq!(
            transform_table(TABLE, TableStyle::None, &WHATSAPP),
            "Name, Age\nAlice, 30\nBob, 4"
        );
    }

    #[test]
    fn test_code_style() {
        assert_eq!(
            transform_table(TABLE, TableStyle::Code, &TELEGRAM),
            "```\nName  | Age\n------+----\nAlice | 30 \nBob   | 4  \n```"
        );
    }

    #[test]
    fn test_code_style_missing_cells_render_empty() {
        let out = transform_table("| a | b |\n|---|---|\n| 1 |", TableStyle::Code, &WHATSAPP);
        assert_eq!(out, "```\na | b\n--+--\n1 |  \n```");
    }

    #[test]
    fn test_list_style_no_blank_line_after_last_row() {
        assert_eq!(
            transform_table(TABLE, TableStyle::List, &WHATSAPP),
            "*Row 1:*\n• Name: Alice\n• Age: 30\n\n*Row 2:*\n• Name: Bob\n• Age: 4"
        );
    }

    #[test]
    fn test_compact_style() {
        assert_eq!(
            transform_table(TABLE, TableStyle::Compact, &TELEGRAM),
            "**Name**: Alice | **Age**: 30\n**Name**: Bob | **Age**: 4"
        );
    }

    #[test]
    fn test_unicode_style() {
        let expected = "\
┌───────┬─────┐
│ Name  │ Age │
├───────┼─────┤
│ Alice │ 30  │
│ Bob   │ 4   │
└───────┴─────┘";
        assert_eq!(transform_table(TABLE, TableStyle::Unicode, &WHATSAPP), expected);
    }

    #[test]
    fn test_headerless_table_keeps_rows() {
        let input = "|  |  |\n|---|---|\n| 1 | 2 |";
        for style in TableStyle::ALL {
            assert_eq!(transform_table(input, *style, &WHATSAPP), "1, 2", "{style}");
        }
    }

    #[test]
    fn test_header_only_table() {
        let input = "| a | b |\n|---|---|";
        assert_eq!(transform_table(input, TableStyle::List, &WHATSAPP), "a, b");
        assert_eq!(
            transform_table(input, TableStyle::Unicode, &WHATSAPP),
            "┌───┬───┐\n│ a │ b │\n└───┴───┘"
        );
    }

    #[test]
    fn test_wide_characters_use_display_width() {
        let out = transform_table("| 名前 | x |\n|---|---|\n| ab | y |", TableStyle::Code, &WHATSAPP);
        assert!(out.contains("名前 | x"));
        assert!(out.contains("ab   | y"));
        assert!(out.contains("-----+--"));
    }
}
