//! Plain-text table output.

use gridedit_lib::model::Table;
use unicode_width::UnicodeWidthStr;

const SEPARATOR: &str = " | ";

fn pad(s: &str, width: usize) -> String {
    let fill = width.saturating_sub(s.width());
    format!("{}{}", s, " ".repeat(fill))
}

/// Render the header and the visible rows, one line each, columns aligned
/// by display width.
pub fn render_visible(table: &Table) -> String {
    let mut widths: Vec<usize> = table.columns().iter().map(|c| c.width()).collect();
    for row in table.visible_rows() {
        for (width, cell) in widths.iter_mut().zip(row.cells()) {
            *width = (*width).max(cell.width());
        }
    }

    let line = |cells: &[String]| {
        cells
            .iter()
            .zip(&widths)
            .map(|(cell, width)| pad(cell, *width))
            .collect::<Vec<_>>()
            .join(SEPARATOR)
            .trim_end()
            .to_string()
    };

    let mut out = line(table.columns());
    out.push('\n');
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    out.push_str(&rule.join("-+-"));
    out.push('\n');
    for row in table.visible_rows() {
        out.push_str(&line(row.cells()));
        out.push('\n');
    }
    out
}
