//! Table renderer.
//!
//! Turns a contiguous run of pipe-prefixed lines into a [`Table`] block.
//! The first row is always the header; column alignment is read from the
//! header cells' colons. A second row made only of whitespace, pipes,
//! colons, commas, dashes and digits is the alignment separator and is
//! dropped.

use std::borrow::Cow;
use std::sync::OnceLock;

use regex::Regex;

use crate::ast::{Alignment, Block, CowStr, Paragraph, Table};
use crate::inline::escape;
use crate::lexer::Line;
use crate::options::RenderOptions;

/// Build a block from a run of pipe-prefixed lines.
///
/// A run shorter than two lines cannot form a table and becomes a plain
/// paragraph of its escaped text.
pub fn consume<'a>(run: &[Line<'a>]) -> Block<'a> {
    if run.len() < 2 {
        let text = run.first().map_or("", |line| line.text.trim_end());
        return Block::Paragraph(Paragraph {
            html: Cow::Owned(escape(text).into_owned()),
        });
    }

    let mut rows: Vec<Vec<CowStr<'a>>> = run
        .iter()
        .map(|line| split_row(line.text).into_iter().map(Cow::Borrowed).collect())
        .collect();

    let body_start = if is_separator(&rows[1]) { 2 } else { 1 };
    let body = rows.split_off(body_start.min(rows.len()));
    let header = rows.swap_remove(0);
    let alignments = header.iter().map(|cell| alignment(cell)).collect();

    log::trace!(
        "table at line {}: {} columns, {} body rows",
        run[0].number,
        header.len(),
        body.len()
    );

    Block::Table(Table {
        header,
        alignments,
        rows: body,
    })
}

/// Strip one leading and one trailing pipe, split on `|`, trim each cell.
pub fn split_row(line: &str) -> Vec<&str> {
    let line = line.trim();
    let line = line.strip_prefix('|').unwrap_or(line);
    let line = line.strip_suffix('|').unwrap_or(line);
    line.split('|').map(str::trim).collect()
}

/// Alignment of a header cell.
///
/// A trailing colon alone maps to left and a leading colon alone maps to
/// right.
pub fn alignment(cell: &str) -> Alignment {
    match (cell.starts_with(':'), cell.ends_with(':')) {
        (true, true) => Alignment::Center,
        (false, true) => Alignment::Left,
        (true, false) => Alignment::Right,
        (false, false) => Alignment::None,
    }
}

/// Check whether a parsed row is the alignment separator row.
pub fn is_separator<S: AsRef<str>>(row: &[S]) -> bool {
    static SEPARATOR: OnceLock<Regex> = OnceLock::new();
    let re = SEPARATOR
        .get_or_init(|| Regex::new(r"^[\s|:,\-\d]+$").expect("invalid separator pattern"));

    let mut joined = String::new();
    for (i, cell) in row.iter().enumerate() {
        if i > 0 {
            joined.push('|');
        }
        joined.push_str(cell.as_ref());
    }
    re.is_match(&joined)
}

/// Render a table block to HTML.
pub fn render(table: &Table<'_>, options: &RenderOptions, out: &mut String) {
    let mut parts: Vec<String> = Vec::with_capacity(8 + table.rows.len() * 4);

    parts.push(match options.table_class.as_deref() {
        Some(class) => format!(
            "<table class=\"{}\">",
            html_escape::encode_double_quoted_attribute(class)
        ),
        None => "<table>".to_string(),
    });

    parts.push("<thead><tr>".to_string());
    for (j, cell) in table.header.iter().enumerate() {
        parts.push(cell_html("th", cell, table.alignments.get(j).copied()));
    }
    parts.push("</tr></thead>".to_string());

    if !table.rows.is_empty() {
        parts.push("<tbody>".to_string());
        for row in &table.rows {
            parts.push("<tr>".to_string());
            for (j, cell) in row.iter().enumerate() {
                parts.push(cell_html("td", cell, table.alignments.get(j).copied()));
            }
            parts.push("</tr>".to_string());
        }
        parts.push("</tbody>".to_string());
    }

    parts.push("</table>".to_string());
    out.push_str(&parts.join("\n"));
}

fn cell_html(tag: &str, text: &str, alignment: Option<Alignment>) -> String {
    match alignment.and_then(Alignment::css) {
        Some(align) => format!(
            "<{tag} style=\"text-align:{align}\">{}</{tag}>",
            escape(text)
        ),
        None => format!("<{tag}>{}</{tag}>", escape(text)),
    }
}
