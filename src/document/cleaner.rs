// SPDX-License-Identifier: MIT OR Apache-2.0

//! Page text normalization and table rendering.

use once_cell::sync::Lazy;
use regex::Regex;

use super::source::Table;

/// `exam-\nple` -> `example`; the right-hand word character is checked by
/// [`join_hyphen_breaks`] so chained breaks like `x-\ny-\nz` all join.
static HYPHEN_BREAK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\w)-[ \t]*\r?\n\s*").expect("valid hyphenation regex"));

/// `<b>`, `</span>`, `<br/>` ...
static MARKUP_TAG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<[^<>]*>").expect("valid markup regex"));

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid whitespace regex"));

/// Marker that precedes every rendered table.
pub const TABLE_MARKER: &str = "Table:";

/// Clean raw page text: join hyphenated line breaks, strip markup tags,
/// collapse whitespace runs to single spaces and trim.
pub fn clean_page_text(raw: &str) -> String {
    let text = join_hyphen_breaks(raw);
    let text = MARKUP_TAG.replace_all(&text, " ");
    let text = WHITESPACE.replace_all(&text, " ");
    text.trim().to_string()
}

fn join_hyphen_breaks(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut last = 0;
    for caps in HYPHEN_BREAK.captures_iter(raw) {
        let (Some(whole), Some(left)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        let next = raw[whole.end()..].chars().next();
        if !next.is_some_and(|c| c.is_alphanumeric() || c == '_') {
            continue;
        }
        // keep the word character before the dash, drop the dash and the break
        out.push_str(&raw[last..left.end()]);
        last = whole.end();
    }
    out.push_str(&raw[last..]);
    out
}

/// Render a table as `Table:` followed by one line per row, cells joined by ` | `.
pub fn render_table(table: &Table) -> String {
    let mut out = String::from(TABLE_MARKER);
    for row in &table.rows {
        let cells: Vec<String> = row.iter().map(|cell| clean_page_text(cell)).collect();
        out.push('\n');
        out.push_str(&cells.join(" | "));
    }
    out
}

/// Combine cleaned prose with rendered tables, in table order.
pub fn compose_page(prose: &str, tables: &[Table]) -> String {
    let mut content = clean_page_text(prose);
    for table in tables.iter().filter(|t| !t.rows.is_empty()) {
        if !content.is_empty() {
            content.push_str("\n\n");
        }
        content.push_str(&render_table(table));
    }
    content
}
