// SPDX-License-Identifier: MIT OR Apache-2.0

//! Page sources: where raw page text and tables come from.

use lopdf::{Document, ObjectId};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeMap;

use crate::errors::{DocumentLoadError, PageExtractionError};

/// Cells on a table row are separated by tabs or runs of two or more spaces.
static CELL_SEPARATOR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\t+| {2,}").expect("valid cell separator regex"));

/// Rows of cells, in reading order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    pub rows: Vec<Vec<String>>,
}

/// Raw extraction result for one page, before cleaning.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawPage {
    /// Prose text with table rows removed
    pub text: String,
    /// Tables found on the page, top to bottom
    pub tables: Vec<Table>,
}

impl RawPage {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            tables: Vec::new(),
        }
    }
}

/// Trait for anything that can hand out pages of a document.
pub trait PageSource {
    /// Total number of pages in the document.
    fn page_count(&self) -> u32;

    /// Extract a single page by its 1-based number.
    fn extract_page(&self, page_number: u32) -> Result<RawPage, PageExtractionError>;
}

/// PDF page source backed by lopdf.
pub struct LopdfSource {
    doc: Document,
    pages: BTreeMap<u32, ObjectId>,
}

impl LopdfSource {
    /// Parse PDF bytes. Fails when the bytes are not a readable PDF.
    pub fn from_bytes(source_name: &str, bytes: &[u8]) -> Result<Self, DocumentLoadError> {
        let doc = Document::load_mem(bytes).map_err(|e| DocumentLoadError::Open {
            source_name: source_name.to_string(),
            reason: e.to_string(),
        })?;
        let pages = doc.get_pages();
        tracing::debug!("opened {} ({} pages)", source_name, pages.len());

        Ok(Self { doc, pages })
    }
}

impl PageSource for LopdfSource {
    fn page_count(&self) -> u32 {
        self.pages.len() as u32
    }

    fn extract_page(&self, page_number: u32) -> Result<RawPage, PageExtractionError> {
        if !self.pages.contains_key(&page_number) {
            return Err(PageExtractionError::new(page_number, "page not present"));
        }

        let text = self
            .doc
            .extract_text(&[page_number])
            .map_err(|e| PageExtractionError::new(page_number, e.to_string()))?;

        let (prose, tables) = detect_tables(&text);
        Ok(RawPage {
            text: prose,
            tables,
        })
    }
}

/// Split raw page text into prose and tables.
///
/// Two or more consecutive lines that split into the same number (at least two)
/// of cells form a table. Those lines are removed from the returned prose.
pub fn detect_tables(raw: &str) -> (String, Vec<Table>) {
    let lines: Vec<&str> = raw.lines().collect();
    let cells: Vec<Option<Vec<String>>> = lines.iter().map(|line| split_cells(line)).collect();

    let mut prose = Vec::new();
    let mut tables = Vec::new();
    let mut i = 0;

    while i < lines.len() {
        let Some(width) = cells[i].as_ref().map(Vec::len) else {
            prose.push(lines[i]);
            i += 1;
            continue;
        };

        let mut end = i + 1;
        while end < lines.len() && cells[end].as_ref().map(Vec::len) == Some(width) {
            end += 1;
        }

        if end - i >= 2 {
            let rows = cells[i..end].iter().flatten().cloned().collect();
            tables.push(Table { rows });
        } else {
            prose.push(lines[i]);
        }
        i = end;
    }

    (prose.join("\n"), tables)
}

fn split_cells(line: &str) -> Option<Vec<String>> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return None;
    }
    let cells: Vec<String> = CELL_SEPARATOR
        .split(trimmed)
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(str::to_string)
        .collect();
    (cells.len() >= 2).then_some(cells)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_prose_has_no_tables() {
        let (prose, tables) = detect_tables("Introduction\nThis report covers 2023.");
        assert_eq!(prose, "Introduction\nThis report covers 2023.");
        assert!(tables.is_empty());
    }

    #[test]
    fn aligned_rows_become_a_table() {
        let raw = "Emissions summary\nScope    2022    2023\nScope 1    10    8\nScope 2\t20\t15\nEnd of page";
        let (prose, tables) = detect_tables(raw);
        assert_eq!(prose, "Emissions summary\nEnd of page");
        assert_eq!(tables.len(), 1);
        assert_eq!(
            tables[0].rows,
            vec![
                vec!["Scope", "2022", "2023"],
                vec!["Scope 1", "10", "8"],
                vec!["Scope 2", "20", "15"],
            ]
        );
    }

    #[test]
    fn single_spaced_line_stays_prose() {
        let (prose, tables) = detect_tables("Name   Value\nnext line");
        assert_eq!(prose, "Name   Value\nnext line");
        assert!(tables.is_empty());
    }

    #[test]
    fn width_change_splits_tables() {
        let raw = "a  b\nc  d\nx  y  z\nu  v  w";
        let (prose, tables) = detect_tables(raw);
        assert!(prose.is_empty());
        assert_eq!(tables.len(), 2);
        assert_eq!(tables[1].rows[0], vec!["x", "y", "z"]);
    }

    #[test]
    fn garbage_bytes_fail_to_open() {
        let err = LopdfSource::from_bytes("junk.pdf", b"definitely not a pdf").err();
        assert!(matches!(err, Some(DocumentLoadError::Open { .. })));
    }
}
