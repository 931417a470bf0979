// SPDX-License-Identifier: MIT OR Apache-2.0

//! PDF ingestion: select pages, extract, clean, and build a [`DocumentContext`].

use std::collections::BTreeSet;
use std::path::Path;

use super::cleaner::compose_page;
use super::context::{DocumentContext, PageRecord};
use super::source::{LopdfSource, PageSource};
use crate::config::DEFAULT_MAX_PAGES;
use crate::errors::DocumentLoadError;

/// Page selection for ingestion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestOptions {
    /// Highest 1-based page number to read
    pub max_pages: u32,
    /// 1-based page numbers to leave out
    pub skip_pages: BTreeSet<u32>,
}

impl Default for IngestOptions {
    fn default() -> Self {
        Self {
            max_pages: DEFAULT_MAX_PAGES,
            skip_pages: BTreeSet::new(),
        }
    }
}

impl IngestOptions {
    pub fn new(max_pages: u32, skip_pages: BTreeSet<u32>) -> Self {
        Self {
            max_pages,
            skip_pages,
        }
    }

    /// Page numbers that will be read from a document with `page_count` pages.
    pub fn selected_pages(&self, page_count: u32) -> impl Iterator<Item = u32> + '_ {
        (1..=page_count.min(self.max_pages)).filter(|n| !self.skip_pages.contains(n))
    }
}

/// Build a document context from any page source.
///
/// Pages that fail to extract are logged and dropped; the rest keep their
/// original page numbers.
pub fn ingest<S: PageSource + ?Sized>(
    source: &S,
    source_name: &str,
    digest: &str,
    options: &IngestOptions,
) -> Result<DocumentContext, DocumentLoadError> {
    let page_count = source.page_count();
    let mut records = Vec::new();
    let mut failed = 0usize;

    for page_number in options.selected_pages(page_count) {
        match source.extract_page(page_number) {
            Ok(raw) => {
                let content = compose_page(&raw.text, &raw.tables);
                records.push(PageRecord::new(page_number, content));
            }
            Err(e) => {
                failed += 1;
                tracing::warn!("skipping page {} of {}: {}", page_number, source_name, e);
            }
        }
    }

    tracing::info!(
        "ingested {}: {} of {} pages kept ({} failed, {} skipped)",
        source_name,
        records.len(),
        page_count,
        failed,
        options.skip_pages.len()
    );

    DocumentContext::new(source_name, digest, records).ok_or_else(|| {
        DocumentLoadError::NoPages {
            source_name: source_name.to_string(),
        }
    })
}

/// Ingest PDF bytes with the lopdf-backed source.
pub fn ingest_bytes(
    source_name: &str,
    bytes: &[u8],
    options: &IngestOptions,
) -> Result<DocumentContext, DocumentLoadError> {
    let digest = blake3::hash(bytes).to_hex().to_string();
    let source = LopdfSource::from_bytes(source_name, bytes)?;
    ingest(&source, source_name, &digest, options)
}

/// Read a PDF from disk and ingest it.
pub fn ingest_file(path: &Path, options: &IngestOptions) -> Result<DocumentContext, DocumentLoadError> {
    let bytes = std::fs::read(path).map_err(|e| DocumentLoadError::Read {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;
    let source_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    ingest_bytes(&source_name, &bytes, options)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::document::source::{RawPage, Table};
    use crate::errors::PageExtractionError;

    /// In-memory page source; pages listed in `broken` fail to extract.
    pub(crate) struct FakeSource {
        pub pages: Vec<RawPage>,
        pub broken: Vec<u32>,
    }

    impl FakeSource {
        pub fn with_texts(texts: &[&str]) -> Self {
            Self {
                pages: texts.iter().map(|t| RawPage::text(*t)).collect(),
                broken: Vec::new(),
            }
        }
    }

    impl PageSource for FakeSource {
        fn page_count(&self) -> u32 {
            self.pages.len() as u32
        }

        fn extract_page(&self, page_number: u32) -> Result<RawPage, PageExtractionError> {
            if self.broken.contains(&page_number) {
                return Err(PageExtractionError::new(page_number, "corrupt stream"));
            }
            self.pages
                .get(page_number as usize - 1)
                .cloned()
                .ok_or_else(|| PageExtractionError::new(page_number, "out of range"))
        }
    }

    #[test]
    fn skipped_pages_keep_their_numbers() {
        let source = FakeSource::with_texts(&["one", "two", "three"]);
        let options = IngestOptions::new(40, BTreeSet::from([2]));
        let ctx = ingest(&source, "doc.pdf", "d", &options).unwrap();
        assert_eq!(ctx.page_numbers(), vec![1, 3]);
        assert_eq!(ctx.page(3).unwrap().content, "three");
    }

    #[test]
    fn page_cap_limits_reading() {
        let source = FakeSource::with_texts(&["a", "b", "c", "d"]);
        let options = IngestOptions::new(2, BTreeSet::new());
        let ctx = ingest(&source, "doc.pdf", "d", &options).unwrap();
        assert_eq!(ctx.page_numbers(), vec![1, 2]);
    }

    #[test]
    fn broken_page_is_dropped_not_fatal() {
        let mut source = FakeSource::with_texts(&["a", "b", "c"]);
        source.broken = vec![2];
        let ctx = ingest(&source, "doc.pdf", "d", &IngestOptions::default()).unwrap();
        assert_eq!(ctx.page_numbers(), vec![1, 3]);
    }

    #[test]
    fn all_pages_failing_is_a_load_error() {
        let mut source = FakeSource::with_texts(&["a"]);
        source.broken = vec![1];
        let err = ingest(&source, "doc.pdf", "d", &IngestOptions::default()).unwrap_err();
        assert!(matches!(err, DocumentLoadError::NoPages { .. }));

        let all_skipped = IngestOptions::new(40, BTreeSet::from([1]));
        let source = FakeSource::with_texts(&["a"]);
        assert!(ingest(&source, "doc.pdf", "d", &all_skipped).is_err());
    }

    #[test]
    fn content_is_cleaned_and_tables_appended() {
        let source = FakeSource {
            pages: vec![RawPage {
                text: "  Key <i>figures</i>\n for re-\nporting ".to_string(),
                tables: vec![Table {
                    rows: vec![vec!["k".to_string(), "v".to_string()]],
                }],
            }],
            broken: Vec::new(),
        };
        let ctx = ingest(&source, "doc.pdf", "d", &IngestOptions::default()).unwrap();
        assert_eq!(
            ctx.page(1).unwrap().content,
            "Key figures for reporting\n\nTable:\nk | v"
        );
    }

    #[test]
    fn selected_pages_respects_cap_and_skips() {
        let options = IngestOptions::new(5, BTreeSet::from([1, 4, 9]));
        let pages: Vec<u32> = options.selected_pages(10).collect();
        assert_eq!(pages, vec![2, 3, 5]);
        assert_eq!(options.selected_pages(3).collect::<Vec<_>>(), vec![2, 3]);
    }

    #[test]
    fn non_pdf_bytes_report_open_error() {
        let err = ingest_bytes("notes.txt", b"hello", &IngestOptions::default()).unwrap_err();
        assert!(matches!(err, DocumentLoadError::Open { .. }));
    }
}
