// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory page records for the active session.

use serde::Serialize;

/// One retained page: its 1-based number in the source PDF and cleaned text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageRecord {
    pub page_number: u32,
    pub content: String,
}

impl PageRecord {
    pub fn new(page_number: u32, content: impl Into<String>) -> Self {
        Self {
            page_number,
            content: content.into(),
        }
    }
}

/// Ordered pages of one uploaded PDF.
///
/// Pages are kept in ascending page order with unique page numbers. Skipped
/// or unreadable pages leave gaps; nothing is renumbered.
#[derive(Debug, Clone, Serialize)]
pub struct DocumentContext {
    source_name: String,
    digest: String,
    pages: Vec<PageRecord>,
}

impl DocumentContext {
    /// Build a context from extracted pages. Returns `None` when `pages` is
    /// empty, since an empty document is represented by having no context.
    pub fn new(
        source_name: impl Into<String>,
        digest: impl Into<String>,
        mut pages: Vec<PageRecord>,
    ) -> Option<Self> {
        if pages.is_empty() {
            return None;
        }
        pages.sort_by_key(|p| p.page_number);
        pages.dedup_by_key(|p| p.page_number);

        Some(Self {
            source_name: source_name.into(),
            digest: digest.into(),
            pages,
        })
    }

    /// Convenience constructor for callers that already hold plain page text.
    pub fn from_pages<I, S>(source_name: &str, pages: I) -> Option<Self>
    where
        I: IntoIterator<Item = (u32, S)>,
        S: Into<String>,
    {
        let records: Vec<PageRecord> = pages
            .into_iter()
            .map(|(n, content)| PageRecord::new(n, content))
            .collect();
        let digest = {
            let mut hasher = blake3::Hasher::new();
            for record in &records {
                hasher.update(&record.page_number.to_le_bytes());
                hasher.update(record.content.as_bytes());
            }
            hasher.finalize().to_hex().to_string()
        };
        Self::new(source_name, digest, records)
    }

    pub fn source_name(&self) -> &str {
        &self.source_name
    }

    /// blake3 hex digest of the uploaded bytes
    pub fn digest(&self) -> &str {
        &self.digest
    }

    pub fn pages(&self) -> &[PageRecord] {
        &self.pages
    }

    pub fn page(&self, page_number: u32) -> Option<&PageRecord> {
        self.pages
            .binary_search_by_key(&page_number, |p| p.page_number)
            .ok()
            .map(|idx| &self.pages[idx])
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    pub fn page_numbers(&self) -> Vec<u32> {
        self.pages.iter().map(|p| p.page_number).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_pages_means_no_context() {
        assert!(DocumentContext::new("a.pdf", "d", Vec::new()).is_none());
    }

    #[test]
    fn pages_are_ordered_and_unique() {
        let ctx = DocumentContext::new(
            "a.pdf",
            "d",
            vec![
                PageRecord::new(3, "C"),
                PageRecord::new(1, "A"),
                PageRecord::new(3, "C again"),
            ],
        )
        .unwrap();
        assert_eq!(ctx.page_numbers(), vec![1, 3]);
        assert_eq!(ctx.page(3).unwrap().content, "C");
        assert!(ctx.page(2).is_none());
    }

    #[test]
    fn from_pages_digest_tracks_content() {
        let a = DocumentContext::from_pages("a.pdf", [(1, "A"), (2, "B")]).unwrap();
        let b = DocumentContext::from_pages("a.pdf", [(1, "A"), (2, "B")]).unwrap();
        let c = DocumentContext::from_pages("a.pdf", [(1, "A"), (2, "X")]).unwrap();
        assert_eq!(a.digest(), b.digest());
        assert_ne!(a.digest(), c.digest());
        assert_eq!(a.len(), 2);
    }
}
