// SPDX-License-Identifier: MIT OR Apache-2.0

//! Turning commands into chat responses.

use std::borrow::Cow;

use super::command::{Command, MalformedCommand};
use crate::config::RouterConfig;
use crate::document::{DocumentContext, PageRecord};

pub const HELP_TEXT: &str = "📝 It looks like your prompt might not match the expected operations.\n\n\
💡 Try entering prompts like:\n\
- Show content\n\
- Show pdf page <num>\n\
- Goto section <keyword> (or Navigate to <keyword>)\n\
- Clustering analysis\n\
- ESG analysis\n\n\
📄 Also, make sure you've uploaded a PDF file first!";

pub const UPLOAD_PROMPT: &str = "📄 Please upload a PDF file to get context.";

pub const CLUSTERING_PLACEHOLDER: &str = "📊 Working on clustering analysis...";

pub const ESG_PLACEHOLDER: &str = "🌱 Working on ESG analysis...";

pub const PAGE_NUMBER_GUIDANCE: &str =
    "⚠️ Please specify the page number, e.g., `Show PDF page 2`.";

pub const KEYWORD_GUIDANCE: &str =
    "⚠️ Please specify a section keyword, e.g., `Goto section introduction`.";

/// Character budgets used when building responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouterOptions {
    pub preview_chars: usize,
    pub section_scan_chars: usize,
    pub snippet_chars: usize,
    pub max_section_results: usize,
}

impl Default for RouterOptions {
    fn default() -> Self {
        Self::from(&RouterConfig::default())
    }
}

impl From<&RouterConfig> for RouterOptions {
    fn from(config: &RouterConfig) -> Self {
        Self {
            preview_chars: config.preview_chars(),
            section_scan_chars: config.section_scan_chars(),
            snippet_chars: config.snippet_chars(),
            max_section_results: config.max_section_results(),
        }
    }
}

/// Maps prompts to responses. Holds no per-request state.
#[derive(Debug, Clone, Default)]
pub struct Router {
    options: RouterOptions,
}

impl Router {
    pub fn new(options: RouterOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &RouterOptions {
        &self.options
    }

    /// Parse and answer a raw prompt.
    pub fn route(&self, prompt: &str, document: Option<&DocumentContext>) -> String {
        let command = Command::parse(prompt);
        if command.needs_document() && document.is_none() {
            tracing::debug!("{:?} needs a document but none is loaded", command);
        } else {
            tracing::debug!("routing {:?}", command);
        }
        self.respond(&command, document)
    }

    /// Answer an already parsed command.
    pub fn respond(&self, command: &Command, document: Option<&DocumentContext>) -> String {
        match (command, document) {
            (Command::Malformed(MalformedCommand::PageNumber), _) => PAGE_NUMBER_GUIDANCE.to_string(),
            (Command::Malformed(MalformedCommand::EmptyKeyword), _) => KEYWORD_GUIDANCE.to_string(),
            (Command::ClusteringAnalysis, _) => CLUSTERING_PLACEHOLDER.to_string(),
            (Command::EsgAnalysis, _) => ESG_PLACEHOLDER.to_string(),
            (Command::Unknown, _) => HELP_TEXT.to_string(),
            (Command::ShowContent | Command::ShowPage(_) | Command::GotoSection(_), None) => {
                UPLOAD_PROMPT.to_string()
            }
            (Command::ShowContent, Some(doc)) => self.show_content(doc),
            (Command::ShowPage(n), Some(doc)) => self.show_page(doc, *n),
            (Command::GotoSection(keyword), Some(doc)) => self.goto_section(doc, keyword),
        }
    }

    fn show_content(&self, doc: &DocumentContext) -> String {
        let mut out = String::from("🤖 Here's what I found from the uploaded PDF:\n");
        for page in doc.pages() {
            let (preview, _) = take_chars(&page.content, self.options.preview_chars);
            out.push_str(&format!("\n[Page {}] {}\n", page.page_number, preview));
        }
        out.push_str("\n----------------------------------");
        out
    }

    fn show_page(&self, doc: &DocumentContext, page_number: u32) -> String {
        match doc.page(page_number) {
            Some(page) => format!("📄 [Page {}]\n\n{}", page.page_number, page.content),
            None => format!(
                "⚠️ Page {} not found in the uploaded PDF. Available pages: {}.",
                page_number,
                format_page_list(&doc.page_numbers())
            ),
        }
    }

    fn goto_section(&self, doc: &DocumentContext, keyword: &str) -> String {
        let hits = self.find_sections(doc, keyword);
        if hits.is_empty() {
            return format!(
                "🔍 No section matching '{}' found near the top of any page.",
                keyword
            );
        }

        let mut out = format!("🔎 Sections matching '{}':\n", keyword);
        for hit in hits {
            out.push_str(&format!("\n[Page {}] {}\n", hit.page_number, hit.snippet));
        }
        out
    }

    /// Pages whose opening characters mention `keyword`, in page order.
    pub fn find_sections(&self, doc: &DocumentContext, keyword: &str) -> Vec<SectionHit> {
        let needle = keyword.trim().to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }

        doc.pages()
            .iter()
            .filter(|page| {
                let (head, _) = take_chars(&page.content, self.options.section_scan_chars);
                head.to_lowercase().contains(&needle)
            })
            .take(self.options.max_section_results)
            .map(|page| SectionHit::new(page, self.options.snippet_chars))
            .collect()
    }
}

/// One `goto section` match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionHit {
    pub page_number: u32,
    pub snippet: String,
}

impl SectionHit {
    fn new(page: &PageRecord, snippet_chars: usize) -> Self {
        let (head, truncated) = take_chars(&page.content, snippet_chars);
        let snippet = if truncated {
            format!("{}...", head)
        } else {
            head.into_owned()
        };
        Self {
            page_number: page.page_number,
            snippet,
        }
    }
}

/// First `max_chars` characters of `input`, and whether anything was cut.
fn take_chars(input: &str, max_chars: usize) -> (Cow<'_, str>, bool) {
    match input.char_indices().nth(max_chars) {
        Some((idx, _)) => (Cow::Borrowed(&input[..idx]), true),
        None => (Cow::Borrowed(input), false),
    }
}

/// `1, 2, 3, 5` -> `1-3, 5`
fn format_page_list(pages: &[u32]) -> String {
    let mut ranges: Vec<String> = Vec::new();
    let mut iter = pages.iter().copied().peekable();
    while let Some(start) = iter.next() {
        let mut end = start;
        while iter.peek() == Some(&(end + 1)) {
            end += 1;
            iter.next();
        }
        if start == end {
            ranges.push(start.to_string());
        } else {
            ranges.push(format!("{}-{}", start, end));
        }
    }
    ranges.join(", ")
}
