// SPDX-License-Identifier: MIT OR Apache-2.0

//! Prompt parsing into a tagged command.

use once_cell::sync::Lazy;
use regex::Regex;

static SHOW_PAGE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"show pdf page\s+(\d+)").expect("valid page regex"));

const SHOW_PAGE_PREFIX: &str = "show pdf page";
const SECTION_PREFIXES: [&str; 2] = ["goto section", "navigate to"];

/// Why a recognized command could not be carried out as typed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MalformedCommand {
    /// `show pdf page` without a usable page number
    PageNumber,
    /// `goto section` / `navigate to` without a keyword
    EmptyKeyword,
}

/// A parsed user request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    ShowContent,
    ShowPage(u32),
    GotoSection(String),
    ClusteringAnalysis,
    EsgAnalysis,
    Malformed(MalformedCommand),
    Unknown,
}

impl Command {
    /// Parse a raw prompt. Matching is done on the trimmed, lower-cased prompt
    /// with internal whitespace runs collapsed.
    pub fn parse(prompt: &str) -> Self {
        let normalized = normalize(prompt);
        let prompt = normalized.as_str();

        match prompt {
            "show content" => return Command::ShowContent,
            "clustering analysis" => return Command::ClusteringAnalysis,
            "esg analysis" => return Command::EsgAnalysis,
            _ => {}
        }

        // the phrase may sit anywhere in the prompt; the first number after it wins
        if prompt.contains(SHOW_PAGE_PREFIX) {
            return SHOW_PAGE
                .captures(prompt)
                .and_then(|caps| caps[1].parse::<u32>().ok())
                .map(Command::ShowPage)
                .unwrap_or_else(|| {
                    tracing::debug!("malformed page request: {:?}", prompt);
                    Command::Malformed(MalformedCommand::PageNumber)
                });
        }

        for prefix in SECTION_PREFIXES {
            if let Some(rest) = strip_command(prompt, prefix) {
                let keyword = rest.trim();
                if keyword.is_empty() {
                    return Command::Malformed(MalformedCommand::EmptyKeyword);
                }
                return Command::GotoSection(keyword.to_string());
            }
        }

        Command::Unknown
    }

    /// Whether the command reads the uploaded document.
    pub fn needs_document(&self) -> bool {
        matches!(
            self,
            Command::ShowContent | Command::ShowPage(_) | Command::GotoSection(_)
        )
    }
}

/// Trim, lower-case and collapse whitespace.
pub fn normalize(prompt: &str) -> String {
    prompt
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// `prefix` followed by end of input or a space; returns the remainder.
fn strip_command<'a>(prompt: &'a str, prefix: &str) -> Option<&'a str> {
    let rest = prompt.strip_prefix(prefix)?;
    if rest.is_empty() || rest.starts_with(' ') {
        Some(rest)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_commands_ignore_case_and_padding() {
        assert_eq!(Command::parse("  Show Content "), Command::ShowContent);
        assert_eq!(Command::parse("CLUSTERING ANALYSIS"), Command::ClusteringAnalysis);
        assert_eq!(Command::parse("esg   analysis"), Command::EsgAnalysis);
    }

    #[test]
    fn show_page_parses_number() {
        assert_eq!(Command::parse("Show PDF page 2"), Command::ShowPage(2));
        assert_eq!(Command::parse("show pdf page 99"), Command::ShowPage(99));
    }

    #[test]
    fn show_page_tolerates_surrounding_words() {
        assert_eq!(Command::parse("show pdf page 2."), Command::ShowPage(2));
        assert_eq!(Command::parse("show pdf page 2 please"), Command::ShowPage(2));
        assert_eq!(Command::parse("please show pdf page 2"), Command::ShowPage(2));
        assert_eq!(Command::parse("Can you show PDF page 2?"), Command::ShowPage(2));
    }

    #[test]
    fn show_page_without_number_is_malformed() {
        let malformed = Command::Malformed(MalformedCommand::PageNumber);
        assert_eq!(Command::parse("show pdf page"), malformed);
        assert_eq!(Command::parse("show pdf page two"), malformed);
        assert_eq!(Command::parse("show pdf page -1"), malformed);
        assert_eq!(Command::parse("show pdf page 99999999999"), malformed);
        assert_eq!(Command::parse("could you show pdf page?"), malformed);
        assert_eq!(Command::parse("show pdf pages 2"), malformed);
    }

    #[test]
    fn section_commands_capture_keyword() {
        assert_eq!(
            Command::parse("goto section Risk Factors"),
            Command::GotoSection("risk factors".to_string())
        );
        assert_eq!(
            Command::parse("Navigate to   governance"),
            Command::GotoSection("governance".to_string())
        );
        assert_eq!(
            Command::parse("goto section   "),
            Command::Malformed(MalformedCommand::EmptyKeyword)
        );
    }

    #[test]
    fn everything_else_is_unknown() {
        assert_eq!(Command::parse(""), Command::Unknown);
        assert_eq!(Command::parse("hello there"), Command::Unknown);
        assert_eq!(Command::parse("show contents"), Command::Unknown);
        assert_eq!(Command::parse("navigate tomorrow"), Command::Unknown);
    }

    #[test]
    fn document_dependence() {
        assert!(Command::ShowContent.needs_document());
        assert!(Command::GotoSection("x".into()).needs_document());
        assert!(!Command::EsgAnalysis.needs_document());
        assert!(!Command::Unknown.needs_document());
    }
}
