// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain error types shared across the library.
//!
//! Command routing never fails: every outcome there is a user-facing string.
//! The errors below cover ingestion and the embedding pipelines, where the
//! caller decides how to surface the failure.

use thiserror::Error;

/// A PDF could not be turned into a document context.
///
/// The previous document (if any) is always left in place when this is returned.
#[derive(Debug, Error)]
pub enum DocumentLoadError {
    #[error("failed to open '{source_name}' as a PDF: {reason}")]
    Open { source_name: String, reason: String },

    #[error("no readable pages found in '{source_name}'")]
    NoPages { source_name: String },

    #[error("failed to read '{path}': {reason}")]
    Read { path: String, reason: String },
}

/// A single page failed to extract. Ingestion drops the page and continues.
#[derive(Debug, Error)]
#[error("page {page}: {reason}")]
pub struct PageExtractionError {
    pub page: u32,
    pub reason: String,
}

impl PageExtractionError {
    pub fn new(page: u32, reason: impl Into<String>) -> Self {
        Self {
            page,
            reason: reason.into(),
        }
    }
}

/// Embedding demo pipeline failures.
#[derive(Debug, Error, PartialEq)]
pub enum EmbeddingError {
    #[error("no valid tokens found; please input meaningful sentences")]
    NoTokens,

    #[error("not enough data to project: {words} words x {dims} dimensions (need at least 3 x 3)")]
    NotEnoughData { words: usize, dims: usize },

    #[error("cannot project to {requested} dimensions from {available}")]
    InvalidDimensions { requested: usize, available: usize },

    #[error("'{0}' not in vocabulary")]
    UnknownWord(String),

    #[error("invalid training parameters: {0}")]
    InvalidParams(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_offending_input() {
        let err = DocumentLoadError::Open {
            source_name: "report.pdf".to_string(),
            reason: "bad header".to_string(),
        };
        assert!(err.to_string().contains("report.pdf"));
        assert!(err.to_string().contains("bad header"));

        let err = EmbeddingError::UnknownWord("zebra".to_string());
        assert_eq!(err.to_string(), "'zebra' not in vocabulary");

        let err = PageExtractionError::new(7, "missing content stream");
        assert_eq!(err.to_string(), "page 7: missing content stream");
    }
}
