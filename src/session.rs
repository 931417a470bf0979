// SPDX-License-Identifier: MIT OR Apache-2.0

//! Chat session state: the uploaded document and the transcript.
//!
//! A [`Session`] is owned by whoever drives the conversation (the interactive
//! loop, a one-shot command, a test) and is passed explicitly to ingestion and
//! routing.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::document::{ingest, ingest_bytes, DocumentContext, IngestOptions, PageSource};
use crate::errors::DocumentLoadError;
use crate::router::Router;

/// Speaker of a transcript entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::User => write!(f, "user"),
            Role::Assistant => write!(f, "assistant"),
        }
    }
}

/// One transcript entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// State of a single interactive session.
#[derive(Debug, Default)]
pub struct Session {
    router: Router,
    document: Option<DocumentContext>,
    transcript: Vec<ChatMessage>,
}

impl Session {
    pub fn new(router: Router) -> Self {
        Self {
            router,
            document: None,
            transcript: Vec::new(),
        }
    }

    pub fn document(&self) -> Option<&DocumentContext> {
        self.document.as_ref()
    }

    pub fn transcript(&self) -> &[ChatMessage] {
        &self.transcript
    }

    pub fn router(&self) -> &Router {
        &self.router
    }

    /// Replace the current document with one ingested from PDF bytes.
    ///
    /// On failure the previous document is kept.
    pub fn upload(
        &mut self,
        source_name: &str,
        bytes: &[u8],
        options: &IngestOptions,
    ) -> Result<&DocumentContext, DocumentLoadError> {
        let doc = ingest_bytes(source_name, bytes, options).map_err(|e| {
            tracing::warn!("upload of {} failed, keeping previous document: {}", source_name, e);
            e
        })?;
        Ok(self.replace_document(doc))
    }

    /// Same as [`Session::upload`] for an arbitrary page source.
    pub fn upload_from<S: PageSource + ?Sized>(
        &mut self,
        source: &S,
        source_name: &str,
        digest: &str,
        options: &IngestOptions,
    ) -> Result<&DocumentContext, DocumentLoadError> {
        let doc = ingest(source, source_name, digest, options)?;
        Ok(self.replace_document(doc))
    }

    /// Install a document, dropping any previous one wholesale.
    pub fn replace_document(&mut self, doc: DocumentContext) -> &DocumentContext {
        tracing::info!(
            "document set to {} ({} pages, blake3 {})",
            doc.source_name(),
            doc.len(),
            &doc.digest()[..doc.digest().len().min(12)]
        );
        self.document.insert(doc)
    }

    pub fn clear_document(&mut self) {
        self.document = None;
    }

    /// Drop document and transcript.
    pub fn clear(&mut self) {
        self.document = None;
        self.transcript.clear();
    }

    /// Record a user prompt, answer it, and record the answer.
    pub fn chat(&mut self, prompt: &str) -> String {
        self.transcript.push(ChatMessage::user(prompt));
        let response = self.router.route(prompt, self.document.as_ref());
        self.transcript.push(ChatMessage::assistant(response.clone()));
        response
    }

    /// Write the transcript as pretty JSON.
    pub fn save_transcript(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }
        let json = serde_json::to_string_pretty(&self.transcript)?;
        fs::write(path, json)
            .with_context(|| format!("Failed to write transcript: {}", path.display()))?;
        Ok(())
    }
}
