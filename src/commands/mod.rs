// SPDX-License-Identifier: MIT OR Apache-2.0

//! Commands module - one `run` entry point per subcommand

pub mod ask;
pub mod chat;
pub mod embed;
pub mod pages;
pub mod profile;

use anyhow::{Context, Result};
use serde::Serialize;
use std::path::Path;

use crate::cli::{IngestArgs, OutputFormat};
use kassist::config::Config;
use kassist::document::{DocumentContext, IngestOptions};
use kassist::router::{Router, RouterOptions};
use kassist::session::Session;

/// CLI format wins, then `default_format` from config, then text.
pub fn resolve_format(cli: Option<OutputFormat>, config: &Config) -> OutputFormat {
    cli.unwrap_or(if config.prefers_json() {
        OutputFormat::Json
    } else {
        OutputFormat::Text
    })
}

pub fn ingest_options(config: &Config, args: &IngestArgs) -> IngestOptions {
    IngestOptions::new(
        config.merge_max_pages(args.max_pages),
        config.merge_skip_pages(&args.skip),
    )
}

pub fn new_session(config: &Config) -> Session {
    Session::new(Router::new(RouterOptions::from(&config.router)))
}

/// Read a PDF from disk into the session, replacing any loaded document.
pub fn upload_file<'a>(
    session: &'a mut Session,
    path: &Path,
    options: &IngestOptions,
) -> Result<&'a DocumentContext> {
    let bytes = std::fs::read(path)
        .with_context(|| format!("Failed to read PDF: {}", path.display()))?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    Ok(session.upload(&name, &bytes, options)?)
}

/// Short description of the loaded document for JSON output
#[derive(Debug, Serialize)]
pub struct DocumentSummary {
    pub source_name: String,
    pub digest: String,
    pub pages: Vec<u32>,
}

impl From<&DocumentContext> for DocumentSummary {
    fn from(doc: &DocumentContext) -> Self {
        Self {
            source_name: doc.source_name().to_string(),
            digest: doc.digest().to_string(),
            pages: doc.page_numbers(),
        }
    }
}
