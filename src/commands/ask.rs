// SPDX-License-Identifier: MIT OR Apache-2.0

//! Answer one prompt, optionally against a PDF

use anyhow::Result;
use serde::Serialize;
use std::path::Path;
use std::time::Duration;

use super::{ingest_options, new_session, upload_file, DocumentSummary};
use crate::cli::{IngestArgs, OutputFormat};
use kassist::config::Config;
use kassist::output::{print_json, print_response};

#[derive(Debug, Serialize)]
struct AskResult {
    prompt: String,
    response: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    document: Option<DocumentSummary>,
}

/// Run the ask command
pub fn run(
    prompt: &[String],
    pdf: Option<&Path>,
    ingest: &IngestArgs,
    config: &Config,
    format: OutputFormat,
    compact: bool,
) -> Result<()> {
    let mut session = new_session(config);
    if let Some(path) = pdf {
        upload_file(&mut session, path, &ingest_options(config, ingest))?;
    }

    let prompt = prompt.join(" ");
    let response = session.chat(&prompt);

    match format {
        OutputFormat::Json => {
            let result = AskResult {
                prompt,
                response,
                document: session.document().map(DocumentSummary::from),
            };
            print_json(&result, compact)?;
        }
        OutputFormat::Text => {
            print_response(&response, Duration::from_millis(config.chat.stream_delay_ms()))?;
        }
    }

    Ok(())
}
