// SPDX-License-Identifier: MIT OR Apache-2.0

//! Dump the pages ingestion keeps from a PDF

use anyhow::Result;
use colored::Colorize;

use super::ingest_options;
use crate::cli::{IngestArgs, OutputFormat};
use kassist::config::Config;
use kassist::document::ingest_file;
use kassist::output::{colorize_dim, colorize_page, print_json, use_colors};
use std::path::Path;

/// Run the pages command
pub fn run(
    pdf: &Path,
    ingest: &IngestArgs,
    config: &Config,
    format: OutputFormat,
    compact: bool,
) -> Result<()> {
    let options = ingest_options(config, ingest);
    let doc = ingest_file(pdf, &options)?;

    match format {
        OutputFormat::Json => {
            print_json(&doc, compact)?;
        }
        OutputFormat::Text => {
            let use_color = use_colors();
            println!(
                "\n{} {} ({} pages kept, max {}, skipped {:?})\n",
                "📄".cyan(),
                doc.source_name().bold(),
                doc.len(),
                options.max_pages,
                options.skip_pages
            );
            for page in doc.pages() {
                println!(
                    "{}",
                    colorize_page(&format!("[Page {}]", page.page_number), use_color)
                );
                if page.content.is_empty() {
                    println!("{}", colorize_dim("(no text)", use_color));
                } else {
                    println!("{}", page.content);
                }
                println!();
            }
        }
    }

    Ok(())
}
