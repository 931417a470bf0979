// SPDX-License-Identifier: MIT OR Apache-2.0

//! kassist - PDF chat assistant and word embedding playground
//!
//! Chat with an uploaded PDF through a handful of canned commands, and
//! train small Word2Vec models on your own sentences.

mod cli;
mod commands;

use anyhow::Result;
use clap::{CommandFactory, Parser};
use clap_complete::generate;
use cli::{Cli, Commands};
use kassist::config::Config;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    // Initialize tracing with KASSIST_LOG env var (e.g., KASSIST_LOG=debug kassist ask "show content")
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("KASSIST_LOG").unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = Config::load();
    let format = commands::resolve_format(cli.format, &config);
    let compact = cli.compact;

    match cli.command {
        Commands::Chat { pdf, ingest } => {
            commands::chat::run(pdf.as_deref(), &ingest, &config)?;
        }
        Commands::Ask { prompt, pdf, ingest } => {
            commands::ask::run(&prompt, pdf.as_deref(), &ingest, &config, format, compact)?;
        }
        Commands::Pages { pdf, ingest } => {
            commands::pages::run(&pdf, &ingest, &config, format, compact)?;
        }
        Commands::Embed {
            mode,
            file,
            query,
            compare,
            out,
        } => {
            commands::embed::run(
                mode,
                file.as_deref(),
                query,
                compare,
                out.as_deref(),
                &config,
                format,
                compact,
            )?;
        }
        Commands::Profile { action } => {
            commands::profile::run(&action, &config, format, compact)?;
        }
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            generate(shell, &mut cmd, "kassist", &mut std::io::stdout());
        }
    }

    Ok(())
}
