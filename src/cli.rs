// SPDX-License-Identifier: MIT OR Apache-2.0

//! CLI argument parsing using clap

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

use kassist::embedding::PipelineKind;

/// kassist - PDF chat assistant and word embedding playground
///
/// Upload a PDF and query it with simple chat commands, or train small
/// Word2Vec models on your own sentences.
#[derive(Parser, Debug)]
#[command(name = "kassist")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Output format (text or json)
    #[arg(long, global = true)]
    pub format: Option<OutputFormat>,

    /// Compact JSON output (no pretty formatting)
    #[arg(long, global = true)]
    pub compact: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Output format for results
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Page selection shared by every command that ingests a PDF
#[derive(Args, Debug, Clone, Default)]
pub struct IngestArgs {
    /// Maximum number of pages to read (default from config, else 40)
    #[arg(long)]
    pub max_pages: Option<u32>,

    /// 1-based page numbers to leave out (repeatable)
    #[arg(long = "skip", value_name = "PAGE")]
    pub skip: Vec<u32>,
}

#[derive(Subcommand, Debug)]
pub enum ProfileCommands {
    /// Show the stored profile (or the defaults)
    Show {
        /// Check that the avatar URL serves an image
        #[arg(long)]
        check_avatar: bool,
    },

    /// Update the stored profile
    Set {
        /// Display name
        #[arg(long)]
        name: Option<String>,

        /// Avatar image URL
        #[arg(long)]
        avatar: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Interactive chat session
    #[command(alias = "c")]
    Chat {
        /// PDF to load before the first prompt
        #[arg(long)]
        pdf: Option<PathBuf>,

        #[command(flatten)]
        ingest: IngestArgs,
    },

    /// Answer a single prompt and exit
    #[command(alias = "a")]
    Ask {
        /// Prompt text (e.g. "show pdf page 2"); flags may come before or after it
        #[arg(required = true)]
        prompt: Vec<String>,

        /// PDF to answer against
        #[arg(long)]
        pdf: Option<PathBuf>,

        #[command(flatten)]
        ingest: IngestArgs,
    },

    /// Extract and print the cleaned pages of a PDF
    Pages {
        /// PDF file
        pdf: PathBuf,

        #[command(flatten)]
        ingest: IngestArgs,
    },

    /// Train a Word2Vec demo model on sentences (one per line)
    #[command(alias = "e")]
    Embed {
        /// Pipeline: skip-gram, cbow, compare, view2d or view3d
        mode: PipelineKind,

        /// Read sentences from a file instead of stdin
        #[arg(short, long)]
        file: Option<PathBuf>,

        /// Word to find nearest neighbors for
        #[arg(short, long)]
        query: Option<String>,

        /// Second word for pairwise similarity
        #[arg(long)]
        compare: Option<String>,

        /// Write the full report (including figure data) as JSON to this path
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Show or edit the user profile
    Profile {
        #[command(subcommand)]
        action: ProfileCommands,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn ask_collects_prompt_words_and_skips() {
        let cli = Cli::parse_from([
            "kassist", "ask", "--pdf", "a.pdf", "--skip", "2", "--skip", "4", "show", "pdf", "page", "3",
        ]);
        match cli.command {
            Commands::Ask { prompt, pdf, ingest } => {
                assert_eq!(prompt.join(" "), "show pdf page 3");
                assert_eq!(pdf, Some(PathBuf::from("a.pdf")));
                assert_eq!(ingest.skip, vec![2, 4]);
                assert_eq!(ingest.max_pages, None);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn ask_accepts_flags_after_the_prompt() {
        let cli = Cli::parse_from([
            "kassist", "ask", "show", "pdf", "page", "2", "--pdf", "report.pdf", "--max-pages", "5",
        ]);
        match cli.command {
            Commands::Ask { prompt, pdf, ingest } => {
                assert_eq!(prompt.join(" "), "show pdf page 2");
                assert_eq!(pdf, Some(PathBuf::from("report.pdf")));
                assert_eq!(ingest.max_pages, Some(5));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn embed_parses_pipeline_kind() {
        let cli = Cli::parse_from(["kassist", "--format", "json", "embed", "view2d", "-q", "energy"]);
        assert_eq!(cli.format, Some(OutputFormat::Json));
        match cli.command {
            Commands::Embed { mode, query, .. } => {
                assert_eq!(mode, PipelineKind::View2d);
                assert_eq!(query.as_deref(), Some("energy"));
            }
            other => panic!("unexpected command: {:?}", other),
        }
        assert!(Cli::try_parse_from(["kassist", "embed", "glove"]).is_err());
    }
}
