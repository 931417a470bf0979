// SPDX-License-Identifier: MIT OR Apache-2.0

//! Word2Vec demo pipelines over sentences from a file or stdin

use anyhow::{Context, Result};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::io::Read;
use std::path::Path;
use std::time::Duration;

use crate::cli::OutputFormat;
use kassist::config::Config;
use kassist::embedding::{
    DemoReport, DemoRequest, EmbeddingDemo, PcaProjector, PipelineKind, Tokenizer, Word2VecTrainer,
};
use kassist::output::{colorize_dim, colorize_highlight, print_json, use_colors};

/// Run the embed command
pub fn run(
    mode: PipelineKind,
    file: Option<&Path>,
    query: Option<String>,
    compare: Option<String>,
    out: Option<&Path>,
    config: &Config,
    format: OutputFormat,
    compact: bool,
) -> Result<()> {
    let input = match file {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read sentences: {}", path.display()))?,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read sentences from stdin")?;
            buf
        }
    };
    let sentences = split_sentences(&input);

    let params = config.word2vec.params_for(mode);
    let trainer = Word2VecTrainer;
    let projector = PcaProjector;
    let demo = EmbeddingDemo::new(&trainer, &projector)
        .with_tokenizer(Tokenizer::new(config.word2vec.remove_stopwords()))
        .with_top_n(config.word2vec.top_n());
    let request = DemoRequest::new(sentences)
        .with_query(query)
        .with_compare(compare);

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .expect("valid spinner template"),
    );
    pb.set_message(format!("Training {} model...", mode));
    pb.enable_steady_tick(Duration::from_millis(100));
    let result = demo.run(mode, &params, &request);
    pb.finish_and_clear();
    let report = result?;

    if let Some(path) = out {
        let json = serde_json::to_string_pretty(&report)?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write report: {}", path.display()))?;
        tracing::info!("wrote {} report to {}", mode, path.display());
    }

    match format {
        OutputFormat::Json => print_json(&report, compact)?,
        OutputFormat::Text => print_text(&report, out),
    }

    Ok(())
}

/// One sentence per non-blank line.
fn split_sentences(input: &str) -> Vec<String> {
    input
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

fn print_text(report: &DemoReport, out: Option<&Path>) {
    let use_color = use_colors();

    println!("\n{} {}\n", "🧠".cyan(), report.title.bold());
    for model in &report.models {
        println!(
            "  {} vocabulary {} words, {} dimensions",
            format!("[{}]", model.architecture).blue(),
            model.vocabulary,
            model.vector_size
        );
    }

    for query in &report.queries {
        println!();
        if !query.in_vocabulary {
            println!(
                "{} '{}' not in vocabulary ({})",
                "⚠️".yellow(),
                query.word,
                query.model
            );
            continue;
        }
        println!(
            "Top {} similar words to {} ({}):",
            query.neighbors.len(),
            colorize_highlight(&query.word, use_color),
            query.model
        );
        for neighbor in &query.neighbors {
            println!("  {:<16} {:.4}", neighbor.word, neighbor.score);
        }
    }

    if !report.similarities.is_empty() {
        println!();
    }
    for pair in &report.similarities {
        match pair.score {
            Some(score) => println!(
                "{} similarity '{}' ~ '{}': {}",
                pair.model,
                pair.first,
                pair.second,
                colorize_highlight(&format!("{:.4}", score), use_color)
            ),
            None => println!(
                "{} '{}' or '{}' not in vocabulary ({})",
                "⚠️".yellow(),
                pair.first,
                pair.second,
                pair.model
            ),
        }
    }

    if !report.comparison.is_empty() {
        println!("\nRaw components (x, y):");
        for point in &report.comparison {
            println!(
                "  {:<10} {:<16} ({:.4}, {:.4})",
                point.model.to_string(),
                point.word,
                point.x,
                point.y
            );
        }
    }

    if let Some(figure) = &report.figure {
        println!("\n{} ({}D, {} words)", figure.title, figure.dims, figure.points.len());
        for point in &figure.points {
            let coords: Vec<String> = point.coords.iter().map(|c| format!("{:8.4}", c)).collect();
            println!(
                "  {:<16} {} {}",
                point.word,
                coords.join(" "),
                colorize_dim(&point.color, use_color)
            );
        }
        if out.is_none() {
            println!(
                "\n{}",
                colorize_dim("Use --out <file> to save the figure with sentence traces as JSON.", use_color)
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_lines_do_not_become_sentences() {
        let sentences = split_sentences("  green energy \n\n\t\ncarbon policy\n");
        assert_eq!(sentences, vec!["green energy", "carbon policy"]);
    }
}
