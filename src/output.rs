// SPDX-License-Identifier: MIT OR Apache-2.0

//! Output and color utilities for consistent terminal formatting
//!
//! Provides shared color functions respecting NO_COLOR environment variable.

use anyhow::Result;
use colored::Colorize;
use serde::Serialize;
use std::io::{IsTerminal, Write};
use std::thread;
use std::time::Duration;

/// Check if colors should be used (respects NO_COLOR env var)
pub fn use_colors() -> bool {
    std::env::var("NO_COLOR").is_err()
}

/// Colorize page tags like `[Page 3]` (cyan)
pub fn colorize_page(text: &str, use_color: bool) -> String {
    if use_color {
        text.cyan().to_string()
    } else {
        text.to_string()
    }
}

/// Colorize the speaker of a transcript line (green bold)
pub fn colorize_role(text: &str, use_color: bool) -> String {
    if use_color {
        text.green().bold().to_string()
    } else {
        text.to_string()
    }
}

/// Colorize secondary info (dimmed)
pub fn colorize_dim(text: &str, use_color: bool) -> String {
    if use_color {
        text.dimmed().to_string()
    } else {
        text.to_string()
    }
}

/// Colorize a word or score of interest (yellow)
pub fn colorize_highlight(text: &str, use_color: bool) -> String {
    if use_color {
        text.yellow().to_string()
    } else {
        text.to_string()
    }
}

/// Print a value as JSON on stdout, pretty unless `compact`.
pub fn print_json<T: Serialize + ?Sized>(value: &T, compact: bool) -> Result<()> {
    let json = if compact {
        serde_json::to_string(value)?
    } else {
        serde_json::to_string_pretty(value)?
    };
    println!("{}", json);
    Ok(())
}

/// Write `text` word by word with `delay` between words, keeping line breaks.
pub fn stream_words<W: Write>(out: &mut W, text: &str, delay: Duration) -> std::io::Result<()> {
    for (i, line) in text.split('\n').enumerate() {
        if i > 0 {
            writeln!(out)?;
        }
        for (j, word) in line.split(' ').enumerate() {
            if j > 0 {
                write!(out, " ")?;
            }
            write!(out, "{}", word)?;
            out.flush()?;
            if !delay.is_zero() && !word.is_empty() {
                thread::sleep(delay);
            }
        }
    }
    writeln!(out)?;
    out.flush()
}

/// Print an assistant response, streaming it only when stdout is a terminal.
pub fn print_response(text: &str, delay: Duration) -> Result<()> {
    let stdout = std::io::stdout();
    let delay = if stdout.is_terminal() { delay } else { Duration::ZERO };
    stream_words(&mut stdout.lock(), text, delay)?;
    Ok(())
}
