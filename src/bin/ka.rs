// SPDX-License-Identifier: MIT OR Apache-2.0

//! ka - Shorthand command for kassist
//!
//! This is a convenience wrapper that provides:
//! - `ka` with no args starts an interactive chat
//! - `ka <prompt words>` runs `kassist ask <prompt words>`
//! - known subcommands and flags pass straight through

use std::env;
use std::process::{Command, ExitCode};

fn main() -> ExitCode {
    let args: Vec<String> = env::args().skip(1).collect();

    // kassist lives next to ka
    let kassist_path = match env::current_exe() {
        Ok(path) => path.with_file_name(format!("kassist{}", env::consts::EXE_SUFFIX)),
        Err(_) => "kassist".into(),
    };

    let mut cmd = Command::new(&kassist_path);
    cmd.args(translate_args(&args));

    match cmd.status() {
        Ok(status) => {
            if status.success() {
                ExitCode::SUCCESS
            } else {
                ExitCode::from(status.code().unwrap_or(1) as u8)
            }
        }
        Err(e) => {
            eprintln!("Error running kassist: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn translate_args(args: &[String]) -> Vec<String> {
    match args.first() {
        None => vec!["chat".to_string()],
        Some(first) if !first.starts_with('-') && !is_subcommand(first) => {
            std::iter::once("ask".to_string())
                .chain(args.iter().cloned())
                .collect()
        }
        Some(_) => args.to_vec(),
    }
}

/// Check if the argument is a known kassist subcommand, spelled the way
/// kassist parses it (case-sensitive)
fn is_subcommand(arg: &str) -> bool {
    matches!(
        arg,
        "chat" | "c" | "ask" | "a" | "pages" | "embed" | "e" | "profile" | "completions" | "help"
    )
}
