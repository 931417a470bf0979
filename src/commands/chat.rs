// SPDX-License-Identifier: MIT OR Apache-2.0

//! Interactive chat loop.
//!
//! By default we use `rustyline` for line editing and history.
//! A minimal stdin-based fallback exists behind `--no-default-features`.

use anyhow::Result;
use colored::Colorize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use super::{ingest_options, new_session, upload_file};
use crate::cli::IngestArgs;
use kassist::config::{Config, DEFAULT_AVATAR_URL};
use kassist::document::IngestOptions;
use kassist::output::{colorize_dim, colorize_role, print_response, use_colors};
use kassist::profile::{resolve_avatar, HttpAvatarCheck, ProfileStore, UserProfile};
use kassist::session::{Role, Session};

const SLASH_HELP: &str = "\
Chat commands:
  /upload <path>   load a PDF (replaces the current one)
  /clear           drop the document and the conversation
  /history         print the conversation so far
  /save <path>     write the conversation as JSON
  /status          show what is loaded
  /help            this message
  /quit            leave

Anything else is sent to the assistant. Try `show content` after uploading.";

struct ChatState {
    session: Session,
    options: IngestOptions,
    delay: Duration,
}

enum ChatControl {
    Continue,
    Exit,
}

/// Run the chat command
pub fn run(pdf: Option<&Path>, ingest: &IngestArgs, config: &Config) -> Result<()> {
    let mut state = ChatState {
        session: new_session(config),
        options: ingest_options(config, ingest),
        delay: Duration::from_millis(config.chat.stream_delay_ms()),
    };

    print_banner(config);

    if let Some(path) = pdf {
        cmd_upload(&mut state, path);
    }

    #[cfg(feature = "repl-rustyline")]
    {
        chat_rustyline(&mut state, config.chat.history_file())
    }
    #[cfg(not(feature = "repl-rustyline"))]
    {
        chat_simple(&mut state)
    }
}

fn print_banner(config: &Config) {
    let profile = match ProfileStore::open(config.profile.db_path()).and_then(|s| s.load()) {
        Ok(stored) => UserProfile::resolve(stored),
        Err(e) => {
            tracing::warn!("profile store unavailable, using defaults: {:#}", e);
            UserProfile::default()
        }
    };

    println!("{}", format!("💬 {}'s Chatbot", profile.user_name).green().bold());

    let avatar = if profile.user_image == DEFAULT_AVATAR_URL {
        profile.user_image
    } else {
        let check = HttpAvatarCheck::new(Duration::from_millis(config.profile.avatar_timeout_ms()));
        let (url, fell_back) = resolve_avatar(&profile.user_image, &check);
        if fell_back {
            println!("{} Invalid avatar URL. Showing default image.", "⚠️".yellow());
        }
        url
    };
    println!("{}", colorize_dim(&format!("Avatar: {}", avatar), use_colors()));
    println!("Type /help for chat commands, /quit to leave.\n");
}

#[cfg(not(feature = "repl-rustyline"))]
fn chat_simple(state: &mut ChatState) -> Result<()> {
    use std::io::{self, Write};

    let stdin = io::stdin();
    loop {
        print!("{}", "you> ".cyan().bold());
        io::stdout().flush()?;

        let mut line = String::new();
        if stdin.read_line(&mut line)? == 0 {
            break;
        }
        match handle_line(state, line.trim())? {
            ChatControl::Continue => {}
            ChatControl::Exit => break,
        }
    }
    Ok(())
}

#[cfg(feature = "repl-rustyline")]
fn chat_rustyline(state: &mut ChatState, history: Option<PathBuf>) -> Result<()> {
    use anyhow::anyhow;
    use rustyline::error::ReadlineError;
    use rustyline::DefaultEditor;

    let mut rl = DefaultEditor::new().map_err(|e| anyhow!("failed to init rustyline: {e}"))?;
    if let Some(path) = &history {
        // missing history on first run is expected
        let _ = rl.load_history(path);
    }

    loop {
        let line = match rl.readline("you> ") {
            Ok(l) => l,
            Err(ReadlineError::Eof) => break,
            Err(ReadlineError::Interrupted) => continue,
            Err(e) => return Err(anyhow!("readline error: {e}")),
        };

        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        rl.add_history_entry(line)
            .map_err(|e| anyhow!("failed to record history: {e}"))?;

        match handle_line(state, line)? {
            ChatControl::Continue => {}
            ChatControl::Exit => break,
        }
    }

    if let Some(path) = &history {
        if let Some(parent) = path.parent() {
            let _ = std::fs::create_dir_all(parent);
        }
        if let Err(e) = rl.save_history(path) {
            tracing::warn!("failed to save history to {}: {}", path.display(), e);
        }
    }
    Ok(())
}

fn handle_line(state: &mut ChatState, line: &str) -> Result<ChatControl> {
    if line.is_empty() {
        return Ok(ChatControl::Continue);
    }

    let Some(rest) = line.strip_prefix('/') else {
        let response = state.session.chat(line);
        print_response(&response, state.delay)?;
        println!();
        return Ok(ChatControl::Continue);
    };

    let (cmd, arg) = match rest.split_once(char::is_whitespace) {
        Some((cmd, arg)) => (cmd, arg.trim()),
        None => (rest, ""),
    };

    match cmd.to_lowercase().as_str() {
        "quit" | "exit" | "q" => return Ok(ChatControl::Exit),
        "help" | "?" => println!("{}\n", SLASH_HELP),
        "upload" | "load" => {
            if arg.is_empty() {
                eprintln!("{} usage: /upload <path>", "error:".red().bold());
            } else {
                cmd_upload(state, &expand_path(arg));
            }
        }
        "clear" => {
            state.session.clear();
            println!("{} Cleared document and conversation\n", "✓".green());
        }
        "history" => print_history(&state.session),
        "save" => {
            if arg.is_empty() {
                eprintln!("{} usage: /save <path>", "error:".red().bold());
            } else {
                let path = expand_path(arg);
                match state.session.save_transcript(&path) {
                    Ok(()) => println!("{} Saved conversation to {}\n", "✓".green(), path.display()),
                    Err(e) => eprintln!("{} {:#}", "error:".red().bold(), e),
                }
            }
        }
        "status" => print_status(&state.session),
        other => eprintln!(
            "{} unknown command /{} (type /help)",
            "error:".red().bold(),
            other
        ),
    }
    Ok(ChatControl::Continue)
}

fn cmd_upload(state: &mut ChatState, path: &Path) {
    match upload_file(&mut state.session, path, &state.options) {
        Ok(doc) => println!(
            "{} Loaded {} ({} pages)\n",
            "✓".green(),
            doc.source_name().bold(),
            doc.len()
        ),
        Err(e) => {
            let kept = state
                .session
                .document()
                .map(|d| format!(" (keeping {})", d.source_name()))
                .unwrap_or_default();
            eprintln!("{} {:#}{}", "error:".red().bold(), e, kept);
        }
    }
}

fn print_history(session: &Session) {
    let use_color = use_colors();
    if session.transcript().is_empty() {
        println!("{}\n", colorize_dim("(no messages yet)", use_color));
        return;
    }
    for message in session.transcript() {
        let label = match message.role {
            Role::User => "you",
            Role::Assistant => "assistant",
        };
        println!("{}: {}\n", colorize_role(label, use_color), message.content);
    }
}

fn print_status(session: &Session) {
    match session.document() {
        Some(doc) => println!(
            "Document: {} ({} pages: {:?})",
            doc.source_name().bold(),
            doc.len(),
            doc.page_numbers()
        ),
        None => println!("Document: {}", "none".dimmed()),
    }
    println!("Messages: {}\n", session.transcript().len());
}

fn expand_path(arg: &str) -> PathBuf {
    let arg = arg.trim_matches(|c| c == '"' || c == '\'');
    match arg.strip_prefix("~/") {
        Some(rest) => dirs::home_dir()
            .map(|home| home.join(rest))
            .unwrap_or_else(|| PathBuf::from(arg)),
        None => PathBuf::from(arg),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kassist::router::UPLOAD_PROMPT;

    fn state() -> ChatState {
        ChatState {
            session: new_session(&Config::default()),
            options: IngestOptions::default(),
            delay: Duration::ZERO,
        }
    }

    #[test]
    fn prompts_go_to_the_session() {
        let mut state = state();
        assert!(matches!(handle_line(&mut state, "show content").unwrap(), ChatControl::Continue));
        assert_eq!(state.session.transcript().len(), 2);
        assert_eq!(state.session.transcript()[1].content, UPLOAD_PROMPT);
    }

    #[test]
    fn slash_commands_do_not_reach_the_transcript() {
        let mut state = state();
        handle_line(&mut state, "/status").unwrap();
        handle_line(&mut state, "/bogus").unwrap();
        assert!(state.session.transcript().is_empty());
        assert!(matches!(handle_line(&mut state, "/quit").unwrap(), ChatControl::Exit));
    }

    #[test]
    fn failed_upload_is_not_fatal() {
        let mut state = state();
        let result = handle_line(&mut state, "/upload /definitely/not/here.pdf");
        assert!(result.is_ok());
        assert!(state.session.document().is_none());
    }

    #[test]
    fn expands_home_and_strips_quotes() {
        assert_eq!(expand_path("'report.pdf'"), PathBuf::from("report.pdf"));
        if let Some(home) = dirs::home_dir() {
            assert_eq!(expand_path("~/a.pdf"), home.join("a.pdf"));
        }
    }
}
