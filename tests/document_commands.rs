// SPDX-License-Identifier: MIT OR Apache-2.0

use assert_cmd::Command;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Write a PDF with one line of text per page.
fn write_pdf(path: &Path, pages: &[&str]) {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
        "Encoding" => "WinAnsiEncoding",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });

    let mut kids: Vec<Object> = Vec::new();
    for text in pages {
        let content = Content {
            operations: vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 12.into()]),
                Operation::new("Td", vec![72.into(), 720.into()]),
                Operation::new("Tj", vec![Object::string_literal(*text)]),
                Operation::new("ET", vec![]),
            ],
        };
        let content_id = doc.add_object(Stream::new(
            dictionary! {},
            content.encode().expect("encode content"),
        ));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => resources_id,
        });
        kids.push(page_id.into());
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc.save(path).expect("save pdf");
}

/// Temp dir with an isolated config and a three-page report.pdf.
fn workspace() -> TempDir {
    let dir = TempDir::new().expect("tempdir");
    fs::write(
        dir.path().join(".kassistrc.toml"),
        "[profile]\ndb_path = \"profile.sqlite\"\n\n[chat]\nhistory_file = \"history.txt\"\n",
    )
    .expect("write config");
    write_pdf(
        &dir.path().join("report.pdf"),
        &[
            "Introduction to the annual report",
            "Emissions overview for the year",
            "Governance and board structure",
        ],
    );
    dir
}

fn kassist(dir: &TempDir) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("kassist"));
    cmd.current_dir(dir.path())
        .env("HOME", dir.path())
        .env("NO_COLOR", "1");
    cmd
}

#[test]
fn show_content_without_document_asks_for_upload() {
    let dir = workspace();
    kassist(&dir)
        .args(["ask", "Show", "Content"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Please upload a PDF file"));
}

#[test]
fn unknown_prompt_prints_help() {
    let dir = workspace();
    kassist(&dir)
        .args(["ask", "what", "is", "this"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Show pdf page <num>"))
        .stdout(predicate::str::contains("ESG analysis"));
}

#[test]
fn pages_honours_skip_set_without_renumbering() {
    let dir = workspace();
    let assert = kassist(&dir)
        .args(["--format", "json", "pages", "report.pdf", "--skip", "2"])
        .assert()
        .success();
    let json: Value = serde_json::from_slice(&assert.get_output().stdout).expect("json");

    assert_eq!(json["source_name"], "report.pdf");
    let numbers: Vec<u64> = json["pages"]
        .as_array()
        .expect("pages array")
        .iter()
        .map(|p| p["page_number"].as_u64().expect("page number"))
        .collect();
    assert_eq!(numbers, vec![1, 3]);
    assert!(json["pages"][1]["content"]
        .as_str()
        .expect("content")
        .contains("Governance"));
}

#[test]
fn max_pages_caps_ingestion() {
    let dir = workspace();
    let assert = kassist(&dir)
        .args(["--format", "json", "--compact", "pages", "report.pdf", "--max-pages", "1"])
        .assert()
        .success();
    let json: Value = serde_json::from_slice(&assert.get_output().stdout).expect("json");
    assert_eq!(json["pages"].as_array().expect("pages array").len(), 1);
}

#[test]
fn ask_show_pdf_page_returns_that_page() {
    let dir = workspace();
    kassist(&dir)
        .args(["ask", "--pdf", "report.pdf", "show", "pdf", "page", "3"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[Page 3]"))
        .stdout(predicate::str::contains("Governance and board structure"));
}

#[test]
fn ask_reads_pdf_flag_given_after_the_prompt() {
    let dir = workspace();
    kassist(&dir)
        .args(["ask", "show", "content", "--pdf", "report.pdf"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[Page 1]"))
        .stdout(predicate::str::contains("Please upload a PDF file").not());
}

#[test]
fn ask_show_pdf_page_without_number_gives_guidance() {
    let dir = workspace();
    kassist(&dir)
        .args(["ask", "--pdf", "report.pdf", "show pdf page"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Please specify the page number"));
}

#[test]
fn goto_section_finds_keyword_page() {
    let dir = workspace();
    let assert = kassist(&dir)
        .args(["--format", "json", "ask", "--pdf", "report.pdf", "goto section emissions"])
        .assert()
        .success();
    let json: Value = serde_json::from_slice(&assert.get_output().stdout).expect("json");
    let response = json["response"].as_str().expect("response");
    assert!(response.contains("[Page 2]"));
    assert!(!response.contains("[Page 1]"));
    assert_eq!(json["document"]["pages"], serde_json::json!([1, 2, 3]));
}

#[test]
fn non_pdf_upload_fails_cleanly() {
    let dir = workspace();
    fs::write(dir.path().join("notes.pdf"), "just some text").expect("write");
    kassist(&dir)
        .args(["pages", "notes.pdf"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("notes.pdf"));
}

#[test]
fn chat_session_routes_lines_and_slash_commands() {
    let dir = workspace();
    kassist(&dir)
        .arg("chat")
        .write_stdin("show content\n/upload report.pdf\nshow content\n/status\n/quit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Brian's Chatbot"))
        .stdout(predicate::str::contains("Please upload a PDF file"))
        .stdout(predicate::str::contains("Loaded report.pdf (3 pages)"))
        .stdout(predicate::str::contains("[Page 2]"))
        .stdout(predicate::str::contains("Messages: 4"));
}

#[cfg(feature = "repl-rustyline")]
#[test]
fn chat_saves_line_history_to_configured_file() {
    let dir = workspace();
    kassist(&dir)
        .arg("chat")
        .write_stdin("show content\n/quit\n")
        .assert()
        .success();

    let history = fs::read_to_string(dir.path().join("history.txt")).expect("history file");
    assert!(history.contains("show content"));
}
