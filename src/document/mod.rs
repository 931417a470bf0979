// SPDX-License-Identifier: MIT OR Apache-2.0

//! Document module - turns PDF bytes into an ordered set of cleaned pages
//!
//! Extraction goes through the [`PageSource`] trait so ingestion can run
//! against the lopdf-backed reader or an in-memory fake.

pub mod cleaner;
pub mod context;
pub mod ingest;
pub mod source;

pub use cleaner::{clean_page_text, render_table};
pub use context::{DocumentContext, PageRecord};
pub use ingest::{ingest, ingest_bytes, ingest_file, IngestOptions};
pub use source::{detect_tables, LopdfSource, PageSource, RawPage, Table};
