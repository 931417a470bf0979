// SPDX-License-Identifier: MIT OR Apache-2.0

//! Router module - maps chat prompts to plain-text responses
//!
//! Prompts are parsed into a [`Command`] and answered against the current
//! document, if one is loaded. Routing never fails; problems are reported as
//! guidance text.

pub mod command;
pub mod respond;

pub use command::{normalize, Command, MalformedCommand};
pub use respond::{
    Router, RouterOptions, SectionHit, CLUSTERING_PLACEHOLDER, ESG_PLACEHOLDER, HELP_TEXT,
    KEYWORD_GUIDANCE, PAGE_NUMBER_GUIDANCE, UPLOAD_PROMPT,
};
