// SPDX-License-Identifier: MIT OR Apache-2.0

//! kassist - PDF chat assistant and word embedding playground
//!
//! Shared modules for the kassist CLI tool.

pub mod config;
pub mod document;
pub mod embedding;
pub mod errors;
pub mod output;
pub mod profile;
pub mod router;
pub mod session;
