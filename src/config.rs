// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration file support for kassist
//!
//! Loads configuration from .kassistrc.toml in current directory or ~/.config/kassist/config.toml

use serde::Deserialize;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use crate::embedding::{PipelineKind, TrainParams};

/// Default page cap for ingestion.
pub const DEFAULT_MAX_PAGES: u32 = 40;

/// Default avatar shown when the profile has none or it fails to load.
pub const DEFAULT_AVATAR_URL: &str = "https://www.w3schools.com/howto/img_avatar.png";

/// Default user name when no profile has been saved.
pub const DEFAULT_USER_NAME: &str = "Brian";

/// Ingestion configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct IngestConfig {
    /// Maximum number of pages to read from a PDF
    pub max_pages: Option<u32>,
    /// 1-based page numbers to skip
    pub skip_pages: Vec<u32>,
}

impl IngestConfig {
    /// Get max pages (defaults to 40)
    pub fn max_pages(&self) -> u32 {
        self.max_pages.unwrap_or(DEFAULT_MAX_PAGES)
    }

    /// Get skip set
    pub fn skip_pages(&self) -> BTreeSet<u32> {
        self.skip_pages.iter().copied().collect()
    }
}

/// Command router configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RouterConfig {
    /// Characters shown per page by `show content`
    pub preview_chars: Option<usize>,
    /// Characters at the top of each page searched by `goto section`
    pub section_scan_chars: Option<usize>,
    /// Characters per section search snippet
    pub snippet_chars: Option<usize>,
    /// Maximum number of section search results
    pub max_section_results: Option<usize>,
}

impl RouterConfig {
    /// Get preview chars (defaults to 300)
    pub fn preview_chars(&self) -> usize {
        self.preview_chars.unwrap_or(300)
    }

    /// Get section scan chars (defaults to 400)
    pub fn section_scan_chars(&self) -> usize {
        self.section_scan_chars.unwrap_or(400)
    }

    /// Get snippet chars (defaults to 200)
    pub fn snippet_chars(&self) -> usize {
        self.snippet_chars.unwrap_or(200)
    }

    /// Get max section results (defaults to 10)
    pub fn max_section_results(&self) -> usize {
        self.max_section_results.unwrap_or(10)
    }
}

/// Interactive chat configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ChatConfig {
    /// Delay between streamed words in milliseconds
    pub stream_delay_ms: Option<u64>,
    /// Line editor history file
    pub history_file: Option<PathBuf>,
}

impl ChatConfig {
    /// Get stream delay (defaults to 150ms)
    pub fn stream_delay_ms(&self) -> u64 {
        self.stream_delay_ms.unwrap_or(150)
    }

    /// Get history file (defaults to ~/.config/kassist/history.txt)
    pub fn history_file(&self) -> Option<PathBuf> {
        self.history_file
            .clone()
            .or_else(|| config_dir().map(|dir| dir.join("history.txt")))
    }
}

/// Profile store configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ProfileConfig {
    /// SQLite database path
    pub db_path: Option<PathBuf>,
    /// Timeout for the avatar URL check in milliseconds
    pub avatar_timeout_ms: Option<u64>,
}

impl ProfileConfig {
    /// Get database path (defaults to ~/.config/kassist/profile.sqlite)
    pub fn db_path(&self) -> PathBuf {
        self.db_path.clone().unwrap_or_else(|| {
            config_dir()
                .unwrap_or_else(|| PathBuf::from(".kassist"))
                .join("profile.sqlite")
        })
    }

    /// Get avatar timeout (defaults to 2000ms)
    pub fn avatar_timeout_ms(&self) -> u64 {
        self.avatar_timeout_ms.unwrap_or(2000)
    }
}

/// Hyperparameter overrides for a single pipeline
#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(default)]
pub struct PipelineOverrides {
    pub vector_size: Option<usize>,
    pub window: Option<usize>,
    pub min_count: Option<usize>,
}

/// Word2Vec demo configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Word2VecConfig {
    /// Training epochs (defaults to 5)
    pub epochs: Option<usize>,
    /// Negative samples per positive pair (defaults to 5)
    pub negative: Option<usize>,
    /// RNG seed (defaults to 1)
    pub seed: Option<u64>,
    /// Neighbors returned by similarity queries (defaults to 5)
    pub top_n: Option<usize>,
    /// Whether stopwords are dropped during tokenization (defaults to true)
    pub remove_stopwords: Option<bool>,

    #[serde(rename = "skip-gram")]
    pub skip_gram: PipelineOverrides,
    pub cbow: PipelineOverrides,
    pub compare: PipelineOverrides,
    pub view2d: PipelineOverrides,
    pub view3d: PipelineOverrides,
}

impl Word2VecConfig {
    /// Get top-n (defaults to 5)
    pub fn top_n(&self) -> usize {
        self.top_n.unwrap_or(5)
    }

    /// Get stopword removal setting (defaults to true)
    pub fn remove_stopwords(&self) -> bool {
        self.remove_stopwords.unwrap_or(true)
    }

    /// Resolve training parameters for a pipeline, applying overrides on top of its defaults
    pub fn params_for(&self, kind: PipelineKind) -> TrainParams {
        let mut params = kind.default_params();
        let overrides = match kind {
            PipelineKind::SkipGram => self.skip_gram,
            PipelineKind::Cbow => self.cbow,
            PipelineKind::Compare => self.compare,
            PipelineKind::View2d => self.view2d,
            PipelineKind::View3d => self.view3d,
        };

        if let Some(v) = overrides.vector_size {
            params.vector_size = v;
        }
        if let Some(v) = overrides.window {
            params.window = v;
        }
        if let Some(v) = overrides.min_count {
            params.min_count = v;
        }
        if let Some(v) = self.epochs {
            params.epochs = v;
        }
        if let Some(v) = self.negative {
            params.negative = v;
        }
        if let Some(v) = self.seed {
            params.seed = v;
        }
        params
    }
}

/// Configuration loaded from .kassistrc.toml or ~/.config/kassist/config.toml
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Default output format (text or json)
    pub default_format: Option<String>,

    #[serde(default)]
    pub ingest: IngestConfig,

    #[serde(default)]
    pub router: RouterConfig,

    #[serde(default)]
    pub chat: ChatConfig,

    #[serde(default)]
    pub profile: ProfileConfig,

    #[serde(default)]
    pub word2vec: Word2VecConfig,
}

impl Config {
    /// Load configuration from files
    ///
    /// Precedence (highest to lowest):
    /// 1. .kassistrc.toml in current directory
    /// 2. ~/.config/kassist/config.toml
    pub fn load() -> Self {
        if let Some(config) = Self::load_from_path(Path::new(".kassistrc.toml")) {
            return config;
        }

        if let Some(dir) = config_dir() {
            if let Some(config) = Self::load_from_path(&dir.join("config.toml")) {
                return config;
            }
        }

        Self::default()
    }

    pub fn load_from_path(path: &Path) -> Option<Self> {
        let content = std::fs::read_to_string(path).ok()?;
        match toml::from_str(&content) {
            Ok(config) => {
                tracing::debug!("loaded config from {}", path.display());
                Some(config)
            }
            Err(e) => {
                eprintln!("Warning: Failed to parse {}: {}", path.display(), e);
                None
            }
        }
    }

    /// Whether the config asks for JSON output by default
    pub fn prefers_json(&self) -> bool {
        self.default_format
            .as_deref()
            .map(|s| s.eq_ignore_ascii_case("json"))
            .unwrap_or(false)
    }

    /// Merge CLI page cap with config (CLI wins)
    pub fn merge_max_pages(&self, cli_value: Option<u32>) -> u32 {
        cli_value.unwrap_or_else(|| self.ingest.max_pages())
    }

    /// Merge CLI skip pages with config (CLI replaces config when given)
    pub fn merge_skip_pages(&self, cli_value: &[u32]) -> BTreeSet<u32> {
        if cli_value.is_empty() {
            self.ingest.skip_pages()
        } else {
            cli_value.iter().copied().collect()
        }
    }
}

/// ~/.config/kassist
pub fn config_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".config").join("kassist"))
}
