// SPDX-License-Identifier: MIT OR Apache-2.0

//! User profile persistence and avatar validation.
//!
//! The profile (display name + avatar URL) lives in a single-row SQLite table.
//! Avatar URLs are checked best-effort; any failure falls back to the default
//! avatar and is never fatal.

use anyhow::{Context, Result};
use rusqlite::{params, Connection, OptionalExtension};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::config::{DEFAULT_AVATAR_URL, DEFAULT_USER_NAME};

/// A stored or defaulted user profile
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserProfile {
    pub user_name: String,
    pub user_image: String,
}

impl Default for UserProfile {
    fn default() -> Self {
        Self {
            user_name: DEFAULT_USER_NAME.to_string(),
            user_image: DEFAULT_AVATAR_URL.to_string(),
        }
    }
}

impl UserProfile {
    /// The stored profile, or the defaults when nothing was saved yet.
    pub fn resolve(stored: Option<UserProfile>) -> Self {
        stored.unwrap_or_default()
    }
}

/// SQLite-backed profile store.
///
/// Stores the profile at `~/.config/kassist/profile.sqlite` by default.
pub struct ProfileStore {
    conn: Connection,
    path: PathBuf,
}

impl ProfileStore {
    /// Opens or creates a profile store at the specified path.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        let conn = Connection::open(&path)
            .with_context(|| format!("Failed to open database: {}", path.display()))?;
        let store = Self { conn, path };
        store.init_schema()?;
        Ok(store)
    }

    fn init_schema(&self) -> Result<()> {
        // id is pinned to 1 so the table never holds more than one profile
        self.conn
            .execute_batch(
                r#"
            CREATE TABLE IF NOT EXISTS user_profile (
                id INTEGER PRIMARY KEY CHECK (id = 1),
                user_name TEXT NOT NULL,
                user_image TEXT NOT NULL
            );
            "#,
            )
            .context("Failed to initialize profile schema")?;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> Result<Option<UserProfile>> {
        let profile = self
            .conn
            .query_row(
                "SELECT user_name, user_image FROM user_profile WHERE id = 1",
                [],
                |row| {
                    Ok(UserProfile {
                        user_name: row.get(0)?,
                        user_image: row.get(1)?,
                    })
                },
            )
            .optional()
            .context("Failed to load profile")?;
        Ok(profile)
    }

    /// Insert or replace the single stored profile.
    pub fn save(&self, user_name: &str, user_image: &str) -> Result<()> {
        self.conn
            .execute(
                r#"
            INSERT INTO user_profile (id, user_name, user_image)
            VALUES (1, ?1, ?2)
            ON CONFLICT(id) DO UPDATE SET
                user_name = excluded.user_name,
                user_image = excluded.user_image
            "#,
                params![user_name, user_image],
            )
            .context("Failed to save profile")?;
        tracing::debug!("saved profile for {} to {}", user_name, self.path.display());
        Ok(())
    }
}

/// Trait for checking whether a URL points at an image.
pub trait AvatarCheck {
    fn is_valid_image(&self, url: &str) -> bool;
}

/// Checks avatar URLs with a blocking HTTP GET.
pub struct HttpAvatarCheck {
    timeout: Duration,
}

impl HttpAvatarCheck {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

impl Default for HttpAvatarCheck {
    fn default() -> Self {
        Self::new(Duration::from_millis(2000))
    }
}

impl AvatarCheck for HttpAvatarCheck {
    fn is_valid_image(&self, url: &str) -> bool {
        let client = match reqwest::blocking::Client::builder()
            .timeout(self.timeout)
            .build()
        {
            Ok(client) => client,
            Err(e) => {
                tracing::warn!("failed to build http client: {}", e);
                return false;
            }
        };

        match client.get(url).send() {
            Ok(resp) => {
                let is_image = resp
                    .headers()
                    .get(reqwest::header::CONTENT_TYPE)
                    .and_then(|v| v.to_str().ok())
                    .is_some_and(|ct| ct.contains("image"));
                resp.status() == reqwest::StatusCode::OK && is_image
            }
            Err(e) => {
                tracing::debug!("avatar check for {} failed: {}", url, e);
                false
            }
        }
    }
}

/// Avatar to display: `url` when it serves an image, otherwise the default.
///
/// Returns the chosen URL and whether a fallback happened.
pub fn resolve_avatar(url: &str, check: &dyn AvatarCheck) -> (String, bool) {
    if url == DEFAULT_AVATAR_URL {
        return (url.to_string(), false);
    }
    if !url.trim().is_empty() && check.is_valid_image(url) {
        (url.to_string(), false)
    } else {
        tracing::warn!("invalid avatar URL {:?}, using default", url);
        (DEFAULT_AVATAR_URL.to_string(), true)
    }
}
