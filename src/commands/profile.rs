// SPDX-License-Identifier: MIT OR Apache-2.0

//! Show or update the stored user profile

use anyhow::{bail, Result};
use colored::Colorize;
use serde::Serialize;
use std::time::Duration;

use crate::cli::{OutputFormat, ProfileCommands};
use kassist::config::Config;
use kassist::output::print_json;
use kassist::profile::{resolve_avatar, HttpAvatarCheck, ProfileStore, UserProfile};

#[derive(Debug, Serialize)]
struct ProfileView {
    user_name: String,
    user_image: String,
    stored: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    avatar_valid: Option<bool>,
}

/// Run the profile command
pub fn run(action: &ProfileCommands, config: &Config, format: OutputFormat, compact: bool) -> Result<()> {
    let store = ProfileStore::open(config.profile.db_path())?;

    match action {
        ProfileCommands::Show { check_avatar } => {
            let stored = store.load()?;
            let is_stored = stored.is_some();
            let profile = UserProfile::resolve(stored);

            let avatar_valid = if *check_avatar {
                let check =
                    HttpAvatarCheck::new(Duration::from_millis(config.profile.avatar_timeout_ms()));
                let (_, fell_back) = resolve_avatar(&profile.user_image, &check);
                Some(!fell_back)
            } else {
                None
            };

            let view = ProfileView {
                user_name: profile.user_name,
                user_image: profile.user_image,
                stored: is_stored,
                avatar_valid,
            };
            match format {
                OutputFormat::Json => print_json(&view, compact)?,
                OutputFormat::Text => {
                    println!("{} {}", "Name:".bold(), view.user_name);
                    println!("{} {}", "Avatar:".bold(), view.user_image);
                    if !view.stored {
                        println!("{}", "(defaults, no profile saved yet)".dimmed());
                    }
                    match view.avatar_valid {
                        Some(true) => println!("{} avatar URL serves an image", "✓".green()),
                        Some(false) => println!(
                            "{} Invalid avatar URL. Showing default image.",
                            "⚠️".yellow()
                        ),
                        None => {}
                    }
                }
            }
        }
        ProfileCommands::Set { name, avatar } => {
            if name.is_none() && avatar.is_none() {
                bail!("Nothing to update: pass --name and/or --avatar");
            }
            let current = UserProfile::resolve(store.load()?);
            let user_name = name.clone().unwrap_or(current.user_name);
            let user_image = avatar.clone().unwrap_or(current.user_image);
            if user_name.trim().is_empty() {
                bail!("Name must not be empty");
            }
            store.save(&user_name, &user_image)?;

            match format {
                OutputFormat::Json => print_json(
                    &UserProfile {
                        user_name,
                        user_image,
                    },
                    compact,
                )?,
                OutputFormat::Text => {
                    println!("{} Profile saved for {}", "✓".green(), user_name.bold());
                }
            }
        }
    }

    Ok(())
}
