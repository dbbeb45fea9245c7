pub mod list;
pub mod remove;
pub mod rename;
pub mod status;
pub mod sweep;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Args, Subcommand};

use llmark_core::config::MarkConfig;
use llmark_core::store::{BookmarkStore, SqliteKv};

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show a summary of the bookmark store
    Status(status::StatusArgs),
    /// List stored bookmarks, optionally for a single URL
    List(list::ListArgs),
    /// Evict bookmarks older than the retention TTL
    Sweep(sweep::SweepArgs),
    /// Delete one bookmark by id
    Remove(remove::RemoveArgs),
    /// Rename one bookmark by id
    Rename(rename::RenameArgs),
}

pub async fn run(cmd: Command) -> anyhow::Result<()> {
    match cmd {
        Command::Status(args) => status::run(args).await,
        Command::List(args) => list::run(args).await,
        Command::Sweep(args) => sweep::run(args).await,
        Command::Remove(args) => remove::run(args).await,
        Command::Rename(args) => rename::run(args).await,
    }
}

/// Store location and configuration, shared by every subcommand.
#[derive(Args, Debug)]
pub struct StoreArgs {
    /// Path to the bookmark store database
    #[arg(short, long, default_value = "llmark.db", env = "LLMARK_STORE")]
    pub store: PathBuf,

    /// Path to an optional llmark.toml configuration file
    #[arg(short, long, default_value = "llmark.toml")]
    pub config: PathBuf,
}

impl StoreArgs {
    pub fn load_config(&self) -> anyhow::Result<MarkConfig> {
        MarkConfig::load(&self.config)
            .with_context(|| format!("Cannot load config: {}", self.config.display()))
    }

    pub fn open(&self) -> anyhow::Result<(BookmarkStore, MarkConfig)> {
        let config = self.load_config()?;
        let kv = SqliteKv::open(&self.store)
            .with_context(|| format!("Cannot open store: {}", self.store.display()))?;
        Ok((BookmarkStore::new(Arc::new(kv), &config), config))
    }

    /// Like [`open`](Self::open), but refuses to create a new database.
    pub fn open_existing(&self) -> anyhow::Result<(BookmarkStore, MarkConfig)> {
        if !self.store.exists() {
            anyhow::bail!("Store not found: {}", self.store.display());
        }
        self.open()
    }
}

/// Human-readable age, coarse on purpose.
pub fn format_age(age_ms: i64) -> String {
    let age_ms = age_ms.max(0);
    let minutes = age_ms / 60_000;
    let hours = minutes / 60;
    let days = hours / 24;
    if days > 0 {
        format!("{days}d {}h", hours % 24)
    } else if hours > 0 {
        format!("{hours}h {}m", minutes % 60)
    } else {
        format!("{minutes}m")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn age_formatting_is_coarse() {
        assert_eq!(format_age(0), "0m");
        assert_eq!(format_age(61 * 60_000), "1h 1m");
        assert_eq!(format_age((25 * 60 + 30) * 60_000), "1d 1h");
        assert_eq!(format_age(-5), "0m");
    }
}
