//! `roam` — command-line client for the roam place guide.
//!
//! # Usage
//!
//! ```text
//! roam --url https://<project>.supabase.co --api-key <anon key> explore --query wat
//! roam --config ~/.config/roam/config.toml toggle temple 12
//! roam favorites list
//! ```

mod app;
mod client;
mod render;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use app::{App, Intent};
use clap::{Parser, Subcommand};
use client::{ApiConfig, RestSource};
use roam_core::{
  category::{CategoryFilter, CategoryKind},
  favorites::FavoritesStore,
};
use roam_store_sqlite::SqliteBlobStore;
use serde::Deserialize;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

const DEFAULT_URL: &str = "http://localhost:54321";
const DEFAULT_DB: &str = "~/.local/share/roam/favorites.db";

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "roam", version, about = "Explore places and keep favorites")]
struct Args {
  /// Path to a TOML config file (url, api_key, db).
  #[arg(short, long, value_name = "FILE")]
  config: Option<PathBuf>,

  /// Base URL of the category API.
  #[arg(long, env = "ROAM_URL")]
  url: Option<String>,

  /// API key sent with every category request.
  #[arg(long, env = "ROAM_API_KEY")]
  api_key: Option<String>,

  /// SQLite file holding favorites.
  #[arg(long, env = "ROAM_DB", value_name = "FILE")]
  db: Option<PathBuf>,

  /// Log at debug level unless RUST_LOG says otherwise.
  #[arg(short, long)]
  verbose: bool,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// List places, grouped by category.
  Explore {
    /// Case-insensitive match on name or address.
    #[arg(short, long, default_value = "")]
    query:    String,
    /// `all` or one of tourist_spot, restaurant, cafe, temple, festival.
    #[arg(long, default_value = "all")]
    category: CategoryFilter,
  },
  /// Add a place to favorites, or remove it if already there.
  Toggle { category: CategoryKind, id: i64 },
  /// Inspect or clear saved favorites.
  Favorites {
    #[command(subcommand)]
    action: FavoritesAction,
  },
  /// Print a map-directions URL for a place.
  Navigate { category: CategoryKind, id: i64 },
  /// Print a dialer URL for a place.
  Call { category: CategoryKind, id: i64 },
}

#[derive(Subcommand, Debug)]
enum FavoritesAction {
  /// Show favorites, newest first.
  List,
  /// Delete every favorite.
  Clear,
}

// ─── Config file ──────────────────────────────────────────────────────────────

/// Shape of the optional TOML config file.
#[derive(Deserialize, Default)]
struct ConfigFile {
  #[serde(default)]
  url:     String,
  #[serde(default)]
  api_key: String,
  #[serde(default)]
  db:      Option<PathBuf>,
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
  let args = Args::parse();

  // Logs go to stderr; stdout carries the rendered output.
  let default_level = if args.verbose { LevelFilter::DEBUG } else { LevelFilter::INFO };
  tracing_subscriber::fmt()
    .with_writer(std::io::stderr)
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(default_level.into())
        .from_env_lossy(),
    )
    .init();

  // Load config file if provided.
  let file_cfg: ConfigFile = if let Some(path) = &args.config {
    let raw = std::fs::read_to_string(path)
      .with_context(|| format!("reading config file {}", path.display()))?;
    toml::from_str(&raw).context("parsing config file")?
  } else {
    ConfigFile::default()
  };

  // CLI flags override config file, which overrides defaults.
  let api_config = ApiConfig {
    base_url: args
      .url
      .or_else(|| (!file_cfg.url.is_empty()).then(|| file_cfg.url.clone()))
      .unwrap_or_else(|| DEFAULT_URL.to_string()),
    api_key:  args
      .api_key
      .or_else(|| (!file_cfg.api_key.is_empty()).then(|| file_cfg.api_key.clone()))
      .unwrap_or_default(),
  };
  let db_path = expand_tilde(
    &args
      .db
      .or(file_cfg.db)
      .unwrap_or_else(|| PathBuf::from(DEFAULT_DB)),
  );

  if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
    std::fs::create_dir_all(parent)
      .with_context(|| format!("creating {}", parent.display()))?;
  }
  let blobs = SqliteBlobStore::open(&db_path)
    .await
    .with_context(|| format!("failed to open store at {db_path:?}"))?;

  let source = RestSource::new(api_config)?;
  let mut app = App::new(source, FavoritesStore::new(blobs));

  let result = match args.command {
    Command::Explore { query, category } => app.explore(&query, category).await,
    Command::Toggle { category, id } => app.toggle(category, id).await,
    Command::Favorites { action: FavoritesAction::List } => app.list_favorites().await,
    Command::Favorites { action: FavoritesAction::Clear } => app.clear_favorites().await,
    Command::Navigate { category, id } => app.intent(Intent::Navigate, category, id).await,
    Command::Call { category, id } => app.intent(Intent::Call, category, id).await,
  };

  for notice in &app.notices {
    eprintln!("warning: {notice}");
  }
  print!("{}", result?);
  Ok(())
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}
