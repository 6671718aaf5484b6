mod config;
mod db;
mod error;
mod export;
mod ledger;
mod logging;
mod models;
mod run;
mod session;
mod ui;

use anyhow::{Context, Result};
use directories::ProjectDirs;
use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::logging::LogTarget;
use crate::session::{MemoryStore, SessionStore, Storage};

fn main() -> Result<()> {
    let mut args: Vec<String> = std::env::args().skip(1).collect();
    let dry_run = take_flag(&mut args, "--dry-run");

    let dirs = ProjectDirs::from("com", "happypocket", "HappyPocket")
        .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))?;
    let data_dir = dirs.data_dir();
    std::fs::create_dir_all(data_dir)
        .with_context(|| format!("Failed to create data directory: {}", data_dir.display()))?;

    let tui_mode = args.is_empty();
    init_logging(tui_mode, data_dir);

    let config = Config::load(&config::config_path(&dirs))?;
    let storage: Box<dyn Storage> = if dry_run {
        tracing::info!("dry run, nothing will be saved");
        Box::new(MemoryStore::new())
    } else {
        let db_path = get_db_path(&config, data_dir);
        Box::new(db::Database::open(&db_path)?)
    };
    let mut store = SessionStore::new(storage);

    if tui_mode {
        run::as_tui(store, &config)
    } else {
        run::as_cli(&args, &mut store, &config)
    }
}

/// Remove every occurrence of `flag`, reporting whether it was present.
fn take_flag(args: &mut Vec<String>, flag: &str) -> bool {
    let before = args.len();
    args.retain(|a| a != flag);
    args.len() != before
}

fn init_logging(tui_mode: bool, data_dir: &Path) {
    if !tui_mode {
        logging::init_tracing(LogTarget::Stderr);
        return;
    }
    let log_path = data_dir.join("happypocket.log");
    // Without a log file, stay silent rather than draw over the screen.
    if let Ok(file) = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
    {
        logging::init_tracing(LogTarget::File(file));
    }
}

fn get_db_path(config: &Config, data_dir: &Path) -> PathBuf {
    config
        .db_path
        .clone()
        .unwrap_or_else(|| data_dir.join("happypocket.db"))
}
