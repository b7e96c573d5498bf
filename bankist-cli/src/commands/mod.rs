//! CLI command implementations

pub mod accounts;
pub mod config;
pub mod shell;
pub mod summary;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use bankist_core::adapters::demo::load_accounts;
use bankist_core::config::Config;
use bankist_core::{BankContext, Collaborators};

/// Get the bankist directory from environment or default
pub fn get_bankist_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("BANKIST_DIR") {
        PathBuf::from(dir)
    } else {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".bankist")
    }
}

/// Build the bank context
///
/// `seed` replaces the configured seed file (or the demo accounts).
pub fn get_context(collaborators: Collaborators, seed: Option<&Path>) -> Result<BankContext> {
    let bankist_dir = get_bankist_dir();

    match seed {
        Some(path) => {
            let config = Config::load(&bankist_dir)?;
            let accounts = load_accounts(path)
                .with_context(|| format!("Failed to load accounts from {:?}", path))?;
            BankContext::new(config, accounts, collaborators)
                .context("Failed to initialize bank context")
        }
        None => BankContext::open(&bankist_dir, collaborators)
            .context("Failed to initialize bank context"),
    }
}

/// Collaborators for commands that never show a live screen
pub fn headless() -> Collaborators {
    Collaborators::with_ui(Arc::new(bankist_core::adapters::RecordingUi::new()))
}

/// Multi-threaded runtime that drives the countdown and loan tasks
pub fn runtime() -> Result<tokio::runtime::Runtime> {
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")
}
