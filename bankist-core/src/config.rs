//! Configuration management
//!
//! Read from `settings.json` in the bankist directory:
//! ```json
//! {
//!   "bank": {
//!     "logoutAfterSecs": 120,
//!     "tickMillis": 1000,
//!     "loanDelaySecs": 3,
//!     "loanMinMovementRatio": 0.1,
//!     "seedFile": "accounts.json"
//!   }
//! }
//! ```
//! `bankist config` edits the file through [`Config::save`]; keys it does
//! not manage, inside or outside `bank`, are written back unchanged.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Raw settings.json structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SettingsFile {
    #[serde(default)]
    bank: BankSettings,
    #[serde(flatten)]
    other: HashMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BankSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    logout_after_secs: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    tick_millis: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    loan_delay_secs: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    loan_min_movement_ratio: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    seed_file: Option<PathBuf>,
    #[serde(flatten)]
    other: HashMap<String, serde_json::Value>,
}

/// Bankist configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Inactivity countdown length, in ticks
    pub logout_after_secs: u32,
    /// Length of one countdown tick
    pub tick: Duration,
    /// Delay before an approved loan lands on the account
    pub loan_delay: Duration,
    /// A loan needs one movement of at least `amount * ratio`
    pub loan_min_movement_ratio: Decimal,
    /// Accounts to load instead of the demo accounts (relative to the bankist dir)
    pub seed_file: Option<PathBuf>,
    /// File contents as loaded; only setters change it, env overrides never do
    raw: SettingsFile,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            logout_after_secs: 120,
            tick: Duration::from_secs(1),
            loan_delay: Duration::from_secs(3),
            loan_min_movement_ratio: Decimal::new(1, 1),
            seed_file: None,
            raw: SettingsFile::default(),
        }
    }
}

fn env_override<T: std::str::FromStr>(name: &str) -> Option<T> {
    std::env::var(name).ok()?.trim().parse().ok()
}

impl Config {
    /// Load config from the bankist directory
    ///
    /// A missing file means defaults. `BANKIST_LOGOUT_SECS` and
    /// `BANKIST_LOAN_DELAY_SECS` override the file (for CI/testing).
    pub fn load(bankist_dir: &Path) -> Result<Self> {
        let settings_path = bankist_dir.join("settings.json");

        let raw: SettingsFile = if settings_path.exists() {
            let content = std::fs::read_to_string(&settings_path)
                .with_context(|| format!("Failed to read {:?}", settings_path))?;
            serde_json::from_str(&content)
                .with_context(|| format!("Invalid settings in {:?}", settings_path))?
        } else {
            SettingsFile::default()
        };

        let defaults = Self::default();
        let bank = &raw.bank;
        let logout_after_secs = env_override("BANKIST_LOGOUT_SECS")
            .or(bank.logout_after_secs)
            .unwrap_or(defaults.logout_after_secs);
        let loan_delay = env_override("BANKIST_LOAN_DELAY_SECS")
            .or(bank.loan_delay_secs)
            .map(Duration::from_secs)
            .unwrap_or(defaults.loan_delay);

        let config = Self {
            logout_after_secs,
            tick: bank.tick_millis.map(Duration::from_millis).unwrap_or(defaults.tick),
            loan_delay,
            loan_min_movement_ratio: bank
                .loan_min_movement_ratio
                .unwrap_or(defaults.loan_min_movement_ratio),
            seed_file: bank.seed_file.as_ref().map(|p| bankist_dir.join(p)),
            raw,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn set_logout_after_secs(&mut self, secs: u32) {
        self.logout_after_secs = secs;
        self.raw.bank.logout_after_secs = Some(secs);
    }

    pub fn set_loan_delay_secs(&mut self, secs: u64) {
        self.loan_delay = Duration::from_secs(secs);
        self.raw.bank.loan_delay_secs = Some(secs);
    }

    /// Write settings.json, creating the bankist directory if needed
    ///
    /// Only values changed through the setters are written; environment
    /// overrides stay out of the file.
    pub fn save(&self, bankist_dir: &Path) -> Result<()> {
        self.validate()?;
        std::fs::create_dir_all(bankist_dir)
            .with_context(|| format!("Failed to create {:?}", bankist_dir))?;
        let settings_path = bankist_dir.join("settings.json");
        let content = serde_json::to_string_pretty(&self.raw)?;
        std::fs::write(&settings_path, content)
            .with_context(|| format!("Failed to write {:?}", settings_path))?;
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        if self.tick.is_zero() {
            anyhow::bail!("tickMillis must be greater than zero");
        }
        if self.loan_min_movement_ratio < Decimal::ZERO {
            anyhow::bail!("loanMinMovementRatio cannot be negative");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_without_file() {
        let dir = TempDir::new().unwrap();
        let config = Config::load(dir.path()).unwrap();
        assert_eq!(config.tick, Duration::from_secs(1));
        assert_eq!(config.loan_min_movement_ratio, Decimal::new(1, 1));
        assert!(config.seed_file.is_none());
    }

    #[test]
    fn test_reads_bank_section() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("settings.json"),
            r#"{ "bank": { "tickMillis": 10, "loanMinMovementRatio": 0.25, "seedFile": "seed.json" } }"#,
        )
        .unwrap();

        let config = Config::load(dir.path()).unwrap();
        assert_eq!(config.tick, Duration::from_millis(10));
        assert_eq!(config.loan_min_movement_ratio, Decimal::new(25, 2));
        assert_eq!(config.seed_file, Some(dir.path().join("seed.json")));
    }

    #[test]
    fn test_zero_tick_rejected() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("settings.json"), r#"{ "bank": { "tickMillis": 0 } }"#)
            .unwrap();
        assert!(Config::load(dir.path()).is_err());
    }

    #[test]
    fn test_save_preserves_unknown_keys() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("settings.json"),
            r#"{ "theme": "dark", "bank": { "tickMillis": 500, "favourite": "am" } }"#,
        )
        .unwrap();

        let mut config = Config::load(dir.path()).unwrap();
        config.set_logout_after_secs(300);
        config.save(dir.path()).unwrap();

        let saved: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(dir.path().join("settings.json")).unwrap())
                .unwrap();
        assert_eq!(saved["theme"], "dark");
        assert_eq!(saved["bank"]["favourite"], "am");
        assert_eq!(saved["bank"]["tickMillis"], 500);
        assert_eq!(saved["bank"]["logoutAfterSecs"], 300);

        let reloaded = Config::load(dir.path()).unwrap();
        assert_eq!(reloaded.logout_after_secs, 300);
        assert_eq!(reloaded.tick, Duration::from_millis(500));
    }

    #[test]
    fn test_save_creates_missing_dir() {
        let dir = TempDir::new().unwrap();
        let bankist_dir = dir.path().join("nested");

        let mut config = Config::load(&bankist_dir).unwrap();
        config.set_loan_delay_secs(1);
        config.save(&bankist_dir).unwrap();

        let saved = std::fs::read_to_string(bankist_dir.join("settings.json")).unwrap();
        assert_eq!(saved.matches("loanDelaySecs").count(), 1);
        assert!(!saved.contains("logoutAfterSecs"));
        assert_eq!(Config::load(&bankist_dir).unwrap().loan_delay, Duration::from_secs(1));
    }
}
