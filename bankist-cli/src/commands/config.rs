//! Config command - show or change settings.json

use anyhow::Result;
use bankist_core::config::Config;
use colored::Colorize;
use serde_json::json;

use super::get_bankist_dir;
use crate::output::{create_table, success};

pub fn run(logout_after: Option<u32>, loan_delay: Option<u64>, json: bool) -> Result<()> {
    let bankist_dir = get_bankist_dir();
    let mut config = Config::load(&bankist_dir)?;

    if logout_after.is_some() || loan_delay.is_some() {
        if let Some(secs) = logout_after {
            config.set_logout_after_secs(secs);
        }
        if let Some(secs) = loan_delay {
            config.set_loan_delay_secs(secs);
        }
        config.save(&bankist_dir)?;
        success(&format!("Saved {}", bankist_dir.join("settings.json").display()));
    }

    let seed = config
        .seed_file
        .as_ref()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "demo accounts".to_string());

    if json {
        let value = json!({
            "logoutAfterSecs": config.logout_after_secs,
            "tickMillis": config.tick.as_millis() as u64,
            "loanDelaySecs": config.loan_delay.as_secs(),
            "loanMinMovementRatio": config.loan_min_movement_ratio,
            "seedFile": config.seed_file,
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    println!("{}", "Settings".bold());
    let mut table = create_table();
    table.set_header(vec!["Setting", "Value"]);
    table.add_row(vec!["Logout after".to_string(), format!("{}s", config.logout_after_secs)]);
    table.add_row(vec!["Tick".to_string(), format!("{}ms", config.tick.as_millis())]);
    table.add_row(vec!["Loan delay".to_string(), format!("{}s", config.loan_delay.as_secs())]);
    table.add_row(vec![
        "Loan movement ratio".to_string(),
        config.loan_min_movement_ratio.to_string(),
    ]);
    table.add_row(vec!["Seed".to_string(), seed]);
    println!("{}", table);

    Ok(())
}
