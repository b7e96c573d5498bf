//! Bankist CLI - the Bankist demo bank in your terminal

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod output;

use commands::{accounts, config, shell, summary};

/// Bankist - a demo bank in your terminal
#[derive(Parser)]
#[command(name = "bankist", version, about, long_about = None)]
struct Cli {
    /// Load accounts from this JSON file instead of the configured seed
    #[arg(long, global = true, env = "BANKIST_SEED")]
    seed: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start an interactive banking session (default)
    Shell,

    /// List accounts and their usernames
    Accounts {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Log in once and print balance, summary and movements
    Summary {
        /// Username (owner initials, e.g. "am")
        #[arg(long, short)]
        user: String,
        /// PIN
        #[arg(long, short)]
        pin: String,
        /// List oldest movements first
        #[arg(long)]
        sort: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show settings, or change them in settings.json
    Config {
        /// Seconds of inactivity before automatic logout
        #[arg(long, value_name = "SECS")]
        logout_after: Option<u32>,
        /// Seconds before an approved loan is paid out
        #[arg(long, value_name = "SECS")]
        loan_delay: Option<u64>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

/// Log to stderr, filtered by BANKIST_LOG (default: warnings only)
fn init_tracing() {
    let filter = EnvFilter::try_from_env("BANKIST_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            output::error(&format!("{:#}", e));
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let seed = cli.seed.as_deref();
    match cli.command.unwrap_or(Commands::Shell) {
        Commands::Shell => shell::run(seed),
        Commands::Accounts { json } => accounts::run(seed, json),
        Commands::Summary { user, pin, sort, json } => summary::run(seed, &user, &pin, sort, json),
        Commands::Config { logout_after, loan_delay, json } => config::run(logout_after, loan_delay, json),
    }
}
