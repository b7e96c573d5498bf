//! Output formatting utilities and the terminal UI

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use bankist_core::adapters::LocaleFormatter;
use bankist_core::ports::{Control, Field, Formatter, InputControls, Renderer};
use bankist_core::{LogoutReason, MovementKind, ViewBundle};
use rust_decimal::Decimal;
use colored::Colorize;
use comfy_table::{presets::UTF8_FULL_CONDENSED, Cell, CellAlignment, ContentArrangement, Table};

/// Print a success message
pub fn success(msg: &str) {
    println!("{}", msg.green());
}

/// Print an error message
pub fn error(msg: &str) {
    eprintln!("{}", msg.red());
}

/// Print a warning message
pub fn warning(msg: &str) {
    println!("{}", msg.yellow());
}

/// Print an info message
pub fn info(msg: &str) {
    println!("{}", msg.cyan());
}

/// Create a styled table
pub fn create_table() -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table
}

/// Print balance, summary and movement list for one account
pub fn print_view(view: &ViewBundle, formatter: &dyn Formatter) {
    let money = |amount| formatter.format_currency(amount, &view.locale, &view.currency);

    println!();
    println!(
        "{}  {}",
        "Current balance".bold(),
        money(view.balance).bold()
    );
    println!(
        "{}",
        format!("As of {}", formatter.format_datetime(view.as_of, &view.locale)).dimmed()
    );
    println!();

    let mut table = create_table();
    table.set_header(vec!["#", "Type", "Date", "Amount"]);
    for row in &view.movements {
        let kind = match row.kind {
            MovementKind::Deposit => row.kind.as_str().green(),
            MovementKind::Withdrawal => row.kind.as_str().red(),
        };
        table.add_row(vec![
            Cell::new(row.position),
            Cell::new(kind),
            Cell::new(&row.date_label),
            Cell::new(money(row.amount)).set_alignment(CellAlignment::Right),
        ]);
    }
    println!("{}", table);

    println!(
        "In {}   Out {}   Interest {}",
        money(view.total_income).green(),
        money(view.total_outflow).red(),
        money(view.total_interest).cyan()
    );
}

/// Renderer and input surface for the interactive shell
///
/// Views are printed as they arrive; the countdown is kept and shown in the
/// prompt rather than printed every second.
#[derive(Debug)]
pub struct TerminalUi {
    formatter: LocaleFormatter,
    remaining: Mutex<String>,
    loan_enabled: AtomicBool,
}

impl Default for TerminalUi {
    fn default() -> Self {
        Self {
            formatter: LocaleFormatter,
            remaining: Mutex::new(String::new()),
            loan_enabled: AtomicBool::new(true),
        }
    }
}

impl TerminalUi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last countdown label, e.g. `01:42`
    pub fn remaining(&self) -> String {
        self.remaining
            .lock()
            .map(|r| r.clone())
            .unwrap_or_default()
    }

    pub fn loan_enabled(&self) -> bool {
        self.loan_enabled.load(Ordering::SeqCst)
    }
}

impl Renderer for TerminalUi {
    fn update_view(&self, view: &ViewBundle) {
        print_view(view, &self.formatter);
    }

    fn show_session(&self, welcome: &str) {
        println!("\n{}", welcome.bold());
    }

    fn hide_session(&self, reason: LogoutReason) {
        if let Ok(mut remaining) = self.remaining.lock() {
            remaining.clear();
        }
        match reason {
            LogoutReason::Manual => info("Logged out"),
            LogoutReason::Expired => warning("\nSession expired after inactivity. Log in to get started."),
            LogoutReason::AccountClosed => info("Account closed"),
        }
    }

    fn timer_tick(&self, remaining: &str) {
        if let Ok(mut label) = self.remaining.lock() {
            *label = remaining.to_string();
        }
    }

    fn loan_settled(&self, amount: Decimal, landed: bool) {
        if landed {
            success(&format!("Loan of {amount} paid out"));
        } else {
            warning(&format!("Loan of {amount} was not paid out"));
        }
    }
}

impl InputControls for TerminalUi {
    // Prompts are fresh each time, so there is nothing to clear
    fn clear(&self, _field: Field) {}

    fn set_enabled(&self, control: Control, enabled: bool) {
        match control {
            Control::LoanRequest => self.loan_enabled.store(enabled, Ordering::SeqCst),
        }
    }
}
