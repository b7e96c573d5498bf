//! Accounts command - list the accounts in the store

use std::path::Path;

use anyhow::Result;
use bankist_core::adapters::LocaleFormatter;
use bankist_core::ports::Formatter;
use colored::Colorize;
use serde::Serialize;

use super::{get_context, headless};
use crate::output::create_table;

#[derive(Serialize)]
struct AccountRow {
    owner: String,
    username: String,
    currency: String,
    locale: String,
    balance: rust_decimal::Decimal,
    movements: usize,
}

pub fn run(seed: Option<&Path>, json: bool) -> Result<()> {
    let ctx = get_context(headless(), seed)?;
    let rows: Vec<AccountRow> = ctx
        .accounts()
        .into_iter()
        .map(|a| AccountRow {
            balance: a.balance(),
            movements: a.movements().len(),
            owner: a.owner,
            username: a.username,
            currency: a.currency,
            locale: a.locale,
        })
        .collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    println!("{}", "Accounts".bold());
    let formatter = LocaleFormatter;
    let mut table = create_table();
    table.set_header(vec!["Owner", "Username", "Balance", "Movements"]);
    for row in &rows {
        table.add_row(vec![
            row.owner.clone(),
            row.username.clone(),
            formatter.format_currency(row.balance, &row.locale, &row.currency),
            row.movements.to_string(),
        ]);
    }
    println!("{}", table);

    Ok(())
}
