//! Demo accounts and seed files
//!
//! The two accounts the Bankist demo ships with. Usernames are derived by
//! the store, so "Ahmed Mamdoh" logs in as `am` and "Abdullah walid" as `aw`.

use std::path::Path;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::domain::result::Result;
use crate::domain::{Account, Pin};

fn history(entries: &[(i64, u32, &str)]) -> Vec<(Decimal, DateTime<Utc>)> {
    entries
        .iter()
        .filter_map(|(amount, scale, date)| {
            let at = DateTime::parse_from_rfc3339(date).ok()?.with_timezone(&Utc);
            Some((Decimal::new(*amount, *scale), at))
        })
        .collect()
}

/// Generate demo accounts
pub fn generate_demo_accounts() -> Vec<Account> {
    vec![
        Account::new("Ahmed Mamdoh", Pin::new(1111), Decimal::new(12, 1), "EUR", "pt-PT")
            .with_movements(history(&[
                (200, 0, "2020-11-18T21:31:17.178Z"),
                (45523, 2, "2020-12-23T07:42:02.383Z"),
                (-3065, 1, "2021-01-28T09:15:04.904Z"),
                (25000, 0, "2021-04-01T10:17:24.185Z"),
                (-64221, 2, "2022-05-08T14:11:59.604Z"),
                (-1339, 1, "2023-02-23T17:01:17.194Z"),
                (7997, 2, "2025-02-24T23:36:17.929Z"),
                (1300, 0, "2025-02-26T10:51:36.790Z"),
            ])),
        Account::new("Abdullah walid", Pin::new(2222), Decimal::new(15, 1), "USD", "en-US")
            .with_movements(history(&[
                (5000, 0, "2019-11-01T13:15:33.035Z"),
                (3400, 0, "2019-11-30T09:48:16.867Z"),
                (-150, 0, "2019-12-25T06:04:23.907Z"),
                (-790, 0, "2020-01-25T14:18:46.235Z"),
                (-3210, 0, "2020-02-05T16:33:06.386Z"),
                (-1000, 0, "2020-04-10T14:43:26.374Z"),
                (8500, 0, "2020-06-25T18:49:59.371Z"),
                (-30, 0, "2020-07-26T12:01:20.894Z"),
            ])),
    ]
}

/// Load accounts from a JSON array in the demo-account shape
///
/// Read once at startup; the store is never written back.
pub fn load_accounts(path: &Path) -> Result<Vec<Account>> {
    let content = std::fs::read_to_string(path)?;
    let accounts: Vec<Account> = serde_json::from_str(&content)?;
    Ok(accounts)
}
