//! Formatting port - locale-aware strings

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

/// Turns amounts and dates into display strings
///
/// The core never formats money or dates itself; it treats these as
/// black boxes keyed by the account's locale and currency.
pub trait Formatter: Send + Sync {
    /// Format an amount as currency, e.g. `("en-US", "USD")` -> `$1,300.00`
    fn format_currency(&self, amount: Decimal, locale: &str, currency: &str) -> String;

    /// Format a calendar date for the locale
    fn format_date(&self, date: DateTime<Utc>, locale: &str) -> String;

    /// Format a date with hours and minutes for the locale
    fn format_datetime(&self, date: DateTime<Utc>, locale: &str) -> String;
}
