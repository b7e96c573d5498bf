//! Locale formatter - a small built-in table of number and date conventions
//!
//! Covers the locales the demo accounts use plus a few common ones. Unknown
//! locales fall back to en-US separators and ISO dates; unknown currencies
//! are shown by their code.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::ports::Formatter;

#[derive(Debug, Clone, Copy)]
struct LocaleRules {
    group: &'static str,
    decimal: &'static str,
    symbol_first: bool,
    date_format: &'static str,
}

const EN_US: LocaleRules = LocaleRules {
    group: ",",
    decimal: ".",
    symbol_first: true,
    date_format: "%-m/%-d/%Y",
};

fn rules_for(locale: &str) -> LocaleRules {
    let lang = locale.split(['-', '_']).next().unwrap_or_default().to_lowercase();
    match (lang.as_str(), locale) {
        (_, "en-US") => EN_US,
        ("en", _) => LocaleRules {
            date_format: "%d/%m/%Y",
            ..EN_US
        },
        ("pt", _) | ("fr", _) => LocaleRules {
            group: "\u{a0}",
            decimal: ",",
            symbol_first: false,
            date_format: "%d/%m/%Y",
        },
        ("de", _) | ("es", _) | ("it", _) => LocaleRules {
            group: ".",
            decimal: ",",
            symbol_first: false,
            date_format: "%d.%m.%Y",
        },
        _ => LocaleRules {
            date_format: "%Y-%m-%d",
            ..EN_US
        },
    }
}

fn currency_symbol(currency: &str) -> &str {
    match currency {
        "USD" => "$",
        "EUR" => "€",
        "GBP" => "£",
        "JPY" => "¥",
        other => other,
    }
}

/// Group the integer digits in threes
fn group_digits(digits: &str, separator: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push_str(separator);
        }
        out.push(ch);
    }
    out
}

/// Built-in [`Formatter`] used by the CLI
#[derive(Debug, Default, Clone, Copy)]
pub struct LocaleFormatter;

impl LocaleFormatter {
    /// Format a plain number with locale separators and two decimals
    pub fn format_number(&self, amount: Decimal, locale: &str) -> String {
        let rules = rules_for(locale);
        let fixed = format!("{:.2}", amount.abs().round_dp(2));
        let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
        let sign = if amount.round_dp(2).is_sign_negative() && !amount.round_dp(2).is_zero() {
            "-"
        } else {
            ""
        };
        format!(
            "{sign}{}{}{frac_part}",
            group_digits(int_part, rules.group),
            rules.decimal
        )
    }
}

impl Formatter for LocaleFormatter {
    fn format_currency(&self, amount: Decimal, locale: &str, currency: &str) -> String {
        let rules = rules_for(locale);
        let number = self.format_number(amount, locale);
        let symbol = currency_symbol(currency);
        if rules.symbol_first {
            match number.strip_prefix('-') {
                Some(unsigned) => format!("-{symbol}{unsigned}"),
                None => format!("{symbol}{number}"),
            }
        } else {
            format!("{number}\u{a0}{symbol}")
        }
    }

    fn format_date(&self, date: DateTime<Utc>, locale: &str) -> String {
        date.format(rules_for(locale).date_format).to_string()
    }

    fn format_datetime(&self, date: DateTime<Utc>, locale: &str) -> String {
        format!(
            "{}, {}",
            self.format_date(date, locale),
            date.format("%H:%M")
        )
    }
}
