//! Account domain model

use std::fmt;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::movement::exact_add;

/// Numeric login credential
///
/// PINs are numbers. Raw input is converted once, at the login/close
/// boundary, with [`Pin::parse`]; there is no loose string/number comparison.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Pin(u32);

impl Pin {
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Parse user input into a PIN: surrounding whitespace is ignored,
    /// anything that is not an unsigned integer is rejected
    pub fn parse(input: &str) -> Option<Self> {
        input.trim().parse::<u32>().ok().map(Self)
    }
}

// PINs never end up in logs or terminal output
impl fmt::Display for Pin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("****")
    }
}

impl fmt::Debug for Pin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Pin(****)")
    }
}

/// A bank account held in the in-memory store
///
/// `movements` and `movement_dates` are parallel: index `i` of both describes
/// the same transaction. They are private and only grow together through
/// [`Account::record`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub owner: String,
    /// Derived from `owner` when the store is built
    #[serde(default, skip_deserializing)]
    pub username: String,
    movements: Vec<Decimal>,
    movements_dates: Vec<DateTime<Utc>>,
    /// Interest rate in percent
    pub interest_rate: Decimal,
    #[serde(skip_serializing)]
    pub pin: Pin,
    /// ISO 4217 currency code, normalized to uppercase
    pub currency: String,
    pub locale: String,
}

impl Account {
    /// Create an account with an empty history
    pub fn new(
        owner: impl Into<String>,
        pin: Pin,
        interest_rate: Decimal,
        currency: &str,
        locale: impl Into<String>,
    ) -> Self {
        let owner = owner.into();
        Self {
            username: derive_username(&owner),
            owner,
            movements: Vec::new(),
            movements_dates: Vec::new(),
            interest_rate,
            pin,
            currency: Self::normalize_currency(currency),
            locale: locale.into(),
        }
    }

    /// Builder-style history seeding, used for demo data and tests
    pub fn with_movements(
        mut self,
        history: impl IntoIterator<Item = (Decimal, DateTime<Utc>)>,
    ) -> Self {
        for (amount, at) in history {
            self.record(amount, at);
        }
        self
    }

    /// Append one movement and its timestamp
    pub fn record(&mut self, amount: Decimal, at: DateTime<Utc>) {
        self.movements.push(amount);
        self.movements_dates.push(at);
    }

    pub fn movements(&self) -> &[Decimal] {
        &self.movements
    }

    pub fn movement_dates(&self) -> &[DateTime<Utc>] {
        &self.movements_dates
    }

    /// Current balance, always summed fresh from the history
    ///
    /// Saturates instead of panicking; the store only holds accounts whose
    /// [`Account::checked_balance`] is exact.
    pub fn balance(&self) -> Decimal {
        self.movements
            .iter()
            .fold(Decimal::ZERO, |total, mov| total.saturating_add(*mov))
    }

    /// Exact balance, or `None` when the history does not fit in a `Decimal`
    pub fn checked_balance(&self) -> Option<Decimal> {
        self.movements
            .iter()
            .try_fold(Decimal::ZERO, |total, mov| exact_add(total, *mov))
    }

    /// First token of the owner name, for greetings
    pub fn first_name(&self) -> &str {
        self.owner.split_whitespace().next().unwrap_or(&self.owner)
    }

    /// Normalize currency code to uppercase
    pub fn normalize_currency(currency: &str) -> String {
        currency.trim().to_uppercase()
    }

    /// Validate account data
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.owner.trim().is_empty() {
            return Err("owner cannot be empty");
        }
        if self.currency.trim().is_empty() {
            return Err("currency cannot be empty");
        }
        if self.movements.len() != self.movements_dates.len() {
            return Err("every movement needs exactly one date");
        }
        if self.interest_rate < Decimal::ZERO || self.interest_rate > Decimal::ONE_HUNDRED {
            return Err("interest rate must be between 0 and 100");
        }
        if self.checked_balance().is_none() {
            return Err("balance does not fit in a decimal");
        }
        Ok(())
    }
}

/// Derive a login username: lowercased initials of the owner's name
///
/// `"Ahmed Mamdoh"` becomes `"am"`.
pub fn derive_username(owner: &str) -> String {
    owner
        .to_lowercase()
        .split_whitespace()
        .filter_map(|token| token.chars().next())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 2, day, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_derive_username() {
        assert_eq!(derive_username("Ahmed Mamdoh"), "am");
        assert_eq!(derive_username("Abdullah walid"), "aw");
        assert_eq!(derive_username("  Jonas   Schmedtmann "), "js");
        assert_eq!(derive_username("Sarah Jane Smith"), "sjs");
    }

    #[test]
    fn test_pin_parse() {
        assert_eq!(Pin::parse("1111"), Some(Pin::new(1111)));
        assert_eq!(Pin::parse(" 2222 "), Some(Pin::new(2222)));
        assert_eq!(Pin::parse(""), None);
        assert_eq!(Pin::parse("12a4"), None);
        assert_eq!(Pin::parse("-1"), None);
    }

    #[test]
    fn test_pin_is_masked() {
        assert_eq!(Pin::new(1111).to_string(), "****");
        assert!(!format!("{}", Pin::new(4321)).contains("4321"));
    }

    #[test]
    fn test_record_keeps_histories_parallel() {
        let mut account = Account::new("Test Owner", Pin::new(1), Decimal::ONE, "eur", "pt-PT");
        account.record(Decimal::new(200, 0), at(1));
        account.record(Decimal::new(-50, 0), at(2));

        assert_eq!(account.movements().len(), account.movement_dates().len());
        assert_eq!(account.balance(), Decimal::new(150, 0));
        assert_eq!(account.currency, "EUR");
        assert_eq!(account.username, "to");
        assert_eq!(account.first_name(), "Test");
    }

    #[test]
    fn test_account_validation() {
        let mut account = Account::new("Test Owner", Pin::new(1), Decimal::ONE, "USD", "en-US");
        assert!(account.validate().is_ok());

        account.interest_rate = Decimal::new(101, 0);
        assert!(account.validate().is_err());

        account.interest_rate = Decimal::ONE;
        account.owner = "".to_string();
        assert!(account.validate().is_err());
    }

    #[test]
    fn test_checked_balance() {
        let mut account = Account::new("Test Owner", Pin::new(1), Decimal::ONE, "EUR", "pt-PT")
            .with_movements([(Decimal::new(200, 0), at(1)), (Decimal::new(-50, 0), at(2))]);
        assert_eq!(account.checked_balance(), Some(Decimal::new(150, 0)));

        account.record(Decimal::MAX, at(3));
        assert_eq!(account.checked_balance(), None);
        assert_eq!(account.balance(), Decimal::MAX);
        assert!(account.validate().is_err());
    }

    #[test]
    fn test_pin_debug_is_masked() {
        let account = Account::new("Test Owner", Pin::new(4321), Decimal::ONE, "EUR", "pt-PT");
        assert_eq!(format!("{:?}", Pin::new(4321)), "Pin(****)");
        assert!(!format!("{account:?}").contains("4321"));
    }

    #[test]
    fn test_deserialize_seed_shape() {
        let json = r#"{
            "owner": "Ahmed Mamdoh",
            "movements": [200, 455.23],
            "movementsDates": ["2020-11-18T21:31:17.178Z", "2020-12-23T07:42:02.383Z"],
            "interestRate": 1.2,
            "pin": 1111,
            "currency": "EUR",
            "locale": "pt-PT"
        }"#;
        let account: Account = serde_json::from_str(json).unwrap();

        assert_eq!(account.movements(), &[Decimal::new(200, 0), Decimal::new(45523, 2)]);
        assert_eq!(account.pin, Pin::new(1111));
        // username is derived by the store, not read from input
        assert!(account.username.is_empty());
        assert!(account.validate().is_ok());
    }

    #[test]
    fn test_deserialize_rejects_mismatched_histories() {
        let json = r#"{
            "owner": "Ahmed Mamdoh",
            "movements": [200, 455.23],
            "movementsDates": ["2020-11-18T21:31:17.178Z"],
            "interestRate": 1.2,
            "pin": 1111,
            "currency": "EUR",
            "locale": "pt-PT"
        }"#;
        let account: Account = serde_json::from_str(json).unwrap();
        assert!(account.validate().is_err());
    }
}
