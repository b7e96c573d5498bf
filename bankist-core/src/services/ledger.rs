//! Ledger operations - transfer, loan, close
//!
//! Every operation is atomic: it either applies completely or returns a
//! rejection and leaves the store untouched.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use tracing::{debug, info};

use crate::domain::result::{Error, Result};
use crate::domain::{exact_add, Account, Pin};
use crate::services::AccountStore;

/// Parse a raw amount field. Blank or non-numeric input is a rejection.
pub fn parse_amount(input: &str) -> Result<Decimal> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(Error::rejected("amount is empty"));
    }
    Decimal::from_str(trimmed).map_err(|_| Error::rejected("amount is not a number"))
}

/// Business rules for movements between and onto accounts
#[derive(Debug, Clone)]
pub struct LedgerService {
    /// A loan needs one existing movement of at least `amount * ratio`
    loan_min_movement_ratio: Decimal,
}

impl Default for LedgerService {
    fn default() -> Self {
        Self::new(Decimal::new(1, 1))
    }
}

impl LedgerService {
    pub fn new(loan_min_movement_ratio: Decimal) -> Self {
        Self {
            loan_min_movement_ratio,
        }
    }

    /// Move `amount` from `sender` to `receiver`
    ///
    /// Rejected when the amount is not positive, the sender's fresh balance
    /// is too low, the receiver is unknown or both are the same account, and
    /// when either new balance would not be exact.
    pub fn record_transfer(
        &self,
        store: &mut AccountStore,
        sender: &str,
        receiver: &str,
        amount: Decimal,
        at: DateTime<Utc>,
    ) -> Result<()> {
        if amount <= Decimal::ZERO {
            return Err(Error::rejected("transfer amount must be positive"));
        }
        if sender == receiver {
            return Err(Error::rejected("cannot transfer to the same account"));
        }
        if store.find_by_username(receiver).is_none() {
            return Err(Error::not_found(format!("receiver {receiver}")));
        }
        let (from, to) = store
            .pair_mut(sender, receiver)
            .ok_or_else(|| Error::not_found(format!("sender {sender}")))?;
        let sender_balance = from
            .checked_balance()
            .ok_or_else(|| Error::rejected("sender balance out of range"))?;
        if sender_balance < amount {
            return Err(Error::rejected("insufficient balance"));
        }
        if exact_add(sender_balance, -amount).is_none() {
            return Err(Error::rejected("sender balance would lose precision"));
        }
        if to.checked_balance().and_then(|b| exact_add(b, amount)).is_none() {
            debug!(%receiver, %amount, "transfer refused: receiver balance out of range");
            return Err(Error::rejected("receiver balance out of range"));
        }

        from.record(-amount, at);
        to.record(amount, at);
        info!(%sender, %receiver, %amount, "transfer recorded");
        Ok(())
    }

    /// Validate a loan request and return the amount that would be granted
    ///
    /// The request is floor-truncated to a whole number first. The account
    /// must already show one movement of at least 10% of that amount, and
    /// the balance after the loan must still be exact.
    pub fn check_loan(&self, account: &Account, requested: Decimal) -> Result<Decimal> {
        let amount = requested.floor();
        if amount <= Decimal::ZERO {
            return Err(Error::rejected("loan amount must be positive"));
        }
        let threshold = amount
            .checked_mul(self.loan_min_movement_ratio)
            .ok_or_else(|| Error::rejected("loan amount out of range"))?;
        if !account.movements().iter().any(|mov| *mov >= threshold) {
            debug!(username = %account.username, %amount, "loan refused: no qualifying movement");
            return Err(Error::rejected("no movement large enough to back the loan"));
        }
        Self::balance_after(account, amount)?;
        Ok(amount)
    }

    fn balance_after(account: &Account, amount: Decimal) -> Result<Decimal> {
        account
            .checked_balance()
            .and_then(|balance| exact_add(balance, amount))
            .ok_or_else(|| {
                debug!(username = %account.username, %amount, "balance would leave decimal range");
                Error::rejected("balance out of range")
            })
    }

    /// Append an approved loan to the account
    ///
    /// The range check runs again because the balance may have grown since
    /// the loan was approved.
    pub fn commit_loan(
        &self,
        store: &mut AccountStore,
        username: &str,
        amount: Decimal,
        at: DateTime<Utc>,
    ) -> Result<()> {
        let account = store
            .find_by_username_mut(username)
            .ok_or_else(|| Error::not_found(format!("account {username}")))?;
        Self::balance_after(account, amount)?;
        account.record(amount, at);
        info!(%username, %amount, "loan committed");
        Ok(())
    }

    /// Close the active account if both credentials match it exactly
    pub fn close_account(
        &self,
        store: &mut AccountStore,
        active: &str,
        username: &str,
        pin: Option<Pin>,
    ) -> Result<Account> {
        let account = store
            .find_by_username(active)
            .ok_or_else(|| Error::not_found(format!("account {active}")))?;
        if username != account.username || pin != Some(account.pin) {
            return Err(Error::rejected("close credentials do not match"));
        }
        let removed = store.remove_by_username(active)?;
        info!(username = %active, remaining = store.len(), "account closed");
        Ok(removed)
    }
}
