//! View projector - display aggregates derived from account state
//!
//! Read-only. Projecting the same account twice without a mutation in
//! between yields identical bundles.

use std::iter::FusedIterator;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::domain::{Account, MovementKind, MovementRow, SortOrder, ViewBundle};
use crate::ports::Formatter;

const MS_PER_DAY: f64 = 86_400_000.0;

/// Whole days between two instants, rounded, direction ignored
pub fn days_between(a: DateTime<Utc>, b: DateTime<Utc>) -> i64 {
    let ms = (a - b).num_milliseconds().abs() as f64;
    (ms / MS_PER_DAY).round() as i64
}

/// Relative label for recent dates, locale date for everything older
pub fn date_label(
    date: DateTime<Utc>,
    now: DateTime<Utc>,
    locale: &str,
    formatter: &dyn Formatter,
) -> String {
    match days_between(now, date) {
        0 => "Today".to_string(),
        1 => "Yesterday".to_string(),
        n if n <= 7 => format!("{n} days ago"),
        _ => formatter.format_date(date, locale),
    }
}

// Aggregates saturate at the `Decimal` bounds rather than panic; the ledger
// keeps balances in range, but income and outflow can each exceed it.

pub fn total_income(account: &Account) -> Decimal {
    account
        .movements()
        .iter()
        .filter(|mov| **mov > Decimal::ZERO)
        .fold(Decimal::ZERO, |total, mov| total.saturating_add(*mov))
}

/// Summed withdrawals as a positive number
pub fn total_outflow(account: &Account) -> Decimal {
    account
        .movements()
        .iter()
        .filter(|mov| **mov < Decimal::ZERO)
        .fold(Decimal::ZERO, |total, mov| total.saturating_sub(*mov))
}

/// Interest on every deposit at the account rate; zero when there are none
pub fn total_interest(account: &Account) -> Decimal {
    let rate = account.interest_rate / Decimal::ONE_HUNDRED;
    account
        .movements()
        .iter()
        .filter(|mov| **mov > Decimal::ZERO)
        .map(|deposit| deposit.checked_mul(rate).unwrap_or(Decimal::MAX))
        .fold(Decimal::ZERO, |total, interest| total.saturating_add(interest))
}

/// Lazy, restartable walk over an account's movements
///
/// Each call to [`movements_view`] returns an independent iterator. Rows are
/// produced in the requested order; `position` is always counted from the
/// oldest movement.
pub struct MovementsView<'a> {
    account: &'a Account,
    formatter: &'a dyn Formatter,
    now: DateTime<Utc>,
    order: SortOrder,
    front: usize,
    back: usize,
}

pub fn movements_view<'a>(
    account: &'a Account,
    order: SortOrder,
    now: DateTime<Utc>,
    formatter: &'a dyn Formatter,
) -> MovementsView<'a> {
    MovementsView {
        account,
        formatter,
        now,
        order,
        front: 0,
        back: account.movements().len(),
    }
}

impl MovementsView<'_> {
    fn row(&self, index: usize) -> MovementRow {
        let amount = self.account.movements()[index];
        let date = self.account.movement_dates()[index];
        MovementRow {
            position: index + 1,
            kind: MovementKind::of(amount),
            date,
            date_label: date_label(date, self.now, &self.account.locale, self.formatter),
            amount,
        }
    }
}

impl Iterator for MovementsView<'_> {
    type Item = MovementRow;

    fn next(&mut self) -> Option<MovementRow> {
        if self.front >= self.back {
            return None;
        }
        let index = match self.order {
            SortOrder::Chronological => {
                self.front += 1;
                self.front - 1
            }
            SortOrder::ReverseChronological => {
                self.back -= 1;
                self.back
            }
        };
        Some(self.row(index))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.back - self.front;
        (len, Some(len))
    }
}

impl ExactSizeIterator for MovementsView<'_> {}

impl FusedIterator for MovementsView<'_> {}

/// Builds the bundle handed to the renderer
#[derive(Clone, Copy)]
pub struct ViewProjector<'a> {
    formatter: &'a dyn Formatter,
}

impl<'a> ViewProjector<'a> {
    pub fn new(formatter: &'a dyn Formatter) -> Self {
        Self { formatter }
    }

    /// Project the whole view
    ///
    /// The list is newest-first for chronological order and oldest-first
    /// for reverse-chronological order: each chronological row goes on top
    /// of the one before it, as on the original screen.
    pub fn project(&self, account: &Account, order: SortOrder, now: DateTime<Utc>) -> ViewBundle {
        let mut movements: Vec<MovementRow> =
            movements_view(account, order, now, self.formatter).collect();
        movements.reverse();

        ViewBundle {
            owner: account.owner.clone(),
            username: account.username.clone(),
            currency: account.currency.clone(),
            locale: account.locale.clone(),
            as_of: now,
            balance: account.balance(),
            total_income: total_income(account),
            total_outflow: total_outflow(account),
            total_interest: total_interest(account),
            order,
            movements,
        }
    }
}
