//! Movement classification

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Direction of a single movement
///
/// Positive amounts are deposits; everything else, zero included, is shown
/// as a withdrawal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MovementKind {
    Deposit,
    Withdrawal,
}

impl MovementKind {
    pub fn of(amount: Decimal) -> Self {
        if amount > Decimal::ZERO {
            Self::Deposit
        } else {
            Self::Withdrawal
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Deposit => "deposit",
            Self::Withdrawal => "withdrawal",
        }
    }
}

/// Add two amounts, or `None` when the sum overflows or would be rounded
///
/// `Decimal` keeps at most 28 significant digits and silently rounds past
/// that, which would lose cents on very large balances.
pub fn exact_add(a: Decimal, b: Decimal) -> Option<Decimal> {
    let sum = a.checked_add(b)?;
    (sum.checked_sub(a)? == b && sum.checked_sub(b)? == a).then_some(sum)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_add() {
        assert_eq!(
            exact_add(Decimal::new(200, 0), Decimal::new(45523, 2)),
            Some(Decimal::new(65523, 2))
        );
        assert_eq!(exact_add(Decimal::MAX, Decimal::ONE), None);
        // 28 integer digits leave no room for the cents
        let big = Decimal::from_str_exact("2777777777777777777777777000").unwrap();
        assert_eq!(exact_add(big, Decimal::new(5259, 2)), None);
    }

    #[test]
    fn test_kind_from_sign() {
        assert_eq!(MovementKind::of(Decimal::new(1, 2)), MovementKind::Deposit);
        assert_eq!(MovementKind::of(Decimal::new(-30650, 2)), MovementKind::Withdrawal);
        assert_eq!(MovementKind::of(Decimal::ZERO), MovementKind::Withdrawal);
    }
}
