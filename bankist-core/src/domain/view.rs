//! Display-ready aggregates derived from an account

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use super::MovementKind;

/// Order in which the movement list is produced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    #[default]
    Chronological,
    ReverseChronological,
}

impl SortOrder {
    pub fn toggled(self) -> Self {
        match self {
            Self::Chronological => Self::ReverseChronological,
            Self::ReverseChronological => Self::Chronological,
        }
    }
}

/// One line of the movement list
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MovementRow {
    /// 1-based, counted from the oldest movement whatever the display order
    pub position: usize,
    pub kind: MovementKind,
    pub date: DateTime<Utc>,
    /// "Today", "Yesterday", "N days ago" or a locale date
    pub date_label: String,
    pub amount: Decimal,
}

/// Everything the renderer needs to redraw an authenticated account
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewBundle {
    pub owner: String,
    pub username: String,
    pub currency: String,
    pub locale: String,
    pub as_of: DateTime<Utc>,
    pub balance: Decimal,
    pub total_income: Decimal,
    /// Absolute value of the summed withdrawals
    pub total_outflow: Decimal,
    pub total_interest: Decimal,
    pub order: SortOrder,
    /// Rows in display order, top of the list first
    pub movements: Vec<MovementRow>,
}
