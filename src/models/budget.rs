use chrono::{Months, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Budget {
    pub id: i64,
    pub category: String,
    pub amount: Decimal,
    /// Format: "YYYY-MM"
    pub month: String,
    /// Expense total for (category, month) as of the last write that touched it.
    pub spent: Decimal,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub(crate) struct BudgetInput {
    pub amount: Option<Decimal>,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub month: String,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ValidBudget {
    pub category: String,
    pub amount: Decimal,
    pub month: String,
}

impl BudgetInput {
    pub(crate) fn validate(&self) -> Result<ValidBudget> {
        let amount = super::transaction::validate_amount(self.amount)?;

        let category = self.category.trim();
        let month = self.month.trim();
        if category.is_empty() || month.is_empty() {
            return Err(Error::validation("Category and month are required"));
        }
        if !is_valid_month(month) {
            return Err(Error::validation("Month must be in YYYY-MM format"));
        }

        Ok(ValidBudget {
            category: category.to_string(),
            amount,
            month: month.to_string(),
        })
    }
}

/// Strict `YYYY-MM`: chrono alone would also accept "2024-1" or "+2024-01".
pub(crate) fn is_valid_month(month: &str) -> bool {
    let bytes = month.as_bytes();
    bytes.len() == 7
        && bytes[4] == b'-'
        && bytes.iter().enumerate().all(|(i, b)| i == 4 || b.is_ascii_digit())
        && month_bounds(month).is_some()
}

/// Half-open date range `[first day, first day of next month)` for a `YYYY-MM` key.
pub(crate) fn month_bounds(month: &str) -> Option<(NaiveDate, NaiveDate)> {
    let start = NaiveDate::parse_from_str(&format!("{month}-01"), "%Y-%m-%d").ok()?;
    let end = start.checked_add_months(Months::new(1))?;
    Some((start, end))
}
