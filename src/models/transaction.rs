use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

pub(crate) const MAX_DESCRIPTION_LEN: usize = 200;

/// Largest accepted amount (10^15). Keeps every sum and ratio the
/// analytics take well inside `Decimal`'s range.
pub(crate) const MAX_AMOUNT: Decimal = Decimal::from_parts(2_764_472_320, 232_830, 0, false, 0);

/// Shared amount rule for transactions and budgets.
pub(crate) fn validate_amount(amount: Option<Decimal>) -> Result<Decimal> {
    match amount {
        Some(a) if a <= Decimal::ZERO => Err(Error::validation("Amount must be greater than 0")),
        Some(a) if a > MAX_AMOUNT => Err(Error::validation(format!(
            "Amount must be at most {MAX_AMOUNT}"
        ))),
        Some(a) => Ok(a),
        None => Err(Error::validation("Amount must be greater than 0")),
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum TransactionKind {
    #[default]
    Expense,
    Income,
}

impl TransactionKind {
    pub(crate) fn as_str(&self) -> &'static str {
        match self {
            Self::Expense => "expense",
            Self::Income => "income",
        }
    }

    pub(crate) fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "expense" | "exp" | "e" => Some(Self::Expense),
            "income" | "inc" | "i" => Some(Self::Income),
            _ => None,
        }
    }
}

impl std::fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Transaction {
    pub id: i64,
    pub amount: Decimal,
    /// Format: "YYYY-MM-DD"
    pub date: String,
    pub description: String,
    pub category: String,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    pub created_at: String,
}

impl Transaction {
    pub(crate) fn is_income(&self) -> bool {
        self.kind == TransactionKind::Income
    }

    pub(crate) fn is_expense(&self) -> bool {
        self.kind == TransactionKind::Expense
    }

    /// The `YYYY-MM` bucket this transaction falls into.
    pub(crate) fn month_key(&self) -> &str {
        self.date.get(..7).unwrap_or(&self.date)
    }
}

/// Request body for creating or replacing a transaction.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub(crate) struct TransactionInput {
    pub amount: Option<Decimal>,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: String,
    #[serde(rename = "type", default)]
    pub kind: Option<TransactionKind>,
}

/// A transaction that passed validation and is ready to be written.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ValidTransaction {
    pub amount: Decimal,
    pub date: String,
    pub description: String,
    pub category: String,
    pub kind: TransactionKind,
}

impl ValidTransaction {
    pub(crate) fn month_key(&self) -> &str {
        self.date.get(..7).unwrap_or(&self.date)
    }
}

impl TransactionInput {
    pub(crate) fn validate(&self) -> Result<ValidTransaction> {
        let amount = validate_amount(self.amount)?;

        let description = self.description.trim();
        let date = self.date.trim();
        let category = self.category.trim();
        if date.is_empty() || description.is_empty() || category.is_empty() {
            return Err(Error::validation("All fields are required"));
        }

        let parsed = NaiveDate::parse_from_str(date, "%Y-%m-%d")
            .map_err(|_| Error::validation("Date must be a valid YYYY-MM-DD date"))?;

        if description.chars().count() > MAX_DESCRIPTION_LEN {
            return Err(Error::validation(format!(
                "Description must be at most {MAX_DESCRIPTION_LEN} characters"
            )));
        }

        Ok(ValidTransaction {
            amount,
            date: parsed.format("%Y-%m-%d").to_string(),
            description: description.to_string(),
            category: category.to_string(),
            kind: self.kind.unwrap_or_default(),
        })
    }
}

impl From<&Transaction> for TransactionInput {
    fn from(txn: &Transaction) -> Self {
        Self {
            amount: Some(txn.amount),
            date: txn.date.clone(),
            description: txn.description.clone(),
            category: txn.category.clone(),
            kind: Some(txn.kind),
        }
    }
}
