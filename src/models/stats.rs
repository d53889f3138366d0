//! Read models recomputed on every request. None of these are persisted.

use rust_decimal::Decimal;
use serde::Serialize;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct DashboardStats {
    pub total_expenses: Decimal,
    pub total_income: Decimal,
    pub net_amount: Decimal,
    pub transaction_count: usize,
    pub category_breakdown: Vec<CategoryBreakdown>,
    pub monthly_data: Vec<MonthlyData>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CategoryBreakdown {
    pub category: String,
    pub amount: Decimal,
    pub percentage: Decimal,
    pub color: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct MonthlyData {
    /// Format: "YYYY-MM"
    pub month: String,
    pub expenses: Decimal,
    pub income: Decimal,
    pub net: Decimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum BudgetStatus {
    Under,
    Near,
    Over,
}

impl BudgetStatus {
    pub(crate) fn label(&self) -> &'static str {
        match self {
            Self::Under => "On track",
            Self::Near => "Near limit",
            Self::Over => "Over budget",
        }
    }
}

impl std::fmt::Display for BudgetStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Under => write!(f, "under"),
            Self::Near => write!(f, "near"),
            Self::Over => write!(f, "over"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct BudgetComparison {
    pub category: String,
    pub budgeted: Decimal,
    pub spent: Decimal,
    pub remaining: Decimal,
    /// Raw `spent / budgeted * 100`; may exceed 100.
    pub percentage: Decimal,
    pub status: BudgetStatus,
}

impl BudgetComparison {
    /// Percentage for progress bars, capped at 100.
    pub(crate) fn display_percentage(&self) -> Decimal {
        self.percentage.min(Decimal::ONE_HUNDRED)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum InsightKind {
    Warning,
    Tip,
    Success,
}

impl std::fmt::Display for InsightKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Warning => write!(f, "warning"),
            Self::Tip => write!(f, "tip"),
            Self::Success => write!(f, "success"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub(crate) struct SpendingInsight {
    #[serde(rename = "type")]
    pub kind: InsightKind,
    pub title: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
}
