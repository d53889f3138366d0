mod budget;
mod category;
mod stats;
mod transaction;

pub(crate) use budget::{is_valid_month, month_bounds, Budget, BudgetInput, ValidBudget};
pub(crate) use category::{Category, INCOME_CATEGORY};
pub(crate) use stats::{
    BudgetComparison, BudgetStatus, CategoryBreakdown, DashboardStats, InsightKind, MonthlyData,
    SpendingInsight,
};
pub(crate) use transaction::{Transaction, TransactionInput, TransactionKind, ValidTransaction};

#[cfg(test)]
mod tests;
