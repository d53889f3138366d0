use std::collections::{BTreeMap, HashMap};

use rust_decimal::Decimal;

use crate::models::{
    Budget, BudgetComparison, BudgetStatus, Category, CategoryBreakdown, DashboardStats,
    MonthlyData, Transaction,
};

/// Number of trailing months kept in the monthly series.
pub(crate) const SERIES_MONTHS: usize = 6;
/// Percentage of a budget at which a category counts as near its limit.
pub(crate) const NEAR_LIMIT_PERCENT: Decimal = Decimal::from_parts(80, 0, 0, false, 0);
pub(crate) const OVER_LIMIT_PERCENT: Decimal = Decimal::ONE_HUNDRED;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct Totals {
    pub expenses: Decimal,
    pub income: Decimal,
    pub net: Decimal,
}

/// Sums saturate at `Decimal::MAX` rather than overflowing.
pub(crate) fn totals(transactions: &[Transaction]) -> Totals {
    let mut expenses = Decimal::ZERO;
    let mut income = Decimal::ZERO;
    for txn in transactions {
        if txn.is_expense() {
            expenses = expenses.saturating_add(txn.amount);
        } else {
            income = income.saturating_add(txn.amount);
        }
    }
    Totals {
        expenses,
        income,
        net: income.saturating_sub(expenses),
    }
}

/// Expense totals per category, largest first.
///
/// Categories with equal totals keep the order in which they were first seen.
pub(crate) fn category_breakdown(
    transactions: &[Transaction],
    total_expenses: Decimal,
) -> Vec<CategoryBreakdown> {
    let mut order: Vec<(String, Decimal)> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for txn in transactions.iter().filter(|t| t.is_expense()) {
        match index.get(txn.category.as_str()) {
            Some(&i) => order[i].1 = order[i].1.saturating_add(txn.amount),
            None => {
                index.insert(txn.category.as_str(), order.len());
                order.push((txn.category.clone(), txn.amount));
            }
        }
    }

    let mut breakdown: Vec<CategoryBreakdown> = order
        .into_iter()
        .map(|(category, amount)| CategoryBreakdown {
            percentage: percent_of(amount, total_expenses),
            color: Category::color_of(&category),
            category,
            amount,
        })
        .collect();
    // sort_by is stable
    breakdown.sort_by(|a, b| b.amount.cmp(&a.amount));
    breakdown
}

/// Income/expense/net per `YYYY-MM`, oldest first, limited to the last six months with data.
pub(crate) fn monthly_series(transactions: &[Transaction]) -> Vec<MonthlyData> {
    let mut months: BTreeMap<&str, (Decimal, Decimal)> = BTreeMap::new();
    for txn in transactions {
        let entry = months
            .entry(txn.month_key())
            .or_insert((Decimal::ZERO, Decimal::ZERO));
        if txn.is_expense() {
            entry.0 = entry.0.saturating_add(txn.amount);
        } else {
            entry.1 = entry.1.saturating_add(txn.amount);
        }
    }

    let skip = months.len().saturating_sub(SERIES_MONTHS);
    months
        .into_iter()
        .skip(skip)
        .map(|(month, (expenses, income))| MonthlyData {
            month: month.to_string(),
            expenses,
            income,
            net: income.saturating_sub(expenses),
        })
        .collect()
}

pub(crate) fn dashboard_stats(transactions: &[Transaction]) -> DashboardStats {
    let totals = totals(transactions);
    DashboardStats {
        total_expenses: totals.expenses,
        total_income: totals.income,
        net_amount: totals.net,
        transaction_count: transactions.len(),
        category_breakdown: category_breakdown(transactions, totals.expenses),
        monthly_data: monthly_series(transactions),
    }
}

/// Compare the budgets of `month` against their cached `spent` values.
pub(crate) fn compare_budgets(budgets: &[Budget], month: &str) -> Vec<BudgetComparison> {
    budgets
        .iter()
        .filter(|b| b.month == month)
        .map(compare_budget)
        .collect()
}

pub(crate) fn compare_budget(budget: &Budget) -> BudgetComparison {
    let percentage = percent_of(budget.spent, budget.amount);
    BudgetComparison {
        category: budget.category.clone(),
        budgeted: budget.amount,
        spent: budget.spent,
        remaining: budget.amount.saturating_sub(budget.spent),
        percentage,
        status: classify(percentage),
    }
}

pub(crate) fn classify(percentage: Decimal) -> BudgetStatus {
    if percentage >= OVER_LIMIT_PERCENT {
        BudgetStatus::Over
    } else if percentage >= NEAR_LIMIT_PERCENT {
        BudgetStatus::Near
    } else {
        BudgetStatus::Under
    }
}

/// `part / whole * 100`, or zero when `whole` is zero.
pub(crate) fn percent_of(part: Decimal, whole: Decimal) -> Decimal {
    part.checked_div(whole)
        .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
        .unwrap_or(Decimal::ZERO)
}

pub(crate) fn current_month() -> String {
    chrono::Local::now().format("%Y-%m").to_string()
}
