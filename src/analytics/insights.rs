use rust_decimal::{Decimal, RoundingStrategy};

use super::aggregate::percent_of;
use crate::models::{BudgetComparison, BudgetStatus, DashboardStats, InsightKind, SpendingInsight};

pub(crate) const MAX_INSIGHTS: usize = 4;
/// Share of total expenses above which the top category is called out.
const CONCENTRATION_PERCENT: Decimal = Decimal::from_parts(40, 0, 0, false, 0);
/// Month-over-month expense growth factor that triggers a warning (1.2 = +20%).
const SPENDING_JUMP_FACTOR: Decimal = Decimal::from_parts(12, 0, 0, false, 1);

/// Derive up to four advisory messages from the dashboard and this month's budgets.
///
/// Insights keep their generation order; the list is cut after the fourth.
pub(crate) fn generate(
    stats: &DashboardStats,
    comparisons: &[BudgetComparison],
) -> Vec<SpendingInsight> {
    let mut insights = Vec::new();

    let over: Vec<&str> = names_with_status(comparisons, BudgetStatus::Over);
    if !over.is_empty() {
        let noun = if over.len() == 1 { "category" } else { "categories" };
        insights.push(insight(
            InsightKind::Warning,
            "Budget Exceeded",
            format!(
                "You've exceeded your budget in {} {noun}: {}.",
                over.len(),
                over.join(", ")
            ),
            "Review spending in these categories",
        ));
    }

    let near: Vec<&str> = names_with_status(comparisons, BudgetStatus::Near);
    if !near.is_empty() {
        insights.push(insight(
            InsightKind::Tip,
            "Approaching Budget Limit",
            format!("You're near your budget limit in {}.", near.join(", ")),
            "Monitor these categories closely",
        ));
    }

    if let Some(top) = stats.category_breakdown.first() {
        if top.percentage > CONCENTRATION_PERCENT {
            insights.push(insight(
                InsightKind::Tip,
                "High Concentration in One Category",
                format!(
                    "{} accounts for {:.1}% of your expenses.",
                    top.category,
                    one_decimal(top.percentage)
                ),
                "Consider diversifying your spending or reviewing this category",
            ));
        }
    }

    if stats.net_amount < Decimal::ZERO {
        insights.push(insight(
            InsightKind::Warning,
            "Spending Exceeds Income",
            format!(
                "Your total expenses exceed income by ${}.",
                whole_dollars(stats.net_amount.abs())
            ),
            "Consider reducing expenses or increasing income",
        ));
    } else if stats.net_amount > Decimal::ZERO {
        insights.push(insight(
            InsightKind::Success,
            "Positive Balance",
            format!(
                "Great job! You have a positive balance of ${}.",
                whole_dollars(stats.net_amount)
            ),
            "Consider saving or investing this surplus",
        ));
    }

    if let [.., previous, last] = stats.monthly_data.as_slice() {
        let threshold = previous.expenses.checked_mul(SPENDING_JUMP_FACTOR);
        if threshold.is_some_and(|t| last.expenses > t) {
            let growth = if previous.expenses.is_zero() {
                Decimal::ONE_HUNDRED
            } else {
                percent_of(last.expenses.saturating_sub(previous.expenses), previous.expenses)
            };
            insights.push(insight(
                InsightKind::Warning,
                "Increased Spending",
                format!(
                    "Your expenses increased by {:.1}% last month.",
                    one_decimal(growth)
                ),
                "Review recent transactions for unusual spending",
            ));
        }
    }

    if insights.is_empty() {
        insights.push(insight(
            InsightKind::Tip,
            "Stay on Track",
            "Your finances look healthy! Keep tracking your expenses and reviewing your budgets regularly.".into(),
            "Consider setting new financial goals",
        ));
    }

    insights.truncate(MAX_INSIGHTS);
    insights
}

fn names_with_status(comparisons: &[BudgetComparison], status: BudgetStatus) -> Vec<&str> {
    comparisons
        .iter()
        .filter(|c| c.status == status)
        .map(|c| c.category.as_str())
        .collect()
}

fn insight(kind: InsightKind, title: &str, description: String, action: &str) -> SpendingInsight {
    SpendingInsight {
        kind,
        title: title.to_string(),
        description,
        action: Some(action.to_string()),
    }
}

fn one_decimal(val: Decimal) -> Decimal {
    val.round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero)
}

fn whole_dollars(val: Decimal) -> Decimal {
    val.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}
