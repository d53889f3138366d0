//! Pure reductions over the transaction and budget sets: dashboard totals,
//! category breakdown, monthly series, budget comparison, and insights.

pub(crate) mod aggregate;
pub(crate) mod insights;

pub(crate) use aggregate::{compare_budgets, current_month, dashboard_stats};
