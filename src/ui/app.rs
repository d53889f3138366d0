use anyhow::Result;
use chrono::Local;

use super::form::TransactionForm;
use crate::analytics::{self, insights};
use crate::db::{Database, TransactionFilter};
use crate::models::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Screen {
    Dashboard,
    Transactions,
    Budgets,
    Categories,
}

impl Screen {
    pub(crate) fn all() -> &'static [Screen] {
        &[
            Self::Dashboard,
            Self::Transactions,
            Self::Budgets,
            Self::Categories,
        ]
    }
}

impl std::fmt::Display for Screen {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Dashboard => write!(f, "Dashboard"),
            Self::Transactions => write!(f, "Transactions"),
            Self::Budgets => write!(f, "Budgets"),
            Self::Categories => write!(f, "Categories"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum InputMode {
    Normal,
    Command,
    Search,
    Form,
    Confirm,
}

impl std::fmt::Display for InputMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Normal => write!(f, "NORMAL"),
            Self::Command => write!(f, "COMMAND"),
            Self::Search => write!(f, "SEARCH"),
            Self::Form => write!(f, "FORM"),
            Self::Confirm => write!(f, "CONFIRM"),
        }
    }
}

/// Pending action that requires user confirmation.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum PendingAction {
    DeleteTransaction { id: i64, description: String },
    DeleteBudget { id: i64, name: String },
}

/// All TUI state. Owned by the event loop and passed down by `&mut`.
pub(crate) struct App {
    pub(crate) running: bool,
    pub(crate) screen: Screen,
    pub(crate) input_mode: InputMode,
    pub(crate) command_input: String,
    pub(crate) search_input: String,
    pub(crate) status_message: String,
    pub(crate) show_help: bool,
    /// Month used for budget comparison and the optional transaction filter.
    pub(crate) current_month: String,

    // Dashboard
    pub(crate) stats: DashboardStats,
    pub(crate) comparisons: Vec<BudgetComparison>,
    pub(crate) insights: Vec<SpendingInsight>,

    // Transactions
    pub(crate) transactions: Vec<Transaction>,
    pub(crate) transaction_index: usize,
    pub(crate) transaction_scroll: usize,
    pub(crate) filter_by_month: bool,
    pub(crate) transaction_count: i64,
    pub(crate) form: Option<TransactionForm>,

    // Budgets
    pub(crate) budgets: Vec<Budget>,
    pub(crate) budget_index: usize,

    // Categories
    pub(crate) category_index: usize,

    // Confirmation
    pub(crate) pending_action: Option<PendingAction>,
    pub(crate) confirm_message: String,

    // Layout (updated each render frame)
    pub(crate) visible_rows: usize,
}

impl App {
    pub(crate) fn new() -> Self {
        Self {
            running: true,
            screen: Screen::Dashboard,
            input_mode: InputMode::Normal,
            command_input: String::new(),
            search_input: String::new(),
            status_message: String::new(),
            show_help: false,
            current_month: analytics::current_month(),

            stats: DashboardStats::default(),
            comparisons: Vec::new(),
            insights: Vec::new(),

            transactions: Vec::new(),
            transaction_index: 0,
            transaction_scroll: 0,
            filter_by_month: false,
            transaction_count: 0,
            form: None,

            budgets: Vec::new(),
            budget_index: 0,

            category_index: 0,

            pending_action: None,
            confirm_message: String::new(),

            visible_rows: 20,
        }
    }

    /// Dashboard figures are all-time and the Budgets screen follows
    /// `current_month`. Insights always judge the calendar month, matching
    /// the `/insights` endpoint.
    pub(crate) fn refresh_dashboard(&mut self, db: &Database) -> Result<()> {
        let all = db.get_all_transactions()?;
        self.stats = analytics::dashboard_stats(&all);
        self.transaction_count = all.len() as i64;
        self.refresh_budgets(db)?;
        let this_month = analytics::compare_budgets(&self.budgets, &analytics::current_month());
        self.insights = insights::generate(&self.stats, &this_month);
        Ok(())
    }

    pub(crate) fn refresh_transactions(&mut self, db: &Database) -> Result<()> {
        let filter = TransactionFilter {
            month: self.filter_by_month.then(|| self.current_month.clone()),
            search: (!self.search_input.is_empty()).then(|| self.search_input.clone()),
            limit: None,
        };
        self.transactions = db.get_transactions(&filter)?;
        self.transaction_count = db.get_transaction_count()?;
        if self.transaction_index >= self.transactions.len() {
            self.transaction_index = self.transactions.len().saturating_sub(1);
        }
        Ok(())
    }

    pub(crate) fn refresh_budgets(&mut self, db: &Database) -> Result<()> {
        self.budgets = db.get_budgets(None)?;
        self.comparisons = analytics::compare_budgets(&self.budgets, &self.current_month);
        if self.budget_index >= self.budgets.len() {
            self.budget_index = self.budgets.len().saturating_sub(1);
        }
        Ok(())
    }

    pub(crate) fn refresh_all(&mut self, db: &Database) -> Result<()> {
        self.refresh_dashboard(db)?; // also refreshes budgets
        self.refresh_transactions(db)?;
        Ok(())
    }

    pub(crate) fn selected_transaction(&self) -> Option<&Transaction> {
        self.transactions.get(self.transaction_index)
    }

    pub(crate) fn selected_budget(&self) -> Option<&Budget> {
        self.budgets.get(self.budget_index)
    }

    /// All-time expense total for a registry category.
    pub(crate) fn category_total(&self, name: &str) -> rust_decimal::Decimal {
        self.stats
            .category_breakdown
            .iter()
            .find(|b| b.category == name)
            .map_or(rust_decimal::Decimal::ZERO, |b| b.amount)
    }

    pub(crate) fn today() -> String {
        Local::now().format("%Y-%m-%d").to_string()
    }

    pub(crate) fn set_status(&mut self, msg: impl Into<String>) {
        self.status_message = msg.into();
    }
}
