use std::collections::HashMap;
use std::path::Path;
use std::sync::LazyLock;

use super::app::{App, InputMode, PendingAction, Screen};
use super::form::TransactionForm;
use crate::db::Database;
use crate::models::{BudgetInput, Category};
use crate::transfer;

pub(crate) struct Command {
    pub(crate) description: &'static str,
    pub(crate) run: fn(&str, &mut App, &mut Database) -> anyhow::Result<()>,
}

macro_rules! register_command {
    ($name:expr, $desc:expr, $func:expr, $registry:expr) => {{
        $registry.insert(
            $name,
            Command {
                description: $desc,
                run: $func,
            },
        );
    }};
}

pub(crate) static COMMANDS: LazyLock<HashMap<&str, Command>> = LazyLock::new(|| {
    let mut r: HashMap<&str, Command> = HashMap::new();

    register_command!("q", "Quit SpendLens", cmd_quit, r);
    register_command!("quit", "Quit SpendLens", cmd_quit, r);
    register_command!("d", "Go to Dashboard", cmd_dashboard, r);
    register_command!("dashboard", "Go to Dashboard", cmd_dashboard, r);
    register_command!("t", "Go to Transactions", cmd_transactions, r);
    register_command!("transactions", "Go to Transactions", cmd_transactions, r);
    register_command!("b", "Go to Budgets", cmd_budgets, r);
    register_command!("budgets", "Go to Budgets", cmd_budgets, r);
    register_command!("c", "Go to Categories", cmd_categories, r);
    register_command!("categories", "Go to Categories", cmd_categories, r);
    register_command!("help", "Show available commands", cmd_help, r);
    register_command!("h", "Show available commands", cmd_help, r);
    register_command!("month", "Set month (e.g. :month 2024-01)", cmd_month, r);
    register_command!("m", "Set month (e.g. :m 2024-01)", cmd_month, r);
    register_command!("next-month", "Go to next month", cmd_next_month, r);
    register_command!("prev-month", "Go to previous month", cmd_prev_month, r);
    register_command!(
        "filter-month",
        "Toggle month filter on Transactions",
        cmd_filter_month,
        r
    );
    register_command!(
        "search",
        "Search transactions (e.g. :search coffee)",
        cmd_search,
        r
    );
    register_command!("s", "Search transactions (e.g. :s coffee)", cmd_search, r);
    register_command!("add", "Add a transaction", cmd_add, r);
    register_command!("a", "Add a transaction", cmd_add, r);
    register_command!("edit", "Edit selected transaction", cmd_edit, r);
    register_command!("e", "Edit selected transaction", cmd_edit, r);
    register_command!(
        "delete-txn",
        "Delete selected transaction",
        cmd_delete_txn,
        r
    );
    register_command!(
        "budget",
        "Set budget for the month (e.g. :budget Food & Dining 500)",
        cmd_budget,
        r
    );
    register_command!(
        "delete-budget",
        "Delete selected budget",
        cmd_delete_budget,
        r
    );
    register_command!(
        "export",
        "Export transactions to CSV (e.g. :export ~/spending.csv)",
        cmd_export,
        r
    );
    register_command!(
        "import",
        "Import transactions from CSV (e.g. :import ~/spending.csv)",
        cmd_import,
        r
    );

    r
});

pub(crate) fn handle_command(input: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    let trimmed = input.trim();
    let mut parts = trimmed.splitn(2, ' ');
    let cmd_name = parts.next().unwrap_or("");
    let args = parts.next().unwrap_or("").trim();

    if let Some(cmd) = COMMANDS.get(cmd_name) {
        (cmd.run)(args, app, db)?;
    } else {
        let suggestion = find_closest(cmd_name);
        app.set_status(format!(
            "Unknown command: :{cmd_name}. Did you mean :{suggestion}?"
        ));
    }

    Ok(())
}

pub(crate) fn find_closest(input: &str) -> String {
    COMMANDS
        .keys()
        .filter(|k| k.len() > 1) // skip single-letter aliases for suggestions
        .min_by_key(|k| (levenshtein(input, k), **k))
        .unwrap_or(&"help")
        .to_string()
}

pub(crate) fn levenshtein(a: &str, b: &str) -> usize {
    let (a, b) = (a.as_bytes(), b.as_bytes());
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];

    for i in 1..=a.len() {
        curr[0] = i;
        for j in 1..=b.len() {
            let cost = usize::from(a[i - 1] != b[j - 1]);
            curr[j] = (prev[j] + 1).min(curr[j - 1] + 1).min(prev[j - 1] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}

pub(crate) fn switch_screen(app: &mut App, db: &mut Database, screen: Screen) -> anyhow::Result<()> {
    app.screen = screen;
    match screen {
        Screen::Dashboard | Screen::Categories => app.refresh_dashboard(db)?,
        Screen::Transactions => app.refresh_transactions(db)?,
        Screen::Budgets => app.refresh_budgets(db)?,
    }
    Ok(())
}

// ── Command implementations ──────────────────────────────────

fn cmd_quit(_args: &str, app: &mut App, _db: &mut Database) -> anyhow::Result<()> {
    app.running = false;
    Ok(())
}

fn cmd_dashboard(_args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    switch_screen(app, db, Screen::Dashboard)
}

fn cmd_transactions(_args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    switch_screen(app, db, Screen::Transactions)
}

fn cmd_budgets(_args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    switch_screen(app, db, Screen::Budgets)
}

fn cmd_categories(_args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    switch_screen(app, db, Screen::Categories)
}

fn cmd_help(_args: &str, app: &mut App, _db: &mut Database) -> anyhow::Result<()> {
    app.show_help = true;
    Ok(())
}

fn cmd_month(args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    if args.is_empty() {
        set_month(app, db, crate::analytics::current_month())?;
        return Ok(());
    }

    // Accept "2024-01", "2024-1", "01", "1"
    let month = match args.split_once('-') {
        Some((year, m)) => format!("{year}-{m:0>2}"),
        None => format!("{}-{args:0>2}", app.current_month.get(..4).unwrap_or("1970")),
    };

    if crate::models::is_valid_month(&month) {
        set_month(app, db, month)?;
    } else {
        app.set_status("Invalid month format. Use YYYY-MM (e.g. 2024-01)");
    }
    Ok(())
}

fn cmd_next_month(_args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    advance_month(app, db, 1)
}

fn cmd_prev_month(_args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    advance_month(app, db, -1)
}

fn cmd_filter_month(_args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    app.filter_by_month = !app.filter_by_month;
    app.transaction_index = 0;
    app.transaction_scroll = 0;
    app.screen = Screen::Transactions;
    app.refresh_transactions(db)?;
    if app.filter_by_month {
        app.set_status(format!("Showing {}", app.current_month));
    } else {
        app.set_status("Showing all months");
    }
    Ok(())
}

fn cmd_search(args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    app.search_input = args.to_string();
    app.screen = Screen::Transactions;
    app.transaction_index = 0;
    app.transaction_scroll = 0;
    app.refresh_transactions(db)?;

    if args.is_empty() {
        app.set_status("Search cleared");
    } else {
        app.set_status(format!("Searching: {args}"));
    }

    Ok(())
}

fn cmd_add(_args: &str, app: &mut App, _db: &mut Database) -> anyhow::Result<()> {
    app.form = Some(TransactionForm::new(&App::today()));
    app.input_mode = InputMode::Form;
    app.set_status("Tab next field | ←/→ change choice | Enter save | Esc cancel");
    Ok(())
}

fn cmd_edit(_args: &str, app: &mut App, _db: &mut Database) -> anyhow::Result<()> {
    if app.screen != Screen::Transactions {
        app.set_status("Navigate to Transactions and select one first");
        return Ok(());
    }
    match app.selected_transaction().map(TransactionForm::from_transaction) {
        Some(form) => {
            app.form = Some(form);
            app.input_mode = InputMode::Form;
            app.set_status("Editing | Enter save | Esc cancel");
        }
        None => app.set_status("No transaction selected"),
    }
    Ok(())
}

fn cmd_delete_txn(_args: &str, app: &mut App, _db: &mut Database) -> anyhow::Result<()> {
    if app.screen != Screen::Transactions || app.transactions.is_empty() {
        app.set_status("Navigate to Transactions and select one first");
        return Ok(());
    }

    if let Some(txn) = app.selected_transaction() {
        let id = txn.id;
        let desc = txn.description.clone();
        app.confirm_message = format!("Delete '{desc}'?");
        app.pending_action = Some(PendingAction::DeleteTransaction {
            id,
            description: desc,
        });
        app.input_mode = InputMode::Confirm;
    }

    Ok(())
}

/// Create or replace the budget for a category in the current month.
fn cmd_budget(args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    // Last token is the amount, everything before is the category name
    let Some((category_name, amount_str)) = args.rsplit_once(' ') else {
        app.set_status("Usage: :budget <category_name> <amount>. Example: :budget Food & Dining 500");
        return Ok(());
    };

    let Some(category) = Category::find_by_name(category_name) else {
        app.set_status(format!("Category '{}' not found", category_name.trim()));
        return Ok(());
    };

    let input = BudgetInput {
        amount: transfer::parse_decimal(amount_str),
        category: category.name.to_string(),
        month: app.current_month.clone(),
    };
    let existing = app
        .budgets
        .iter()
        .find(|b| b.category == category.name && b.month == app.current_month)
        .map(|b| b.id);

    let result = input.validate().and_then(|valid| match existing {
        Some(id) => db.update_budget(id, &valid),
        None => db.insert_budget(&valid),
    });

    match result {
        Ok(budget) => {
            app.refresh_dashboard(db)?;
            app.screen = Screen::Budgets;
            app.set_status(format!(
                "Budget set: {} = ${} for {}",
                budget.category, budget.amount, budget.month
            ));
        }
        Err(e) if e.is_client_error() => app.set_status(e.to_string()),
        Err(e) => return Err(e.into()),
    }
    Ok(())
}

fn cmd_delete_budget(_args: &str, app: &mut App, _db: &mut Database) -> anyhow::Result<()> {
    if app.screen != Screen::Budgets {
        app.set_status("Navigate to Budgets and select one first");
        return Ok(());
    }

    match app.selected_budget() {
        Some(budget) => {
            let id = budget.id;
            let name = format!("{} ({})", budget.category, budget.month);
            app.confirm_message = format!("Delete budget for {name}?");
            app.pending_action = Some(PendingAction::DeleteBudget { id, name });
            app.input_mode = InputMode::Confirm;
        }
        None => app.set_status("No budgets to delete"),
    }

    Ok(())
}

fn cmd_export(args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    let month = app.filter_by_month.then(|| app.current_month.clone());
    let path = if args.is_empty() {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
        let suffix = month.as_deref().unwrap_or("all");
        format!("{home}/spendlens-export-{suffix}.csv")
    } else {
        crate::run::shellexpand(args)
    };

    let count = transfer::export_transactions(db, Path::new(&path), month.as_deref())?;
    if count == 0 {
        app.set_status("No transactions to export");
    } else {
        app.set_status(format!("Exported {count} transactions to {path}"));
    }
    Ok(())
}

fn cmd_import(args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    if args.is_empty() {
        app.set_status("Usage: :import <file.csv>");
        return Ok(());
    }
    let path = crate::run::shellexpand(args);

    match transfer::import_transactions(db, Path::new(&path)) {
        Ok(count) => {
            app.refresh_all(db)?;
            app.set_status(format!("Imported {count} transactions from {path}"));
        }
        Err(e) => app.set_status(format!("Import failed: {e}")),
    }
    Ok(())
}

fn set_month(app: &mut App, db: &mut Database, month: String) -> anyhow::Result<()> {
    app.set_status(format!("Month: {month}"));
    app.current_month = month;
    app.refresh_dashboard(db)?;
    if app.filter_by_month {
        app.refresh_transactions(db)?;
    }
    Ok(())
}

fn advance_month(app: &mut App, db: &mut Database, delta: i32) -> anyhow::Result<()> {
    if let Some((start, next)) = crate::models::month_bounds(&app.current_month) {
        let target = if delta > 0 {
            Some(next)
        } else {
            start.checked_sub_months(chrono::Months::new(1))
        };
        if let Some(d) = target {
            set_month(app, db, d.format("%Y-%m").to_string())?;
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "commands_tests.rs"]
mod tests;
