use anyhow::{Context, Result};
use std::path::Path;

use crate::analytics::{self, insights};
use crate::api::Api;
use crate::db::{Database, TransactionFilter};
use crate::models::{BudgetInput, Category, TransactionInput, TransactionKind, INCOME_CATEGORY};
use crate::transfer;

pub(crate) fn as_cli(args: &[String], db: &mut Database) -> Result<()> {
    match args[1].as_str() {
        "summary" | "s" => cli_summary(&args[2..], db),
        "add" => cli_add(&args[2..], db),
        "list" | "ls" => cli_list(&args[2..], db),
        "delete" | "rm" => cli_delete(&args[2..], db),
        "budget" => cli_budget(&args[2..], db),
        "budgets" => cli_budgets(&args[2..], db),
        "categories" => {
            cli_categories();
            Ok(())
        }
        "export" => cli_export(&args[2..], db),
        "import" => cli_import(&args[2..], db),
        "api" => cli_api(&args[2..], db),
        "--help" | "-h" | "help" => {
            print_usage();
            Ok(())
        }
        "--version" | "-V" | "version" => {
            println!("spendlens {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        other => {
            print_usage();
            anyhow::bail!("Unknown command: {other}");
        }
    }
}

fn print_usage() {
    println!("SpendLens - local-first personal finance tracker");
    println!();
    println!("Usage: spendlens [command]");
    println!();
    println!("Commands:");
    println!("  (none)                              Launch interactive TUI");
    println!("  summary [YYYY-MM]                   Totals, budgets and insights");
    println!("  add <type> <amount> <date> <category> <description>");
    println!("                                      Record an expense or income transaction");
    println!("  list                                List transactions, newest first");
    println!("    --month <YYYY-MM>                 Only this month");
    println!("    --search <text>                   Match description or category");
    println!("    --limit <n>                       At most n rows");
    println!("  delete <id>                         Delete a transaction");
    println!("  budget <category> <amount> [month]  Set a monthly budget (default: current)");
    println!("  budgets [YYYY-MM]                   Budget vs. spent for a month");
    println!("  categories                          List the category registry");
    println!("  export [path]                       Export transactions to CSV");
    println!("    --month <YYYY-MM>                 Only this month");
    println!("  import <file.csv>                   Import transactions from CSV");
    println!("  api <METHOD> <PATH> [JSON]          Call a JSON endpoint, e.g. api GET /api/dashboard");
    println!("  --help, -h                          Show this help");
    println!("  --version, -V                       Show version");
}

/// Value following `--name`, if present.
fn flag<'a>(args: &'a [String], name: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == name)
        .map(|w| w[1].as_str())
}

/// Arguments that are neither flags nor flag values.
fn positional(args: &[String]) -> Vec<&str> {
    let mut out = Vec::new();
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            a if a.starts_with("--") => {
                iter.next();
            }
            a => out.push(a),
        }
    }
    out
}

fn cli_summary(args: &[String], db: &mut Database) -> Result<()> {
    let month = args
        .first()
        .filter(|a| !a.starts_with('-'))
        .cloned()
        .unwrap_or_else(analytics::current_month);

    let all = db.get_all_transactions()?;
    let stats = analytics::dashboard_stats(&all);
    let budgets = db.get_budgets(None)?;
    let comparisons = analytics::compare_budgets(&budgets, &month);
    let this_month = analytics::compare_budgets(&budgets, &analytics::current_month());
    let insights = insights::generate(&stats, &this_month);

    println!("SpendLens (all time)");
    println!("{}", "─".repeat(40));
    println!("  Income:     ${:.2}", stats.total_income);
    println!("  Expenses:   ${:.2}", stats.total_expenses);
    println!("  Net:        ${:.2}", stats.net_amount);
    println!("  Total Txns: {}", stats.transaction_count);

    if !stats.category_breakdown.is_empty() {
        println!();
        println!("Spending by Category:");
        for entry in &stats.category_breakdown {
            println!(
                "  {:<24} ${:>10.2}  {:>5}%",
                entry.category,
                entry.amount,
                entry.percentage.round_dp(1).to_string()
            );
        }
    }

    if !stats.monthly_data.is_empty() {
        println!();
        println!("Last {} Months:", stats.monthly_data.len());
        for m in &stats.monthly_data {
            println!(
                "  {}  income ${:>10.2}  expenses ${:>10.2}  net ${:>10.2}",
                m.month, m.income, m.expenses, m.net
            );
        }
    }

    if !comparisons.is_empty() {
        println!();
        println!("Budgets for {month}:");
        for cmp in &comparisons {
            println!(
                "  {:<24} ${:.2} / ${:.2}  {}",
                cmp.category,
                cmp.spent,
                cmp.budgeted,
                cmp.status.label()
            );
        }
    }

    println!();
    println!("Insights:");
    for insight in &insights {
        println!("  [{}] {}: {}", insight.kind, insight.title, insight.description);
    }

    Ok(())
}

fn cli_add(args: &[String], db: &mut Database) -> Result<()> {
    let [kind, amount, date, category, description @ ..] = args else {
        anyhow::bail!(
            "Usage: spendlens add <expense|income> <amount> <YYYY-MM-DD> <category> <description>"
        );
    };
    let kind = TransactionKind::parse(kind)
        .with_context(|| format!("Unknown type '{kind}', expected expense or income"))?;
    let category = Category::find_by_name(category)
        .map_or_else(|| category.clone(), |c| c.name.to_string());

    let input = TransactionInput {
        amount: transfer::parse_decimal(amount),
        date: date.clone(),
        description: description.join(" "),
        category,
        kind: Some(kind),
    };

    let txn = db.insert_transaction(&input.validate()?)?;
    println!(
        "Added #{}: {} {} ${:.2} ({}, {})",
        txn.id, txn.date, txn.kind, txn.amount, txn.category, txn.description
    );
    Ok(())
}

fn cli_list(args: &[String], db: &mut Database) -> Result<()> {
    let limit = flag(args, "--limit")
        .map(|n| n.parse::<u32>().context("--limit must be a number"))
        .transpose()?;
    let filter = TransactionFilter {
        month: flag(args, "--month").map(str::to_string),
        search: flag(args, "--search").map(str::to_string),
        limit,
    };

    let txns = db.get_transactions(&filter)?;
    if txns.is_empty() {
        println!("No transactions");
        return Ok(());
    }

    println!(
        "{:<5} {:<11} {:<8} {:>12}  {:<20} Description",
        "ID", "Date", "Type", "Amount", "Category"
    );
    println!("{}", "─".repeat(75));
    for txn in &txns {
        println!(
            "{:<5} {:<11} {:<8} {:>12.2}  {:<20} {}",
            txn.id,
            txn.date,
            txn.kind.as_str(),
            txn.amount,
            txn.category,
            txn.description
        );
    }
    Ok(())
}

fn cli_delete(args: &[String], db: &mut Database) -> Result<()> {
    let id: i64 = args
        .first()
        .context("Usage: spendlens delete <id>")?
        .parse()
        .context("Transaction id must be a number")?;
    let txn = db.delete_transaction(id)?;
    println!("Deleted #{}: {} ({})", txn.id, txn.description, txn.date);
    Ok(())
}

fn cli_budget(args: &[String], db: &mut Database) -> Result<()> {
    let [category, amount, rest @ ..] = args else {
        anyhow::bail!("Usage: spendlens budget <category> <amount> [YYYY-MM]");
    };
    let month = rest.first().cloned().unwrap_or_else(analytics::current_month);
    let category = Category::find_by_name(category)
        .map_or_else(|| category.clone(), |c| c.name.to_string());

    let valid = BudgetInput {
        amount: transfer::parse_decimal(amount),
        category,
        month,
    }
    .validate()?;

    let existing = db
        .get_budgets(Some(&valid.month))?
        .into_iter()
        .find(|b| b.category == valid.category);
    let budget = match existing {
        Some(b) => db.update_budget(b.id, &valid)?,
        None => db.insert_budget(&valid)?,
    };
    println!(
        "Budget #{}: {} ${:.2} for {} (spent ${:.2})",
        budget.id, budget.category, budget.amount, budget.month, budget.spent
    );
    Ok(())
}

fn cli_budgets(args: &[String], db: &mut Database) -> Result<()> {
    let month = args.first().cloned().unwrap_or_else(analytics::current_month);
    let comparisons = analytics::compare_budgets(&db.get_budgets(Some(&month))?, &month);
    if comparisons.is_empty() {
        println!("No budgets for {month}");
        return Ok(());
    }

    println!(
        "{:<22} {:>10} {:>10} {:>10} {:>7}  Status",
        "Category", "Budgeted", "Spent", "Remaining", "Used"
    );
    println!("{}", "─".repeat(75));
    for cmp in &comparisons {
        println!(
            "{:<22} {:>10.2} {:>10.2} {:>10.2} {:>6}%  {}",
            cmp.category,
            cmp.budgeted,
            cmp.spent,
            cmp.remaining,
            cmp.percentage.round_dp(1).to_string(),
            cmp.status.label()
        );
    }
    Ok(())
}

fn cli_categories() {
    println!("{:<20} {:<8} {:<9} Icon", "Name", "Type", "Color");
    println!("{}", "─".repeat(50));
    for cat in Category::all() {
        let kind = if cat.name == INCOME_CATEGORY {
            TransactionKind::Income
        } else {
            TransactionKind::Expense
        };
        println!("{:<20} {:<8} {:<9} {}", cat.name, kind.as_str(), cat.color, cat.icon);
    }
}

fn cli_export(args: &[String], db: &mut Database) -> Result<()> {
    let month = flag(args, "--month");

    // Output path is the first non-flag argument
    let output_path = positional(args)
        .first()
        .map(|a| super::shellexpand(a))
        .unwrap_or_else(|| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
            format!("{home}/spendlens-export-{}.csv", month.unwrap_or("all"))
        });

    let count = transfer::export_transactions(db, Path::new(&output_path), month)?;
    if count == 0 {
        println!("No transactions to export");
    } else {
        println!("Exported {count} transactions to {output_path}");
    }
    Ok(())
}

fn cli_import(args: &[String], db: &mut Database) -> Result<()> {
    let Some(file_path) = args.first() else {
        anyhow::bail!("Usage: spendlens import <file.csv>");
    };
    let path = super::shellexpand(file_path);
    if !Path::new(&path).exists() {
        anyhow::bail!("File not found: {path}");
    }

    let count = transfer::import_transactions(db, Path::new(&path))
        .with_context(|| format!("Failed to import {path}"))?;
    println!("Imported {count} transactions");
    Ok(())
}

fn cli_api(args: &[String], db: &mut Database) -> Result<()> {
    let [method, path, rest @ ..] = args else {
        anyhow::bail!("Usage: spendlens api <METHOD> <PATH> [JSON]");
    };
    let body = rest.first().map(String::as_str);

    let (status, value) = Api::new(db).dispatch(method, path, body);
    println!("{}", serde_json::to_string_pretty(&value)?);
    if value.get("success").and_then(|v| v.as_bool()) != Some(true) {
        anyhow::bail!("Request failed with status {status}");
    }
    Ok(())
}
