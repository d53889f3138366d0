#![allow(clippy::unwrap_used)]

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::*;
use crate::error::Error;

fn txn_input(amount: Option<Decimal>) -> TransactionInput {
    TransactionInput {
        amount,
        date: "2024-01-15".into(),
        description: "Groceries".into(),
        category: "Food & Dining".into(),
        kind: Some(TransactionKind::Expense),
    }
}

fn assert_validation(err: Error, expected: &str) {
    match err {
        Error::Validation(msg) => assert_eq!(msg, expected),
        other => panic!("expected validation error, got {other:?}"),
    }
}

// ── TransactionKind ───────────────────────────────────────────

#[test]
fn test_kind_parse() {
    assert_eq!(TransactionKind::parse("expense"), Some(TransactionKind::Expense));
    assert_eq!(TransactionKind::parse("INCOME"), Some(TransactionKind::Income));
    assert_eq!(TransactionKind::parse(" inc "), Some(TransactionKind::Income));
    assert_eq!(TransactionKind::parse("transfer"), None);
}

#[test]
fn test_kind_roundtrip() {
    for kind in [TransactionKind::Expense, TransactionKind::Income] {
        assert_eq!(TransactionKind::parse(kind.as_str()), Some(kind));
    }
}

#[test]
fn test_kind_defaults_to_expense() {
    assert_eq!(TransactionKind::default(), TransactionKind::Expense);
    let mut input = txn_input(Some(dec!(5)));
    input.kind = None;
    assert_eq!(input.validate().unwrap().kind, TransactionKind::Expense);
}

// ── TransactionInput ──────────────────────────────────────────

#[test]
fn test_transaction_validate_ok_trims_description() {
    let mut input = txn_input(Some(dec!(42.50)));
    input.description = "  Weekly shop  ".into();
    let valid = input.validate().unwrap();
    assert_eq!(valid.amount, dec!(42.50));
    assert_eq!(valid.description, "Weekly shop");
    assert_eq!(valid.month_key(), "2024-01");
}

#[test]
fn test_transaction_rejects_non_positive_amount() {
    for amount in [None, Some(Decimal::ZERO), Some(dec!(-3))] {
        let err = txn_input(amount).validate().unwrap_err();
        assert_validation(err, "Amount must be greater than 0");
    }
}

#[test]
fn test_transaction_amount_has_upper_bound() {
    use super::transaction::MAX_AMOUNT;
    assert_eq!(MAX_AMOUNT, dec!(1_000_000_000_000_000));
    assert!(txn_input(Some(MAX_AMOUNT)).validate().is_ok());
    for amount in [MAX_AMOUNT + dec!(0.01), Decimal::MAX] {
        let err = txn_input(Some(amount)).validate().unwrap_err();
        assert_validation(err, "Amount must be at most 1000000000000000");
    }
}

#[test]
fn test_transaction_rejects_missing_fields() {
    let mut blank_desc = txn_input(Some(dec!(1)));
    blank_desc.description = "   ".into();
    assert_validation(blank_desc.validate().unwrap_err(), "All fields are required");

    let mut no_date = txn_input(Some(dec!(1)));
    no_date.date.clear();
    assert_validation(no_date.validate().unwrap_err(), "All fields are required");

    let mut no_category = txn_input(Some(dec!(1)));
    no_category.category.clear();
    assert_validation(no_category.validate().unwrap_err(), "All fields are required");
}

#[test]
fn test_transaction_rejects_bad_date() {
    let mut input = txn_input(Some(dec!(1)));
    input.date = "2024-02-30".into();
    assert_validation(
        input.validate().unwrap_err(),
        "Date must be a valid YYYY-MM-DD date",
    );
}

#[test]
fn test_transaction_description_length_limit() {
    let mut input = txn_input(Some(dec!(1)));
    input.description = "x".repeat(200);
    assert!(input.validate().is_ok());

    input.description = "é".repeat(201);
    assert_validation(
        input.validate().unwrap_err(),
        "Description must be at most 200 characters",
    );
}

#[test]
fn test_transaction_input_from_json() {
    let input: TransactionInput = serde_json::from_str(
        r#"{"amount": 500, "date": "2024-01-05", "description": "Rent", "category": "Housing", "type": "expense"}"#,
    )
    .unwrap();
    assert_eq!(input.amount, Some(dec!(500)));
    assert_eq!(input.kind, Some(TransactionKind::Expense));

    let missing: TransactionInput = serde_json::from_str(r#"{"date": "2024-01-05"}"#).unwrap();
    assert!(missing.amount.is_none());
    assert!(missing.kind.is_none());
}

#[test]
fn test_transaction_serializes_wire_names() {
    let txn = Transaction {
        id: 7,
        amount: dec!(12.5),
        date: "2024-03-02".into(),
        description: "Bus".into(),
        category: "Transportation".into(),
        kind: TransactionKind::Expense,
        created_at: "2024-03-02T10:00:00Z".into(),
    };
    let json = serde_json::to_value(&txn).unwrap();
    assert_eq!(json["type"], "expense");
    assert_eq!(json["createdAt"], "2024-03-02T10:00:00Z");
    assert_eq!(json["amount"], 12.5);
    assert_eq!(txn.month_key(), "2024-03");
}

// ── BudgetInput ───────────────────────────────────────────────

#[test]
fn test_budget_validate() {
    let input = BudgetInput {
        amount: Some(dec!(400)),
        category: "Food & Dining".into(),
        month: "2024-01".into(),
    };
    let valid = input.validate().unwrap();
    assert_eq!(valid.amount, dec!(400));
    assert_eq!(valid.month, "2024-01");
}

#[test]
fn test_budget_validate_errors() {
    let zero = BudgetInput {
        amount: Some(Decimal::ZERO),
        category: "Food & Dining".into(),
        month: "2024-01".into(),
    };
    assert_validation(zero.validate().unwrap_err(), "Amount must be greater than 0");

    let huge = BudgetInput {
        amount: Some(Decimal::MAX),
        category: "Food & Dining".into(),
        month: "2024-01".into(),
    };
    assert_validation(huge.validate().unwrap_err(), "Amount must be at most 1000000000000000");

    let no_month = BudgetInput {
        amount: Some(dec!(10)),
        category: "Food & Dining".into(),
        month: String::new(),
    };
    assert_validation(no_month.validate().unwrap_err(), "Category and month are required");

    let bad_month = BudgetInput {
        amount: Some(dec!(10)),
        category: "Food & Dining".into(),
        month: "2024-13".into(),
    };
    assert_validation(bad_month.validate().unwrap_err(), "Month must be in YYYY-MM format");
}

#[test]
fn test_month_format() {
    assert!(is_valid_month("2024-01"));
    assert!(is_valid_month("1999-12"));
    assert!(!is_valid_month("2024-1"));
    assert!(!is_valid_month("2024-00"));
    assert!(!is_valid_month("24-01"));
    assert!(!is_valid_month("2024-01-01"));
    assert!(!is_valid_month("2024-13"));
    assert!(!is_valid_month("+202-01"));
    assert!(!is_valid_month("2024/01"));
    assert!(!is_valid_month("2024- 1"));
    assert!(!is_valid_month(""));
}

#[test]
fn test_month_bounds_exclusive_end() {
    let d = |y, m, day| NaiveDate::from_ymd_opt(y, m, day).unwrap();
    assert_eq!(month_bounds("2024-02"), Some((d(2024, 2, 1), d(2024, 3, 1))));
    assert_eq!(month_bounds("2024-12"), Some((d(2024, 12, 1), d(2025, 1, 1))));
    assert_eq!(month_bounds("2024-04"), Some((d(2024, 4, 1), d(2024, 5, 1))));
    assert_eq!(month_bounds("nope"), None);
}

// ── Category registry ─────────────────────────────────────────

#[test]
fn test_category_views_are_disjoint() {
    let expense: Vec<&str> = Category::expense_categories().map(|c| c.name).collect();
    let income: Vec<&str> = Category::income_categories().map(|c| c.name).collect();
    assert_eq!(income, vec![INCOME_CATEGORY]);
    assert!(!expense.contains(&INCOME_CATEGORY));
    assert_eq!(expense.len() + income.len(), Category::all().len());
}

#[test]
fn test_category_lookup() {
    assert_eq!(Category::find_by_name("food & dining").unwrap().name, "Food & Dining");
    assert!(Category::find_by_name("Crypto").is_none());
    assert_eq!(Category::color_of("Housing"), "#34495e");
    assert_eq!(Category::color_of("Crypto"), "#7f8c8d");
    assert_eq!(Category::icon_of("Travel"), "Plane");
    assert_eq!(Category::icon_of("Crypto"), "DollarSign");
}

#[test]
fn test_category_rgb() {
    let food = Category::find_by_name("Food & Dining").unwrap();
    assert_eq!(food.rgb(), (0xe7, 0x4c, 0x3c));
    assert_eq!(format!("{food}"), "Food & Dining");
}

// ── Read models ───────────────────────────────────────────────

#[test]
fn test_display_percentage_clamped() {
    let cmp = BudgetComparison {
        category: "Food & Dining".into(),
        budgeted: dec!(400),
        spent: dec!(500),
        remaining: dec!(-100),
        percentage: dec!(125),
        status: BudgetStatus::Over,
    };
    assert_eq!(cmp.display_percentage(), dec!(100));
    assert_eq!(cmp.percentage, dec!(125));
}

#[test]
fn test_insight_omits_missing_action() {
    let insight = SpendingInsight {
        kind: InsightKind::Tip,
        title: "t".into(),
        description: "d".into(),
        action: None,
    };
    let json = serde_json::to_value(&insight).unwrap();
    assert_eq!(json["type"], "tip");
    assert!(json.get("action").is_none());
}
