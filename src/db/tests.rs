#![allow(clippy::unwrap_used)]

use super::*;
use rust_decimal_macros::dec;

fn expense(amount: Decimal, date: &str, category: &str) -> ValidTransaction {
    ValidTransaction {
        amount,
        date: date.into(),
        description: "Test purchase".into(),
        category: category.into(),
        kind: TransactionKind::Expense,
    }
}

fn income(amount: Decimal, date: &str) -> ValidTransaction {
    ValidTransaction {
        amount,
        date: date.into(),
        description: "Paycheck".into(),
        category: INCOME_CATEGORY.into(),
        kind: TransactionKind::Income,
    }
}

fn budget(category: &str, amount: Decimal, month: &str) -> ValidBudget {
    ValidBudget {
        category: category.into(),
        amount,
        month: month.into(),
    }
}

// ── Schema ────────────────────────────────────────────────────

#[test]
fn test_open_creates_schema_version() {
    let db = Database::open_in_memory().unwrap();
    let version: i32 = db
        .conn
        .query_row("SELECT version FROM schema_version", [], |r| r.get(0))
        .unwrap();
    assert_eq!(version, schema::CURRENT_VERSION);
}

#[test]
fn test_reopen_file_database_keeps_data() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("spendlens.db");
    {
        let mut db = Database::open(&path).unwrap();
        db.insert_transaction(&expense(dec!(12.50), "2024-01-02", "Travel"))
            .unwrap();
    }
    let db = Database::open(&path).unwrap();
    assert_eq!(db.get_transaction_count().unwrap(), 1);
}

// ── Transactions ──────────────────────────────────────────────

#[test]
fn test_insert_assigns_id_and_timestamp() {
    let mut db = Database::open_in_memory().unwrap();
    let t = db
        .insert_transaction(&expense(dec!(42.10), "2024-03-04", "Shopping"))
        .unwrap();
    assert!(t.id > 0);
    assert!(!t.created_at.is_empty());

    let fetched = db.get_transaction(t.id).unwrap().unwrap();
    assert_eq!(fetched, t);
    assert_eq!(fetched.amount, dec!(42.10));
}

#[test]
fn test_decimal_precision_survives_storage() {
    let mut db = Database::open_in_memory().unwrap();
    let t = db
        .insert_transaction(&expense(dec!(0.1), "2024-03-04", "Food"))
        .unwrap();
    db.insert_transaction(&expense(dec!(0.2), "2024-03-05", "Food"))
        .unwrap();
    assert_eq!(db.get_transaction(t.id).unwrap().unwrap().amount, dec!(0.1));
    assert_eq!(db.spent_for("Food", "2024-03").unwrap(), dec!(0.3));
}

#[test]
fn test_list_ordered_newest_first() {
    let mut db = Database::open_in_memory().unwrap();
    let a = db
        .insert_transaction(&expense(dec!(1), "2024-01-10", "Food"))
        .unwrap();
    let b = db
        .insert_transaction(&expense(dec!(2), "2024-02-01", "Food"))
        .unwrap();
    let c = db
        .insert_transaction(&expense(dec!(3), "2024-01-10", "Food"))
        .unwrap();

    let ids: Vec<i64> = db
        .get_all_transactions()
        .unwrap()
        .iter()
        .map(|t| t.id)
        .collect();
    assert_eq!(ids, vec![b.id, c.id, a.id]);
}

#[test]
fn test_filter_by_month_and_search() {
    let mut db = Database::open_in_memory().unwrap();
    db.insert_transaction(&expense(dec!(1), "2024-01-31", "Food"))
        .unwrap();
    db.insert_transaction(&expense(dec!(2), "2024-02-01", "Travel"))
        .unwrap();
    db.insert_transaction(&income(dec!(3), "2024-02-15")).unwrap();

    let feb = db
        .get_transactions(&TransactionFilter {
            month: Some("2024-02".into()),
            ..Default::default()
        })
        .unwrap();
    assert_eq!(feb.len(), 2);

    let travel = db
        .get_transactions(&TransactionFilter {
            search: Some("trav".into()),
            ..Default::default()
        })
        .unwrap();
    assert_eq!(travel.len(), 1);
    assert_eq!(travel[0].category, "Travel");

    let limited = db
        .get_transactions(&TransactionFilter {
            limit: Some(1),
            ..Default::default()
        })
        .unwrap();
    assert_eq!(limited.len(), 1);
    assert_eq!(limited[0].date, "2024-02-15");
}

#[test]
fn test_search_wildcards_match_literally() {
    let mut db = Database::open_in_memory().unwrap();
    db.insert_transaction(&expense(dec!(4), "2024-03-01", "Food"))
        .unwrap();
    let mut promo = expense(dec!(9), "2024-03-02", "Shopping");
    promo.description = "50% off_sale".into();
    db.insert_transaction(&promo).unwrap();

    for needle in ["_", "%", "0% o", "f_s"] {
        let found = db
            .get_transactions(&TransactionFilter {
                search: Some(needle.into()),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(found.len(), 1, "search {needle:?}");
        assert_eq!(found[0].description, "50% off_sale");
    }

    let none = db
        .get_transactions(&TransactionFilter {
            month: Some("2024_03".into()),
            ..Default::default()
        })
        .unwrap();
    assert!(none.is_empty());
}

#[test]
fn test_update_transaction_replaces_fields_and_keeps_created_at() {
    let mut db = Database::open_in_memory().unwrap();
    let t = db
        .insert_transaction(&expense(dec!(10), "2024-01-01", "Food"))
        .unwrap();
    let updated = db
        .update_transaction(t.id, &income(dec!(99), "2024-01-02"))
        .unwrap();
    assert_eq!(updated.id, t.id);
    assert_eq!(updated.kind, TransactionKind::Income);
    assert_eq!(updated.created_at, t.created_at);
    assert_eq!(db.get_transaction(t.id).unwrap().unwrap(), updated);
}

#[test]
fn test_update_missing_transaction_is_not_found() {
    let mut db = Database::open_in_memory().unwrap();
    let err = db
        .update_transaction(999, &expense(dec!(1), "2024-01-01", "Food"))
        .unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));
    assert_eq!(err.to_string(), "Transaction not found");
}

#[test]
fn test_delete_returns_removed_record() {
    let mut db = Database::open_in_memory().unwrap();
    let t = db
        .insert_transaction(&expense(dec!(10), "2024-01-01", "Food"))
        .unwrap();
    let removed = db.delete_transaction(t.id).unwrap();
    assert_eq!(removed, t);
    assert!(db.get_transaction(t.id).unwrap().is_none());

    let err = db.delete_transaction(t.id).unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));
}

#[test]
fn test_batch_insert_is_atomic() {
    let mut db = Database::open_in_memory().unwrap();
    let batch = vec![
        expense(dec!(1), "2024-01-01", "Food"),
        income(dec!(2), "2024-01-02"),
    ];
    assert_eq!(db.insert_transactions_batch(&batch).unwrap(), 2);
    assert_eq!(db.get_transaction_count().unwrap(), 2);
}

// ── Budgets ───────────────────────────────────────────────────

#[test]
fn test_budget_spent_computed_at_creation() {
    let mut db = Database::open_in_memory().unwrap();
    db.insert_transaction(&expense(dec!(300), "2024-01-05", "Food & Dining"))
        .unwrap();
    db.insert_transaction(&expense(dec!(200), "2024-01-31", "Food & Dining"))
        .unwrap();
    // Outside the month, other category, and income all excluded
    db.insert_transaction(&expense(dec!(75), "2024-02-01", "Food & Dining"))
        .unwrap();
    db.insert_transaction(&expense(dec!(60), "2024-01-10", "Travel"))
        .unwrap();
    db.insert_transaction(&income(dec!(1000), "2024-01-15")).unwrap();

    let b = db
        .insert_budget(&budget("Food & Dining", dec!(400), "2024-01"))
        .unwrap();
    assert_eq!(b.spent, dec!(500));

    let cmp = crate::analytics::aggregate::compare_budget(&b);
    assert_eq!(cmp.remaining, dec!(-100));
    assert_eq!(cmp.status, BudgetStatus::Over);
}

#[test]
fn test_budget_spent_follows_transaction_writes() {
    let mut db = Database::open_in_memory().unwrap();
    let b = db
        .insert_budget(&budget("Travel", dec!(100), "2024-03"))
        .unwrap();
    assert_eq!(b.spent, Decimal::ZERO);

    let t = db
        .insert_transaction(&expense(dec!(40), "2024-03-12", "Travel"))
        .unwrap();
    assert_eq!(db.get_budget(b.id).unwrap().unwrap().spent, dec!(40));

    // Moving the transaction out of the month clears it from the budget
    db.update_transaction(t.id, &expense(dec!(40), "2024-04-01", "Travel"))
        .unwrap();
    assert_eq!(db.get_budget(b.id).unwrap().unwrap().spent, Decimal::ZERO);

    db.update_transaction(t.id, &expense(dec!(55), "2024-03-31", "Travel"))
        .unwrap();
    assert_eq!(db.get_budget(b.id).unwrap().unwrap().spent, dec!(55));

    db.delete_transaction(t.id).unwrap();
    assert_eq!(db.get_budget(b.id).unwrap().unwrap().spent, Decimal::ZERO);
}

#[test]
fn test_duplicate_budget_conflicts() {
    let mut db = Database::open_in_memory().unwrap();
    db.insert_budget(&budget("Food", dec!(100), "2024-01"))
        .unwrap();
    let err = db
        .insert_budget(&budget("Food", dec!(250), "2024-01"))
        .unwrap_err();
    assert!(matches!(err, Error::Conflict(_)));
    assert_eq!(
        err.to_string(),
        "Budget already exists for this category and month"
    );
    // Same category in another month is fine
    db.insert_budget(&budget("Food", dec!(100), "2024-02"))
        .unwrap();
}

#[test]
fn test_duplicate_budget_across_connections_has_one_winner_in_either_order() {
    for second_goes_first in [true, false] {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("race.db");
        let mut first = Database::open(&path).unwrap();
        let mut second = Database::open(&path).unwrap();

        let (a, b) = if second_goes_first {
            let a = second.insert_budget(&budget("Housing", dec!(900), "2024-05"));
            let b = first.insert_budget(&budget("Housing", dec!(950), "2024-05"));
            (a, b)
        } else {
            let b = first.insert_budget(&budget("Housing", dec!(950), "2024-05"));
            let a = second.insert_budget(&budget("Housing", dec!(900), "2024-05"));
            (a, b)
        };

        let results = [a, b];
        let wins = results.iter().filter(|r| r.is_ok()).count();
        let conflicts = results
            .iter()
            .filter(|r| matches!(r, Err(Error::Conflict(_))))
            .count();
        assert_eq!((wins, conflicts), (1, 1), "second_goes_first={second_goes_first}");

        let stored = first.get_budgets(Some("2024-05")).unwrap();
        assert_eq!(stored.len(), 1);
        let expected = if second_goes_first { dec!(900) } else { dec!(950) };
        assert_eq!(stored[0].amount, expected);
    }
}

#[test]
fn test_update_budget_excludes_itself_from_conflict() {
    let mut db = Database::open_in_memory().unwrap();
    let food = db
        .insert_budget(&budget("Food", dec!(100), "2024-01"))
        .unwrap();
    let travel = db
        .insert_budget(&budget("Travel", dec!(100), "2024-01"))
        .unwrap();

    let updated = db
        .update_budget(food.id, &budget("Food", dec!(300), "2024-01"))
        .unwrap();
    assert_eq!(updated.amount, dec!(300));

    let err = db
        .update_budget(travel.id, &budget("Food", dec!(100), "2024-01"))
        .unwrap_err();
    assert!(matches!(err, Error::Conflict(_)));
}

#[test]
fn test_update_budget_recomputes_spent() {
    let mut db = Database::open_in_memory().unwrap();
    db.insert_transaction(&expense(dec!(80), "2024-02-10", "Food"))
        .unwrap();
    let b = db
        .insert_budget(&budget("Food", dec!(100), "2024-01"))
        .unwrap();
    assert_eq!(b.spent, Decimal::ZERO);
    let moved = db
        .update_budget(b.id, &budget("Food", dec!(100), "2024-02"))
        .unwrap();
    assert_eq!(moved.spent, dec!(80));
}

#[test]
fn test_update_and_delete_missing_budget() {
    let mut db = Database::open_in_memory().unwrap();
    let err = db
        .update_budget(7, &budget("Food", dec!(1), "2024-01"))
        .unwrap_err();
    assert_eq!(err.to_string(), "Budget not found");
    assert!(matches!(db.delete_budget(7), Err(Error::NotFound(_))));
}

#[test]
fn test_delete_budget_returns_record() {
    let mut db = Database::open_in_memory().unwrap();
    let b = db
        .insert_budget(&budget("Food", dec!(100), "2024-01"))
        .unwrap();
    assert_eq!(db.delete_budget(b.id).unwrap(), b);
    assert!(db.get_budgets(None).unwrap().is_empty());
}

#[test]
fn test_budgets_ordered_by_month_desc_then_category() {
    let mut db = Database::open_in_memory().unwrap();
    db.insert_budget(&budget("Travel", dec!(1), "2024-01"))
        .unwrap();
    db.insert_budget(&budget("Food", dec!(1), "2024-02"))
        .unwrap();
    db.insert_budget(&budget("Education", dec!(1), "2024-01"))
        .unwrap();

    let keys: Vec<(String, String)> = db
        .get_budgets(None)
        .unwrap()
        .into_iter()
        .map(|b| (b.month, b.category))
        .collect();
    assert_eq!(
        keys,
        vec![
            ("2024-02".to_string(), "Food".to_string()),
            ("2024-01".to_string(), "Education".to_string()),
            ("2024-01".to_string(), "Travel".to_string()),
        ]
    );
    assert_eq!(db.get_budgets(Some("2024-01")).unwrap().len(), 2);
}

#[test]
fn test_spent_for_unknown_month_is_zero() {
    let db = Database::open_in_memory().unwrap();
    assert_eq!(db.spent_for("Food", "not-a-month").unwrap(), Decimal::ZERO);
}
