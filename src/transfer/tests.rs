#![allow(clippy::unwrap_used)]

use super::*;
use rust_decimal_macros::dec;
use std::io::Write;

fn write_csv(dir: &tempfile::TempDir, name: &str, contents: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    let mut f = std::fs::File::create(&path).unwrap();
    f.write_all(contents.as_bytes()).unwrap();
    path
}

fn seed(db: &mut Database) {
    let rows = [
        ("2024-01-05", "Rent", "Housing", TransactionKind::Expense, dec!(1200)),
        ("2024-01-20", "Pay, January", "Income", TransactionKind::Income, dec!(3000)),
        ("2024-02-02", "Train", "Travel", TransactionKind::Expense, dec!(45.50)),
    ];
    for (date, description, category, kind, amount) in rows {
        db.insert_transaction(&ValidTransaction {
            amount,
            date: date.into(),
            description: description.into(),
            category: category.into(),
            kind,
        })
        .unwrap();
    }
}

#[test]
fn test_parse_decimal() {
    assert_eq!(parse_decimal("$1,234.56"), Some(dec!(1234.56)));
    assert_eq!(parse_decimal("  42 "), Some(dec!(42)));
    assert_eq!(parse_decimal("(12.00)"), Some(dec!(-12.00)));
    assert_eq!(parse_decimal(""), None);
    assert_eq!(parse_decimal("abc"), None);
}

#[test]
fn test_export_writes_header_and_rows() {
    let dir = tempfile::tempdir().unwrap();
    let mut db = Database::open_in_memory().unwrap();
    seed(&mut db);

    let path = dir.path().join("out.csv");
    assert_eq!(export_transactions(&db, &path, None).unwrap(), 3);

    let text = std::fs::read_to_string(&path).unwrap();
    let mut lines = text.lines();
    assert_eq!(lines.next(), Some("date,description,category,type,amount"));
    assert!(text.contains("\"Pay, January\""));
    assert_eq!(text.lines().count(), 4);
}

#[test]
fn test_export_single_month() {
    let dir = tempfile::tempdir().unwrap();
    let mut db = Database::open_in_memory().unwrap();
    seed(&mut db);

    let path = dir.path().join("feb.csv");
    assert_eq!(export_transactions(&db, &path, Some("2024-02")).unwrap(), 1);
}

#[test]
fn test_export_then_import_into_fresh_store() {
    let dir = tempfile::tempdir().unwrap();
    let mut source = Database::open_in_memory().unwrap();
    seed(&mut source);
    let path = dir.path().join("all.csv");
    export_transactions(&source, &path, None).unwrap();

    let mut target = Database::open_in_memory().unwrap();
    assert_eq!(import_transactions(&mut target, &path).unwrap(), 3);
    let stats = crate::analytics::dashboard_stats(&target.get_all_transactions().unwrap());
    assert_eq!(stats.total_income, dec!(3000));
    assert_eq!(stats.total_expenses, dec!(1245.50));
}

#[test]
fn test_import_accepts_reordered_columns_and_missing_type() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_csv(
        &dir,
        "in.csv",
        "Amount,Date,Category,Description\n\"$1,050.00\",2024-03-01,Housing,March rent\n",
    );
    let txns = read_transactions(&path).unwrap();
    assert_eq!(txns.len(), 1);
    assert_eq!(txns[0].amount, dec!(1050.00));
    assert_eq!(txns[0].kind, TransactionKind::Expense);
}

#[test]
fn test_import_rejects_whole_file_on_bad_row() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_csv(
        &dir,
        "bad.csv",
        "date,description,category,type,amount\n\
         2024-01-01,Lunch,Food & Dining,expense,12\n\
         2024-01-02,Refund,Shopping,expense,-5\n",
    );
    let mut db = Database::open_in_memory().unwrap();
    let err = import_transactions(&mut db, &path).unwrap_err();
    assert_eq!(err.to_string(), "Row 3: Amount must be greater than 0");
    assert_eq!(db.get_transaction_count().unwrap(), 0);
}

#[test]
fn test_import_unknown_type_and_missing_column() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_csv(
        &dir,
        "type.csv",
        "date,description,category,type,amount\n2024-01-01,Gift,Gifts & Donations,transfer,10\n",
    );
    let err = read_transactions(&path).unwrap_err();
    assert_eq!(err.to_string(), "Row 2: Unknown type 'transfer'");

    let path = write_csv(&dir, "cols.csv", "date,description,amount\n2024-01-01,x,1\n");
    let err = read_transactions(&path).unwrap_err();
    assert_eq!(err.to_string(), "Missing column: category");
}
