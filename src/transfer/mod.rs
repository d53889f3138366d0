//! CSV export and import in SpendLens's own column layout.

use rust_decimal::Decimal;
use std::path::Path;
use std::str::FromStr;
use tracing::{debug, info};

use crate::db::{Database, TransactionFilter};
use crate::error::{Error, Result};
use crate::models::{TransactionInput, TransactionKind, ValidTransaction};

pub(crate) const HEADER: [&str; 5] = ["date", "description", "category", "type", "amount"];

/// Write transactions (optionally one month) to `path`. Returns the row count.
pub(crate) fn export_transactions(
    db: &Database,
    path: &Path,
    month: Option<&str>,
) -> Result<usize> {
    let txns = db.get_transactions(&TransactionFilter {
        month: month.map(str::to_string),
        ..Default::default()
    })?;

    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(HEADER)?;
    for txn in &txns {
        let amount = txn.amount.to_string();
        writer.write_record([
            txn.date.as_str(),
            txn.description.as_str(),
            txn.category.as_str(),
            txn.kind.as_str(),
            amount.as_str(),
        ])?;
    }
    writer.flush()?;

    info!(count = txns.len(), path = %path.display(), "exported transactions");
    Ok(txns.len())
}

/// Column positions resolved from the header row.
struct Columns {
    date: usize,
    description: usize,
    category: usize,
    kind: Option<usize>,
    amount: usize,
}

impl Columns {
    fn from_headers(headers: &csv::StringRecord) -> Result<Self> {
        let find = |name: &str| {
            headers
                .iter()
                .position(|h| h.trim().eq_ignore_ascii_case(name))
        };
        let require = |name: &str| {
            find(name).ok_or_else(|| Error::validation(format!("Missing column: {name}")))
        };
        Ok(Self {
            date: require("date")?,
            description: require("description")?,
            category: require("category")?,
            kind: find("type"),
            amount: require("amount")?,
        })
    }
}

/// Read and validate every row of `path` before writing any of them.
pub(crate) fn read_transactions(path: &Path) -> Result<Vec<ValidTransaction>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_path(path)?;
    let columns = Columns::from_headers(reader.headers()?)?;

    let mut valid = Vec::new();
    for (idx, record) in reader.records().enumerate() {
        // Line 1 is the header
        let row = idx + 2;
        let record = record?;
        let field = |i: usize| record.get(i).unwrap_or("").to_string();

        let kind = match columns.kind.map(field).filter(|k| !k.is_empty()) {
            Some(raw) => Some(TransactionKind::parse(&raw).ok_or_else(|| {
                Error::validation(format!("Row {row}: Unknown type '{raw}'"))
            })?),
            None => None,
        };
        let input = TransactionInput {
            amount: parse_decimal(&field(columns.amount)),
            date: field(columns.date),
            description: field(columns.description),
            category: field(columns.category),
            kind,
        };
        let txn = input.validate().map_err(|e| match e {
            Error::Validation(msg) => Error::validation(format!("Row {row}: {msg}")),
            other => other,
        })?;
        valid.push(txn);
    }
    debug!(rows = valid.len(), path = %path.display(), "csv rows validated");
    Ok(valid)
}

/// Import a CSV file. Either every row is stored or none are.
pub(crate) fn import_transactions(db: &mut Database, path: &Path) -> Result<usize> {
    let txns = read_transactions(path)?;
    let count = db.insert_transactions_batch(&txns)?;
    info!(count, path = %path.display(), "imported transactions");
    Ok(count)
}

/// Parse a money cell such as `$1,234.56` or `(12.00)`.
pub(crate) fn parse_decimal(s: &str) -> Option<Decimal> {
    let cleaned = s
        .replace(['$', ',', '"'], "")
        .replace('(', "-")
        .replace(')', "")
        .trim()
        .to_string();
    if cleaned.is_empty() {
        return None;
    }
    Decimal::from_str(&cleaned).ok()
}

#[cfg(test)]
mod tests;
