mod schema;

use chrono::SecondsFormat;
use rusqlite::types::Type;
use rusqlite::{params, Connection, ErrorCode, OptionalExtension, Row};
use rust_decimal::Decimal;
use std::path::Path;
use std::str::FromStr;
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::models::*;

const TRANSACTION_COLUMNS: &str = "id, amount, date, description, category, kind, created_at";
const BUDGET_COLUMNS: &str = "id, category, amount, month, spent";

/// Optional narrowing for transaction listings. The default is a full scan.
#[derive(Debug, Clone, Default)]
pub(crate) struct TransactionFilter {
    /// `YYYY-MM` prefix of the transaction date.
    pub(crate) month: Option<String>,
    /// Case-insensitive substring of description or category.
    pub(crate) search: Option<String>,
    pub(crate) limit: Option<u32>,
}

pub(crate) struct Database {
    conn: Connection,
}

impl Database {
    pub(crate) fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")?;
        conn.busy_timeout(std::time::Duration::from_secs(5))?;
        let mut db = Self { conn };
        db.migrate()?;
        debug!(path = %path.display(), "database opened");
        Ok(db)
    }

    #[cfg(test)]
    pub(crate) fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        let mut db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&mut self) -> Result<()> {
        let has_version_table: bool = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version')",
            [],
            |row| row.get(0),
        )?;

        if !has_version_table {
            // Fresh database - apply full schema
            let tx = self.conn.transaction()?;
            tx.execute_batch(schema::SCHEMA_V1)?;
            tx.execute(
                "INSERT INTO schema_version (version) VALUES (?1)",
                params![schema::CURRENT_VERSION],
            )?;
            tx.commit()?;
            return Ok(());
        }

        let current: i32 = self
            .conn
            .query_row("SELECT version FROM schema_version LIMIT 1", [], |row| {
                row.get(0)
            })
            .optional()?
            .unwrap_or(0);

        for &(from_version, sql) in schema::MIGRATIONS {
            if current <= from_version {
                self.conn.execute_batch(sql)?;
            }
        }

        if current < schema::CURRENT_VERSION {
            self.conn.execute(
                "UPDATE schema_version SET version = ?1",
                params![schema::CURRENT_VERSION],
            )?;
        }

        Ok(())
    }

    // ── Transactions ──────────────────────────────────────────

    pub(crate) fn insert_transaction(&mut self, txn: &ValidTransaction) -> Result<Transaction> {
        let created_at = now_timestamp();
        let tx = self.conn.transaction()?;
        tx.execute(
            "INSERT INTO transactions (amount, date, description, category, kind, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                txn.amount.to_string(),
                txn.date,
                txn.description,
                txn.category,
                txn.kind.as_str(),
                created_at,
            ],
        )?;
        let id = tx.last_insert_rowid();
        refresh_budget_spent(&tx, &txn.category, txn.month_key())?;
        tx.commit()?;

        debug!(id, category = %txn.category, kind = %txn.kind, "transaction inserted");
        Ok(Transaction {
            id,
            amount: txn.amount,
            date: txn.date.clone(),
            description: txn.description.clone(),
            category: txn.category.clone(),
            kind: txn.kind,
            created_at,
        })
    }

    /// Transactions ordered newest date first, then newest creation first.
    pub(crate) fn get_transactions(&self, filter: &TransactionFilter) -> Result<Vec<Transaction>> {
        let mut sql = format!("SELECT {TRANSACTION_COLUMNS} FROM transactions WHERE 1=1");
        let mut param_values: Vec<Box<dyn rusqlite::types::ToSql>> = Vec::new();

        if let Some(m) = &filter.month {
            sql.push_str(&format!(
                " AND date LIKE ?{} ESCAPE '\\'",
                param_values.len() + 1
            ));
            param_values.push(Box::new(format!("{}%", escape_like(m))));
        }
        if let Some(s) = filter.search.as_deref().filter(|s| !s.is_empty()) {
            sql.push_str(&format!(
                " AND (description LIKE ?{0} ESCAPE '\\' OR category LIKE ?{0} ESCAPE '\\')",
                param_values.len() + 1
            ));
            param_values.push(Box::new(format!("%{}%", escape_like(s))));
        }

        sql.push_str(" ORDER BY date DESC, created_at DESC, id DESC");

        if let Some(l) = filter.limit {
            sql.push_str(&format!(" LIMIT {l}"));
        }

        let params_ref: Vec<&dyn rusqlite::types::ToSql> =
            param_values.iter().map(|p| p.as_ref()).collect();

        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(params_ref.as_slice(), transaction_from_row)?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    pub(crate) fn get_all_transactions(&self) -> Result<Vec<Transaction>> {
        self.get_transactions(&TransactionFilter::default())
    }

    pub(crate) fn get_transaction(&self, id: i64) -> Result<Option<Transaction>> {
        find_transaction(&self.conn, id)
    }

    pub(crate) fn get_transaction_count(&self) -> Result<i64> {
        Ok(self
            .conn
            .query_row("SELECT COUNT(*) FROM transactions", [], |row| row.get(0))?)
    }

    pub(crate) fn update_transaction(
        &mut self,
        id: i64,
        txn: &ValidTransaction,
    ) -> Result<Transaction> {
        let tx = self.conn.transaction()?;
        let Some(old) = find_transaction(&tx, id)? else {
            warn!(id, "update of unknown transaction");
            return Err(Error::NotFound("Transaction not found".into()));
        };

        tx.execute(
            "UPDATE transactions
             SET amount = ?1, date = ?2, description = ?3, category = ?4, kind = ?5
             WHERE id = ?6",
            params![
                txn.amount.to_string(),
                txn.date,
                txn.description,
                txn.category,
                txn.kind.as_str(),
                id,
            ],
        )?;

        refresh_budget_spent(&tx, &old.category, old.month_key())?;
        if old.category != txn.category || old.month_key() != txn.month_key() {
            refresh_budget_spent(&tx, &txn.category, txn.month_key())?;
        }
        tx.commit()?;

        debug!(id, "transaction updated");
        Ok(Transaction {
            id,
            amount: txn.amount,
            date: txn.date.clone(),
            description: txn.description.clone(),
            category: txn.category.clone(),
            kind: txn.kind,
            created_at: old.created_at,
        })
    }

    /// Remove a transaction and return what was removed.
    pub(crate) fn delete_transaction(&mut self, id: i64) -> Result<Transaction> {
        let tx = self.conn.transaction()?;
        let Some(old) = find_transaction(&tx, id)? else {
            warn!(id, "delete of unknown transaction");
            return Err(Error::NotFound("Transaction not found".into()));
        };
        tx.execute("DELETE FROM transactions WHERE id = ?1", params![id])?;
        refresh_budget_spent(&tx, &old.category, old.month_key())?;
        tx.commit()?;

        debug!(id, "transaction deleted");
        Ok(old)
    }

    /// Insert a batch atomically: either every row lands or none do.
    pub(crate) fn insert_transactions_batch(&mut self, txns: &[ValidTransaction]) -> Result<usize> {
        let tx = self.conn.transaction()?;
        let mut touched: Vec<(&str, &str)> = Vec::new();
        for txn in txns {
            tx.execute(
                "INSERT INTO transactions (amount, date, description, category, kind, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    txn.amount.to_string(),
                    txn.date,
                    txn.description,
                    txn.category,
                    txn.kind.as_str(),
                    now_timestamp(),
                ],
            )?;
            let key = (txn.category.as_str(), txn.month_key());
            if !touched.contains(&key) {
                touched.push(key);
            }
        }
        for (category, month) in touched {
            refresh_budget_spent(&tx, category, month)?;
        }
        tx.commit()?;
        debug!(count = txns.len(), "transaction batch inserted");
        Ok(txns.len())
    }

    // ── Budgets ───────────────────────────────────────────────

    /// Budgets ordered by month (newest first), then category name.
    pub(crate) fn get_budgets(&self, month: Option<&str>) -> Result<Vec<Budget>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {BUDGET_COLUMNS} FROM budgets
             WHERE ?1 IS NULL OR month = ?1
             ORDER BY month DESC, category ASC"
        ))?;
        let rows = stmt.query_map(params![month], budget_from_row)?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    pub(crate) fn get_budget(&self, id: i64) -> Result<Option<Budget>> {
        find_budget(&self.conn, id)
    }

    /// Create a budget with `spent` computed from the current transactions.
    ///
    /// The UNIQUE(category, month) index decides duplicates, so concurrent
    /// creators of the same key see exactly one success.
    pub(crate) fn insert_budget(&mut self, budget: &ValidBudget) -> Result<Budget> {
        let tx = self.conn.transaction()?;
        let spent = spent_for(&tx, &budget.category, &budget.month)?;
        let inserted = tx.execute(
            "INSERT INTO budgets (category, amount, month, spent) VALUES (?1, ?2, ?3, ?4)",
            params![
                budget.category,
                budget.amount.to_string(),
                budget.month,
                spent.to_string(),
            ],
        );
        if let Err(e) = inserted {
            return Err(map_budget_conflict(e, budget));
        }
        let id = tx.last_insert_rowid();
        tx.commit()?;

        debug!(id, category = %budget.category, month = %budget.month, %spent, "budget created");
        Ok(Budget {
            id,
            category: budget.category.clone(),
            amount: budget.amount,
            month: budget.month.clone(),
            spent,
        })
    }

    /// Replace a budget's fields and recompute its `spent`.
    pub(crate) fn update_budget(&mut self, id: i64, budget: &ValidBudget) -> Result<Budget> {
        let tx = self.conn.transaction()?;
        let taken: bool = tx.query_row(
            "SELECT EXISTS(SELECT 1 FROM budgets WHERE category = ?1 AND month = ?2 AND id != ?3)",
            params![budget.category, budget.month, id],
            |row| row.get(0),
        )?;
        if taken {
            return Err(duplicate_budget(budget));
        }
        if find_budget(&tx, id)?.is_none() {
            warn!(id, "update of unknown budget");
            return Err(Error::NotFound("Budget not found".into()));
        }

        let spent = spent_for(&tx, &budget.category, &budget.month)?;
        let updated = tx.execute(
            "UPDATE budgets SET category = ?1, amount = ?2, month = ?3, spent = ?4 WHERE id = ?5",
            params![
                budget.category,
                budget.amount.to_string(),
                budget.month,
                spent.to_string(),
                id,
            ],
        );
        if let Err(e) = updated {
            return Err(map_budget_conflict(e, budget));
        }
        tx.commit()?;

        debug!(id, %spent, "budget updated");
        Ok(Budget {
            id,
            category: budget.category.clone(),
            amount: budget.amount,
            month: budget.month.clone(),
            spent,
        })
    }

    pub(crate) fn delete_budget(&mut self, id: i64) -> Result<Budget> {
        let tx = self.conn.transaction()?;
        let Some(old) = find_budget(&tx, id)? else {
            warn!(id, "delete of unknown budget");
            return Err(Error::NotFound("Budget not found".into()));
        };
        tx.execute("DELETE FROM budgets WHERE id = ?1", params![id])?;
        tx.commit()?;
        debug!(id, "budget deleted");
        Ok(old)
    }

    /// Expense total for `category` within `month`, read live from the transactions.
    #[cfg(test)]
    pub(crate) fn spent_for(&self, category: &str, month: &str) -> Result<Decimal> {
        spent_for(&self.conn, category, month)
    }
}

// ── Row mapping and shared queries ────────────────────────────

fn now_timestamp() -> String {
    chrono::Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn decimal_column(row: &Row, idx: usize) -> rusqlite::Result<Decimal> {
    let text: String = row.get(idx)?;
    Decimal::from_str(&text)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn transaction_from_row(row: &Row) -> rusqlite::Result<Transaction> {
    Ok(Transaction {
        id: row.get(0)?,
        amount: decimal_column(row, 1)?,
        date: row.get(2)?,
        description: row.get(3)?,
        category: row.get(4)?,
        kind: TransactionKind::parse(&row.get::<_, String>(5)?).unwrap_or_default(),
        created_at: row.get(6)?,
    })
}

fn budget_from_row(row: &Row) -> rusqlite::Result<Budget> {
    Ok(Budget {
        id: row.get(0)?,
        category: row.get(1)?,
        amount: decimal_column(row, 2)?,
        month: row.get(3)?,
        spent: decimal_column(row, 4)?,
    })
}

fn find_transaction(conn: &Connection, id: i64) -> Result<Option<Transaction>> {
    Ok(conn
        .query_row(
            &format!("SELECT {TRANSACTION_COLUMNS} FROM transactions WHERE id = ?1"),
            params![id],
            transaction_from_row,
        )
        .optional()?)
}

fn find_budget(conn: &Connection, id: i64) -> Result<Option<Budget>> {
    Ok(conn
        .query_row(
            &format!("SELECT {BUDGET_COLUMNS} FROM budgets WHERE id = ?1"),
            params![id],
            budget_from_row,
        )
        .optional()?)
}

/// Make `%`, `_` and `\` match literally under `ESCAPE '\'`.
fn escape_like(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Sum of expense amounts for `category` dated in `[month-01, first day of next month)`.
fn spent_for(conn: &Connection, category: &str, month: &str) -> Result<Decimal> {
    let Some((start, end)) = month_bounds(month) else {
        return Ok(Decimal::ZERO);
    };
    let mut stmt = conn.prepare_cached(
        "SELECT amount FROM transactions
         WHERE category = ?1 AND kind = 'expense' AND date >= ?2 AND date < ?3",
    )?;
    let rows = stmt.query_map(
        params![
            category,
            start.format("%Y-%m-%d").to_string(),
            end.format("%Y-%m-%d").to_string()
        ],
        |row| decimal_column(row, 0),
    )?;
    let mut total = Decimal::ZERO;
    for amount in rows {
        total = total.saturating_add(amount?);
    }
    Ok(total)
}

/// Keep the cached `spent` of the (category, month) budget in step with its transactions.
fn refresh_budget_spent(conn: &Connection, category: &str, month: &str) -> Result<()> {
    let exists: bool = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM budgets WHERE category = ?1 AND month = ?2)",
        params![category, month],
        |row| row.get(0),
    )?;
    if !exists {
        return Ok(());
    }
    let spent = spent_for(conn, category, month)?;
    conn.execute(
        "UPDATE budgets SET spent = ?1 WHERE category = ?2 AND month = ?3",
        params![spent.to_string(), category, month],
    )?;
    debug!(category, month, %spent, "budget spent refreshed");
    Ok(())
}

fn duplicate_budget(budget: &ValidBudget) -> Error {
    warn!(category = %budget.category, month = %budget.month, "duplicate budget rejected");
    Error::Conflict("Budget already exists for this category and month".into())
}

fn map_budget_conflict(err: rusqlite::Error, budget: &ValidBudget) -> Error {
    match err {
        rusqlite::Error::SqliteFailure(ref e, _) if e.code == ErrorCode::ConstraintViolation => {
            duplicate_budget(budget)
        }
        other => Error::Database(other),
    }
}

#[cfg(test)]
mod tests;
