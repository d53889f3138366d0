//! Transport-free request dispatcher.
//!
//! Every operation answers with a status code plus the shared
//! `{ success, data?, error? }` envelope. Client errors carry their message;
//! persistence failures are logged and replaced by a generic one.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, error, warn};

use crate::analytics::{self, insights};
use crate::db::{Database, TransactionFilter};
use crate::error::{Error, Result};
use crate::models::*;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub(crate) struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub(crate) fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub(crate) fn fail(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

/// A status code paired with its envelope.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Reply<T> {
    pub status: u16,
    pub body: ApiResponse<T>,
}

impl<T: Serialize> Reply<T> {
    fn into_json(self) -> (u16, Value) {
        match serde_json::to_value(&self.body) {
            Ok(json) => (self.status, json),
            Err(e) => {
                error!(error = %e, "failed to serialize response");
                (500, failure_json("Internal server error"))
            }
        }
    }
}

fn failure_json(message: &str) -> Value {
    serde_json::json!({ "success": false, "error": message })
}

/// Turn a store result into a reply. `failure` is the only text a
/// persistence error is allowed to show.
fn respond<T>(result: Result<T>, failure: &str) -> Reply<T> {
    match result {
        Ok(data) => Reply {
            status: 200,
            body: ApiResponse::ok(data),
        },
        Err(e) if e.is_client_error() => {
            debug!(status = e.status(), error = %e, "request rejected");
            Reply {
                status: e.status(),
                body: ApiResponse::fail(e.to_string()),
            }
        }
        Err(e) => {
            error!(error = %e, "{failure}");
            Reply {
                status: e.status(),
                body: ApiResponse::fail(failure),
            }
        }
    }
}

pub(crate) struct Api<'a> {
    db: &'a mut Database,
}

impl<'a> Api<'a> {
    pub(crate) fn new(db: &'a mut Database) -> Self {
        Self { db }
    }

    // ── Transactions ──────────────────────────────────────────

    pub(crate) fn list_transactions(&self, filter: &TransactionFilter) -> Reply<Vec<Transaction>> {
        respond(
            self.db.get_transactions(filter),
            "Failed to fetch transactions",
        )
    }

    pub(crate) fn get_transaction(&self, id: i64) -> Reply<Transaction> {
        let result = self.db.get_transaction(id).and_then(|found| {
            found.ok_or_else(|| Error::NotFound("Transaction not found".into()))
        });
        respond(result, "Failed to fetch transaction")
    }

    pub(crate) fn create_transaction(&mut self, input: &TransactionInput) -> Reply<Transaction> {
        let result = input
            .validate()
            .and_then(|valid| self.db.insert_transaction(&valid));
        respond(result, "Failed to create transaction")
    }

    pub(crate) fn update_transaction(
        &mut self,
        id: i64,
        input: &TransactionInput,
    ) -> Reply<Transaction> {
        let result = input
            .validate()
            .and_then(|valid| self.db.update_transaction(id, &valid));
        respond(result, "Failed to update transaction")
    }

    pub(crate) fn delete_transaction(&mut self, id: i64) -> Reply<Transaction> {
        respond(
            self.db.delete_transaction(id),
            "Failed to delete transaction",
        )
    }

    // ── Budgets ───────────────────────────────────────────────

    pub(crate) fn list_budgets(&self, month: Option<&str>) -> Reply<Vec<Budget>> {
        respond(self.db.get_budgets(month), "Failed to fetch budgets")
    }

    pub(crate) fn get_budget(&self, id: i64) -> Reply<Budget> {
        let result = self
            .db
            .get_budget(id)
            .and_then(|found| found.ok_or_else(|| Error::NotFound("Budget not found".into())));
        respond(result, "Failed to fetch budget")
    }

    pub(crate) fn create_budget(&mut self, input: &BudgetInput) -> Reply<Budget> {
        let result = input
            .validate()
            .and_then(|valid| self.db.insert_budget(&valid));
        respond(result, "Failed to create budget")
    }

    pub(crate) fn update_budget(&mut self, id: i64, input: &BudgetInput) -> Reply<Budget> {
        let result = input
            .validate()
            .and_then(|valid| self.db.update_budget(id, &valid));
        respond(result, "Failed to update budget")
    }

    pub(crate) fn delete_budget(&mut self, id: i64) -> Reply<Budget> {
        respond(self.db.delete_budget(id), "Failed to delete budget")
    }

    // ── Read models ───────────────────────────────────────────

    pub(crate) fn dashboard(&self) -> Reply<DashboardStats> {
        let result = self
            .db
            .get_all_transactions()
            .map(|txns| analytics::dashboard_stats(&txns));
        respond(result, "Failed to fetch dashboard data")
    }

    /// Budget vs. actual for `month` (defaults to the current month).
    pub(crate) fn budget_comparisons(&self, month: Option<&str>) -> Reply<Vec<BudgetComparison>> {
        let month = month.map_or_else(analytics::current_month, str::to_string);
        let result = self
            .db
            .get_budgets(Some(&month))
            .map(|budgets| analytics::compare_budgets(&budgets, &month));
        respond(result, "Failed to fetch budget comparison")
    }

    pub(crate) fn insights(&self) -> Reply<Vec<SpendingInsight>> {
        let month = analytics::current_month();
        let result = self.db.get_all_transactions().and_then(|txns| {
            let stats = analytics::dashboard_stats(&txns);
            let budgets = self.db.get_budgets(Some(&month))?;
            let comparisons = analytics::compare_budgets(&budgets, &month);
            Ok(insights::generate(&stats, &comparisons))
        });
        respond(result, "Failed to generate insights")
    }

    // ── Routing ───────────────────────────────────────────────

    /// Route a request by method and path. Paths may carry an `/api` prefix
    /// and a query string (`month`, `search`, `limit`).
    pub(crate) fn dispatch(&mut self, method: &str, path: &str, body: Option<&str>) -> (u16, Value) {
        let method = method.to_ascii_uppercase();
        let (path, query) = path.split_once('?').unwrap_or((path, ""));
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        let segments = match segments.as_slice() {
            ["api", rest @ ..] => rest,
            all => all,
        };
        debug!(%method, path, "dispatch");
        let query = match ListQuery::parse(query) {
            Ok(q) => q,
            Err(reply) => return reply,
        };

        match (segments, method.as_str()) {
            (["transactions"], "GET") => {
                self.list_transactions(&query.filter()).into_json()
            }
            (["transactions"], "POST") => match parse_body::<TransactionInput>(body) {
                Ok(input) => self.create_transaction(&input).into_json(),
                Err(reply) => reply,
            },
            (["transactions", id], "GET") => match parse_id(id) {
                Ok(id) => self.get_transaction(id).into_json(),
                Err(reply) => reply,
            },
            (["transactions", id], "PUT") => match (parse_id(id), parse_body(body)) {
                (Ok(id), Ok(input)) => self.update_transaction(id, &input).into_json(),
                (Err(reply), _) | (_, Err(reply)) => reply,
            },
            (["transactions", id], "DELETE") => match parse_id(id) {
                Ok(id) => self.delete_transaction(id).into_json(),
                Err(reply) => reply,
            },
            (["budgets"], "GET") => {
                self.list_budgets(query.month()).into_json()
            }
            (["budgets"], "POST") => match parse_body::<BudgetInput>(body) {
                Ok(input) => self.create_budget(&input).into_json(),
                Err(reply) => reply,
            },
            (["budgets", "comparison"], "GET") => {
                self.budget_comparisons(query.month()).into_json()
            }
            (["budgets", id], "GET") => match parse_id(id) {
                Ok(id) => self.get_budget(id).into_json(),
                Err(reply) => reply,
            },
            (["budgets", id], "PUT") => match (parse_id(id), parse_body(body)) {
                (Ok(id), Ok(input)) => self.update_budget(id, &input).into_json(),
                (Err(reply), _) | (_, Err(reply)) => reply,
            },
            (["budgets", id], "DELETE") => match parse_id(id) {
                Ok(id) => self.delete_budget(id).into_json(),
                Err(reply) => reply,
            },
            (["categories"], "GET") => Reply {
                status: 200,
                body: ApiResponse::ok(Category::all()),
            }
            .into_json(),
            (["dashboard"], "GET") => self.dashboard().into_json(),
            (["insights"], "GET") => self.insights().into_json(),
            (route, _) if is_known_route(route) => {
                warn!(%method, path, "method not allowed");
                (405, failure_json("Method not allowed"))
            }
            _ => {
                warn!(%method, path, "no route");
                (404, failure_json("Not found"))
            }
        }
    }
}

fn is_known_route(segments: &[&str]) -> bool {
    matches!(
        segments,
        ["transactions"]
            | ["transactions", _]
            | ["budgets"]
            | ["budgets", _]
            | ["categories"]
            | ["dashboard"]
            | ["insights"]
    )
}

fn parse_id(raw: &str) -> std::result::Result<i64, (u16, Value)> {
    raw.parse::<i64>()
        .map_err(|_| (400, failure_json("Invalid id")))
}

fn parse_body<T: DeserializeOwned>(body: Option<&str>) -> std::result::Result<T, (u16, Value)> {
    let raw = body.unwrap_or("").trim();
    if raw.is_empty() {
        return Err((400, failure_json("Request body is required")));
    }
    serde_json::from_str(raw).map_err(|e| {
        debug!(error = %e, "malformed request body");
        (400, failure_json("Invalid JSON body"))
    })
}

/// Query-string parameters shared by the list routes. Unknown keys are ignored.
#[derive(Debug, Default, Deserialize)]
struct ListQuery {
    month: Option<String>,
    search: Option<String>,
    limit: Option<String>,
}

impl ListQuery {
    fn parse(raw: &str) -> std::result::Result<Self, (u16, Value)> {
        serde_urlencoded::from_str(raw).map_err(|e| {
            debug!(error = %e, "malformed query string");
            (400, failure_json("Invalid query string"))
        })
    }

    fn month(&self) -> Option<&str> {
        non_empty(&self.month)
    }

    fn filter(&self) -> TransactionFilter {
        TransactionFilter {
            month: self.month().map(str::to_string),
            search: non_empty(&self.search).map(str::to_string),
            limit: non_empty(&self.limit).and_then(|l| l.parse().ok()),
        }
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}
