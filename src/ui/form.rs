use crate::models::{Category, Transaction, TransactionInput, TransactionKind, INCOME_CATEGORY};
use crate::transfer::parse_decimal;

pub(crate) const FORM_FIELDS: [&str; 5] = ["Type", "Amount", "Date", "Category", "Description"];

const TYPE_FIELD: usize = 0;
const CATEGORY_FIELD: usize = 3;

/// Inline editor for adding or replacing a transaction.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct TransactionForm {
    /// `Some` when replacing an existing transaction.
    pub(crate) editing_id: Option<i64>,
    pub(crate) kind: TransactionKind,
    pub(crate) amount: String,
    pub(crate) date: String,
    pub(crate) category: String,
    pub(crate) description: String,
    pub(crate) focus: usize,
}

impl TransactionForm {
    pub(crate) fn new(today: &str) -> Self {
        Self {
            editing_id: None,
            kind: TransactionKind::Expense,
            amount: String::new(),
            date: today.to_string(),
            category: first_category(TransactionKind::Expense).to_string(),
            description: String::new(),
            focus: 1,
        }
    }

    pub(crate) fn from_transaction(txn: &Transaction) -> Self {
        Self {
            editing_id: Some(txn.id),
            kind: txn.kind,
            amount: txn.amount.to_string(),
            date: txn.date.clone(),
            category: txn.category.clone(),
            description: txn.description.clone(),
            focus: 1,
        }
    }

    pub(crate) fn title(&self) -> &'static str {
        if self.editing_id.is_some() {
            " Edit Transaction "
        } else {
            " New Transaction "
        }
    }

    pub(crate) fn value(&self, field: usize) -> &str {
        match field {
            TYPE_FIELD => self.kind.as_str(),
            1 => &self.amount,
            2 => &self.date,
            CATEGORY_FIELD => &self.category,
            _ => &self.description,
        }
    }

    /// Whether the field is picked from a fixed list rather than typed.
    pub(crate) fn is_choice(field: usize) -> bool {
        field == TYPE_FIELD || field == CATEGORY_FIELD
    }

    fn focused_text(&mut self) -> Option<&mut String> {
        match self.focus {
            1 => Some(&mut self.amount),
            2 => Some(&mut self.date),
            4 => Some(&mut self.description),
            _ => None,
        }
    }

    pub(crate) fn next_field(&mut self) {
        self.focus = (self.focus + 1) % FORM_FIELDS.len();
    }

    pub(crate) fn prev_field(&mut self) {
        self.focus = (self.focus + FORM_FIELDS.len() - 1) % FORM_FIELDS.len();
    }

    pub(crate) fn push_char(&mut self, c: char) {
        if let Some(text) = self.focused_text() {
            text.push(c);
        }
    }

    pub(crate) fn pop_char(&mut self) {
        if let Some(text) = self.focused_text() {
            text.pop();
        }
    }

    /// Step through the options of a choice field.
    pub(crate) fn cycle(&mut self, delta: i32) {
        match self.focus {
            TYPE_FIELD => {
                self.kind = match self.kind {
                    TransactionKind::Expense => TransactionKind::Income,
                    TransactionKind::Income => TransactionKind::Expense,
                };
                let fits = match self.kind {
                    TransactionKind::Income => self.category == INCOME_CATEGORY,
                    TransactionKind::Expense => self.category != INCOME_CATEGORY,
                };
                if !fits {
                    self.category = first_category(self.kind).to_string();
                }
            }
            CATEGORY_FIELD => {
                let options = category_options(self.kind);
                if options.is_empty() {
                    return;
                }
                let len = options.len() as i32;
                let next = match options
                    .iter()
                    .position(|name| name.eq_ignore_ascii_case(&self.category))
                {
                    Some(i) => (i as i32 + delta).rem_euclid(len),
                    None => 0,
                };
                self.category = options[next as usize].to_string();
            }
            _ => {}
        }
    }

    /// Raw input for validation; category names resolve to their registry spelling.
    pub(crate) fn to_input(&self) -> TransactionInput {
        let category = Category::find_by_name(&self.category)
            .map_or_else(|| self.category.clone(), |c| c.name.to_string());
        TransactionInput {
            amount: parse_decimal(&self.amount),
            date: self.date.clone(),
            description: self.description.clone(),
            category,
            kind: Some(self.kind),
        }
    }
}

fn category_options(kind: TransactionKind) -> Vec<&'static str> {
    match kind {
        TransactionKind::Expense => Category::expense_categories().map(|c| c.name).collect(),
        TransactionKind::Income => Category::income_categories().map(|c| c.name).collect(),
    }
}

fn first_category(kind: TransactionKind) -> &'static str {
    category_options(kind)
        .first()
        .copied()
        .unwrap_or(INCOME_CATEGORY)
}
